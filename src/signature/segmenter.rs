use tracing::{debug, warn};

use super::TARGET_SIGNATURE;
use crate::config::AnalysisConfig;

/// Part of an issue's text believed to list signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    // Byte offset of the block within the document
    pub start: usize,
    pub text: &'a str,

    // True when the block was cut at the closing marker, so anything after the
    // signatures is already excluded
    pub end_known: bool,
}

/// Byte offsets of every (possibly overlapping) occurrence of `needle`
pub fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    let mut offsets = Vec::new();
    let mut from = 0;
    while let Some(found) = haystack[from..].find(needle) {
        let offset = from + found;
        offsets.push(offset);
        // step one character so overlapping matches are found too
        from = offset
            + haystack[offset..]
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
    }
    offsets
}

/// Locate the signature blocks of a document.
///
/// Blocks start at the year's header phrases, or at the date line when no header
/// occurs at all. The k-th block ends at the k-th closing marker when that marker
/// comes after it, otherwise it runs to the end of the document.
pub fn segment<'a>(text: &'a str, year: &str, config: &AnalysisConfig) -> Vec<Block<'a>> {
    let Some(format) = config.format_for_year(year) else {
        warn!(target: TARGET_SIGNATURE, "No document format configured");
        return Vec::new();
    };

    let mut starts: Vec<usize> = format
        .headers
        .iter()
        .flat_map(|header| find_all(text, header))
        .collect();

    if starts.is_empty() {
        match format.date_regex(year) {
            Ok(date) => {
                starts = date.find_iter(text).map(|m| m.start()).collect();
                debug!(
                    target: TARGET_SIGNATURE,
                    "No header phrase found, {} date line(s) used instead", starts.len()
                );
            }
            Err(e) => {
                warn!(target: TARGET_SIGNATURE, "Skipping date fallback: {:#}", e);
            }
        }
    }

    starts.sort_unstable();
    starts.dedup();

    let ends = find_all(text, &config.end_marker);

    starts
        .iter()
        .enumerate()
        .map(|(k, &start)| match ends.get(k) {
            Some(&end) if end > start => Block {
                start,
                text: &text[start..end],
                end_known: true,
            },
            _ => Block {
                start,
                text: &text[start..],
                end_known: false,
            },
        })
        .collect()
}
