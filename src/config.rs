//! Tunables for segmentation and extraction.
//!
//! The wording of signature blocks changed over the years, so header phrases and
//! the date line used as a fallback anchor are keyed by year range. `Default`
//! carries the formats observed in the first gazette series since 2017; a JSON file
//! with the same shape can replace them (see `ANALYSIS_CONFIG`).

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::signature::TARGET_SIGNATURE;

/// Phrase that closes the signature section of an issue
pub const DEFAULT_END_MARKER: &str = "Θεωρήθηκε και τέθηκε η Μεγάλη Σφραγίδα του Κράτους.";

/// Inclusive range of years; an open bound matches every year on that side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearSpan {
    #[serde(default)]
    pub from: Option<u16>,
    #[serde(default)]
    pub to: Option<u16>,
}

impl YearSpan {
    pub fn only(year: u16) -> Self {
        YearSpan {
            from: Some(year),
            to: Some(year),
        }
    }

    pub fn any() -> Self {
        YearSpan::default()
    }

    pub fn contains(&self, year: u16) -> bool {
        self.from.map_or(true, |from| year >= from) && self.to.map_or(true, |to| year <= to)
    }
}

/// How signature blocks are introduced in the issues of a year span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFormat {
    pub years: YearSpan,

    // Exact, case-sensitive phrases opening a block (trailing newline included)
    pub headers: Vec<String>,

    // Regex template for the date line; `{year}` is replaced with the issue year
    pub date_pattern: String,
}

impl DocumentFormat {
    /// Compile the date pattern for a concrete year
    pub fn date_regex(&self, year: &str) -> Result<Regex> {
        let pattern = self.date_pattern.replace("{year}", &regex::escape(year));
        Regex::new(&pattern).with_context(|| format!("Invalid date pattern '{}'", pattern))
    }
}

/// Which upper-case tokens count as a person's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRules {
    // A name token is longer than this many characters
    pub min_chars_exclusive: usize,

    // Given name and surname
    pub min_words: usize,
}

impl Default for NameRules {
    fn default() -> Self {
        NameRules {
            min_chars_exclusive: 3,
            min_words: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // Checked in order, first match wins
    pub formats: Vec<DocumentFormat>,

    #[serde(default = "default_end_marker")]
    pub end_marker: String,

    #[serde(default)]
    pub names: NameRules,
}

fn default_end_marker() -> String {
    DEFAULT_END_MARKER.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            formats: vec![
                DocumentFormat {
                    years: YearSpan::only(2017),
                    headers: vec![
                        "Οι Υπουργοί\n".to_string(),
                        "Οι Αναπληρωτές Υπουργοί\n".to_string(),
                    ],
                    date_pattern: r"Αθήνα,\s+\d{1,2}\s+[Α-ΩΆ-ΏΪΫ][α-ωά-ώϊϋΐΰ]+\s+{year}".to_string(),
                },
                DocumentFormat {
                    years: YearSpan::any(),
                    headers: vec![
                        "ΟΙ ΥΠΟΥΡΓΟΙ\n".to_string(),
                        "ΟΙ ΑΝΑΠΛΗΡΩΤΕΣ ΥΠΟΥΡΓΟΙ\n".to_string(),
                    ],
                    date_pattern: r"Αθήνα,\s+\d{1,2}\s+[Α-ΩΆ-ΏΪΫ]+\s+{year}".to_string(),
                },
            ],
            end_marker: default_end_marker(),
            names: NameRules::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid analysis config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations whose date patterns do not compile
    pub fn validate(&self) -> Result<()> {
        if self.formats.is_empty() {
            anyhow::bail!("Analysis config defines no document formats");
        }
        for format in &self.formats {
            format.date_regex("2000")?;
        }
        Ok(())
    }

    /// Format used for issues of the given year.
    ///
    /// An unparsable year only matches spans open on both ends; failing that, the
    /// last configured format is used.
    pub fn format_for_year(&self, year: &str) -> Option<&DocumentFormat> {
        let parsed = year.trim().parse::<u16>().ok();
        if parsed.is_none() {
            warn!(target: TARGET_SIGNATURE, "Unparsable issue year '{}'", year);
        }

        self.formats
            .iter()
            .find(|format| match parsed {
                Some(year) => format.years.contains(year),
                None => format.years == YearSpan::any(),
            })
            .or_else(|| self.formats.last())
    }
}
