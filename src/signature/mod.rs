pub mod extractor;
pub mod names;
pub mod role_text;
pub mod segmenter;
pub mod types;

pub use types::*;

use tracing::debug;

use crate::config::AnalysisConfig;

// Module-level constants
pub const TARGET_SIGNATURE: &str = "signature";

/// Segment a document and extract the signatures of every block, in document order
pub fn extract_from_text(text: &str, year: &str, config: &AnalysisConfig) -> Vec<ExtractedSignature> {
    let blocks = segmenter::segment(text, year, config);
    debug!(
        target: TARGET_SIGNATURE,
        "Found {} signature block(s) for year {}", blocks.len(), year
    );

    blocks
        .iter()
        .flat_map(|block| extractor::extract_signatures(block, &config.names))
        .collect()
}
