//! Resume analysis pipeline: document bytes → plain text → ATS score.

pub mod extract;
pub mod handlers;
pub mod rules;
pub mod scorer;

#[cfg(test)]
mod fixtures;

use tracing::info;

use crate::analysis::extract::{extract, ExtractError};
use crate::analysis::scorer::{analyze, AnalysisResult};

/// Extracts text from an uploaded document and scores it.
/// Scoring never runs when extraction fails.
pub fn analyze_document(bytes: &[u8], filename: &str) -> Result<AnalysisResult, ExtractError> {
    let text = extract(bytes, filename)?;
    info!("Extracted {} chars from {filename}", text.chars().count());

    let result = analyze(&text);
    info!(
        "Analysis complete for {filename}: score {} ({} words)",
        result.score, result.word_count
    );
    Ok(result)
}
