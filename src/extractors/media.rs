//! Extraction for questions referencing external media.
//!
//! The document only carries the referencing phrase ("según el vídeo de la
//! unidad 3"); the media itself lives outside it. The phrase is captured
//! verbatim so a downstream consumer can resolve the reference.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::model::{Issue, QuestionContent};

lazy_static! {
    /// The single media-cue vocabulary, shared by the classifier and the
    /// flag engine so a block classified as a media reference always gets
    /// the matching flag, and vice versa.
    pub(crate) static ref MEDIA_CUE: Regex =
        Regex::new(r"(?i)\b(?:v[ií]deo|audio|grabaci[oó]n|multimedia|reproduce)\b").unwrap();
}

/// Extract content for an external-media-reference question.
pub fn extract_media_reference(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    // First line that mentions the media, verbatim; the whole block as a
    // last resort so the reference is never lost.
    let reference_text = block_text
        .lines()
        .find(|line| MEDIA_CUE.is_match(line))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| block_text.trim().to_string());

    (
        QuestionContent::ExternalMediaReference { reference_text },
        Vec::new(),
    )
}
