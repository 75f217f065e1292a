//! Unified configuration for the extraction pipeline.
//!
//! All tunable thresholds live here so that calibration changes are a
//! one-place edit. The defaults are calibrated against attempt-review
//! exports from Moodle-family platforms (Spanish cue set).

/// Configuration for a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fraction of pages on which a near-verbatim line (at a stable vertical
    /// band) must recur before it is considered a running header/footer
    /// candidate at all.
    pub header_footer_page_ratio: f64,

    /// Fraction of pages above which a header/footer candidate is stripped
    /// without a confidence note. Candidates between
    /// `header_footer_page_ratio` and this value are kept and reported with
    /// an informational issue instead.
    pub header_footer_confident_ratio: f64,

    /// Fraction of a page's vertical extent (measured from the top and from
    /// the bottom) inside which a line is eligible as a header/footer.
    pub header_footer_band: f32,

    /// Minimum number of pairing arrows in the correct-answer section for a
    /// block to classify as `matching` when no association cue is present.
    ///
    /// A single arrow with no association word is too weak a signal; see
    /// DESIGN.md for the chosen cutoff rationale.
    pub matching_arrow_min: usize,

    /// Minimum trimmed length for option/label text before it counts as
    /// "missing" for `OPTIONS_MISSING_TEXT` and the `asset_required` flag.
    pub option_text_min_len: usize,

    /// Maximum captured length for trailing feedback text.
    pub feedback_max_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            header_footer_page_ratio: 0.6,
            header_footer_confident_ratio: 0.8,
            header_footer_band: 0.1,
            matching_arrow_min: 2,
            option_text_min_len: 1,
            feedback_max_len: 500,
        }
    }
}
