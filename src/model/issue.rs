//! Structured, non-fatal anomaly records.
//!
//! Every recoverable anomaly in the pipeline is captured as an [`Issue`]
//! attached to the producing question, or to the document when no question
//! is identifiable. Nothing in the text stages is surfaced as an error —
//! the governing policy is "fail soft, document everything".

use serde::Serialize;

/// Scope marker for issues not tied to a single question.
pub const DOCUMENT_SCOPE: &str = "document";

/// Severity of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Informational note, no action needed
    Info,
    /// Anomaly that degrades extraction quality
    Warn,
    /// Anomaly that lost content (e.g. a failed asset render)
    Error,
}

/// Closed set of issue codes.
///
/// The set is part of the output contract; downstream consumers match on it.
/// `KindDowngraded` and `IndexRemapped` are the Conformance Corrector's
/// correction codes; `HeaderFooterUncertain` is the Normalizer's and
/// Segmenter's informational code for text it could not confidently
/// attribute or strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Enumerated options present but with empty/whitespace-only text
    OptionsMissingText,
    /// Mathematical or logical notation at risk of loss in plain text
    MathTextLoss,
    /// Row/column structure of a table could not be recovered
    TableStructureLost,
    /// A correct-answer disclosure was expected but not found
    NoCorrectAnswerFound,
    /// The user's submitted answer could not be located
    UserAnswerNotFound,
    /// The question references media the document cannot carry
    ExternalMediaRequired,
    /// Partial credit detected (0 < awarded < max)
    PartialScoringDetected,
    /// A question kind was downgraded to satisfy structural invariants
    KindDowngraded,
    /// A number or index was remapped/inferred to satisfy the schema
    IndexRemapped,
    /// Header/footer or front-matter text handled with low confidence
    HeaderFooterUncertain,
}

/// A structured anomaly record with severity, code, location, and message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Severity level
    pub level: IssueLevel,
    /// Enumerated issue code (closed set)
    pub code: IssueCode,
    /// Question id ("Q7") or [`DOCUMENT_SCOPE`]
    #[serde(rename = "where")]
    pub where_: String,
    /// Human-readable detail
    pub msg: String,
}

impl Issue {
    /// Create an info-level issue.
    pub fn info(code: IssueCode, where_: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Info,
            code,
            where_: where_.into(),
            msg: msg.into(),
        }
    }

    /// Create a warn-level issue.
    pub fn warn(code: IssueCode, where_: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warn,
            code,
            where_: where_.into(),
            msg: msg.into(),
        }
    }

    /// Create an error-level issue.
    pub fn error(code: IssueCode, where_: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            code,
            where_: where_.into(),
            msg: msg.into(),
        }
    }
}
