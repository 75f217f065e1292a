//! Canonical data model for parsed exam documents.
//!
//! These types define the produced contract of the pipeline: the
//! [`ExamDocument`] value is the core's sole externally observable output.
//! All entities are created within one pipeline run and are immutable once
//! returned; there is no cross-run mutation or shared ownership.

mod content;
mod issue;

pub use content::{
    ChoiceOption, LabeledBlank, MatchPair, MultipartItem, NumericFormat, QuestionContent,
    QuestionKind, TableContent,
};
pub use issue::{Issue, IssueCode, IssueLevel, DOCUMENT_SCOPE};

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::Result;

/// Fixed schema version of the produced contract.
pub const SCHEMA_VERSION: &str = "1.0";

/// Fixed document-family tag for the supported layout family.
pub const DOC_TYPE: &str = "moodle_attempt_review";

/// Metadata about the source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub doc_type: String,
    pub page_count: usize,
}

/// Asset type. The core only ever produces `FullPage`; `PageClip` is part of
/// the contract for renderers that clip to a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    FullPage,
    PageClip,
}

/// An externally rendered image artifact referenced by a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// 0-based page index the asset was rendered from
    pub page: usize,
    /// Clip rectangle; `None` for full-page assets
    pub bbox: Option<[f64; 4]>,
    /// Opaque file handle assigned by the external renderer
    pub file: String,
}

/// Question stem: prompt text plus any preserved visual assets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stem {
    pub text: String,
    pub assets: Vec<Asset>,
}

/// Correction status disclosed at the top of a question block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradingStatus {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

/// Grading information for a question. All fields are independently
/// nullable: an unanswered or uncorrected question carries nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingInfo {
    pub status: Option<GradingStatus>,
    pub score_awarded: Option<f64>,
    pub score_max: Option<f64>,
    pub penalty_rule_text: Option<String>,
    pub feedback: Option<String>,
}

impl GradingInfo {
    /// True when no sub-result was found at all.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.score_awarded.is_none()
            && self.score_max.is_none()
            && self.penalty_rule_text.is_none()
            && self.feedback.is_none()
    }
}

/// Verbatim block text and page provenance. Always populated, even when
/// structured extraction fails — information is never discarded, only
/// annotated with an issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawBlock {
    pub block_text: String,
    /// 0-based page indices in encounter order; never empty
    pub pages: Vec<usize>,
}

/// Cross-cutting boolean flags, independent of `kind`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// A visual asset must preserve content the text could not carry
    pub asset_required: bool,
    /// Logic/math notation at risk of loss in plain text
    pub math_or_symbols_risky: bool,
    /// The question references media outside the document
    pub requires_external_media: bool,
}

/// A single extracted question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    /// Deterministically derived from `number` ("Q7")
    pub id: String,
    /// Question number as printed in the document
    pub number: u32,
    pub kind: QuestionKind,
    pub stem: Stem,
    pub grading: Option<GradingInfo>,
    pub content: QuestionContent,
    pub raw: RawBlock,
    pub flags: Flags,
    pub issues: Vec<Issue>,
}

impl Question {
    /// Derive the stable question id from its printed number.
    pub fn id_for(number: u32) -> String {
        format!("Q{}", number)
    }
}

/// Segmenter output: one contiguous span of normalized text attributed to a
/// question, before typing and extraction. Consumed by the classifier and
/// extractor stages; never serialized or exposed externally.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBlock {
    /// Question number as printed, or inferred by sequential continuation
    pub number: u32,
    /// Pages the block's lines originate from, in encounter order
    pub pages: IndexSet<usize>,
    /// Concatenated block text
    pub text: String,
    /// Issues raised while delimiting this block (e.g. inferred numbering)
    pub issues: Vec<Issue>,
}

/// Root value of the produced contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamDocument {
    pub schema_version: String,
    pub source: SourceInfo,
    /// Questions in document order
    pub questions: Vec<Question>,
    /// Issues not tied to one question
    pub issues: Vec<Issue>,
}

impl ExamDocument {
    /// Serialize to pretty JSON, the shape downstream schema checkers
    /// validate. Field order is fixed by the struct definitions, so equal
    /// documents serialize byte-identically.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
