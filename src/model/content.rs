//! Question kinds and kind-specific content payloads.
//!
//! `QuestionKind` is the closed-set discriminator; `QuestionContent` is the
//! tagged variant payload whose shape depends on the kind. The two are kept
//! as separate fields on [`Question`](crate::model::Question) to match the
//! produced JSON contract, where `kind` is a string field and `content` is a
//! kind-shaped object. Exhaustiveness checking on the enum replaces the
//! runtime shape validation a loose map would need.

use serde::Serialize;

/// The closed set of question kinds. Never an "unknown" sentinel: the
/// classifier falls back to `ShortAnswerText` when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultiSelect,
    Matching,
    ShortAnswerText,
    Numeric,
    ClozeLabeledBlanks,
    ClozeTable,
    MultipartShortAnswer,
    ExternalMediaReference,
}

impl QuestionKind {
    /// Stable lowercase name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultiSelect => "multi_select",
            Self::Matching => "matching",
            Self::ShortAnswerText => "short_answer_text",
            Self::Numeric => "numeric",
            Self::ClozeLabeledBlanks => "cloze_labeled_blanks",
            Self::ClozeTable => "cloze_table",
            Self::MultipartShortAnswer => "multipart_short_answer",
            Self::ExternalMediaReference => "external_media_reference",
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enumerated option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    /// Option key, a single lowercase letter a–e
    pub key: String,
    /// Option text; may be empty when the source carried only an image
    pub text: String,
}

/// A left/right association of a matching question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

/// Numeric formatting hints mined from the prompt text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericFormat {
    /// Decimal separator observed in the answer values ("," or ".")
    pub decimal_separator: String,
    /// Requested rounding (decimal places), when the prompt asks for one
    pub round_decimals: Option<u32>,
    /// Accepted tolerance, when the prompt discloses one
    pub tolerance: Option<f64>,
}

impl Default for NumericFormat {
    fn default() -> Self {
        Self {
            decimal_separator: ".".to_string(),
            round_decimals: None,
            tolerance: None,
        }
    }
}

/// A labeled blank (`TP: …`) with expected and user values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledBlank {
    pub label: String,
    pub expected: Option<String>,
    pub user: Option<String>,
}

/// One ordered sub-item of a multipart short-answer question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipartItem {
    /// 1-based position as printed in the document
    pub index: u32,
    pub prompt: String,
    pub expected: Option<String>,
    pub user: Option<String>,
    /// Nested labeled sub-answers, when the item carries them
    pub subitems: Vec<LabeledBlank>,
}

/// Recovered row/column structure of a table-completion question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableContent {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Kind-specific content payload.
///
/// Serialized untagged: the JSON `content` object carries only the payload
/// fields, with the sibling `kind` field acting as the discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuestionContent {
    SingleChoice {
        options: Vec<ChoiceOption>,
        /// At most one key after conformance correction
        correct: Vec<String>,
        user: Vec<String>,
    },
    MultiSelect {
        options: Vec<ChoiceOption>,
        correct: Vec<String>,
        user: Vec<String>,
    },
    Matching {
        pairs_user: Vec<MatchPair>,
        pairs_correct: Vec<MatchPair>,
        domain_hint: Option<String>,
    },
    ShortAnswerText {
        expected: Vec<String>,
        user: Option<String>,
    },
    Numeric {
        expected: Option<f64>,
        user: Option<f64>,
        numeric_format: NumericFormat,
    },
    ClozeLabeledBlanks {
        blanks: Vec<LabeledBlank>,
    },
    ClozeTable {
        /// `None` when the row/column structure could not be recovered
        table: Option<TableContent>,
    },
    MultipartShortAnswer {
        items: Vec<MultipartItem>,
    },
    ExternalMediaReference {
        /// The referencing phrase, captured verbatim
        reference_text: String,
    },
}

impl QuestionContent {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::SingleChoice { .. } => QuestionKind::SingleChoice,
            Self::MultiSelect { .. } => QuestionKind::MultiSelect,
            Self::Matching { .. } => QuestionKind::Matching,
            Self::ShortAnswerText { .. } => QuestionKind::ShortAnswerText,
            Self::Numeric { .. } => QuestionKind::Numeric,
            Self::ClozeLabeledBlanks { .. } => QuestionKind::ClozeLabeledBlanks,
            Self::ClozeTable { .. } => QuestionKind::ClozeTable,
            Self::MultipartShortAnswer { .. } => QuestionKind::MultipartShortAnswer,
            Self::ExternalMediaReference { .. } => QuestionKind::ExternalMediaReference,
        }
    }

    /// True when some extracted slot that should carry text is empty.
    ///
    /// Drives the `asset_required` flag: an empty option or prompt means the
    /// source showed something (an image, a formula) the text extraction
    /// could not carry.
    pub fn has_empty_text_slots(&self, min_len: usize) -> bool {
        match self {
            Self::SingleChoice { options, .. } | Self::MultiSelect { options, .. } => options
                .iter()
                .any(|option| option.text.trim().chars().count() < min_len),
            Self::MultipartShortAnswer { items } => items
                .iter()
                .any(|item| item.prompt.trim().chars().count() < min_len),
            _ => false,
        }
    }
}
