//! Cross-cutting flag evaluation and asset requests.
//!
//! Flags are OR-combinations of independently testable sub-conditions over
//! the block text and the already-extracted content; evaluation order never
//! changes the result. When `asset_required` holds, one full-page render is
//! requested per page the question spans. Render failures degrade to zero
//! assets plus an error-level issue; the pipeline never aborts on them.

use log::warn;

use crate::config::PipelineConfig;
use crate::extractors::media::MEDIA_CUE;
use crate::model::{Asset, AssetType, Flags, Issue, IssueCode, QuestionContent};
use crate::source::PageRenderer;

/// Logic/math symbols whose plain-text rendering is unreliable. The plain
/// arrow is absent: it doubles as the pair separator of matching questions.
const MATH_SYMBOLS: &[char] = &[
    '¬', '∧', '∨', '↔', '∀', '∃', '⊨', '⊢', '≡', '⊕', '⊥', '⊤', '∈', '⊆', '∅', '≤', '≥', '≠',
    '√', '∑', '∫', 'π',
];

/// ASCII fallbacks for logic notation, produced when extraction mangles the
/// original symbols.
const FRAGILE_TOKENS: &[&str] = &["|=", "|-", "<=>", "=>"];

/// Visual-reference keywords; matched case-insensitively anywhere in the
/// block.
const VISUAL_KEYWORDS: &[&str] = &[
    "figura",
    "tabla de verdad",
    "árbol",
    "grafo",
    "diagrama",
    "gráfico",
    "imagen",
];

fn has_math_notation(text: &str) -> bool {
    text.chars().any(|c| MATH_SYMBOLS.contains(&c))
        || FRAGILE_TOKENS.iter().any(|token| text.contains(token))
}

fn has_visual_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    VISUAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Evaluate the cross-cutting flags for a block.
pub fn evaluate_flags(
    block_text: &str,
    content: &QuestionContent,
    config: &PipelineConfig,
) -> (Flags, Vec<Issue>) {
    let mut issues = Vec::new();

    let math_or_symbols_risky = has_math_notation(block_text);
    let visual_reference = has_visual_keyword(block_text);

    let table_lost = matches!(content, QuestionContent::ClozeTable { table: None });
    let asset_required = visual_reference
        || math_or_symbols_risky
        || table_lost
        || content.has_empty_text_slots(config.option_text_min_len);

    let requires_external_media = MEDIA_CUE.is_match(block_text);

    if math_or_symbols_risky {
        issues.push(Issue::warn(
            IssueCode::MathTextLoss,
            "",
            "logic/math notation present; plain text may have lost formatting",
        ));
    } else if visual_reference {
        issues.push(Issue::warn(
            IssueCode::MathTextLoss,
            "",
            "visual reference present; plain text cannot carry it",
        ));
    }
    if requires_external_media {
        issues.push(Issue::info(
            IssueCode::ExternalMediaRequired,
            "",
            "question references media outside the document",
        ));
    }

    (
        Flags {
            asset_required,
            math_or_symbols_risky,
            requires_external_media,
        },
        issues,
    )
}

/// Request one full-page render per page when the flags ask for assets.
///
/// Pages come in encounter order; the returned assets keep that order so
/// output stays deterministic for fixed renderer responses.
pub fn render_assets<'a>(
    flags: &Flags,
    pages: impl IntoIterator<Item = &'a usize>,
    renderer: Option<&dyn PageRenderer>,
) -> (Vec<Asset>, Vec<Issue>) {
    let mut assets = Vec::new();
    let mut issues = Vec::new();

    if !flags.asset_required {
        return (assets, issues);
    }

    let renderer = match renderer {
        Some(renderer) => renderer,
        None => {
            issues.push(Issue::warn(
                IssueCode::MathTextLoss,
                "",
                "asset required but no renderer was provided",
            ));
            return (assets, issues);
        }
    };

    for &page in pages {
        match renderer.render_full_page(page) {
            Ok(path) => assets.push(Asset {
                asset_type: AssetType::FullPage,
                page,
                bbox: None,
                file: path.to_string_lossy().into_owned(),
            }),
            Err(err) => {
                warn!("full-page render failed for page {}: {}", page, err);
                issues.push(Issue::error(
                    IssueCode::MathTextLoss,
                    "",
                    format!("page {} render failed: {}", page, err),
                ));
            }
        }
    }

    (assets, issues)
}
