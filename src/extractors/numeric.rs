//! Extraction for numeric questions.
//!
//! Expected and user values honor the decimal separator actually used in
//! the document (comma or period). Formatting hints — requested rounding
//! and tolerance — are mined from the prompt text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::parse_decimal;
use crate::model::{Issue, NumericFormat, QuestionContent};

lazy_static! {
    /// Disclosed correct value
    static ref RE_EXPECTED: Regex =
        Regex::new(r"(?i)La respuesta correcta es:\s*([-+]?\d+(?:[.,]\d+)?)").unwrap();

    /// User's submitted value behind an answer label
    static ref RE_USER: Regex =
        Regex::new(r"(?m)^(?:Respuesta|Valor):\s*([-+]?\d+(?:[.,]\d+)?)").unwrap();

    /// Requested rounding ("redondea a 2 decimales")
    static ref RE_ROUND: Regex =
        Regex::new(r"(?i)redondea(?:ndo)?\s+a\s+(\d+)\s+decimal").unwrap();

    /// Accepted tolerance ("tolerancia de 0,01")
    static ref RE_TOLERANCE: Regex =
        Regex::new(r"(?i)tolerancia\s+de\s+([-+]?\d+(?:[.,]\d+)?)").unwrap();
}

/// Extract content for a numeric question.
pub fn extract_numeric(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let issues = Vec::new();

    let expected_raw = RE_EXPECTED
        .captures(block_text)
        .and_then(|caps| parse_decimal(&caps[1]));
    let user_raw = RE_USER
        .captures(block_text)
        .and_then(|caps| parse_decimal(&caps[1]));

    // Without a disclosure the answer-label value is the only number the
    // block states; it doubles as the expected value. The grading extractor
    // reports the missing disclosure.
    let expected = expected_raw.or(user_raw);

    let separator = expected_raw
        .or(user_raw)
        .map(|(_, sep)| sep)
        .unwrap_or('.');

    let round_decimals = RE_ROUND
        .captures(block_text)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    let tolerance = RE_TOLERANCE
        .captures(block_text)
        .and_then(|caps| parse_decimal(&caps[1]))
        .map(|(v, _)| v);

    (
        QuestionContent::Numeric {
            expected: expected.map(|(v, _)| v),
            user: user_raw.map(|(v, _)| v),
            numeric_format: NumericFormat {
                decimal_separator: separator.to_string(),
                round_decimals,
                tolerance,
            },
        },
        issues,
    )
}
