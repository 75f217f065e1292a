//! Extraction for cloze questions: labeled blanks and table completion.
//!
//! Labeled blanks ("TP: 5") pair a short label with expected and user
//! values; the disclosure section refines the expected side. Table
//! completion attempts to recover a row/column structure from delimited
//! lines; when the layout collapsed into plain prose the table is `None`
//! and the page asset preserves the visual (the flag engine reacts to the
//! `TABLE_STRUCTURE_LOST` issue emitted here).

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::{correct_section, has_check_mark, strip_marks};
use crate::model::{Issue, IssueCode, LabeledBlank, QuestionContent, TableContent};

lazy_static! {
    /// Start of the correct-answer disclosure
    static ref RE_DISCLOSURE_START: Regex =
        Regex::new(r"(?i)La respuesta correcta es:").unwrap();

    /// A labeled blank line: short label, colon, value
    static ref RE_BLANK_LINE: Regex =
        Regex::new(r"^([A-Za-zÁÉÍÓÚÜÑáéíóúüñ]{1,4})\s*:\s*(.+)$").unwrap();

    /// A `label: value` or `label → value` entry inside the disclosure
    static ref RE_BLANK_DISCLOSED: Regex =
        Regex::new(r"([A-Za-zÁÉÍÓÚÜÑáéíóúüñ]{1,4})\s*(?::|→|->)\s*([^,]+)").unwrap();

    /// Cell delimiters that survive text extraction
    static ref RE_CELL_SPLIT: Regex = Regex::new(r"\s*[|;\t]\s*").unwrap();
}

/// Extract content for a cloze question with labeled blanks.
pub fn extract_labeled_blanks(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let mut issues = Vec::new();
    let mut blanks: IndexMap<String, LabeledBlank> = IndexMap::new();

    let disclosure_start = RE_DISCLOSURE_START
        .find(block_text)
        .map(|m| m.start())
        .unwrap_or(block_text.len());

    // Body lines: a checkmarked value is the user's entry, a bare one the
    // printed expected value.
    for line in block_text[..disclosure_start].lines() {
        if let Some(caps) = RE_BLANK_LINE.captures(line) {
            let label = caps[1].to_string();
            let value = strip_marks(&caps[2]);
            if value.is_empty() {
                blanks.entry(label.clone()).or_insert(LabeledBlank {
                    label,
                    expected: None,
                    user: None,
                });
                continue;
            }
            let entry = blanks.entry(label.clone()).or_insert(LabeledBlank {
                label,
                expected: None,
                user: None,
            });
            if has_check_mark(line) {
                entry.user.get_or_insert(value);
            } else {
                entry.expected.get_or_insert(value);
            }
        }
    }

    // Disclosure refines the expected values.
    if let Some(section) = correct_section(block_text) {
        let line = section.lines().next().unwrap_or(section);
        for caps in RE_BLANK_DISCLOSED.captures_iter(line) {
            let label = caps[1].to_string();
            let value = strip_marks(caps[2].trim().trim_end_matches('.'));
            let entry = blanks.entry(label.clone()).or_insert(LabeledBlank {
                label,
                expected: None,
                user: None,
            });
            entry.expected = Some(value);
        }
    }

    if blanks.is_empty() {
        issues.push(Issue::warn(
            IssueCode::NoCorrectAnswerFound,
            "",
            "no labeled blanks recovered from the block",
        ));
    }

    (
        QuestionContent::ClozeLabeledBlanks {
            blanks: blanks.into_values().collect(),
        },
        issues,
    )
}

/// Attempt to recover a row/column structure for a table-completion
/// question. Rows must share a consistent column count of at least two.
fn recover_table(block_text: &str) -> Option<TableContent> {
    let rows: Vec<Vec<String>> = block_text
        .lines()
        .filter(|line| line.contains('|') || line.contains(';') || line.contains('\t'))
        .map(|line| {
            RE_CELL_SPLIT
                .split(line.trim().trim_matches('|'))
                .map(|cell| strip_marks(cell))
                .collect()
        })
        .collect();

    if rows.len() < 2 {
        return None;
    }
    let columns = rows[0].len();
    if columns < 2 || rows.iter().any(|row| row.len() != columns) {
        return None;
    }

    let mut rows = rows;
    let header = rows.remove(0);
    Some(TableContent { header, rows })
}

/// Extract content for a table-completion question.
pub fn extract_cloze_table(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    match recover_table(block_text) {
        Some(table) => (QuestionContent::ClozeTable { table: Some(table) }, Vec::new()),
        None => (
            QuestionContent::ClozeTable { table: None },
            vec![Issue::warn(
                IssueCode::TableStructureLost,
                "",
                "table structure could not be recovered from extracted text",
            )],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_blanks_with_user_marks_and_disclosure() {
        let config = PipelineConfig::default();
        let text = "Calcula los totales.\n\
            TP: 12 ☑\n\
            TN: 3 ☑\n\
            La respuesta correcta es: TP: 12, TN: 5";
        let (content, issues) = extract_labeled_blanks(text, &config);
        match content {
            QuestionContent::ClozeLabeledBlanks { blanks } => {
                assert_eq!(blanks.len(), 2);
                assert_eq!(blanks[0].label, "TP");
                assert_eq!(blanks[0].user.as_deref(), Some("12"));
                assert_eq!(blanks[0].expected.as_deref(), Some("12"));
                assert_eq!(blanks[1].user.as_deref(), Some("3"));
                assert_eq!(blanks[1].expected.as_deref(), Some("5"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
        assert!(issues.is_empty());
    }

    #[test]
    fn test_no_blanks_reported() {
        let config = PipelineConfig::default();
        let (content, issues) = extract_labeled_blanks("sin etiquetas", &config);
        match content {
            QuestionContent::ClozeLabeledBlanks { blanks } => assert!(blanks.is_empty()),
            other => panic!("wrong variant: {:?}", other),
        }
        assert!(issues.iter().any(|i| i.code == IssueCode::NoCorrectAnswerFound));
    }

    #[test]
    fn test_table_recovered_from_delimited_lines() {
        let config = PipelineConfig::default();
        let text = "Completa la tabla de verdad\n\
            p | q | p ∧ q\n\
            V | V | V\n\
            V | F | F";
        let (content, issues) = extract_cloze_table(text, &config);
        match content {
            QuestionContent::ClozeTable { table: Some(table) } => {
                assert_eq!(table.header, vec!["p", "q", "p ∧ q"]);
                assert_eq!(table.rows.len(), 2);
                assert_eq!(table.rows[1], vec!["V", "F", "F"]);
            }
            other => panic!("wrong variant: {:?}", other),
        }
        assert!(issues.is_empty());
    }

    #[test]
    fn test_collapsed_table_degrades_with_issue() {
        let config = PipelineConfig::default();
        let text = "Completa la tabla de verdad\np q V V F F";
        let (content, issues) = extract_cloze_table(text, &config);
        match content {
            QuestionContent::ClozeTable { table } => assert!(table.is_none()),
            other => panic!("wrong variant: {:?}", other),
        }
        assert!(issues.iter().any(|i| i.code == IssueCode::TableStructureLost));
    }
}
