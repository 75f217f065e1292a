//! Extraction for matching (association) questions.
//!
//! Correct pairs come from the "La respuesta correcta es:" section as a
//! comma-separated list of `left → right` entries; the user's submitted
//! pairs are recovered from checkmarked lines. Unordered listing is
//! tolerated — pairs keep their disclosure order but no order is implied.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::{correct_section, has_check_mark, strip_marks};
use crate::model::{Issue, IssueCode, MatchPair, QuestionContent};

lazy_static! {
    /// One `left → right` pair inside a disclosure segment
    static ref RE_PAIR: Regex = Regex::new(r"^(.+?)\s*(?:→|->)\s*(.+)$").unwrap();

    /// Association phrase carrying a domain hint
    /// ("Asocia las siguientes fórmulas con …")
    static ref RE_DOMAIN_HINT: Regex = Regex::new(
        r"(?i)(?:Asocia|Empareja|Relaciona)\s+(?:las?|los?)\s+siguientes?\s+(\p{L}+)"
    )
    .unwrap();
}

fn clean_side(side: &str) -> String {
    strip_marks(side)
        .trim_matches(|c| c == '"' || c == '\'' || c == '«' || c == '»')
        .trim()
        .to_string()
}

/// Parse `left → right, left → right, …` from a disclosure fragment.
fn parse_pairs(section: &str) -> Vec<MatchPair> {
    let mut pairs = Vec::new();
    // The disclosure is one logical list; commas separate entries and never
    // appear inside the short left-hand terms this family uses.
    for segment in section.split(',') {
        if let Some(caps) = RE_PAIR.captures(segment.trim()) {
            let left = clean_side(&caps[1]);
            let right = clean_side(&caps[2]);
            if !left.is_empty() && !right.is_empty() {
                pairs.push(MatchPair { left, right });
            }
        }
    }
    pairs
}

/// Extract content for a matching question.
pub fn extract_matching(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let mut issues = Vec::new();

    let pairs_correct = match correct_section(block_text) {
        Some(section) => parse_pairs(section.lines().next().unwrap_or(section)),
        None => {
            issues.push(Issue::warn(
                IssueCode::NoCorrectAnswerFound,
                "",
                "matching question without a correct-pairs section",
            ));
            Vec::new()
        }
    };

    // User pairs: the platform renders the selected right-hand term with a
    // checkmark under the left-hand term it was assigned to.
    let mut pairs_user: Vec<MatchPair> = Vec::new();
    let lines: Vec<&str> = block_text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !has_check_mark(line) {
            continue;
        }
        if let Some(caps) = RE_PAIR.captures(line) {
            // Arrowed form on one line: "left → right ☑"
            let pair = MatchPair {
                left: clean_side(&caps[1]),
                right: clean_side(&caps[2]),
            };
            if !pair.left.is_empty() && !pair.right.is_empty() && !pairs_user.contains(&pair) {
                pairs_user.push(pair);
            }
            continue;
        }
        if i == 0 {
            continue;
        }
        let left = clean_side(lines[i - 1]);
        let right = clean_side(line);
        // Short fragments are layout noise, not terms
        if left.chars().count() > 2 && right.chars().count() > 2 {
            let pair = MatchPair { left, right };
            if !pairs_user.contains(&pair) {
                pairs_user.push(pair);
            }
        }
    }

    if pairs_user.is_empty() {
        issues.push(Issue::warn(
            IssueCode::UserAnswerNotFound,
            "",
            "no checkmarked associations found for the user's submission",
        ));
    }

    let domain_hint = RE_DOMAIN_HINT
        .captures(block_text)
        .map(|caps| caps[1].to_string());

    (
        QuestionContent::Matching {
            pairs_user,
            pairs_correct,
            domain_hint,
        },
        issues,
    )
}
