//! Extraction for single-choice and multi-select questions.
//!
//! Options are lettered a–e. The user's selections are marked with a
//! checkmark on the option line; the correct keys are disclosed in the
//! "La respuesta correcta es:" / "Las respuestas correctas son:" section.
//! Options with empty text are kept (the flag engine turns them into an
//! asset request) rather than dropped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::{correct_section, correct_section_plural, has_check_mark, strip_marks};
use crate::model::{ChoiceOption, Issue, IssueCode, QuestionContent};

lazy_static! {
    /// Option start: a lettered key at the beginning of a line
    static ref RE_OPTION_START: Regex = Regex::new(r"^([a-eA-E])\.\s*(.*)$").unwrap();

    /// Lines that end the option list
    static ref RE_OPTION_LIST_END: Regex = Regex::new(
        r"^(?:La respuesta correcta|Las respuestas correctas|Se puntúa|¡Correcto!|¡Incorrecto!)"
    )
    .unwrap();

    /// A single answer key inside a disclosure fragment
    static ref RE_KEY: Regex = Regex::new(r"\b([a-eA-E])\b").unwrap();
}

/// Parse the lettered option list, keeping empty-text options, and the keys
/// the user checkmarked.
fn parse_options(block_text: &str) -> (Vec<ChoiceOption>, Vec<String>) {
    let mut options: Vec<ChoiceOption> = Vec::new();
    let mut user: Vec<String> = Vec::new();
    let mut open: Option<(String, Vec<String>, bool)> = None;

    let mut close =
        |open: &mut Option<(String, Vec<String>, bool)>,
         options: &mut Vec<ChoiceOption>,
         user: &mut Vec<String>| {
            if let Some((key, parts, checked)) = open.take() {
                if checked {
                    user.push(key.clone());
                }
                options.push(ChoiceOption {
                    key,
                    text: parts.join(" ").trim().to_string(),
                });
            }
        };

    for line in block_text.lines() {
        if let Some(caps) = RE_OPTION_START.captures(line) {
            close(&mut open, &mut options, &mut user);
            let key = caps[1].to_lowercase();
            let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            open = Some((key, vec![strip_marks(rest)], has_check_mark(line)));
            continue;
        }
        if RE_OPTION_LIST_END.is_match(line) {
            close(&mut open, &mut options, &mut user);
            continue;
        }
        if let Some((_, parts, checked)) = open.as_mut() {
            // Continuation of a wrapped option line
            parts.push(strip_marks(line));
            *checked = *checked || has_check_mark(line);
        }
    }
    close(&mut open, &mut options, &mut user);

    (options, user)
}

fn empty_option_issues(options: &[ChoiceOption], config: &PipelineConfig) -> Option<Issue> {
    let empty: Vec<&str> = options
        .iter()
        .filter(|o| o.text.trim().chars().count() < config.option_text_min_len)
        .map(|o| o.key.as_str())
        .collect();
    if empty.is_empty() {
        None
    } else {
        Some(Issue::warn(
            IssueCode::OptionsMissingText,
            "",
            format!("option(s) without text: {}", empty.join(", ")),
        ))
    }
}

/// Extract content for a single-choice question.
pub fn extract_single_choice(
    block_text: &str,
    config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let mut issues = Vec::new();
    let (options, user) = parse_options(block_text);

    // Every disclosed key is kept, even when the singular form lists more
    // than one. Enforcing the at-most-one contract (and recording the
    // truncation) belongs to the conformance pass, not to extraction.
    let correct: Vec<String> = match correct_section(block_text)
        .or_else(|| correct_section_plural(block_text))
    {
        Some(section) => {
            let line = section.lines().next().unwrap_or("");
            RE_KEY
                .captures_iter(line)
                .map(|caps| caps[1].to_lowercase())
                .collect()
        }
        None => Vec::new(),
    };

    if let Some(issue) = empty_option_issues(&options, config) {
        issues.push(issue);
    }
    if user.is_empty() && !options.is_empty() {
        issues.push(Issue::warn(
            IssueCode::UserAnswerNotFound,
            "",
            "no checkmarked option found for the user's selection",
        ));
    }

    (
        QuestionContent::SingleChoice {
            options,
            correct,
            user,
        },
        issues,
    )
}

/// Extract content for a multi-select question.
pub fn extract_multi_select(
    block_text: &str,
    config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let mut issues = Vec::new();
    let (options, user) = parse_options(block_text);

    let correct: Vec<String> = match correct_section_plural(block_text)
        .or_else(|| correct_section(block_text))
    {
        Some(section) => {
            // Keys listed up to the end of the disclosure line
            let line = section.lines().next().unwrap_or("");
            RE_KEY
                .captures_iter(line)
                .map(|caps| caps[1].to_lowercase())
                .collect()
        }
        None => Vec::new(),
    };

    if let Some(issue) = empty_option_issues(&options, config) {
        issues.push(issue);
    }
    if user.is_empty() && !options.is_empty() {
        issues.push(Issue::warn(
            IssueCode::UserAnswerNotFound,
            "",
            "no checkmarked option found for the user's selection",
        ));
    }

    (
        QuestionContent::MultiSelect {
            options,
            correct,
            user,
        },
        issues,
    )
}
