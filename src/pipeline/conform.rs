//! Conformance correction: the final pass enforcing the output contract.
//!
//! Structural promises the schema makes (at most one correct key on a
//! single choice, at least two options on a multi-select, 1-based item
//! indices, non-empty page provenance) are enforced here rather than
//! trusted from extraction. Every correction is recorded as an issue on the
//! question; corrections are never silent.

use log::debug;

use crate::model::{Issue, IssueCode, Question, QuestionContent};

/// Apply structural corrections to a question, recording each as an issue.
pub fn apply_corrections(mut question: Question) -> Question {
    let id = question.id.clone();

    match &mut question.content {
        QuestionContent::SingleChoice { correct, .. } if correct.len() > 1 => {
            let dropped = correct.split_off(1);
            debug!("{}: dropped extra correct keys {:?}", id, dropped);
            question.issues.push(Issue::warn(
                IssueCode::IndexRemapped,
                &id,
                format!(
                    "single choice disclosed {} correct keys; kept \"{}\"",
                    dropped.len() + 1,
                    correct[0]
                ),
            ));
        }
        QuestionContent::MultiSelect { options, user, .. } if options.len() < 2 => {
            let expected: Vec<String> = options
                .iter()
                .map(|option| option.text.clone())
                .filter(|text| !text.trim().is_empty())
                .collect();
            let user_text = user.first().and_then(|key| {
                options
                    .iter()
                    .find(|option| &option.key == key)
                    .map(|option| option.text.clone())
            });
            debug!("{}: multi select with {} options downgraded", id, options.len());
            question.issues.push(Issue::warn(
                IssueCode::KindDowngraded,
                &id,
                format!(
                    "multi select with {} option(s) downgraded to short answer",
                    options.len()
                ),
            ));
            question.content = QuestionContent::ShortAnswerText {
                expected,
                user: user_text,
            };
            question.kind = question.content.kind();
        }
        QuestionContent::MultipartShortAnswer { items } if items.len() < 2 => {
            let expected: Vec<String> = items
                .iter()
                .filter_map(|item| item.expected.clone())
                .collect();
            let user = items.iter().find_map(|item| item.user.clone());
            debug!("{}: multipart with {} item(s) downgraded", id, items.len());
            question.issues.push(Issue::warn(
                IssueCode::KindDowngraded,
                &id,
                format!(
                    "multipart with {} item(s) downgraded to short answer",
                    items.len()
                ),
            ));
            question.content = QuestionContent::ShortAnswerText { expected, user };
            question.kind = question.content.kind();
        }
        QuestionContent::MultipartShortAnswer { items } => {
            if items.iter().any(|item| item.index < 1) {
                for (i, item) in items.iter_mut().enumerate() {
                    item.index = (i + 1) as u32;
                }
                debug!("{}: item indices remapped to 1-based sequence", id);
                question.issues.push(Issue::warn(
                    IssueCode::IndexRemapped,
                    &id,
                    "item indices below 1 remapped to a 1-based sequence",
                ));
            }
        }
        _ => {}
    }

    // Page provenance must never be empty.
    if question.raw.pages.is_empty() {
        question.raw.pages.push(0);
        question.issues.push(Issue::info(
            IssueCode::IndexRemapped,
            &id,
            "no page provenance recorded; defaulted to page 0",
        ));
    }

    question
}
