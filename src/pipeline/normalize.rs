//! Normalization of raw per-page text lines.
//!
//! Digital extraction yields inconsistent whitespace, non-breaking spaces
//! and running headers/footers repeated on every page. This stage cleans
//! each line, repairs common artifacts in question-numbering tokens, and
//! strips lines that recur near-verbatim across a majority of pages at a
//! stable vertical band.
//!
//! The stage never fails: in the worst case it returns the lines unchanged
//! plus an informational issue when header/footer removal confidence is low.
//! Line cleaning is idempotent — normalizing already-normalized text is a
//! no-op.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::model::{Issue, IssueCode, DOCUMENT_SCOPE};
use crate::source::PageText;

lazy_static! {
    /// Runs of whitespace (including NBSP and other exotic spaces)
    static ref RE_WHITESPACE: Regex = Regex::new(r"[\s\u{a0}\u{2007}\u{202f}]+").unwrap();

    /// Question-number heading with the space lost during extraction
    /// ("Pregunta7" → "Pregunta 7")
    static ref RE_NUMBERING_REPAIR: Regex = Regex::new(r"^(Pregunta)(\d)").unwrap();

    /// Digit runs, collapsed when keying recurring header/footer candidates
    /// so "Página 3 de 9" matches "Página 7 de 9"
    static ref RE_DIGITS: Regex = Regex::new(r"\d+").unwrap();
}

/// A page after normalization: cleaned, non-empty lines in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPage {
    pub lines: Vec<String>,
}

/// Clean a single line: unify whitespace, strip control characters, repair
/// numbering tokens, trim. Idempotent.
pub fn normalize_line(line: &str) -> String {
    let without_controls: String = line
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect();
    let collapsed = RE_WHITESPACE.replace_all(&without_controls, " ");
    let trimmed = collapsed.trim();
    RE_NUMBERING_REPAIR.replace(trimmed, "$1 $2").into_owned()
}

/// Key under which a line participates in header/footer recurrence counting.
fn recurrence_key(line: &str) -> String {
    RE_DIGITS.replace_all(line, "#").to_lowercase()
}

/// Normalize all pages: per-line cleaning plus running header/footer removal.
///
/// A line is a header/footer candidate when it sits within the configured
/// vertical band at the top or bottom of its page. Candidates whose
/// digit-collapsed text recurs on at least `header_footer_confident_ratio`
/// of the pages are stripped; candidates between `header_footer_page_ratio`
/// and the confident threshold are kept and reported with an informational
/// issue. Documents with fewer than 3 pages skip stripping entirely.
pub fn normalize_pages(
    pages: &[PageText],
    config: &PipelineConfig,
) -> (Vec<NormalizedPage>, Vec<Issue>) {
    let mut issues = Vec::new();

    // Pass 1: clean lines, remember which sit in the extremal bands.
    // banded[page] holds (line index within cleaned page, recurrence key).
    let mut cleaned: Vec<Vec<String>> = Vec::with_capacity(pages.len());
    let mut banded: Vec<Vec<(usize, String)>> = Vec::with_capacity(pages.len());

    for page in pages {
        let (y_min, y_max) = page
            .lines
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), line| {
                (lo.min(line.y), hi.max(line.y))
            });
        let band = (y_max - y_min) * config.header_footer_band;

        let mut page_lines = Vec::new();
        let mut page_banded = Vec::new();
        for line in &page.lines {
            let text = normalize_line(&line.text);
            if text.is_empty() {
                continue;
            }
            let in_band = page.lines.len() > 1
                && (line.y - y_min <= band || y_max - line.y <= band);
            if in_band {
                page_banded.push((page_lines.len(), recurrence_key(&text)));
            }
            page_lines.push(text);
        }
        cleaned.push(page_lines);
        banded.push(page_banded);
    }

    if pages.len() < 3 {
        let normalized = cleaned
            .into_iter()
            .map(|lines| NormalizedPage { lines })
            .collect();
        return (normalized, issues);
    }

    // Pass 2: count, per recurrence key, the distinct pages carrying it in a
    // band, then strip the confident ones.
    let mut key_pages: HashMap<String, Vec<usize>> = HashMap::new();
    for (page_index, page_banded) in banded.iter().enumerate() {
        for (_, key) in page_banded {
            let entry = key_pages.entry(key.clone()).or_default();
            if entry.last() != Some(&page_index) {
                entry.push(page_index);
            }
        }
    }

    let page_count = pages.len() as f64;
    let mut strip_keys: Vec<&String> = Vec::new();
    let mut uncertain: Vec<&String> = Vec::new();
    for (key, on_pages) in &key_pages {
        let ratio = on_pages.len() as f64 / page_count;
        if ratio >= config.header_footer_confident_ratio {
            strip_keys.push(key);
        } else if ratio >= config.header_footer_page_ratio {
            uncertain.push(key);
        }
    }
    // HashMap iteration order must not leak into the output
    strip_keys.sort();
    uncertain.sort();

    for key in &uncertain {
        issues.push(Issue::info(
            IssueCode::HeaderFooterUncertain,
            DOCUMENT_SCOPE,
            format!(
                "recurring line kept (below strip confidence): {:?}",
                key
            ),
        ));
    }

    let normalized = cleaned
        .into_iter()
        .zip(banded.iter())
        .map(|(lines, page_banded)| {
            let lines = lines
                .into_iter()
                .enumerate()
                .filter(|(i, _)| {
                    !page_banded
                        .iter()
                        .any(|(bi, key)| bi == i && strip_keys.contains(&key))
                })
                .map(|(_, line)| line)
                .collect();
            NormalizedPage { lines }
        })
        .collect();

    debug!(
        "normalized {} pages, stripped {} recurring header/footer keys",
        pages.len(),
        strip_keys.len()
    );
    (normalized, issues)
}
