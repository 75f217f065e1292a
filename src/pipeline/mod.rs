//! The exam extraction pipeline.
//!
//! A single synchronous pass per document through a strict stage chain:
//!
//! ```text
//! page lines → normalize → segment → classify → extract ┐
//!                                                       ├→ conform → ExamDocument
//!                            grading ─ flags ─ assets ──┘
//! ```
//!
//! Each stage consumes an immutable snapshot and produces a new value; issue
//! lists are concatenated by the orchestrator in stage order, so there is no
//! shared mutable sink. Given the same page lines and the same renderer
//! responses, two runs serialize byte-identically except for asset file
//! handles.

pub mod classify;
pub mod conform;
pub mod flags;
pub mod grading;
pub mod normalize;
pub mod segment;

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::extract_content;
use crate::model::{
    ExamDocument, Issue, IssueCode, Question, QuestionBlock, SourceInfo, Stem, DOC_TYPE,
    SCHEMA_VERSION,
};
use crate::source::{PageRenderer, PageText};

lazy_static! {
    /// Lines that end the stem: answer areas, disclosures, grading furniture.
    static ref RE_STEM_END: Regex = Regex::new(
        r"^(?:Seleccione una|[a-eA-E]\.\s|\d+\.\s|Respuesta:|Valor:|La respuesta correcta|Las respuestas correctas|¡Correcto!|¡Incorrecto!)"
    )
    .unwrap();

    /// Grading furniture skipped at the top of a block.
    static ref RE_STEM_SKIP: Regex = Regex::new(
        r"^(?:Correcta$|Incorrecta$|Parcialmente correcta$|Sin contestar$|Se puntúa )"
    )
    .unwrap();
}

/// The stem is the prompt text between the grading furniture at the top of
/// the block and the first answer-area cue.
fn derive_stem_text(block_text: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for line in block_text.lines() {
        if RE_STEM_SKIP.is_match(line) {
            continue;
        }
        if RE_STEM_END.is_match(line) {
            break;
        }
        parts.push(line);
    }
    parts.join(" ").trim().to_string()
}

/// Stamp the question id onto issues produced by stages that do not know it.
fn attribute(issues: Vec<Issue>, id: &str) -> Vec<Issue> {
    issues
        .into_iter()
        .map(|mut issue| {
            if issue.where_.is_empty() {
                issue.where_ = id.to_string();
            }
            issue
        })
        .collect()
}

/// The assembled pipeline. Construct once, process any number of documents;
/// each call owns its full output graph exclusively.
pub struct ExamPipeline {
    config: PipelineConfig,
}

impl ExamPipeline {
    /// Create a pipeline with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline with a custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one document's page lines into an [`ExamDocument`].
    ///
    /// `renderer` supplies full-page images when a question needs a visual
    /// asset; pass `None` to skip asset generation (an issue is recorded on
    /// each question that wanted one).
    pub fn process(
        &self,
        file_name: &str,
        pages: &[PageText],
        renderer: Option<&dyn PageRenderer>,
    ) -> ExamDocument {
        info!("processing {} ({} pages)", file_name, pages.len());

        let (normalized, mut document_issues) = normalize::normalize_pages(pages, &self.config);
        let (blocks, segment_issues) = segment::segment_pages(&normalized);
        document_issues.extend(segment_issues);

        if blocks.is_empty() {
            warn!("{}: no question blocks detected", file_name);
        }

        let questions: Vec<Question> = blocks
            .into_iter()
            .map(|block| self.build_question(block, renderer))
            .collect();

        info!(
            "{}: {} questions, {} document-level issues",
            file_name,
            questions.len(),
            document_issues.len()
        );

        ExamDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            source: SourceInfo {
                file_name: file_name.to_string(),
                doc_type: DOC_TYPE.to_string(),
                page_count: pages.len(),
            },
            questions,
            issues: document_issues,
        }
    }

    /// Run the per-question stages over one segmented block.
    fn build_question(
        &self,
        block: QuestionBlock,
        renderer: Option<&dyn PageRenderer>,
    ) -> Question {
        let id = Question::id_for(block.number);
        let mut issues = block.issues;

        let classification = classify::classify(&block.text, &self.config);
        debug!("{}: classified as {}", id, classification.kind);
        if classification.fell_back {
            issues.push(Issue::warn(
                IssueCode::NoCorrectAnswerFound,
                &id,
                "no classifier cue matched; assumed short answer text",
            ));
        }

        let (content, extract_issues) =
            extract_content(classification.kind, &block.text, &self.config);
        issues.extend(attribute(extract_issues, &id));

        let (grading, grading_issues) =
            grading::extract_grading(&block.text, classification.kind, &self.config);
        issues.extend(attribute(grading_issues, &id));

        let (question_flags, flag_issues) =
            flags::evaluate_flags(&block.text, &content, &self.config);
        issues.extend(attribute(flag_issues, &id));

        let (assets, asset_issues) =
            flags::render_assets(&question_flags, block.pages.iter(), renderer);
        issues.extend(attribute(asset_issues, &id));

        let question = Question {
            id,
            number: block.number,
            kind: classification.kind,
            stem: Stem {
                text: derive_stem_text(&block.text),
                assets,
            },
            grading,
            content,
            raw: crate::model::RawBlock {
                block_text: block.text,
                pages: block.pages.into_iter().collect(),
            },
            flags: question_flags,
            issues,
        };

        conform::apply_corrections(question)
    }
}

impl Default for ExamPipeline {
    fn default() -> Self {
        Self::new()
    }
}
