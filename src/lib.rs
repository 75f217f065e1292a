//! # Exam Oxide
//!
//! Structure extraction for exam attempt-review documents.
//!
//! Turns the per-page text lines of a corrected online exam (a Moodle-family
//! attempt review in its Spanish rendering) into a structured, schema-stable
//! [`ExamDocument`]: questions with their kind, prompt, options or pairs or
//! blanks, grading outcome, page provenance, and a record of every anomaly
//! met along the way.
//!
//! ## Pipeline
//!
//! One synchronous pass per document: normalize page lines, segment them
//! into question blocks, classify each block's kind through a fixed-priority
//! rule cascade, extract kind-specific content, parse grading, evaluate
//! cross-cutting flags (requesting full-page renders when text could not
//! carry the content), and enforce the output contract in a final
//! conformance pass. No stage ever fails on malformed input — anomalies
//! degrade to partial content plus an [`Issue`](model::Issue).
//!
//! ## Quick Start
//!
//! ```ignore
//! use exam_oxide::{ExamPipeline, PageText};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pages = vec![PageText::from_lines([
//!     "Pregunta 1",
//!     "Correcta",
//!     "Se puntúa 2,00 sobre 2,00",
//!     "¿Capital de Francia?",
//!     "Seleccione una:",
//!     "a. Lyon",
//!     "b. París ☑",
//!     "La respuesta correcta es: b",
//! ])];
//!
//! let pipeline = ExamPipeline::new();
//! let document = pipeline.process("intento.pdf", &pages, None);
//! println!("{}", document.to_json_string()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// External collaborator seams (text source, page renderer)
pub mod source;

// Output data model
pub mod model;

// Kind-specific content extraction
pub mod extractors;

// Pipeline stages and orchestrator
pub mod pipeline;

// Re-exports
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use model::{
    Asset, AssetType, ExamDocument, Flags, GradingInfo, GradingStatus, Issue, IssueCode,
    IssueLevel, Question, QuestionContent, QuestionKind, SourceInfo, Stem,
};
pub use pipeline::ExamPipeline;
pub use source::{collect_pages, PageRenderer, PageText, PageTextSource, PositionedLine};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
