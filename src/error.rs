//! Error types for the exam extraction library.
//!
//! The text-processing pipeline itself never fails: every recoverable anomaly
//! is recorded as an [`Issue`](crate::model::Issue) on the produced document.
//! The `Error` enum covers the external seams only — the page renderer, IO on
//! behalf of collaborator implementations, and JSON serialization.

/// Result type alias for exam extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the library's external seams.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page index outside the source document
    #[error("Page {0} out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Page render failure reported by a [`PageRenderer`](crate::source::PageRenderer)
    #[error("Failed to render page {page}: {reason}")]
    Render {
        /// Zero-based page index that failed to render
        page: usize,
        /// Reason for the render failure
        reason: String,
    },

    /// Layout extraction failure reported by a
    /// [`PageTextSource`](crate::source::PageTextSource)
    #[error("Failed to extract text for page {page}: {reason}")]
    TextSource {
        /// Zero-based page index that failed to extract
        page: usize,
        /// Reason for the extraction failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
