//! External collaborator seams: page text input and page rendering.
//!
//! The core pipeline does not read documents itself. It consumes per-page
//! ordered text lines with vertical positions from a [`PageTextSource`] and
//! requests rendered full-page images from a [`PageRenderer`] when a question
//! needs a visual asset. Both capabilities are supplied by the caller;
//! neither is implemented here.

use std::path::PathBuf;

use crate::error::Result;

/// A single text line with its vertical position on the page.
///
/// `y` grows downward (top of page is the minimum); only the relative order
/// and the distance to the page extremes matter to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    /// Raw line text as extracted by the layout collaborator
    pub text: String,
    /// Vertical position of the line on its page
    pub y: f32,
}

impl PositionedLine {
    /// Create a positioned line.
    pub fn new(text: impl Into<String>, y: f32) -> Self {
        Self {
            text: text.into(),
            y,
        }
    }
}

/// Ordered text lines of one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    /// Lines in document order (page, then vertical position)
    pub lines: Vec<PositionedLine>,
}

impl PageText {
    /// Build a page from plain lines, assigning synthetic positions by index.
    ///
    /// Convenient for tests and for sources without position metadata.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .enumerate()
                .map(|(i, text)| PositionedLine::new(text, i as f32))
                .collect(),
        }
    }
}

/// Layout text source: per page, ordered text lines with position.
///
/// Implementations wrap whatever produced the document (a PDF text
/// extractor, a layout-analysis service). Failure to obtain page text is the
/// only fatal condition in the whole system and is owned by the caller.
pub trait PageTextSource {
    /// Number of pages in the source document.
    fn page_count(&self) -> usize;

    /// Ordered (text, vertical position) lines for a 0-based page index.
    fn page_lines(&self, page: usize) -> Result<Vec<PositionedLine>>;
}

/// Collect all pages of a source into the pipeline's input form.
pub fn collect_pages(source: &dyn PageTextSource) -> Result<Vec<PageText>> {
    let mut pages = Vec::with_capacity(source.page_count());
    for page in 0..source.page_count() {
        pages.push(PageText {
            lines: source.page_lines(page)?,
        });
    }
    Ok(pages)
}

/// Page renderer: produces an opaque file handle for a rendered full page.
///
/// The returned path is assigned by the renderer and treated as opaque by
/// the core; it is excluded from the determinism contract. A failing render
/// is recorded as an error-level issue on the owning question and never
/// aborts the pipeline.
pub trait PageRenderer {
    /// Render the 0-based page index to an image file and return its handle.
    fn render_full_page(&self, page: usize) -> Result<PathBuf>;
}
