//! Rendering of documentation models into page text.

mod markdown;

pub use markdown::MarkdownRenderer;

use crate::generator::document::DocumentModel;

/// Turns one documentation model into the text of one page.
///
/// Renderers must be deterministic: equal models have to produce byte-identical text,
/// otherwise duplicate pages cannot be collapsed.
pub trait DocumentRenderer {
  fn render(&self, model: &DocumentModel<'_>) -> anyhow::Result<String>;

  /// File extension used when pages are written to disk.
  fn extension(&self) -> &'static str;
}
