//! Markup and stylesheet services.
//!
//! Template and style completions are not computed here; they are handed to
//! an off-the-shelf language service behind [`MarkupLanguageService`].

use lsp_types::CompletionItem;

use crate::document::ComponentDocument;

pub trait MarkupLanguageService {
    /// Completions inside the template markup.
    fn template_completions(&self, document: &ComponentDocument, offset: u32)
        -> Vec<CompletionItem>;

    /// Completions inside the style region.
    fn style_completions(&self, document: &ComponentDocument, offset: u32) -> Vec<CompletionItem>;
}

/// Offers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMarkupService;

impl MarkupLanguageService for NoopMarkupService {
    fn template_completions(
        &self,
        _document: &ComponentDocument,
        _offset: u32,
    ) -> Vec<CompletionItem> {
        Vec::new()
    }

    fn style_completions(&self, _document: &ComponentDocument, _offset: u32) -> Vec<CompletionItem> {
        Vec::new()
    }
}
