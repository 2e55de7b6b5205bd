//! Component documents and their derived artifacts.

mod store;

pub use store::{DiskTextSource, DocumentStore, TextSource};

use once_cell::unsync::OnceCell;
use tumulte_canon::MemberInfo;
use tumulte_carton::LineIndex;
use tumulte_relief::{CodeBlock, ComponentTree};

use crate::compiler::CompiledOutput;

/// Artifacts computed from a document on demand. All of them are dropped
/// together when the document, or anything it depends on, changes.
#[derive(Debug, Default)]
struct DerivedCache {
    internal_declaration: Option<String>,
    /// `Some(None)` records that the conversion was attempted and failed.
    external_declaration: Option<Option<String>>,
    compiled: Option<CompiledOutput>,
    members: Option<Vec<MemberInfo>>,
}

impl DerivedCache {
    fn is_empty(&self) -> bool {
        self.internal_declaration.is_none()
            && self.external_declaration.is_none()
            && self.compiled.is_none()
            && self.members.is_none()
    }
}

/// A parsed component file.
#[derive(Debug)]
pub struct ComponentDocument {
    path: String,
    text: String,
    tree: ComponentTree,
    line_index: OnceCell<LineIndex>,
    cache: DerivedCache,
}

impl ComponentDocument {
    pub fn new(path: impl Into<String>, text: impl Into<String>, tree: ComponentTree) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            tree,
            line_index: OnceCell::new(),
            cache: DerivedCache::default(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn script(&self) -> Option<&CodeBlock> {
        self.tree.script.as_ref()
    }

    /// Start of the script text, when the component has a non-empty script.
    pub fn script_start(&self) -> Option<u32> {
        self.tree.script_text()?;
        self.script().map(|block| block.text_range.start)
    }

    /// Line index of the raw text, built on first use.
    pub fn line_index(&self) -> &LineIndex {
        self.line_index.get_or_init(|| LineIndex::new(&self.text))
    }

    /// Drop every derived artifact.
    pub fn clear_derived(&mut self) {
        self.cache = DerivedCache::default();
    }

    pub fn has_derived(&self) -> bool {
        !self.cache.is_empty()
    }

    pub fn internal_declaration(&self) -> Option<&str> {
        self.cache.internal_declaration.as_deref()
    }

    pub fn set_internal_declaration(&mut self, text: String) {
        self.cache.internal_declaration = Some(text);
    }

    pub fn external_declaration(&self) -> Option<Option<&str>> {
        self.cache
            .external_declaration
            .as_ref()
            .map(|text| text.as_deref())
    }

    pub fn set_external_declaration(&mut self, text: Option<String>) {
        self.cache.external_declaration = Some(text);
    }

    pub fn compiled_output(&self) -> Option<&CompiledOutput> {
        self.cache.compiled.as_ref()
    }

    pub fn set_compiled_output(&mut self, output: CompiledOutput) {
        self.cache.compiled = Some(output);
    }

    /// Members of the default-exported component type.
    pub fn members(&self) -> Option<&[MemberInfo]> {
        self.cache.members.as_deref()
    }

    pub fn set_members(&mut self, members: Vec<MemberInfo>) {
        self.cache.members = Some(members);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(text: &str) -> ComponentDocument {
        let tree = tumulte_armature::parse(text).unwrap();
        ComponentDocument::new("/w/app.riot", text, tree)
    }

    #[test]
    fn test_script_start() {
        let doc = document("<app>\n<script>\nexport default {}\n</script>\n</app>");
        assert_eq!(doc.script_start(), Some(14));

        let empty = document("<app><script>  </script></app>");
        assert_eq!(empty.script_start(), None);
    }

    #[test]
    fn test_clear_derived() {
        let mut doc = document("<app></app>");
        assert!(!doc.has_derived());

        doc.set_internal_declaration("export {};".into());
        doc.set_external_declaration(None);
        assert_eq!(doc.internal_declaration(), Some("export {};"));
        assert_eq!(doc.external_declaration(), Some(None));
        assert!(doc.has_derived());

        doc.clear_derived();
        assert!(!doc.has_derived());
        assert_eq!(doc.external_declaration(), None);
    }

    #[test]
    fn test_line_index_is_lazy_over_raw_text() {
        let doc = document("<app>\n  <p>{ x }</p>\n</app>");
        let position = doc.line_index().position_of(11).unwrap();
        assert_eq!((position.line, position.character), (1, 5));
    }
}
