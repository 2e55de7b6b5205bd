//! Go to definition.
//!
//! Definitions come back from the engine in virtual-file coordinates and
//! are mapped to real files:
//! - the component's own script: shifted by the script start
//! - the expression scope being queried: mapped back into the template
//! - other open components: shifted by their own script start
//! - materialized `<component>.d.ts` files: the component itself
//! - any other file: converted with its own line index

use lsp_types::LocationLink;
use tracing::debug;
use tumulte_canon::{DefinitionInfo, VirtualFileSystem};
use tumulte_carton::{strip_declaration_suffix, LineIndex, Range};

use super::{file_uri, to_lsp_range, QueryTarget};
use crate::document::{ComponentDocument, DocumentStore};

const EXPRESSION_MARKER: &str = "#expression:";

/// Definition service.
pub struct DefinitionService;

impl DefinitionService {
    pub fn location_links(
        document: &ComponentDocument,
        target: &QueryTarget,
        definitions: &[DefinitionInfo],
        documents: &DocumentStore,
        vfs: &VirtualFileSystem,
    ) -> Vec<LocationLink> {
        definitions
            .iter()
            .filter_map(|definition| {
                let (path, range) = Self::locate(document, target, definition, documents, vfs)?;
                let range = to_lsp_range(range);
                Some(LocationLink {
                    origin_selection_range: None,
                    target_uri: file_uri(&path)?,
                    target_range: range,
                    target_selection_range: range,
                })
            })
            .collect()
    }

    fn locate(
        document: &ComponentDocument,
        target: &QueryTarget,
        definition: &DefinitionInfo,
        documents: &DocumentStore,
        vfs: &VirtualFileSystem,
    ) -> Option<(String, Range)> {
        let file = definition.file_name.as_str();
        let span = definition.text_span;

        if let QueryTarget::Expression(scope) = target {
            if file == scope.key {
                let start = scope.to_document_offset(span.start)?;
                let end = scope.to_document_offset(span.end())?;
                let range = document.line_index().range_of(start, end)?;
                return Some((document.path().to_string(), range));
            }
        }
        if file.contains(EXPRESSION_MARKER) {
            debug!(file, "definition inside another expression scope dropped");
            return None;
        }

        if let Some(component) = documents.get(file) {
            let start = component.script_start()?;
            let range = component
                .line_index()
                .range_of(start + span.start, start + span.end())?;
            return Some((file.to_string(), range));
        }

        let stripped = strip_declaration_suffix(file);
        if stripped != file {
            if let Some(component) = documents.get(stripped) {
                let root = component.tree().root.range.start;
                let range = component.line_index().range_of(root, root)?;
                return Some((stripped.to_string(), range));
            }
        }

        let text = vfs.read_file(file)?;
        let range = LineIndex::new(&text).range_of(span.start, span.end())?;
        Some((file.to_string(), range))
    }
}

#[cfg(test)]
mod tests {
    use tumulte_canon::{ScriptElementKind, TextSpan};

    use super::*;
    use crate::classifier::expression_at;
    use crate::expression_scope::ExpressionScope;

    const APP: &str = "<app>\n  <p>{ count }</p>\n  <script>\n    export default { count: 1 }\n  </script>\n</app>";

    fn document(path: &str, text: &str) -> ComponentDocument {
        ComponentDocument::new(path, text, tumulte_armature::parse(text).unwrap())
    }

    fn definition(file: &str, start: u32, length: u32) -> DefinitionInfo {
        DefinitionInfo {
            file_name: file.into(),
            text_span: TextSpan::new(start, length),
            kind: ScriptElementKind::Property,
            name: "count".into(),
        }
    }

    fn store(documents: Vec<ComponentDocument>) -> DocumentStore {
        let mut store = DocumentStore::new();
        for document in documents {
            store.insert(document);
        }
        store
    }

    fn target_ranges(links: &[LocationLink]) -> Vec<(String, lsp_types::Range)> {
        links
            .iter()
            .map(|link| (link.target_uri.as_str().to_string(), link.target_range))
            .collect()
    }

    fn range(start: (u32, u32), end: (u32, u32)) -> lsp_types::Range {
        lsp_types::Range::new(
            lsp_types::Position::new(start.0, start.1),
            lsp_types::Position::new(end.0, end.1),
        )
    }

    #[cfg(unix)]
    #[test]
    fn test_own_script_is_shifted() {
        let documents = store(vec![document("/w/app.riot", APP)]);
        let app = documents.get("/w/app.riot").unwrap();
        let script_start = app.script_start().unwrap();
        let target = QueryTarget::Script { script_start };

        // `count` in `export default { count: 1 }`
        let local = APP[script_start as usize..].find("count").unwrap() as u32;
        let links = DefinitionService::location_links(
            app,
            &target,
            &[definition("/w/app.riot", local, 5)],
            &documents,
            &VirtualFileSystem::new(None),
        );

        assert_eq!(
            target_ranges(&links),
            vec![("file:///w/app.riot".to_string(), range((3, 21), (3, 26)))]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_expression_scope_maps_back_to_template() {
        let documents = store(vec![document("/w/app.riot", APP)]);
        let app = documents.get("/w/app.riot").unwrap();
        let offset = APP.find("count").unwrap() as u32;
        let expression = expression_at(app.tree(), offset).unwrap();
        let scope = ExpressionScope::build("/w/app.riot", expression, &[]);
        let in_scope = scope.to_scope_offset(offset).unwrap();
        let key = scope.key.clone();
        let target = QueryTarget::Expression(scope);

        let links = DefinitionService::location_links(
            app,
            &target,
            &[
                definition(&key, in_scope, 5),
                definition(&key, 0, 9),
                definition("/w/app.riot#expression:99", 0, 1),
            ],
            &documents,
            &VirtualFileSystem::new(None),
        );

        assert_eq!(
            target_ranges(&links),
            vec![("file:///w/app.riot".to_string(), range((1, 7), (1, 12)))]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_declaration_file_points_at_component() {
        let documents = store(vec![
            document("/w/app.riot", APP),
            document("/w/child.riot", "<child></child>"),
        ]);
        let app = documents.get("/w/app.riot").unwrap();
        let target = QueryTarget::Script {
            script_start: app.script_start().unwrap(),
        };

        let links = DefinitionService::location_links(
            app,
            &target,
            &[definition("/w/child.riot.d.ts", 10, 8)],
            &documents,
            &VirtualFileSystem::new(None),
        );

        assert_eq!(
            target_ranges(&links),
            vec![("file:///w/child.riot".to_string(), range((0, 0), (0, 0)))]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_other_files_use_their_own_lines() {
        let documents = store(vec![document("/w/app.riot", APP)]);
        let app = documents.get("/w/app.riot").unwrap();
        let mut vfs = VirtualFileSystem::new(None);
        vfs.update("/w/store.ts", "// store\nexport const count = 1;\n");
        let target = QueryTarget::Script {
            script_start: app.script_start().unwrap(),
        };

        let links = DefinitionService::location_links(
            app,
            &target,
            &[
                definition("/w/store.ts", 22, 5),
                definition("/w/missing.ts", 0, 1),
            ],
            &documents,
            &vfs,
        );

        assert_eq!(
            target_ranges(&links),
            vec![("file:///w/store.ts".to_string(), range((1, 13), (1, 18)))]
        );
    }
}
