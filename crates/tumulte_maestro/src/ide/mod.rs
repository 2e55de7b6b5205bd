//! IDE features over the script analysis engine.
//!
//! Requests arrive as byte offsets into a raw component. Script requests are
//! forwarded to the engine against either the component's own script file
//! or a synthesized expression scope, and the answers are converted to LSP
//! shapes:
//! - Code completion
//! - Hover information
//! - Go to definition

pub mod completion;
pub mod definition;
pub mod hover;

pub use completion::CompletionService;
pub use definition::DefinitionService;
pub use hover::{HoverBuilder, HoverService};

use tumulte_carton::{path_to_uri, Position, Range};

use crate::expression_scope::ExpressionScope;

/// Script file a request is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// The component's own script, whose text starts at `script_start`.
    Script { script_start: u32 },
    /// The scope function of a template expression.
    Expression(ExpressionScope),
}

impl QueryTarget {
    /// Virtual file key the engine is queried with.
    pub fn file_key<'a>(&'a self, document_path: &'a str) -> &'a str {
        match self {
            Self::Script { .. } => document_path,
            Self::Expression(scope) => &scope.key,
        }
    }

    /// Map a document offset into the target file.
    pub fn to_target_offset(&self, offset: u32) -> Option<u32> {
        match self {
            Self::Script { script_start } => offset.checked_sub(*script_start),
            Self::Expression(scope) => scope.to_scope_offset(offset),
        }
    }

    /// Map an offset of the target file back into the document.
    pub fn to_document_offset(&self, offset: u32) -> Option<u32> {
        match self {
            Self::Script { script_start } => Some(script_start + offset),
            Self::Expression(scope) => scope.to_document_offset(offset),
        }
    }
}

// =============================================================================
// Position conversion utilities
// =============================================================================

#[inline]
pub fn to_lsp_position(position: Position) -> lsp_types::Position {
    lsp_types::Position::new(position.line, position.character)
}

#[inline]
pub fn from_lsp_position(position: lsp_types::Position) -> Position {
    Position::new(position.line, position.character)
}

#[inline]
pub fn to_lsp_range(range: Range) -> lsp_types::Range {
    lsp_types::Range::new(to_lsp_position(range.start), to_lsp_position(range.end))
}

/// `file://` URI of a path.
pub fn file_uri(path: &str) -> Option<lsp_types::Uri> {
    path_to_uri(path)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use tumulte_relief::{Expression, TextRange};

    use super::*;

    #[test]
    fn test_script_target_offsets() {
        let target = QueryTarget::Script { script_start: 20 };
        assert_eq!(target.file_key("/w/app.riot"), "/w/app.riot");
        assert_eq!(target.to_target_offset(25), Some(5));
        assert_eq!(target.to_target_offset(10), None);
        assert_eq!(target.to_document_offset(5), Some(25));
    }

    #[test]
    fn test_expression_target_offsets() {
        let expression = Expression {
            range: TextRange::new(10, 15),
            text_range: TextRange::new(11, 14),
            text: "a.b".into(),
        };
        let scope = ExpressionScope::build("/w/app.riot", &expression, &[]);
        let base = scope.expression_offset;
        let target = QueryTarget::Expression(scope);

        assert_eq!(target.file_key("/w/app.riot"), "/w/app.riot#expression:10");
        assert_eq!(target.to_target_offset(12), Some(base + 1));
        assert_eq!(target.to_document_offset(base + 1), Some(12));
    }

    #[test]
    fn test_range_conversion() {
        let range = Range::new(Position::new(1, 2), Position::new(3, 4));
        assert_eq!(
            to_lsp_range(range),
            lsp_types::Range::new(lsp_types::Position::new(1, 2), lsp_types::Position::new(3, 4))
        );
    }

    #[test]
    fn test_position_conversion() {
        let position = lsp_types::Position::new(4, 11);
        assert_eq!(from_lsp_position(position), Position::new(4, 11));
        assert_eq!(to_lsp_position(from_lsp_position(position)), position);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_uri() {
        let uri = file_uri("/w/app.riot").unwrap();
        assert_eq!(uri.as_str(), "file:///w/app.riot");
    }
}
