//! Cursor-offset content classification.
//!
//! Decides which sub-language of a component an offset belongs to:
//!
//! 1. outside the root element: nothing
//! 2. inside the style text: [`ContentType::Style`]
//! 3. inside the script text: [`ContentType::Script`]
//! 4. otherwise the deepest node holding the offset decides between
//!    [`ContentType::Expression`] and [`ContentType::Template`]
//!
//! Regions and nodes contain `start <= offset < end`. Expressions contain
//! only `start < offset < end`, so the `{` and `}` delimiters belong to the
//! surrounding template.

use serde::{Deserialize, Serialize};
use tumulte_relief::{ComponentTree, Expression};

/// Sub-language at an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Style,
    Script,
    Expression,
    Template,
}

impl ContentType {
    /// Language identifier of the region, as editors name it.
    pub fn language_id(self) -> &'static str {
        match self {
            Self::Style => "css",
            Self::Script => "javascript",
            Self::Expression => "expression",
            Self::Template => "template",
        }
    }
}

pub fn classify(tree: &ComponentTree, offset: u32) -> Option<ContentType> {
    if !tree.root.range.contains(offset) {
        return None;
    }
    if tree
        .style
        .as_ref()
        .is_some_and(|style| style.text_range.contains(offset))
    {
        return Some(ContentType::Style);
    }
    if tree
        .script
        .as_ref()
        .is_some_and(|script| script.text_range.contains(offset))
    {
        return Some(ContentType::Script);
    }

    match expression_at(tree, offset) {
        Some(_) => Some(ContentType::Expression),
        None => Some(ContentType::Template),
    }
}

/// The template expression strictly containing `offset`.
///
/// When an attribute of the deepest node contains the offset, only that
/// attribute's expressions are considered.
pub fn expression_at(tree: &ComponentTree, offset: u32) -> Option<&Expression> {
    let node = tree.deepest_node_at(offset)?;

    let expressions = match node
        .attributes()
        .iter()
        .find(|attr| attr.range.contains(offset))
    {
        Some(attr) => attr.expressions.as_slice(),
        None => node.expressions(),
    };

    expressions
        .iter()
        .find(|expr| expr.range.strictly_contains(offset))
}
