//! Component tree node types.
//!
//! The tree is owned (no arena): documents are re-parsed wholesale on every
//! edit and the previous tree is simply dropped.

use serde::Serialize;
use tumulte_carton::CompactString;

/// Half-open byte range `[start, end)` into the raw component text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start <= offset < end`
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// `start < offset < end`
    ///
    /// Used for expressions, whose range includes the `{`/`}` delimiters: a
    /// cursor sitting on a delimiter is not inside the expression.
    #[inline]
    pub const fn strictly_contains(&self, offset: u32) -> bool {
        self.start < offset && offset < self.end
    }

    #[inline]
    pub const fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The text covered by this range, or `""` when out of bounds.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or_default()
    }
}

/// A `{ ... }` expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    /// Range including the delimiters.
    pub range: TextRange,
    /// Range of the text between the delimiters.
    pub text_range: TextRange,
    /// Text between the delimiters.
    pub text: String,
}

/// An attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name. Empty for a spread attribute (`{ ...props }`).
    pub name: CompactString,
    /// Range of the whole attribute, value included.
    pub range: TextRange,
    /// Raw value without quotes.
    pub value: Option<String>,
    pub value_range: Option<TextRange>,
    /// Expressions inside the value (or the spread expression).
    pub expressions: Vec<Expression>,
}

impl Attribute {
    #[inline]
    pub fn is_spread(&self) -> bool {
        self.name.is_empty()
    }

    /// The value when it contains no expression.
    pub fn static_value(&self) -> Option<&str> {
        if self.expressions.is_empty() {
            self.value.as_deref()
        } else {
            None
        }
    }
}

/// An element of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementNode {
    pub tag: CompactString,
    pub range: TextRange,
    pub attributes: Vec<Attribute>,
    pub children: Vec<TemplateNode>,
    /// Not a known HTML/SVG tag, so it refers to another component.
    pub is_custom: bool,
    pub is_self_closing: bool,
}

impl ElementNode {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(|child| match child {
            TemplateNode::Element(el) => Some(el),
            TemplateNode::Text(_) => None,
        })
    }

    /// All descendant elements in document order (self excluded).
    pub fn descendants(&self) -> Vec<&ElementNode> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }
}

fn collect_descendants<'a>(element: &'a ElementNode, out: &mut Vec<&'a ElementNode>) {
    for child in element.child_elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

/// A run of text, possibly holding expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    pub range: TextRange,
    pub content: String,
    pub expressions: Vec<Expression>,
}

/// A template node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TemplateNode {
    Element(ElementNode),
    Text(TextNode),
}

impl TemplateNode {
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Self::Element(el) => NodeRef::Element(el),
            Self::Text(text) => NodeRef::Text(text),
        }
    }

    pub fn range(&self) -> TextRange {
        self.as_node_ref().range()
    }
}

/// Borrowed view of any node, including the root element.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Element(&'a ElementNode),
    Text(&'a TextNode),
}

impl<'a> NodeRef<'a> {
    pub fn range(self) -> TextRange {
        match self {
            Self::Element(el) => el.range,
            Self::Text(text) => text.range,
        }
    }

    pub fn attributes(self) -> &'a [Attribute] {
        match self {
            Self::Element(el) => &el.attributes,
            Self::Text(_) => &[],
        }
    }

    /// Expressions owned by the node itself (not by its attributes).
    pub fn expressions(self) -> &'a [Expression] {
        match self {
            Self::Element(_) => &[],
            Self::Text(text) => &text.expressions,
        }
    }
}

/// An embedded `<script>` or `<style>` region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Range of the whole block, tags included.
    pub range: TextRange,
    /// Range of the content between the tags.
    pub text_range: TextRange,
    pub text: String,
    pub attributes: Vec<Attribute>,
}

impl CodeBlock {
    /// Value of the `lang`/`type` attribute, if any.
    pub fn lang(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == "lang" || attr.name == "type")
            .and_then(Attribute::static_value)
    }
}

/// A parsed component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentTree {
    /// The root template element (the component's own tag).
    pub root: ElementNode,
    pub script: Option<CodeBlock>,
    pub style: Option<CodeBlock>,
}

impl ComponentTree {
    /// Script text, when the component has a non-empty script region.
    pub fn script_text(&self) -> Option<&str> {
        self.script
            .as_ref()
            .map(|block| block.text.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    /// The deepest node whose range contains `offset`.
    pub fn deepest_node_at(&self, offset: u32) -> Option<NodeRef<'_>> {
        if !self.root.range.contains(offset) {
            return None;
        }

        let mut current = &self.root;
        loop {
            let next = current
                .children
                .iter()
                .find(|child| child.range().contains(offset));
            match next {
                Some(TemplateNode::Element(el)) => current = el,
                Some(TemplateNode::Text(text)) => return Some(NodeRef::Text(text)),
                None => return Some(NodeRef::Element(current)),
            }
        }
    }

    /// Elements whose range contains `offset`, from the root down.
    pub fn element_path_at(&self, offset: u32) -> Vec<&ElementNode> {
        let mut path = Vec::new();
        if !self.root.range.contains(offset) {
            return path;
        }

        let mut current = &self.root;
        path.push(current);
        while let Some(el) = current
            .child_elements()
            .find(|child| child.range.contains(offset))
        {
            path.push(el);
            current = el;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(start: u32, end: u32, exprs: Vec<Expression>) -> TemplateNode {
        TemplateNode::Text(TextNode {
            range: TextRange::new(start, end),
            content: String::new(),
            expressions: exprs,
        })
    }

    fn element(tag: &str, start: u32, end: u32, children: Vec<TemplateNode>) -> ElementNode {
        ElementNode {
            tag: tag.into(),
            range: TextRange::new(start, end),
            attributes: Vec::new(),
            children,
            is_custom: tag.contains('-'),
            is_self_closing: false,
        }
    }

    fn sample_tree() -> ComponentTree {
        // <my-app><p>{ x }</p><b></b></my-app>
        let expr = Expression {
            range: TextRange::new(11, 16),
            text_range: TextRange::new(12, 15),
            text: " x ".into(),
        };
        let p = element("p", 8, 20, vec![text(11, 16, vec![expr])]);
        let b = element("b", 20, 27, Vec::new());
        ComponentTree {
            root: element(
                "my-app",
                0,
                36,
                vec![TemplateNode::Element(p), TemplateNode::Element(b)],
            ),
            script: None,
            style: None,
        }
    }

    #[test]
    fn test_text_range_containment() {
        let range = TextRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(19));
        assert!(!range.contains(20));
        assert!(!range.strictly_contains(10));
        assert!(range.strictly_contains(11));
        assert!(!range.strictly_contains(20));
        assert!(range.contains_range(TextRange::new(12, 20)));
    }

    #[test]
    fn test_slice() {
        let range = TextRange::new(1, 4);
        assert_eq!(range.slice("{abc}"), "abc");
        assert_eq!(TextRange::new(3, 99).slice("abc"), "");
    }

    #[test]
    fn test_deepest_node_at() {
        let tree = sample_tree();
        assert!(matches!(tree.deepest_node_at(12), Some(NodeRef::Text(_))));
        match tree.deepest_node_at(21) {
            Some(NodeRef::Element(el)) => assert_eq!(el.tag, "b"),
            other => panic!("Expected <b>, got {other:?}"),
        }
        match tree.deepest_node_at(30) {
            Some(NodeRef::Element(el)) => assert_eq!(el.tag, "my-app"),
            other => panic!("Expected root, got {other:?}"),
        }
        assert!(tree.deepest_node_at(36).is_none());
    }

    #[test]
    fn test_element_path_at() {
        let tree = sample_tree();
        let tags: Vec<_> = tree
            .element_path_at(12)
            .iter()
            .map(|el| el.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["my-app", "p"]);
        assert!(tree.element_path_at(99).is_empty());
    }

    #[test]
    fn test_descendants() {
        let tree = sample_tree();
        let tags: Vec<_> = tree
            .root
            .descendants()
            .iter()
            .map(|el| el.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["p", "b"]);
    }
}
