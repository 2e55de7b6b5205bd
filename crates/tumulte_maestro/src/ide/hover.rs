//! Hover information provider.
//!
//! Renders compiler quick info as markdown: the signature in a fenced
//! `typescript` block, then the documentation, then the JSDoc tags, each
//! part separated by a horizontal rule.

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Range};
use tumulte_canon::{JsDocTag, QuickInfo};

const RULE: &str = "\n\n---\n\n";

/// Hover service.
pub struct HoverService;

impl HoverService {
    pub fn from_quick_info(info: &QuickInfo, range: Option<Range>) -> Hover {
        let mut builder = HoverBuilder::new().code("typescript", &info.display);

        let documentation = info
            .documentation
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n\n");
        if !documentation.trim().is_empty() {
            builder = builder.section(&documentation);
        }

        let tags = info
            .tags
            .iter()
            .map(Self::format_tag)
            .collect::<Vec<_>>()
            .join("\n\n");
        if !tags.is_empty() {
            builder = builder.section(&tags);
        }

        match range {
            Some(range) => builder.build_with_range(range),
            None => builder.build(),
        }
    }

    fn format_tag(tag: &JsDocTag) -> String {
        let text = tag.text.as_deref().unwrap_or_default();
        match tag.name.as_str() {
            "param" => format!("*@param* `{text}`"),
            "returns" => format!("*@returns* {text}"),
            "example" => format!("*Example:*\n```typescript\n{text}\n```"),
            name if text.is_empty() => format!("*@{name}*"),
            name => format!("*@{name}* {text}"),
        }
    }
}

/// Builder for markdown hovers whose sections are separated by rules.
pub struct HoverBuilder {
    sections: Vec<String>,
}

impl HoverBuilder {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Add a fenced code block.
    pub fn code(mut self, language: &str, code: &str) -> Self {
        self.sections.push(format!("```{}\n{}\n```", language, code));
        self
    }

    pub fn section(mut self, text: &str) -> Self {
        self.sections.push(text.to_string());
        self
    }

    pub fn build(self) -> Hover {
        Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: self.sections.join(RULE),
            }),
            range: None,
        }
    }

    pub fn build_with_range(self, range: Range) -> Hover {
        Hover {
            range: Some(range),
            ..self.build()
        }
    }
}

impl Default for HoverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
