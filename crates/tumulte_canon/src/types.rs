//! Result types exchanged with the compiler.

use serde::{Deserialize, Serialize};

/// Span in a script file, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.length
    }
}

/// Kind of a script element, as reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptElementKind {
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "script")]
    Script,
    #[serde(rename = "module")]
    Module,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "local class")]
    LocalClass,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "enum member")]
    EnumMember,
    #[serde(rename = "var")]
    Variable,
    #[serde(rename = "local var")]
    LocalVariable,
    #[serde(rename = "let")]
    Let,
    #[serde(rename = "const")]
    Const,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "local function")]
    LocalFunction,
    #[serde(rename = "method")]
    Method,
    #[serde(rename = "getter")]
    Getter,
    #[serde(rename = "setter")]
    Setter,
    #[serde(rename = "property")]
    Property,
    #[serde(rename = "constructor")]
    Constructor,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "index")]
    Index,
    #[serde(rename = "construct")]
    Construct,
    #[serde(rename = "parameter")]
    Parameter,
    #[serde(rename = "type parameter")]
    TypeParameter,
    #[serde(rename = "primitive type")]
    PrimitiveType,
    #[serde(rename = "alias")]
    Alias,
    #[serde(rename = "directory")]
    Directory,
    #[serde(rename = "external module name")]
    ExternalModuleName,
    #[serde(rename = "JSX attribute")]
    JsxAttribute,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "warning")]
    Warning,
    #[serde(other)]
    Unknown,
}

impl ScriptElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Script => "script",
            Self::Module => "module",
            Self::Class => "class",
            Self::LocalClass => "local class",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::EnumMember => "enum member",
            Self::Variable => "var",
            Self::LocalVariable => "local var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Function => "function",
            Self::LocalFunction => "local function",
            Self::Method => "method",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Property => "property",
            Self::Constructor => "constructor",
            Self::Call => "call",
            Self::Index => "index",
            Self::Construct => "construct",
            Self::Parameter => "parameter",
            Self::TypeParameter => "type parameter",
            Self::PrimitiveType => "primitive type",
            Self::Alias => "alias",
            Self::Directory => "directory",
            Self::ExternalModuleName => "external module name",
            Self::JsxAttribute => "JSX attribute",
            Self::String => "string",
            Self::Label => "label",
            Self::Warning => "warning",
            Self::Unknown => "",
        }
    }
}

/// Secondary label text of a completion entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLabelDetails {
    pub detail: Option<String>,
    pub description: Option<String>,
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub name: String,
    pub kind: ScriptElementKind,
    /// Comma-separated modifiers (`optional`, `export`, `deprecated`, ...).
    #[serde(default)]
    pub kind_modifiers: String,
    pub sort_text: String,
    #[serde(default)]
    pub insert_text: Option<String>,
    #[serde(default)]
    pub filter_text: Option<String>,
    #[serde(default)]
    pub is_snippet: bool,
    #[serde(default)]
    pub label_details: Option<CompletionLabelDetails>,
}

impl CompletionEntry {
    pub fn new(name: impl Into<String>, kind: ScriptElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            kind_modifiers: String::new(),
            sort_text: "11".to_string(),
            insert_text: None,
            filter_text: None,
            is_snippet: false,
            label_details: None,
        }
    }

    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = sort_text.into();
        self
    }

    pub fn with_kind_modifiers(mut self, modifiers: impl Into<String>) -> Self {
        self.kind_modifiers = modifiers.into();
        self
    }

    pub fn with_insert_text(mut self, text: impl Into<String>, is_snippet: bool) -> Self {
        self.insert_text = Some(text.into());
        self.is_snippet = is_snippet;
        self
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.kind_modifiers
            .split(',')
            .any(|m| m.trim() == modifier)
    }
}

/// Completions at a position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInfo {
    pub entries: Vec<CompletionEntry>,
    #[serde(default)]
    pub is_incomplete: bool,
    #[serde(default)]
    pub is_member_completion: bool,
}

/// A JSDoc tag attached to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsDocTag {
    pub name: String,
    pub text: Option<String>,
}

impl JsDocTag {
    pub fn new(name: impl Into<String>, text: Option<&str>) -> Self {
        Self {
            name: name.into(),
            text: text.map(str::to_string),
        }
    }
}

/// Hover information for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickInfo {
    pub kind: ScriptElementKind,
    pub text_span: TextSpan,
    /// Signature as displayed (`(property) count: number`).
    pub display: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub tags: Vec<JsDocTag>,
}

/// Where a symbol is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionInfo {
    pub file_name: String,
    pub text_span: TextSpan,
    pub kind: ScriptElementKind,
    pub name: String,
}

/// Declaration-only emission of one file, captured in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitOutput {
    /// Emitted `.d.ts` text, if anything was emitted.
    pub text: Option<String>,
    /// Diagnostics reported while emitting.
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl EmitOutput {
    pub fn declaration(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            text: None,
            diagnostics: vec![diagnostic.into()],
        }
    }

    /// The emitted text, when there were no diagnostics and it is not empty.
    pub fn usable_text(&self) -> Option<&str> {
        if !self.diagnostics.is_empty() {
            return None;
        }
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }
}

/// A member of a component's default-exported type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub optional: bool,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MemberKind {
    /// `name: type`. `type_text` is the declared type, `undefined` variants
    /// included for optional members.
    Property { type_text: String },
    /// `name(parameters): return_type`. `parameters` is the parameter list
    /// without parentheses.
    Method {
        parameters: String,
        return_type: String,
    },
}

impl MemberInfo {
    pub fn property(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            kind: MemberKind::Property {
                type_text: type_text.into(),
            },
        }
    }

    pub fn method(
        name: impl Into<String>,
        parameters: impl Into<String>,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            optional: false,
            kind: MemberKind::Method {
                parameters: parameters.into(),
                return_type: return_type.into(),
            },
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_round_trips_compiler_names() {
        let kind: ScriptElementKind = serde_json::from_str(r#""local var""#).unwrap();
        assert_eq!(kind, ScriptElementKind::LocalVariable);
        assert_eq!(kind.as_str(), "local var");

        let unknown: ScriptElementKind = serde_json::from_str(r#""accessor""#).unwrap();
        assert_eq!(unknown, ScriptElementKind::Unknown);
    }

    #[test]
    fn test_completion_entry_modifiers() {
        let entry = CompletionEntry::new("title", ScriptElementKind::Property)
            .with_kind_modifiers("optional,export");
        assert!(entry.has_modifier("optional"));
        assert!(!entry.has_modifier("deprecated"));
    }

    #[test]
    fn test_emit_output_usable_text() {
        assert_eq!(
            EmitOutput::declaration("export {};").usable_text(),
            Some("export {};")
        );
        assert_eq!(EmitOutput::declaration("  \n").usable_text(), None);
        assert_eq!(EmitOutput::failed("TS2304").usable_text(), None);

        let mut both = EmitOutput::declaration("export {};");
        both.diagnostics.push("TS1005".into());
        assert_eq!(both.usable_text(), None);
    }

    #[test]
    fn test_member_deserialize() {
        let member: MemberInfo = serde_json::from_str(
            r#"{ "name": "onClick", "optional": true, "kind": { "type": "method", "parameters": "e: Event", "returnType": "void" } }"#,
        )
        .unwrap();
        assert_eq!(member, MemberInfo::method("onClick", "e: Event", "void").optional());
    }
}
