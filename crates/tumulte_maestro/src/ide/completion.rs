//! Completion conversion.
//!
//! Compiler completion entries become LSP completion items. Template and
//! style completions come from the markup service already in LSP shape.

use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemLabelDetails, CompletionList,
    InsertTextFormat, InsertTextMode,
};
use tumulte_canon::{CompletionEntry, CompletionInfo, ScriptElementKind};

/// Completion service.
pub struct CompletionService;

impl CompletionService {
    /// Convert compiler completions into a completion list.
    pub fn convert(info: CompletionInfo) -> CompletionList {
        CompletionList {
            is_incomplete: info.is_incomplete,
            items: info.entries.iter().map(Self::convert_entry).collect(),
        }
    }

    /// Wrap items from the markup service.
    pub fn list(items: Vec<CompletionItem>) -> CompletionList {
        CompletionList {
            is_incomplete: false,
            items,
        }
    }

    pub fn convert_entry(entry: &CompletionEntry) -> CompletionItem {
        let (label, label_details) = Self::label_and_details(entry);
        let insert_text_format = if entry.is_snippet {
            InsertTextFormat::SNIPPET
        } else {
            InsertTextFormat::PLAIN_TEXT
        };

        CompletionItem {
            label,
            label_details,
            kind: Some(Self::convert_kind(entry.kind)),
            detail: Some(format!("({})", entry.kind.as_str())),
            sort_text: Some(entry.sort_text.clone()),
            filter_text: entry.filter_text.clone(),
            insert_text: Some(
                entry
                    .insert_text
                    .clone()
                    .unwrap_or_else(|| entry.name.clone()),
            ),
            insert_text_format: Some(insert_text_format),
            insert_text_mode: Some(InsertTextMode::ADJUST_INDENTATION),
            ..Default::default()
        }
    }

    /// Label and label details of an entry.
    ///
    /// Entries without explicit label details may carry their display name
    /// between NUL characters in the sort text; the rest of the entry name
    /// then becomes the detail.
    fn label_and_details(entry: &CompletionEntry) -> (String, Option<CompletionItemLabelDetails>) {
        if let Some(details) = &entry.label_details {
            return (
                Self::label(entry, &entry.name),
                Some(CompletionItemLabelDetails {
                    detail: details.detail.clone(),
                    description: details.description.clone(),
                }),
            );
        }

        let sort_text = &entry.sort_text;
        let embedded = sort_text
            .find('\0')
            .zip(sort_text.rfind('\0'))
            .filter(|(first, last)| first < last)
            .map(|(first, last)| &sort_text[first + 1..last]);

        match embedded.and_then(|name| Some((name, entry.name.strip_prefix(name)?))) {
            Some((name, detail)) => (
                Self::label(entry, name),
                Some(CompletionItemLabelDetails {
                    detail: Some(detail.to_string()),
                    description: None,
                }),
            ),
            None => (Self::label(entry, &entry.name), None),
        }
    }

    fn label(entry: &CompletionEntry, name: &str) -> String {
        if entry.has_modifier("optional") {
            format!("{name}?")
        } else {
            name.to_string()
        }
    }

    /// Convert a script element kind to a completion item kind.
    fn convert_kind(kind: ScriptElementKind) -> CompletionItemKind {
        match kind {
            ScriptElementKind::Keyword => CompletionItemKind::KEYWORD,
            ScriptElementKind::Script => CompletionItemKind::FILE,
            ScriptElementKind::Module | ScriptElementKind::ExternalModuleName => {
                CompletionItemKind::MODULE
            }
            ScriptElementKind::Class | ScriptElementKind::LocalClass | ScriptElementKind::Type => {
                CompletionItemKind::CLASS
            }
            ScriptElementKind::Interface => CompletionItemKind::INTERFACE,
            ScriptElementKind::Enum => CompletionItemKind::ENUM,
            ScriptElementKind::EnumMember => CompletionItemKind::ENUM_MEMBER,
            ScriptElementKind::Variable
            | ScriptElementKind::LocalVariable
            | ScriptElementKind::Let
            | ScriptElementKind::Parameter => CompletionItemKind::VARIABLE,
            ScriptElementKind::Const => CompletionItemKind::CONSTANT,
            ScriptElementKind::Function
            | ScriptElementKind::LocalFunction
            | ScriptElementKind::Call => CompletionItemKind::FUNCTION,
            ScriptElementKind::Method => CompletionItemKind::METHOD,
            ScriptElementKind::Getter
            | ScriptElementKind::Setter
            | ScriptElementKind::Index
            | ScriptElementKind::JsxAttribute => CompletionItemKind::PROPERTY,
            ScriptElementKind::Property => CompletionItemKind::FIELD,
            ScriptElementKind::Constructor | ScriptElementKind::Construct => {
                CompletionItemKind::CONSTRUCTOR
            }
            ScriptElementKind::TypeParameter => CompletionItemKind::TYPE_PARAMETER,
            ScriptElementKind::PrimitiveType => CompletionItemKind::VALUE,
            ScriptElementKind::Directory => CompletionItemKind::FOLDER,
            ScriptElementKind::Alias
            | ScriptElementKind::Label
            | ScriptElementKind::String
            | ScriptElementKind::Warning
            | ScriptElementKind::Unknown => CompletionItemKind::TEXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use tumulte_canon::CompletionLabelDetails;

    use super::*;

    #[test]
    fn test_convert_entry() {
        let entry = CompletionEntry::new("count", ScriptElementKind::Property)
            .with_kind_modifiers("optional");
        let item = CompletionService::convert_entry(&entry);

        assert_eq!(item.label, "count?");
        assert_eq!(item.kind, Some(CompletionItemKind::FIELD));
        assert_eq!(item.detail.as_deref(), Some("(property)"));
        assert_eq!(item.insert_text.as_deref(), Some("count"));
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::PLAIN_TEXT));
        assert_eq!(item.insert_text_mode, Some(InsertTextMode::ADJUST_INDENTATION));
        assert_eq!(item.sort_text.as_deref(), Some("11"));
        assert!(item.label_details.is_none());
    }

    #[test]
    fn test_snippet_entry() {
        let entry = CompletionEntry::new("onMounted", ScriptElementKind::Method)
            .with_insert_text("onMounted(${1:props})", true);
        let item = CompletionService::convert_entry(&entry);

        assert_eq!(item.kind, Some(CompletionItemKind::METHOD));
        assert_eq!(item.insert_text.as_deref(), Some("onMounted(${1:props})"));
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::SNIPPET));
    }

    #[test]
    fn test_label_from_sort_text() {
        let entry = CompletionEntry::new("onClick(event)", ScriptElementKind::Method)
            .with_sort_text("11\0onClick\0");
        let item = CompletionService::convert_entry(&entry);

        assert_eq!(item.label, "onClick");
        assert_eq!(
            item.label_details,
            Some(CompletionItemLabelDetails {
                detail: Some("(event)".into()),
                description: None,
            })
        );
    }

    #[test]
    fn test_sort_text_name_must_prefix_entry() {
        let entry = CompletionEntry::new("render", ScriptElementKind::Method)
            .with_sort_text("11\0update\0");
        let item = CompletionService::convert_entry(&entry);

        assert_eq!(item.label, "render");
        assert!(item.label_details.is_none());
    }

    #[test]
    fn test_explicit_label_details() {
        let mut entry = CompletionEntry::new("Child", ScriptElementKind::Alias);
        entry.label_details = Some(CompletionLabelDetails {
            detail: None,
            description: Some("./child.riot".into()),
        });
        let item = CompletionService::convert_entry(&entry);

        assert_eq!(item.kind, Some(CompletionItemKind::TEXT));
        assert_eq!(
            item.label_details.and_then(|details| details.description),
            Some("./child.riot".into())
        );
    }

    #[test]
    fn test_convert_list() {
        let info = CompletionInfo {
            entries: vec![
                CompletionEntry::new("a", ScriptElementKind::Const),
                CompletionEntry::new("b", ScriptElementKind::Keyword),
            ],
            is_incomplete: true,
            is_member_completion: false,
        };
        let list = CompletionService::convert(info);

        assert!(list.is_incomplete);
        assert_eq!(
            list.items.iter().map(|item| item.kind).collect::<Vec<_>>(),
            vec![Some(CompletionItemKind::CONSTANT), Some(CompletionItemKind::KEYWORD)]
        );
    }
}
