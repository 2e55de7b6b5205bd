//! Identifier rules of the script language.
//!
//! Generated script (expression scopes, component members) must decide
//! whether a property can be written bare (`count`) or has to be quoted
//! (`"data-id"`), and whether it can be destructured into a local binding.

use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").expect("identifier pattern is valid"));

/// Words that cannot be used as a binding name.
static RESERVED_WORDS: phf::Set<&'static str> = phf_set! {
    "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "import", "in", "instanceof", "new",
    "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "implements", "interface",
    "let", "package", "private", "protected", "public", "static", "yield",
    "await", "arguments", "eval",
};

/// Check if a word is reserved in the script language.
#[inline]
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

/// Check if a property can be read with `obj.name` and bound with
/// `const { name } = obj`.
pub fn is_dot_accessible(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !is_reserved_word(name)
}

/// Property key as written in a type literal: bare when dot-accessible,
/// double-quoted otherwise.
pub fn property_key(name: &str) -> String {
    if is_dot_accessible(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
