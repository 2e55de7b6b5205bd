//! Expression scope synthesis.
//!
//! A template expression is type-checked by wrapping it in a function whose
//! `this` carries the component's instance properties:
//!
//! ```text
//! (function (
//!     this: {
//!         count: number,
//!         "data-id": string
//!     }
//! ) {
//!     const {
//!         count
//!     } = this;
//!     <expression text>
//! });
//! ```
//!
//! Only bare identifiers are destructured; quoted names are reachable
//! through `this` alone.

use tumulte_canon::{MemberInfo, MemberKind};
use tumulte_carton::{is_dot_accessible, property_key};
use tumulte_relief::Expression;

/// A property visible inside an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeProperty {
    pub name: String,
    /// Signature as written in the `this` type.
    pub signature: String,
}

impl ScopeProperty {
    pub fn from_member(member: &MemberInfo) -> Self {
        Self {
            name: member.name.clone(),
            signature: member_signature(member),
        }
    }

    /// An untyped property (`name: any`).
    pub fn untyped(name: impl Into<String>) -> Self {
        let name = name.into();
        let signature = format!("{}: any", property_key(&name));
        Self { name, signature }
    }
}

/// Render a member as a property signature of an object type.
pub fn member_signature(member: &MemberInfo) -> String {
    let key = property_key(&member.name);
    let optional = if member.optional { "?" } else { "" };
    match &member.kind {
        MemberKind::Property { type_text } => {
            let ty = if member.optional {
                strip_undefined(type_text)
            } else {
                type_text.trim().to_string()
            };
            format!("{key}{optional}: {ty}")
        }
        MemberKind::Method {
            parameters,
            return_type,
        } => format!("{key}{optional}({parameters}): {return_type}"),
    }
}

/// Drop `undefined` from a union when exactly one other variant remains.
fn strip_undefined(ty: &str) -> String {
    let variants = split_union(ty);
    let defined: Vec<&str> = variants
        .iter()
        .copied()
        .filter(|variant| *variant != "undefined")
        .collect();
    if defined.len() == 1 && defined.len() < variants.len() {
        defined[0].to_string()
    } else {
        ty.trim().to_string()
    }
}

/// Top-level `|` variants of a type, trimmed.
fn split_union(ty: &str) -> Vec<&str> {
    let bytes = ty.as_bytes();
    let mut variants = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q && (i == 0 || bytes[i - 1] != b'\\') {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            // `=>` is not a closing bracket
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b')' | b']' | b'}' | b'>' => depth -= 1,
            b'|' if depth == 0 => {
                variants.push(ty[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    variants.push(ty[start..].trim());
    variants.retain(|variant| !variant.is_empty());
    variants
}

/// Key of the transient script holding the scope of the expression starting
/// at `expression_start` in `path`.
pub fn scope_file_key(path: &str, expression_start: u32) -> String {
    format!("{path}#expression:{expression_start}")
}

/// A synthesized expression scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionScope {
    /// Virtual file key.
    pub key: String,
    /// Full text of the scope function.
    pub text: String,
    /// Offset of the expression text inside [`text`](Self::text).
    pub expression_offset: u32,
    pub expression: Expression,
}

impl ExpressionScope {
    /// Build the scope of `expression` in the document at `path`.
    ///
    /// A property listed twice keeps its first position and takes the later
    /// signature.
    pub fn build(path: &str, expression: &Expression, properties: &[ScopeProperty]) -> Self {
        let mut merged: Vec<&ScopeProperty> = Vec::with_capacity(properties.len());
        for property in properties {
            match merged.iter_mut().find(|seen| seen.name == property.name) {
                Some(seen) => *seen = property,
                None => merged.push(property),
            }
        }

        let signatures = merged
            .iter()
            .map(|property| format!("        {}", property.signature))
            .collect::<Vec<_>>()
            .join(",\n");
        let bindings = merged
            .iter()
            .filter(|property| is_dot_accessible(&property.name))
            .map(|property| format!("        {}", property.name))
            .collect::<Vec<_>>()
            .join(",\n");

        let preamble = [
            "(function (",
            "    this: {",
            signatures.as_str(),
            "    }",
            ") {",
            "    const {",
            bindings.as_str(),
            "    } = this;",
            "    ",
        ]
        .join("\n");

        let expression_offset = preamble.len() as u32;
        let text = format!("{preamble}{}\n}});", expression.text);

        Self {
            key: scope_file_key(path, expression.range.start),
            text,
            expression_offset,
            expression: expression.clone(),
        }
    }

    /// Map a document offset inside the expression text to the scope text.
    pub fn to_scope_offset(&self, document_offset: u32) -> Option<u32> {
        let range = self.expression.text_range;
        if document_offset < range.start || document_offset > range.end {
            return None;
        }
        Some(document_offset - range.start + self.expression_offset)
    }

    /// Map a scope offset back to the document, when it falls inside the
    /// expression text.
    pub fn to_document_offset(&self, scope_offset: u32) -> Option<u32> {
        let relative = scope_offset.checked_sub(self.expression_offset)?;
        if relative > self.expression.text_range.len() {
            return None;
        }
        Some(self.expression.text_range.start + relative)
    }
}
