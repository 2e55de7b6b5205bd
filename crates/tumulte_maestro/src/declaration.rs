//! Declaration synthesis.
//!
//! The internal declaration of a component is the compiler's `.d.ts`
//! emission for its script. The external declaration is what importers of
//! the component see: the same text with the default export's type wrapped
//! in `RiotComponentWrapper<...>`.

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingPattern, Declaration, ExportDefaultDeclarationKind, Statement};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tumulte_canon::ScriptEngine;
use tumulte_carton::declaration_path;

/// Declaration of a component without a usable script.
pub const DEFAULT_COMPONENT_DECLARATION: &str = "declare const _default: import(\"riot\").RiotComponent<\n    Record<PropertyKey, any>, Record<PropertyKey, any>\n>;\nexport default _default;";

const WRAPPER_OPEN: &str = "import(\"riot\").RiotComponentWrapper<";

/// Which declaration of a component to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// As seen from inside the component.
    Internal,
    /// As seen by importers.
    External,
}

/// Declaration-only emission of the script at `path`.
///
/// The program is restricted to the component and its own declaration
/// file, plus whatever they transitively depend on. `None` when the
/// compiler emits nothing usable.
pub fn emit_internal_declaration(engine: &mut ScriptEngine, path: &str) -> Option<String> {
    let scope = engine.restrict_program_to_scripts(&[path.to_string(), declaration_path(path)]);
    let output = engine.emit_declaration(&scope, path)?;
    match output.usable_text() {
        Some(text) => Some(text.to_string()),
        None => {
            debug!(
                path,
                diagnostics = output.diagnostics.len(),
                "declaration emit produced nothing usable"
            );
            None
        }
    }
}

/// Rewrite an internal declaration into the external one.
///
/// Finds `export default <name>;`, then the declarator binding `<name>`,
/// and wraps its type annotation. Everything else is kept byte for byte.
pub fn to_external_declaration(internal: &str) -> Option<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, internal, SourceType::d_ts()).parse();
    if ret.panicked {
        debug!("internal declaration does not parse");
        return None;
    }

    let body = &ret.program.body;
    let exported = default_export_name(body)?;
    let (start, end) = body
        .iter()
        .find_map(|stmt| declarator_annotation(internal, stmt, &exported))?;

    let mut out = String::with_capacity(internal.len() + WRAPPER_OPEN.len() + 1);
    out.push_str(&internal[..start]);
    out.push_str(WRAPPER_OPEN);
    out.push_str(&internal[start..end]);
    out.push('>');
    out.push_str(&internal[end..]);
    Some(out)
}

fn default_export_name(body: &[Statement<'_>]) -> Option<String> {
    let declaration = body.iter().find_map(|stmt| match stmt {
        Statement::ExportDefaultDeclaration(decl) => Some(&decl.declaration),
        _ => None,
    })?;
    match declaration {
        ExportDefaultDeclarationKind::Identifier(ident) => Some(ident.name.to_string()),
        _ => None,
    }
}

/// Byte range of the type annotation of the declarator binding `name`.
fn declarator_annotation(source: &str, stmt: &Statement<'_>, name: &str) -> Option<(usize, usize)> {
    let var = match stmt {
        Statement::VariableDeclaration(var) => var,
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(var)) => var,
            _ => return None,
        },
        _ => return None,
    };

    var.declarations.iter().find_map(|declarator| {
        let BindingPattern::BindingIdentifier(id) = &declarator.id else {
            return None;
        };
        if id.name.as_str() != name {
            return None;
        }
        let end = declarator
            .init
            .as_ref()
            .map_or(declarator.span.end, |init| init.span().start);
        annotation_between(source, id.span.end as usize, end as usize)
    })
}

/// The type after `:` in `source[from..to]`, whitespace and a trailing `=`
/// excluded.
fn annotation_between(source: &str, from: usize, to: usize) -> Option<(usize, usize)> {
    let slice = source.get(from..to)?;
    let colon = slice.find(|c: char| !c.is_whitespace())?;
    if !slice[colon..].starts_with(':') {
        return None;
    }

    let after = colon + 1;
    let ty = &slice[after..];
    let trimmed = ty.trim_end().trim_end_matches('=').trim_end();
    let start = from + after + (ty.len() - ty.trim_start().len());
    let end = from + after + trimmed.len();
    (start < end).then_some((start, end))
}
