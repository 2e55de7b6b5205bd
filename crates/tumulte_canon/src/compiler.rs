//! The compiler/type-checking service, seen as a black box.

use crate::program::Program;
use crate::types::{CompletionInfo, DefinitionInfo, EmitOutput, MemberInfo, QuickInfo};

/// Error type for compiler calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompilerError {
    /// The file is not part of the program.
    #[error("file is not part of the program: {0}")]
    MissingFile(String),

    /// The offset does not fall inside the file.
    #[error("offset {offset} is out of range in {path}")]
    OffsetOutOfRange { path: String, offset: u32 },

    /// The compiler does not implement this capability.
    #[error("capability not supported: {0}")]
    Unsupported(&'static str),

    /// The compiler was disposed.
    #[error("compiler has been disposed")]
    Disposed,

    /// Anything else the compiler reports.
    #[error("compiler failure: {0}")]
    Internal(String),
}

/// Result type for compiler calls.
pub type CompilerResult<T> = Result<T, CompilerError>;

/// A type-checking service over a [`Program`].
///
/// Paths handed to the compiler are overlay keys: component paths hold the
/// component's script text, `<component>.d.ts` holds a materialized
/// declaration, and `<component>#expression:<n>` holds a synthesized
/// expression scope. Offsets are byte offsets into those texts.
pub trait ScriptCompiler {
    fn completions_at(
        &mut self,
        program: &mut Program<'_>,
        path: &str,
        offset: u32,
    ) -> CompilerResult<Option<CompletionInfo>>;

    fn quick_info_at(
        &mut self,
        program: &mut Program<'_>,
        path: &str,
        offset: u32,
    ) -> CompilerResult<Option<QuickInfo>>;

    fn definitions_at(
        &mut self,
        program: &mut Program<'_>,
        path: &str,
        offset: u32,
    ) -> CompilerResult<Vec<DefinitionInfo>>;

    fn type_definitions_at(
        &mut self,
        _program: &mut Program<'_>,
        _path: &str,
        _offset: u32,
    ) -> CompilerResult<Vec<DefinitionInfo>> {
        Ok(Vec::new())
    }

    /// Declaration-only emission of `path`, captured in memory.
    fn emit_declaration(
        &mut self,
        program: &mut Program<'_>,
        path: &str,
    ) -> CompilerResult<EmitOutput>;

    /// Members of the type of `path`'s default export.
    fn default_export_members(
        &mut self,
        _program: &mut Program<'_>,
        _path: &str,
    ) -> CompilerResult<Vec<MemberInfo>> {
        Err(CompilerError::Unsupported("default_export_members"))
    }

    /// The file defining the component registered under `component_key` in
    /// the `components` map of `path`'s default export.
    fn resolve_defining_file(
        &mut self,
        _program: &mut Program<'_>,
        _path: &str,
        _component_key: &str,
    ) -> CompilerResult<Option<String>> {
        Err(CompilerError::Unsupported("resolve_defining_file"))
    }

    /// Release whatever the compiler holds.
    fn dispose(&mut self) {}
}
