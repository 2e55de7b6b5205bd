//! Component compiler collaborator.

use serde::Serialize;

/// Error reported by a [`ComponentCompiler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("{message} at offset {offset}")]
    Syntax { message: String, offset: u32 },

    #[error("compilation failed: {0}")]
    Failed(String),
}

/// Output of compiling a component source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledOutput {
    pub code: String,
    /// Source map, when the compiler produces one.
    pub map: Option<String>,
}

/// Compiles a raw component source into runnable script.
pub trait ComponentCompiler {
    fn compile(&mut self, path: &str, source: &str) -> Result<CompiledOutput, CompileError>;
}
