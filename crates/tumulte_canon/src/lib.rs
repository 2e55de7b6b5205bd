//! # tumulte_canon
//!
//! Canon - The script analysis engine behind Tumulte components.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------------+
//! |                      tumulte_canon                        |
//! +-----------------------------------------------------------+
//! |                                                           |
//! |  +-------------------+     +------------------------+     |
//! |  | ScriptEngine      |---->| dyn ScriptCompiler     |     |
//! |  | - update/remove   |     | (type checker service) |     |
//! |  | - restrict scope  |     +------------------------+     |
//! |  | - queries         |                 |                  |
//! |  +-------------------+                 v                  |
//! |           |                  +------------------------+   |
//! |           v                  | Program (view)         |   |
//! |  +-------------------+       | - root files, reads    |   |
//! |  | ScriptHost        |<------| - module resolution    |   |
//! |  | - VirtualFileSys  |       +------------------------+   |
//! |  | - DependencyGraph |                                    |
//! |  +-------------------+                                    |
//! +-----------------------------------------------------------+
//! ```
//!
//! The compiler is a black box. Everything it learns about files goes
//! through a [`Program`] view: root file names, versions, reads, existence
//! probes and module resolution. Every probe that finds a file while
//! resolving an importer's modules becomes an edge of the
//! [`DependencyGraph`], which later drives cache invalidation.

mod compiler;
mod engine;
mod graph;
mod host;
mod program;
mod resolver;
mod types;
mod vfs;

pub use compiler::{CompilerError, CompilerResult, ScriptCompiler};
pub use engine::ScriptEngine;
pub use graph::DependencyGraph;
pub use host::{HostSettings, ScriptHost};
pub use program::{Program, ProgramScope};
pub use resolver::{ModuleResolver, ResolvedModule, SCRIPT_EXTENSIONS};
pub use types::{
    CompletionEntry, CompletionInfo, CompletionLabelDetails, DefinitionInfo, EmitOutput,
    JsDocTag, MemberInfo, MemberKind, QuickInfo, ScriptElementKind, TextSpan,
};
pub use vfs::{VirtualDocument, VirtualFileSystem};
