//! Program scopes and the compiler's view of the host.

use serde::Serialize;

use crate::host::ScriptHost;
use crate::resolver::ResolvedModule;

/// Which files the compiler treats as program roots for one call.
///
/// A scope is a value passed into each query instead of a mode stored on
/// the engine, so a restricted query can never leak into the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "files", rename_all = "camelCase")]
pub enum ProgramScope {
    /// Every overlaid file is a root.
    #[default]
    Unrestricted,
    /// Exactly these files are roots.
    Restricted(Vec<String>),
}

impl ProgramScope {
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted(_))
    }
}

/// What a [`ScriptCompiler`](crate::ScriptCompiler) sees of the host during
/// one call.
pub struct Program<'a> {
    host: &'a mut ScriptHost,
    scope: &'a ProgramScope,
}

impl<'a> Program<'a> {
    pub fn new(host: &'a mut ScriptHost, scope: &'a ProgramScope) -> Self {
        Self { host, scope }
    }

    pub fn scope(&self) -> &ProgramScope {
        self.scope
    }

    /// Program roots for this call.
    pub fn root_file_names(&self) -> Vec<String> {
        match self.scope {
            ProgramScope::Unrestricted => self.host.vfs().paths(),
            ProgramScope::Restricted(files) => files.clone(),
        }
    }

    pub fn script_version(&self, path: &str) -> String {
        self.host.vfs().version_of(path)
    }

    pub fn read_file(&self, path: &str) -> Option<String> {
        self.host.vfs().read_file(path)
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.host.vfs().file_exists(path)
    }

    pub fn current_directory(&self) -> &str {
        &self.host.settings().current_directory
    }

    pub fn lib_dir(&self) -> Option<&str> {
        self.host.vfs().lib_dir()
    }

    /// Resolve the imports of `importer`, recording dependency edges.
    pub fn resolve_module_names<S: AsRef<str>>(
        &mut self,
        importer: &str,
        specifiers: &[S],
    ) -> Vec<Option<ResolvedModule>> {
        self.host.resolve_module_names(importer, specifiers)
    }
}
