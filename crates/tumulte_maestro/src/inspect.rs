//! Inspection queries.
//!
//! Read-only views of the host's intermediate state, used by debugging
//! commands of an editor integration.

use tumulte_canon::ProgramScope;
use tumulte_carton::normalize_path;

use crate::host::AnalysisHost;
use crate::ide::QueryTarget;
use crate::slots::{extract_slots, SlotInfo};

impl AnalysisHost {
    /// Script text the engine holds for a component.
    pub fn script_content(&self, path: &str) -> Option<String> {
        self.engine()
            .document_text(&normalize_path(path))
            .map(str::to_string)
    }

    /// Scope function synthesized for the expression at `offset`.
    pub fn expression_scope_function(&mut self, path: &str, offset: u32) -> Option<String> {
        let path = normalize_path(path);
        self.touch(&path)?;
        match self.query_target(&path, offset)? {
            QueryTarget::Expression(scope) => Some(scope.text),
            QueryTarget::Script { .. } => None,
        }
    }

    pub fn slots(&mut self, path: &str) -> Vec<SlotInfo> {
        self.touch(path)
            .map(|document| extract_slots(document.tree()))
            .unwrap_or_default()
    }

    /// Root files of the program under `scope`.
    pub fn program_files(&mut self, scope: &ProgramScope) -> Vec<String> {
        self.engine_mut().root_file_names(scope)
    }

    /// Type signature of the symbol at `offset`.
    pub fn type_at(&mut self, path: &str, offset: u32) -> Option<String> {
        let path = normalize_path(path);
        let target = self.query_target(&path, offset)?;
        let target_offset = target.to_target_offset(offset)?;
        self.engine_mut()
            .quick_info_at(&ProgramScope::Unrestricted, target.file_key(&path), target_offset)
            .map(|info| info.display)
    }
}
