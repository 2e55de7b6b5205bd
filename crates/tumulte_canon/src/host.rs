//! Script host: the state the compiler reads through a [`Program`](crate::Program).

use serde::Deserialize;
use tracing::debug;

use crate::graph::DependencyGraph;
use crate::resolver::{ModuleResolver, ResolvedModule};
use crate::vfs::VirtualFileSystem;

/// Settings of the script host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSettings {
    /// Directory relative paths are reported against.
    pub current_directory: String,
    /// Directory holding the standard-library declaration files.
    pub lib_dir: Option<String>,
}

/// Overlay files plus the dependency graph recorded from module resolution.
#[derive(Debug)]
pub struct ScriptHost {
    vfs: VirtualFileSystem,
    graph: DependencyGraph,
    settings: HostSettings,
}

impl ScriptHost {
    pub fn new(settings: HostSettings) -> Self {
        Self {
            vfs: VirtualFileSystem::new(settings.lib_dir.clone()),
            graph: DependencyGraph::new(),
            settings,
        }
    }

    pub fn vfs(&self) -> &VirtualFileSystem {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut VirtualFileSystem {
        &mut self.vfs
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    /// Resolve all imports of `importer` in one pass. The files found by
    /// successful probes replace the importer's previous edges.
    pub fn resolve_module_names<S: AsRef<str>>(
        &mut self,
        importer: &str,
        specifiers: &[S],
    ) -> Vec<Option<ResolvedModule>> {
        let mut resolver = ModuleResolver::new(&self.vfs);
        let resolved: Vec<_> = specifiers
            .iter()
            .map(|specifier| resolver.resolve(importer, specifier.as_ref()))
            .collect();

        let probes = resolver.into_probes();
        debug!(
            importer,
            specifiers = specifiers.len(),
            probes = probes.len(),
            "recorded module resolution"
        );
        self.graph.set_dependencies(importer, probes);
        resolved
    }

    /// Drop a file from the overlay along with its outgoing edges.
    pub fn remove_file(&mut self, path: &str) -> bool {
        self.graph.remove_importer(path);
        self.vfs.remove(path)
    }

    pub fn clear(&mut self) {
        self.vfs.clear();
        self.graph.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_records_edges() {
        let mut host = ScriptHost::new(HostSettings::default());
        host.vfs_mut().update("/w/child.riot", "export default {}");
        host.vfs_mut().update("/w/child.riot.d.ts", "export {}");
        host.vfs_mut().update("/w/app.riot", "import Child from './child.riot'");

        let resolved = host.resolve_module_names("/w/app.riot", &["./child.riot", "./gone"]);

        assert_eq!(
            resolved[0].as_ref().map(|m| m.resolved_file_name.as_str()),
            Some("/w/child.riot.d.ts")
        );
        assert!(resolved[1].is_none());
        assert_eq!(
            host.graph().dependencies_of("/w/app.riot"),
            vec!["/w/child.riot", "/w/child.riot.d.ts"]
        );
    }

    #[test]
    fn test_remove_file_drops_edges() {
        let mut host = ScriptHost::new(HostSettings::default());
        host.vfs_mut().update("/w/util.ts", "");
        host.vfs_mut().update("/w/app.riot", "");
        host.resolve_module_names("/w/app.riot", &["./util"]);

        assert!(host.remove_file("/w/app.riot"));
        assert!(host.graph().is_empty());
    }

    #[test]
    fn test_settings_deserialize() {
        let settings: HostSettings =
            serde_json::from_str(r#"{ "currentDirectory": "/w", "libDir": "/lib" }"#).unwrap();
        assert_eq!(settings.current_directory, "/w");
        assert_eq!(settings.lib_dir.as_deref(), Some("/lib"));
    }
}
