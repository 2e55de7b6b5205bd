//! Module resolution offered to the compiler.
//!
//! Resolution is a sequence of existence probes against the
//! [`VirtualFileSystem`]. Every probe that finds a file is logged, whether or
//! not the candidate ends up being the resolved module; the log becomes the
//! importer's edges in the dependency graph.

use serde::{Deserialize, Serialize};
use tumulte_carton::{dirname, join_path};

use crate::vfs::VirtualFileSystem;

/// Extensions the compiler can load as scripts.
pub const SCRIPT_EXTENSIONS: &[&str] = &[
    ".d.ts", ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json",
];

/// Candidates tried after the raw path, in order.
const CANDIDATE_SUFFIXES: &[&str] = &[
    ".ts",
    ".tsx",
    ".d.ts",
    ".js",
    ".jsx",
    "/index.ts",
    "/index.tsx",
    "/index.d.ts",
    "/index.js",
];

/// A resolved import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModule {
    pub resolved_file_name: String,
    /// Found under `node_modules`.
    pub is_external_library_import: bool,
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
}

/// Resolves specifiers for one importer while logging successful probes.
pub struct ModuleResolver<'a> {
    vfs: &'a VirtualFileSystem,
    probes: Vec<String>,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(vfs: &'a VirtualFileSystem) -> Self {
        Self {
            vfs,
            probes: Vec::new(),
        }
    }

    /// Resolve `specifier` as imported from `importer`.
    pub fn resolve(&mut self, importer: &str, specifier: &str) -> Option<ResolvedModule> {
        if is_path_specifier(specifier) {
            let base = join_path(dirname(importer), specifier);
            return self.resolve_path(&base).map(|resolved_file_name| ResolvedModule {
                resolved_file_name,
                is_external_library_import: false,
            });
        }

        self.resolve_package(importer, specifier)
            .map(|resolved_file_name| ResolvedModule {
                resolved_file_name,
                is_external_library_import: true,
            })
    }

    /// Files found by probes so far, in probe order.
    pub fn probes(&self) -> &[String] {
        &self.probes
    }

    pub fn into_probes(self) -> Vec<String> {
        self.probes
    }

    fn probe(&mut self, path: &str) -> bool {
        let exists = self.vfs.file_exists(path);
        if exists && !self.probes.iter().any(|p| p == path) {
            self.probes.push(path.to_string());
        }
        exists
    }

    /// Probe the raw path, then the extension and index candidates. A raw
    /// path without a script extension (`./child.riot`) is logged when it
    /// exists but resolution keeps going (`./child.riot.d.ts`).
    fn resolve_path(&mut self, base: &str) -> Option<String> {
        if self.probe(base) && has_script_extension(base) {
            return Some(base.to_string());
        }
        CANDIDATE_SUFFIXES.iter().find_map(|suffix| {
            let candidate = format!("{base}{suffix}");
            self.probe(&candidate).then_some(candidate)
        })
    }

    /// Walk up from the importer looking in `node_modules`, then
    /// `node_modules/@types`.
    fn resolve_package(&mut self, importer: &str, specifier: &str) -> Option<String> {
        let mut dir = dirname(importer).to_string();
        loop {
            let node_modules = join_path(&dir, "node_modules");
            if let Some(found) = self.resolve_package_dir(&join_path(&node_modules, specifier)) {
                return Some(found);
            }
            let types_dir = join_path(
                &node_modules,
                &format!("@types/{}", types_package_name(specifier)),
            );
            if let Some(found) = self.resolve_package_dir(&types_dir) {
                return Some(found);
            }

            let parent = dirname(&dir);
            if parent.is_empty() || parent == dir {
                return None;
            }
            dir = parent.to_string();
        }
    }

    fn resolve_package_dir(&mut self, package_dir: &str) -> Option<String> {
        let manifest_path = format!("{package_dir}/package.json");
        if self.probe(&manifest_path) {
            let types = self
                .vfs
                .read_file(&manifest_path)
                .and_then(|text| serde_json::from_str::<PackageManifest>(&text).ok())
                .and_then(|manifest| manifest.types.or(manifest.typings));
            if let Some(types) = types {
                if let Some(found) = self.resolve_path(&join_path(package_dir, &types)) {
                    return Some(found);
                }
            }
        }
        self.resolve_path(package_dir)
    }
}

/// Relative or absolute specifiers resolve against the filesystem; anything
/// else is a package name.
fn is_path_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || specifier.as_bytes().get(1) == Some(&b':')
}

fn has_script_extension(path: &str) -> bool {
    SCRIPT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// `@scope/name` -> `scope__name`
fn types_package_name(specifier: &str) -> String {
    match specifier.strip_prefix('@') {
        Some(scoped) => scoped.replacen('/', "__", 1),
        None => specifier.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn overlay(files: &[&str]) -> VirtualFileSystem {
        let mut vfs = VirtualFileSystem::default();
        for file in files {
            vfs.update(file, "");
        }
        vfs
    }

    #[test]
    fn test_relative_script() {
        let vfs = overlay(&["/w/src/util.ts"]);
        let mut resolver = ModuleResolver::new(&vfs);

        let resolved = resolver.resolve("/w/src/app.riot", "./util").unwrap();
        assert_eq!(resolved.resolved_file_name, "/w/src/util.ts");
        assert!(!resolved.is_external_library_import);
        assert_eq!(resolver.probes(), ["/w/src/util.ts"]);
    }

    #[test]
    fn test_component_import_logs_source_and_declaration() {
        let vfs = overlay(&["/w/child.riot", "/w/child.riot.d.ts"]);
        let mut resolver = ModuleResolver::new(&vfs);

        let resolved = resolver.resolve("/w/app.riot", "./child.riot").unwrap();
        assert_eq!(resolved.resolved_file_name, "/w/child.riot.d.ts");
        assert_eq!(
            resolver.into_probes(),
            vec!["/w/child.riot".to_string(), "/w/child.riot.d.ts".to_string()]
        );
    }

    #[test]
    fn test_component_without_declaration_still_logged() {
        let vfs = overlay(&["/w/child.riot"]);
        let mut resolver = ModuleResolver::new(&vfs);

        assert!(resolver.resolve("/w/app.riot", "./child.riot").is_none());
        assert_eq!(resolver.probes(), ["/w/child.riot"]);
    }

    #[test]
    fn test_index_file() {
        let vfs = overlay(&["/w/lib/index.d.ts"]);
        let mut resolver = ModuleResolver::new(&vfs);

        let resolved = resolver.resolve("/w/src/app.riot", "../lib").unwrap();
        assert_eq!(resolved.resolved_file_name, "/w/lib/index.d.ts");
    }

    #[test]
    fn test_unresolved_records_nothing() {
        let vfs = overlay(&[]);
        let mut resolver = ModuleResolver::new(&vfs);

        assert!(resolver.resolve("/w/app.riot", "./missing").is_none());
        assert!(resolver.probes().is_empty());
    }

    #[test]
    fn test_package_types_field() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().replace('\\', "/");
        let pkg = dir.path().join("node_modules/riot");
        fs::create_dir_all(pkg.join("types")).unwrap();
        fs::write(pkg.join("package.json"), r#"{ "types": "./types/riot.d.ts" }"#).unwrap();
        fs::write(pkg.join("types/riot.d.ts"), "export {};").unwrap();

        let vfs = VirtualFileSystem::default();
        let mut resolver = ModuleResolver::new(&vfs);
        let resolved = resolver.resolve(&format!("{root}/src/app.riot"), "riot").unwrap();

        assert_eq!(
            resolved.resolved_file_name,
            format!("{root}/node_modules/riot/types/riot.d.ts")
        );
        assert!(resolved.is_external_library_import);
        assert_eq!(
            resolver.probes(),
            [
                format!("{root}/node_modules/riot/package.json"),
                format!("{root}/node_modules/riot/types/riot.d.ts"),
            ]
        );
    }

    #[test]
    fn test_types_package() {
        let vfs = overlay(&["/w/node_modules/@types/scope__pkg/index.d.ts"]);
        let mut resolver = ModuleResolver::new(&vfs);

        let resolved = resolver.resolve("/w/src/app.riot", "@scope/pkg").unwrap();
        assert_eq!(
            resolved.resolved_file_name,
            "/w/node_modules/@types/scope__pkg/index.d.ts"
        );
    }
}
