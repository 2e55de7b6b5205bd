//! Virtual File System.
//!
//! An in-memory overlay of script files over the real filesystem. Reads
//! resolve in order: overlay, disk, then the standard-library fallback.
//! Keys are normalized paths; callers normalize at the boundary.

use std::path::Path;

use tumulte_carton::{dirname, FxHashMap};

/// An overlaid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDocument {
    pub content: String,
    /// 0 on creation, incremented on every update.
    pub version: u32,
}

/// Overlay of in-memory script files.
#[derive(Debug, Default)]
pub struct VirtualFileSystem {
    documents: FxHashMap<String, VirtualDocument>,
    lib_dir: Option<String>,
}

impl VirtualFileSystem {
    pub fn new(lib_dir: Option<String>) -> Self {
        Self {
            documents: FxHashMap::default(),
            lib_dir: lib_dir.map(|dir| dir.trim_end_matches('/').to_string()),
        }
    }

    /// Create or update a file. Returns the new version.
    pub fn update(&mut self, path: &str, content: impl Into<String>) -> u32 {
        let content = content.into();
        match self.documents.get_mut(path) {
            Some(doc) => {
                doc.content = content;
                doc.version += 1;
                doc.version
            }
            None => {
                self.documents
                    .insert(path.to_string(), VirtualDocument { content, version: 0 });
                0
            }
        }
    }

    /// Remove a file from the overlay. Returns whether it was present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.documents.remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&VirtualDocument> {
        self.documents.get(path)
    }

    /// Overlay content only, without touching the disk.
    pub fn overlay_text(&self, path: &str) -> Option<&str> {
        self.documents.get(path).map(|doc| doc.content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Version as reported to the compiler. Files outside the overlay never
    /// change from the compiler's point of view.
    pub fn version_of(&self, path: &str) -> String {
        self.documents
            .get(path)
            .map_or(0, |doc| doc.version)
            .to_string()
    }

    /// Overlaid paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.documents.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.contains(path)
            || is_file(path)
            || self.lib_fallback(path).is_some_and(|lib| is_file(&lib))
    }

    /// Read a file. I/O errors read as "not found".
    pub fn read_file(&self, path: &str) -> Option<String> {
        if let Some(doc) = self.documents.get(path) {
            return Some(doc.content.clone());
        }
        if let Ok(content) = std::fs::read_to_string(path) {
            return Some(content);
        }
        let lib = self.lib_fallback(path)?;
        std::fs::read_to_string(lib).ok()
    }

    /// Remap a request for an unrecognized file under the library root to
    /// the canonical library file sharing its base name
    /// (`<lib>/dom.d.ts` -> `<lib>/lib.dom.d.ts`).
    pub fn lib_fallback(&self, path: &str) -> Option<String> {
        let lib_dir = self.lib_dir.as_deref().filter(|dir| !dir.is_empty())?;
        if dirname(path) != lib_dir {
            return None;
        }
        let base = path.get(lib_dir.len() + 1..)?;
        if base.is_empty() || base.starts_with("lib.") {
            return None;
        }
        Some(format!("{lib_dir}/lib.{base}"))
    }

    pub fn lib_dir(&self) -> Option<&str> {
        self.lib_dir.as_deref()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}
