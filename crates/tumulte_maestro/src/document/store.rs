//! Document store and text sources.

use tumulte_carton::FxHashMap;

use super::ComponentDocument;

/// Supplies the text of a component that is not open yet.
pub trait TextSource {
    fn read(&self, path: &str) -> Option<String>;
}

/// Reads component text from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskTextSource;

impl TextSource for DiskTextSource {
    fn read(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}

/// Parsed component documents, keyed by normalized path.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: FxHashMap<String, ComponentDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any previous one at the same path.
    pub fn insert(&mut self, document: ComponentDocument) {
        self.documents
            .insert(document.path().to_string(), document);
    }

    pub fn remove(&mut self, path: &str) -> Option<ComponentDocument> {
        self.documents.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&ComponentDocument> {
        self.documents.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut ComponentDocument> {
        self.documents.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Paths of all documents, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.documents.keys().cloned().collect();
        paths.sort();
        paths
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
