//! Dependency graph for cache invalidation.
//!
//! Edges are a probe log: `importer -> every file found while resolving its
//! imports`, including candidates the compiler ended up not using. Over
//! approximating only costs extra invalidations.

use std::collections::VecDeque;

use tumulte_carton::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Directed edges: `importer -> dependencies`.
    edges: FxHashMap<String, FxHashSet<String>>,
    /// Reverse edges: `dependency -> importers`.
    reverse: FxHashMap<String, FxHashSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dependencies of `importer` with the result of a fresh
    /// resolution pass. Edges from earlier passes are dropped.
    pub fn set_dependencies(
        &mut self,
        importer: &str,
        dependencies: impl IntoIterator<Item = String>,
    ) {
        self.remove_importer(importer);

        let dependencies: FxHashSet<String> = dependencies
            .into_iter()
            .filter(|dep| dep != importer)
            .collect();
        if dependencies.is_empty() {
            return;
        }
        for dep in &dependencies {
            self.reverse
                .entry(dep.clone())
                .or_default()
                .insert(importer.to_string());
        }
        self.edges.insert(importer.to_string(), dependencies);
    }

    /// Drop the outgoing edges of `importer`.
    pub fn remove_importer(&mut self, importer: &str) {
        let Some(old) = self.edges.remove(importer) else {
            return;
        };
        for dep in old {
            if let Some(importers) = self.reverse.get_mut(&dep) {
                importers.remove(importer);
                if importers.is_empty() {
                    self.reverse.remove(&dep);
                }
            }
        }
    }

    /// Direct dependencies of `importer`, sorted.
    pub fn dependencies_of(&self, importer: &str) -> Vec<String> {
        sorted(self.edges.get(importer))
    }

    /// Direct importers of `dependency`, sorted.
    pub fn importers_of(&self, dependency: &str) -> Vec<String> {
        sorted(self.reverse.get(dependency))
    }

    /// Every file that directly or transitively depends on `path`, in
    /// breadth-first order. `path` itself is only included when
    /// `include_self` is set, even if a cycle leads back to it.
    pub fn dependants_of(&self, path: &str, include_self: bool) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut queue = VecDeque::new();

        seen.insert(path.to_string());
        if include_self {
            out.push(path.to_string());
        }
        queue.push_back(path.to_string());

        while let Some(current) = queue.pop_front() {
            for importer in self.importers_of(&current) {
                if seen.insert(importer.clone()) {
                    out.push(importer.clone());
                    queue.push_back(importer);
                }
            }
        }
        out
    }

    /// `roots` followed by everything they transitively depend on.
    pub fn dependency_closure(&self, roots: &[String]) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut queue = VecDeque::new();

        for root in roots {
            if seen.insert(root.clone()) {
                out.push(root.clone());
                queue.push_back(root.clone());
            }
        }
        while let Some(current) = queue.pop_front() {
            for dep in self.dependencies_of(&current) {
                if seen.insert(dep.clone()) {
                    out.push(dep.clone());
                    queue.push_back(dep);
                }
            }
        }
        out
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(FxHashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.reverse.clear();
    }
}

fn sorted(set: Option<&FxHashSet<String>>) -> Vec<String> {
    let mut out: Vec<String> = set.map(|s| s.iter().cloned().collect()).unwrap_or_default();
    out.sort();
    out
}
