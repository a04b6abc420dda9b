use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::entity::{Entity, SourceUnit};

/// Downstream receiver of finished units. A unit is handed off once, fully
/// resolved, and never re-mutated by the parser afterwards.
pub trait SymbolSink: Sync {
    fn commit(&self, unit: SourceUnit);
}

/// In-memory lookup table keyed by file path. Safe to fill from parallel
/// parser instances. Units without a recorded path are dropped on commit.
#[derive(Default)]
pub struct SymbolTable {
    files: DashMap<PathBuf, SourceUnit>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Run `f` against the unit committed for `path`, if any.
    pub fn with_unit<R>(&self, path: &Path, f: impl FnOnce(&SourceUnit) -> R) -> Option<R> {
        self.files.get(path).map(|unit| f(&unit))
    }

    pub fn entity_count(&self) -> usize {
        self.files.iter().map(|entry| entry.arena.len()).sum()
    }

    /// Every (file, line) where an entity with this exact name is declared.
    pub fn find_by_name(&self, name: &str) -> Vec<(PathBuf, u32)> {
        let mut hits = Vec::new();
        for entry in self.files.iter() {
            for entity in entry.entities() {
                if entity.name == name {
                    hits.push((entry.key().clone(), entity.line));
                }
            }
        }
        hits
    }

    /// Run `f` over every committed entity.
    pub fn for_each_entity(&self, mut f: impl FnMut(&Path, &Entity)) {
        for entry in self.files.iter() {
            for entity in entry.entities() {
                f(entry.key(), entity);
            }
        }
    }
}

impl SymbolSink for SymbolTable {
    fn commit(&self, unit: SourceUnit) {
        if let Some(file) = unit.file.clone() {
            self.files.insert(file, unit);
        }
    }
}
