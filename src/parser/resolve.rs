use std::collections::HashMap;

use serde::Serialize;

/// Type names that are never namespace-qualified.
pub fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "string" | "array" | "mixed" | "bool" | "int" | "integer" | "boolean"
    )
}

/// Per-source-unit mapping from an imported short name to its fully
/// qualified absolute name, built from `use` statements.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, absolute: impl Into<String>) {
        self.map.insert(alias.into(), absolute.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Resolve a raw identifier against the alias table and the current
/// namespace. Primitives and already-absolute names pass through unchanged,
/// so resolution is idempotent. The alias lookup uses the pre-trim text; the
/// table was built from token text that never carries surrounding blanks.
pub fn make_absolute(aliases: &AliasTable, namespace: &str, raw: &str) -> String {
    let trimmed = raw.trim();

    if is_primitive(trimmed) {
        return trimmed.to_string();
    }
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('\\') {
        return trimmed.to_string();
    }

    if let Some(absolute) = aliases.get(raw) {
        return absolute.to_string();
    }

    let mut out = String::from(namespace);
    if !out.ends_with('\\') {
        out.push('\\');
    }
    out.push_str(trimmed);
    out
}
