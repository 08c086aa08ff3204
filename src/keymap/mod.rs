//! Scan-code table.
//!
//! Maps physical key codes (Linux evdev code space) to the key names stored
//! in layouts and used to pick sound clips, and back. The table is embedded
//! in the binary at compile time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Group of keys for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCodeCategory {
    /// Category ID (e.g., "letters", "modifiers")
    pub id: String,
    /// Display name
    pub name: String,
}

/// One physical key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCodeEntry {
    /// Physical key code
    pub code: u16,
    /// Canonical key name (e.g., "a", "left windows", "page up")
    pub name: String,
    /// Category ID
    pub category: String,
    /// Other names that resolve to this key (shifted symbols, synonyms)
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScanCodeFile {
    #[allow(dead_code)]
    version: String,
    categories: Vec<ScanCodeCategory>,
    keys: Vec<ScanCodeEntry>,
}

/// Lookup table between key codes and key names.
#[derive(Debug, Clone)]
pub struct ScanCodeTable {
    entries: Vec<ScanCodeEntry>,
    categories: Vec<ScanCodeCategory>,
    by_code: HashMap<u16, usize>,
    /// Lowercased names and aliases
    by_name: HashMap<String, usize>,
}

impl ScanCodeTable {
    /// Loads the table from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("scancodes.json");
        let file: ScanCodeFile =
            serde_json::from_str(json_data).context("Failed to parse embedded scancodes.json")?;

        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();

        for (idx, entry) in file.keys.iter().enumerate() {
            by_code.insert(entry.code, idx);
            by_name.insert(entry.name.to_lowercase(), idx);
            for alias in &entry.aliases {
                by_name.entry(alias.to_lowercase()).or_insert(idx);
            }
        }

        Ok(Self {
            entries: file.keys,
            categories: file.categories,
            by_code,
            by_name,
        })
    }

    /// Entry for a key code.
    #[must_use]
    pub fn get(&self, code: u16) -> Option<&ScanCodeEntry> {
        self.by_code.get(&code).and_then(|idx| self.entries.get(*idx))
    }

    /// Name for a key code; codes outside the table get `key <code>`.
    #[must_use]
    pub fn name_for(&self, code: u16) -> String {
        self.get(code)
            .map_or_else(|| format!("key {code}"), |entry| entry.name.clone())
    }

    /// Key code for a name or alias (case-insensitive).
    ///
    /// Also understands the `key <code>` form produced by [`Self::name_for`].
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<u16> {
        let lowered = name.trim().to_lowercase();
        if let Some(idx) = self.by_name.get(&lowered) {
            return self.entries.get(*idx).map(|e| e.code);
        }
        // A lone space trims to nothing.
        if lowered.is_empty() && name == " " {
            return self.code_for("space");
        }
        lowered
            .strip_prefix("key ")
            .and_then(|rest| rest.trim().parse().ok())
    }

    /// Entries whose name, alias, or code matches `query`, best match first.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ScanCodeEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries.iter().collect();
        }

        let mut results: Vec<(&ScanCodeEntry, i32)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let name = entry.name.to_lowercase();
                if name == query || entry.code.to_string() == query {
                    return Some((entry, 100));
                }
                if entry.aliases.iter().any(|a| a.to_lowercase() == query) {
                    return Some((entry, 80));
                }
                if name.starts_with(&query) {
                    return Some((entry, 50));
                }
                if name.contains(&query) || entry.category == query {
                    return Some((entry, 10));
                }
                None
            })
            .collect();

        results.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.code.cmp(&b.0.code)));
        results.into_iter().map(|(entry, _)| entry).collect()
    }

    /// All entries in code order.
    #[must_use]
    pub fn all(&self) -> &[ScanCodeEntry] {
        &self.entries
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[ScanCodeCategory] {
        &self.categories
    }

    /// Number of known keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_table() {
        let table = ScanCodeTable::load().unwrap();
        assert!(table.len() > 100);
        assert!(!table.categories().is_empty());

        // every entry's category exists
        for entry in table.all() {
            assert!(
                table.categories().iter().any(|c| c.id == entry.category),
                "unknown category for {}",
                entry.name
            );
        }
    }

    #[test]
    fn test_code_and_name_lookup() {
        let table = ScanCodeTable::load().unwrap();
        assert_eq!(table.code_for("a"), Some(30));
        assert_eq!(table.code_for("A"), Some(30));
        assert_eq!(table.code_for("space"), Some(57));
        assert_eq!(table.code_for(" "), Some(57));
        assert_eq!(table.code_for("!"), Some(2));
        assert_eq!(table.code_for("Left Shift"), Some(42));
        assert_eq!(table.name_for(28), "enter");
        assert_eq!(table.name_for(54), "right shift");
    }

    #[test]
    fn test_unknown_codes_roundtrip_through_fallback_name() {
        let table = ScanCodeTable::load().unwrap();
        assert_eq!(table.name_for(700), "key 700");
        assert_eq!(table.code_for("key 700"), Some(700));
        assert_eq!(table.code_for("no such key"), None);
    }

    #[test]
    fn test_search_ranks_exact_first() {
        let table = ScanCodeTable::load().unwrap();
        let results = table.search("f1");
        assert_eq!(results[0].name, "f1");
        assert!(results.iter().any(|e| e.name == "f12"));

        let by_code = table.search("57");
        assert_eq!(by_code[0].name, "space");

        assert_eq!(table.search("").len(), table.len());
    }
}
