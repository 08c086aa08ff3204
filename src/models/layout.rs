//! Layout and metadata data structures.

use crate::models::key::KeyDefinition;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptive data stored next to the keys.
///
/// Every field is optional on disk; plain `{"keys": [...]}` files get
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetadata {
    /// Layout name (e.g., "My 60% board")
    pub name: String,
    /// Long description
    pub description: String,
    /// Creation timestamp (ISO 8601)
    #[serde(default = "unstamped")]
    pub created: DateTime<Utc>,
    /// Last modification timestamp (ISO 8601)
    #[serde(default = "unstamped")]
    pub modified: DateTime<Utc>,
}

/// Placeholder for a timestamp the file did not carry.
fn unstamped() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl LayoutMetadata {
    /// Creates metadata stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: String::new(),
            created: now,
            modified: now,
        }
    }

    /// Updates the modification timestamp to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Metadata of a file that has none: default name, no timestamps.
    pub fn unstamped() -> Self {
        Self {
            created: unstamped(),
            modified: unstamped(),
            ..Self::default()
        }
    }

    /// Returns true if both timestamps came from the file.
    #[must_use]
    pub fn is_stamped(&self) -> bool {
        self.created != unstamped() && self.modified != unstamped()
    }
}

impl Default for LayoutMetadata {
    fn default() -> Self {
        Self::new("Untitled Layout")
    }
}

/// Outcome of [`Layout::validate`].
///
/// Errors make a layout unusable (it cannot be saved or visualized);
/// warnings are reported but tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Problems that block saving and visualizing
    pub errors: Vec<String>,
    /// Suspicious but legal content
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Folds the errors into a single `anyhow` error.
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Layout is invalid:\n  - {}", self.errors.join("\n  - "))
        }
    }
}

/// An ordered set of visual keys.
///
/// Order is paint order: later keys are drawn above earlier ones, and hit
/// testing prefers the topmost key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Layout {
    /// Descriptive data
    #[serde(default = "LayoutMetadata::unstamped")]
    pub metadata: LayoutMetadata,
    /// Key elements
    #[serde(default)]
    pub keys: Vec<KeyDefinition>,
}

impl Layout {
    /// Creates an empty layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: LayoutMetadata::new(name),
            keys: Vec::new(),
        }
    }

    /// Appends a key on top of the others.
    pub fn add_key(&mut self, key: KeyDefinition) {
        self.keys.push(key);
    }

    /// Removes a key by id.
    pub fn remove_key(&mut self, id: &str) -> Option<KeyDefinition> {
        let index = self.keys.iter().position(|k| k.id == id)?;
        Some(self.keys.remove(index))
    }

    /// Looks up a key by id.
    pub fn find_key(&self, id: &str) -> Option<&KeyDefinition> {
        self.keys.iter().find(|k| k.id == id)
    }

    /// Looks up a key by id for modification.
    pub fn find_key_mut(&mut self, id: &str) -> Option<&mut KeyDefinition> {
        self.keys.iter_mut().find(|k| k.id == id)
    }

    /// Topmost key containing the point.
    pub fn key_at(&self, x: i32, y: i32) -> Option<&KeyDefinition> {
        self.keys.iter().rev().find(|k| k.rect().contains(x, y))
    }

    /// Key bound to a physical key code.
    pub fn key_for_scan_code(&self, scan_code: u16) -> Option<&KeyDefinition> {
        self.keys.iter().find(|k| k.scan_code == Some(scan_code))
    }

    /// Smallest `(width, height)` from the origin that covers every key.
    pub fn extent(&self) -> (i32, i32) {
        self.keys.iter().fold((0, 0), |(w, h), key| {
            let rect = key.rect();
            (w.max(rect.right()), h.max(rect.bottom()))
        })
    }

    /// Scan codes of all bound keys, sorted and deduplicated.
    pub fn bound_scan_codes(&self) -> Vec<u16> {
        let mut codes: Vec<u16> = self.keys.iter().filter_map(|k| k.scan_code).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Updates the modification timestamp.
    pub fn touch(&mut self) {
        self.metadata.touch();
    }

    /// Checks structural invariants.
    ///
    /// Errors: duplicate ids, two keys sharing a scan code, keys smaller than
    /// `min_key_size`, negative positions. Warnings: unbound keys, blank
    /// labels, an empty layout.
    pub fn validate(&self, min_key_size: i32) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.keys.is_empty() {
            report.warnings.push("Layout has no keys".to_string());
        }

        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut codes: HashMap<u16, usize> = HashMap::new();

        for (index, key) in self.keys.iter().enumerate() {
            let name = describe(index, key);

            if key.id.trim().is_empty() {
                report.errors.push(format!("{name}: empty id"));
            } else if let Some(first) = ids.insert(key.id.as_str(), index) {
                report.errors.push(format!(
                    "{name}: id '{}' already used by {}",
                    key.id,
                    describe(first, &self.keys[first])
                ));
            }

            match key.scan_code {
                Some(code) => {
                    if let Some(first) = codes.insert(code, index) {
                        report.errors.push(format!(
                            "{name}: scan code {code} already bound to {}",
                            describe(first, &self.keys[first])
                        ));
                    }
                }
                None => report.warnings.push(format!("{name}: not bound to a key")),
            }

            if key.width < min_key_size || key.height < min_key_size {
                report.errors.push(format!(
                    "{name}: size {}x{} is below the minimum of {min_key_size}",
                    key.width, key.height
                ));
            }

            if key.x < 0 || key.y < 0 {
                report
                    .errors
                    .push(format!("{name}: negative position ({}, {})", key.x, key.y));
            }

            if key.label.trim().is_empty() {
                report.warnings.push(format!("{name}: empty label"));
            }
        }

        report
    }
}

fn describe(index: usize, key: &KeyDefinition) -> String {
    let label = key.display_label();
    if label.is_empty() {
        format!("key #{}", index + 1)
    } else {
        format!("key #{} '{label}'", index + 1)
    }
}
