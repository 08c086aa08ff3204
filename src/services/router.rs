//! Scan code to visual key routing.

use anyhow::Result;
use std::collections::HashMap;

use crate::models::Layout;

/// Maps each monitored scan code to exactly one key id.
#[derive(Debug, Clone, Default)]
pub struct KeyRouter {
    routes: HashMap<u16, String>,
}

impl KeyRouter {
    /// Builds the routing table for a layout.
    ///
    /// Unbound keys are skipped. Two keys bound to the same scan code is an
    /// error naming both.
    pub fn build(layout: &Layout) -> Result<Self> {
        let mut routes: HashMap<u16, String> = HashMap::new();
        let mut labels: HashMap<u16, &str> = HashMap::new();

        for key in &layout.keys {
            let Some(code) = key.scan_code else {
                continue;
            };
            if let Some(first) = labels.get(&code) {
                anyhow::bail!(
                    "Keys '{}' and '{}' are both bound to scan code {code}",
                    first,
                    key.display_label()
                );
            }
            labels.insert(code, key.display_label());
            routes.insert(code, key.id.clone());
        }

        Ok(Self { routes })
    }

    /// Key id for a scan code.
    #[must_use]
    pub fn route(&self, scan_code: u16) -> Option<&str> {
        self.routes.get(&scan_code).map(String::as_str)
    }

    /// All routed scan codes, sorted.
    #[must_use]
    pub fn scan_codes(&self) -> Vec<u16> {
        let mut codes: Vec<u16> = self.routes.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Number of routed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is routed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyBinding, KeyDefinition, KeyRect};

    #[test]
    fn test_routes_each_bound_key() {
        let mut layout = Layout::new("t");
        layout.add_key(KeyDefinition::bound(&KeyBinding::new("a", 30), KeyRect::default()));
        layout.add_key(KeyDefinition::bound(&KeyBinding::new("b", 48), KeyRect::default()));
        layout.add_key(KeyDefinition::new("unbound", KeyRect::default()));

        let router = KeyRouter::build(&layout).unwrap();
        assert_eq!(router.len(), 2);
        assert_eq!(router.route(30), Some(layout.keys[0].id.as_str()));
        assert_eq!(router.route(48), Some(layout.keys[1].id.as_str()));
        assert_eq!(router.route(1), None);
        assert_eq!(router.scan_codes(), vec![30, 48]);
    }

    #[test]
    fn test_duplicate_scan_code_names_both_keys() {
        let mut layout = Layout::new("t");
        let mut first = KeyDefinition::bound(&KeyBinding::new("a", 30), KeyRect::default());
        first.label = "Left A".to_string();
        let mut second = KeyDefinition::bound(&KeyBinding::new("a", 30), KeyRect::default());
        second.label = "Right A".to_string();
        layout.add_key(first);
        layout.add_key(second);

        let err = KeyRouter::build(&layout).unwrap_err().to_string();
        assert!(err.contains("Left A"));
        assert!(err.contains("Right A"));
        assert!(err.contains("30"));
    }

    #[test]
    fn test_empty_layout() {
        let router = KeyRouter::build(&Layout::new("t")).unwrap();
        assert!(router.is_empty());
    }
}
