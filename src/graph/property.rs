//! Property bags for entities and relationships
//!
//! Keys and values are both plain strings. There is no typed storage: `"30"`
//! and `"30 "` are different values and matching is always exact.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Sentinel argument meaning "every item" in place of an explicit list
pub const WILDCARD: &str = "ALL";

/// String-to-string property container attached to an entity or relationship
///
/// Insertion order is kept only so rendered output is stable; it carries no
/// meaning for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: IndexMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a property, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Remove a property, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Remove every property, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// True when `key` is present and mapped to exactly `value`
    pub fn matches(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read the selected properties
    ///
    /// With `ALL` every present property is returned. With an explicit key
    /// list each requested key appears once, mapped to `None` when absent.
    pub fn select(&self, keys: &KeySelector) -> IndexMap<String, Option<String>> {
        match keys {
            KeySelector::All => self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), Some(v.clone())))
                .collect(),
            KeySelector::Keys(keys) => keys
                .iter()
                .map(|k| (k.clone(), self.entries.get(k).cloned()))
                .collect(),
        }
    }

    /// Delete the selected properties and report what happened per key
    pub fn remove_selected(&mut self, keys: &KeySelector) -> PropertyRemoval {
        match keys {
            KeySelector::All => PropertyRemoval::Cleared {
                removed: self.clear(),
            },
            KeySelector::Keys(keys) => PropertyRemoval::Keys(
                keys.iter()
                    .collect::<IndexSet<_>>()
                    .into_iter()
                    .map(|key| KeyRemoval {
                        key: key.clone(),
                        found: self.remove(key).is_some(),
                    })
                    .collect(),
            ),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PropertyBag {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Which properties a read or delete applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySelector {
    /// The `ALL` wildcard
    All,
    /// An explicit, non-empty key list
    Keys(Vec<String>),
}

impl KeySelector {
    /// Build a selector from already-trimmed fields
    ///
    /// `ALL` is only a wildcard when it is the sole field; mixed in with other
    /// keys it is treated as a literal key name.
    pub fn from_fields(fields: Vec<String>) -> Self {
        if fields.len() == 1 && fields[0] == WILDCARD {
            KeySelector::All
        } else {
            KeySelector::Keys(fields)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, KeySelector::All)
    }
}

/// Per-key outcome of an explicit property deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRemoval {
    pub key: String,
    pub found: bool,
}

/// Outcome of deleting properties from a bag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyRemoval {
    /// `ALL` was requested; every property was dropped
    Cleared { removed: usize },
    /// Explicit keys were requested
    Keys(Vec<KeyRemoval>),
}

impl PropertyRemoval {
    /// False only for an explicit key list where none of the keys existed
    pub fn any_found(&self) -> bool {
        match self {
            PropertyRemoval::Cleared { .. } => true,
            PropertyRemoval::Keys(keys) => keys.iter().any(|k| k.found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PropertyBag {
        [("age", "30"), ("city", "NYC")].into_iter().collect()
    }

    #[test]
    fn test_set_overwrites() {
        let mut bag = PropertyBag::new();
        assert_eq!(bag.set("age", "30"), None);
        assert_eq!(bag.set("age", "31"), Some("30".to_string()));
        assert_eq!(bag.get("age"), Some("31"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_select_explicit_marks_absent_keys() {
        let bag = sample();
        let selected = bag.select(&KeySelector::Keys(vec!["age".into(), "height".into()]));
        assert_eq!(selected.get("age"), Some(&Some("30".to_string())));
        assert_eq!(selected.get("height"), Some(&None));
    }

    #[test]
    fn test_select_all() {
        let bag = sample();
        let selected = bag.select(&KeySelector::All);
        assert_eq!(selected.len(), 2);
        assert!(selected.values().all(Option::is_some));
    }

    #[test]
    fn test_remove_selected_reports_per_key() {
        let mut bag = sample();
        let removal = bag.remove_selected(&KeySelector::Keys(vec!["age".into(), "zip".into()]));
        assert!(removal.any_found());
        assert_eq!(
            removal,
            PropertyRemoval::Keys(vec![
                KeyRemoval { key: "age".into(), found: true },
                KeyRemoval { key: "zip".into(), found: false },
            ])
        );
        assert!(!bag.contains("age"));
        assert!(bag.contains("city"));
    }

    #[test]
    fn test_remove_selected_none_found() {
        let mut bag = sample();
        let removal = bag.remove_selected(&KeySelector::Keys(vec!["zip".into()]));
        assert!(!removal.any_found());
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_remove_all() {
        let mut bag = sample();
        let removal = bag.remove_selected(&KeySelector::All);
        assert_eq!(removal, PropertyRemoval::Cleared { removed: 2 });
        assert!(bag.is_empty());
    }

    #[test]
    fn test_matches_is_exact() {
        let bag = sample();
        assert!(bag.matches("city", "NYC"));
        assert!(!bag.matches("city", "nyc"));
        assert!(!bag.matches("city", "NYC "));
        assert!(!bag.matches("town", "NYC"));
    }

    #[test]
    fn test_repeated_keys_removed_once() {
        let mut bag = sample();
        let removal = bag.remove_selected(&KeySelector::Keys(vec![
            "age".into(),
            "age".into(),
            "email".into(),
        ]));
        assert_eq!(
            removal,
            PropertyRemoval::Keys(vec![
                KeyRemoval {
                    key: "age".into(),
                    found: true,
                },
                KeyRemoval {
                    key: "email".into(),
                    found: false,
                },
            ])
        );
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_wildcard_only_when_alone() {
        assert!(KeySelector::from_fields(vec!["ALL".into()]).is_all());
        assert_eq!(
            KeySelector::from_fields(vec!["ALL".into(), "age".into()]),
            KeySelector::Keys(vec!["ALL".into(), "age".into()])
        );
        assert!(!KeySelector::from_fields(vec!["all".into()]).is_all());
    }
}
