//! Label index
//!
//! Derived mapping from label to the names of live entities carrying it. A
//! label key exists if and only if at least one member remains.

use super::types::Label;
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: IndexMap<Label, IndexSet<String>>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: Label, name: impl Into<String>) {
        self.labels.entry(label).or_default().insert(name.into());
    }

    /// Remove `name` from `label`, dropping the label once it has no members
    ///
    /// Returns whether the name was indexed under that label.
    pub fn remove(&mut self, label: &Label, name: &str) -> bool {
        let Some(members) = self.labels.get_mut(label) else {
            return false;
        };
        let removed = members.shift_remove(name);
        if members.is_empty() {
            self.labels.shift_remove(label);
        }
        removed
    }

    /// Names currently carrying `label`, in insertion order
    pub fn members(&self, label: &Label) -> Option<&IndexSet<String>> {
        self.labels.get(label)
    }

    pub fn contains(&self, label: &Label, name: &str) -> bool {
        self.labels
            .get(label)
            .map(|members| members.contains(name))
            .unwrap_or(false)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.keys()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
