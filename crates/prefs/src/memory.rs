use crate::{PreferenceStore, PrefsError};
use std::collections::BTreeMap;

/// In-memory store, used by tests and by sessions that shouldn't touch disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
    saves: usize,
    read_only: bool,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `save` always fails.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn delete_all(&mut self) {
        self.values.clear();
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        if self.read_only {
            return Err(PrefsError::ReadOnly);
        }
        self.saves += 1;
        Ok(())
    }
}
