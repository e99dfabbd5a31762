//! Most-recently-used list of opened locations.

use weaver_prefs::{PreferenceStore, PrefsError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentFiles {
    entries: Vec<String>,
    limit: Option<usize>,
}

impl RecentFiles {
    /// `limit` caps the list length; `None` keeps every entry.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Read `<prefix>0`, `<prefix>1`, ... until the first missing key.
    pub fn load(store: &impl PreferenceStore, prefix: &str, limit: Option<usize>) -> Self {
        let mut history = Self::new(limit);
        let mut stored = Vec::new();
        while let Some(location) = store.get_string(&key(prefix, stored.len())) {
            stored.push(location);
        }
        // Oldest first so the stored head ends up at the front again.
        for location in stored.into_iter().rev() {
            history.push(&location);
        }
        history
    }

    /// Replace everything in `store` with this list and save it.
    pub fn persist(&self, store: &mut impl PreferenceStore, prefix: &str) -> Result<(), PrefsError> {
        store.delete_all();
        for (index, location) in self.entries.iter().enumerate() {
            store.set_string(&key(prefix, index), location);
        }
        store.save()
    }

    /// Move `location` to the front. Returns true if it was already listed.
    pub fn push(&mut self, location: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != location);
        let duplicate = self.entries.len() != before;
        if duplicate {
            tracing::debug!(location, "duplicate location in file history");
        }

        self.entries.insert(0, location.to_string());
        if let Some(limit) = self.limit {
            self.entries.truncate(limit.max(1));
        }
        duplicate
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weaver_prefs::MemoryPrefs;

    const PREFIX: &str = "YarnWeaver_File";

    #[test]
    fn test_push_moves_duplicates_to_front() {
        let mut history = RecentFiles::new(None);
        assert!(!history.push("a.yarn"));
        assert!(!history.push("b.yarn"));
        assert!(history.push("a.yarn"));

        assert_eq!(history.entries(), ["a.yarn", "b.yarn"]);
    }

    #[test]
    fn test_push_same_location_twice_is_idempotent() {
        let mut history = RecentFiles::new(None);
        history.push("a.yarn");
        history.push("a.yarn");
        assert_eq!(history.entries(), ["a.yarn"]);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = RecentFiles::new(Some(2));
        history.push("a");
        history.push("b");
        history.push("c");
        assert_eq!(history.entries(), ["c", "b"]);
    }

    #[test]
    fn test_persist_then_load() {
        let mut store = MemoryPrefs::new();
        store.set_string("unrelated", "gone after persist");

        let mut history = RecentFiles::new(None);
        history.push("c");
        history.push("b");
        history.push("a");
        history.persist(&mut store, PREFIX).expect("persist");

        assert_eq!(store.get_string("YarnWeaver_File0").as_deref(), Some("a"));
        assert_eq!(store.get_string("YarnWeaver_File2").as_deref(), Some("c"));
        assert!(!store.has_key("unrelated"));
        assert_eq!(store.saves(), 1);

        let loaded = RecentFiles::load(&store, PREFIX, None);
        assert_eq!(loaded.entries(), ["a", "b", "c"]);
    }

    #[test]
    fn test_load_stops_at_gap_and_drops_duplicates() {
        let mut store = MemoryPrefs::new();
        store.set_string("YarnWeaver_File0", "a");
        store.set_string("YarnWeaver_File1", "b");
        store.set_string("YarnWeaver_File2", "a");
        store.set_string("YarnWeaver_File4", "after gap");

        let loaded = RecentFiles::load(&store, PREFIX, None);
        assert_eq!(loaded.entries(), ["a", "b"]);
    }

    #[test]
    fn test_load_applies_limit_keeping_newest() {
        let mut store = MemoryPrefs::new();
        for (i, loc) in ["a", "b", "c"].iter().enumerate() {
            store.set_string(&format!("{PREFIX}{i}"), loc);
        }

        let loaded = RecentFiles::load(&store, PREFIX, Some(2));
        assert_eq!(loaded.entries(), ["a", "b"]);
    }
}
