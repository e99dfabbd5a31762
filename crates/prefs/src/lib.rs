//! Small persistent key-value store for user preferences.

mod file;
mod memory;

pub use file::FilePrefs;
pub use memory::MemoryPrefs;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse preferences '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Preferences store is read-only")]
    ReadOnly,
}

/// String preferences keyed by name.
///
/// Writes are buffered until [`PreferenceStore::save`] makes them durable.
pub trait PreferenceStore {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: &str);

    fn delete_all(&mut self);

    fn save(&mut self) -> Result<(), PrefsError>;

    fn has_key(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }
}
