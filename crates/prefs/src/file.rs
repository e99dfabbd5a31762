use crate::{PreferenceStore, PrefsError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Preferences kept as a flat TOML table on disk.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("yarn-weaver").join("prefs.toml"))
    }

    pub fn open_default() -> Result<Self, PrefsError> {
        let path = Self::default_path().ok_or(PrefsError::NoConfigDir)?;
        Self::open(path)
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| PrefsError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for FilePrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn delete_all(&mut self) {
        self.values.clear();
    }

    /// Writes a sibling temp file and renames it over the store, so readers
    /// see either the old table or the new one.
    fn save(&mut self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = toml::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), keys = self.values.len(), "preferences saved");
        Ok(())
    }
}
