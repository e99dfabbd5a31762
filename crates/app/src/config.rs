use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use weaver_core::OrchestratorOptions;

fn default_prefix() -> String {
    weaver_core::orchestrator::DEFAULT_PREFS_KEY_PREFIX.to_string()
}

fn default_history_limit() -> Option<usize> {
    Some(10)
}

fn default_auto_play() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_prefix")]
    pub prefs_key_prefix: String,
    /// 0 keeps every entry.
    #[serde(default = "default_history_limit")]
    pub history_limit: Option<usize>,
    #[serde(default = "default_auto_play")]
    pub auto_play: bool,
    /// Overrides the platform location of the preferences file.
    #[serde(default)]
    pub prefs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefs_key_prefix: default_prefix(),
            history_limit: default_history_limit(),
            auto_play: default_auto_play(),
            prefs_path: None,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("yarn-weaver").join("config.toml"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Write the config to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            prefs_key_prefix: self.prefs_key_prefix.clone(),
            history_limit: self.history_limit.filter(|&n| n > 0),
            auto_play: self.auto_play,
        }
    }
}
