//! Wiring the orchestrator up with the real collaborators.

use crate::config::Config;
use anyhow::Context;
use tokio::sync::mpsc;
use weaver_core::{
    DialogueRunner, FilePrefs, FileSource, LoadOrchestrator, ValidationRequest,
};

pub type Weaver =
    LoadOrchestrator<FileSource, DialogueRunner, mpsc::UnboundedSender<ValidationRequest>, FilePrefs>;

pub const SAMPLE_NAME: &str = "tutorial";
pub const SAMPLE_SCRIPT: &str = include_str!("../assets/tutorial.yarn.txt");

/// Build an orchestrator with its history restored. Validation requests
/// arrive on the returned receiver.
pub fn open_weaver(config: &Config) -> anyhow::Result<(Weaver, mpsc::UnboundedReceiver<ValidationRequest>)> {
    let prefs = match &config.prefs_path {
        Some(path) => FilePrefs::open(path.clone()),
        None => FilePrefs::open_default(),
    }
    .context("Failed to open preferences")?;

    let (validation_tx, validation_rx) = mpsc::unbounded_channel();
    let mut weaver = LoadOrchestrator::new(
        FileSource,
        DialogueRunner::new(),
        validation_tx,
        prefs,
        config.options(),
    );
    weaver.restore_history();

    Ok((weaver, validation_rx))
}

/// Locations given on the command line become absolute `file://` URIs when
/// they name an existing file, so the same file always has one history entry.
pub fn normalize_location(input: &str) -> String {
    match std::fs::canonicalize(input) {
        Ok(path) => weaver_core::to_file_uri(&path),
        Err(_) => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_existing_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("story.yarn.txt");
        std::fs::write(&path, "").expect("write");

        let location = normalize_location(&path.to_string_lossy());
        assert!(location.starts_with("file://"));
        assert!(location.ends_with("/story.yarn.txt"));
    }

    #[test]
    fn test_normalize_keeps_unknown_locations() {
        assert_eq!(normalize_location("file:///nope/x.json"), "file:///nope/x.json");
    }

    #[tokio::test]
    async fn test_open_weaver_and_load_sample() {
        let dir = tempdir().expect("tempdir");
        let config = Config {
            prefs_path: Some(dir.path().join("prefs.toml")),
            auto_play: false,
            ..Config::default()
        };

        let (mut weaver, _rx) = open_weaver(&config).expect("open");
        let report = weaver
            .load_sample(SAMPLE_NAME, SAMPLE_SCRIPT)
            .await
            .expect("sample");

        assert!(report.errors.is_empty());
        assert!(weaver.state().tutorial_mode);
        assert!(weaver_core::analyse(&ValidationRequest::single(
            SAMPLE_NAME,
            SAMPLE_SCRIPT,
            vec![]
        ))[0]
            .is_clean());
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempdir().expect("tempdir");
        let script = dir.path().join("a.yarn.txt");
        std::fs::write(&script, "title: Start\n---\nHi\n===\n").expect("write");
        let config = Config {
            prefs_path: Some(dir.path().join("prefs.toml")),
            auto_play: false,
            ..Config::default()
        };

        let location = normalize_location(&script.to_string_lossy());
        {
            let (mut weaver, mut rx) = open_weaver(&config).expect("open");
            weaver.load_from(&location).await.expect("load");
            assert!(rx.try_recv().is_ok());
        }

        let (weaver, _rx) = open_weaver(&config).expect("reopen");
        assert_eq!(weaver.history().entries(), [location.as_str()]);
    }
}
