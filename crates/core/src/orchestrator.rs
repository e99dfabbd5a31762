//! Opening dialogue scripts and bringing the runtime back to a playable state.
//!
//! Every load runs as one task with two suspension points: waiting for a
//! running dialogue to stop, and fetching the script text. Loads never
//! overlap: [`LoadOrchestrator`] needs `&mut self`, and
//! [`SharedOrchestrator`] turns a concurrent request away with
//! [`LoadError::LoadInProgress`].

use crate::collab::{ContentSource, DialogueRuntime, ValidationRequest, Validator};
use crate::error::LoadError;
use crate::history::RecentFiles;
use crate::location::script_name;
use crate::session::{SessionState, SessionView};
use crate::start_node::select_start_node;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use weaver_prefs::PreferenceStore;

pub const DEFAULT_PREFS_KEY_PREFIX: &str = "YarnWeaver_File";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// History entries are stored under `<prefix><index>`.
    pub prefs_key_prefix: String,
    pub history_limit: Option<usize>,
    /// Start the dialogue after a clean load.
    pub auto_play: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            prefs_key_prefix: DEFAULT_PREFS_KEY_PREFIX.to_string(),
            history_limit: None,
            auto_play: true,
        }
    }
}

/// Outcome of one load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    Success,
    Failure(Vec<String>),
}

impl LoadResult {
    pub fn from_attempt(attempt: &Result<LoadReport, LoadError>) -> Self {
        match attempt {
            Ok(report) => report.result(),
            Err(e) => LoadResult::Failure(vec![e.to_string()]),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadResult::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub location: String,
    /// Name the script was compiled and validated under.
    pub script_name: String,
    pub errors: Vec<String>,
    /// Node the dialogue was started from, if it was started.
    pub started: Option<String>,
}

impl LoadReport {
    pub fn result(&self) -> LoadResult {
        if self.errors.is_empty() {
            LoadResult::Success
        } else {
            LoadResult::Failure(self.errors.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Stopped,
    Started(String),
}

#[derive(Debug, Clone)]
struct Sample {
    name: String,
    text: String,
}

pub struct LoadOrchestrator<S, R, V, P> {
    source: S,
    runtime: R,
    validator: V,
    prefs: P,
    options: OrchestratorOptions,
    state: SessionState,
    history: RecentFiles,
    sample: Option<Sample>,
}

impl<S, R, V, P> LoadOrchestrator<S, R, V, P>
where
    S: ContentSource,
    R: DialogueRuntime,
    V: Validator,
    P: PreferenceStore,
{
    pub fn new(source: S, runtime: R, validator: V, prefs: P, options: OrchestratorOptions) -> Self {
        let history = RecentFiles::new(options.history_limit);
        Self {
            source,
            runtime,
            validator,
            prefs,
            options,
            state: SessionState::new(),
            history,
            sample: None,
        }
    }

    /// Read the persisted history. Returns the number of entries found.
    pub fn restore_history(&mut self) -> usize {
        self.history = RecentFiles::load(
            &self.prefs,
            &self.options.prefs_key_prefix,
            self.options.history_limit,
        );
        tracing::debug!(entries = self.history.len(), "file history restored");
        self.history.len()
    }

    /// Open the script at `location`.
    ///
    /// A failed fetch leaves the session, history and loaded script as they
    /// were. Compile errors don't fail the load: the file is still opened and
    /// recorded, but it can't be played until it compiles.
    pub async fn load_from(&mut self, location: &str) -> Result<LoadReport, LoadError> {
        tracing::info!(location, "loading script");

        self.halt().await;

        // The previous script stays loaded until the new text is in hand.
        let text = match self.source.fetch(location).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(location, error = %e, "failed to fetch script");
                return Err(e.into());
            }
        };
        self.runtime.clear();

        self.state.current_file = Some(location.to_string());
        self.state.tutorial_mode = false;
        self.sample = None;

        let name = script_name(location);
        let errors = self.compile(&name, &text);

        self.history.push(location);
        self.persist_history();

        self.validator
            .submit(ValidationRequest::single(name.clone(), text, errors.clone()));

        let started = self.auto_start()?;
        Ok(LoadReport {
            location: location.to_string(),
            script_name: name,
            errors,
            started,
        })
    }

    /// Open the history entry at `index` (0 is the most recent).
    pub async fn load_recent(&mut self, index: usize) -> Result<LoadReport, LoadError> {
        let location = self
            .history
            .get(index)
            .map(str::to_string)
            .ok_or(LoadError::NoSuchRecentFile(index))?;
        self.load_from(&location).await
    }

    /// Open a bundled sample in tutorial mode. History is left alone.
    pub async fn load_sample(&mut self, name: &str, text: &str) -> Result<LoadReport, LoadError> {
        tracing::info!(sample = name, "loading sample script");

        self.halt().await;
        self.runtime.clear();

        self.state.current_file = None;
        self.state.tutorial_mode = true;
        self.sample = Some(Sample {
            name: name.to_string(),
            text: text.to_string(),
        });

        let errors = self.compile(name, text);
        let started = self.auto_start()?;
        Ok(LoadReport {
            location: name.to_string(),
            script_name: name.to_string(),
            errors,
            started,
        })
    }

    /// Stop the dialogue if it's running, otherwise start it.
    pub async fn toggle_run(&mut self) -> Result<Toggle, LoadError> {
        if self.runtime.is_running() {
            self.halt().await;
            return Ok(Toggle::Stopped);
        }
        if !self.state.is_file_open() {
            return Err(LoadError::NoFileOpen);
        }
        if !self.state.compiled_without_errors {
            return Err(LoadError::CompileErrors);
        }
        self.start_dialogue().map(Toggle::Started)
    }

    /// Load whatever is open again from its source.
    pub async fn refresh(&mut self) -> Result<Option<LoadReport>, LoadError> {
        if self.state.tutorial_mode {
            if let Some(sample) = self.sample.clone() {
                return self.load_sample(&sample.name, &sample.text).await.map(Some);
            }
        }
        match self.state.current_file.clone() {
            Some(location) => self.load_from(&location).await.map(Some),
            None => Ok(None),
        }
    }

    /// Close the open file and leave tutorial mode.
    pub async fn close(&mut self) {
        self.halt().await;
        self.runtime.clear();
        self.state = SessionState::new();
        self.sample = None;
        tracing::info!("session closed");
    }

    /// Drop every history entry, in memory and on disk.
    pub fn forget_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    pub fn view(&self) -> SessionView {
        let node = self.runtime.current_node();
        SessionView::new(&self.state, self.runtime.is_running(), node.as_deref())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &RecentFiles {
        &self.history
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    async fn halt(&mut self) {
        if self.runtime.is_running() {
            self.runtime.request_stop();
            self.runtime.wait_stopped().await;
        }
    }

    /// Compile into the runtime and record whether playback is allowed.
    fn compile(&mut self, name: &str, text: &str) -> Vec<String> {
        let mut errors = match self.runtime.compile(name, text) {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };
        if errors.is_empty() && self.runtime.node_names().is_empty() {
            errors.push(LoadError::EmptyScript.to_string());
        }

        for error in &errors {
            tracing::warn!(script = name, "{error}");
        }
        self.state.compiled_without_errors = errors.is_empty();
        errors
    }

    fn auto_start(&mut self) -> Result<Option<String>, LoadError> {
        if self.state.compiled_without_errors && self.options.auto_play {
            self.start_dialogue().map(Some)
        } else {
            Ok(None)
        }
    }

    fn start_dialogue(&mut self) -> Result<String, LoadError> {
        let display = match (&self.sample, &self.state.current_file) {
            (Some(sample), _) if self.state.tutorial_mode => sample.name.clone(),
            (_, Some(location)) => script_name(location),
            _ => String::new(),
        };

        let nodes = self.runtime.node_names();
        let node = select_start_node(&nodes, &display)?.to_string();

        self.runtime.set_start_node(&node);
        self.runtime.start().map_err(LoadError::Runtime)?;
        tracing::info!(node = %node, "dialogue started");
        Ok(node)
    }

    fn persist_history(&mut self) {
        if let Err(e) = self
            .history
            .persist(&mut self.prefs, &self.options.prefs_key_prefix)
        {
            tracing::warn!(error = %e, "failed to save file history");
        }
    }
}

/// A [`LoadOrchestrator`] shared between tasks.
pub struct SharedOrchestrator<S, R, V, P> {
    inner: Arc<Mutex<LoadOrchestrator<S, R, V, P>>>,
}

impl<S, R, V, P> Clone for SharedOrchestrator<S, R, V, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, R, V, P> SharedOrchestrator<S, R, V, P>
where
    S: ContentSource,
    R: DialogueRuntime,
    V: Validator,
    P: PreferenceStore,
{
    pub fn new(orchestrator: LoadOrchestrator<S, R, V, P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(orchestrator)),
        }
    }

    /// Load unless another operation holds the orchestrator.
    pub async fn try_load_from(&self, location: &str) -> Result<LoadReport, LoadError> {
        let mut orchestrator = self
            .inner
            .try_lock()
            .map_err(|_| LoadError::LoadInProgress)?;
        orchestrator.load_from(location).await
    }

    pub async fn lock(&self) -> MutexGuard<'_, LoadOrchestrator<S, R, V, P>> {
        self.inner.lock().await
    }
}
