//! Seams between the orchestrator and the systems it drives.

use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Where script text comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

/// The dialogue engine: compiles scripts and runs them.
#[async_trait]
pub trait DialogueRuntime: Send + Sync {
    fn is_running(&self) -> bool;

    /// Ask a running dialogue to stop. Returns before it has stopped.
    fn request_stop(&mut self);

    /// Resolve once no dialogue is running.
    async fn wait_stopped(&self);

    /// Drop all loaded scripts.
    fn clear(&mut self);

    /// Compile and register `text`. On failure the error messages are
    /// returned and nothing is registered.
    fn compile(&mut self, name: &str, text: &str) -> Result<(), Vec<String>>;

    fn node_names(&self) -> Vec<String>;

    fn set_start_node(&mut self, name: &str);

    fn start(&mut self) -> Result<(), BoxError>;

    fn current_node(&self) -> Option<String>;
}

/// Script texts keyed by display name, plus the errors the runtime raised
/// while compiling them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRequest {
    pub scripts: BTreeMap<String, String>,
    pub errors: Vec<String>,
}

impl ValidationRequest {
    pub fn single(name: impl Into<String>, text: impl Into<String>, errors: Vec<String>) -> Self {
        let mut scripts = BTreeMap::new();
        scripts.insert(name.into(), text.into());
        Self { scripts, errors }
    }
}

/// Independent analysis of freshly loaded scripts. Submission must not block.
pub trait Validator: Send + Sync {
    fn submit(&self, request: ValidationRequest);
}
