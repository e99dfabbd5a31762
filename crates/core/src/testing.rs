//! Test doubles for the orchestrator's collaborators.

use crate::collab::{BoxError, ContentSource, DialogueRuntime, ValidationRequest, Validator};
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub struct MapSource {
    files: HashMap<String, String>,
}

impl MapSource {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, location: &str, text: &str) {
        self.files.insert(location.to_string(), text.to_string());
    }
}

#[async_trait]
impl ContentSource for MapSource {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::Io {
                location: location.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// Blocks every fetch until the gate is released.
pub struct GatedSource {
    text: String,
    gate: Arc<Gate>,
}

impl GatedSource {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            gate: Arc::new(Gate::default()),
        }
    }

    pub fn gate(&self) -> Arc<Gate> {
        Arc::clone(&self.gate)
    }
}

#[async_trait]
impl ContentSource for GatedSource {
    async fn fetch(&self, _location: &str) -> Result<String, FetchError> {
        self.gate.entered.notify_one();
        self.gate.release.notified().await;
        Ok(self.text.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    RequestStop,
    WaitStopped,
    Clear,
    Compile,
    SetStartNode,
    Start,
}

/// Runtime that records calls. Content `"fail"` doesn't compile; anything
/// else registers the fixed node list.
pub struct RecordingRuntime {
    nodes: Vec<String>,
    loaded: bool,
    running: Option<String>,
    start_node: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingRuntime {
    pub fn new(nodes: &[&str]) -> Self {
        Self {
            nodes: nodes.iter().map(|s| s.to_string()).collect(),
            loaded: false,
            running: None,
            start_node: None,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl DialogueRuntime for RecordingRuntime {
    fn is_running(&self) -> bool {
        self.running.is_some()
    }

    fn request_stop(&mut self) {
        self.record(Call::RequestStop);
        self.running = None;
    }

    async fn wait_stopped(&self) {
        self.record(Call::WaitStopped);
    }

    fn clear(&mut self) {
        self.record(Call::Clear);
        self.loaded = false;
    }

    fn compile(&mut self, _name: &str, text: &str) -> Result<(), Vec<String>> {
        self.record(Call::Compile);
        if text == "fail" {
            return Err(vec!["does not compile".to_string()]);
        }
        self.loaded = true;
        Ok(())
    }

    fn node_names(&self) -> Vec<String> {
        if self.loaded {
            self.nodes.clone()
        } else {
            Vec::new()
        }
    }

    fn set_start_node(&mut self, name: &str) {
        self.record(Call::SetStartNode);
        self.start_node = Some(name.to_string());
    }

    fn start(&mut self) -> Result<(), BoxError> {
        self.record(Call::Start);
        self.running = Some(self.start_node.clone().ok_or("no start node")?);
        Ok(())
    }

    fn current_node(&self) -> Option<String> {
        self.running.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingValidator {
    requests: Arc<Mutex<Vec<ValidationRequest>>>,
}

impl RecordingValidator {
    pub fn requests(&self) -> Vec<ValidationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Validator for RecordingValidator {
    fn submit(&self, request: ValidationRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }
}
