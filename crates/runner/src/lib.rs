//! Line-presenting dialogue runner.
//!
//! A run walks the start node's body one line at a time on a spawned task.
//! The runner talks to the task over a command channel and observes it
//! through a watch channel, so stopping is a request that the task
//! acknowledges by publishing [`Status::Stopped`].

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use weaver_script::{Node, Script};

const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Stopped,
    Running { node: String, line: Option<String> },
}

impl Status {
    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running { .. })
    }

    pub fn node(&self) -> Option<&str> {
        match self {
            Status::Running { node, .. } => Some(node),
            Status::Stopped => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    #[error("no start node selected")]
    NoStartNode,

    #[error("node '{0}' is not loaded")]
    UnknownNode(String),

    #[error("dialogue is already running")]
    AlreadyRunning,
}

pub struct DialogueRunner {
    scripts: Vec<Script>,
    start_node: Option<String>,
    commands: Option<mpsc::Sender<Command>>,
    status: Arc<watch::Sender<Status>>,
}

impl DialogueRunner {
    pub fn new() -> Self {
        let (status, _) = watch::channel(Status::Stopped);
        Self {
            scripts: Vec::new(),
            start_node: None,
            commands: None,
            status: Arc::new(status),
        }
    }

    pub fn add_script(&mut self, script: Script) {
        tracing::debug!(script = %script.name, nodes = script.nodes().len(), "script added");
        self.scripts.push(script);
    }

    /// Forget every loaded script and the selected start node.
    pub fn clear(&mut self) {
        self.scripts.clear();
        self.start_node = None;
    }

    /// Node titles across all scripts, in definition order.
    pub fn node_names(&self) -> Vec<String> {
        self.scripts
            .iter()
            .flat_map(|s| s.node_names().map(str::to_string))
            .collect()
    }

    pub fn node(&self, title: &str) -> Option<&Node> {
        self.scripts.iter().find_map(|s| s.node(title))
    }

    pub fn set_start_node(&mut self, title: impl Into<String>) {
        self.start_node = Some(title.into());
    }

    pub fn start_node(&self) -> Option<&str> {
        self.start_node.as_deref()
    }

    /// Begin presenting the start node. Must be called within a tokio runtime.
    pub fn start(&mut self) -> Result<(), RunnerError> {
        if self.is_running() {
            return Err(RunnerError::AlreadyRunning);
        }
        let title = self.start_node.clone().ok_or(RunnerError::NoStartNode)?;
        let node = self
            .node(&title)
            .cloned()
            .ok_or_else(|| RunnerError::UnknownNode(title.clone()))?;

        let lines: Vec<String> = node
            .lines
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        self.status.send_replace(Status::Running {
            node: title.clone(),
            line: lines.first().cloned(),
        });
        self.commands = Some(command_tx);

        tracing::debug!(node = %title, "dialogue started");
        tokio::spawn(run_node(title, lines, command_rx, Arc::clone(&self.status)));
        Ok(())
    }

    /// Ask the running dialogue to stop. Use [`DialogueRunner::wait_stopped`]
    /// to wait for the acknowledgement.
    pub fn stop(&mut self) {
        if let Some(commands) = self.commands.take() {
            // A closed channel means the run already finished on its own.
            let _ = commands.try_send(Command::Stop);
        }
    }

    pub fn advance(&self) {
        if let Some(commands) = &self.commands {
            let _ = commands.try_send(Command::Advance);
        }
    }

    pub async fn wait_stopped(&self) {
        let mut status = self.status.subscribe();
        // The sender lives as long as `self`, so this only returns once stopped.
        let _ = status.wait_for(|s| !s.is_running()).await;
    }

    pub fn is_running(&self) -> bool {
        self.status.borrow().is_running()
    }

    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    pub fn current_node(&self) -> Option<String> {
        self.status.borrow().node().map(str::to_string)
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }
}

impl Default for DialogueRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// The first line is published by [`DialogueRunner::start`]; each advance
/// publishes the next one.
async fn run_node(
    node: String,
    lines: Vec<String>,
    mut commands: mpsc::Receiver<Command>,
    status: Arc<watch::Sender<Status>>,
) {
    let mut index = 0;
    while index < lines.len() {
        match commands.recv().await {
            Some(Command::Advance) => {
                index += 1;
                if let Some(line) = lines.get(index) {
                    status.send_replace(Status::Running {
                        node: node.clone(),
                        line: Some(line.clone()),
                    });
                }
            }
            Some(Command::Stop) | None => break,
        }
    }
    status.send_replace(Status::Stopped);
    tracing::debug!(node = %node, "dialogue stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn script() -> Script {
        weaver_script::compile(
            "test",
            "title: Start\n---\nOne\n\nTwo\n===\ntitle: Empty\n---\n===\n",
        )
        .expect("compile")
    }

    #[test]
    fn test_node_names_span_scripts_in_order() {
        let mut runner = DialogueRunner::new();
        runner.add_script(script());
        runner.add_script(weaver_script::compile("more", "title: Later\n---\nx\n===\n").expect("compile"));

        assert_eq!(runner.node_names(), vec!["Start", "Empty", "Later"]);

        runner.clear();
        assert!(runner.node_names().is_empty());
        assert!(runner.start_node().is_none());
    }

    #[tokio::test]
    async fn test_start_requires_start_node() {
        let mut runner = DialogueRunner::new();
        runner.add_script(script());
        assert_eq!(runner.start(), Err(RunnerError::NoStartNode));

        runner.set_start_node("Nope");
        assert_eq!(runner.start(), Err(RunnerError::UnknownNode("Nope".to_string())));
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn test_advance_walks_lines_then_stops() {
        let mut runner = DialogueRunner::new();
        runner.add_script(script());
        runner.set_start_node("Start");
        runner.start().expect("start");

        assert!(runner.is_running());
        assert_eq!(runner.current_node().as_deref(), Some("Start"));
        assert_eq!(
            runner.status(),
            Status::Running {
                node: "Start".to_string(),
                line: Some("One".to_string())
            }
        );
        assert_eq!(runner.start(), Err(RunnerError::AlreadyRunning));

        runner.advance();
        let mut status = runner.subscribe();
        timeout(
            Duration::from_secs(1),
            status.wait_for(|s| {
                matches!(s, Status::Running { line: Some(l), .. } if l == "Two")
            }),
        )
        .await
        .expect("second line")
        .expect("status channel open");

        runner.advance();
        timeout(Duration::from_secs(1), runner.wait_stopped())
            .await
            .expect("run finishes after last line");
        assert!(runner.current_node().is_none());
    }

    #[tokio::test]
    async fn test_stop_is_acknowledged() {
        let mut runner = DialogueRunner::new();
        runner.add_script(script());
        runner.set_start_node("Start");
        runner.start().expect("start");

        runner.stop();
        timeout(Duration::from_secs(1), runner.wait_stopped())
            .await
            .expect("stop acknowledged");
        assert!(!runner.is_running());

        // A stopped runner can start again.
        runner.start().expect("restart");
        assert!(runner.is_running());
    }

    #[tokio::test]
    async fn test_empty_node_stops_immediately() {
        let mut runner = DialogueRunner::new();
        runner.add_script(script());
        runner.set_start_node("Empty");
        runner.start().expect("start");

        timeout(Duration::from_secs(1), runner.wait_stopped())
            .await
            .expect("empty node ends on its own");
    }
}
