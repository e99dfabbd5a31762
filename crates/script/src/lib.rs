mod compile;
mod lint;

use serde::{Deserialize, Serialize};

pub use compile::{compile, compile_json, compile_text};
pub use lint::{LintFinding, lint};

/// A named unit of dialogue content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub lines: Vec<String>,
}

/// A compiled script. Nodes keep the order they were defined in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    nodes: Vec<Node>,
}

impl Script {
    pub fn new(name: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, title: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.title == title)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.title.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("line {line}: node has no title")]
    MissingTitle { line: usize },

    #[error("line {line}: malformed header '{text}'")]
    MalformedHeader { line: usize, text: String },

    #[error("duplicate node title '{title}'")]
    DuplicateNode { title: String },

    #[error("node '{title}' is missing its '---' body separator")]
    MissingSeparator { title: String },

    #[error("node '{title}' is not terminated with '==='")]
    Unterminated { title: String },

    #[error("invalid JSON script: {0}")]
    Json(String),
}
