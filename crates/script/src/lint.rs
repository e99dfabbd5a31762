use crate::Script;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintFinding {
    /// A jump or link points at a node that doesn't exist.
    BrokenLink { node: String, target: String },
    /// A node without any non-blank body line.
    EmptyNode { node: String },
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintFinding::BrokenLink { node, target } => {
                write!(f, "node '{node}' links to missing node '{target}'")
            }
            LintFinding::EmptyNode { node } => write!(f, "node '{node}' has no content"),
        }
    }
}

/// Analyse a compiled script for problems the compiler accepts.
pub fn lint(script: &Script) -> Vec<LintFinding> {
    let mut findings = Vec::new();

    for node in script.nodes() {
        if node.lines.iter().all(|l| l.trim().is_empty()) {
            findings.push(LintFinding::EmptyNode {
                node: node.title.clone(),
            });
        }

        for line in &node.lines {
            for target in link_targets(line) {
                if script.node(target).is_none() {
                    findings.push(LintFinding::BrokenLink {
                        node: node.title.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
    }

    findings
}

/// Targets of `<<jump Target>>` commands and `[[Label|Target]]` / `[[Target]]` links.
fn link_targets(line: &str) -> Vec<&str> {
    let mut targets = Vec::new();

    let mut rest = line;
    while let Some(start) = rest.find("<<") {
        let Some(len) = rest[start..].find(">>") else {
            break;
        };
        let command = rest[start + 2..start + len].trim();
        if let Some(target) = command.strip_prefix("jump ") {
            let target = target.trim();
            if !target.is_empty() {
                targets.push(target);
            }
        }
        rest = &rest[start + len + 2..];
    }

    let mut rest = line;
    while let Some(start) = rest.find("[[") {
        let Some(len) = rest[start..].find("]]") else {
            break;
        };
        let link = &rest[start + 2..start + len];
        let target = link.rsplit('|').next().unwrap_or(link).trim();
        if !target.is_empty() {
            targets.push(target);
        }
        rest = &rest[start + len + 2..];
    }

    targets
}
