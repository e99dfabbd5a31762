//! Script analysis run after each load.

use crate::collab::{ValidationRequest, Validator};
use tokio::sync::mpsc;

/// Findings for one script of a [`ValidationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub name: String,
    pub node_count: usize,
    pub compile_errors: Vec<String>,
    pub findings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.compile_errors.is_empty() && self.findings.is_empty()
    }
}

/// Lint every script in the request. Compile errors reported by the runtime
/// are attached to each report unchanged.
pub fn analyse(request: &ValidationRequest) -> Vec<ValidationReport> {
    request
        .scripts
        .iter()
        .map(|(name, text)| {
            let (node_count, findings) = match weaver_script::compile(name, text) {
                Ok(script) => (
                    script.nodes().len(),
                    weaver_script::lint(&script)
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                ),
                Err(_) => (0, Vec::new()),
            };
            ValidationReport {
                name: name.clone(),
                node_count,
                compile_errors: request.errors.clone(),
                findings,
            }
        })
        .collect()
}

/// Logs lint findings and compile errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintValidator;

impl Validator for LintValidator {
    fn submit(&self, request: ValidationRequest) {
        for report in analyse(&request) {
            for error in &report.compile_errors {
                tracing::warn!(script = %report.name, "{error}");
            }
            for finding in &report.findings {
                tracing::warn!(script = %report.name, "{finding}");
            }
            if report.is_clean() {
                tracing::info!(script = %report.name, nodes = report.node_count, "script is clean");
            }
        }
    }
}

/// Hands requests to another task, e.g. a front end drawing a readout.
impl Validator for mpsc::UnboundedSender<ValidationRequest> {
    fn submit(&self, request: ValidationRequest) {
        if self.send(request).is_err() {
            tracing::debug!("validation receiver dropped");
        }
    }
}
