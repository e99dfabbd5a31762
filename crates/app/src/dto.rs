//! JSON snapshots of the session for `--json` output.

use crate::state::Weaver;
use serde::Serialize;
use weaver_core::{LoadError, LoadReport, LoadResult, ValidationReport, recent_label};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub title: Option<String>,
    pub current_file: Option<String>,
    pub tutorial_mode: bool,
    pub compiled_without_errors: bool,
    pub running: bool,
    pub current_node: Option<String>,
    pub panels: PanelsDto,
    pub history: Vec<RecentFileDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_load: Option<LoadDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelsDto {
    pub work_area: bool,
    pub sidebar: bool,
    pub compile_readout: bool,
    pub play_button: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFileDto {
    pub location: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "result")]
pub enum LoadDto {
    Success {
        location: String,
        started: Option<String>,
    },
    Failure {
        location: String,
        errors: Vec<String>,
    },
}

impl LoadDto {
    pub fn from_attempt(location: &str, attempt: &Result<LoadReport, LoadError>) -> Self {
        let started = attempt.as_ref().ok().and_then(|r| r.started.clone());
        match LoadResult::from_attempt(attempt) {
            LoadResult::Success => LoadDto::Success {
                location: location.to_string(),
                started,
            },
            LoadResult::Failure(errors) => LoadDto::Failure {
                location: location.to_string(),
                errors,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub name: String,
    pub node_count: usize,
    pub compile_errors: Vec<String>,
    pub findings: Vec<String>,
}

impl From<ValidationReport> for ReportDto {
    fn from(report: ValidationReport) -> Self {
        Self {
            name: report.name,
            node_count: report.node_count,
            compile_errors: report.compile_errors,
            findings: report.findings,
        }
    }
}

pub fn weaver_to_snapshot(weaver: &Weaver, last_load: Option<LoadDto>) -> SessionSnapshot {
    let state = weaver.state();
    let view = weaver.view();
    let runner = weaver.runtime();

    SessionSnapshot {
        title: view.title,
        current_file: state.current_file.clone(),
        tutorial_mode: state.tutorial_mode,
        compiled_without_errors: state.compiled_without_errors,
        running: runner.is_running(),
        current_node: runner.current_node(),
        panels: PanelsDto {
            work_area: view.work_area_visible,
            sidebar: view.sidebar_visible,
            compile_readout: view.compile_readout_visible,
            play_button: view.play_button_visible,
        },
        history: weaver
            .history()
            .entries()
            .iter()
            .map(|location| {
                let label = recent_label(location);
                RecentFileDto {
                    location: location.clone(),
                    title: label.title,
                    detail: label.detail,
                }
            })
            .collect(),
        last_load,
    }
}
