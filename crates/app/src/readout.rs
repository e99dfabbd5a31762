//! Compile readout: the text shown next to a stopped script.

use crate::dto::ReportDto;
use tokio::sync::mpsc;
use weaver_core::{ValidationReport, ValidationRequest, analyse};

/// Analyse every request queued so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ValidationRequest>) -> Vec<ValidationReport> {
    let mut reports = Vec::new();
    while let Ok(request) = rx.try_recv() {
        reports.extend(analyse(&request));
    }
    reports
}

pub fn render(report: &ValidationReport) -> String {
    let mut out = format!("{} ({} nodes)", report.name, report.node_count);
    if report.is_clean() {
        out.push_str("\n  no problems found");
    }
    for error in &report.compile_errors {
        out.push_str("\n  error: ");
        out.push_str(error);
    }
    for finding in &report.findings {
        out.push_str("\n  warning: ");
        out.push_str(finding);
    }
    out
}

pub fn print(reports: Vec<ValidationReport>, json: bool) -> anyhow::Result<()> {
    if json {
        let dtos: Vec<ReportDto> = reports.into_iter().map(ReportDto::from).collect();
        println!("{}", serde_json::to_string_pretty(&dtos)?);
    } else {
        for report in &reports {
            println!("{}", render(report));
        }
    }
    Ok(())
}
