//! One function per CLI subcommand.

use crate::dto::{LoadDto, weaver_to_snapshot};
use crate::readout;
use crate::state::{SAMPLE_NAME, SAMPLE_SCRIPT, Weaver, normalize_location};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use weaver_core::{
    ContentSource, DialogueRunner, DialogueRuntime, FileSource, LoadError, LoadReport, Status,
    Toggle, ValidationRequest, analyse, picker_start_dir, recent_label, script_name,
};

type Validations = mpsc::UnboundedReceiver<ValidationRequest>;

pub struct Output {
    pub json: bool,
    pub interactive: bool,
}

pub async fn open(
    weaver: &mut Weaver,
    validations: &mut Validations,
    location: &str,
    out: &Output,
) -> anyhow::Result<()> {
    let location = normalize_location(location);
    let attempt = weaver.load_from(&location).await;
    finish_load(weaver, validations, &location, attempt, out).await
}

pub async fn open_recent(
    weaver: &mut Weaver,
    validations: &mut Validations,
    index: usize,
    out: &Output,
) -> anyhow::Result<()> {
    let location = weaver.history().get(index).unwrap_or_default().to_string();
    let attempt = weaver.load_recent(index).await;
    finish_load(weaver, validations, &location, attempt, out).await
}

pub async fn sample(
    weaver: &mut Weaver,
    validations: &mut Validations,
    out: &Output,
) -> anyhow::Result<()> {
    let attempt = weaver.load_sample(SAMPLE_NAME, SAMPLE_SCRIPT).await;
    finish_load(weaver, validations, SAMPLE_NAME, attempt, out).await
}

pub fn recent(weaver: &Weaver, out: &Output) -> anyhow::Result<()> {
    if out.json {
        println!("{}", serde_json::to_string_pretty(&weaver_to_snapshot(weaver, None).history)?);
        return Ok(());
    }

    if weaver.history().is_empty() {
        println!("No recent files.");
    }
    for (index, location) in weaver.history().entries().iter().enumerate() {
        let label = recent_label(location);
        println!("{index}: {}\n   {}", label.title, label.detail);
    }
    if let Some(dir) = picker_start_dir(weaver.history()) {
        println!("Open dialogs start in {}", dir.display());
    }
    Ok(())
}

pub fn forget(weaver: &mut Weaver) {
    weaver.forget_history();
    println!("File history cleared.");
}

/// Compile and lint a script without opening it.
pub async fn check(location: &str, json: bool) -> anyhow::Result<bool> {
    let location = normalize_location(location);
    let text = FileSource.fetch(&location).await?;
    let name = script_name(&location);

    let mut runner = DialogueRunner::new();
    let errors = match runner.compile(&name, &text) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };
    let reports = analyse(&ValidationRequest::single(name, text, errors));
    let clean = reports.iter().all(|r| r.is_clean());
    readout::print(reports, json)?;
    Ok(clean)
}

async fn finish_load(
    weaver: &mut Weaver,
    validations: &mut Validations,
    location: &str,
    attempt: Result<LoadReport, LoadError>,
    out: &Output,
) -> anyhow::Result<()> {
    let reports = readout::drain(validations);

    if out.json {
        let snapshot = weaver_to_snapshot(weaver, Some(LoadDto::from_attempt(location, &attempt)));
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let report = attempt?;
    if reports.is_empty() {
        // Samples skip the validator.
        for error in &report.errors {
            println!("  error: {error}");
        }
    } else {
        readout::print(reports, false)?;
    }

    if out.interactive && weaver.state().is_file_open() {
        interact(weaver, validations).await?;
    } else if let Some(title) = weaver.view().title {
        println!("{title}");
    }
    Ok(())
}

const HELP: &str = "[Enter] next line  [p] play/stop  [r] reload  [c] close  [q] quit";

/// Minimal front end: prints dialogue lines and reads single-letter commands.
async fn interact(weaver: &mut Weaver, validations: &mut Validations) -> anyhow::Result<()> {
    let mut status = weaver.runtime().subscribe();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    let current = status.borrow_and_update().clone();
    show(weaver, &current);

    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                show(weaver, &current);
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "" => weaver.runtime().advance(),
                    "p" => match weaver.toggle_run().await {
                        Ok(Toggle::Started(node)) => tracing::debug!(node = %node, "started"),
                        Ok(Toggle::Stopped) => {}
                        Err(e) => println!("{e}"),
                    },
                    "r" => {
                        match weaver.refresh().await {
                            Ok(_) => readout::print(readout::drain(validations), false)?,
                            Err(e) => println!("{e}"),
                        }
                        show(weaver, &weaver.runtime().status());
                    }
                    "c" => {
                        weaver.close().await;
                        println!("Closed.");
                        break;
                    }
                    "q" => break,
                    "?" | "h" => println!("{HELP}"),
                    other => println!("Unknown command '{other}'. {HELP}"),
                }
            }
        }
    }
    Ok(())
}

fn show(weaver: &Weaver, status: &Status) {
    match status {
        Status::Running { node, line: Some(line) } => println!("{node}: {line}"),
        Status::Running { .. } => {}
        Status::Stopped => {
            if let Some(title) = weaver.view().title {
                println!("{title}");
            }
        }
    }
}
