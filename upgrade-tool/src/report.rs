//! Headless Report - Evaluation without a display
//!
//! Consumes worker events on the calling thread, shows a terminal progress
//! bar, and prints the result table once the check completes.

use crate::settings::Settings;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::mpsc;
use std::sync::Arc;
use upgrade_common::desktop_entry::AppInfo;
use upgrade_common::evaluation::{SoftwareEvaluation, TABLE_HEADERS};
use upgrade_common::session::{EvaluationSession, SessionUpdate};
use upgrade_common::worker::UpgradeWorker;

/// Output format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    compatible: &'a [AppInfo],
    incompatible: &'a [AppInfo],
}

/// Run an evaluation to completion and print the result to stdout
pub fn run_report(
    worker: Arc<dyn UpgradeWorker>,
    settings: &Settings,
    format: ReportFormat,
) -> Result<()> {
    let (sender, receiver) = mpsc::channel();
    worker
        .start(sender)
        .with_context(|| format!("Failed to start worker ({})", worker.describe()))?;
    tracing::info!("Evaluating with {}", worker.describe());

    let mut session = EvaluationSession::new(&settings.applications_dir, settings.locale.as_str());
    let bar = progress_bar();

    while let Ok(event) = receiver.recv() {
        match session.handle(&event) {
            SessionUpdate::Progress(value) => bar.set_position(value.clamp(0, 100) as u64),
            SessionUpdate::CheckDone => {
                bar.finish_with_message("Evaluation complete");
                break;
            }
            SessionUpdate::Evaluation | SessionUpdate::Ignored => {}
        }
    }

    // Verdicts may race the final progress update
    while let Ok(event) = receiver.try_recv() {
        session.handle(&event);
    }

    if !session.is_done() {
        bar.abandon_with_message("Worker stopped early");
    }

    let output = match format {
        ReportFormat::Table => render_table(session.evaluation()),
        ReportFormat::Json => render_json(session.evaluation())?,
    };
    println!("{}", output);

    if !session.is_done() {
        anyhow::bail!(
            "Worker stopped at {}% before the check completed",
            session.progress().percent()
        );
    }
    Ok(())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    // Static template; with_template only fails on malformed templates
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("Evaluating app compatibility");
    bar
}

/// Render the two-column result table as plain text
pub fn render_table(evaluation: &SoftwareEvaluation) -> String {
    let rows = evaluation.table_rows();
    let width = evaluation
        .compatible()
        .iter()
        .map(|info| info.name.chars().count())
        .chain(std::iter::once(TABLE_HEADERS[0].len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {}", TABLE_HEADERS[0], TABLE_HEADERS[1]);
    let _ = write!(out, "{:<width$}  {}", "-".repeat(width), "-".repeat(TABLE_HEADERS[1].len()));
    for [compatible, incompatible] in rows {
        let left = compatible.map(|info| info.name.as_str()).unwrap_or("");
        let right = incompatible.map(|info| info.name.as_str()).unwrap_or("");
        let _ = write!(out, "\n{:<width$}  {}", left, right);
    }
    out
}

/// Render the classification lists as JSON
pub fn render_json(evaluation: &SoftwareEvaluation) -> Result<String> {
    let report = JsonReport {
        compatible: evaluation.compatible(),
        incompatible: evaluation.incompatible(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}
