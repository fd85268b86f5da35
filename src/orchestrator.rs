//! Worker orchestration.
//!
//! Spawns the three workers, waits for every one of them (a failure never
//! cancels the siblings), reports how each finished, and consolidates the
//! surviving sections into the output file. Worker failures degrade the
//! report; only input and output file problems abort the run.

use std::path::Path;

use anyhow::Result;
use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::consolidate::consolidate;
use crate::input;
use crate::subprocess::SubprocessManager;
use crate::worker::{self, WorkerError, WorkerKind, WorkerOutcome};

/// Run the whole pipeline with the production subprocess runner
pub async fn run(input_file: &Path, output_file: &Path) -> Result<()> {
    run_with_subprocess(input_file, output_file, SubprocessManager::production()).await
}

pub async fn run_with_subprocess(
    input_file: &Path,
    output_file: &Path,
    subprocess: SubprocessManager,
) -> Result<()> {
    let records = input::read_records(input_file).await?;
    tracing::info!(
        "read {} records from {}",
        records.len(),
        input_file.display()
    );

    let outcomes = run_workers(&records, &subprocess).await;
    report_outcomes(&outcomes);

    let written = consolidate(output_file, outcomes).await?;
    tracing::info!(
        "wrote {written} of {} sections to {}",
        WorkerKind::ALL.len(),
        output_file.display()
    );
    Ok(())
}

async fn run_workers(
    records: &[String],
    subprocess: &SubprocessManager,
) -> Vec<(WorkerKind, WorkerOutcome)> {
    tracing::info!("spawning {} workers", WorkerKind::ALL.len());

    // spawn order matches WorkerKind::ALL
    let handles: Vec<JoinHandle<WorkerOutcome>> = vec![
        tokio::spawn(worker::factorial::run(record_or_empty(records, 0))),
        tokio::spawn(worker::process_list::run(subprocess.runner())),
        tokio::spawn(worker::average::run(record_or_empty(records, 1))),
    ];

    WorkerKind::ALL
        .into_iter()
        .zip(join_all(handles).await)
        .map(|(kind, joined)| {
            let outcome =
                joined.unwrap_or_else(|join_error| Err(WorkerError::Panic(join_error.to_string())));
            (kind, outcome)
        })
        .collect()
}

fn report_outcomes(outcomes: &[(WorkerKind, WorkerOutcome)]) {
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(section) => tracing::debug!(
                "{kind} worker finished, section at {}",
                section.path().display()
            ),
            Err(error) => tracing::warn!("{kind} worker failed: {error}"),
        }
    }
}

fn record_or_empty(records: &[String], index: usize) -> String {
    match records.get(index) {
        Some(record) => record.clone(),
        None => {
            tracing::warn!("input has no record {index}, using an empty one");
            String::new()
        }
    }
}
