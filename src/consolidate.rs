//! Report consolidation.
//!
//! Stitches completed sections into the output file in report order. A
//! section whose worker failed is skipped with a diagnostic and the report
//! is whatever remains.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::worker::{WorkerKind, WorkerOutcome};

/// Append every completed section to `output`, in order. Returns how many
/// sections made it in.
pub async fn consolidate(
    output: &Path,
    outcomes: Vec<(WorkerKind, WorkerOutcome)>,
) -> Result<usize> {
    let mut out = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("failed to create output file {}", output.display()))?;

    let mut written = 0;
    for (kind, outcome) in outcomes {
        let section = match outcome {
            Ok(section) => section,
            Err(_) => {
                tracing::warn!("skipping {kind} section, no section file was produced");
                continue;
            }
        };
        let reader = match section.reopen() {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    "skipping {kind} section, cannot reopen {}: {e}",
                    section.path().display()
                );
                continue;
            }
        };

        let mut reader = tokio::fs::File::from_std(reader);
        tokio::io::copy(&mut reader, &mut out)
            .await
            .with_context(|| format!("failed to append {kind} section"))?;
        written += 1;
    }

    out.flush().await.context("failed to flush output file")?;
    Ok(written)
}
