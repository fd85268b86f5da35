//! Average worker.
//!
//! Parses whitespace-separated numbers from the second input record and
//! writes their mean with two decimal places.

use super::{Section, WorkerKind, WorkerOutcome};

/// Compute the average section from the second input record
pub async fn run(record: String) -> WorkerOutcome {
    let mean = mean_of_record(&record);

    let mut section = Section::create(WorkerKind::Average)?;
    section.write_all(format!("{mean:.2}\n").as_bytes())?;
    tracing::debug!("average worker done");
    Ok(section)
}

/// Every token counts toward the divisor; malformed tokens contribute 0.
/// A record with no tokens divides zero by zero, and the resulting NaN is
/// written out as-is.
fn mean_of_record(record: &str) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for token in record.split_whitespace() {
        sum += token.parse::<f64>().unwrap_or_else(|_| {
            tracing::warn!("average token {token:?} is not a number, counting it as 0");
            0.0
        });
        count += 1;
    }
    sum / count as f64
}
