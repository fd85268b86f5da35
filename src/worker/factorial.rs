//! Factorial worker.
//!
//! Parses its argument from the first input record and writes `n!` in
//! decimal. Arbitrary precision, so large arguments produce exact results
//! rather than overflowing.

use num_bigint::BigUint;

use super::{Section, WorkerKind, WorkerOutcome};

/// Compute the factorial section from the first input record
pub async fn run(record: String) -> WorkerOutcome {
    let n = parse_argument(&record);
    let value = factorial(n);

    let mut section = Section::create(WorkerKind::Factorial)?;
    section.write_all(format!("{value}\n").as_bytes())?;
    tracing::debug!("factorial worker done: {n}!");
    Ok(section)
}

/// Longest leading run of ASCII digits after whitespace, or 0 when the
/// record has none (or the digits overflow u64)
fn parse_argument(record: &str) -> u64 {
    let trimmed = record.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];

    if digits.is_empty() {
        tracing::warn!("factorial argument {record:?} has no leading digits, using 0");
        return 0;
    }
    digits.parse().unwrap_or_else(|_| {
        tracing::warn!("factorial argument {digits:?} does not fit in u64, using 0");
        0
    })
}

fn factorial(n: u64) -> BigUint {
    let mut acc = BigUint::from(1u32);
    for i in 2..=n {
        acc *= i;
    }
    acc
}
