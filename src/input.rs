//! Input file handling.
//!
//! The input is line oriented: one record per line, terminator included.
//! Records are capped at [`MAX_RECORD_LEN`] bytes; a line past the cap is
//! truncated there, losing its remainder and terminator.

use std::path::Path;

use anyhow::{Context, Result};

/// Records longer than this many bytes are truncated
pub const MAX_RECORD_LEN: usize = 256;

/// Read the input file into memory and split it into records
pub async fn read_records(path: &Path) -> Result<Vec<String>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    Ok(split_records(&bytes))
}

fn split_records(bytes: &[u8]) -> Vec<String> {
    bytes
        .split_inclusive(|&b| b == b'\n')
        .map(|chunk| truncate_record(String::from_utf8_lossy(chunk).into_owned()))
        .collect()
}

fn truncate_record(mut record: String) -> String {
    if record.len() > MAX_RECORD_LEN {
        let mut cut = MAX_RECORD_LEN;
        while !record.is_char_boundary(cut) {
            cut -= 1;
        }
        tracing::warn!(
            "record of {} bytes truncated to {cut}",
            record.len()
        );
        record.truncate(cut);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_lines_keeping_terminators() {
        assert_eq!(split_records(b"5\n1 2 3\n"), vec!["5\n", "1 2 3\n"]);
    }

    #[test]
    fn test_final_record_may_lack_a_terminator() {
        assert_eq!(split_records(b"5\n1 2 3"), vec!["5\n", "1 2 3"]);
    }

    #[test]
    fn test_empty_input_has_no_records() {
        assert!(split_records(b"").is_empty());
        assert_eq!(split_records(b"\n"), vec!["\n"]);
    }

    #[test]
    fn test_long_records_lose_their_remainder_and_terminator() {
        let line = "a".repeat(300);
        let records = split_records(format!("{line}\nrest\n").as_bytes());
        assert_eq!(records[0], "a".repeat(MAX_RECORD_LEN));
        assert_eq!(records[1], "rest\n");
    }

    #[test]
    fn test_truncation_backs_off_to_a_char_boundary() {
        let mut line = "a".repeat(MAX_RECORD_LEN - 1);
        line.push('é');
        assert_eq!(
            split_records(line.as_bytes())[0],
            "a".repeat(MAX_RECORD_LEN - 1)
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_dropped() {
        assert_eq!(split_records(b"\xff5\n")[0], "\u{fffd}5\n");
    }

    #[tokio::test]
    async fn test_missing_input_file_is_an_error() {
        let err = read_records(Path::new("/no/such/input"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read input file"));
    }
}
