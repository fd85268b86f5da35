//! Worker tasks and their section files.
//!
//! Each worker computes one section of the final report and writes it to a
//! uniquely named temporary file. The orchestrator later stitches the
//! sections together in a fixed order; a [`Section`] owns its backing file,
//! so dropping it removes the file from disk.

pub mod average;
pub mod factorial;
pub mod process_list;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::subprocess::ProcessError;

/// The three report sections, in the order they appear in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    Factorial,
    ProcessList,
    Average,
}

impl WorkerKind {
    /// All kinds in report order
    pub const ALL: [WorkerKind; 3] = [
        WorkerKind::Factorial,
        WorkerKind::ProcessList,
        WorkerKind::Average,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WorkerKind::Factorial => "factorial",
            WorkerKind::ProcessList => "process-list",
            WorkerKind::Average => "average",
        }
    }

    fn temp_prefix(&self) -> &'static str {
        match self {
            WorkerKind::Factorial => "trifold-factorial-",
            WorkerKind::ProcessList => "trifold-ps-",
            WorkerKind::Average => "trifold-average-",
        }
    }
}

impl std::fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors a worker can report back to the orchestrator
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to create section file: {0}")]
    CreateSection(#[source] std::io::Error),

    #[error("failed to write section file: {0}")]
    WriteSection(#[source] std::io::Error),

    #[error("process listing failed: {0}")]
    ProcessList(#[from] ProcessError),

    #[error("worker panicked: {0}")]
    Panic(String),
}

/// What a worker hands back: its completed section, or why it failed
pub type WorkerOutcome = Result<Section, WorkerError>;

/// A completed (or in-progress) report section backed by a temp file
#[derive(Debug)]
pub struct Section {
    kind: WorkerKind,
    file: NamedTempFile,
}

impl Section {
    /// Create an empty section with a uniquely named backing file
    pub fn create(kind: WorkerKind) -> Result<Self, WorkerError> {
        let file = tempfile::Builder::new()
            .prefix(kind.temp_prefix())
            .suffix(".txt")
            .tempfile()
            .map_err(WorkerError::CreateSection)?;
        tracing::debug!("{} section file: {}", kind, file.path().display());
        Ok(Self { kind, file })
    }

    pub fn kind(&self) -> WorkerKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), WorkerError> {
        self.file
            .as_file_mut()
            .write_all(bytes)
            .map_err(WorkerError::WriteSection)
    }

    /// Independent read handle positioned at the start of the file
    pub fn reopen(&self) -> std::io::Result<std::fs::File> {
        self.file.reopen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_kinds_are_in_report_order() {
        assert_eq!(
            WorkerKind::ALL,
            [
                WorkerKind::Factorial,
                WorkerKind::ProcessList,
                WorkerKind::Average
            ]
        );
        assert_eq!(WorkerKind::ProcessList.name(), "process-list");
    }

    #[test]
    fn test_section_write_then_reopen_reads_back() {
        let mut section = Section::create(WorkerKind::Average).unwrap();
        assert_eq!(section.kind(), WorkerKind::Average);
        section.write_all(b"3.50\n").unwrap();

        let mut contents = String::new();
        section
            .reopen()
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "3.50\n");
    }

    #[test]
    fn test_section_file_is_removed_on_drop() {
        let section = Section::create(WorkerKind::Factorial).unwrap();
        let path = section.path().to_path_buf();
        assert!(path.exists());

        drop(section);
        assert!(!path.exists());
    }
}
