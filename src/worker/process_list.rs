//! Process-list worker.
//!
//! Runs the platform's process-listing command and copies its stdout into
//! the section verbatim. A listing command that exits abnormally still
//! produced output worth keeping, so that only warns.

use std::sync::Arc;

use crate::subprocess::{ProcessCommand, ProcessCommandBuilder, ProcessRunner};

use super::{Section, WorkerKind, WorkerOutcome};

/// Capture the system process listing into its section
pub async fn run(runner: Arc<dyn ProcessRunner>) -> WorkerOutcome {
    let command = platform_command();
    let program = command.program.clone();
    let output = runner.run(command).await?;

    if !output.success() {
        tracing::warn!(
            "{program} exited abnormally ({:?}), keeping its output",
            output.status
        );
    }

    let mut section = Section::create(WorkerKind::ProcessList)?;
    section.write_all(output.stdout.as_bytes())?;
    tracing::debug!(
        "process-list worker done ({} bytes)",
        output.stdout.len()
    );
    Ok(section)
}

#[cfg(unix)]
fn platform_command() -> ProcessCommand {
    ProcessCommandBuilder::new("ps").arg("aux").build()
}

#[cfg(not(unix))]
fn platform_command() -> ProcessCommand {
    ProcessCommandBuilder::new("tasklist").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::MockProcessRunner;
    use crate::worker::WorkerError;
    use std::io::Read;

    fn read_section(section: &Section) -> String {
        let mut contents = String::new();
        section
            .reopen()
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    #[tokio::test]
    async fn test_copies_listing_verbatim() {
        let mock = MockProcessRunner::new();
        let expected = platform_command();
        mock.expect(&expected.program)
            .returns_stdout("USER PID\nroot 1\n")
            .finish();

        let section = run(Arc::new(mock.clone())).await.unwrap();
        assert_eq!(read_section(&section), "USER PID\nroot 1\n");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, expected.program);
        assert_eq!(calls[0].args, expected.args);
    }

    #[tokio::test]
    async fn test_abnormal_exit_still_keeps_output() {
        let mock = MockProcessRunner::new();
        mock.expect(&platform_command().program)
            .returns_stdout("partial listing\n")
            .returns_exit_code(1)
            .finish();

        let section = run(Arc::new(mock)).await.unwrap();
        assert_eq!(read_section(&section), "partial listing\n");
    }

    #[tokio::test]
    async fn test_signal_termination_still_keeps_output() {
        let mock = MockProcessRunner::new();
        mock.expect(&platform_command().program)
            .returns_stdout("cut short\n")
            .returns_signal(9)
            .finish();

        let section = run(Arc::new(mock)).await.unwrap();
        assert_eq!(read_section(&section), "cut short\n");
    }

    #[tokio::test]
    async fn test_missing_listing_command_fails_the_worker() {
        let mock = MockProcessRunner::new();
        mock.expect(&platform_command().program)
            .returns_command_not_found()
            .finish();

        let err = run(Arc::new(mock)).await.unwrap_err();
        assert!(matches!(err, WorkerError::ProcessList(_)));
    }
}
