use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::error::ProcessError;

/// Command to be executed by a process runner
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Exit status of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }
}

/// Output captured from a completed process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Trait for running external processes
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command to completion, capturing its output
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

/// Production process runner backed by tokio
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);
        cmd.envs(&command.env);
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    fn map_spawn_error(program: &str, error: std::io::Error) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            ProcessError::CommandNotFound(program.to_string())
        } else {
            ProcessError::Io(error)
        }
    }

    async fn wait_with_timeout(
        cmd: &mut tokio::process::Command,
        command: &ProcessCommand,
    ) -> Result<std::process::Output, ProcessError> {
        let child = cmd
            .spawn()
            .map_err(|e| Self::map_spawn_error(&command.program, e))?;

        match command.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| ProcessError::Timeout(timeout))?
                .map_err(ProcessError::Io),
            None => child.wait_with_output().await.map_err(ProcessError::Io),
        }
    }

    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        match status.signal() {
            Some(signal) => ExitStatus::Signal(signal),
            None => ExitStatus::Error(-1),
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(-1)
    }

    fn build_output(output: std::process::Output, duration: Duration) -> ProcessOutput {
        ProcessOutput {
            status: Self::parse_exit_status(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        tracing::debug!(
            "Running command: {} {}",
            command.program,
            command.args.join(" ")
        );

        let started = Instant::now();
        let mut cmd = Self::configure_command(&command);
        let output = Self::wait_with_timeout(&mut cmd, &command).await?;
        let result = Self::build_output(output, started.elapsed());

        tracing::trace!(
            "Command {} finished with {:?} in {:?}",
            command.program,
            result.status,
            result.duration
        );
        if !result.success() {
            tracing::debug!(
                "Command {} exited abnormally: {:?}",
                command.program,
                result.status
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(program: &str, args: &[&str]) -> ProcessCommand {
        ProcessCommand {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env: HashMap::new(),
            working_dir: None,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_runs_command_and_captures_stdout() {
        let runner = TokioProcessRunner;
        let output = runner.run(command("echo", &["hello"])).await.unwrap();

        assert_eq!(output.status, ExitStatus::Success);
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_reports_nonzero_exit_code() {
        let runner = TokioProcessRunner;
        let output = runner
            .run(command("sh", &["-c", "exit 3"]))
            .await
            .unwrap();

        assert_eq!(output.status, ExitStatus::Error(3));
        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
    }

    #[tokio::test]
    async fn test_missing_program_maps_to_command_not_found() {
        let runner = TokioProcessRunner;
        let err = runner
            .run(command("definitely-not-a-real-binary", &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::CommandNotFound(_)));
    }

    #[tokio::test]
    async fn test_enforces_timeout() {
        use crate::subprocess::ProcessCommandBuilder;

        let runner = TokioProcessRunner;
        let cmd = ProcessCommandBuilder::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(50))
            .build();

        let err = runner.run(cmd).await.unwrap_err();
        assert!(matches!(err, ProcessError::Timeout(_)));
    }
}
