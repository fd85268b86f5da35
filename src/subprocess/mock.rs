use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

#[derive(Clone)]
enum MockResult {
    Output {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    CommandNotFound,
}

struct Expectation {
    program: String,
    args: Option<Vec<String>>,
    result: MockResult,
    remaining: usize,
}

impl Expectation {
    fn matches(&self, command: &ProcessCommand) -> bool {
        if self.remaining == 0 || self.program != command.program {
            return false;
        }
        match &self.args {
            Some(args) => args == &command.args,
            None => true,
        }
    }
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    calls: Vec<ProcessCommand>,
}

/// Scripted process runner for tests. Invocations are matched against
/// expectations in registration order; unmatched commands fail with
/// [`ProcessError::MockExpectationNotMet`].
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin scripting a response for `program`
    pub fn expect(&self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: Expectation {
                program: program.to_string(),
                args: None,
                result: MockResult::Output {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                },
                remaining: 1,
            },
        }
    }

    /// Commands observed so far, in invocation order
    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(command.clone());

        let expectation = state
            .expectations
            .iter_mut()
            .find(|e| e.matches(&command))
            .ok_or_else(|| {
                ProcessError::MockExpectationNotMet(format!(
                    "unexpected command: {} {:?}",
                    command.program, command.args
                ))
            })?;
        expectation.remaining -= 1;

        match expectation.result.clone() {
            MockResult::Output {
                status,
                stdout,
                stderr,
            } => Ok(ProcessOutput {
                status,
                stdout,
                stderr,
                duration: Duration::ZERO,
            }),
            MockResult::CommandNotFound => {
                Err(ProcessError::CommandNotFound(command.program.clone()))
            }
        }
    }
}

/// Builder for a single mock expectation
pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: Expectation,
}

impl MockCommandConfig {
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expectation.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn returns_stdout(mut self, stdout: impl Into<String>) -> Self {
        if let MockResult::Output { stdout: out, .. } = &mut self.expectation.result {
            *out = stdout.into();
        }
        self
    }

    pub fn returns_stderr(mut self, stderr: impl Into<String>) -> Self {
        if let MockResult::Output { stderr: err, .. } = &mut self.expectation.result {
            *err = stderr.into();
        }
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        let status = if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error(code)
        };
        if let MockResult::Output { status: s, .. } = &mut self.expectation.result {
            *s = status;
        }
        self
    }

    pub fn returns_signal(mut self, signal: i32) -> Self {
        if let MockResult::Output { status, .. } = &mut self.expectation.result {
            *status = ExitStatus::Signal(signal);
        }
        self
    }

    pub fn returns_command_not_found(mut self) -> Self {
        self.expectation.result = MockResult::CommandNotFound;
        self
    }

    pub fn times(mut self, count: usize) -> Self {
        self.expectation.remaining = count;
        self
    }

    pub fn finish(self) {
        self.runner
            .state
            .lock()
            .unwrap()
            .expectations
            .push(self.expectation);
    }
}
