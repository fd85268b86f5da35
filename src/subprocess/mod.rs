//! Subprocess execution layer.
//!
//! External commands go through the [`ProcessRunner`] trait so that code
//! which shells out can be exercised in tests with a scripted
//! [`MockProcessRunner`] instead of the real thing.

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;

pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::MockProcessRunner;
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};

use std::sync::Arc;

/// Shared handle to the process runner in use
#[derive(Clone)]
pub struct SubprocessManager {
    runner: Arc<dyn ProcessRunner>,
}

impl SubprocessManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Manager backed by the real tokio runner
    pub fn production() -> Self {
        Self::new(Arc::new(TokioProcessRunner))
    }

    /// Manager backed by a scripted mock, returned alongside its handle
    #[cfg(test)]
    pub fn mock() -> (Self, MockProcessRunner) {
        let mock = MockProcessRunner::new();
        (Self::new(Arc::new(mock.clone())), mock)
    }

    pub fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }
}
