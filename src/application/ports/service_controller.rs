//! Backend service controller port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::service::ServiceHandle;

/// Service controller errors
#[derive(Debug, Clone, Error)]
pub enum ServiceControlError {
    #[error("Failed to launch '{program}': {message}")]
    Launch { program: String, message: String },
}

/// Exit status and output of a controller command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: Option<i32>, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Port for the process/container controller that hosts the backend
#[async_trait]
pub trait ServiceController: Send + Sync {
    /// Report whether the named instance exists and is running.
    async fn inspect_running(&self, handle: &ServiceHandle)
        -> Result<CommandOutput, ServiceControlError>;

    /// Start an existing, stopped instance.
    async fn start(&self, handle: &ServiceHandle) -> Result<CommandOutput, ServiceControlError>;

    /// Create and start a new instance from the handle's image and port mapping.
    async fn create_and_start(
        &self,
        handle: &ServiceHandle,
    ) -> Result<CommandOutput, ServiceControlError>;

    /// Stop the named instance.
    async fn stop(&self, handle: &ServiceHandle) -> Result<CommandOutput, ServiceControlError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit() {
        assert!(CommandOutput::new(Some(0), "").success());
        assert!(!CommandOutput::new(Some(1), "").success());
        assert!(!CommandOutput::new(None, "").success());
    }
}
