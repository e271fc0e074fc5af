//! Docker CLI service controller

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{CommandOutput, ServiceControlError, ServiceController};
use crate::domain::service::ServiceHandle;

/// Controller that drives the backend container through the docker CLI
pub struct DockerController {
    program: String,
}

impl DockerController {
    pub fn new() -> Self {
        Self::with_program("docker")
    }

    /// Use another docker-compatible CLI, such as `podman`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn inspect_args(handle: &ServiceHandle) -> Vec<String> {
        vec![
            "inspect".to_string(),
            "-f".to_string(),
            "{{.State.Running}}".to_string(),
            handle.name().to_string(),
        ]
    }

    fn start_args(handle: &ServiceHandle) -> Vec<String> {
        vec!["start".to_string(), handle.name().to_string()]
    }

    fn run_args(handle: &ServiceHandle) -> Vec<String> {
        vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            handle.name().to_string(),
            "-p".to_string(),
            handle.port_mapping(),
            handle.image().to_string(),
        ]
    }

    fn stop_args(handle: &ServiceHandle) -> Vec<String> {
        vec!["stop".to_string(), handle.name().to_string()]
    }

    async fn run(&self, args: Vec<String>) -> Result<CommandOutput, ServiceControlError> {
        debug!(program = %self.program, args = ?args, "Running service command");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ServiceControlError::Launch {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let result = CommandOutput::new(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
        )
        .with_stderr(String::from_utf8_lossy(&output.stderr));

        debug!(
            exit_code = ?result.exit_code,
            stdout = result.stdout.trim(),
            stderr = result.stderr.trim(),
            "Service command finished"
        );
        Ok(result)
    }
}

impl Default for DockerController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceController for DockerController {
    async fn inspect_running(
        &self,
        handle: &ServiceHandle,
    ) -> Result<CommandOutput, ServiceControlError> {
        self.run(Self::inspect_args(handle)).await
    }

    async fn start(&self, handle: &ServiceHandle) -> Result<CommandOutput, ServiceControlError> {
        self.run(Self::start_args(handle)).await
    }

    async fn create_and_start(
        &self,
        handle: &ServiceHandle,
    ) -> Result<CommandOutput, ServiceControlError> {
        self.run(Self::run_args(handle)).await
    }

    async fn stop(&self, handle: &ServiceHandle) -> Result<CommandOutput, ServiceControlError> {
        self.run(Self::stop_args(handle)).await
    }
}
