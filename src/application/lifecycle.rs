//! Backend lifecycle use case
//!
//! Makes sure the local synthesis backend is running and answering before
//! speech is requested, and stops it again on shutdown.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::service::{ServiceHandle, ServiceStatus};

use super::ports::{CommandOutput, HealthProbe, ServiceControlError, ServiceController};

/// Errors from backend lifecycle operations
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("TTS backend did not become ready in time ({attempts} health checks)")]
    BackendUnavailable { attempts: u32 },

    #[error(transparent)]
    ProcessLaunch(#[from] ServiceControlError),
}

/// Bounded health polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_secs(2),
        }
    }
}

/// What `ensure_running` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The backend was already running; nothing was issued
    AlreadyRunning,
    /// A stopped instance was started
    Started,
    /// A new instance was created
    Created,
}

impl EnsureOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "already running",
            Self::Started => "started",
            Self::Created => "created",
        }
    }
}

/// Map `inspect` output to a status.
///
/// A failed inspect means the instance does not exist.
pub fn status_from_inspect(output: &CommandOutput) -> ServiceStatus {
    if !output.success() {
        ServiceStatus::Missing
    } else if output.stdout.trim().eq_ignore_ascii_case("true") {
        ServiceStatus::Running
    } else {
        ServiceStatus::Stopped
    }
}

/// Backend lifecycle manager
pub struct BackendLifecycle<S, H>
where
    S: ServiceController,
    H: HealthProbe,
{
    controller: S,
    probe: H,
    handle: ServiceHandle,
    policy: HealthPolicy,
}

impl<S, H> BackendLifecycle<S, H>
where
    S: ServiceController,
    H: HealthProbe,
{
    pub fn new(controller: S, probe: H, handle: ServiceHandle) -> Self {
        Self::with_policy(controller, probe, handle, HealthPolicy::default())
    }

    pub fn with_policy(controller: S, probe: H, handle: ServiceHandle, policy: HealthPolicy) -> Self {
        Self {
            controller,
            probe,
            handle,
            policy,
        }
    }

    pub fn handle(&self) -> &ServiceHandle {
        &self.handle
    }

    /// Query the backend's current status. Nothing is cached.
    pub async fn status(&self) -> Result<ServiceStatus, LifecycleError> {
        let output = self.controller.inspect_running(&self.handle).await?;
        let status = status_from_inspect(&output);
        debug!(name = self.handle.name(), %status, "Inspected backend");
        Ok(status)
    }

    /// Make sure the backend is running and healthy.
    ///
    /// Safe to call in any state; a running backend is left untouched.
    pub async fn ensure_running(&self) -> Result<EnsureOutcome, LifecycleError> {
        let outcome = match self.status().await? {
            ServiceStatus::Running => return Ok(EnsureOutcome::AlreadyRunning),
            ServiceStatus::Stopped => {
                info!(name = self.handle.name(), "Starting TTS backend");
                let output = self.controller.start(&self.handle).await?;
                log_failure("start", &output);
                EnsureOutcome::Started
            }
            ServiceStatus::Missing => {
                info!(
                    name = self.handle.name(),
                    image = self.handle.image(),
                    "Creating TTS backend"
                );
                let output = self.controller.create_and_start(&self.handle).await?;
                log_failure("run", &output);
                EnsureOutcome::Created
            }
        };

        self.wait_until_healthy().await?;
        info!(name = self.handle.name(), outcome = outcome.as_str(), "TTS backend ready");
        Ok(outcome)
    }

    /// Poll the health endpoint until it answers or the budget runs out.
    pub async fn wait_until_healthy(&self) -> Result<(), LifecycleError> {
        let url = self.handle.health_url();
        let attempts = self.policy.attempts;

        for attempt in 1..=attempts {
            match self.probe.check(&url).await {
                Ok(()) => {
                    debug!(attempt, "Health check passed");
                    return Ok(());
                }
                Err(e) => debug!(attempt, attempts, error = %e, "Health check failed"),
            }
            if attempt < attempts {
                sleep(self.policy.interval).await;
            }
        }

        warn!(attempts, url = %url, "TTS backend never became healthy");
        Err(LifecycleError::BackendUnavailable { attempts })
    }

    /// Stop the backend. Errors are logged and discarded.
    pub async fn stop(&self) {
        match self.controller.stop(&self.handle).await {
            Ok(output) => log_failure("stop", &output),
            Err(e) => warn!(error = %e, "Failed to stop TTS backend"),
        }
    }
}

fn log_failure(command: &str, output: &CommandOutput) {
    if !output.success() {
        warn!(
            command,
            exit_code = ?output.exit_code,
            stderr = output.stderr.trim(),
            "Backend command exited unsuccessfully"
        );
    }
}
