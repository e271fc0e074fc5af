//! Health check port interface

use async_trait::async_trait;
use thiserror::Error;

/// Health check errors
#[derive(Debug, Clone, Error)]
pub enum HealthError {
    #[error("Health request failed: {0}")]
    Request(String),

    #[error("Health endpoint returned HTTP {0}")]
    Status(u16),
}

/// Port for probing a backend's health endpoint
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe the URL once. `Ok(())` means a 2xx response.
    async fn check(&self, url: &str) -> Result<(), HealthError>;
}
