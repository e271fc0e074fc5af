//! Service handle value object

use std::fmt;

/// Default container name for the synthesis backend
pub const DEFAULT_CONTAINER_NAME: &str = "localtts-kokoro";

/// Default backend image
pub const DEFAULT_IMAGE: &str = "ghcr.io/remsky/kokoro-fastapi-cpu:latest";

/// Default host port (also the port the backend listens on inside the container)
pub const DEFAULT_PORT: u16 = 8880;

/// Port the backend listens on inside its container
const CONTAINER_PORT: u16 = 8880;

/// The backend always runs on this machine
const HOST: &str = "localhost";

/// Path polled to decide whether the backend is ready
const HEALTH_PATH: &str = "/v1/models";

/// Observed state of the backend service instance.
/// Never cached; each lifecycle call asks the controller again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Running,
    Stopped,
    Missing,
}

impl ServiceStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Logical name and endpoint of the backend service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    name: String,
    image: String,
    port: u16,
}

impl ServiceHandle {
    pub fn new(name: impl Into<String>, image: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            port,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL of the backend API
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", HOST, self.port)
    }

    /// URL polled by the health check
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url(), HEALTH_PATH)
    }

    /// `host:container` port mapping used when creating the instance
    pub fn port_mapping(&self) -> String {
        format!("{}:{}", self.port, CONTAINER_PORT)
    }
}

impl Default for ServiceHandle {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_NAME, DEFAULT_IMAGE, DEFAULT_PORT)
    }
}
