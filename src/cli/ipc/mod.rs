//! IPC (Inter-Process Communication) for daemon control
//!
//! Line-oriented commands over a Unix domain socket: `press`, `stop`, `status`.

mod unix_socket;

pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::fmt;
use std::io;
use tokio::sync::mpsc;

use super::signals::DaemonSignal;
use crate::domain::session::SessionState;

/// What the daemon is doing, as reported by `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    Idle,
    Capturing,
    Synthesizing,
    Speaking,
}

impl DaemonStatus {
    /// Combine the request state with playback; playback wins while idle
    pub fn from_parts(state: SessionState, playing: bool) -> Self {
        match state {
            SessionState::Capturing => Self::Capturing,
            SessionState::Synthesizing => Self::Synthesizing,
            SessionState::Idle if playing => Self::Speaking,
            SessionState::Idle => Self::Idle,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Synthesizing => "synthesizing",
            Self::Speaking => "speaking",
        }
    }
}

impl fmt::Display for DaemonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State function type for IPC servers
pub type StatusFn = Box<dyn Fn() -> DaemonStatus + Send + Sync>;

/// Trait for IPC servers that listen for daemon commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept connections and forward each command to `tx`.
    /// `status_fn` answers `status` queries.
    async fn run(&self, tx: mpsc::Sender<DaemonSignal>, status_fn: StatusFn) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a command and receive response
    async fn send_command(&self, cmd: &str) -> io::Result<String>;
}

/// Create the IPC server
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

/// Create the IPC client
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_prefers_request_state() {
        assert_eq!(
            DaemonStatus::from_parts(SessionState::Synthesizing, true),
            DaemonStatus::Synthesizing
        );
        assert_eq!(
            DaemonStatus::from_parts(SessionState::Idle, true),
            DaemonStatus::Speaking
        );
        assert_eq!(
            DaemonStatus::from_parts(SessionState::Idle, false),
            DaemonStatus::Idle
        );
    }
}
