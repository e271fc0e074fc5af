//! Unix domain socket transport for daemon control

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{DaemonStatus, IpcClient, IpcServer, StatusFn};
use crate::cli::pid_file::runtime_dir;
use crate::cli::signals::DaemonSignal;

const SOCKET_FILE_NAME: &str = "local-tts.sock";

/// Socket path resolver
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Socket in the runtime directory
    pub fn new() -> Self {
        Self::with_path(runtime_dir().join(SOCKET_FILE_NAME))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if socket file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove socket file if it exists
    pub fn cleanup(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// Unix domain socket server for daemon commands
pub struct UnixSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl UnixSocketServer {
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }
}

impl Drop for UnixSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[async_trait]
impl IpcServer for UnixSocketServer {
    fn bind(&mut self) -> io::Result<()> {
        // Stale socket from a crashed daemon
        self.socket_path.cleanup()?;

        let listener = UnixListener::bind(self.socket_path.path())?;
        self.listener = Some(listener);
        Ok(())
    }

    fn path(&self) -> String {
        self.socket_path.path().to_string_lossy().to_string()
    }

    async fn run(&self, tx: mpsc::Sender<DaemonSignal>, status_fn: StatusFn) -> io::Result<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Socket not bound"))?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let tx = tx.clone();
                    let status = status_fn();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx, status).await {
                            warn!(error = %e, "Socket connection error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Socket accept error");
                }
            }
        }
    }

    fn cleanup(&self) {
        let _ = self.socket_path.cleanup();
    }
}

/// Map a command line to its reply and the signal to forward
fn dispatch(cmd: &str, status: DaemonStatus) -> (String, Option<DaemonSignal>) {
    match cmd {
        "press" => ("ok".to_string(), Some(DaemonSignal::Press)),
        "stop" => ("ok".to_string(), Some(DaemonSignal::Stop)),
        "status" => (status.to_string(), None),
        _ => ("error: unknown command".to_string(), None),
    }
}

async fn handle_connection(
    stream: UnixStream,
    tx: mpsc::Sender<DaemonSignal>,
    status: DaemonStatus,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;
    let cmd = line.trim();
    debug!(cmd, "IPC command");

    let (response, signal) = dispatch(cmd, status);
    if let Some(signal) = signal {
        let _ = tx.send(signal).await;
    }

    writer.write_all(format!("{}\n", response).as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

/// Unix domain socket client for sending commands to the daemon
pub struct UnixSocketClient {
    socket_path: SocketPath,
}

impl UnixSocketClient {
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }
}

#[async_trait]
impl IpcClient for UnixSocketClient {
    fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    async fn send_command(&self, cmd: &str) -> io::Result<String> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        let (reader, mut writer) = stream.into_split();

        writer.write_all(format!("{}\n", cmd).as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut response = String::new();
        reader.read_line(&mut response).await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dispatch_known_commands() {
        assert_eq!(
            dispatch("press", DaemonStatus::Idle),
            ("ok".to_string(), Some(DaemonSignal::Press))
        );
        assert_eq!(
            dispatch("stop", DaemonStatus::Idle),
            ("ok".to_string(), Some(DaemonSignal::Stop))
        );
        assert_eq!(
            dispatch("status", DaemonStatus::Speaking),
            ("speaking".to_string(), None)
        );
    }

    #[test]
    fn dispatch_unknown_command() {
        let (response, signal) = dispatch("toggle", DaemonStatus::Idle);
        assert!(response.starts_with("error:"));
        assert!(signal.is_none());
    }

    #[tokio::test]
    async fn client_and_server_round_trip() {
        let dir = TempDir::new().unwrap();
        let socket_path = SocketPath::with_path(dir.path().join("test.sock"));

        let mut server = UnixSocketServer::new(socket_path.clone());
        server.bind().unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let _ = server
                .run(tx, Box::new(|| DaemonStatus::Synthesizing))
                .await;
        });

        let client = UnixSocketClient::new(socket_path);
        assert!(client.is_daemon_running());

        let reply = client.send_command("press").await.unwrap();
        assert_eq!(reply.trim(), "ok");
        assert_eq!(rx.recv().await, Some(DaemonSignal::Press));

        let reply = client.send_command("status").await.unwrap();
        assert_eq!(reply.trim(), "synthesizing");
    }
}
