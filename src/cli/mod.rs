//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! daemon IPC and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod daemon_app;
pub mod daemon_cmd;
pub mod ipc;
pub mod pid_file;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_backend, run_say, run_speak, EXIT_ERROR, EXIT_SUCCESS};
pub use args::{BackendAction, Cli, Commands, ConfigAction, DaemonAction};
pub use daemon_app::run_daemon;
pub use daemon_cmd::handle_daemon_command;
pub use presenter::Presenter;
