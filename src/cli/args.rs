//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// LocalTTS - read selected text aloud with a local speech backend
#[derive(Parser, Debug)]
#[command(name = "local-tts")]
#[command(version)]
#[command(about = "Read selected text aloud using a local Kokoro TTS backend")]
#[command(long_about = None)]
pub struct Cli {
    /// Voice to synthesize with (e.g., af_heart, bf_emma)
    #[arg(long, value_name = "VOICE", global = true)]
    pub voice: Option<String>,

    /// Backend port
    #[arg(
        short = 'p',
        long,
        value_name = "PORT",
        global = true,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: Option<u16>,

    /// Show desktop notifications
    #[arg(short = 'n', long, global = true)]
    pub notify: bool,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the hotkey daemon (default)
    Run {
        /// Do not start the backend container on launch
        #[arg(long)]
        no_auto_start: bool,
    },
    /// Send a hotkey press to the running daemon
    Press,
    /// Stop playback in the running daemon
    Stop,
    /// Show daemon status
    Status,
    /// Capture the current selection and read it aloud
    Speak,
    /// Read the given text aloud
    Say {
        /// Text to speak
        text: String,
        /// Follow along in the terminal with word highlighting
        #[arg(long)]
        highlight: bool,
    },
    /// Manage the backend container
    Backend {
        #[command(subcommand)]
        action: BackendAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands sent to a running daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonAction {
    /// Same as pressing the hotkey
    Press,
    /// Stop playback
    Stop,
    /// Query status
    Status,
}

impl DaemonAction {
    /// Wire name of the command
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Stop => "stop",
            Self::Status => "status",
        }
    }
}

/// Backend container actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendAction {
    /// Start (or create) the container and wait until it is healthy
    Start,
    /// Stop the container
    Stop,
    /// Show container status
    Status,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "voice",
    "model",
    "port",
    "container_name",
    "image",
    "auto_start",
    "auto_stop",
    "notify",
    "hotkey.double_press_timeout_ms",
    "reader.enabled",
    "reader.auto_play",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
