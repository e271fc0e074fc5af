//! LocalTTS CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use local_tts::cli::{
    app::{load_merged_config, run_backend, run_say, run_speak, EXIT_ERROR},
    args::{Cli, Commands, DaemonAction},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_daemon_command,
    presenter::Presenter,
};
use local_tts::domain::config::AppConfig;
use local_tts::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut presenter = Presenter::new();

    let cli_config = AppConfig {
        voice: cli.voice.clone(),
        port: cli.port,
        notify: if cli.notify { Some(true) } else { None },
        auto_start: match cli.command {
            Some(Commands::Run {
                no_auto_start: true,
            }) => Some(false),
            _ => None,
        },
        ..Default::default()
    };

    let result = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            handle_config_command(action, &store, &presenter)
                .await
                .map_err(|e| e.to_string())
        }
        Some(Commands::Press) => handle_daemon_command(DaemonAction::Press, &presenter).await,
        Some(Commands::Stop) => handle_daemon_command(DaemonAction::Stop, &presenter).await,
        Some(Commands::Status) => handle_daemon_command(DaemonAction::Status, &presenter).await,
        Some(Commands::Speak) => {
            let config = load_merged_config(cli_config).await;
            run_speak(&config, &mut presenter).await
        }
        Some(Commands::Say { text, highlight }) => {
            let config = load_merged_config(cli_config).await;
            run_say(&config, &text, highlight, &mut presenter).await
        }
        Some(Commands::Backend { action }) => {
            let config = load_merged_config(cli_config).await;
            run_backend(action, &config, &mut presenter).await
        }
        Some(Commands::Run { .. }) | None => {
            let config = load_merged_config(cli_config).await;
            return run_daemon(config).await;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `RUST_LOG` wins; otherwise info for this crate, debug with `-v`
fn init_logging(verbose: bool) {
    let default = if verbose {
        "local_tts=debug,info"
    } else {
        "local_tts=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}
