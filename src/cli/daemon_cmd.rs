//! Daemon command handler - sends commands to running daemon via IPC

use super::args::DaemonAction;
use super::ipc::create_ipc_client;
use super::presenter::Presenter;

/// Handle `press`, `stop` and `status`
pub async fn handle_daemon_command(
    action: DaemonAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: local-tts run".to_string());
    }

    let cmd = action.as_str();
    let response = client
        .send_command(cmd)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    let response = response.trim();
    if let Some(stripped) = response.strip_prefix("error:") {
        return Err(stripped.trim().to_string());
    }

    match action {
        DaemonAction::Status => presenter.output(response),
        _ => presenter.info(&format!("Command sent: {}", cmd)),
    }

    Ok(())
}
