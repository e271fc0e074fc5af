//! Daemon app runner

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::application::ports::{NotificationIcon, Notifier};
use crate::application::{DisambiguatorConfig, HotkeyDisambiguator, SpeakError, SpeakOutcome};
use crate::domain::config::AppConfig;
use crate::domain::hotkey::{HotkeyAction, HotkeyEvent, PressIntent};
use crate::infrastructure::{ModifierTracker, NotifyRustNotifier, RdevHotkeyListener, TerminalReader};

use super::app::{build_backend, build_speaker, Backend, Speaker, EXIT_ERROR, EXIT_SUCCESS};
use super::ipc::{create_ipc_server, DaemonStatus, IpcServer, StatusFn};
use super::pid_file::PidFile;
use super::presenter::Presenter;
use super::signals::{DaemonSignal, DaemonSignalHandler};

type DaemonSpeaker = Speaker<TerminalReader>;

type ActionResult = (HotkeyAction, Result<SpeakOutcome, SpeakError>);

/// Run the hotkey daemon until SIGINT/SIGTERM
pub async fn run_daemon(config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let mut pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let backend = build_backend(&config);
    if config.auto_start_or_default() {
        start_backend(&backend, &mut presenter, config.notify_or_default()).await;
    }

    // Shared between the hotkey listener (writer) and the keyboard adapter (reader)
    let modifiers = Arc::new(ModifierTracker::new());

    let speaker = match build_speaker(&config, Arc::clone(&modifiers), TerminalReader::new()) {
        Ok(speaker) => Arc::new(speaker),
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let disambiguator_config = DisambiguatorConfig::from(&config);
    let (mut disambiguator, mut actions) = HotkeyDisambiguator::channel(disambiguator_config);

    let (mut signals, signal_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut ipc_server = create_ipc_server();
    if let Err(e) = ipc_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let ipc_server: Arc<dyn IpcServer> = Arc::from(ipc_server);

    let server = Arc::clone(&ipc_server);
    let status_speaker = Arc::clone(&speaker);
    tokio::spawn(async move {
        let status_fn: StatusFn = Box::new(move || {
            let state = status_speaker.try_state().unwrap_or_default();
            DaemonStatus::from_parts(state, status_speaker.is_busy())
        });
        if let Err(e) = server.run(signal_tx, status_fn).await {
            warn!(error = %e, "IPC server stopped");
        }
    });

    let mut listener = RdevHotkeyListener::new(Arc::clone(&modifiers));
    let mut hotkeys = Some(listener.start());

    presenter.daemon_status("Started, press Ctrl+Shift+R to read the selection");
    presenter.info(&format!(
        "PID: {} | Socket: {} | Double press window: {} ms",
        std::process::id(),
        ipc_server.path(),
        disambiguator_config.double_press_timeout.as_millis()
    ));

    let mut tasks: JoinSet<ActionResult> = JoinSet::new();

    let clean = loop {
        tokio::select! {
            event = next_hotkey(&mut hotkeys) => match event {
                Some(HotkeyEvent) => on_press(&mut disambiguator, &speaker, &mut tasks),
                None => {
                    presenter.warn("Global hotkey unavailable; bind `local-tts press` to a shortcut");
                    hotkeys = None;
                }
            },
            Some(action) = actions.recv() => dispatch(&speaker, action, &mut tasks),
            Some(joined) = tasks.join_next() => log_finished(joined),
            signal = signals.recv() => match signal {
                Some(DaemonSignal::Press) => on_press(&mut disambiguator, &speaker, &mut tasks),
                Some(DaemonSignal::Stop) => {
                    disambiguator.cancel_pending();
                    dispatch(&speaker, HotkeyAction::Stop, &mut tasks);
                }
                Some(DaemonSignal::Shutdown) => break true,
                None => break false,
            },
        }
    };

    presenter.daemon_status("Shutting down...");
    disambiguator.cancel_pending();
    listener.stop();
    speaker.stop();
    // Abandon in-flight requests; a running capture still restores the clipboard
    tasks.shutdown().await;
    speaker.wait_for_capture().await;
    ipc_server.cleanup();

    if config.auto_stop_or_default() {
        presenter.start_spinner(&format!("Stopping backend {}...", backend.handle().name()));
        backend.stop().await;
        presenter.stop_spinner();
    }

    let _ = pid_file.release();

    if clean {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Ensure the backend is up; failures are reported, never fatal to the daemon
async fn start_backend(backend: &Backend, presenter: &mut Presenter, notify: bool) {
    presenter.start_spinner(&format!("Starting backend {}...", backend.handle().name()));

    match backend.ensure_running().await {
        Ok(outcome) => {
            presenter.spinner_success(&format!(
                "Backend {} ({})",
                outcome.as_str(),
                backend.handle().base_url()
            ));
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            if notify {
                let notifier = NotifyRustNotifier::new();
                if let Err(e) = notifier
                    .notify("LocalTTS", &e.to_string(), NotificationIcon::Error)
                    .await
                {
                    debug!(error = %e, "Notification failed");
                }
            }
        }
    }
}

/// Next global hotkey press; pends forever once the listener is gone
async fn next_hotkey(hotkeys: &mut Option<UnboundedReceiver<HotkeyEvent>>) -> Option<HotkeyEvent> {
    match hotkeys {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn on_press(
    disambiguator: &mut HotkeyDisambiguator,
    speaker: &Arc<DaemonSpeaker>,
    tasks: &mut JoinSet<ActionResult>,
) {
    let decision = disambiguator.on_hotkey_event(speaker.is_busy());
    debug!(
        intent = ?decision.intent,
        superseded = decision.superseded,
        "Hotkey press classified"
    );

    if let PressIntent::Immediate(action) = decision.intent {
        dispatch(speaker, action, tasks);
    }
}

/// Run an action off the event loop so presses keep flowing while it works
fn dispatch(speaker: &Arc<DaemonSpeaker>, action: HotkeyAction, tasks: &mut JoinSet<ActionResult>) {
    let speaker = Arc::clone(speaker);
    tasks.spawn(async move { (action, speaker.handle(action).await) });
}

fn log_finished(joined: Result<ActionResult, JoinError>) {
    match joined {
        Ok((action, Ok(outcome))) => info!(%action, ?outcome, "Action finished"),
        Ok((action, Err(SpeakError::Busy))) => {
            debug!(%action, "Ignored while another request runs")
        }
        Ok((action, Err(e))) => warn!(%action, error = %e, "Action failed"),
        Err(e) => warn!(error = %e, "Action task failed"),
    }
}
