//! One-shot command runners and adapter wiring

use std::sync::Arc;

use tracing::warn;

use crate::application::ports::{
    ConfigStore, NoopReader, PlaybackError, ReaderSurface, SynthesisError,
};
use crate::application::{
    BackendLifecycle, SelectionCapture, SpeakConfig, SpeakError, SpeakOutcome, SpeakUseCase,
};
use crate::domain::config::AppConfig;
use crate::domain::hotkey::HotkeyAction;
use crate::domain::text::clean_text;
use crate::infrastructure::{
    ArboardClipboard, DockerController, EnigoKeyboard, HttpHealthProbe, KokoroSynthesizer,
    ModifierTracker, NotifyRustNotifier, RodioPlayer, TerminalReader, XdgConfigStore,
};

use super::args::BackendAction;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Speak use case wired to the desktop adapters
pub type Speaker<R> = SpeakUseCase<
    ArboardClipboard,
    EnigoKeyboard,
    KokoroSynthesizer,
    RodioPlayer,
    R,
    NotifyRustNotifier,
>;

/// Backend lifecycle wired to docker and HTTP health checks
pub type Backend = BackendLifecycle<DockerController, HttpHealthProbe>;

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Build the backend lifecycle for the configured container
pub fn build_backend(config: &AppConfig) -> Backend {
    BackendLifecycle::new(
        DockerController::new(),
        HttpHealthProbe::new(),
        config.service_handle(),
    )
}

/// Build the speak use case.
///
/// `modifiers` is shared with the hotkey listener when one runs, so the
/// keyboard adapter can see physically held keys.
pub fn build_speaker<R: ReaderSurface>(
    config: &AppConfig,
    modifiers: Arc<ModifierTracker>,
    reader: R,
) -> Result<Speaker<R>, PlaybackError> {
    let handle = config.service_handle();
    let capture = SelectionCapture::new(ArboardClipboard::new(), EnigoKeyboard::new(modifiers));
    let synthesizer = KokoroSynthesizer::new(handle.base_url())
        .with_voice(config.voice_or_default())
        .with_model(config.model_or_default());
    let player = RodioPlayer::new()?;

    Ok(SpeakUseCase::new(
        capture,
        synthesizer,
        player,
        reader,
        NotifyRustNotifier::new(),
        SpeakConfig::from(config),
    ))
}

/// Capture the selection once and read it aloud
pub async fn run_speak(config: &AppConfig, presenter: &mut Presenter) -> Result<(), String> {
    let speaker = build_speaker(config, Arc::new(ModifierTracker::new()), NoopReader)
        .map_err(|e| e.to_string())?;

    presenter.start_spinner("Capturing selection...");
    match speaker.handle(HotkeyAction::Speak).await {
        Ok(outcome) => {
            presenter.spinner_success(&describe(outcome));
            play_to_end(&speaker, presenter).await;
            Ok(())
        }
        Err(e) => {
            presenter.stop_spinner();
            Err(error_message(&e))
        }
    }
}

/// Read `text` aloud, optionally following along in the terminal
pub async fn run_say(
    config: &AppConfig,
    text: &str,
    highlight: bool,
    presenter: &mut Presenter,
) -> Result<(), String> {
    let modifiers = Arc::new(ModifierTracker::new());

    if highlight {
        let speaker =
            build_speaker(config, modifiers, TerminalReader::new()).map_err(|e| e.to_string())?;
        let text = clean_text(text);

        let result = tokio::select! {
            result = speaker.read_aloud(&text) => result,
            _ = tokio::signal::ctrl_c() => Ok(speaker.stop()),
        };
        // The reader leaves the cursor on its highlight line
        presenter.output("");
        return result.map(|_| ()).map_err(|e| error_message(&e));
    }

    let speaker = build_speaker(config, modifiers, NoopReader).map_err(|e| e.to_string())?;
    presenter.start_spinner("Synthesizing...");
    match speaker.speak_text(text).await {
        Ok(outcome) => {
            presenter.spinner_success(&describe(outcome));
            play_to_end(&speaker, presenter).await;
            Ok(())
        }
        Err(e) => {
            presenter.stop_spinner();
            Err(error_message(&e))
        }
    }
}

/// Handle `backend` subcommands
pub async fn run_backend(
    action: BackendAction,
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<(), String> {
    let backend = build_backend(config);
    let name = backend.handle().name().to_string();

    match action {
        BackendAction::Start => {
            presenter.start_spinner(&format!("Starting backend {}...", name));
            match backend.ensure_running().await {
                Ok(outcome) => {
                    presenter.spinner_success(&format!(
                        "Backend {} ({})",
                        outcome.as_str(),
                        backend.handle().base_url()
                    ));
                    Ok(())
                }
                Err(e) => {
                    presenter.spinner_fail("Backend failed to start");
                    Err(e.to_string())
                }
            }
        }
        BackendAction::Stop => {
            backend.stop().await;
            let status = backend.status().await.map_err(|e| e.to_string())?;
            presenter.service_status(&name, status);
            Ok(())
        }
        BackendAction::Status => {
            let status = backend.status().await.map_err(|e| e.to_string())?;
            presenter.service_status(&name, status);
            Ok(())
        }
    }
}

async fn play_to_end<R: ReaderSurface>(speaker: &Speaker<R>, presenter: &Presenter) {
    tokio::select! {
        _ = speaker.wait_until_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            speaker.stop();
            presenter.warn("Interrupted");
        }
    }
}

fn describe(outcome: SpeakOutcome) -> String {
    match outcome {
        SpeakOutcome::Stopped => "Stopped".to_string(),
        SpeakOutcome::Spoken { chars } => format!("Speaking {} characters", chars),
        SpeakOutcome::ReaderOpened { tokens, .. } => format!("Reading {} words", tokens),
    }
}

/// User-facing message, with a hint when the backend is down
fn error_message(error: &SpeakError) -> String {
    match error {
        SpeakError::Synthesis(SynthesisError::Unreachable(_)) => format!(
            "{}. Start it with: local-tts backend start",
            error
        ),
        _ => error.to_string(),
    }
}
