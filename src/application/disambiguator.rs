//! Hotkey press disambiguation
//!
//! Turns raw hotkey presses into single-press and double-press intents.
//! A press that might be the first half of a double press is held back for
//! the configured window and delivered on a channel if no second press
//! arrives in time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::config::AppConfig;
use crate::domain::hotkey::{HotkeyAction, PressDecision, PressIntent};

/// Disambiguator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisambiguatorConfig {
    /// Window in which a second press counts as a double press
    pub double_press_timeout: Duration,
    /// When false, every press speaks immediately
    pub enabled: bool,
}

impl Default for DisambiguatorConfig {
    fn default() -> Self {
        Self {
            double_press_timeout: Duration::from_millis(
                crate::domain::config::DEFAULT_DOUBLE_PRESS_TIMEOUT_MS,
            ),
            enabled: true,
        }
    }
}

impl From<&AppConfig> for DisambiguatorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            double_press_timeout: config.double_press_timeout(),
            enabled: config.reader_enabled_or_default(),
        }
    }
}

/// A deferred press waiting for its window to elapse.
///
/// `armed` is consumed exactly once, either by the timer firing or by
/// cancellation, so a cancelled press can never resolve.
struct PendingPress {
    armed: Arc<AtomicBool>,
    timer: JoinHandle<()>,
}

impl PendingPress {
    /// Returns true if the press was still pending.
    fn cancel(self) -> bool {
        let was_armed = self.armed.swap(false, Ordering::AcqRel);
        self.timer.abort();
        was_armed
    }

    fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

/// Single-owner hotkey disambiguator.
///
/// Must be driven from within a Tokio runtime; deferred presses are
/// resolved by spawned timer tasks.
pub struct HotkeyDisambiguator {
    config: DisambiguatorConfig,
    last_press: Option<Instant>,
    pending: Option<PendingPress>,
    resolved: mpsc::UnboundedSender<HotkeyAction>,
}

impl HotkeyDisambiguator {
    /// Create a disambiguator delivering deferred actions to `resolved`
    pub fn new(config: DisambiguatorConfig, resolved: mpsc::UnboundedSender<HotkeyAction>) -> Self {
        Self {
            config,
            last_press: None,
            pending: None,
            resolved,
        }
    }

    /// Create a disambiguator together with its resolution channel
    pub fn channel(config: DisambiguatorConfig) -> (Self, mpsc::UnboundedReceiver<HotkeyAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(config, tx), rx)
    }

    /// Whether a deferred press is waiting for its window to elapse
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(PendingPress::is_armed)
    }

    /// Classify one hotkey press.
    ///
    /// `busy` is true while audio is playing; such a press always stops
    /// playback and does not take part in double-press timing.
    pub fn on_hotkey_event(&mut self, busy: bool) -> PressDecision {
        if busy {
            debug!("Hotkey pressed while busy, stopping");
            return PressDecision {
                intent: PressIntent::Immediate(HotkeyAction::Stop),
                superseded: false,
            };
        }

        let now = Instant::now();
        let previous = self.last_press.replace(now);
        let superseded = self.cancel_pending();
        let timeout = self.config.double_press_timeout;

        if !self.config.enabled || timeout.is_zero() {
            return PressDecision {
                intent: PressIntent::Immediate(HotkeyAction::Speak),
                superseded,
            };
        }

        let within_window = previous.is_some_and(|at| now.duration_since(at) < timeout);
        if within_window {
            debug!(superseded, "Double press detected");
            return PressDecision {
                intent: PressIntent::Immediate(HotkeyAction::OpenReader),
                superseded,
            };
        }

        self.schedule(HotkeyAction::Speak, timeout);
        debug!(delay_ms = timeout.as_millis() as u64, "Press deferred");
        PressDecision {
            intent: PressIntent::Deferred {
                action: HotkeyAction::Speak,
                delay: timeout,
            },
            superseded,
        }
    }

    /// Cancel the pending deferred press, if any.
    ///
    /// Returns true if a press was cancelled before it resolved.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some_and(PendingPress::cancel)
    }

    fn schedule(&mut self, action: HotkeyAction, delay: Duration) {
        let armed = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&armed);
        let resolved = self.resolved.clone();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if flag.swap(false, Ordering::AcqRel) {
                let _ = resolved.send(action);
            }
        });

        self.pending = Some(PendingPress { armed, timer });
    }
}

impl Drop for HotkeyDisambiguator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::sleep;

    const WINDOW: Duration = Duration::from_millis(400);

    fn disambiguator() -> (HotkeyDisambiguator, mpsc::UnboundedReceiver<HotkeyAction>) {
        HotkeyDisambiguator::channel(DisambiguatorConfig {
            double_press_timeout: WINDOW,
            enabled: true,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn single_press_resolves_after_window() {
        let (mut d, mut rx) = disambiguator();

        let decision = d.on_hotkey_event(false);
        assert_eq!(
            decision.intent,
            PressIntent::Deferred {
                action: HotkeyAction::Speak,
                delay: WINDOW
            }
        );
        assert!(!decision.superseded);
        assert!(d.has_pending());

        sleep(WINDOW / 2).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        sleep(WINDOW).await;
        assert_eq!(rx.try_recv().unwrap(), HotkeyAction::Speak);
        assert!(!d.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_presses_each_speak() {
        let (mut d, mut rx) = disambiguator();

        for _ in 0..3 {
            let decision = d.on_hotkey_event(false);
            assert!(!decision.intent.is_immediate());
            assert!(!decision.superseded);
            sleep(WINDOW + Duration::from_millis(10)).await;
            assert_eq!(rx.try_recv().unwrap(), HotkeyAction::Speak);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn quick_second_press_opens_reader_and_cancels_first() {
        let (mut d, mut rx) = disambiguator();

        d.on_hotkey_event(false);
        sleep(Duration::from_millis(150)).await;
        let second = d.on_hotkey_event(false);

        assert_eq!(
            second.intent,
            PressIntent::Immediate(HotkeyAction::OpenReader)
        );
        assert!(second.superseded);
        assert!(!d.has_pending());

        sleep(WINDOW * 3).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn third_quick_press_opens_reader_again() {
        let (mut d, _rx) = disambiguator();

        d.on_hotkey_event(false);
        sleep(Duration::from_millis(100)).await;
        d.on_hotkey_event(false);
        sleep(Duration::from_millis(100)).await;
        let third = d.on_hotkey_event(false);

        assert_eq!(third.intent.action(), HotkeyAction::OpenReader);
        assert!(!third.superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn busy_press_stops_without_touching_timing() {
        let (mut d, mut rx) = disambiguator();

        d.on_hotkey_event(false);
        let busy = d.on_hotkey_event(true);
        assert_eq!(busy.intent, PressIntent::Immediate(HotkeyAction::Stop));
        assert!(!busy.superseded);
        assert!(d.has_pending());

        sleep(WINDOW + Duration::from_millis(10)).await;
        assert_eq!(rx.try_recv().unwrap(), HotkeyAction::Speak);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_speaks_immediately() {
        let (mut d, mut rx) = HotkeyDisambiguator::channel(DisambiguatorConfig {
            double_press_timeout: WINDOW,
            enabled: false,
        });

        let first = d.on_hotkey_event(false);
        let second = d.on_hotkey_event(false);
        assert_eq!(first.intent, PressIntent::Immediate(HotkeyAction::Speak));
        assert_eq!(second.intent, PressIntent::Immediate(HotkeyAction::Speak));

        sleep(WINDOW * 2).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_always_speaks_immediately() {
        let (mut d, _rx) = HotkeyDisambiguator::channel(DisambiguatorConfig {
            double_press_timeout: Duration::ZERO,
            enabled: true,
        });

        for _ in 0..3 {
            let decision = d.on_hotkey_event(false);
            assert_eq!(decision.intent, PressIntent::Immediate(HotkeyAction::Speak));
        }
        assert!(!d.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pending_prevents_resolution() {
        let (mut d, mut rx) = disambiguator();

        d.on_hotkey_event(false);
        assert!(d.cancel_pending());
        assert!(!d.cancel_pending());

        sleep(WINDOW * 2).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_firing_reports_nothing_cancelled() {
        let (mut d, mut rx) = disambiguator();

        d.on_hotkey_event(false);
        sleep(WINDOW + Duration::from_millis(1)).await;
        assert!(!d.cancel_pending());
        assert_eq!(rx.try_recv().unwrap(), HotkeyAction::Speak);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn config_from_app_config() {
        let config = AppConfig::defaults();
        let d = DisambiguatorConfig::from(&config);
        assert_eq!(d.double_press_timeout, Duration::from_millis(400));
        assert!(d.enabled);
    }
}
