//! Application layer - Use cases and port interfaces
//!
//! Contains the core operations and trait definitions
//! for external system interactions.

pub mod capture;
pub mod disambiguator;
pub mod lifecycle;
pub mod ports;
pub mod speak;

// Re-export use cases
pub use capture::{CaptureError, CaptureTiming, SelectionCapture};
pub use disambiguator::{DisambiguatorConfig, HotkeyDisambiguator};
pub use lifecycle::{BackendLifecycle, EnsureOutcome, HealthPolicy, LifecycleError};
pub use speak::{SpeakConfig, SpeakError, SpeakOutcome, SpeakUseCase};
