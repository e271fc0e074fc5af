//! Word alignment between backend timestamps and displayed tokens
//!
//! The synthesis backend reports when each spoken word starts and ends.
//! The reader shows its own tokenization of the same text. This module
//! maps one onto the other with a single greedy forward pass and then
//! answers "which token is being spoken right now?" for a playback position.

mod highlight;
mod map;
mod normalize;
mod timestamp;
mod tokens;

pub use highlight::{HighlightChange, HighlightTracker};
pub use map::{AlignmentMap, WordAligner};
pub use normalize::normalize_token;
pub use timestamp::WordTimestamp;
pub use tokens::{paragraphs, tokenize, RenderedToken};
