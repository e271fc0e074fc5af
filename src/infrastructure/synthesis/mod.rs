//! Speech synthesis infrastructure module

mod kokoro;

pub use kokoro::KokoroSynthesizer;
