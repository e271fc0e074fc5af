//! Reader view infrastructure module

mod terminal;

pub use terminal::TerminalReader;
