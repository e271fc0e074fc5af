//! Health check infrastructure module

mod http;

pub use http::HttpHealthProbe;
