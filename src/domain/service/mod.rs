//! Backend service domain module

mod handle;

pub use handle::{ServiceHandle, ServiceStatus, DEFAULT_CONTAINER_NAME, DEFAULT_IMAGE, DEFAULT_PORT};
