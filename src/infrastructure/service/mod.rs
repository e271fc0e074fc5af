//! Backend service control infrastructure module

mod docker;

pub use docker::DockerController;
