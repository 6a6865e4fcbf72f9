//! This crate contains the code required to observe what the deployment tool
//! is doing. That is the initialization logic for logging and the panic hook
//! that routes panics through it.
pub mod config;
pub mod tracing;

pub use config::Config;
