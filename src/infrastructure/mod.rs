//! Infrastructure layer: concrete resource clients and run logging.
//!
//! - [`clients`] - [`crate::domain::resources::ResourceClient`] implementations
//! - [`logging`] - Error log, transcript, and tracing subscriber setup

pub mod clients;
pub mod logging;
