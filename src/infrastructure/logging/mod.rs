//! Per-run error log and transcript, plus tracing subscriber setup.

pub mod run_logger;
pub mod subscriber;

pub use run_logger::RunLogger;
pub use subscriber::init_tracing;
