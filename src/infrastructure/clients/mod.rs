//! Resource client implementations.
//!
//! # Clients
//!
//! - [`LocalFsClient`] - Library mirrored onto a local directory
//! - [`MemoryClient`] - In-process tree with injectable faults

pub mod local_fs_client;
pub mod memory_client;

pub use local_fs_client::LocalFsClient;
pub use memory_client::MemoryClient;
