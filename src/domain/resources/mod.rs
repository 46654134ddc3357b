//! Port trait definitions for the domain layer.
//!
//! The pipeline never talks to the hosting service directly. Everything it
//! needs is expressed by [`ResourceClient`], implemented in
//! `crate::infrastructure::clients` and auto-mocked via `mockall` for unit tests.

pub mod resource_client;

pub use resource_client::ResourceClient;

#[cfg(test)]
pub use resource_client::MockResourceClient;
