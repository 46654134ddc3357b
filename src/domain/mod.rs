//! Domain layer containing entities and the resource client port.
//!
//! # Architecture
//!
//! - [`entities`] - Link records, template handle, per-record outcomes, typed metadata
//! - [`resources`] - The [`resources::ResourceClient`] trait the pipeline drives
//!
//! # Design Principles
//!
//! - The domain layer has no dependency on infrastructure
//! - Remote operations are only reachable through the port trait
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod entities;
pub mod resources;
