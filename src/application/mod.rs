//! Application layer services implementing the recreate pipeline.
//!
//! Services consume the [`crate::domain::resources::ResourceClient`] port and
//! never touch a concrete client.
//!
//! # Available Services
//!
//! - [`services::name_resolver::NameResolver`] - Collision-free leaf names
//! - [`services::template_service::TemplateService`] - Template lookup and one-time relocation
//! - [`services::record_importer`] - Input record set parsing
//! - [`services::link_materializer::LinkMaterializer`] - Duplicate-then-patch per record
//! - [`services::remediation::RemediationService`] - Whole-run orchestration

pub mod services;
