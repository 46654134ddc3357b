//! # linkfix
//!
//! Recreates SharePoint "Link to a Document" items that were created by
//! automation and are therefore downloaded instead of followed.
//!
//! The platform offers no way to fix an existing item's classification, so each
//! link is rebuilt by duplicating one known-good, UI-created template item on
//! the server and rewriting the copy's metadata.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities and the [`domain::resources::ResourceClient`] port
//! - **Application Layer** ([`application`]) - Template relocation, import, materialization
//! - **Infrastructure Layer** ([`infrastructure`]) - Concrete clients and run logging
//!
//! ## Run Flow
//!
//! 1. Open the run's error log and transcript ([`infrastructure::logging::RunLogger`])
//! 2. Check the library schema and resolve the template once
//! 3. Import the input record set, rejecting malformed rows
//! 4. Duplicate the template per record and patch its metadata, isolating failures
//! 5. Report attempted / created / failed counts and the log paths
//!
//! ## Configuration
//!
//! Run configuration is loaded from environment variables via [`config::Config`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        LinkMaterializer, NameResolver, RemediationService, RunSettings, RunSummary,
        TemplateService,
    };
    pub use crate::domain::entities::{
        FieldNames, LinkRecord, LinkStatus, MaterializedLink, TemplateHandle,
    };
    pub use crate::domain::resources::ResourceClient;
    pub use crate::error::AppError;
    pub use crate::infrastructure::clients::{LocalFsClient, MemoryClient};
    pub use crate::infrastructure::logging::RunLogger;
}
