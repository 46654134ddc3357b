//! Services implementing the recreate pipeline.

pub mod link_materializer;
pub mod name_resolver;
pub mod record_importer;
pub mod remediation;
pub mod template_service;

pub use link_materializer::LinkMaterializer;
pub use name_resolver::NameResolver;
pub use record_importer::{ImportOutcome, RowRejection, import_file, import_records};
pub use remediation::{
    EXIT_FATAL, EXIT_OK, EXIT_RECORDS_FAILED, Preflight, RemediationService, RunSettings, RunSummary,
};
pub use template_service::TemplateService;
