//! End-to-end recreate run.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::entities::{FieldNames, MaterializedLink, TemplateHandle};
use crate::domain::resources::ResourceClient;
use crate::error::AppError;
use crate::infrastructure::logging::RunLogger;
use serde_json::json;

use super::link_materializer::LinkMaterializer;
use super::record_importer::import_file;
use super::template_service::TemplateService;

/// What a run operates on.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub library: String,
    pub template_name: String,
    pub hidden_folder: String,
    pub input_path: PathBuf,
    pub field_names: FieldNames,
}

impl From<&Config> for RunSettings {
    fn from(config: &Config) -> Self {
        Self {
            library: config.library.clone(),
            template_name: config.template_name.clone(),
            hidden_folder: config.hidden_folder.clone(),
            input_path: config.input_path.clone(),
            field_names: config.field_names(),
        }
    }
}

/// Result of a completed run (fatal errors are returned as `Err` instead).
#[derive(Debug)]
pub struct RunSummary {
    pub attempted: usize,
    pub created: usize,
    pub failed: usize,
    pub rejected: usize,
    pub template_path: String,
    pub results: Vec<MaterializedLink>,
    pub error_log: PathBuf,
    pub transcript: PathBuf,
}

/// Process exit code when every record was created.
pub const EXIT_OK: u8 = 0;
/// Process exit code for a fatal error (template, input, schema, connection).
pub const EXIT_FATAL: u8 = 1;
/// Process exit code when the run finished but some records failed.
pub const EXIT_RECORDS_FAILED: u8 = 2;

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            EXIT_OK
        } else {
            EXIT_RECORDS_FAILED
        }
    }

    /// Plain-text summary: counts, failed records, and both log paths.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Recreate summary".to_string(),
            format!("  Template:  {}", self.template_path),
            format!("  Attempted: {}", self.attempted),
            format!("  Created:   {}", self.created),
            format!("  Failed:    {}", self.failed),
        ];
        if self.rejected > 0 {
            lines.push(format!("  Rejected:  {} (input rows)", self.rejected));
        }

        let failures: Vec<&MaterializedLink> =
            self.results.iter().filter(|r| !r.is_created()).collect();
        if !failures.is_empty() {
            lines.push("Failed records:".to_string());
            for link in failures {
                lines.push(format!(
                    "  {} -> {}",
                    link.record.title(),
                    link.failure_detail.as_deref().unwrap_or_default()
                ));
            }
        }

        lines.push(format!("  Error log:  {}", self.error_log.display()));
        lines.push(format!("  Transcript: {}", self.transcript.display()));
        lines
    }
}

/// Read-only findings for the `check` command.
#[derive(Debug)]
pub struct Preflight {
    pub library_exists: bool,
    pub missing_fields: Vec<String>,
    pub template_location: Option<String>,
}

impl Preflight {
    pub fn is_ok(&self) -> bool {
        self.library_exists && self.missing_fields.is_empty() && self.template_location.is_some()
    }

    /// Plain-text findings, one line per check.
    pub fn report_lines(&self, settings: &RunSettings) -> Vec<String> {
        let mut lines = vec!["Preflight".to_string()];

        if !self.library_exists {
            lines.push(format!("  FAIL Library {} not found", settings.library));
            return lines;
        }
        lines.push(format!("  OK Library {}", settings.library));

        if self.missing_fields.is_empty() {
            lines.push("  OK Required fields present".to_string());
        } else {
            lines.push(format!(
                "  FAIL Missing fields: {}",
                self.missing_fields.join(", ")
            ));
        }

        match &self.template_location {
            Some(path) => lines.push(format!("  OK Template at {}", path)),
            None => lines.push(format!(
                "  FAIL Template {} not found in {} or {}/{}",
                settings.template_name, settings.library, settings.library, settings.hidden_folder
            )),
        }
        lines
    }
}

/// Drives a recreate run: schema check, template, import, materialization.
///
/// The caller owns the [`RunLogger`] so it can be opened before tracing is
/// initialized and closed after the summary is printed.
pub struct RemediationService<C: ResourceClient + ?Sized> {
    client: Arc<C>,
    settings: RunSettings,
}

impl<C: ResourceClient + ?Sized> RemediationService<C> {
    pub fn new(client: Arc<C>, settings: RunSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Runs the full pipeline.
    ///
    /// Per-record failures are part of the returned summary. Fatal errors are
    /// written to the error log before being returned.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if a required field or the template is missing,
    ///   or the input file does not exist
    /// - [`AppError::Validation`] if the input is empty or lacks required columns
    /// - Any client error raised while resolving the template
    pub async fn run(&self, logger: &RunLogger) -> Result<RunSummary, AppError> {
        tracing::info!(
            library = %self.settings.library,
            input = %self.settings.input_path.display(),
            "Run started"
        );

        match self.run_inner(logger).await {
            Ok(summary) => {
                tracing::info!(
                    attempted = summary.attempted,
                    created = summary.created,
                    failed = summary.failed,
                    rejected = summary.rejected,
                    "Run finished"
                );
                Ok(summary)
            }
            Err(e) => {
                logger.log_error("Run aborted", Some(&e.log_detail()));
                Err(e)
            }
        }
    }

    async fn run_inner(&self, logger: &RunLogger) -> Result<RunSummary, AppError> {
        let settings = &self.settings;

        self.ensure_fields().await?;
        let template = self.prepare_template(logger).await?;

        let import = import_file(&settings.input_path).await?;
        for rejection in &import.rejected {
            logger.log_error(
                &format!("Rejected input row {}", rejection.row),
                Some(&rejection.reason),
            );
        }

        let materializer =
            LinkMaterializer::new(Arc::clone(&self.client), settings.field_names.clone());
        let results = materializer
            .materialize(import.records, &template, &settings.library, logger)
            .await;

        let created = results.iter().filter(|r| r.is_created()).count();
        Ok(RunSummary {
            attempted: results.len(),
            created,
            failed: results.len() - created,
            rejected: import.rejected.len(),
            template_path: template.path().to_string(),
            results,
            error_log: logger.error_log_path().to_path_buf(),
            transcript: logger.transcript_path().to_path_buf(),
        })
    }

    /// Locates the template, relocating it into the hidden folder if needed.
    pub async fn prepare_template(&self, logger: &RunLogger) -> Result<TemplateHandle, AppError> {
        TemplateService::new(Arc::clone(&self.client))
            .locate_and_relocate(
                &self.settings.library,
                &self.settings.template_name,
                &self.settings.hidden_folder,
                logger,
            )
            .await
    }

    /// Fails if the library lacks a column the metadata rewrite needs.
    pub async fn ensure_fields(&self) -> Result<(), AppError> {
        let missing = self.missing_fields().await?;
        if missing.is_empty() {
            return Ok(());
        }

        Err(AppError::not_found(
            "Required field missing from library schema",
            json!({ "library": self.settings.library, "fields": missing }),
        ))
    }

    /// Read-only checks; nothing is created or moved.
    pub async fn preflight(&self) -> Result<Preflight, AppError> {
        let library_exists = self.client.exists(&self.settings.library).await?;
        if !library_exists {
            return Ok(Preflight {
                library_exists,
                missing_fields: Vec::new(),
                template_location: None,
            });
        }

        let missing_fields = self.missing_fields().await?;
        let template_location = TemplateService::new(Arc::clone(&self.client))
            .probe(
                &self.settings.library,
                &self.settings.template_name,
                &self.settings.hidden_folder,
            )
            .await?;

        Ok(Preflight {
            library_exists,
            missing_fields,
            template_location,
        })
    }

    async fn missing_fields(&self) -> Result<Vec<String>, AppError> {
        let mut missing = Vec::new();
        for field in self.settings.field_names.required_custom() {
            if !self.client.has_field(&self.settings.library, field).await? {
                missing.push(field.to_string());
            }
        }
        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resources::MockResourceClient;
    use chrono::Local;

    fn settings(input_path: PathBuf) -> RunSettings {
        RunSettings {
            library: "/lib".to_string(),
            template_name: "test.aspx".to_string(),
            hidden_folder: "_template".to_string(),
            input_path,
            field_names: FieldNames::default(),
        }
    }

    #[tokio::test]
    async fn test_missing_field_aborts_before_template() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();
        let mut client = MockResourceClient::new();
        client
            .expect_has_field()
            .returning(|_, field| Ok(field != "OriginalUrl"));
        client.expect_create_folder().times(0);
        client.expect_duplicate().times(0);

        let service = RemediationService::new(Arc::new(client), settings(dir.path().join("x.csv")));
        let result = service.run(&logger).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert_eq!(logger.errors_logged(), 1);
    }

    #[tokio::test]
    async fn test_preflight_missing_library() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = MockResourceClient::new();
        client.expect_exists().returning(|_| Ok(false));
        client.expect_has_field().times(0);

        let service = RemediationService::new(Arc::new(client), settings(dir.path().join("x.csv")));
        let preflight = service.preflight().await.unwrap();

        assert!(!preflight.library_exists);
        assert!(preflight.template_location.is_none());
    }

    fn summary(results: Vec<MaterializedLink>) -> RunSummary {
        let created = results.iter().filter(|r| r.is_created()).count();
        RunSummary {
            attempted: results.len(),
            created,
            failed: results.len() - created,
            rejected: 0,
            template_path: "/lib/_template/test.aspx".to_string(),
            results,
            error_log: PathBuf::from("logs/errors_20261016_142501.log"),
            transcript: PathBuf::from("logs/transcript_20261016_142501.log"),
        }
    }

    fn record(title: &str) -> crate::domain::entities::LinkRecord {
        crate::domain::entities::LinkRecord::new(title, "https://example.com/doc", None).unwrap()
    }

    #[test]
    fn test_exit_code_clean_run() {
        let clean = summary(vec![MaterializedLink::created(
            record("A"),
            "A.aspx".to_string(),
            "/lib/A.aspx".to_string(),
        )]);

        assert!(clean.is_clean());
        assert_eq!(clean.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_exit_code_partial_failure() {
        let partial = summary(vec![
            MaterializedLink::created(record("A"), "A.aspx".to_string(), "/lib/A.aspx".to_string()),
            MaterializedLink::failed(
                record("B"),
                "B.aspx".to_string(),
                "/lib/B.aspx".to_string(),
                "conflict: Resource already exists".to_string(),
            ),
        ]);

        assert!(!partial.is_clean());
        assert_eq!(partial.exit_code(), EXIT_RECORDS_FAILED);
        assert_ne!(partial.exit_code(), EXIT_FATAL);
    }

    #[test]
    fn test_report_lines_name_failures_and_log_paths() {
        let partial = summary(vec![MaterializedLink::failed(
            record("B"),
            "B.aspx".to_string(),
            "/lib/B.aspx".to_string(),
            "conflict: Resource already exists".to_string(),
        )]);

        let lines = partial.report_lines();

        assert!(lines.contains(&"  Failed:    1".to_string()));
        assert!(lines.contains(&"  B -> conflict: Resource already exists".to_string()));
        assert!(lines.contains(&"  Error log:  logs/errors_20261016_142501.log".to_string()));
        assert!(lines.contains(&"  Transcript: logs/transcript_20261016_142501.log".to_string()));
    }
}
