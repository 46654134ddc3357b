//! Duplicate-then-patch creation of link items.

use std::sync::Arc;

use crate::domain::entities::{FieldNames, LinkFields, LinkRecord, MaterializedLink, TemplateHandle};
use crate::domain::resources::ResourceClient;
use crate::error::AppError;
use crate::infrastructure::logging::RunLogger;
use crate::utils::name_sanitizer::sanitize;
use crate::utils::resource_path;

use super::name_resolver::NameResolver;

/// Creates one link item per record by duplicating the template.
///
/// Records are processed strictly in input order and independently: a failure
/// is recorded and the next record is still attempted. Nothing is rolled back,
/// so a copy whose metadata write failed stays in the library and its path is
/// named in the error log.
pub struct LinkMaterializer<C: ResourceClient + ?Sized> {
    client: Arc<C>,
    resolver: NameResolver<C>,
    field_names: FieldNames,
}

impl<C: ResourceClient + ?Sized> LinkMaterializer<C> {
    pub fn new(client: Arc<C>, field_names: FieldNames) -> Self {
        Self {
            resolver: NameResolver::new(Arc::clone(&client)),
            client,
            field_names,
        }
    }

    /// Materializes every record into `container`, returning one result per record.
    ///
    /// Failures are written to `logger` with the record's title and URL.
    pub async fn materialize(
        &self,
        records: Vec<LinkRecord>,
        template: &TemplateHandle,
        container: &str,
        logger: &RunLogger,
    ) -> Vec<MaterializedLink> {
        let total = records.len();
        let mut results = Vec::with_capacity(total);

        for (idx, record) in records.into_iter().enumerate() {
            let link = self.materialize_one(record, template, container).await;

            match &link.failure_detail {
                None => tracing::info!(
                    title = link.record.title(),
                    leaf = %link.generated_name,
                    "[{}/{}] Created",
                    idx + 1,
                    total
                ),
                Some(detail) => logger.log_error(
                    &format!(
                        "[{}/{}] Failed to create link '{}' -> {}",
                        idx + 1,
                        total,
                        link.record.title(),
                        link.record.target_url()
                    ),
                    Some(detail),
                ),
            }

            results.push(link);
        }

        results
    }

    async fn materialize_one(
        &self,
        record: LinkRecord,
        template: &TemplateHandle,
        container: &str,
    ) -> MaterializedLink {
        let base_name = sanitize(record.title());

        let leaf = match self
            .resolver
            .resolve(container, &base_name, template.extension())
            .await
        {
            Ok(leaf) => leaf,
            Err(e) => {
                return MaterializedLink::failed(record, String::new(), String::new(), e.log_detail());
            }
        };
        let target = resource_path::join(container, &leaf);

        let fields = match LinkFields::for_record(&record, &leaf) {
            Ok(fields) => fields,
            Err(e) => return MaterializedLink::failed(record, leaf, target, e.log_detail()),
        };

        if let Err(e) = self.client.duplicate(template.path(), &target, false).await {
            return MaterializedLink::failed(record, leaf, target, e.log_detail());
        }

        if let Err(e) = self.write_fields(&target, &fields).await {
            let detail = format!("{} (duplicated item left at {})", e.log_detail(), target);
            return MaterializedLink::failed(record, leaf, target, detail);
        }

        MaterializedLink::created(record, leaf, target)
    }

    async fn write_fields(&self, target: &str, fields: &LinkFields) -> Result<(), AppError> {
        let handle = self.client.get_record(target).await?;
        let updates = fields.to_updates(&self.field_names);
        self.client.set_fields(&handle, &updates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LinkStatus, RecordHandle};
    use crate::domain::resources::MockResourceClient;
    use chrono::Local;
    use mockall::predicate::eq;
    use serde_json::json;

    const TEMPLATE: &str = "/lib/_template/test.aspx";

    fn template() -> TemplateHandle {
        TemplateHandle::resolved(TEMPLATE)
    }

    fn records(titles: &[&str]) -> Vec<LinkRecord> {
        titles
            .iter()
            .map(|t| LinkRecord::new(t, &format!("https://example.com/{}", t), None).unwrap())
            .collect()
    }

    fn record_handles(client: &mut MockResourceClient) {
        client
            .expect_get_record()
            .returning(|path| Ok(RecordHandle { path: path.to_string(), id: 7 }));
    }

    #[tokio::test]
    async fn test_creates_and_patches() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();
        let mut client = MockResourceClient::new();
        client.expect_exists().returning(|_| Ok(false));
        client
            .expect_duplicate()
            .with(eq(TEMPLATE), eq("/lib/My Report.aspx"), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(()));
        record_handles(&mut client);
        client
            .expect_set_fields()
            .withf(|handle, updates| {
                handle.path == "/lib/My Report.aspx"
                    && updates.iter().any(|u| {
                        u.name == "URL" && u.value == "https://example.com/doc, My Report"
                    })
                    && updates
                        .iter()
                        .any(|u| u.name == "OriginalUrl" && u.value == "https://example.com/doc")
                    && updates
                        .iter()
                        .any(|u| u.name == "FileLeafRef" && u.value == "My Report.aspx")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let materializer = LinkMaterializer::new(Arc::new(client), FieldNames::default());
        let record = LinkRecord::new("My Report", "https://example.com/doc", Some("")).unwrap();
        let results = materializer
            .materialize(vec![record], &template(), "/lib", &logger)
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, LinkStatus::Created);
        assert_eq!(results[0].generated_name, "My Report.aspx");
        assert_eq!(results[0].target_path, "/lib/My Report.aspx");
        assert_eq!(logger.errors_logged(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();
        let mut client = MockResourceClient::new();
        client.expect_exists().returning(|_| Ok(false));
        client.expect_duplicate().times(3).returning(|_, target, _| {
            if target == "/lib/B.aspx" {
                Err(AppError::internal("Simulated remote fault", json!({})))
            } else {
                Ok(())
            }
        });
        record_handles(&mut client);
        client.expect_set_fields().times(2).returning(|_, _| Ok(()));

        let materializer = LinkMaterializer::new(Arc::new(client), FieldNames::default());
        let results = materializer
            .materialize(records(&["A", "B", "C"]), &template(), "/lib", &logger)
            .await;

        let statuses: Vec<LinkStatus> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![LinkStatus::Created, LinkStatus::Failed, LinkStatus::Created]
        );
        assert!(
            results[1]
                .failure_detail
                .as_deref()
                .unwrap()
                .contains("Simulated remote fault")
        );
        assert_eq!(logger.errors_logged(), 1);
    }

    #[tokio::test]
    async fn test_metadata_failure_leaves_copy_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();
        let mut client = MockResourceClient::new();
        client.expect_exists().returning(|_| Ok(false));
        client.expect_duplicate().returning(|_, _, _| Ok(()));
        record_handles(&mut client);
        client
            .expect_set_fields()
            .returning(|_, _| Err(AppError::bad_request("Unknown field", json!({}))));
        client.expect_delete().times(0);

        let materializer = LinkMaterializer::new(Arc::new(client), FieldNames::default());
        let results = materializer
            .materialize(records(&["A"]), &template(), "/lib", &logger)
            .await;

        assert_eq!(results[0].status, LinkStatus::Failed);
        assert_eq!(results[0].target_path, "/lib/A.aspx");
        assert!(
            results[0]
                .failure_detail
                .as_deref()
                .unwrap()
                .contains("left at /lib/A.aspx")
        );
    }

    #[tokio::test]
    async fn test_resolution_failure_is_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();
        let mut client = MockResourceClient::new();
        client.expect_exists().returning(|path| {
            if path.starts_with("/lib/A") {
                Err(AppError::internal("Probe failed", json!({})))
            } else {
                Ok(false)
            }
        });
        client.expect_duplicate().times(1).returning(|_, _, _| Ok(()));
        record_handles(&mut client);
        client.expect_set_fields().times(1).returning(|_, _| Ok(()));

        let materializer = LinkMaterializer::new(Arc::new(client), FieldNames::default());
        let results = materializer
            .materialize(records(&["A", "B"]), &template(), "/lib", &logger)
            .await;

        assert_eq!(results[0].status, LinkStatus::Failed);
        assert!(results[0].generated_name.is_empty());
        assert_eq!(results[1].status, LinkStatus::Created);
    }

    #[tokio::test]
    async fn test_sanitized_title_used_for_name() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();
        let mut client = MockResourceClient::new();
        client.expect_exists().returning(|_| Ok(false));
        client
            .expect_duplicate()
            .with(eq(TEMPLATE), eq("/lib/Q3_ Plan.aspx"), eq(false))
            .returning(|_, _, _| Ok(()));
        record_handles(&mut client);
        client
            .expect_set_fields()
            .withf(|_, updates| updates.iter().any(|u| u.name == "Title" && u.value == "Q3: Plan"))
            .returning(|_, _| Ok(()));

        let materializer = LinkMaterializer::new(Arc::new(client), FieldNames::default());
        let record = LinkRecord::new("Q3: Plan", "https://example.com/q3", None).unwrap();
        let results = materializer
            .materialize(vec![record], &template(), "/lib", &logger)
            .await;

        assert!(results[0].is_created());
    }
}
