//! Locating and relocating the template link item.

use std::sync::Arc;

use crate::domain::entities::TemplateHandle;
use crate::domain::resources::ResourceClient;
use crate::error::AppError;
use crate::infrastructure::logging::RunLogger;
use crate::utils::resource_path;
use serde_json::json;

/// Finds the single template item and moves it into the hidden folder.
///
/// The template must have been created through the SharePoint UI; nothing in
/// this crate can produce a correctly classified replacement.
pub struct TemplateService<C: ResourceClient + ?Sized> {
    client: Arc<C>,
}

impl<C: ResourceClient + ?Sized> TemplateService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Resolves the template, relocating it out of the library root if needed.
    ///
    /// # Flow
    ///
    /// 1. Ensure `library/hidden_folder` exists
    /// 2. If the template is already in the hidden folder, use it
    /// 3. Otherwise, if it is in the library root, duplicate it into the hidden
    ///    folder, recycle the root copy, and mark the new copy hidden
    /// 4. Otherwise fail
    ///
    /// Repeating this against an already-migrated library is a no-op that
    /// returns the same handle.
    ///
    /// Failing to hide the template or to recycle the root copy is written to
    /// the error log but does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the template exists in neither location,
    /// or [`AppError::Validation`] if a folder occupies the template path.
    /// Propagates client errors from folder creation, probing, and duplication.
    pub async fn locate_and_relocate(
        &self,
        library: &str,
        template_name: &str,
        hidden_folder: &str,
        logger: &RunLogger,
    ) -> Result<TemplateHandle, AppError> {
        self.client.create_folder(library, hidden_folder).await?;

        let hidden_container = resource_path::join(library, hidden_folder);
        let hidden_path = resource_path::join(&hidden_container, template_name);
        if self.template_at(&hidden_path).await? {
            tracing::info!("Template found at {}", hidden_path);
            return Ok(TemplateHandle::resolved(hidden_path));
        }

        let root_path = resource_path::join(library, template_name);
        if !self.template_at(&root_path).await? {
            return Err(AppError::not_found(
                "Template not found",
                json!({ "searched": [hidden_path, root_path] }),
            ));
        }

        tracing::info!("Relocating template {} -> {}", root_path, hidden_path);
        self.client
            .duplicate(&root_path, &hidden_path, false)
            .await?;

        if let Err(e) = self.client.delete(&root_path, true).await {
            logger.log_error(
                &format!("Failed to recycle original template at {}", root_path),
                Some(&e.log_detail()),
            );
        }

        if let Err(e) = self.client.set_hidden(&hidden_path).await {
            tracing::warn!("Could not mark template hidden: {}", e);
            logger.log_error(
                &format!("Failed to mark template hidden at {}", hidden_path),
                Some(&e.log_detail()),
            );
        }

        Ok(TemplateHandle::resolved(hidden_path))
    }

    /// Read-only lookup: where the template currently is, if anywhere.
    ///
    /// Prefers the hidden folder. Creates and moves nothing. A folder at either
    /// template path is reported as [`AppError::Validation`].
    pub async fn probe(
        &self,
        library: &str,
        template_name: &str,
        hidden_folder: &str,
    ) -> Result<Option<String>, AppError> {
        let hidden_path = resource_path::join(
            &resource_path::join(library, hidden_folder),
            template_name,
        );
        if self.template_at(&hidden_path).await? {
            return Ok(Some(hidden_path));
        }

        let root_path = resource_path::join(library, template_name);
        if self.template_at(&root_path).await? {
            return Ok(Some(root_path));
        }

        Ok(None)
    }

    /// Whether a template file sits at `path`. A folder there is an error:
    /// every duplication from it would fail.
    async fn template_at(&self, path: &str) -> Result<bool, AppError> {
        match self.client.get_resource(path).await? {
            None => Ok(false),
            Some(resource) if resource.is_folder => Err(AppError::bad_request(
                "Template path is a folder",
                json!({ "path": resource.path }),
            )),
            Some(_) => Ok(true),
        }
    }
}
