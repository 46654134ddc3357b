//! Port for the remote document library.

use crate::domain::entities::{FieldUpdate, RecordHandle, Resource};
use crate::error::AppError;
use async_trait::async_trait;

/// Operations the recreate pipeline needs from the hosting service.
///
/// Paths are server-relative and `/`-separated (e.g.
/// `/Shared Documents/_template/LinkTemplate.aspx`). Connecting and
/// authenticating happen in each implementation's constructor.
///
/// Implementations perform each call once. Throttling, retries, and timeouts
/// are the implementation's concern, not the pipeline's.
///
/// # Implementations
///
/// - [`crate::infrastructure::clients::LocalFsClient`] - Library mirrored onto a local directory
/// - [`crate::infrastructure::clients::MemoryClient`] - In-process tree with fault injection
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Returns whether any file or folder exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] / [`AppError::Io`] if the probe itself fails.
    async fn exists(&self, path: &str) -> Result<bool, AppError>;

    /// Fetches the resource at `path`, or `None` if nothing is there.
    async fn get_resource(&self, path: &str) -> Result<Option<Resource>, AppError>;

    /// Copies `source` to `target` entirely on the server side.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `source` does not exist.
    /// Returns [`AppError::Conflict`] if `target` exists and `overwrite` is false.
    async fn duplicate(&self, source: &str, target: &str, overwrite: bool)
    -> Result<(), AppError>;

    /// Deletes `path`, moving it to the recycle bin when `recycle` is true.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if nothing exists at `path`.
    async fn delete(&self, path: &str, recycle: bool) -> Result<(), AppError>;

    /// Creates folder `name` under `parent`. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `parent` does not exist.
    /// Returns [`AppError::Conflict`] if a file occupies the folder's path.
    async fn create_folder(&self, parent: &str, name: &str) -> Result<(), AppError>;

    /// Resolves the list item (metadata record) behind the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no file exists at `path`.
    async fn get_record(&self, path: &str) -> Result<RecordHandle, AppError>;

    /// Writes `fields` onto `record` in a single update.
    ///
    /// A `FileLeafRef` update is a metadata write only; it never moves the file.
    async fn set_fields(&self, record: &RecordHandle, fields: &[FieldUpdate])
    -> Result<(), AppError>;

    /// Marks the resource at `path` as hidden from normal listings.
    ///
    /// Not every library honors this. Callers should treat failure as non-fatal.
    async fn set_hidden(&self, path: &str) -> Result<(), AppError>;

    /// Returns whether the list behind `container` defines column `field`.
    async fn has_field(&self, container: &str, field: &str) -> Result<bool, AppError>;
}
