//! Resource client over a document library mirrored onto a local directory.
//!
//! Server-relative paths map directly under the root directory:
//! `/Shared Documents/a.aspx` → `<root>/Shared Documents/a.aspx`.
//!
//! Item metadata lives beside the files in `<folder>/.linkfix/<leaf>.json`.
//! A container may declare its schema in `<container>/.linkfix/_schema.json`
//! as a JSON array of column names; without it every column is accepted.
//! Recycled items are moved to `<root>/.recycle/`.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use url::Url;

use crate::domain::entities::{FieldUpdate, RecordHandle, Resource};
use crate::domain::resources::ResourceClient;
use crate::error::AppError;
use crate::utils::resource_path;

const META_DIR: &str = ".linkfix";
const SCHEMA_FILE: &str = "_schema.json";
const RECYCLE_DIR: &str = ".recycle";

/// Columns every library has regardless of schema.
const BUILTIN_FIELDS: &[&str] = &["Title", "FileLeafRef"];

#[derive(Debug, Default, Serialize, Deserialize)]
struct ItemMeta {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

/// Resource client rooted at a local directory.
pub struct LocalFsClient {
    root: PathBuf,
    next_id: AtomicU64,
}

impl LocalFsClient {
    /// Connects to the library at `endpoint`: a directory path or `file://` URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not a usable file URL.
    /// Returns [`AppError::NotFound`] if the directory does not exist.
    pub async fn connect(endpoint: &str) -> Result<Self, AppError> {
        let root = if endpoint.starts_with("file:") {
            let url = Url::parse(endpoint).map_err(|e| {
                AppError::bad_request(
                    "Invalid endpoint URL",
                    json!({ "endpoint": endpoint, "reason": e.to_string() }),
                )
            })?;
            url.to_file_path().map_err(|_| {
                AppError::bad_request(
                    "Endpoint URL does not name a local directory",
                    json!({ "endpoint": endpoint }),
                )
            })?
        } else {
            PathBuf::from(endpoint)
        };

        match fs::metadata(&root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(AppError::bad_request(
                    "Endpoint is not a directory",
                    json!({ "endpoint": endpoint }),
                ));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::not_found(
                    "Endpoint directory not found",
                    json!({ "endpoint": endpoint }),
                ));
            }
            Err(e) => return Err(AppError::io("Failed to open endpoint", e)),
        }

        tracing::info!("Connected to local library at {}", root.display());

        let seed = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(1);
        Ok(Self {
            root,
            next_id: AtomicU64::new(seed),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current field values of the item at `path`.
    pub async fn fields(&self, path: &str) -> Result<BTreeMap<String, String>, AppError> {
        let local = self.local_path(path)?;
        Ok(read_meta(&local).await?.fields)
    }

    pub async fn is_hidden(&self, path: &str) -> Result<bool, AppError> {
        let local = self.local_path(path)?;
        Ok(read_meta(&local).await?.hidden)
    }

    fn local_path(&self, path: &str) -> Result<PathBuf, AppError> {
        let normalized = resource_path::normalize(path);
        let mut local = self.root.clone();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." || segment.contains('\\') {
                return Err(AppError::bad_request(
                    "Path escapes the library root",
                    json!({ "path": path }),
                ));
            }
            local.push(segment);
        }
        Ok(local)
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn meta_path(local: &Path) -> PathBuf {
    let leaf = local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = local.parent().unwrap_or(local);
    dir.join(META_DIR).join(format!("{leaf}.json"))
}

async fn read_meta(local: &Path) -> Result<ItemMeta, AppError> {
    match fs::read(meta_path(local)).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
            AppError::internal(
                "Corrupt item metadata",
                json!({ "path": local.display().to_string(), "reason": e.to_string() }),
            )
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(ItemMeta::default()),
        Err(e) => Err(AppError::io("Failed to read item metadata", e)),
    }
}

async fn write_meta(local: &Path, meta: &ItemMeta) -> Result<(), AppError> {
    let path = meta_path(local);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::io("Failed to create metadata directory", e))?;
    }
    let bytes = serde_json::to_vec_pretty(meta).map_err(|e| {
        AppError::internal("Failed to encode metadata", json!({ "reason": e.to_string() }))
    })?;
    fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::io("Failed to write item metadata", e))
}

async fn remove_meta(local: &Path) -> Result<(), AppError> {
    match fs::remove_file(meta_path(local)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::io("Failed to remove item metadata", e)),
    }
}

async fn stat(local: &Path) -> Result<Option<std::fs::Metadata>, AppError> {
    match fs::metadata(local).await {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::io("Failed to stat resource", e)),
    }
}

#[async_trait]
impl ResourceClient for LocalFsClient {
    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        let local = self.local_path(path)?;
        Ok(stat(&local).await?.is_some())
    }

    async fn get_resource(&self, path: &str) -> Result<Option<Resource>, AppError> {
        let local = self.local_path(path)?;
        let normalized = resource_path::normalize(path);
        Ok(stat(&local).await?.map(|meta| Resource {
            name: resource_path::leaf_name(&normalized).to_string(),
            path: normalized.clone(),
            is_folder: meta.is_dir(),
        }))
    }

    async fn duplicate(
        &self,
        source: &str,
        target: &str,
        overwrite: bool,
    ) -> Result<(), AppError> {
        let source_local = self.local_path(source)?;
        let target_local = self.local_path(target)?;

        match stat(&source_local).await? {
            Some(meta) if meta.is_file() => {}
            Some(_) => {
                return Err(AppError::bad_request(
                    "Cannot duplicate a folder",
                    json!({ "source": source }),
                ));
            }
            None => {
                return Err(AppError::not_found(
                    "Source resource not found",
                    json!({ "source": source }),
                ));
            }
        }

        let parent_is_dir = match target_local.parent() {
            Some(dir) => stat(dir).await?.is_some_and(|m| m.is_dir()),
            None => false,
        };
        if !parent_is_dir {
            return Err(AppError::not_found(
                "Target folder not found",
                json!({ "target": target }),
            ));
        }

        if !overwrite && stat(&target_local).await?.is_some() {
            return Err(AppError::conflict(
                "Resource already exists",
                json!({ "target": target }),
            ));
        }

        fs::copy(&source_local, &target_local)
            .await
            .map_err(|e| AppError::io("Failed to copy resource", e))?;

        let source_meta = read_meta(&source_local).await?;
        let meta = ItemMeta {
            id: self.allocate_id(),
            hidden: false,
            fields: source_meta.fields,
        };
        write_meta(&target_local, &meta).await
    }

    async fn delete(&self, path: &str, recycle: bool) -> Result<(), AppError> {
        let local = self.local_path(path)?;
        let Some(meta) = stat(&local).await? else {
            return Err(AppError::not_found(
                "Resource not found",
                json!({ "path": path }),
            ));
        };

        if recycle {
            let bin = self.root.join(RECYCLE_DIR);
            fs::create_dir_all(&bin)
                .await
                .map_err(|e| AppError::io("Failed to create recycle bin", e))?;

            let leaf = local
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
            fs::rename(&local, bin.join(format!("{stamp}_{leaf}")))
                .await
                .map_err(|e| AppError::io("Failed to recycle resource", e))?;
        } else if meta.is_dir() {
            fs::remove_dir_all(&local)
                .await
                .map_err(|e| AppError::io("Failed to delete folder", e))?;
        } else {
            fs::remove_file(&local)
                .await
                .map_err(|e| AppError::io("Failed to delete file", e))?;
        }

        remove_meta(&local).await
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<(), AppError> {
        let parent_local = self.local_path(parent)?;
        let local = self.local_path(&resource_path::join(parent, name))?;

        if !stat(&parent_local).await?.is_some_and(|m| m.is_dir()) {
            return Err(AppError::not_found(
                "Parent folder not found",
                json!({ "parent": parent }),
            ));
        }

        match stat(&local).await? {
            Some(meta) if meta.is_dir() => Ok(()),
            Some(_) => Err(AppError::conflict(
                "A file occupies the folder path",
                json!({ "path": resource_path::join(parent, name) }),
            )),
            None => fs::create_dir(&local)
                .await
                .map_err(|e| AppError::io("Failed to create folder", e)),
        }
    }

    async fn get_record(&self, path: &str) -> Result<RecordHandle, AppError> {
        let local = self.local_path(path)?;
        if !stat(&local).await?.is_some_and(|m| m.is_file()) {
            return Err(AppError::not_found(
                "No list item behind path",
                json!({ "path": path }),
            ));
        }

        let mut meta = read_meta(&local).await?;
        if meta.id == 0 {
            meta.id = self.allocate_id();
            write_meta(&local, &meta).await?;
        }

        Ok(RecordHandle {
            path: resource_path::normalize(path),
            id: meta.id,
        })
    }

    async fn set_fields(
        &self,
        record: &RecordHandle,
        fields: &[FieldUpdate],
    ) -> Result<(), AppError> {
        let local = self.local_path(&record.path)?;
        if !stat(&local).await?.is_some_and(|m| m.is_file()) {
            return Err(AppError::not_found(
                "List item no longer exists",
                json!({ "path": record.path }),
            ));
        }

        let container = resource_path::parent(&record.path);
        for field in fields {
            if !self.has_field(container, &field.name).await? {
                return Err(AppError::bad_request(
                    "Unknown field",
                    json!({ "field": field.name, "container": container }),
                ));
            }
        }

        let mut meta = read_meta(&local).await?;
        if meta.id != record.id {
            return Err(AppError::not_found(
                "List item no longer exists",
                json!({ "path": record.path, "id": record.id }),
            ));
        }

        for field in fields {
            meta.fields.insert(field.name.clone(), field.value.clone());
        }
        write_meta(&local, &meta).await
    }

    async fn set_hidden(&self, path: &str) -> Result<(), AppError> {
        let local = self.local_path(path)?;
        if stat(&local).await?.is_none() {
            return Err(AppError::not_found(
                "Resource not found",
                json!({ "path": path }),
            ));
        }

        let mut meta = read_meta(&local).await?;
        meta.hidden = true;
        write_meta(&local, &meta).await
    }

    async fn has_field(&self, container: &str, field: &str) -> Result<bool, AppError> {
        if BUILTIN_FIELDS.contains(&field) {
            return Ok(true);
        }

        let schema_path = self.local_path(container)?.join(META_DIR).join(SCHEMA_FILE);
        match fs::read(&schema_path).await {
            Ok(bytes) => {
                let columns: Vec<String> = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::internal(
                        "Corrupt schema file",
                        json!({ "container": container, "reason": e.to_string() }),
                    )
                })?;
                Ok(columns.iter().any(|c| c == field))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(AppError::io("Failed to read schema", e)),
        }
    }
}
