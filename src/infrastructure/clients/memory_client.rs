//! In-process resource client.
//!
//! Keeps a small tree of folders and files in memory. Used by integration
//! tests and rehearsal runs; supports injected faults so partial-failure
//! behavior can be exercised without a remote service.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::domain::entities::{FieldUpdate, RecordHandle, Resource};
use crate::domain::resources::ResourceClient;
use crate::error::AppError;
use crate::utils::resource_path::{self, leaf_name, parent};

/// Columns every library has regardless of schema.
const BUILTIN_FIELDS: &[&str] = &["Title", "FileLeafRef"];

#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    is_folder: bool,
    hidden: bool,
    fields: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, Entry>,
    next_id: u64,
    schema: Option<BTreeSet<String>>,
    duplicate_faults: HashSet<String>,
    hidden_fault: bool,
    recycled: Vec<String>,
    duplicates: usize,
}

impl State {
    fn insert(&mut self, path: String, is_folder: bool) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.insert(
            path,
            Entry {
                id,
                is_folder,
                hidden: false,
                fields: BTreeMap::new(),
            },
        );
        id
    }

    fn ensure_folders(&mut self, path: &str) {
        if path == "/" || self.entries.contains_key(path) {
            return;
        }
        let parent_path = parent(path).to_string();
        self.ensure_folders(&parent_path);
        self.insert(path.to_string(), true);
    }

    fn is_folder(&self, path: &str) -> bool {
        path == "/" || self.entries.get(path).is_some_and(|e| e.is_folder)
    }
}

/// Resource client backed by an in-memory tree.
pub struct MemoryClient {
    state: Mutex<State>,
}

impl MemoryClient {
    /// Creates an empty tree with an open schema (every field exists).
    pub fn new() -> Self {
        debug!("Using MemoryClient");
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Adds a folder, creating missing ancestors.
    pub fn add_folder(&self, path: &str) {
        let path = resource_path::normalize(path);
        self.state().ensure_folders(&path);
    }

    /// Adds a file, creating missing ancestor folders.
    pub fn add_file(&self, path: &str) {
        let path = resource_path::normalize(path);
        let mut state = self.state();
        state.ensure_folders(parent(&path));
        state.insert(path, false);
    }

    /// Restricts the library schema to builtin columns plus `fields`.
    pub fn set_schema(&self, fields: &[&str]) {
        self.state().schema = Some(fields.iter().map(|f| f.to_string()).collect());
    }

    /// Makes every duplication onto `target` fail with an internal error.
    pub fn fail_duplicate_to(&self, target: &str) {
        let target = resource_path::normalize(target);
        self.state().duplicate_faults.insert(target);
    }

    /// Makes `set_hidden` fail.
    pub fn fail_set_hidden(&self) {
        self.state().hidden_fault = true;
    }

    pub fn contains(&self, path: &str) -> bool {
        let path = resource_path::normalize(path);
        self.state().entries.contains_key(&path)
    }

    /// Field values written to the file at `path`.
    pub fn fields(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let path = resource_path::normalize(path);
        self.state().entries.get(&path).map(|e| e.fields.clone())
    }

    pub fn is_hidden(&self, path: &str) -> bool {
        let path = resource_path::normalize(path);
        self.state().entries.get(&path).is_some_and(|e| e.hidden)
    }

    /// Leaf names directly inside `container`, sorted.
    pub fn children(&self, container: &str) -> Vec<String> {
        let container = resource_path::normalize(container);
        self.state()
            .entries
            .keys()
            .filter(|p| parent(p) == container)
            .map(|p| leaf_name(p).to_string())
            .collect()
    }

    /// Paths deleted with `recycle = true`, in order.
    pub fn recycled(&self) -> Vec<String> {
        self.state().recycled.clone()
    }

    /// Number of successful duplications.
    pub fn duplicate_count(&self) -> usize {
        self.state().duplicates
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceClient for MemoryClient {
    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        let path = resource_path::normalize(path);
        let state = self.state();
        Ok(path == "/" || state.entries.contains_key(&path))
    }

    async fn get_resource(&self, path: &str) -> Result<Option<Resource>, AppError> {
        let path = resource_path::normalize(path);
        let state = self.state();
        Ok(state.entries.get(&path).map(|e| Resource {
            name: leaf_name(&path).to_string(),
            path: path.clone(),
            is_folder: e.is_folder,
        }))
    }

    async fn duplicate(
        &self,
        source: &str,
        target: &str,
        overwrite: bool,
    ) -> Result<(), AppError> {
        let source = resource_path::normalize(source);
        let target = resource_path::normalize(target);
        let mut state = self.state();

        if state.duplicate_faults.contains(&target) {
            return Err(AppError::internal(
                "Simulated remote fault",
                json!({ "operation": "duplicate", "target": target }),
            ));
        }

        let template = match state.entries.get(&source) {
            Some(entry) if !entry.is_folder => entry.clone(),
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
        };

        if !state.is_folder(parent(&target)) {
            return Err(AppError::not_found(
                "Target folder not found",
                json!({ "target": target }),
            ));
        }

        if state.entries.contains_key(&target) && !overwrite {
            return Err(AppError::conflict(
                "Resource already exists",
                json!({ "target": target }),
            ));
        }

        state.insert(target.clone(), false);
        if let Some(entry) = state.entries.get_mut(&target) {
            entry.fields = template.fields;
        }
        state.duplicates += 1;
        Ok(())
    }

    async fn delete(&self, path: &str, recycle: bool) -> Result<(), AppError> {
        let path = resource_path::normalize(path);
        let mut state = self.state();

        if state.entries.remove(&path).is_none() {
            return Err(AppError::not_found(
                "Resource not found",
                json!({ "path": path }),
            ));
        }

        let prefix = format!("{}/", path);
        state.entries.retain(|p, _| !p.starts_with(&prefix));

        if recycle {
            state.recycled.push(path);
        }
        Ok(())
    }

    async fn create_folder(&self, parent_path: &str, name: &str) -> Result<(), AppError> {
        let parent_path = resource_path::normalize(parent_path);
        let path = resource_path::join(&parent_path, name);
        let mut state = self.state();

        if !state.is_folder(&parent_path) {
            return Err(AppError::not_found(
                "Parent folder not found",
                json!({ "parent": parent_path }),
            ));
        }

        match state.entries.get(&path) {
            Some(entry) if entry.is_folder => Ok(()),
            Some(_) => Err(AppError::conflict(
                "A file occupies the folder path",
                json!({ "path": path }),
            )),
            None => {
                state.insert(path, true);
                Ok(())
            }
        }
    }

    async fn get_record(&self, path: &str) -> Result<RecordHandle, AppError> {
        let path = resource_path::normalize(path);
        let state = self.state();

        match state.entries.get(&path) {
            Some(entry) if !entry.is_folder => Ok(RecordHandle { id: entry.id, path }),
            _ => Err(AppError::not_found(
                "No list item behind path",
                json!({ "path": path }),
            )),
        }
    }

    async fn set_fields(
        &self,
        record: &RecordHandle,
        fields: &[FieldUpdate],
    ) -> Result<(), AppError> {
        let mut state = self.state();

        if let Some(schema) = &state.schema {
            let unknown: Vec<&str> = fields
                .iter()
                .map(|f| f.name.as_str())
                .filter(|name| !BUILTIN_FIELDS.contains(name) && !schema.contains(*name))
                .collect();
            if !unknown.is_empty() {
                return Err(AppError::bad_request(
                    "Unknown fields",
                    json!({ "fields": unknown }),
                ));
            }
        }

        let entry = state
            .entries
            .get_mut(&record.path)
            .filter(|e| e.id == record.id)
            .ok_or_else(|| {
                AppError::not_found(
                    "List item no longer exists",
                    json!({ "path": record.path, "id": record.id }),
                )
            })?;

        for field in fields {
            entry.fields.insert(field.name.clone(), field.value.clone());
        }
        Ok(())
    }

    async fn set_hidden(&self, path: &str) -> Result<(), AppError> {
        let path = resource_path::normalize(path);
        let mut state = self.state();

        if state.hidden_fault {
            return Err(AppError::internal(
                "Hidden attribute not supported",
                json!({ "path": path }),
            ));
        }

        let entry = state.entries.get_mut(&path).ok_or_else(|| {
            AppError::not_found("Resource not found", json!({ "path": path }))
        })?;
        entry.hidden = true;
        Ok(())
    }

    async fn has_field(&self, _container: &str, field: &str) -> Result<bool, AppError> {
        let state = self.state();
        Ok(BUILTIN_FIELDS.contains(&field)
            || state.schema.as_ref().is_none_or(|s| s.contains(field)))
    }
}
