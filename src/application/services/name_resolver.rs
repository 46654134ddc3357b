//! Collision-free leaf names inside a container.

use std::sync::Arc;

use crate::domain::resources::ResourceClient;
use crate::error::AppError;
use crate::utils::resource_path;
use serde_json::json;

/// Highest numeric suffix tried before giving up on a base name.
pub const MAX_SUFFIX: u32 = 1000;

/// Picks the first free leaf name among `base.ext`, `base-1.ext`, `base-2.ext`, ...
///
/// Every candidate is probed against the container at call time, so names
/// claimed earlier in the same run are seen as taken.
///
/// # Concurrency
///
/// This is check-then-act: two runs against the same container can both pick
/// the same name. Only one materialization pass may target a container at a
/// time; the later duplicate then fails with a conflict rather than
/// overwriting.
pub struct NameResolver<C: ResourceClient + ?Sized> {
    client: Arc<C>,
}

impl<C: ResourceClient + ?Sized> NameResolver<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Returns a leaf name with no existing resource at `container/leaf`.
    ///
    /// `extension` includes its dot (`.aspx`) or is empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] once [`MAX_SUFFIX`] suffixes are all taken,
    /// or any error raised by the existence probe.
    pub async fn resolve(
        &self,
        container: &str,
        base_name: &str,
        extension: &str,
    ) -> Result<String, AppError> {
        for suffix in 0..=MAX_SUFFIX {
            let candidate = if suffix == 0 {
                format!("{}{}", base_name, extension)
            } else {
                format!("{}-{}{}", base_name, suffix, extension)
            };

            let path = resource_path::join(container, &candidate);
            if !self.client.exists(&path).await? {
                return Ok(candidate);
            }
            tracing::debug!(candidate = %candidate, "Name taken, trying next suffix");
        }

        Err(AppError::conflict(
            "Failed to find a free name",
            json!({
                "container": container,
                "base_name": base_name,
                "max_suffix": MAX_SUFFIX,
            }),
        ))
    }
}
