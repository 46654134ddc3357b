//! A single validated row of the input record set.

use crate::error::AppError;
use serde_json::json;

/// One link to recreate.
///
/// Constructed only through [`LinkRecord::new`], which trims every field and
/// rejects empty titles or URLs. Fields are private so a record stays exactly
/// as imported while it is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    title: String,
    target_url: String,
    display_text: String,
}

impl LinkRecord {
    /// Builds a record from raw row values.
    ///
    /// `display_text` falls back to the trimmed title when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the title or URL is empty after trimming.
    pub fn new(
        title: &str,
        target_url: &str,
        display_text: Option<&str>,
    ) -> Result<Self, AppError> {
        let title = title.trim();
        let target_url = target_url.trim();

        if title.is_empty() {
            return Err(AppError::bad_request(
                "Title is empty",
                json!({ "url": target_url }),
            ));
        }
        if target_url.is_empty() {
            return Err(AppError::bad_request(
                "URL is empty",
                json!({ "title": title }),
            ));
        }

        let display_text = display_text
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(title);

        Ok(Self {
            title: title.to_string(),
            target_url: target_url.to_string(),
            display_text: display_text.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }
}
