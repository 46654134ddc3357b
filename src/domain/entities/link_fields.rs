//! Typed metadata written onto a freshly duplicated link item.

use super::LinkRecord;
use crate::error::AppError;
use serde_json::json;

/// Internal column names the metadata rewrite targets.
///
/// Defaults match a stock document library with a "Link to a Document"
/// content type plus a custom `OriginalUrl` text column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub title: String,
    pub leaf_name: String,
    pub link_target: String,
    pub source_url: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            leaf_name: "FileLeafRef".to_string(),
            link_target: "URL".to_string(),
            source_url: "OriginalUrl".to_string(),
        }
    }
}

impl FieldNames {
    /// Fields that must exist in the target container's schema.
    ///
    /// `Title` and `FileLeafRef` are built into every library and are not checked.
    pub fn required_custom(&self) -> [&str; 2] {
        [self.link_target.as_str(), self.source_url.as_str()]
    }
}

/// A single field assignment handed to the resource client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub name: String,
    pub value: String,
}

/// The four values rewritten on every new link item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFields {
    pub title: String,
    pub leaf_name: String,
    pub link_target: String,
    pub source_url: String,
}

impl LinkFields {
    /// Builds the metadata for `record` stored under `leaf_name`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any value would be empty.
    pub fn for_record(record: &LinkRecord, leaf_name: &str) -> Result<Self, AppError> {
        let fields = Self {
            title: record.title().to_string(),
            leaf_name: leaf_name.to_string(),
            link_target: link_target_value(record.target_url(), record.display_text()),
            source_url: record.target_url().to_string(),
        };
        fields.validate()?;
        Ok(fields)
    }

    fn validate(&self) -> Result<(), AppError> {
        let empty: Vec<&str> = [
            ("title", &self.title),
            ("leaf_name", &self.leaf_name),
            ("link_target", &self.link_target),
            ("source_url", &self.source_url),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();

        if !empty.is_empty() {
            return Err(AppError::bad_request(
                "Link metadata has empty fields",
                json!({ "fields": empty }),
            ));
        }
        Ok(())
    }

    /// Lowers the typed fields to the name/value pairs the client writes.
    pub fn to_updates(&self, names: &FieldNames) -> Vec<FieldUpdate> {
        vec![
            FieldUpdate {
                name: names.title.clone(),
                value: self.title.clone(),
            },
            FieldUpdate {
                name: names.leaf_name.clone(),
                value: self.leaf_name.clone(),
            },
            FieldUpdate {
                name: names.link_target.clone(),
                value: self.link_target.clone(),
            },
            FieldUpdate {
                name: names.source_url.clone(),
                value: self.source_url.clone(),
            },
        ]
    }
}

/// Encodes a URL field value the way SharePoint stores hyperlink columns:
/// `"<url>, <description>"`.
pub fn link_target_value(url: &str, display_text: &str) -> String {
    format!("{}, {}", url, display_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_target_format() {
        assert_eq!(
            link_target_value("https://example.com/doc", "My Report"),
            "https://example.com/doc, My Report"
        );
    }

    #[test]
    fn test_for_record() {
        let record = LinkRecord::new("My Report", "https://example.com/doc", Some("")).unwrap();
        let fields = LinkFields::for_record(&record, "My Report.aspx").unwrap();

        assert_eq!(fields.title, "My Report");
        assert_eq!(fields.leaf_name, "My Report.aspx");
        assert_eq!(fields.link_target, "https://example.com/doc, My Report");
        assert_eq!(fields.source_url, "https://example.com/doc");
    }

    #[test]
    fn test_empty_leaf_rejected() {
        let record = LinkRecord::new("My Report", "https://example.com/doc", None).unwrap();
        let result = LinkFields::for_record(&record, " ");
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_to_updates_uses_configured_names() {
        let record = LinkRecord::new("A", "https://a.example", Some("Alpha")).unwrap();
        let fields = LinkFields::for_record(&record, "A.aspx").unwrap();
        let names = FieldNames {
            link_target: "_LinkTarget".to_string(),
            ..FieldNames::default()
        };

        let updates = fields.to_updates(&names);

        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0].name, "Title");
        assert_eq!(updates[1].name, "FileLeafRef");
        assert_eq!(updates[2].name, "_LinkTarget");
        assert_eq!(updates[2].value, "https://a.example, Alpha");
        assert_eq!(updates[3].name, "OriginalUrl");
        assert_eq!(updates[3].value, "https://a.example");
    }

    #[test]
    fn test_required_custom_fields() {
        let names = FieldNames::default();
        assert_eq!(names.required_custom(), ["URL", "OriginalUrl"]);
    }
}
