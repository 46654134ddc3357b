//! Outcome of materializing one record.

use super::LinkRecord;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Created,
    Failed,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal result for a single [`LinkRecord`].
///
/// `generated_name` and `target_path` are empty when the record failed before
/// a name could be resolved.
#[derive(Debug, Clone)]
pub struct MaterializedLink {
    pub record: LinkRecord,
    pub generated_name: String,
    pub target_path: String,
    pub status: LinkStatus,
    pub failure_detail: Option<String>,
}

impl MaterializedLink {
    pub fn created(record: LinkRecord, generated_name: String, target_path: String) -> Self {
        Self {
            record,
            generated_name,
            target_path,
            status: LinkStatus::Created,
            failure_detail: None,
        }
    }

    pub fn failed(
        record: LinkRecord,
        generated_name: String,
        target_path: String,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            record,
            generated_name,
            target_path,
            status: LinkStatus::Failed,
            failure_detail: Some(detail.into()),
        }
    }

    pub fn is_created(&self) -> bool {
        self.status == LinkStatus::Created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_link_keeps_detail() {
        let record = LinkRecord::new("Report", "https://example.com", None).unwrap();
        let link = MaterializedLink::failed(record, String::new(), String::new(), "boom");

        assert!(!link.is_created());
        assert_eq!(link.status.to_string(), "failed");
        assert_eq!(link.failure_detail.as_deref(), Some("boom"));
    }
}
