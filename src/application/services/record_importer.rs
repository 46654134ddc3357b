//! Parsing the input record set into validated link records.

use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::domain::entities::LinkRecord;
use crate::error::AppError;
use crate::utils::url_check::check_target_url;
use serde_json::json;

pub const TITLE_COLUMN: &str = "Title";
pub const URL_COLUMN: &str = "URL";
pub const DESCRIPTION_COLUMN: &str = "Description";

/// A data row that was excluded from the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub records: Vec<LinkRecord>,
    pub rejected: Vec<RowRejection>,
}

impl ImportOutcome {
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Reads the record set at `path`.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the file does not exist, plus every error
/// of [`import_records`].
pub async fn import_file(path: &Path) -> Result<ImportOutcome, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AppError::not_found(
                "Input record set not found",
                json!({ "path": path.display().to_string() }),
            )
        } else {
            AppError::io(format!("Failed to read {}", path.display()), e)
        }
    })?;

    import_records(bytes.as_slice())
}

/// Parses comma-delimited text with a header row.
///
/// `Title` and `URL` columns are required and matched case-sensitively;
/// `Description` is optional. Fields are trimmed. Rows with an empty title or
/// URL, or rows that cannot be decoded, are rejected and reported in
/// [`ImportOutcome::rejected`] without stopping the import.
///
/// A missing `Title` or `URL` header fails the whole import instead of
/// rejecting every row one by one, since no row could be accepted.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if a required column is missing or the
/// input has no data rows.
pub fn import_records<R: Read>(reader: R) -> Result<ImportOutcome, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let (Some(title_idx), Some(url_idx)) = (column(TITLE_COLUMN), column(URL_COLUMN)) else {
        return Err(AppError::bad_request(
            "Input record set is missing required columns",
            json!({ "required": [TITLE_COLUMN, URL_COLUMN], "found": headers }),
        ));
    };
    let description_idx = column(DESCRIPTION_COLUMN);

    let mut outcome = ImportOutcome::default();

    for (idx, row) in csv_reader.records().enumerate() {
        let row_number = idx + 1;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                reject(&mut outcome, row_number, format!("Unreadable row: {}", e));
                continue;
            }
        };

        let title = row.get(title_idx).unwrap_or_default();
        let url = row.get(url_idx).unwrap_or_default();
        let description = description_idx.and_then(|i| row.get(i));

        match LinkRecord::new(title, url, description) {
            Ok(record) => {
                if let Err(e) = check_target_url(record.target_url()) {
                    tracing::warn!(
                        row = row_number,
                        url = record.target_url(),
                        "Target is not an absolute web URL, keeping it as-is: {}",
                        e
                    );
                }
                outcome.records.push(record);
            }
            Err(e) => reject(&mut outcome, row_number, e.to_string()),
        }
    }

    if outcome.total_rows() == 0 {
        return Err(AppError::bad_request(
            "Input record set contains no rows",
            json!({}),
        ));
    }

    tracing::info!(
        "Imported {} records ({} rejected)",
        outcome.records.len(),
        outcome.rejected.len()
    );

    Ok(outcome)
}

fn reject(outcome: &mut ImportOutcome, row: usize, reason: String) {
    tracing::warn!(row, "Rejected row: {}", reason);
    outcome.rejected.push(RowRejection { row, reason });
}
