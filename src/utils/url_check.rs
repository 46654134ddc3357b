//! Target URL classification.
//!
//! Link items accept both absolute web URLs and site-relative paths, so a URL
//! that fails these checks is only worth a warning, never a rejection.

use url::Url;

/// Reasons a target URL is not an absolute web URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlCheckError {
    #[error("Not an absolute URL: {0}")]
    NotAbsolute(String),

    #[error("Unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Verifies that `input` is an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns [`UrlCheckError::NotAbsolute`] for relative paths or unparsable input.
/// Returns [`UrlCheckError::UnsupportedScheme`] for `file:`, `javascript:`, etc.
/// Returns [`UrlCheckError::MissingHost`] when no host is present.
pub fn check_target_url(input: &str) -> Result<(), UrlCheckError> {
    let url = Url::parse(input).map_err(|e| UrlCheckError::NotAbsolute(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlCheckError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlCheckError::MissingHost);
    }

    Ok(())
}
