//! Pure helper functions used across the pipeline.
//!
//! - [`name_sanitizer`] - Title to leaf-name sanitization
//! - [`resource_path`] - Server-relative path manipulation
//! - [`url_check`] - Target URL classification for import warnings

pub mod name_sanitizer;
pub mod resource_path;
pub mod url_check;
