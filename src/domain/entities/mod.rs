//! Core domain entities for the link recreation pipeline.
//!
//! # Entity Types
//!
//! - [`LinkRecord`] - A validated input row
//! - [`TemplateHandle`] - The single template every link is duplicated from
//! - [`MaterializedLink`] - Terminal per-record outcome
//! - [`LinkFields`] - Typed metadata rewrite applied to each new item
//! - [`Resource`] / [`RecordHandle`] - Remote items as seen through the client

pub mod link_fields;
pub mod link_record;
pub mod materialized_link;
pub mod resource;
pub mod template;

pub use link_fields::{FieldNames, FieldUpdate, LinkFields, link_target_value};
pub use link_record::LinkRecord;
pub use materialized_link::{LinkStatus, MaterializedLink};
pub use resource::{RecordHandle, Resource};
pub use template::TemplateHandle;
