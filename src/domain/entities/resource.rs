//! Remote resources as reported by a [`ResourceClient`](crate::domain::resources::ResourceClient).

/// A file or folder at a server-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub path: String,
    pub name: String,
    pub is_folder: bool,
}

/// Opaque handle to the list item backing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    pub path: String,
    pub id: u64,
}
