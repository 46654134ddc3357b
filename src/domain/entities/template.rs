//! Handle to the single known-good template item.

/// Location of the template that every new link item is duplicated from.
///
/// Built once per run by
/// [`TemplateService::locate_and_relocate`](crate::application::services::TemplateService::locate_and_relocate)
/// after any relocation has already happened, then passed by reference to the
/// materializer. There are no setters: the location is fixed for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateHandle {
    current_location_path: String,
    resolved: bool,
}

impl TemplateHandle {
    /// Creates a resolved handle pointing at `path`.
    pub fn resolved(path: impl Into<String>) -> Self {
        Self {
            current_location_path: path.into(),
            resolved: true,
        }
    }

    pub fn path(&self) -> &str {
        &self.current_location_path
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// File extension of the template leaf, including the dot (e.g. `.aspx`).
    ///
    /// New items reuse it so they stay the same file type as the template.
    pub fn extension(&self) -> &str {
        let leaf = crate::utils::resource_path::leaf_name(&self.current_location_path);
        match leaf.rfind('.') {
            Some(idx) if idx > 0 => &leaf[idx..],
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        let handle = TemplateHandle::resolved("/Shared Documents/_template/test.aspx");
        assert!(handle.is_resolved());
        assert_eq!(handle.extension(), ".aspx");
    }

    #[test]
    fn test_extension_missing() {
        let handle = TemplateHandle::resolved("/Shared Documents/_template/template");
        assert_eq!(handle.extension(), "");

        let dotfile = TemplateHandle::resolved("/lib/.hidden");
        assert_eq!(dotfile.extension(), "");
    }
}
