//! Helpers for server-relative resource paths.
//!
//! Paths are `/`-separated and start with `/`. Trailing slashes are ignored.

/// Joins a container path and a leaf name.
///
/// ```ignore
/// assert_eq!(join("/Shared Documents/", "a.aspx"), "/Shared Documents/a.aspx");
/// ```
pub fn join(container: &str, leaf: &str) -> String {
    let container = container.trim_end_matches('/');
    let leaf = leaf.trim_start_matches('/');
    format!("{}/{}", container, leaf)
}

/// Last path segment.
pub fn leaf_name(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Everything before the last segment, or `/` for top-level entries.
pub fn parent(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Strips trailing slashes and guarantees a leading one.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("/lib", "a.aspx"), "/lib/a.aspx");
        assert_eq!(join("/lib/", "a.aspx"), "/lib/a.aspx");
        assert_eq!(join("/lib", "/a.aspx"), "/lib/a.aspx");
    }

    #[test]
    fn test_leaf_name() {
        assert_eq!(leaf_name("/lib/_template/t.aspx"), "t.aspx");
        assert_eq!(leaf_name("/lib/"), "lib");
        assert_eq!(leaf_name("plain"), "plain");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/lib/_template/t.aspx"), "/lib/_template");
        assert_eq!(parent("/lib"), "/");
        assert_eq!(parent("/lib/"), "/");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Shared Documents/"), "/Shared Documents");
        assert_eq!(normalize("/Shared Documents"), "/Shared Documents");
        assert_eq!(normalize("/"), "/");
    }
}
