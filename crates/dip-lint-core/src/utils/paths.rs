//! Path utilities for source files and `syn` paths.

use std::path::{Component, Path};

/// Converts a syn Path to a string representation.
///
/// # Example
///
/// ```ignore
/// // For path `service::NewService`
/// let s = path_to_string(&path);
/// assert_eq!(s, "service::NewService");
/// ```
#[must_use]
pub fn path_to_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Renders a file path with `/` separators, dropping `.` components.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::RootDir => Some(String::new()),
            Component::ParentDir => Some("..".to_string()),
            Component::Prefix(p) => Some(p.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
