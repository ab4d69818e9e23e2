use std::path::Path;

/// Strips the directories from a source path as reported by
/// [`core::panic::Location::file`].
pub(crate) fn file_basename(path: &'static str) -> &'static str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
