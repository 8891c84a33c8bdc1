//! Materialized folder path rules.
//!
//! A root-level folder's path is its name; a child's path is the parent's
//! path, `/`, and the child's name. Paths never start or end with `/`.

use filedock_core::AppError;

/// Segment separator.
pub const SEPARATOR: char = '/';

/// Longest accepted folder name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Trim and check a folder name, returning the trimmed form.
pub fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name is required"));
    }
    if name.contains(SEPARATOR) {
        return Err(AppError::validation("Folder name must not contain '/'"));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation("Folder name must not be '.' or '..'"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

/// Path of a folder named `name` under a parent with path `parent`.
pub fn child_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}{SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

/// Replace only the final segment of `path` with `new_name`.
pub fn rename_last_segment(path: &str, new_name: &str) -> String {
    match path.rsplit_once(SEPARATOR) {
        Some((parent, _)) => child_path(Some(parent), new_name),
        None => new_name.to_string(),
    }
}

/// Whether `candidate` lies strictly below `ancestor`.
pub fn is_descendant(candidate: &str, ancestor: &str) -> bool {
    candidate
        .strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

/// Rewrite `path` after the folder at `old_root` moved to `new_root`.
///
/// Returns `None` for paths outside the subtree.
pub fn rebase(path: &str, old_root: &str, new_root: &str) -> Option<String> {
    if path == old_root {
        return Some(new_root.to_string());
    }
    is_descendant(path, old_root).then(|| format!("{new_root}{}", &path[old_root.len()..]))
}
