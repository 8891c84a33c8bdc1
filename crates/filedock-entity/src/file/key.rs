//! Storage key generation.

use uuid::Uuid;

/// Longest sanitized name kept in a storage key.
pub const MAX_NAME_LEN: usize = 200;

/// Longest extension preserved when a name has to be truncated.
const MAX_EXTENSION_LEN: usize = 16;

/// Reduce a user-supplied file name to a safe object-store name.
///
/// Any directory prefix is dropped. ASCII alphanumerics, `.`, `-` and `_`
/// are kept; every run of other characters becomes a single `_`. Leading
/// dots are stripped. Long names are cut to [`MAX_NAME_LEN`] keeping the
/// extension. An empty result falls back to `file`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut out = String::with_capacity(base.len());
    let mut replaced = false;
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            out.push(c);
            replaced = false;
        } else if !replaced {
            out.push('_');
            replaced = true;
        }
    }

    let out = out.trim_start_matches('.');
    if out.is_empty() || out.chars().all(|c| c == '_') {
        return "file".to_string();
    }

    truncate_keeping_extension(out)
}

fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= MAX_NAME_LEN {
        return name.to_string();
    }
    // Sanitized names are ASCII, so byte offsets are char boundaries.
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < MAX_EXTENSION_LEN => {
            let keep = MAX_NAME_LEN - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..MAX_NAME_LEN].to_string(),
    }
}

/// Generate a fresh storage key for an uploaded file.
pub fn storage_key(original_name: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name))
}
