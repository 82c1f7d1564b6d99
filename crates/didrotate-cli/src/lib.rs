pub mod config;

use std::path::Path;

/// Creates the parent directory of an output file if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Appends a status mark to `str`, with `details` in brackets on failure.
pub fn status_str(mut str: String, is_ok: bool, details: Option<&str>) -> String {
    if is_ok {
        str.push('✅');
        return str;
    }
    str.push('❌');
    if let Some(detail) = details {
        str.push_str(" [");
        str.push_str(detail);
        str.push(']');
    }
    str
}
