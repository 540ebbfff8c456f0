//! Line ending normalization and atomic persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{GenerateError, Result};

/// Replace every `\r\n`, lone `\n` and lone `\r` with `\r\n`.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            c => out.push(c),
        }
    }
    out
}

/// Write `text` to `path` through a temporary file in the same directory,
/// renamed over the destination once complete.
pub fn persist(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| GenerateError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| GenerateError::io(dir, e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| GenerateError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| GenerateError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| GenerateError::io(path, e.error))?;
    Ok(())
}

/// Normalize and persist. Returns the text that was written.
pub fn finalize(path: &Path, text: &str) -> Result<String> {
    let normalized = normalize_line_endings(text);
    persist(path, &normalized)?;
    info!(path = %path.display(), bytes = normalized.len(), "wrote output module");
    Ok(normalized)
}
