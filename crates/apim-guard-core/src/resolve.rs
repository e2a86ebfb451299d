//! Case-insensitive resolution of expected files inside a resource directory.

use std::path::Path;

use apim_guard_adapters::{AdapterError, Fs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The on-disk file name that matched (original casing preserved).
    Found(String),
    NotFound,
}

/// Returns the first entry of `dir` matching any of `variants`, comparing
/// case-insensitively, with variant order taking precedence over directory
/// order. A missing directory is `NotFound`, never an error; listing failures
/// on an existing directory are surfaced to the caller.
pub fn resolve_file(
    fs: &dyn Fs,
    root: &Path,
    dir: &Path,
    variants: &[&str],
) -> Result<Resolution, AdapterError> {
    if !fs.exists(root, dir) {
        return Ok(Resolution::NotFound);
    }
    let entries = fs.list_dir(root, dir)?;
    for variant in variants {
        let hit = entries
            .iter()
            .find(|entry| !entry.is_dir && entry.name.eq_ignore_ascii_case(variant));
        if let Some(entry) = hit {
            return Ok(Resolution::Found(entry.name.clone()));
        }
    }
    Ok(Resolution::NotFound)
}
