// SPDX-License-Identifier: Apache-2.0

//! Filesystem ports consumed by `apim-guard-core`.
//!
//! Boundary: core depends on the traits here; `RealFs` is the production
//! adapter and `FakeFs` backs tests with an in-memory tree.

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterError {
    pub op: &'static str,
    pub path: PathBuf,
    pub detail: String,
}

impl AdapterError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Self {
            op,
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "io error: {} {} ({})",
            self.op,
            self.path.display(),
            self.detail
        )
    }
}

impl std::error::Error for AdapterError {}

/// One directory entry as the resolver sees it. Names keep their on-disk
/// casing; matching against expected variants is the resolver's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

pub trait Fs {
    fn read_text(&self, root: &Path, path: &Path) -> Result<String, AdapterError>;
    fn exists(&self, root: &Path, path: &Path) -> bool;
    /// Entries of a directory, sorted by name.
    fn list_dir(&self, root: &Path, path: &Path) -> Result<Vec<DirEntry>, AdapterError>;
}

pub trait FsWrite {
    fn write_text(&self, path: &Path, content: &str) -> Result<(), AdapterError>;
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn join_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[derive(Debug, Default)]
pub struct RealFs;

impl Fs for RealFs {
    fn read_text(&self, root: &Path, path: &Path) -> Result<String, AdapterError> {
        let target = join_root(root, path);
        let text = fs::read_to_string(&target)
            .map_err(|err| AdapterError::io("read_to_string", target, err))?;
        Ok(normalize_line_endings(&text))
    }

    fn exists(&self, root: &Path, path: &Path) -> bool {
        join_root(root, path).exists()
    }

    fn list_dir(&self, root: &Path, path: &Path) -> Result<Vec<DirEntry>, AdapterError> {
        let target = join_root(root, path);
        let entries =
            fs::read_dir(&target).map_err(|err| AdapterError::io("read_dir", target.clone(), err))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|err| AdapterError::io("read_dir_entry", target.clone(), err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| AdapterError::io("file_type", entry.path(), err))?;
            out.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        out.sort();
        Ok(out)
    }
}

impl FsWrite for RealFs {
    fn write_text(&self, path: &Path, content: &str) -> Result<(), AdapterError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| AdapterError::io("create_dir_all", parent.to_path_buf(), err))?;
            }
        }
        fs::write(path, content).map_err(|err| AdapterError::io("write", path.to_path_buf(), err))
    }
}

/// In-memory tree for tests. Registering a file registers every ancestor
/// directory, so `exists`/`list_dir` behave like a real tree.
#[derive(Debug, Default)]
pub struct FakeFs {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl FakeFs {
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            ancestor = dir.parent();
        }
        self.files.insert(path, text.into());
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut ancestor = Some(path.as_path());
        while let Some(dir) = ancestor {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            ancestor = dir.parent();
        }
        self
    }

    /// Marks a directory as present but failing to list, for exercising the
    /// unexpected-IO escalation path.
    pub fn with_unreadable_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self = self.with_dir(path.clone());
        self.unreadable.insert(path);
        self
    }
}

impl Fs for FakeFs {
    fn read_text(&self, root: &Path, path: &Path) -> Result<String, AdapterError> {
        let target = join_root(root, path);
        self.files
            .get(&target)
            .cloned()
            .ok_or_else(|| AdapterError::io("read_text", target, "file not present in FakeFs"))
    }

    fn exists(&self, root: &Path, path: &Path) -> bool {
        let target = join_root(root, path);
        self.files.contains_key(&target) || self.dirs.contains(&target)
    }

    fn list_dir(&self, root: &Path, path: &Path) -> Result<Vec<DirEntry>, AdapterError> {
        let target = join_root(root, path);
        if self.unreadable.contains(&target) {
            return Err(AdapterError::io("read_dir", target, "permission denied"));
        }
        if !self.dirs.contains(&target) {
            return Err(AdapterError::io(
                "read_dir",
                target,
                "directory not present in FakeFs",
            ));
        }
        let mut out = Vec::new();
        for dir in &self.dirs {
            if dir.parent() == Some(target.as_path()) {
                out.push(DirEntry {
                    name: dir
                        .file_name()
                        .map(|v| v.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    is_dir: true,
                });
            }
        }
        for file in self.files.keys() {
            if file.parent() == Some(target.as_path()) {
                out.push(DirEntry {
                    name: file
                        .file_name()
                        .map(|v| v.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    is_dir: false,
                });
            }
        }
        out.sort();
        Ok(out)
    }
}
