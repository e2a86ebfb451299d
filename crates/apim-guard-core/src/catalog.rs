//! Discovery of declared named values and `{{placeholder}}` token scanning.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use apim_guard_adapters::Fs;
use apim_guard_model::{Issue, ResourceKind};
use regex::Regex;
use serde_json::Value;

use crate::fields;
use crate::resolve::{resolve_file, Resolution};

const NAMED_VALUES_DIR: &str = "named values";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("placeholder pattern compiles")
    })
}

/// Unique placeholder identifiers in first-occurrence order. One mention per
/// identifier per document, however often the token repeats.
pub fn placeholder_idents(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for capture in placeholder_re().captures_iter(text) {
        let ident = capture[1].to_string();
        if seen.insert(ident.clone()) {
            out.push(ident);
        }
    }
    out
}

/// All named-value identifiers declared anywhere under the root: the resource
/// directory names inside every `named values` directory, plus the
/// `properties.displayName` of each parseable info document. Lookup-only for
/// the lifetime of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NamedValueCatalog {
    names: BTreeSet<String>,
}

impl NamedValueCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.names.contains(ident)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Walks the whole tree once, collecting identifiers from every
    /// `named values` directory regardless of the configured journey and
    /// environment sets. Unreadable directories become Error issues; the
    /// scan itself never aborts.
    pub fn scan(fs: &dyn Fs, root: &Path) -> (Self, Vec<Issue>) {
        let mut catalog = Self::default();
        let mut issues = Vec::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::from([PathBuf::new()]);
        while let Some(rel) = queue.pop_front() {
            let entries = match fs.list_dir(root, &rel) {
                Ok(entries) => entries,
                Err(err) => {
                    issues.push(Issue::error("IO_ERROR", rel_display(&rel), err.to_string()));
                    continue;
                }
            };
            for entry in entries.iter().filter(|e| e.is_dir) {
                let child = rel.join(&entry.name);
                if entry.name.eq_ignore_ascii_case(NAMED_VALUES_DIR) {
                    catalog.collect_dir(fs, root, &child, &mut issues);
                } else {
                    queue.push_back(child);
                }
            }
        }
        (catalog, issues)
    }

    fn collect_dir(&mut self, fs: &dyn Fs, root: &Path, dir: &Path, issues: &mut Vec<Issue>) {
        let entries = match fs.list_dir(root, dir) {
            Ok(entries) => entries,
            Err(err) => {
                issues.push(Issue::error("IO_ERROR", rel_display(dir), err.to_string()));
                return;
            }
        };
        let info_variants = ResourceKind::NamedValue.required_files()[0].variants;
        for entry in entries.iter().filter(|e| e.is_dir) {
            self.names.insert(entry.name.clone());
            let value_dir = dir.join(&entry.name);
            let resolution = match resolve_file(fs, root, &value_dir, info_variants) {
                Ok(resolution) => resolution,
                Err(err) => {
                    issues.push(Issue::error("IO_ERROR", rel_display(&value_dir), err.to_string()));
                    continue;
                }
            };
            // Content problems in the info file are the walker's report, not
            // the catalog's; only well-formed display names register here.
            if let Resolution::Found(name) = resolution {
                if let Ok(text) = fs.read_text(root, &value_dir.join(&name)) {
                    if let Ok(doc) = serde_json::from_str::<Value>(&text) {
                        if let Some(Value::String(display)) =
                            fields::get_path(&doc, "properties.displayName")
                        {
                            if !display.trim().is_empty() {
                                self.names.insert(display.trim().to_string());
                            }
                        }
                    }
                }
            }
        }
    }
}

fn rel_display(rel: &Path) -> String {
    if rel.as_os_str().is_empty() {
        ".".to_string()
    } else {
        rel.display().to_string()
    }
}
