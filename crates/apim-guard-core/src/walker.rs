//! Deterministic traversal of the configuration tree.
//!
//! Order is fixed: journeys as configured, environments as configured,
//! directory groups in declared order, resource directories sorted by name.
//! A missing directory short-circuits only its own subtree and each file is
//! validated inside its own failure boundary.

use std::path::{Path, PathBuf};

use apim_guard_adapters::{AdapterError, Fs};
use apim_guard_model::{
    Environment, Issue, Journey, ResourceKind, Severity, TargetOutcome, TargetStatus,
};

use crate::report::ReportBuilder;
use crate::resolve::{resolve_file, Resolution};
use crate::validators::validator_fn;
use crate::{FileContext, NamedValueCatalog, WalkConfig};

/// Physical directory groups in traversal order. Product and ProductApiLink
/// share the `products` directory, so a missing directory yields exactly one
/// issue while both kinds still validate their files inside each resource.
const DIR_GROUPS: [(&str, &[ResourceKind]); 4] = [
    ("apis", &[ResourceKind::Api]),
    ("products", &[ResourceKind::Product, ResourceKind::ProductApiLink]),
    ("version sets", &[ResourceKind::VersionSet]),
    ("named values", &[ResourceKind::NamedValue]),
];

fn io_issue(path: &Path, err: &AdapterError) -> Issue {
    Issue::error("IO_ERROR", path.display().to_string(), err.to_string())
}

/// Locates a child directory case-insensitively. `Ok(None)` is genuine
/// absence; listing failures bubble up for the caller to escalate.
fn find_dir(
    fs: &dyn Fs,
    root: &Path,
    parent: &Path,
    name: &str,
) -> Result<Option<PathBuf>, AdapterError> {
    if !fs.exists(root, parent) {
        return Ok(None);
    }
    let entries = fs.list_dir(root, parent)?;
    Ok(entries
        .iter()
        .find(|e| e.is_dir && e.name.eq_ignore_ascii_case(name))
        .map(|e| parent.join(&e.name)))
}

fn missing_dir_issue(severity: Severity, code: &str, expected: &Path) -> Issue {
    Issue {
        severity,
        code: code.to_string(),
        path: expected.display().to_string(),
        message: format!("Missing folder '{}'", expected.display()),
    }
}

pub fn validate_tree(fs: &dyn Fs, root: &Path, config: &WalkConfig) -> ReportBuilder {
    let mut builder = ReportBuilder::new();
    if !fs.exists(root, Path::new("")) {
        builder.push(Issue::error(
            "ROOT_NOT_FOUND",
            root.display().to_string(),
            "root path does not exist",
        ));
        return builder;
    }

    let (catalog, scan_issues) = NamedValueCatalog::scan(fs, root);
    for issue in scan_issues {
        builder.push(issue);
    }
    let ctx = FileContext {
        policy_sections: config.policy_sections,
        catalog: &catalog,
    };

    for journey in &config.journeys {
        let expected = PathBuf::from(journey.as_str());
        let journey_dir = match find_dir(fs, root, Path::new(""), journey.as_str()) {
            Err(err) => {
                builder.push(io_issue(&expected, &err));
                continue;
            }
            Ok(None) => {
                builder.push(missing_dir_issue(
                    config.missing_dirs,
                    "MISSING_JOURNEY_DIR",
                    &expected,
                ));
                continue;
            }
            Ok(Some(dir)) => dir,
        };
        for environment in &config.environments {
            let expected = journey_dir.join(environment.as_str());
            let environment_dir = match find_dir(fs, root, &journey_dir, environment.as_str()) {
                Err(err) => {
                    builder.push(io_issue(&expected, &err));
                    continue;
                }
                Ok(None) => {
                    builder.push(missing_dir_issue(
                        config.missing_dirs,
                        "MISSING_ENVIRONMENT_DIR",
                        &expected,
                    ));
                    continue;
                }
                Ok(Some(dir)) => dir,
            };
            for (group_name, kinds) in DIR_GROUPS {
                let expected = environment_dir.join(group_name);
                let group_dir = match find_dir(fs, root, &environment_dir, group_name) {
                    Err(err) => {
                        builder.push(io_issue(&expected, &err));
                        continue;
                    }
                    Ok(None) => {
                        builder.push(missing_dir_issue(
                            config.missing_dirs,
                            "MISSING_RESOURCE_DIR",
                            &expected,
                        ));
                        continue;
                    }
                    Ok(Some(dir)) => dir,
                };
                let entries = match fs.list_dir(root, &group_dir) {
                    Ok(entries) => entries,
                    Err(err) => {
                        builder.push(io_issue(&group_dir, &err));
                        continue;
                    }
                };
                for entry in entries.iter().filter(|e| e.is_dir) {
                    let resource_dir = group_dir.join(&entry.name);
                    for kind in kinds {
                        validate_target(
                            fs,
                            root,
                            &ctx,
                            config,
                            &mut builder,
                            journey,
                            environment,
                            *kind,
                            &resource_dir,
                            &entry.name,
                        );
                    }
                }
            }
        }
    }
    builder
}

#[allow(clippy::too_many_arguments)]
fn validate_target(
    fs: &dyn Fs,
    root: &Path,
    ctx: &FileContext<'_>,
    config: &WalkConfig,
    builder: &mut ReportBuilder,
    journey: &Journey,
    environment: &Environment,
    kind: ResourceKind,
    dir_rel: &Path,
    name: &str,
) {
    let start = builder.issue_count();
    for file in kind.required_files() {
        match resolve_file(fs, root, dir_rel, file.variants) {
            Err(err) => builder.push(io_issue(dir_rel, &err)),
            Ok(Resolution::NotFound) => {
                if file.is_required() {
                    builder.push(Issue {
                        severity: config.missing_files,
                        code: "MISSING_REQUIRED_FILE".to_string(),
                        path: dir_rel.display().to_string(),
                        message: format!("Missing '{}' in {}", file.primary(), dir_rel.display()),
                    });
                }
            }
            Ok(Resolution::Found(actual)) => {
                let file_rel = dir_rel.join(&actual);
                match fs.read_text(root, &file_rel) {
                    Err(err) => builder.push(io_issue(&file_rel, &err)),
                    Ok(text) => {
                        let rel = file_rel.display().to_string();
                        for issue in validator_fn(file.kind)(ctx, &text, &rel) {
                            builder.push(issue);
                        }
                    }
                }
            }
        }
    }
    let (errors, warnings) = builder.counts_since(start);
    let status = if errors > 0 {
        TargetStatus::Fail
    } else if warnings > 0 {
        TargetStatus::Warn
    } else {
        TargetStatus::Pass
    };
    builder.push_target(TargetOutcome {
        journey: journey.to_string(),
        environment: environment.to_string(),
        kind,
        name: name.to_string(),
        status,
        errors,
        warnings,
    });
}
