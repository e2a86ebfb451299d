// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use apim_guard_adapters::{FsWrite, RealFs};
use apim_guard_core::{
    exit_code_for_report, render_ci, render_console, render_json, render_markdown, validate_tree,
    NamedValueCatalog, PolicySections, WalkConfig,
};
use apim_guard_model::{Environment, Journey, ResourceKind, Severity};
use chrono::{SecondsFormat, Utc};

use crate::cli::{FormatArg, OutputArg, PolicySectionsArg, SeverityArg};
use crate::logging::{render_log, LogFormat, LogLevel, LogRecord};

const DEFAULT_SUMMARY_FILE: &str = "apim-guard-summary.json";

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Warning => Self::Warning,
            SeverityArg::Error => Self::Error,
        }
    }
}

impl From<PolicySectionsArg> for PolicySections {
    fn from(value: PolicySectionsArg) -> Self {
        match value {
            PolicySectionsArg::Inbound => Self::Inbound,
            PolicySectionsArg::Full => Self::Full,
        }
    }
}

pub(crate) struct ValidateOptions {
    pub root: Option<PathBuf>,
    pub journeys: Vec<String>,
    pub environments: Vec<String>,
    pub output: OutputArg,
    pub fail_on_warning: bool,
    pub log_path: Option<PathBuf>,
    pub markdown_path: Option<PathBuf>,
    pub missing_dirs: SeverityArg,
    pub missing_files: SeverityArg,
    pub policy_sections: PolicySectionsArg,
    pub verbose: bool,
}

fn build_walk_config(options: &ValidateOptions) -> Result<WalkConfig, String> {
    let defaults = WalkConfig::default();
    let journeys = if options.journeys.is_empty() {
        defaults.journeys
    } else {
        options
            .journeys
            .iter()
            .map(|v| Journey::parse(v))
            .collect::<Result<Vec<_>, _>>()?
    };
    let environments = if options.environments.is_empty() {
        defaults.environments
    } else {
        options
            .environments
            .iter()
            .map(|v| Environment::parse(v))
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(WalkConfig {
        journeys,
        environments,
        missing_dirs: options.missing_dirs.into(),
        missing_files: options.missing_files.into(),
        policy_sections: options.policy_sections.into(),
    })
}

fn write_output_if_requested(out: Option<PathBuf>, rendered: &str) -> Result<(), String> {
    if let Some(path) = out {
        RealFs
            .write_text(&path, &format!("{rendered}\n"))
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn emit_log(options: &ValidateOptions, level: LogLevel, code: &str, message: String) {
    if !options.verbose {
        return;
    }
    let format = match options.output {
        OutputArg::Json => LogFormat::Json,
        OutputArg::Console | OutputArg::Ci => LogFormat::Human,
    };
    if let Ok(line) = render_log(&LogRecord::new(level, code, message), format) {
        eprintln!("{line}");
    }
}

pub(crate) fn run_validate(options: ValidateOptions) -> Result<(String, i32), String> {
    let root = options
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = build_walk_config(&options)?;
    emit_log(
        &options,
        LogLevel::Info,
        "VALIDATE_START",
        format!("validating {}", root.display()),
    );

    let builder = validate_tree(&RealFs, &root, &config);
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let report = builder.finish(
        root.display().to_string(),
        timestamp,
        &config.journeys,
        &config.environments,
    );
    let exit = exit_code_for_report(&report, options.fail_on_warning);

    let json = render_json(&report)?;
    let log_path = options
        .log_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY_FILE));
    RealFs
        .write_text(&log_path, &format!("{json}\n"))
        .map_err(|err| err.to_string())?;
    emit_log(
        &options,
        LogLevel::Info,
        "SUMMARY_WRITTEN",
        format!("summary at {}", log_path.display()),
    );
    if let Some(path) = &options.markdown_path {
        RealFs
            .write_text(path, &format!("{}\n", render_markdown(&report)))
            .map_err(|err| err.to_string())?;
    }

    if report.totals.errors > 0 {
        emit_log(
            &options,
            LogLevel::Error,
            "RUN_ERRORS",
            format!("{} errors", report.totals.errors),
        );
    } else if report.totals.warnings > 0 {
        emit_log(
            &options,
            LogLevel::Warn,
            "RUN_WARNINGS",
            format!("{} warnings", report.totals.warnings),
        );
    }

    let rendered = match options.output {
        OutputArg::Console => render_console(&report),
        OutputArg::Json => json,
        OutputArg::Ci => render_ci(&report, options.fail_on_warning),
    };
    Ok((rendered, exit))
}

fn kinds_text() -> String {
    let mut lines = Vec::new();
    for kind in ResourceKind::ALL {
        let files = kind
            .required_files()
            .iter()
            .map(|file| {
                if file.is_required() {
                    file.primary().to_string()
                } else {
                    format!("{} (optional)", file.primary())
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        lines.push(format!("{kind}\t{}\t{files}", kind.dir_name()));
    }
    lines.join("\n")
}

fn kinds_json() -> Result<String, String> {
    let rows: Vec<serde_json::Value> = ResourceKind::ALL
        .iter()
        .map(|kind| {
            serde_json::json!({
                "kind": kind.as_str(),
                "directory": kind.dir_name(),
                "files": kind.required_files().iter().map(|file| {
                    serde_json::json!({
                        "variants": file.variants,
                        "required": file.is_required(),
                    })
                }).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "kinds": rows }))
        .map_err(|err| err.to_string())
}

pub(crate) fn run_kinds(format: FormatArg, out: Option<PathBuf>) -> Result<(String, i32), String> {
    let rendered = match format {
        FormatArg::Text => kinds_text(),
        FormatArg::Json => kinds_json()?,
    };
    write_output_if_requested(out, &rendered)?;
    Ok((rendered, 0))
}

pub(crate) fn run_named_values(
    root: Option<PathBuf>,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    let (catalog, issues) = NamedValueCatalog::scan(&RealFs, &root);
    let rendered = match format {
        FormatArg::Text => {
            let mut lines: Vec<String> = catalog.names().map(str::to_string).collect();
            for issue in &issues {
                lines.push(format!("error {}: {}", issue.path, issue.message));
            }
            lines.join("\n")
        }
        FormatArg::Json => serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": 1,
            "root_path": root.display().to_string(),
            "named_values": catalog.names().collect::<Vec<_>>(),
            "errors": issues,
        }))
        .map_err(|err| err.to_string())?,
    };
    write_output_if_requested(out, &rendered)?;
    Ok((rendered, if issues.is_empty() { 0 } else { 1 }))
}
