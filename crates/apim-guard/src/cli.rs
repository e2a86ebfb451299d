// SPDX-License-Identifier: Apache-2.0
//! Argument parsing and command dispatch; behavior lives in `commands`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{run_kinds, run_named_values, run_validate, ValidateOptions};

#[derive(Parser, Debug)]
#[command(name = "apim-guard", version, disable_help_subcommand = true)]
#[command(about = "Structure validator for declarative API Management configuration trees")]
pub struct Cli {
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a configuration tree and write the JSON summary artifact.
    Validate {
        root: Option<PathBuf>,
        #[arg(long = "journey", value_name = "NAME")]
        journeys: Vec<String>,
        #[arg(long = "environment", value_name = "NAME")]
        environments: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputArg::Console)]
        output: OutputArg,
        #[arg(long = "fail-on-warning", default_value_t = false)]
        fail_on_warning: bool,
        #[arg(long, value_name = "FILE")]
        log_path: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        markdown_path: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = SeverityArg::Warning)]
        missing_dirs: SeverityArg,
        #[arg(long, value_enum, default_value_t = SeverityArg::Error)]
        missing_files: SeverityArg,
        #[arg(long, value_enum, default_value_t = PolicySectionsArg::Full)]
        policy_sections: PolicySectionsArg,
    },
    /// List resource kinds, their directories and expected files.
    Kinds {
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the named-value catalog discovered under a root.
    NamedValues {
        root: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    Console,
    Json,
    Ci,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityArg {
    Warning,
    Error,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySectionsArg {
    Inbound,
    Full,
}

pub(crate) fn run() -> i32 {
    let cli = Cli::parse();
    let quiet = cli.quiet;
    let verbose = cli.verbose;
    let (label, outcome) = match cli.command {
        Command::Validate {
            root,
            journeys,
            environments,
            output,
            fail_on_warning,
            log_path,
            markdown_path,
            missing_dirs,
            missing_files,
            policy_sections,
        } => (
            "validate",
            run_validate(ValidateOptions {
                root,
                journeys,
                environments,
                output,
                fail_on_warning,
                log_path,
                markdown_path,
                missing_dirs,
                missing_files,
                policy_sections,
                verbose,
            }),
        ),
        Command::Kinds { format, out } => ("kinds", run_kinds(format, out)),
        Command::NamedValues { root, format, out } => {
            ("named-values", run_named_values(root, format, out))
        }
    };
    match outcome {
        Ok((rendered, code)) => {
            if !quiet && !rendered.is_empty() {
                if code == 0 {
                    println!("{rendered}");
                } else {
                    eprintln!("{rendered}");
                }
            }
            code
        }
        Err(err) => {
            eprintln!("apim-guard {label} failed: {err}");
            1
        }
    }
}
