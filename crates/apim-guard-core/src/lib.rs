#![forbid(unsafe_code)]

use apim_guard_model::{Environment, Journey, Severity};

pub mod catalog;
pub mod fields;
pub mod report;
pub mod resolve;
pub mod validators;
pub mod walker;

pub use catalog::NamedValueCatalog;
pub use report::{
    exit_code_for_report, render_ci, render_console, render_json, render_markdown, ReportBuilder,
};
pub use walker::validate_tree;

/// Which policy sections are mandatory. The observed source trees disagree on
/// this, so it is configuration rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicySections {
    /// Only `<inbound>` is mandatory; absent outer sections and missing
    /// `<base/>` pass-throughs are advisory.
    Inbound,
    /// `<inbound>`, `<outbound>` and `<on-error>` must all be present and
    /// each must contain a `<base/>` pass-through.
    #[default]
    Full,
}

#[derive(Debug, Clone)]
pub struct WalkConfig {
    pub journeys: Vec<Journey>,
    pub environments: Vec<Environment>,
    pub missing_dirs: Severity,
    pub missing_files: Severity,
    pub policy_sections: PolicySections,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            journeys: ["external", "internal"]
                .iter()
                .filter_map(|v| Journey::parse(v).ok())
                .collect(),
            environments: ["base", "dev", "test", "pre"]
                .iter()
                .filter_map(|v| Environment::parse(v).ok())
                .collect(),
            missing_dirs: Severity::Warning,
            missing_files: Severity::Error,
            policy_sections: PolicySections::Full,
        }
    }
}

/// Shared read-only context handed to every file validator.
pub struct FileContext<'a> {
    pub policy_sections: PolicySections,
    pub catalog: &'a NamedValueCatalog,
}
