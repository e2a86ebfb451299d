//! Report accumulation and rendering.
//!
//! Issues are appended in traversal order and never reordered, so two runs
//! over the same tree render identical output; the only varying field is the
//! timestamp injected at finish time.

use apim_guard_model::{
    Environment, Issue, IssueTotals, Journey, Severity, TargetOutcome, TargetStatus,
    ValidationReport,
};

#[derive(Debug, Default)]
pub struct ReportBuilder {
    issues: Vec<Issue>,
    targets: Vec<TargetOutcome>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn push_target(&mut self, target: TargetOutcome) {
        self.targets.push(target);
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// (errors, warnings) accumulated since a saved `issue_count` watermark.
    pub fn counts_since(&self, start: usize) -> (u64, u64) {
        let slice = &self.issues[start..];
        let errors = slice.iter().filter(|i| i.severity == Severity::Error).count() as u64;
        let warnings = slice
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count() as u64;
        (errors, warnings)
    }

    pub fn finish(
        self,
        root_path: String,
        timestamp: String,
        journeys: &[Journey],
        environments: &[Environment],
    ) -> ValidationReport {
        let (errors, warnings) = self.counts_since(0);
        ValidationReport {
            timestamp,
            root_path,
            journeys: journeys.iter().map(ToString::to_string).collect(),
            environments: environments.iter().map(ToString::to_string).collect(),
            targets: self.targets,
            issues: self.issues,
            totals: IssueTotals { errors, warnings },
        }
    }
}

pub fn status_str(status: TargetStatus) -> &'static str {
    match status {
        TargetStatus::Pass => "pass",
        TargetStatus::Warn => "warn",
        TargetStatus::Fail => "fail",
    }
}

fn severity_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

pub fn render_console(report: &ValidationReport) -> String {
    let mut lines = Vec::new();
    for issue in &report.issues {
        lines.push(format!(
            "{} {} {}: {}",
            severity_str(issue.severity),
            issue.code,
            issue.path,
            issue.message
        ));
    }
    let passed = report
        .targets
        .iter()
        .filter(|t| t.status == TargetStatus::Pass)
        .count();
    lines.push(format!(
        "summary: errors={} warnings={} targets={} passed={}",
        report.totals.errors,
        report.totals.warnings,
        report.targets.len(),
        passed,
    ));
    lines.join("\n")
}

pub fn render_json(report: &ValidationReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| err.to_string())
}

pub fn render_markdown(report: &ValidationReport) -> String {
    let mut lines = vec![
        "| Journey | Environment | Kind | Resource | Status | Errors | Warnings |".to_string(),
        "| --- | --- | --- | --- | --- | --- | --- |".to_string(),
    ];
    for target in &report.targets {
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            target.journey,
            target.environment,
            target.kind,
            target.name,
            status_str(target.status),
            target.errors,
            target.warnings,
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Totals: {} errors, {} warnings.",
        report.totals.errors, report.totals.warnings
    ));
    lines.join("\n")
}

/// Azure Pipelines logging commands: one `task.logissue` per issue and a
/// final `task.complete` carrying the run result.
pub fn render_ci(report: &ValidationReport, fail_on_warning: bool) -> String {
    let mut lines = Vec::new();
    for issue in &report.issues {
        lines.push(format!(
            "##vso[task.logissue type={};sourcepath={};]{}",
            severity_str(issue.severity),
            issue.path,
            issue.message
        ));
    }
    let result = if exit_code_for_report(report, fail_on_warning) == 0 {
        "Succeeded"
    } else {
        "Failed"
    };
    lines.push(format!(
        "##vso[task.complete result={result};]errors={} warnings={}",
        report.totals.errors, report.totals.warnings
    ));
    lines.join("\n")
}

pub fn exit_code_for_report(report: &ValidationReport, fail_on_warning: bool) -> i32 {
    if report.totals.errors > 0 || (fail_on_warning && report.totals.warnings > 0) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ValidationReport {
        let mut builder = ReportBuilder::new();
        builder.push(Issue::error(
            "POLICY_SECTION_MISSING",
            "external/base/apis/a/policy.xml",
            "Missing 'outbound' section in policy.xml",
        ));
        builder.push(Issue::warning(
            "NAMED_VALUE_UNKNOWN",
            "external/base/apis/a/policy.xml",
            "Unknown Named Value reference '{{X}}'",
        ));
        builder.push_target(TargetOutcome {
            journey: "external".to_string(),
            environment: "base".to_string(),
            kind: apim_guard_model::ResourceKind::Api,
            name: "a".to_string(),
            status: TargetStatus::Fail,
            errors: 1,
            warnings: 1,
        });
        builder.finish(
            "/repo".to_string(),
            "2026-01-01T00:00:00Z".to_string(),
            &[Journey::parse("external").expect("journey")],
            &[Environment::parse("base").expect("environment")],
        )
    }

    #[test]
    fn totals_reflect_accumulated_issues() {
        let report = sample_report();
        assert_eq!(report.totals.errors, 1);
        assert_eq!(report.totals.warnings, 1);
    }

    #[test]
    fn exit_code_honors_fail_on_warning() {
        let mut report = sample_report();
        assert_eq!(exit_code_for_report(&report, false), 1);
        report.issues.retain(|i| i.severity == Severity::Warning);
        report.totals = IssueTotals {
            errors: 0,
            warnings: 1,
        };
        assert_eq!(exit_code_for_report(&report, false), 0);
        assert_eq!(exit_code_for_report(&report, true), 1);
    }

    #[test]
    fn console_rendering_ends_with_summary() {
        let rendered = render_console(&sample_report());
        let last = rendered.lines().last().unwrap_or_default();
        assert_eq!(last, "summary: errors=1 warnings=1 targets=1 passed=0");
    }

    #[test]
    fn markdown_has_one_row_per_target() {
        let rendered = render_markdown(&sample_report());
        let rows: Vec<&str> = rendered
            .lines()
            .filter(|l| l.starts_with("| external"))
            .collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("| fail |"));
    }

    #[test]
    fn ci_rendering_uses_vso_logging_commands() {
        let rendered = render_ci(&sample_report(), false);
        assert!(rendered.contains(
            "##vso[task.logissue type=error;sourcepath=external/base/apis/a/policy.xml;]"
        ));
        assert!(rendered.ends_with("##vso[task.complete result=Failed;]errors=1 warnings=1"));
    }

    #[test]
    fn json_rendering_is_stable_for_identical_reports() {
        let a = render_json(&sample_report()).expect("json");
        let b = render_json(&sample_report()).expect("json");
        assert_eq!(a, b);
    }
}
