//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::checker::{CheckMode, CheckReport};
use crate::config::{AssertConfig, ValidationResult};
use crate::plan::{Bucket, Plan, PlanHasher};
use crate::query::{QueryResult, ValueKind, scalar_text};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Resource row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Values")]
    values: usize,
}

/// Mismatch row for table display.
#[derive(Tabled)]
struct DiffRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Want")]
    want: String,
    #[tabled(rename = "Got")]
    got: String,
}

/// Child entry row for table display.
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a check report for display.
    #[must_use]
    pub fn format_report(&self, report: &CheckReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_report_text(report),
        }
    }

    /// Formats a check report as text.
    fn format_report_text(report: &CheckReport) -> String {
        let mut output = String::new();

        let _ = write!(
            output,
            "\nPlan {} ({} resources, mode: {})\n\n",
            PlanHasher::new().short_hash(&report.plan_digest),
            report.indexed_resources,
            report.mode
        );

        if report.passed {
            let _ = writeln!(
                output,
                "{} All {} expected resources match.",
                "✓".green(),
                report.expected_resources
            );
        } else {
            match report.mode {
                CheckMode::Contains => {
                    let _ = writeln!(
                        output,
                        "{} {}/{} expected resources do not match:",
                        "✗".red(),
                        report.failed_resources.len(),
                        report.expected_resources
                    );
                    for address in &report.failed_resources {
                        let _ = writeln!(output, "   - {address}");
                    }
                }
                CheckMode::Equal => {
                    let _ = writeln!(
                        output,
                        "{} Plan resources differ from the expected set:",
                        "✗".red()
                    );
                }
            }

            let rows: Vec<DiffRow> = report
                .diff
                .entries()
                .iter()
                .enumerate()
                .map(|(i, entry)| DiffRow {
                    index: i + 1,
                    key: entry.key.clone(),
                    want: Self::truncate(&entry.want, 40),
                    got: Self::truncate(&entry.got, 40),
                })
                .collect();

            if !rows.is_empty() {
                output.push('\n');
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
            }
        }

        if report.lossy_flatten {
            let _ = write!(
                output,
                "\n{} Part of the plan was skipped or overwritten while flattening.\n",
                "⚠".yellow()
            );
        }

        output
    }

    /// Formats the flattened resource index of a plan.
    #[must_use]
    pub fn format_index(&self, plan: &Plan) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&IndexJson::from(plan))
                .unwrap_or_default(),
            OutputFormat::Text => Self::format_index_text(plan),
        }
    }

    /// Formats an index as text.
    fn format_index_text(plan: &Plan) -> String {
        let mut output = String::new();

        if let Some(source) = plan.document.source() {
            let _ = write!(output, "\nPlan: {}\n\n", source.display());
        }

        if plan.resources.is_empty() {
            output.push_str("   No resources planned.\n");
            return output;
        }

        let rows: Vec<ResourceRow> = plan
            .resources
            .iter()
            .map(|(address, record)| ResourceRow {
                address: address.to_string(),
                resource_type: record.resource_type().unwrap_or("-").to_string(),
                name: record.name().unwrap_or("-").to_string(),
                values: record.bucket(Bucket::Values).len(),
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let report = &plan.report;
        let _ = write!(
            output,
            "\n{} resources in {} modules (deepest level {})\n",
            plan.resources.len().to_string().green(),
            report.modules_visited,
            report.deepest_resource
        );

        if report.truncated_branches > 0 {
            let _ = writeln!(
                output,
                "{} {} entries beyond the depth limit were skipped",
                "⚠".yellow(),
                report.truncated_branches
            );
        }
        if report.unaddressed_resources > 0 {
            let _ = writeln!(
                output,
                "{} {} resources without an address were skipped",
                "⚠".yellow(),
                report.unaddressed_resources
            );
        }
        for address in &report.duplicate_addresses {
            let _ = writeln!(output, "{} duplicate address: {address}", "⚠".yellow());
        }

        output
    }

    /// Formats a resource count.
    #[must_use]
    pub fn format_count(&self, expression: &str, count: usize) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "expression": expression, "count": count });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{count}\n"),
        }
    }

    /// Formats the result of a path query.
    #[must_use]
    pub fn format_query(&self, result: &QueryResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result.value()).unwrap_or_default(),
            OutputFormat::Text => {
                if !result.kind().is_composite() {
                    return format!("{}\n", result.text());
                }

                let rows: Vec<EntryRow> = result
                    .entries()
                    .into_iter()
                    .map(|(key, value)| EntryRow {
                        key,
                        kind: ValueKind::of(value).to_string(),
                        value: Self::truncate(&scalar_text(value), 60),
                    })
                    .collect();

                if rows.is_empty() {
                    return format!("{}\n", result.raw());
                }

                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats the outcome of validating an expectations file.
    #[must_use]
    pub fn format_validation(
        &self,
        config: &AssertConfig,
        result: &ValidationResult,
        show_warnings: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "plan": config.plan.path,
                    "max_depth": config.plan.max_depth,
                    "mode": config.mode,
                    "resources": config.resources.len(),
                    "warnings": result.warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = format!("{} Configuration is valid!\n", "✓".green());

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output.push_str("\nConfiguration summary:\n");
                let _ = writeln!(output, "   Plan: {}", config.plan.path);
                let _ = writeln!(output, "   Max depth: {}", config.plan.max_depth);
                let _ = writeln!(output, "   Mode: {}", config.mode);
                let _ = writeln!(output, "   Expected resources: {}", config.resources.len());
                output
            }
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{head}...")
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct IndexJson<'a> {
    source: Option<String>,
    digest: String,
    resources: &'a crate::plan::ResourceIndex,
    report: &'a crate::plan::FlattenReport,
}

impl<'a> From<&'a Plan> for IndexJson<'a> {
    fn from(plan: &'a Plan) -> Self {
        Self {
            source: plan.document.source().map(|p| p.display().to_string()),
            digest: PlanHasher::new().hash_index(&plan.resources),
            resources: &plan.resources,
            report: &plan.report,
        }
    }
}
