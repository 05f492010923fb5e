//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use archivist_domain::ArchiveReport;
use archivist_engine::Notification;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the outcome of one pass over `root`.
    pub fn format_report(&self, root: &str, report: &ArchiveReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(root, report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(self.format_report_quiet(report)),
        }
    }

    fn format_report_json(&self, root: &str, report: &ArchiveReport) -> Result<String> {
        let moved: Vec<serde_json::Value> = report
            .moved
            .iter()
            .map(|m| {
                serde_json::json!({
                    "source": m.source_name,
                    "archived_as": m.archived_name
                })
            })
            .collect();
        let failed: Vec<serde_json::Value> = report
            .failed
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name,
                    "reason": f.reason
                })
            })
            .collect();

        let value = serde_json::json!({
            "root": root,
            "dry_run": report.dry_run,
            "examined": report.examined,
            "moved": moved,
            "failed": failed,
            "pending": report.pending,
            "summary": report.summary()
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_report_table(&self, report: &ArchiveReport) -> String {
        if report.moved.is_empty() && report.failed.is_empty() && report.pending.is_empty() {
            return self.colorize(
                &format!("No files to archive ({} examined).", report.examined),
                "yellow",
            );
        }

        let mut builder = Builder::default();
        builder.push_record(["File", "Archived as", "Status"]);

        for moved in &report.moved {
            builder.push_record([
                moved.source_name.as_str(),
                moved.archived_name.as_str(),
                "archived",
            ]);
        }
        for name in &report.pending {
            builder.push_record([name.as_str(), "", "would archive"]);
        }
        for failed in &report.failed {
            let status = format!("failed: {}", failed.reason);
            builder.push_record([failed.name.as_str(), "", status.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let summary = if report.failed.is_empty() {
            self.success(&report.summary())
        } else {
            self.warning(&report.summary())
        };

        format!("{}\n{}", table, summary)
    }

    /// Quiet mode: archived (or, in a dry run, eligible) names only.
    fn format_report_quiet(&self, report: &ArchiveReport) -> String {
        let names: Vec<&str> = if report.dry_run {
            report.pending.iter().map(String::as_str).collect()
        } else {
            report.moved.iter().map(|m| m.archived_name.as_str()).collect()
        };
        names.join("\n")
    }

    /// Format a notification; `None` in quiet mode.
    pub fn format_notification(&self, notification: &Notification) -> Option<String> {
        match self.format {
            OutputFormat::Quiet => None,
            OutputFormat::Json => Some(
                serde_json::json!({
                    "title": notification.title,
                    "body": notification.body
                })
                .to_string(),
            ),
            OutputFormat::Table => {
                Some(self.info(&format!("{}: {}", notification.title, notification.body)))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
