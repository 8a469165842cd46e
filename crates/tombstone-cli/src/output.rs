//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tombstone_domain::Timestamp;
use tombstone_reaper::{StatusArtifact, TimerFormat};

/// Output formatter.
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

    /// Format a status document.
    pub fn format_artifact(&self, artifact: &StatusArtifact) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(artifact)?),
            OutputFormat::Table => Ok(self.format_artifact_table(artifact)),
            OutputFormat::Quiet => Ok(Self::format_artifact_quiet(artifact)),
        }
    }

    fn format_artifact_table(&self, artifact: &StatusArtifact) -> String {
        let mut sections = vec![self.info(&format!(
            "Cycle at {}",
            format_epoch(artifact.update_timestamp)
        ))];

        if artifact.pre_delete_pages.is_empty() {
            sections.push(self.colorize("No running countdowns.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Title", "Score", "Release", "Hours", "Deadline", "Kind"]);
            for page in &artifact.pre_delete_pages {
                builder.push_record([
                    page.title.clone(),
                    page.score.to_string(),
                    page.release_score.to_string(),
                    page.time.to_string(),
                    format_epoch(page.timestamp),
                    kind_label(page.is_original).to_string(),
                ]);
            }
            sections.push(table(builder));
        }

        if !artifact.deleted_pages.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Title", "Score", "Release", "Hours", "Reasons"]);
            for record in &artifact.deleted_pages {
                let reasons: Vec<&str> = record.page_type.iter().map(|k| k.as_str()).collect();
                builder.push_record([
                    record.title.clone(),
                    record.score.to_string(),
                    record.release_score.to_string(),
                    record.time.to_string(),
                    reasons.join(", "),
                ]);
            }
            sections.push(self.warning(&format!(
                "{} page(s) due for deletion",
                artifact.deleted_pages.len()
            )));
            sections.push(table(builder));
        }

        for deviation in &artifact.errors {
            sections.push(self.error(&format!(
                "{} on {}: {}",
                deviation.error_type.as_str(),
                deviation.item,
                deviation.url
            )));
        }

        sections.join("\n")
    }

    fn format_artifact_quiet(artifact: &StatusArtifact) -> String {
        artifact
            .deleted_pages
            .iter()
            .map(|record| record.link.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a decoded timer link.
    pub fn format_decoded(&self, format: TimerFormat, deadline: Timestamp) -> Result<String> {
        let name = match format {
            TimerFormat::EpochMillis => "epoch-millis",
            TimerFormat::IsoUtc => "iso-utc",
            TimerFormat::Legacy => "legacy",
        };
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "format": name,
                "deadline": deadline.as_secs_f64(),
            }))?),
            OutputFormat::Table => Ok(format!(
                "{} ({} format)",
                self.success(&format_epoch(deadline.as_secs_f64())),
                name
            )),
            OutputFormat::Quiet => Ok(deadline.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
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
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn kind_label(is_original: bool) -> &'static str {
    if is_original {
        "original"
    } else {
        "translation"
    }
}

fn table(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Render fractional epoch seconds as a UTC date.
pub fn format_epoch(secs: f64) -> String {
    let millis = (secs * 1000.0).round() as i64;
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{}", secs),
    }
}
