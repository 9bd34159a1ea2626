//! Output formatting and writing utilities
//!
//! This module formats results as JSON, YAML or human-readable text, with
//! specialised human renderings for validation reports, position lookups
//! and detections.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use locus_core::{ErrorFieldInfo, MatchConfidence, PositionMatch};
use locus_validate::{Severity, ValidationIssue, ValidationReport};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation reports
    fn format_reports(&self, reports: &[ValidationReport], use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_reports(&self, reports: &[ValidationReport], use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(reports
                .iter()
                .map(|report| format_report_human(report, use_color))
                .collect::<Vec<_>>()
                .join("\n")),
            _ => self.format(&reports),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!("Outputting {} bytes", formatted.len());

        if self.format == OutputFormat::Yaml {
            // serde_yaml output already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write validation reports with specialized formatting
    pub fn reports(&mut self, reports: &[ValidationReport]) -> Result<()> {
        let formatted = self.format.format_reports(reports, self.use_color)?;
        if self.format == OutputFormat::Yaml {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a position lookup result
    pub fn position(&mut self, query: &str, found: &PositionMatch) -> Result<()> {
        if self.is_human() {
            let line = format_position_human(query, found);
            self.writeln(&line)
        } else {
            self.data(found)
        }
    }

    /// Write a field detection result
    pub fn detection(&mut self, info: &ErrorFieldInfo) -> Result<()> {
        if self.is_human() {
            let line = format_detection_human(info);
            self.writeln(&line)
        } else {
            self.data(info)
        }
    }

    /// Create a progress bar for work over a known number of items
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format one validation report for human reading
pub fn format_report_human(report: &ValidationReport, use_color: bool) -> String {
    let mut output = String::new();

    let headline = if report.valid {
        let mut line = format!("✓ {} is valid", report.file_path);
        if !report.warnings.is_empty() {
            line.push_str(&format!(" ({} warning(s))", report.warnings.len()));
        }
        paint(line, use_color, |s| s.green().to_string())
    } else {
        let line = format!(
            "✗ {}: {} error(s), {} warning(s)",
            report.file_path,
            report.errors.len(),
            report.warnings.len()
        );
        paint(line, use_color, |s| s.red().bold().to_string())
    };
    output.push_str(&headline);
    output.push_str(&format!(" [{:.2}ms]\n", report.validation_time_ms));

    for issue in report.issues() {
        output.push_str("  ");
        output.push_str(&format_issue_human(issue, use_color));
        output.push('\n');
    }

    if report.issue_count() > 0 {
        output.push_str(&format!(
            "  web compatibility: {:.1}% ({} of {} issue(s) web-related)\n",
            report.web_compatibility.score, report.web_compatibility.incompatible, report.web_compatibility.total
        ));
    }

    if let Some(bindings) = &report.data_binding_stats {
        if bindings.total > 0 {
            output.push_str(&format!(
                "  bindings: {} (state {}, data {}, computed {})\n",
                bindings.total, bindings.state, bindings.data, bindings.computed
            ));
        }
    }

    if let Some(components) = &report.component_version_stats {
        if components.total_components > 0 {
            let types = components
                .by_type
                .iter()
                .map(|(name, count)| format!("{name} ×{count}"))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("  components: {} ({})\n", components.total_components, types));
        }
    }

    output
}

fn format_issue_human(issue: &ValidationIssue, use_color: bool) -> String {
    let severity = match issue.severity {
        Severity::Error => paint("error".to_string(), use_color, |s| s.red().to_string()),
        Severity::Warning => paint("warning".to_string(), use_color, |s| s.yellow().to_string()),
        Severity::Info => paint("info".to_string(), use_color, |s| s.blue().to_string()),
    };

    let mut line = format!("{}:{} {} [{}] {}", issue.line, issue.column, severity, issue.category, issue.message);
    if !issue.path.is_empty() {
        line.push_str(&format!(" (at {})", issue.path));
    }
    if let Some(field) = &issue.field {
        line.push_str(&format!(" field: {field}"));
    }
    line
}

/// Format a position lookup for human reading
pub fn format_position_human(query: &str, found: &PositionMatch) -> String {
    match (&found.position, found.confidence) {
        (Some(position), MatchConfidence::Exact) => {
            format!("{query}: line {}, column {}", position.line, position.column)
        }
        (Some(position), confidence) => format!(
            "{query}: line {}, column {} ({} match via {})",
            position.line,
            position.column,
            confidence,
            found.matched.as_deref().unwrap_or("?")
        ),
        (None, _) => format!("{query}: not found"),
    }
}

/// Format a detection for human reading
pub fn format_detection_human(info: &ErrorFieldInfo) -> String {
    format!(
        "field: {} (confidence {}, rule {})",
        info.field.as_deref().unwrap_or("-"),
        info.confidence,
        info.reason
    )
}

fn paint(text: String, use_color: bool, style: impl Fn(&str) -> String) -> String {
    if use_color {
        style(&text)
    } else {
        text
    }
}
