//! Output formatting for different formats.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tamperguard::{ReferenceSnapshot, VerdictReport};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored human-readable text
    #[default]
    Pretty,
    /// JSON output
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print a verdict report.
///
/// Each failing check is shown with both values so the reader can tell a
/// mismatch from an unreadable input or a missing reference.
pub fn print_report(report: &VerdictReport, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if let Some(error) = report.error {
        println!("{} {}", "Check could not run:".bright_yellow().bold(), error);
        if let Some(message) = &report.message {
            println!("  {}", message.dimmed());
        }
        return Ok(());
    }

    let headline = if report.overall {
        "Not tampered: all checks passed.".bright_green().bold()
    } else {
        "Tampered: integrity check failed.".bright_red().bold()
    };
    println!("{headline}");
    println!();

    for check in &report.checks {
        let status = if check.matched {
            "PASS".bright_green()
        } else {
            "FAIL".bright_red()
        };
        println!("  {} {}", status, check.kind.bright_white());
        println!("    {} {}", "expected:".dimmed(), check.expected);
        println!("    {} {}", "actual:  ".dimmed(), check.actual);
    }

    println!();
    Ok(())
}

/// Print a labelled measurement.
pub fn print_value(label: &str, value: &str, format: OutputFormat) -> anyhow::Result<()> {
    print_values(&[(label, value)], format)
}

/// Print several labelled values as one record.
pub fn print_values(fields: &[(&str, &str)], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let record: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|(label, value)| ((*label).to_string(), serde_json::Value::from(*value)))
                .collect();
            println!("{}", serde_json::Value::Object(record));
        }
        OutputFormat::Pretty => {
            for (label, value) in fields {
                println!("{}", format!("{label}:").bold());
                println!("{}", value.cyan());
            }
        }
    }
    Ok(())
}

/// Print the loaded reference values and which keys are absent.
pub fn print_references(snapshot: &ReferenceSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        let values: serde_json::Map<String, serde_json::Value> = snapshot
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
            .collect();
        let absent: Vec<String> = snapshot.absent().map(ToString::to_string).collect();
        let json = serde_json::json!({
            "loaded_at": snapshot.loaded_at().to_rfc3339(),
            "values": values,
            "absent": absent,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", "Reference values:".bold());
    for (key, value) in snapshot.iter() {
        println!("  {} {}", format!("{key}:").bright_white(), value);
    }
    for key in snapshot.absent() {
        println!("  {} {}", format!("{key}:").bright_white(), "(absent)".bright_yellow());
    }
    println!();
    Ok(())
}
