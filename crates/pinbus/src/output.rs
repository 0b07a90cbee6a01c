use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use pinbus_gpio::status;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Outcome of one request-reply exchange, ready for printing.
#[derive(Serialize)]
pub struct ExchangeReport {
    pub command: &'static str,
    pub pin: u16,
    pub status: i32,
    pub status_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl ExchangeReport {
    pub fn new(command: &'static str, pin: u16, status: i32) -> Self {
        Self {
            command,
            pin,
            status,
            status_name: status_name(status),
            level: None,
        }
    }

    pub fn with_level(command: &'static str, pin: u16, status: i32, level: u8) -> Self {
        Self {
            level: Some(level),
            ..Self::new(command, pin, status)
        }
    }
}

pub fn print_report(report: &ExchangeReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "PIN", "STATUS", "LEVEL"])
                .add_row(vec![
                    report.command.to_string(),
                    report.pin.to_string(),
                    format!("{} ({})", report.status, report.status_name),
                    report
                        .level
                        .map(|level| level.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match report.level {
            Some(level) => println!(
                "{} pin={} status={} ({}) level={}",
                report.command, report.pin, report.status, report.status_name, level
            ),
            None => println!(
                "{} pin={} status={} ({})",
                report.command, report.pin, report.status, report.status_name
            ),
        },
    }
}

pub fn status_name(status: i32) -> &'static str {
    match status {
        status::OK => "ok",
        status::NO_SUCH_DEVICE => "no-such-device",
        status::INVALID_ARGUMENT => "invalid-argument",
        status::NOT_SUPPORTED => "not-supported",
        _ => "error",
    }
}
