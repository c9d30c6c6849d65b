use crate::core::tailer::TailSummary;
use crate::domain::config::{OutputFormat, TailConfig};
use crate::infrastructure::serial::PortSummary;
use serde::Serialize;
use serde_json;
use std::io::{self, Write};
use std::time::Duration;

/// Width of the separator printed around the tailed lines
pub const SEPARATOR_WIDTH: usize = 60;

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_connected(&mut self, port: &str) -> Result<(), OutputError>;
    fn write_reading_started(&mut self) -> Result<(), OutputError>;
    fn write_line(&mut self, line: &str, elapsed: Duration) -> Result<(), OutputError>;
    fn write_reading_complete(&mut self, summary: &TailSummary) -> Result<(), OutputError>;
    fn write_ports(&mut self, ports: &[PortSummary]) -> Result<(), OutputError>;
    fn write_config(&mut self, config: &TailConfig) -> Result<(), OutputError>;
    fn write_message(&mut self, message: &str) -> Result<(), OutputError>;
    fn write_error(&mut self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::TailError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// JSON mode record, one per output line
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum OutputEvent<'a> {
    Connected { port: &'a str },
    ReadingStarted,
    Line { line: &'a str, elapsed_ms: u64 },
    ReadingComplete {
        port: &'a str,
        lines: usize,
        blank_lines: usize,
        bytes_read: u64,
        elapsed_ms: u64,
    },
    Message { message: &'a str },
    Error { message: &'a str },
}

/// Console output writer
pub struct ConsoleWriter<W: Write = io::Stdout> {
    format: OutputFormat,
    out: W,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_output(format, io::stdout())
    }
}

impl<W: Write> ConsoleWriter<W> {
    pub fn with_output(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&mut self, text: &str) -> Result<(), OutputError> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    fn event(&mut self, event: &OutputEvent<'_>) -> Result<(), OutputError> {
        let json = serde_json::to_string(event)?;
        self.text(&json)
    }

    fn separator(&mut self) -> Result<(), OutputError> {
        self.text(&"=".repeat(SEPARATOR_WIDTH))
    }
}

impl<W: Write> OutputWriter for ConsoleWriter<W> {
    fn write_connected(&mut self, port: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => self.text(&format!("Connected to serial port {}", port)),
            OutputFormat::Json => self.event(&OutputEvent::Connected { port }),
        }
    }

    fn write_reading_started(&mut self) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                self.text("Reading log...")?;
                self.separator()
            }
            OutputFormat::Json => self.event(&OutputEvent::ReadingStarted),
        }
    }

    fn write_line(&mut self, line: &str, elapsed: Duration) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => self.text(line),
            OutputFormat::Json => self.event(&OutputEvent::Line {
                line,
                elapsed_ms: elapsed.as_millis() as u64,
            }),
        }
    }

    fn write_reading_complete(&mut self, summary: &TailSummary) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                self.separator()?;
                self.text("Log reading complete")
            }
            OutputFormat::Json => self.event(&OutputEvent::ReadingComplete {
                port: &summary.port,
                lines: summary.lines_emitted,
                blank_lines: summary.blank_lines,
                bytes_read: summary.bytes_read,
                elapsed_ms: summary.elapsed.as_millis() as u64,
            }),
        }
    }

    fn write_ports(&mut self, ports: &[PortSummary]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    return self.text("No serial ports found");
                }
                self.text("Available serial ports:")?;
                for port in ports {
                    self.text(&format!("  {} ({})", port.name, port.kind))?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(ports)?;
                self.text(&output)
            }
        }
    }

    fn write_config(&mut self, config: &TailConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                let output = toml::to_string_pretty(config)?;
                self.text(output.trim_end())
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(config)?;
                self.text(&output)
            }
        }
    }

    fn write_message(&mut self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => self.text(message),
            OutputFormat::Json => self.event(&OutputEvent::Message { message }),
        }
    }

    fn write_error(&mut self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => self.text(&format!("Error: {}", error)),
            OutputFormat::Json => self.event(&OutputEvent::Error { message: error }),
        }
    }
}
