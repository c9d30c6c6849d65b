use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Port opened when nothing else is configured
pub const DEFAULT_PORT: &str = "COM10";
/// Link speed of the device console
pub const BAUD_RATE: u32 = 115_200;
/// Upper bound of a single blocking read
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Delay between availability checks when no input is pending
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Length of one tail pass
pub const TAIL_DURATION: Duration = Duration::from_secs(30);

/// Parameters used to open a serial endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
}

impl PortSettings {
    /// Settings for `port` with the fixed link parameters
    pub fn for_port(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: BAUD_RATE,
            read_timeout: READ_TIMEOUT,
        }
    }
}

/// Console output format
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// serial-tail configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailConfig {
    /// Serial port to tail
    #[serde(default = "default_port")]
    pub port: String,
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Console output format
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            output: OutputFormat::default(),
        }
    }
}

impl TailConfig {
    /// Open parameters for the configured port
    pub fn port_settings(&self) -> PortSettings {
        PortSettings::for_port(&self.port)
    }
}
