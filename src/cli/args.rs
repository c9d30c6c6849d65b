use crate::domain::config::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Command line arguments for serial-tail
#[derive(Parser, Debug)]
#[command(
    name = "serial-tail",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tail text logs from an embedded device's serial port",
    long_about = "Opens a serial port at 115200 baud, prints every text line the device sends for 30 seconds, then closes the port."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress diagnostic logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format (overrides the configuration file)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Command to execute (defaults to `tail`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print lines received on a serial port for 30 seconds
    Tail(TailArgs),
    /// List available serial ports
    List,
    /// Configuration management commands
    Config(ConfigArgs),
}

/// Tail arguments
#[derive(ClapArgs, Debug, Default)]
pub struct TailArgs {
    /// Serial port path (overrides the configuration file)
    #[arg(short, long)]
    pub port: Option<String>,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Create default configuration
    Init {
        /// Output file path
        #[arg(long)]
        path: Option<String>,
        /// Global configuration
        #[arg(short, long)]
        global: bool,
    },
}
