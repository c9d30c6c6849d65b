use crate::cli::args::{Args, Command, ConfigCommand, TailArgs};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::tailer::SerialLogTailer;
use crate::domain::config::{TailConfig, TAIL_DURATION};
use crate::domain::error::{TailError, TailResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::{list_ports, SerialLineSource};
use std::path::PathBuf;
use tracing::error;

/// Execute CLI command
pub async fn execute_command(args: Args) -> TailResult<()> {
    let config_manager = ConfigManager::new();
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path.as_ref())?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        init_logging(&config.log_level, args.verbose)?;
    }

    let mut writer = ConsoleWriter::new(args.output.unwrap_or(config.output));

    match args.command.unwrap_or(Command::Tail(TailArgs::default())) {
        Command::Tail(tail_args) => {
            execute_tail(tail_args, &config, &mut writer).await;
            Ok(())
        }
        Command::List => {
            let ports = list_ports()?;
            writer.write_ports(&ports)?;
            Ok(())
        }
        Command::Config(config_args) => {
            execute_config_command(config_args.command, &config, &config_manager, &mut writer)
        }
    }
}

/// Tail the configured port.
///
/// Every failure is reported as an error line on the writer; the command
/// itself always succeeds.
pub async fn execute_tail<W: OutputWriter + ?Sized>(args: TailArgs, config: &TailConfig, writer: &mut W) {
    let mut settings = config.port_settings();
    if let Some(port) = args.port {
        settings.port = port;
    }

    let result = SerialLogTailer::default()
        .tail(&settings, TAIL_DURATION, SerialLineSource::open, writer)
        .await;

    if let Err(e) = result {
        report_tail_error(&e, writer);
    }
}

/// Print a tail failure, falling back to the log if the console is gone
pub fn report_tail_error<W: OutputWriter + ?Sized>(e: &TailError, writer: &mut W) {
    if let Err(output_error) = writer.write_error(&e.to_string()) {
        error!("Failed to report error '{}': {}", e, output_error);
    }
}

fn execute_config_command<W: OutputWriter + ?Sized>(
    command: ConfigCommand,
    config: &TailConfig,
    config_manager: &ConfigManager,
    writer: &mut W,
) -> TailResult<()> {
    match command {
        ConfigCommand::Show => {
            writer.write_config(config)?;
            Ok(())
        }
        ConfigCommand::Init { path, global } => {
            let path = match (path, global) {
                (Some(path), _) => PathBuf::from(path),
                (None, true) => config_manager
                    .get_global_config_path_ref()
                    .cloned()
                    .ok_or_else(|| TailError::Config {
                        message: "Could not determine home directory".to_string(),
                    })?,
                (None, false) => {
                    let current_dir = std::env::current_dir()?;
                    ConfigManager::project_config_path_in(&current_dir)
                }
            };

            config_manager.init_config(&path)?;
            writer.write_message(&format!("Configuration written to {}", path.display()))?;
            Ok(())
        }
    }
}
