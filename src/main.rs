// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, error, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::io::BufReader;
use std::fs::File;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::errors::PromptError;
use crate::interaction::{Chooser, ConsoleChooser, MenuChooser};

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod interaction;
mod language_utils;
mod subtitle_document;
mod subtitle_merger;
mod track_extractor;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Parser, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Use the plain console front end instead of the menu picker
    #[arg(long)]
    console: bool,
}

#[derive(Parser, Debug)]
struct BatchCliArgs {
    /// The directory to process
    #[arg(short, long, default_value = ".")]
    directory_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract a subtitle track from a container file
    Extract(CommonArgs),

    /// Merge an additional subtitle file into an original subtitle file
    Merge(CommonArgs),

    /// Extract from a container, then merge an additional subtitle file
    Full(CommonArgs),

    /// Process a directory of containers, picking the directory interactively
    Batch(CommonArgs),

    /// Process a directory of containers without any directory picker
    BatchCli(BatchCliArgs),

    /// Generate shell completions for submerge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// submerge - subtitle track extraction and overlap-aware merging
///
/// Extracts a subtitle track from a container media file and merges an
/// externally supplied subtitle file into it, repositioning the imported
/// stream so simultaneous on-screen text does not collide.
#[derive(Parser, Debug)]
#[command(name = "submerge")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle extraction and merge tool")]
#[command(long_about = "submerge extracts subtitle tracks from container files and merges external
subtitle files into them, producing one combined document with adjusted
vertical positioning.

EXAMPLES:
    submerge extract                  # Pick a container and a track to extract
    submerge merge                    # Pick two subtitle files and merge them
    submerge full                     # Extract from a container, then merge
    submerge batch                    # Pick a directory and process every container
    submerge batch-cli -d /shows/s1   # Process a directory without pickers
    submerge completions bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "submerge", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Extract(common) => {
            let controller = build_controller(&common)?;
            controller.run_extract().await
        }
        Commands::Merge(common) => {
            let controller = build_controller(&common)?;
            controller.run_merge().await
        }
        Commands::Full(common) => {
            let controller = build_controller(&common)?;
            controller.run_full().await
        }
        Commands::Batch(common) => {
            let controller = build_controller(&common)?;
            controller.run_batch().await
        }
        Commands::BatchCli(args) => {
            let controller = build_controller(&args.common)?;
            controller.run_batch_cli(&args.directory_path).await
        }
    };

    // A cancelled prompt terminates cleanly with exit code 1, anything
    // else propagates as a terminating failure
    if let Err(e) = result {
        if let Some(cancelled) = e.downcast_ref::<PromptError>() {
            error!("Error: {}", cancelled);
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}

/// Load or create the configuration, apply CLI overrides, build the controller
fn build_controller(options: &CommonArgs) -> Result<Controller> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let chooser: Box<dyn Chooser> = if options.console {
        Box::new(ConsoleChooser)
    } else {
        Box::new(MenuChooser)
    };

    Controller::with_config(config, chooser)
}
