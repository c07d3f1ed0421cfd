// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OutputFormat};
use crate::app_controller::Controller;
use crate::subtitle::{SubtitleFormat, TimestampParsingOption};

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod markup;
mod subtitle;
mod time_codec;
mod xml_document;
mod xml_text;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Vtt,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => OutputFormat::SubRip,
            CliOutputFormat::Vtt => OutputFormat::WebVtt,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSourceFormat {
    Vtt,
    Ttml,
    Srv3,
    Srt,
}

impl From<CliSourceFormat> for SubtitleFormat {
    fn from(cli_format: CliSourceFormat) -> Self {
        match cli_format {
            CliSourceFormat::Vtt => SubtitleFormat::WebVtt,
            CliSourceFormat::Ttml => SubtitleFormat::Ttml,
            CliSourceFormat::Srv3 => SubtitleFormat::Transcript3,
            CliSourceFormat::Srt => SubtitleFormat::SubRip,
        }
    }
}

/// CLI Wrapper for TimestampParsingOption to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTimestampOption {
    Ignore,
    Split,
    Accumulate,
}

impl From<CliTimestampOption> for TimestampParsingOption {
    fn from(cli_option: CliTimestampOption) -> Self {
        match cli_option {
            CliTimestampOption::Ignore => TimestampParsingOption::Ignore,
            CliTimestampOption::Split => TimestampParsingOption::Split,
            CliTimestampOption::Accumulate => TimestampParsingOption::Accumulate,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert subtitle files to SubRip or cleaned WebVTT (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for yascon
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file path (defaults to the input path with the target extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Target subtitle format
    #[arg(short = 't', long, value_enum)]
    to: Option<CliOutputFormat>,

    /// Source format override (detected from the file when omitted)
    #[arg(short = 's', long, value_enum)]
    source_format: Option<CliSourceFormat>,

    /// How to handle embedded per-word timestamp tags in WebVTT cues
    #[arg(long, value_enum)]
    timestamps: Option<CliTimestampOption>,

    /// Keep only `<lang>` spans matching this ISO language code
    #[arg(short, long)]
    language: Option<String>,

    /// Detect and repair YouTube rolling-caption duplicate lines
    #[arg(short, long)]
    dedupe: bool,

    /// Keep whitespace-only frames in the output
    #[arg(long)]
    keep_empty_frames: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// YASCON - Yet Another Subtitle CONverter
///
/// Normalizes WebVTT, TTML and YouTube Transcript v3 subtitle tracks into
/// SubRip (*.srt) or cleaned WebVTT (*.vtt).
#[derive(Parser, Debug)]
#[command(name = "yascon")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle normalization tool")]
#[command(long_about = "YASCON converts WebVTT, TTML and YouTube Transcript v3 subtitle tracks
to SubRip or cleaned WebVTT, repairing auto-generated caption artifacts on the way.

EXAMPLES:
    yascon captions.vtt                        # Convert to captions.srt
    yascon -t vtt captions.ttml                # Re-emit as cleaned WebVTT
    yascon -d --timestamps accumulate auto.vtt # Repair YouTube auto-captions
    yascon -l en captions.vtt                  # Keep only English <lang> spans
    yascon /subs/                              # Convert a whole directory
    yascon completions bash > yascon.bash      # Generate bash completions

CONFIGURATION:
    Conversion defaults are stored in conf.json. You can specify a different
    config file with --config-path. If the config file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file path (defaults to the input path with the target extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Target subtitle format
    #[arg(short = 't', long, value_enum)]
    to: Option<CliOutputFormat>,

    /// Source format override (detected from the file when omitted)
    #[arg(short = 's', long, value_enum)]
    source_format: Option<CliSourceFormat>,

    /// How to handle embedded per-word timestamp tags in WebVTT cues
    #[arg(long, value_enum)]
    timestamps: Option<CliTimestampOption>,

    /// Keep only `<lang>` spans matching this ISO language code
    #[arg(short, long)]
    language: Option<String>,

    /// Detect and repair YouTube rolling-caption duplicate lines
    #[arg(short, long)]
    dedupe: bool,

    /// Keep whitespace-only frames in the output
    #[arg(long)]
    keep_empty_frames: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yascon", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let convert_args = ConvertArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                to: cli.to,
                source_format: cli.source_format,
                timestamps: cli.timestamps,
                language: cli.language,
                dedupe: cli.dedupe,
                keep_empty_frames: cli.keep_empty_frames,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args)
        }
    }
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(format) = &options.to {
        config.output_format = format.clone().into();
    }
    if let Some(option) = &options.timestamps {
        config.timestamp_parsing = option.clone().into();
    }
    if let Some(language) = &options.language {
        config.language_filter = Some(language.clone());
    }
    if options.dedupe {
        config.detect_youtube_duplicates = true;
    }
    if options.keep_empty_frames {
        config.ignore_empty_frames = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file(s)
    if options.input_path.is_file() {
        controller.run(
            options.input_path.clone(),
            options.output,
            options.force_overwrite,
            options.source_format.map(Into::into),
        )
    } else if options.input_path.is_dir() {
        controller.run_folder(
            options.input_path.clone(),
            options.force_overwrite,
            options.source_format.map(Into::into),
        )
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
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
