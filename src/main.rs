// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod build_report;
mod errors;
mod extractor;
mod file_utils;
mod language_utils;
mod providers;
mod reinjector;
mod snippet;
mod translation_service;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    #[value(name = "anthropic")]
    Anthropic,
    #[value(name = "ollama")]
    Ollama,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
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

impl From<&app_config::LogLevel> for LevelFilter {
    fn from(level: &app_config::LogLevel) -> Self {
        match level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a documentation tree using AI providers (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for docwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input directory containing Markdown/MDX documents
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Output directory for masked artifacts and translated documents
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Mask documents without translating them
    #[arg(short = 'e', long)]
    mask_only: bool,

    /// Test the provider connection and exit
    #[arg(long)]
    test_connection: bool,
}

/// docwai - Documentation translation with AI
///
/// Translates Markdown/MDX documentation trees using AI providers while
/// keeping code blocks, tables, tab markup, admonitions and front matter
/// byte-identical.
#[derive(Parser, Debug)]
#[command(name = "docwai")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered documentation translation tool")]
#[command(long_about = "docwai masks the non-translatable regions of Markdown/MDX documents, \
translates the remaining prose with an AI provider, and restores every masked region exactly.

EXAMPLES:
    docwai docs/                                # Translate using default config
    docwai -o dist docs/                        # Write output under dist/
    docwai -p openai -m gpt-4o docs/            # Use specific provider and model
    docwai -s en -t es docs/                    # Translate from English to Spanish
    docwai -e docs/                             # Mask documents without translating
    docwai --test-connection docs/              # Check provider connectivity and exit
    docwai --log-level debug docs/              # Verbose logging
    docwai completions bash > docwai.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic Claude API (requires API key)
    ollama    - Local Ollama server (default: llama3.2:3b)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input directory containing Markdown/MDX documents
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory for masked artifacts and translated documents
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Mask documents without translating them
    #[arg(short = 'e', long)]
    mask_only: bool,

    /// Test the provider connection and exit
    #[arg(long)]
    test_connection: bool,
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
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
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

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "docwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_dir = cli
                .input_dir
                .ok_or_else(|| anyhow!("INPUT_DIR is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_dir,
                output_dir: cli.output_dir,
                provider: cli.provider,
                model: cli.model,
                source_language: cli.source_language,
                target_language: cli.target_language,
                config_path: cli.config_path,
                log_level: cli.log_level,
                mask_only: cli.mask_only,
                test_connection: cli.test_connection,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(LevelFilter::from(&config_log_level));
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

        // Override config with CLI options if provided
        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }

        if let Some(model) = &options.model {
            // Find the provider config and update the model
            let provider_str = config.translation.provider.to_lowercase_string();
            if let Some(provider_config) = config
                .translation
                .available_providers
                .iter_mut()
                .find(|p| p.provider_type == provider_str)
            {
                provider_config.model = model.clone();
            }
        }

        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }

        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let mut config = Config::default();

        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }
        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }
        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }
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
        log::set_max_level(LevelFilter::from(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    if options.test_connection {
        controller.test_connection().await?;
        log::info!("Provider connection test succeeded");
        return Ok(());
    }

    if !options.input_dir.is_dir() {
        return Err(anyhow!(
            "Input path is not a directory: {:?}",
            options.input_dir
        ));
    }

    controller
        .run(options.input_dir, options.output_dir, options.mask_only)
        .await?;

    Ok(())
}
