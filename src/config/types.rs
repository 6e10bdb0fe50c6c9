//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace). Used with the `--log-level` CLI option.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options and configuration for one optimization run.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// The compressor jar paths are required; everything else has defaults.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// headpack site/index.htm --output ./dist \
///     --google-closure-compiler tools/compiler.jar \
///     --yuicompressor tools/yuicompressor.jar
///
/// # Writing next to the page (a `release` subdirectory is substituted)
/// headpack site/index.htm --output site \
///     --google-closure-compiler tools/compiler.jar \
///     --yuicompressor tools/yuicompressor.jar
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "headpack",
    about = "Joins the JavaScript and CSS files used by an HTML page into minified bundles and rewrites the page to reference them."
)]
pub struct Config {
    /// HTML file to optimize
    #[arg(value_parser)]
    pub input_html: PathBuf,

    /// Directory that receives the optimized page and its bundles.
    ///
    /// When this resolves to the input page's own directory, a `release`
    /// subdirectory is used instead so the source tree is never overwritten.
    #[arg(long)]
    pub output: PathBuf,

    /// Path to the Google Closure Compiler jar (JavaScript compressor)
    #[arg(long)]
    pub google_closure_compiler: PathBuf,

    /// Path to the YUI Compressor jar (CSS compressor)
    #[arg(long)]
    pub yuicompressor: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}
