//! Error and warning type definitions.
//!
//! This module defines the typed failures and the missing-resource warning
//! categories used throughout the application.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for minifier subprocess invocations.
///
/// Only spawn and pipe failures are surfaced here. A compressor that starts
/// but exits unsuccessfully is not an error: the pipeline keeps whatever the
/// process wrote to its standard output.
#[derive(Error, Debug)]
pub enum MinifyError {
    /// The external compressor could not be started at all.
    #[error("Failed to spawn minifier `{program}`: {source}")]
    SpawnError {
        /// Program name or path that was invoked.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The child process was started without a stdin pipe.
    #[error("Minifier `{0}` has no stdin pipe")]
    StdinUnavailable(String),

    /// Reading the compressor's output failed.
    #[error("Minifier I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Types of warnings that can occur while optimizing a page.
///
/// Warnings indicate referenced resources that were absent on disk. They
/// never abort the run; the affected reference is skipped or left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
#[allow(clippy::enum_variant_names)] // All variants share the "Missing" prefix
pub enum WarningType {
    MissingScriptSource, // A head script's src file was absent; its merge run ended there
    MissingStylesheet,   // A stylesheet link's href file was absent; the link was left alone
    MissingCssResource,  // A url(...) reference inside a stylesheet did not resolve
    MissingFavicon,      // No favicon.ico at the input root
    MissingI18nDir,      // No i18n directory at the input root
}

impl std::fmt::Display for WarningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MissingScriptSource => "Missing script source",
            WarningType::MissingStylesheet => "Missing stylesheet",
            WarningType::MissingCssResource => "Missing CSS resource",
            WarningType::MissingFavicon => "Missing favicon",
            WarningType::MissingI18nDir => "Missing i18n directory",
        }
    }
}
