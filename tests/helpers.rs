// Shared test helpers for building temporary site trees and in-process
// minifiers.
//
// This module provides common utilities used across multiple test files to
// reduce duplication. The fake minifiers stand in for the Closure Compiler
// and YUI Compressor subprocesses so the pipeline can be exercised without
// Java on the machine.

use std::fs;
use std::path::{Path, PathBuf};

use headpack::{Config, LogFormat, LogLevel, Minifier, MinifyError};

/// Minifier that returns its input unchanged.
///
/// Bundle contents on disk then equal the exact concatenation the pipeline
/// assembled, which is what most assertions want to see.
#[allow(dead_code)] // Used by other test files
pub struct PassthroughMinifier;

impl Minifier for PassthroughMinifier {
    fn minify(&self, input: &[u8]) -> Result<Vec<u8>, MinifyError> {
        Ok(input.to_vec())
    }
}

/// Minifier that uppercases ASCII, proving the written bundle really went
/// through the minification step.
#[allow(dead_code)] // Used by other test files
pub struct UppercaseMinifier;

impl Minifier for UppercaseMinifier {
    fn minify(&self, input: &[u8]) -> Result<Vec<u8>, MinifyError> {
        Ok(input.to_ascii_uppercase())
    }
}

/// Writes `content` to `path`, creating parent directories as needed.
#[allow(dead_code)] // Used by other test files
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write test file");
}

/// Builds a Config pointing at the given page and output directory.
///
/// The compressor jar paths are placeholders: tests drive the pipeline
/// through `optimize_with` and never spawn the real compressors.
#[allow(dead_code)] // Used by other test files
pub fn test_config(input_html: &Path, output: &Path) -> Config {
    Config {
        input_html: input_html.to_path_buf(),
        output: output.to_path_buf(),
        google_closure_compiler: PathBuf::from("unused-compiler.jar"),
        yuicompressor: PathBuf::from("unused-yuicompressor.jar"),
        log_level: LogLevel::Info,
        log_format: LogFormat::Plain,
    }
}
