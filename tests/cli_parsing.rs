//! Tests for CLI argument parsing.
//!
//! `Config` derives `clap::Parser` directly, so these tests drive the real
//! argument surface with `try_parse_from` rather than a mirror structure.

use clap::Parser;
use headpack::{Config, LogFormat, LogLevel};
use std::path::PathBuf;

fn full_args() -> Vec<&'static str> {
    vec![
        "headpack",
        "site/index.htm",
        "--output",
        "dist",
        "--google-closure-compiler",
        "tools/compiler.jar",
        "--yuicompressor",
        "tools/yuicompressor.jar",
    ]
}

#[test]
fn test_cli_parses_required_arguments() {
    let config = Config::try_parse_from(full_args()).expect("Should parse full argument set");

    assert_eq!(config.input_html, PathBuf::from("site/index.htm"));
    assert_eq!(config.output, PathBuf::from("dist"));
    assert_eq!(
        config.google_closure_compiler,
        PathBuf::from("tools/compiler.jar")
    );
    assert_eq!(config.yuicompressor, PathBuf::from("tools/yuicompressor.jar"));
}

#[test]
fn test_cli_defaults() {
    let config = Config::try_parse_from(full_args()).expect("Should parse full argument set");

    // LogLevel and LogFormat don't implement PartialEq, so we compare via conversion
    assert_eq!(
        log::LevelFilter::from(config.log_level.clone()),
        log::LevelFilter::from(LogLevel::Info)
    );
    match config.log_format {
        LogFormat::Plain => {}
        _ => panic!("Should default to plain format"),
    }
}

#[test]
fn test_cli_log_options() {
    let mut args = full_args();
    args.extend(["--log-level", "debug", "--log-format", "json"]);
    let config = Config::try_parse_from(args).expect("Should parse log options");

    assert_eq!(
        log::LevelFilter::from(config.log_level.clone()),
        log::LevelFilter::from(LogLevel::Debug)
    );
    match config.log_format {
        LogFormat::Json => {}
        _ => panic!("Should be Json format"),
    }
}

#[test]
fn test_cli_missing_input_file_error() {
    let args = [
        "headpack",
        "--output",
        "dist",
        "--google-closure-compiler",
        "c.jar",
        "--yuicompressor",
        "y.jar",
    ];
    let result = Config::try_parse_from(args);

    assert!(result.is_err(), "Should fail without the input page");
}

#[test]
fn test_cli_missing_compressor_error() {
    let args = ["headpack", "site/index.htm", "--output", "dist"];
    let result = Config::try_parse_from(args);

    assert!(result.is_err(), "Should fail without the compressor jars");
    let error_msg = result.unwrap_err().to_string();
    assert!(
        error_msg.contains("google-closure-compiler") || error_msg.contains("required"),
        "Error message should name the missing option: {}",
        error_msg
    );
}

#[test]
fn test_cli_invalid_log_level_error() {
    let mut args = full_args();
    args.extend(["--log-level", "verbose"]);
    let result = Config::try_parse_from(args);

    assert!(result.is_err(), "Should reject unknown log levels");
}
