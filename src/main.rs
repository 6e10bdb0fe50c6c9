//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `headpack` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use headpack::logging::init_logger_with;
use headpack::{optimize, Config};

fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Run the optimization using the library
    match optimize(&config) {
        Ok(report) => {
            // Print user-friendly summary
            println!(
                "✅ Wrote {} script bundle{}, merged {} stylesheet{}, copied {} asset{} in {:.1}s",
                report.script_bundles,
                if report.script_bundles == 1 { "" } else { "s" },
                report.stylesheets_merged,
                if report.stylesheets_merged == 1 {
                    ""
                } else {
                    "s"
                },
                report.css_assets_copied + report.auxiliary_files_copied,
                if report.css_assets_copied + report.auxiliary_files_copied == 1 {
                    ""
                } else {
                    "s"
                },
                report.elapsed_seconds
            );
            println!("Optimized page saved as {}", report.output_html.display());
            if report.warnings > 0 {
                println!(
                    "⚠️ {} missing resource{} - see the log for details",
                    report.warnings,
                    if report.warnings == 1 { "" } else { "s" }
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("headpack error: {:#}", e);
            process::exit(1);
        }
    }
}
