//! headpack library: static HTML page optimization
//!
//! This library takes an HTML page together with the JavaScript, CSS, and
//! auxiliary assets it references and produces a deployable copy in which
//! contiguous runs of head scripts are concatenated and minified into
//! numbered bundles, all stylesheets are merged into one bundle with their
//! `url(...)` references rewritten, comments are stripped, and the favicon
//! and localization files are carried along.
//!
//! Minification is delegated to external compressors (Google Closure
//! Compiler for JavaScript, YUI Compressor for CSS) invoked as subprocesses,
//! or to any other [`Minifier`] implementation supplied by the caller.
//!
//! # Example
//!
//! ```no_run
//! use headpack::{optimize, Config, LogFormat, LogLevel};
//! use std::path::PathBuf;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     input_html: PathBuf::from("site/index.htm"),
//!     output: PathBuf::from("site/dist"),
//!     google_closure_compiler: PathBuf::from("tools/compiler.jar"),
//!     yuicompressor: PathBuf::from("tools/yuicompressor.jar"),
//!     log_level: LogLevel::Info,
//!     log_format: LogFormat::Plain,
//! };
//!
//! let report = optimize(&config)?;
//! println!(
//!     "{} script bundles, {} stylesheets merged",
//!     report.script_bundles, report.stylesheets_merged
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assets;
pub mod config;
mod document;
mod dom;
mod error_handling;
pub mod logging;
mod minify;
mod paths;
mod scripts;
mod styles;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{InitializationError, MinifyError, WarningStats, WarningType};
pub use minify::{CommandMinifier, Minifier};
pub use run::{optimize, optimize_with, OptimizeReport};

// Internal run module (contains the main optimization pipeline)
mod run {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Instant;

    use anyhow::{anyhow, Context, Result};
    use log::info;

    use crate::assets;
    use crate::config::Config;
    use crate::document;
    use crate::error_handling::WarningStats;
    use crate::minify::{CommandMinifier, Minifier};
    use crate::paths;
    use crate::scripts;
    use crate::styles;

    /// Results of one optimization run.
    ///
    /// Contains summary counts and the location of the rewritten page.
    #[derive(Debug, Clone)]
    pub struct OptimizeReport {
        /// Number of merged JavaScript bundles written
        pub script_bundles: usize,
        /// Number of stylesheets merged into the css bundle
        pub stylesheets_merged: usize,
        /// Number of css-referenced assets copied into the output tree
        pub css_assets_copied: usize,
        /// Number of auxiliary files copied (favicon, i18n)
        pub auxiliary_files_copied: usize,
        /// Number of HTML comments stripped from the page
        pub comments_stripped: usize,
        /// Total missing-resource warnings recorded
        pub warnings: usize,
        /// Path of the rewritten HTML file
        pub output_html: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Optimizes the configured page using the configured compressor jars.
    ///
    /// This is the main entry point for the library: it wires up the stock
    /// Closure Compiler and YUI Compressor subprocess minifiers and runs the
    /// full pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the input page cannot be read, the output tree
    /// cannot be written, or a compressor process cannot be started. Missing
    /// referenced resources are warnings, not errors; their counts end up in
    /// the report.
    pub fn optimize(config: &Config) -> Result<OptimizeReport> {
        let js_minifier = CommandMinifier::closure_compiler(&config.google_closure_compiler);
        let css_minifier = CommandMinifier::yuicompressor(&config.yuicompressor);
        optimize_with(config, &js_minifier, &css_minifier)
    }

    /// Optimizes the configured page with caller-supplied minifiers.
    ///
    /// Everything else matches [`optimize`]; this seam exists so callers can
    /// substitute an in-process or no-op minifier, which is also how the
    /// pipeline is tested without Java on the machine.
    pub fn optimize_with(
        config: &Config,
        js_minifier: &dyn Minifier,
        css_minifier: &dyn Minifier,
    ) -> Result<OptimizeReport> {
        let start_time = Instant::now();

        let input_html = paths::absolutize(&config.input_html).with_context(|| {
            format!("Failed to resolve input path {}", config.input_html.display())
        })?;
        let input_dir = input_html
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("input HTML file has no parent directory"))?;

        let requested_output = paths::absolutize(&config.output).with_context(|| {
            format!("Failed to resolve output path {}", config.output.display())
        })?;
        let output_dir = paths::effective_output_dir(&input_dir, &requested_output);
        if output_dir != requested_output {
            info!(
                "output directory equals the input directory; writing to {}",
                output_dir.display()
            );
        }
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        info!("Optimizing {}", input_html.display());

        let mut page = document::load_document(&input_html)?;
        let head = document::head_id(&page)?;
        // Captured before any rewriting; re-emitted verbatim on write-out.
        let doctype = document::doctype_string(&page);

        let warnings = WarningStats::new();

        let script_groups = scripts::collect_merge_groups(&page, head, &input_dir, &warnings);
        let script_bundles = scripts::merge_scripts(&mut page, &script_groups, &output_dir, js_minifier)?;

        let stylesheet_plan = styles::collect_stylesheets(&page, head, &input_dir, &warnings);
        let stylesheet_outcome = styles::merge_stylesheets(
            &mut page,
            &stylesheet_plan,
            &input_dir,
            &output_dir,
            css_minifier,
            &warnings,
        )?;

        let auxiliary_files_copied =
            assets::copy_auxiliary_assets(&input_dir, &output_dir, &warnings)?;

        let comments_stripped = document::strip_comments(&mut page);
        document::ensure_content_type_meta(&mut page, head);

        let file_name = input_html
            .file_name()
            .ok_or_else(|| anyhow!("input HTML path has no file name"))?;
        let output_html = output_dir.join(file_name);
        document::write_document(&page, doctype.as_deref(), &output_html)?;

        warnings.log_summary();

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        info!(
            "Optimized page written to {} in {:.1}s",
            output_html.display(),
            elapsed_seconds
        );

        Ok(OptimizeReport {
            script_bundles,
            stylesheets_merged: stylesheet_outcome.merged,
            css_assets_copied: stylesheet_outcome.assets_copied,
            auxiliary_files_copied,
            comments_stripped,
            warnings: warnings.total(),
            output_html,
            elapsed_seconds,
        })
    }
}
