//! Stylesheet merging and `url(...)` resource rewriting.
//!
//! All `<link type="text/css">` elements in the head whose files exist are
//! merged, in document order, into a single `css0.css` bundle. The first
//! such link stays in the tree and is rewritten to reference the bundle;
//! the rest are detached. The bundle is written on every run, even when the
//! page references no stylesheets at all, so the output tree always has the
//! same shape.
//!
//! Because the merged file lives in the output root rather than next to the
//! original stylesheet, every `url(...)` inside the merged text is rewritten
//! to a path relative to the output directory, and the referenced asset is
//! copied into the output tree under the stylesheet's own subdirectory. An
//! asset referenced by several rules or several stylesheets is copied once.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use ego_tree::NodeId;
use log::{debug, warn};
use regex::{Captures, Regex};
use scraper::Html;

use crate::config::{CSS_BUNDLE_NAME, CSS_TYPE};
use crate::dom;
use crate::error_handling::{WarningStats, WarningType};
use crate::minify::Minifier;
use crate::paths;

// Matches the parenthesized argument of a CSS url() token, quotes included.
// Lazy so adjacent references on one line stay separate matches.
const CSS_URL_PATTERN_STR: &str = r"url\((.*?)\)";

static CSS_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CSS_URL_PATTERN_STR).expect("Failed to compile css url pattern - this is a bug")
});

/// The stylesheet links selected for merging.
#[derive(Debug)]
pub(crate) struct StylesheetPlan {
    /// First mergeable link; stays in the tree and is rewritten to reference
    /// the bundle. `None` when the head has no mergeable stylesheet links.
    pub(crate) anchor: Option<NodeId>,
    /// Remaining mergeable links; detached once the bundle is written.
    pub(crate) detached: Vec<NodeId>,
    /// Absolute paths of the stylesheet files, in document order.
    pub(crate) sources: Vec<PathBuf>,
}

/// Result of writing the merged stylesheet.
#[derive(Debug)]
pub(crate) struct StylesheetOutcome {
    /// Number of stylesheets merged into the bundle.
    pub(crate) merged: usize,
    /// Number of `url(...)` assets copied into the output tree.
    pub(crate) assets_copied: usize,
}

/// Plans the stylesheet merge for the document's head.
///
/// Read-only, like the script planner: the tree is not touched. A link whose
/// file is absent is left alone and counted as a warning; unlike scripts,
/// stylesheet order is not load-bearing, so a gap does not split the merge.
pub(crate) fn collect_stylesheets(
    document: &Html,
    head: NodeId,
    input_dir: &Path,
    warnings: &WarningStats,
) -> StylesheetPlan {
    let mut plan = StylesheetPlan {
        anchor: None,
        detached: Vec::new(),
        sources: Vec::new(),
    };

    let Some(head_node) = document.tree.get(head) else {
        return plan;
    };

    for child in head_node.children() {
        let Some(element) = child.value().as_element() else {
            continue;
        };
        if element.name() != "link" || element.attr("type") != Some(CSS_TYPE) {
            continue;
        }
        let Some(href) = element.attr("href") else {
            continue;
        };

        let source = paths::normalize_lexically(&input_dir.join(href));
        if !source.is_file() {
            debug!(
                "stylesheet {} does not exist; leaving the link untouched",
                source.display()
            );
            warnings.increment(WarningType::MissingStylesheet);
            continue;
        }

        if plan.anchor.is_none() {
            plan.anchor = Some(child.id());
        } else {
            plan.detached.push(child.id());
        }
        plan.sources.push(source);
    }

    plan
}

/// Merges the planned stylesheets into the output bundle and rewires the
/// document to match.
pub(crate) fn merge_stylesheets(
    document: &mut Html,
    plan: &StylesheetPlan,
    input_dir: &Path,
    output_dir: &Path,
    minifier: &dyn Minifier,
    warnings: &WarningStats,
) -> Result<StylesheetOutcome> {
    let mut rewriter = CssResourceRewriter::new(input_dir, output_dir);
    let mut merged = String::new();

    for source in &plan.sources {
        let content = fs::read_to_string(source)
            .with_context(|| format!("Failed to read stylesheet {}", source.display()))?;
        let css_dir = source.parent().unwrap_or(input_dir);
        merged.push_str(&rewriter.rewrite(&content, css_dir, warnings));
        merged.push('\n');
        if let Some(error) = rewriter.take_failure() {
            return Err(error);
        }
    }

    // The bundle is written unconditionally; an empty page yields an empty
    // (minified) css0.css.
    let minified = minifier
        .minify(merged.as_bytes())
        .context("Failed to minify merged stylesheet")?;
    let bundle_path = output_dir.join(CSS_BUNDLE_NAME);
    fs::write(&bundle_path, &minified)
        .with_context(|| format!("Failed to write {}", bundle_path.display()))?;
    debug!(
        "wrote {} ({} stylesheets, {} bytes after minification)",
        bundle_path.display(),
        plan.sources.len(),
        minified.len()
    );

    if let Some(anchor) = plan.anchor {
        dom::reset_element(
            document,
            anchor,
            &[
                ("type", CSS_TYPE),
                ("rel", "stylesheet"),
                ("href", CSS_BUNDLE_NAME),
            ],
        );
    }
    for id in &plan.detached {
        dom::detach(document, *id);
    }

    Ok(StylesheetOutcome {
        merged: plan.sources.len(),
        assets_copied: rewriter.copied,
    })
}

/// Rewrites `url(...)` references and mirrors their assets into the output
/// tree.
///
/// Used as a stateful replacement callback over the url pattern: the copy
/// count and the first filesystem failure accumulate across matches, since
/// the regex replacement itself has no error channel.
struct CssResourceRewriter<'a> {
    input_dir: &'a Path,
    output_dir: &'a Path,
    copied: usize,
    failure: Option<anyhow::Error>,
}

impl<'a> CssResourceRewriter<'a> {
    fn new(input_dir: &'a Path, output_dir: &'a Path) -> Self {
        CssResourceRewriter {
            input_dir,
            output_dir,
            copied: 0,
            failure: None,
        }
    }

    /// Rewrites every `url(...)` in `css`, which was read from a file in
    /// `css_dir`.
    fn rewrite(&mut self, css: &str, css_dir: &Path, warnings: &WarningStats) -> String {
        CSS_URL_PATTERN
            .replace_all(css, |caps: &Captures| {
                format!("url({})", self.rewrite_url(&caps[1], css_dir, warnings))
            })
            .into_owned()
    }

    /// Maps one url() argument. Returns the rewritten reference, or the raw
    /// argument unchanged (quotes and all) when the asset cannot be resolved.
    fn rewrite_url(&mut self, raw: &str, css_dir: &Path, warnings: &WarningStats) -> String {
        let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        let asset_rel = Path::new(trimmed);

        let source = paths::normalize_lexically(&css_dir.join(asset_rel));
        if !source.is_file() {
            warn!(
                "css resource {} (referenced from {}) does not exist; reference left unchanged",
                source.display(),
                css_dir.display()
            );
            warnings.increment(WarningType::MissingCssResource);
            return raw.to_string();
        }

        // The asset keeps its position relative to its stylesheet: the
        // stylesheet's directory, re-rooted under the output directory.
        let css_dir_rel = paths::relative_to(css_dir, self.input_dir);
        let destination =
            paths::normalize_lexically(&self.output_dir.join(css_dir_rel).join(asset_rel));
        if !destination.is_file() {
            if let Err(error) = copy_asset(&source, &destination) {
                self.failure.get_or_insert(error);
                return raw.to_string();
            }
            self.copied += 1;
        }

        paths::to_forward_slashes(&paths::relative_to(&destination, self.output_dir))
    }

    /// Takes the first filesystem failure recorded while rewriting, if any.
    fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }
}

fn copy_asset(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(source, destination).with_context(|| {
        format!(
            "Failed to copy css resource {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}
