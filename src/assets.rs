//! Auxiliary asset copying.
//!
//! Two fixed assets travel with the page besides its bundles: the favicon
//! and the localization directory. Both are optional; their absence is a
//! warning, not an error. The i18n directory is replaced wholesale in the
//! output so removed translations do not linger, and version-control
//! metadata directories are skipped during the walk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{FAVICON_NAME, I18N_DIR_NAME, VCS_DIR_NAMES};
use crate::error_handling::{WarningStats, WarningType};

/// Copies the favicon and i18n directory from the input root to the output
/// root.
///
/// Returns the number of files copied.
pub(crate) fn copy_auxiliary_assets(
    input_dir: &Path,
    output_dir: &Path,
    warnings: &WarningStats,
) -> Result<usize> {
    let mut copied = 0;

    let favicon = input_dir.join(FAVICON_NAME);
    if favicon.is_file() {
        let destination = output_dir.join(FAVICON_NAME);
        fs::copy(&favicon, &destination).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                favicon.display(),
                destination.display()
            )
        })?;
        copied += 1;
    } else {
        warn!("no {} in {}; skipping", FAVICON_NAME, input_dir.display());
        warnings.increment(WarningType::MissingFavicon);
    }

    let i18n_source = input_dir.join(I18N_DIR_NAME);
    if i18n_source.is_dir() {
        let i18n_destination = output_dir.join(I18N_DIR_NAME);
        // Replace, don't overlay: stale files from a previous run must go.
        if i18n_destination.exists() {
            fs::remove_dir_all(&i18n_destination).with_context(|| {
                format!("Failed to remove stale {}", i18n_destination.display())
            })?;
        }
        let files = copy_dir_filtered(&i18n_source, &i18n_destination)?;
        debug!(
            "copied {} ({} files)",
            i18n_destination.display(),
            files
        );
        copied += files;
    } else {
        warn!(
            "no {} directory in {}; skipping",
            I18N_DIR_NAME,
            input_dir.display()
        );
        warnings.increment(WarningType::MissingI18nDir);
    }

    Ok(copied)
}

/// Recursively copies `source` to `destination`, skipping version-control
/// metadata directories. Returns the number of files copied.
fn copy_dir_filtered(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source)
        .into_iter()
        .filter_entry(|entry| !is_vcs_dir(entry))
    {
        let entry =
            entry.with_context(|| format!("Failed to walk directory {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Walked entry escapes {}", source.display()))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| VCS_DIR_NAMES.contains(&name))
            .unwrap_or(false)
}
