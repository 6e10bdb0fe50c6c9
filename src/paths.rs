//! Path arithmetic shared across the pipeline.
//!
//! All path handling here is lexical: components are folded without touching
//! the filesystem, so dangling references normalize the same way as existing
//! ones. Symlinks are deliberately not resolved.

use std::path::{Component, Path, PathBuf};

use crate::config::RELEASE_SUBDIR;

/// Lexically normalizes a path: drops `.` components and folds `..` onto the
/// preceding normal component where one exists.
///
/// Leading `..` components on a relative path are kept (the path escapes its
/// starting directory), while `..` directly under a root is swallowed since
/// there is nothing above the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolves a path against the current working directory and normalizes it
/// lexically.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    Ok(normalize_lexically(&std::path::absolute(path)?))
}

/// Expresses `target` relative to `base`.
///
/// Both paths are expected to be absolute and normalized; when a relative
/// form cannot be computed the target is returned unchanged.
pub fn relative_to(target: &Path, base: &Path) -> PathBuf {
    pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf())
}

/// Renders a path with forward slashes regardless of platform.
///
/// Rewritten `url(...)` references and bundle names end up in web content,
/// which always uses `/` separators.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Picks the directory output files are written to.
///
/// The requested directory is used as-is unless it coincides with the input
/// page's directory, in which case a `release` subdirectory is substituted.
/// Both arguments must already be absolute and normalized so the comparison
/// is meaningful.
pub fn effective_output_dir(input_dir: &Path, requested: &Path) -> PathBuf {
    if requested == input_dir {
        input_dir.join(RELEASE_SUBDIR)
    } else {
        requested.to_path_buf()
    }
}
