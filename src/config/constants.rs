//! Configuration constants.
//!
//! This module defines the fixed names and attribute markers the optimizer
//! relies on: output bundle names, auxiliary asset names, and the attribute
//! values that identify mergeable elements.

// Output bundle naming
/// File-name stem for merged JavaScript bundles.
/// The n-th merge group (counting from zero) is written as `js_script<n>.js`.
pub const JS_BUNDLE_STEM: &str = "js_script";
/// File name of the merged stylesheet. Written on every run, even when the
/// page references no stylesheets at all.
pub const CSS_BUNDLE_NAME: &str = "css0.css";

// Auxiliary assets copied alongside the page
/// Favicon file copied verbatim from the input root when present.
pub const FAVICON_NAME: &str = "favicon.ico";
/// Localization directory copied recursively from the input root when present.
pub const I18N_DIR_NAME: &str = "i18n";
/// Version-control metadata directories excluded from recursive copies.
pub const VCS_DIR_NAMES: &[&str] = &[".svn", "CVS", ".git"];

/// Subdirectory substituted for the output directory when it would coincide
/// with the input page's directory, so the source tree is never overwritten
/// in place.
pub const RELEASE_SUBDIR: &str = "release";

// Attribute markers for mergeable head elements
/// `type` attribute value identifying an executable script element.
pub const JAVASCRIPT_TYPE: &str = "text/javascript";
/// Legacy `language` attribute value identifying an executable script element.
pub const JAVASCRIPT_LANGUAGE: &str = "javascript";
/// `type` attribute value identifying a stylesheet link element.
pub const CSS_TYPE: &str = "text/css";
