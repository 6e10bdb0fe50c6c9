//! Script grouping and merging.
//!
//! Walks the head's direct children and collects contiguous runs of
//! mergeable `<script>` elements. Each run becomes one bundle on disk: the
//! sources are concatenated in document order, pushed through the JavaScript
//! minifier, and written as `js_script<n>.js`. The run's first element stays
//! in the tree as the anchor and is rewritten to reference the bundle; the
//! rest are detached.
//!
//! What counts as mergeable follows the page's own markup: the script must
//! declare itself JavaScript (`type="text/javascript"` or
//! `language="javascript"`), reference a file via `src`, and that file must
//! exist under the input directory. A declared-JavaScript script that fails
//! the other two checks (inline code, or a dangling `src`) ends the current
//! run and stays untouched, preserving execution order around it. Scripts
//! without the JavaScript marker are invisible to grouping: they neither
//! join nor split a run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ego_tree::NodeId;
use log::debug;
use scraper::Html;

use crate::config::{JAVASCRIPT_LANGUAGE, JAVASCRIPT_TYPE, JS_BUNDLE_STEM};
use crate::dom;
use crate::error_handling::{WarningStats, WarningType};
use crate::minify::Minifier;
use crate::paths;

/// A contiguous run of mergeable `<script>` elements.
#[derive(Debug)]
pub(crate) struct MergeGroup {
    /// First element of the run; stays in the tree and is rewritten to
    /// reference the merged bundle.
    pub(crate) anchor: NodeId,
    /// Later elements of the run; detached once the bundle is written.
    pub(crate) absorbed: Vec<NodeId>,
    /// Absolute paths of the source files, in document order. Always as long
    /// as `absorbed` plus one.
    pub(crate) sources: Vec<PathBuf>,
}

/// Plans the merge groups for the document's head.
///
/// Read-only: the tree is not touched, only node ids and source paths are
/// collected. Groups are returned in document order and are never empty.
pub(crate) fn collect_merge_groups(
    document: &Html,
    head: NodeId,
    input_dir: &Path,
    warnings: &WarningStats,
) -> Vec<MergeGroup> {
    let mut groups: Vec<MergeGroup> = Vec::new();
    let mut current: Option<MergeGroup> = None;

    let Some(head_node) = document.tree.get(head) else {
        return groups;
    };

    for child in head_node.children() {
        let Some(element) = child.value().as_element() else {
            continue;
        };
        if element.name() != "script" {
            continue;
        }

        let declared_javascript = element.attr("type") == Some(JAVASCRIPT_TYPE)
            || element.attr("language") == Some(JAVASCRIPT_LANGUAGE);
        if !declared_javascript {
            // Not a merge candidate, but not a boundary either: templates and
            // other non-executable scripts pass through without splitting runs.
            continue;
        }

        let source = element
            .attr("src")
            .map(|src| paths::normalize_lexically(&input_dir.join(src)));

        match source {
            Some(source) if source.is_file() => match current.as_mut() {
                Some(group) => {
                    group.absorbed.push(child.id());
                    group.sources.push(source);
                }
                None => {
                    current = Some(MergeGroup {
                        anchor: child.id(),
                        absorbed: Vec::new(),
                        sources: vec![source],
                    });
                }
            },
            Some(source) => {
                debug!(
                    "script source {} does not exist; leaving the element and ending its merge run",
                    source.display()
                );
                warnings.increment(WarningType::MissingScriptSource);
                if let Some(group) = current.take() {
                    groups.push(group);
                }
            }
            None => {
                // Inline script: must keep its position relative to the files
                // around it, so the current run ends here.
                if let Some(group) = current.take() {
                    groups.push(group);
                }
            }
        }
    }

    if let Some(group) = current.take() {
        groups.push(group);
    }
    groups
}

/// Writes one bundle per merge group and rewires the document to match.
///
/// Returns the number of bundles written.
pub(crate) fn merge_scripts(
    document: &mut Html,
    groups: &[MergeGroup],
    output_dir: &Path,
    minifier: &dyn Minifier,
) -> Result<usize> {
    for (index, group) in groups.iter().enumerate() {
        let bundle_name = format!("{JS_BUNDLE_STEM}{index}.js");

        let mut merged = Vec::new();
        for source in &group.sources {
            let content = fs::read(source)
                .with_context(|| format!("Failed to read script {}", source.display()))?;
            merged.extend_from_slice(&content);
            merged.push(b'\n');
        }

        let minified = minifier
            .minify(&merged)
            .with_context(|| format!("Failed to minify JavaScript bundle {bundle_name}"))?;

        let bundle_path = output_dir.join(&bundle_name);
        fs::write(&bundle_path, &minified)
            .with_context(|| format!("Failed to write {}", bundle_path.display()))?;
        debug!(
            "wrote {} ({} scripts, {} bytes after minification)",
            bundle_path.display(),
            group.sources.len(),
            minified.len()
        );

        dom::reset_element(
            document,
            group.anchor,
            &[("type", JAVASCRIPT_TYPE), ("src", &bundle_name)],
        );
        for id in &group.absorbed {
            dom::detach(document, *id);
        }
    }

    Ok(groups.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::MinifyError;
    use scraper::Selector;
    use std::fs;

    struct Passthrough;

    impl Minifier for Passthrough {
        fn minify(&self, input: &[u8]) -> Result<Vec<u8>, MinifyError> {
            Ok(input.to_vec())
        }
    }

    fn script_srcs(document: &Html) -> Vec<String> {
        let selector = Selector::parse("head script").unwrap();
        document
            .select(&selector)
            .filter_map(|s| s.value().attr("src").map(str::to_string))
            .collect()
    }

    fn page(head: &str) -> Html {
        Html::parse_document(&format!(
            "<html><head>{}</head><body></body></html>",
            head
        ))
    }

    #[test]
    fn test_contiguous_scripts_form_one_group() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;").unwrap();

        let document = page(
            r#"<script type="text/javascript" src="a.js"></script>
               <script type="text/javascript" src="b.js"></script>"#,
        );
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sources.len(), 2);
        assert_eq!(groups[0].absorbed.len(), 1);
    }

    #[test]
    fn test_inline_script_splits_groups() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;").unwrap();
        fs::write(dir.path().join("c.js"), "var c = 3;").unwrap();

        let document = page(
            r#"<script type="text/javascript" src="a.js"></script>
               <script type="text/javascript" src="b.js"></script>
               <script type="text/javascript">inlineInit();</script>
               <script type="text/javascript" src="c.js"></script>"#,
        );
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sources.len(), 2);
        assert_eq!(groups[1].sources.len(), 1);
        assert_eq!(warnings.total(), 0);
    }

    #[test]
    fn test_missing_source_splits_groups_and_warns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;").unwrap();

        let document = page(
            r#"<script type="text/javascript" src="a.js"></script>
               <script type="text/javascript" src="gone.js"></script>
               <script type="text/javascript" src="b.js"></script>"#,
        );
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        assert_eq!(groups.len(), 2);
        assert_eq!(warnings.count(WarningType::MissingScriptSource), 1);
    }

    #[test]
    fn test_unmarked_scripts_are_invisible_to_grouping() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;").unwrap();
        fs::write(dir.path().join("tpl.js"), "template").unwrap();

        // The text/template script sits between two mergeable ones but has no
        // JavaScript marker, so the run continues across it.
        let document = page(
            r#"<script type="text/javascript" src="a.js"></script>
               <script type="text/template" src="tpl.js"></script>
               <script type="text/javascript" src="b.js"></script>"#,
        );
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sources.len(), 2);
    }

    #[test]
    fn test_language_attribute_marks_javascript() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("legacy.js"), "var legacy = true;").unwrap();

        let document = page(r#"<script language="javascript" src="legacy.js"></script>"#);
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_no_mergeable_scripts_yields_no_groups() {
        let dir = tempfile::tempdir().unwrap();
        let document = page(r#"<script type="text/javascript">onlyInline();</script>"#);
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_merge_scripts_writes_bundles_and_rewrites_anchors() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;").unwrap();
        fs::write(dir.path().join("c.js"), "var c = 3;").unwrap();

        let mut document = page(
            r#"<script type="text/javascript" src="a.js"></script>
               <script type="text/javascript" src="b.js"></script>
               <script type="text/javascript">inlineInit();</script>
               <script type="text/javascript" src="c.js"></script>"#,
        );
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        let bundles = merge_scripts(&mut document, &groups, out.path(), &Passthrough).unwrap();
        assert_eq!(bundles, 2);

        let bundle0 = fs::read_to_string(out.path().join("js_script0.js")).unwrap();
        assert_eq!(bundle0, "var a = 1;\nvar b = 2;\n");
        let bundle1 = fs::read_to_string(out.path().join("js_script1.js")).unwrap();
        assert_eq!(bundle1, "var c = 3;\n");

        // Anchors point at the bundles; absorbed scripts are gone; the inline
        // script keeps its slot between them.
        assert_eq!(script_srcs(&document), vec!["js_script0.js", "js_script1.js"]);
        let selector = Selector::parse("head script").unwrap();
        let scripts: Vec<_> = document.select(&selector).collect();
        assert_eq!(scripts.len(), 3);
        assert_eq!(scripts[1].inner_html(), "inlineInit();");
    }

    #[test]
    fn test_merge_scripts_anchor_attrs_are_exactly_type_and_src() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();

        let mut document =
            page(r#"<script type="text/javascript" src="a.js" defer id="boot"></script>"#);
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        merge_scripts(&mut document, &groups, out.path(), &Passthrough).unwrap();

        let selector = Selector::parse("head script").unwrap();
        let script = document.select(&selector).next().unwrap();
        assert_eq!(script.value().attrs.len(), 2);
        assert_eq!(script.value().attr("type"), Some("text/javascript"));
        assert_eq!(script.value().attr("src"), Some("js_script0.js"));
    }

    #[test]
    fn test_merge_scripts_drops_anchor_inline_content() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;").unwrap();

        // A script can carry both a src and fallback text; the src wins for
        // grouping, and the rewrite resets the element to the bundle
        // reference alone.
        let mut document =
            page(r#"<script type="text/javascript" src="a.js">fallback();</script>"#);
        let head = crate::document::head_id(&document).unwrap();
        let warnings = WarningStats::new();

        let groups = collect_merge_groups(&document, head, dir.path(), &warnings);
        merge_scripts(&mut document, &groups, out.path(), &Passthrough).unwrap();

        let selector = Selector::parse("head script").unwrap();
        let script = document.select(&selector).next().unwrap();
        assert_eq!(script.value().attr("src"), Some("js_script0.js"));
        assert_eq!(script.inner_html(), "");
        assert!(!document.root_element().html().contains("fallback"));
    }
}
