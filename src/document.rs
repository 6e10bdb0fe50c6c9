//! Loading, inspecting, and serializing the HTML document.
//!
//! The document is parsed once up front and carried through the pipeline as
//! a mutable `scraper::Html`; this module owns the operations that concern
//! the document as a whole: reading it from disk, locating the head,
//! preserving the doctype, stripping comments, fixing up the content-type
//! meta tag, and writing the rewritten page back out.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use ego_tree::NodeId;
use scraper::{Html, Node, Selector};

use crate::dom;

// CSS selector strings
const HEAD_SELECTOR_STR: &str = "head";

// Markup for the meta tag declaring the document's content type, inserted
// when the page does not already carry one.
const CONTENT_TYPE_META: &str =
    r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#;

static HEAD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(HEAD_SELECTOR_STR).expect("Failed to parse head selector - this is a bug")
});

/// Reads and parses the input HTML file.
///
/// Parsing itself never fails: html5ever recovers from malformed markup the
/// way browsers do, so the only error here is an unreadable file.
pub fn load_document(path: &Path) -> Result<Html> {
    let markup = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input HTML {}", path.display()))?;
    Ok(Html::parse_document(&markup))
}

/// Returns the node id of the document's `<head>` element.
///
/// The parser synthesizes a head for any document-mode parse, so this only
/// fails on trees built some other way; the error still beats a panic.
pub fn head_id(document: &Html) -> Result<NodeId> {
    document
        .select(&HEAD_SELECTOR)
        .next()
        .map(|element| element.id())
        .ok_or_else(|| anyhow!("document has no <head> element"))
}

/// Reconstructs the document's doctype declaration, if it has one.
///
/// scraper keeps the doctype as a tree node but does not serialize it, so
/// the declaration is captured here and re-emitted verbatim ahead of the
/// markup on write-out.
pub fn doctype_string(document: &Html) -> Option<String> {
    document.tree.root().children().find_map(|child| {
        let Node::Doctype(doctype) = child.value() else {
            return None;
        };
        let name = doctype.name();
        let public_id = doctype.public_id();
        let system_id = doctype.system_id();
        Some(match (public_id.is_empty(), system_id.is_empty()) {
            (true, true) => format!("<!DOCTYPE {name}>"),
            (false, true) => format!("<!DOCTYPE {name} PUBLIC \"{public_id}\">"),
            (false, false) => {
                format!("<!DOCTYPE {name} PUBLIC \"{public_id}\" \"{system_id}\">")
            }
            (true, false) => format!("<!DOCTYPE {name} SYSTEM \"{system_id}\">"),
        })
    })
}

/// Removes every comment node from the document, wherever it appears.
///
/// Returns the number of comments dropped.
pub fn strip_comments(document: &mut Html) -> usize {
    let comment_ids: Vec<NodeId> = document
        .tree
        .root()
        .descendants()
        .filter(|node| node.value().is_comment())
        .map(|node| node.id())
        .collect();

    for id in &comment_ids {
        dom::detach(document, *id);
    }
    comment_ids.len()
}

/// Ensures the head declares its content type.
///
/// If no `<meta http-equiv="Content-Type">` is present among the head's
/// children, one declaring UTF-8 HTML is prepended. Pages served from plain
/// file hosting rely on this tag for charset detection.
pub fn ensure_content_type_meta(document: &mut Html, head: NodeId) {
    let already_declared = document
        .tree
        .get(head)
        .map(|head_node| {
            head_node.children().any(|child| {
                child
                    .value()
                    .as_element()
                    .filter(|element| element.name() == "meta")
                    .and_then(|element| element.attr("http-equiv"))
                    .is_some_and(|value| value.eq_ignore_ascii_case("content-type"))
            })
        })
        .unwrap_or(false);

    if already_declared {
        return;
    }

    if let Some(element) = dom::parse_lone_element(CONTENT_TYPE_META) {
        dom::prepend_element(document, head, element);
    }
}

/// Serializes the document to `path`, with `doctype` (when present) re-emitted
/// on its own line ahead of the markup.
pub fn write_document(document: &Html, doctype: Option<&str>, path: &Path) -> Result<()> {
    let mut out = String::new();
    if let Some(doctype) = doctype {
        out.push_str(doctype);
        out.push('\n');
    }
    out.push_str(&document.root_element().html());
    out.push('\n');

    fs::write(path, out)
        .with_context(|| format!("Failed to write optimized HTML {}", path.display()))?;
    Ok(())
}
