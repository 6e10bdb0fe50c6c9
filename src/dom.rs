//! Small editing helpers over the scraper document tree.
//!
//! `scraper` exposes its parsed document as a public `ego_tree::Tree<Node>`,
//! which is what makes in-place rewriting possible: the pipeline first plans
//! its edits against immutable traversals, collecting `NodeId`s, then applies
//! them here through `get_mut`. Node ids stay valid across detaches, so a
//! plan computed up front can be applied in any order.

use ego_tree::NodeId;
use html5ever::{namespace_url, ns, LocalName, QualName};
use scraper::node::Element;
use scraper::{Html, Node};

/// Builds the qualified name under which an attribute is stored.
///
/// Attributes parsed from HTML live in the null namespace with a lowercased
/// local name, so lookups and writes must use the same shape.
fn attr_name(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}

/// Resets an element to exactly the given (name, value) attribute pairs and
/// no content: existing children are detached along with the old attributes.
///
/// Used on anchor elements: the rewritten `<script>`/`<link>` carries only
/// the attributes that describe the merged bundle. Attributes serialize in
/// the order given here.
pub fn reset_element(document: &mut Html, id: NodeId, attrs: &[(&str, &str)]) {
    let child_ids: Vec<NodeId> = document
        .tree
        .get(id)
        .map(|node| node.children().map(|child| child.id()).collect())
        .unwrap_or_default();
    for child_id in child_ids {
        detach(document, child_id);
    }

    if let Some(mut node) = document.tree.get_mut(id) {
        if let Node::Element(element) = node.value() {
            element.attrs.clear();
            for (name, value) in attrs {
                element.attrs.insert(attr_name(name), (*value).into());
            }
        }
    }
}

/// Detaches a node (and its whole subtree) from the document.
///
/// The node stays alive inside the tree's arena but no longer has a parent,
/// so it disappears from traversals and serialization.
pub fn detach(document: &mut Html, id: NodeId) {
    if let Some(mut node) = document.tree.get_mut(id) {
        node.detach();
    }
}

/// Prepends `element` as the first child of `parent`.
pub fn prepend_element(document: &mut Html, parent: NodeId, element: Element) {
    if let Some(mut node) = document.tree.get_mut(parent) {
        node.prepend(Node::Element(element));
    }
}

/// Parses a fragment expected to contain a single element and returns a copy
/// of that element, detached from any tree.
///
/// This is how new nodes are minted: scraper's own parser builds the
/// element, and the clone can then be inserted wherever needed.
pub fn parse_lone_element(fragment: &str) -> Option<Element> {
    let parsed = Html::parse_fragment(fragment);
    parsed
        .root_element()
        .children()
        .find_map(|child| child.value().as_element().cloned())
}
