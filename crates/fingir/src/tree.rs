//! Deterministic virtual node trees.
//!
//! Two tree shapes back the fake host: a [`SyntheticTree`] generator that
//! answers structural queries as a pure function of its `max_id` parameter,
//! and an explicit [`ContentTree`] of [`VirtualNode`]s installed by tests.
//! All lookups are O(1) and total — out-of-range ids degrade to a leaf with
//! no children rather than erroring. That forgiveness diverges from a real
//! accessibility backend, which rejects unknown ids; tests relying on
//! rejection must assert through the content tree instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text prefix every synthetic node's content starts with.
///
/// The id suffix guarantees uniqueness per node for assertion purposes.
pub const SYNTHETIC_TEXT_PREFIX: &str = "Some text ";

/// Identifier for a virtual node. Real nodes have `id > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// =============================================================================
// SYNTHETIC TREE
// =============================================================================

/// Pure generator answering structural queries without a real backend.
///
/// The shape is deliberately degenerate: node `n` has the single child
/// `n + 1` until `max_id`, producing a linear chain that is sufficient for
/// traversal tests and nothing like real tree topology. Two instances with
/// the same `max_id` are interchangeable — there is no hidden state, so
/// tests can construct independent trees freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticTree {
    root_id: NodeId,
    max_id: u32,
}

impl SyntheticTree {
    /// Create a generator whose chain ends at `max_id`.
    #[must_use]
    pub const fn new(max_id: u32) -> Self {
        Self {
            root_id: NodeId(1),
            max_id,
        }
    }

    /// Root of the chain (always node 1).
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// The id past which every node is a leaf.
    #[must_use]
    pub const fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Children of `id`: the single node `id + 1`, or nothing at or past
    /// the end of the chain.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        if id.get() >= self.max_id {
            Vec::new()
        } else {
            vec![NodeId(id.get() + 1)]
        }
    }

    /// Whether `id` has no children. Ids past `max_id` are leaves too.
    #[must_use]
    pub const fn is_leaf(&self, id: NodeId) -> bool {
        id.get() >= self.max_id
    }

    /// HTML tag for `id`: `"div"` for odd ids, empty (inline text) for even
    /// ids, so both block and inline rendering paths get exercised.
    #[must_use]
    pub const fn tag_of(&self, id: NodeId) -> &'static str {
        if id.get() % 2 == 1 {
            "div"
        } else {
            ""
        }
    }

    /// Text content for `id`, unique per node.
    #[must_use]
    pub fn text_of(&self, id: NodeId) -> String {
        format!("{SYNTHETIC_TEXT_PREFIX}{id}")
    }

    /// Language tag for `id`. Fixed for determinism.
    #[must_use]
    pub const fn language_of(&self, _id: NodeId) -> &'static str {
        "en"
    }

    /// Text direction for `id`. Fixed for determinism.
    #[must_use]
    pub const fn direction_of(&self, _id: NodeId) -> &'static str {
        "ltr"
    }

    /// Link URL for `id`. Synthetic nodes are never links.
    #[must_use]
    pub const fn url_of(&self, _id: NodeId) -> Option<&'static str> {
        None
    }
}

// =============================================================================
// CONTENT TREE
// =============================================================================

/// A node in an explicitly-installed content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualNode {
    /// Node identifier (`id > 0`)
    pub id: NodeId,
    /// Role or HTML tag ("div", "a", "p", or empty for inline text)
    pub tag: String,
    /// Text content
    pub text: String,
    /// Child node ids, in document order
    pub children: Vec<NodeId>,
    /// Language tag
    pub language: String,
    /// Text direction ("ltr"/"rtl")
    pub direction: String,
    /// Link URL, if this node is a link
    pub url: Option<String>,
}

impl VirtualNode {
    /// Create a node with the given id, tag, and text; remaining attributes
    /// take deterministic defaults.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            text: text.into(),
            children: Vec::new(),
            language: "en".to_string(),
            direction: "ltr".to_string(),
            url: None,
        }
    }

    /// Attach child ids.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = u32>) -> Self {
        self.children = children.into_iter().map(NodeId).collect();
        self
    }

    /// Mark this node as a link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the language tag.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// An explicit node-backed tree, owned exclusively by the fake host.
///
/// Installed via the host's test-only content setter together with the set
/// of node ids considered distillable content.
#[derive(Debug, Clone, Default)]
pub struct ContentTree {
    nodes: HashMap<NodeId, VirtualNode>,
    root_id: Option<NodeId>,
    content_node_ids: Vec<NodeId>,
}

impl ContentTree {
    /// Build a tree from nodes. The first node is the root.
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = VirtualNode>) -> Self {
        let mut map = HashMap::new();
        let mut root_id = None;
        for node in nodes {
            if root_id.is_none() {
                root_id = Some(node.id);
            }
            let _ = map.insert(node.id, node);
        }
        Self {
            nodes: map,
            root_id,
            content_node_ids: Vec::new(),
        }
    }

    /// Set the ids treated as distilled content.
    #[must_use]
    pub fn with_content_node_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.content_node_ids = ids.into_iter().map(NodeId).collect();
        self
    }

    /// Root node id, if any nodes were installed.
    #[must_use]
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Ids treated as distilled content.
    #[must_use]
    pub fn content_node_ids(&self) -> &[NodeId] {
        &self.content_node_ids
    }

    /// Look up a node. Total at the call sites below; exposed for tests
    /// that need the full attribute set.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&VirtualNode> {
        self.nodes.get(&id)
    }

    /// Children of `id`; unknown ids are leaves.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Whether `id` has no children; unknown ids are leaves.
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes.get(&id).map_or(true, |n| n.children.is_empty())
    }

    /// Tag of `id`; unknown ids yield the empty string.
    #[must_use]
    pub fn tag_of(&self, id: NodeId) -> String {
        self.nodes.get(&id).map(|n| n.tag.clone()).unwrap_or_default()
    }

    /// Text of `id`; unknown ids yield the empty string.
    #[must_use]
    pub fn text_of(&self, id: NodeId) -> String {
        self.nodes.get(&id).map(|n| n.text.clone()).unwrap_or_default()
    }

    /// Language of `id`; unknown ids yield the empty string.
    #[must_use]
    pub fn language_of(&self, id: NodeId) -> String {
        self.nodes
            .get(&id)
            .map(|n| n.language.clone())
            .unwrap_or_default()
    }

    /// Link URL of `id`, if the node exists and is a link.
    #[must_use]
    pub fn url_of(&self, id: NodeId) -> Option<String> {
        self.nodes.get(&id).and_then(|n| n.url.clone())
    }
}
