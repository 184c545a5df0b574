//! Drop-in fake host binding.
//!
//! [`FakeReadingHost`] is the substitute object handed to production UI code
//! in place of its privileged host API: settings accessors, virtual-tree
//! accessors, lifecycle notification sinks, and a scripted fault queue, all
//! behind one injected value. Hosts are plain values — construct as many
//! independent ones as a test needs; there is no global to rebind and no
//! teardown-order discipline.
//!
//! Methods carrying the `_for_testing` suffix exist only on this fake
//! surface, never on the real host API. Production code must not depend on
//! them.

use crate::fault::{FaultQueue, Scripted};
use crate::sink::{EventSink, Selection};
use crate::state::HostState;
use crate::tree::{ContentTree, NodeId, SyntheticTree};

/// Default chain length for the synthetic tree a fresh host starts with.
pub const DEFAULT_MAX_NODE_ID: u32 = 10;

/// Which tree answers structural queries.
#[derive(Debug, Clone)]
enum TreeBacking {
    Synthetic(SyntheticTree),
    Content(ContentTree),
}

/// Deterministic substitute for the privileged reading-mode host binding.
#[derive(Debug)]
pub struct FakeReadingHost {
    state: HostState,
    tree: TreeBacking,
    sink: EventSink,
    faults: FaultQueue,
}

impl Default for FakeReadingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeReadingHost {
    /// Create a host with default settings and a synthetic tree of
    /// [`DEFAULT_MAX_NODE_ID`] nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_synthetic_tree(DEFAULT_MAX_NODE_ID)
    }

    /// Create a host whose synthetic tree ends at `max_id`.
    #[must_use]
    pub fn with_synthetic_tree(max_id: u32) -> Self {
        Self {
            state: HostState::new(),
            tree: TreeBacking::Synthetic(SyntheticTree::new(max_id)),
            sink: EventSink::new(),
            faults: FaultQueue::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Component access
    // -------------------------------------------------------------------------

    /// Settings container (read side).
    #[must_use]
    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Settings container (write side).
    pub fn state_mut(&mut self) -> &mut HostState {
        &mut self.state
    }

    /// Event sink, for installing per-test hook overrides.
    pub fn sink_mut(&mut self) -> &mut EventSink {
        &mut self.sink
    }

    /// Fault queue, for arming one-shot overrides on host operations.
    pub fn faults_mut(&mut self) -> &mut FaultQueue {
        &mut self.faults
    }

    /// Consume any armed override for a host operation. Production-facing
    /// shims call this at the top of the operations they fake.
    pub fn take_scripted(&mut self, operation: &str) -> Option<Scripted> {
        self.faults.take(operation)
    }

    // -------------------------------------------------------------------------
    // Settings surface (mirrors the real binding's names)
    // -------------------------------------------------------------------------

    /// Current font family.
    #[must_use]
    pub fn font_name(&self) -> String {
        self.state.font_name()
    }

    /// Set the font family.
    pub fn set_font_name(&mut self, name: impl Into<String>) {
        self.state.set_font_name(name);
    }

    /// Current font size in pixels.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.state.font_size()
    }

    /// Set the font size.
    pub fn set_font_size(&mut self, size: f64) {
        self.state.set_font_size(size);
    }

    /// Current line spacing category.
    #[must_use]
    pub fn line_spacing(&self) -> f64 {
        self.state.line_spacing()
    }

    /// Set the line spacing category.
    pub fn set_line_spacing(&mut self, category: f64) {
        self.state.set_line_spacing(category);
    }

    /// Current letter spacing category.
    #[must_use]
    pub fn letter_spacing(&self) -> f64 {
        self.state.letter_spacing()
    }

    /// Set the letter spacing category.
    pub fn set_letter_spacing(&mut self, category: f64) {
        self.state.set_letter_spacing(category);
    }

    /// Current color theme.
    #[must_use]
    pub fn color_theme(&self) -> f64 {
        self.state.color_theme()
    }

    /// Current speech rate.
    #[must_use]
    pub fn speech_rate(&self) -> f64 {
        self.state.speech_rate()
    }

    /// Set the speech rate.
    pub fn set_speech_rate(&mut self, rate: f64) {
        self.state.set_speech_rate(rate);
    }

    /// Current highlight granularity.
    #[must_use]
    pub fn highlight_granularity(&self) -> f64 {
        self.state.highlight_granularity()
    }

    /// Set the highlight granularity.
    pub fn set_highlight_granularity(&mut self, granularity: f64) {
        self.state.set_highlight_granularity(granularity);
    }

    /// Whether links render as links.
    #[must_use]
    pub fn links_enabled(&self) -> bool {
        self.state.links_enabled()
    }

    /// Enable or disable link rendering.
    pub fn set_links_enabled(&mut self, enabled: bool) {
        self.state.set_links_enabled(enabled);
    }

    /// Whether read-aloud is enabled.
    #[must_use]
    pub fn is_read_aloud_enabled(&self) -> bool {
        self.state.is_read_aloud_enabled()
    }

    /// Whether rendered content is selectable.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.state.is_selectable()
    }

    // -------------------------------------------------------------------------
    // Tree surface
    // -------------------------------------------------------------------------

    /// Root node id of the current tree.
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.root_id(),
            TreeBacking::Content(t) => t.root_id().unwrap_or(NodeId(1)),
        }
    }

    /// Children of `id`, empty past the end of the tree.
    #[must_use]
    pub fn get_children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.children_of(id),
            TreeBacking::Content(t) => t.children_of(id),
        }
    }

    /// HTML tag of `id`.
    #[must_use]
    pub fn get_html_tag(&self, id: NodeId) -> String {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.tag_of(id).to_string(),
            TreeBacking::Content(t) => t.tag_of(id),
        }
    }

    /// Text content of `id`.
    #[must_use]
    pub fn get_text_content(&self, id: NodeId) -> String {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.text_of(id),
            TreeBacking::Content(t) => t.text_of(id),
        }
    }

    /// Whether `id` is a leaf.
    #[must_use]
    pub fn is_leaf_node(&self, id: NodeId) -> bool {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.is_leaf(id),
            TreeBacking::Content(t) => t.is_leaf(id),
        }
    }

    /// Language tag of `id`.
    #[must_use]
    pub fn get_language(&self, id: NodeId) -> String {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.language_of(id).to_string(),
            TreeBacking::Content(t) => t.language_of(id),
        }
    }

    /// Link URL of `id`, if it is a link.
    #[must_use]
    pub fn get_url(&self, id: NodeId) -> Option<String> {
        match &self.tree {
            TreeBacking::Synthetic(t) => t.url_of(id).map(str::to_string),
            TreeBacking::Content(t) => t.url_of(id),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle notifications (invoked by production code)
    // -------------------------------------------------------------------------

    /// The UI finished connecting.
    pub fn on_connected(&mut self) {
        self.sink.connected();
    }

    /// The selection changed.
    pub fn on_selection_change(&mut self, selection: Selection) {
        self.sink.selection_changed(selection);
    }

    /// Content was copied.
    pub fn on_copy(&mut self) {
        self.sink.copied();
    }

    /// The view scrolled.
    pub fn on_scroll(&mut self, on_selection: bool) {
        self.sink.scrolled(on_selection);
    }

    /// A link was activated.
    pub fn on_link_clicked(&mut self, id: NodeId) {
        self.sink.link_clicked(id);
    }

    // -------------------------------------------------------------------------
    // Test-only setters
    // -------------------------------------------------------------------------

    /// Replace the tree with an explicit content tree.
    pub fn set_content_for_testing(&mut self, tree: ContentTree) {
        self.tree = TreeBacking::Content(tree);
    }

    /// Set the color theme directly.
    pub fn set_theme_for_testing(&mut self, theme: f64) {
        self.state.set_color_theme(theme);
    }

    /// Set the content language directly.
    pub fn set_language_for_testing(&mut self, code: impl Into<String>) {
        self.state.set_language(code);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sink::SinkEvent;
    use crate::tree::VirtualNode;

    mod settings_surface {
        use super::*;

        #[test]
        fn test_defaults_visible_through_host() {
            let host = FakeReadingHost::new();
            assert_eq!(host.font_name(), "sans-serif");
            assert!(host.links_enabled());
            assert!(host.is_selectable());
        }

        #[test]
        fn test_font_size_updates_each_time() {
            let mut host = FakeReadingHost::new();
            for size in [12.0, 16.0, 9.0] {
                host.set_font_size(size);
                assert_eq!(host.font_size(), size);
            }
        }

        #[test]
        fn test_every_mirrored_setter_round_trips() {
            let mut host = FakeReadingHost::new();
            host.set_line_spacing(2.0);
            host.set_letter_spacing(1.0);
            host.set_highlight_granularity(1.0);
            host.set_links_enabled(false);

            assert_eq!(host.line_spacing(), 2.0);
            assert_eq!(host.letter_spacing(), 1.0);
            assert_eq!(host.highlight_granularity(), 1.0);
            assert!(!host.links_enabled());
        }
    }

    mod tree_surface {
        use super::*;

        #[test]
        fn test_synthetic_backing_by_default() {
            let host = FakeReadingHost::with_synthetic_tree(5);
            assert_eq!(host.root_id(), NodeId(1));
            assert_eq!(host.get_children(NodeId(3)), vec![NodeId(4)]);
            assert!(host.get_children(NodeId(5)).is_empty());
            assert!(host.is_leaf_node(NodeId(5)));
        }

        #[test]
        fn test_content_backing_after_install() {
            let mut host = FakeReadingHost::new();
            host.set_content_for_testing(
                ContentTree::new([
                    VirtualNode::new(4u32, "div", "").with_children([5]),
                    VirtualNode::new(5u32, "a", "link text").with_url("https://example.com"),
                ])
                .with_content_node_ids([5]),
            );

            assert_eq!(host.root_id(), NodeId(4));
            assert_eq!(host.get_html_tag(NodeId(5)), "a");
            assert_eq!(host.get_url(NodeId(5)), Some("https://example.com".into()));
            assert_eq!(host.get_text_content(NodeId(5)), "link text");
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn test_notifications_reach_recording_sink() {
            let mut host = FakeReadingHost::new();
            let (sink, recorder) = EventSink::recording();
            *host.sink_mut() = sink;

            host.on_connected();
            host.on_link_clicked(NodeId(2));
            host.on_scroll(false);
            host.on_copy();

            assert_eq!(
                recorder.events(),
                vec![
                    SinkEvent::Connected,
                    SinkEvent::LinkClicked(NodeId(2)),
                    SinkEvent::Scrolled(false),
                    SinkEvent::Copied,
                ]
            );
        }
    }

    mod test_only_setters {
        use super::*;

        #[test]
        fn test_theme_and_language_setters() {
            let mut host = FakeReadingHost::new();
            host.set_theme_for_testing(2.0);
            host.set_language_for_testing("pt-BR");
            assert_eq!(host.color_theme(), 2.0);
            assert_eq!(host.state().language(), "pt-BR");
        }
    }

    mod scripting {
        use super::*;

        #[test]
        fn test_take_scripted_one_shot() {
            let mut host = FakeReadingHost::new();
            host.faults_mut().arm("distill", Scripted::fault("distill-failed"));

            assert_eq!(
                host.take_scripted("distill"),
                Some(Scripted::fault("distill-failed"))
            );
            assert!(host.take_scripted("distill").is_none());
        }
    }
}
