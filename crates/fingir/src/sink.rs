//! Event/callback sink for host lifecycle notifications.
//!
//! Production code under test notifies its host of user actions and
//! lifecycle events (content ready, selection changed, copy, scroll, link
//! activation). The sink stands in for that channel: every hook defaults to
//! a no-op, and a test may replace any hook with a recording closure before
//! exercising the code, then assert on what was captured.
//!
//! The sink itself never traps errors. If a test-supplied hook panics, the
//! panic propagates synchronously to the caller, matching real callback
//! semantics so production error handling is genuinely exercised.

use crate::tree::NodeId;
use std::cell::RefCell;
use std::rc::Rc;

/// A selection range reported through [`EventSink::selection_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Node the selection starts in
    pub anchor: NodeId,
    /// Character offset within the anchor node
    pub anchor_offset: u32,
    /// Node the selection ends in
    pub focus: NodeId,
    /// Character offset within the focus node
    pub focus_offset: u32,
}

impl Selection {
    /// Create a selection range.
    #[must_use]
    pub const fn new(anchor: NodeId, anchor_offset: u32, focus: NodeId, focus_offset: u32) -> Self {
        Self {
            anchor,
            anchor_offset,
            focus,
            focus_offset,
        }
    }

    /// A collapsed selection (caret) at the given position.
    #[must_use]
    pub const fn collapsed(node: NodeId, offset: u32) -> Self {
        Self::new(node, offset, node, offset)
    }
}

/// One recorded sink invocation, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// `connected` fired
    Connected,
    /// `selection_changed` fired with this range
    SelectionChanged(Selection),
    /// `copied` fired
    Copied,
    /// `scrolled` fired; true if the scroll targeted the selection
    Scrolled(bool),
    /// `link_clicked` fired for this node
    LinkClicked(NodeId),
    /// `content_updated` fired
    ContentUpdated,
}

type Hook<T> = Option<Box<dyn FnMut(T)>>;

/// Overridable sink of host lifecycle notifications.
pub struct EventSink {
    on_connected: Hook<()>,
    on_selection_change: Hook<Selection>,
    on_copy: Hook<()>,
    on_scroll: Hook<bool>,
    on_link_clicked: Hook<NodeId>,
    on_content_updated: Hook<()>,
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("on_connected", &self.on_connected.is_some())
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("on_copy", &self.on_copy.is_some())
            .field("on_scroll", &self.on_scroll.is_some())
            .field("on_link_clicked", &self.on_link_clicked.is_some())
            .field("on_content_updated", &self.on_content_updated.is_some())
            .finish()
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink {
    /// Create a sink with every hook a no-op.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_connected: None,
            on_selection_change: None,
            on_copy: None,
            on_scroll: None,
            on_link_clicked: None,
            on_content_updated: None,
        }
    }

    /// Create a sink whose every hook records into the returned recorder.
    #[must_use]
    pub fn recording() -> (Self, SinkRecorder) {
        let recorder = SinkRecorder::new();
        let mut sink = Self::new();

        let r = recorder.clone();
        sink.on_connected(move || r.push(SinkEvent::Connected));
        let r = recorder.clone();
        sink.on_selection_change(move |sel| r.push(SinkEvent::SelectionChanged(sel)));
        let r = recorder.clone();
        sink.on_copy(move || r.push(SinkEvent::Copied));
        let r = recorder.clone();
        sink.on_scroll(move |on_sel| r.push(SinkEvent::Scrolled(on_sel)));
        let r = recorder.clone();
        sink.on_link_clicked(move |id| r.push(SinkEvent::LinkClicked(id)));
        let r = recorder.clone();
        sink.on_content_updated(move || r.push(SinkEvent::ContentUpdated));

        (sink, recorder)
    }

    // -------------------------------------------------------------------------
    // Hook overrides
    // -------------------------------------------------------------------------

    /// Override the connected hook.
    pub fn on_connected<F: FnMut() + 'static>(&mut self, mut f: F) {
        self.on_connected = Some(Box::new(move |()| f()));
    }

    /// Override the selection-change hook.
    pub fn on_selection_change<F: FnMut(Selection) + 'static>(&mut self, f: F) {
        self.on_selection_change = Some(Box::new(f));
    }

    /// Override the copy hook.
    pub fn on_copy<F: FnMut() + 'static>(&mut self, mut f: F) {
        self.on_copy = Some(Box::new(move |()| f()));
    }

    /// Override the scroll hook.
    pub fn on_scroll<F: FnMut(bool) + 'static>(&mut self, f: F) {
        self.on_scroll = Some(Box::new(f));
    }

    /// Override the link-clicked hook.
    pub fn on_link_clicked<F: FnMut(NodeId) + 'static>(&mut self, f: F) {
        self.on_link_clicked = Some(Box::new(f));
    }

    /// Override the content-updated hook.
    pub fn on_content_updated<F: FnMut() + 'static>(&mut self, mut f: F) {
        self.on_content_updated = Some(Box::new(move |()| f()));
    }

    // -------------------------------------------------------------------------
    // Notifications (invoked by production code under test)
    // -------------------------------------------------------------------------

    /// The UI finished connecting to its host.
    pub fn connected(&mut self) {
        if let Some(hook) = self.on_connected.as_mut() {
            hook(());
        }
    }

    /// The selection changed.
    pub fn selection_changed(&mut self, selection: Selection) {
        if let Some(hook) = self.on_selection_change.as_mut() {
            hook(selection);
        }
    }

    /// Content was copied.
    pub fn copied(&mut self) {
        if let Some(hook) = self.on_copy.as_mut() {
            hook(());
        }
    }

    /// The view scrolled; `on_selection` is true when the scroll tracked
    /// the selection.
    pub fn scrolled(&mut self, on_selection: bool) {
        if let Some(hook) = self.on_scroll.as_mut() {
            hook(on_selection);
        }
    }

    /// A link was activated.
    pub fn link_clicked(&mut self, id: NodeId) {
        if let Some(hook) = self.on_link_clicked.as_mut() {
            hook(id);
        }
    }

    /// Distilled content was replaced.
    pub fn content_updated(&mut self) {
        if let Some(hook) = self.on_content_updated.as_mut() {
            hook(());
        }
    }
}

/// Shared capture buffer behind a recording sink.
#[derive(Debug, Clone, Default)]
pub struct SinkRecorder {
    events: Rc<RefCell<Vec<SinkEvent>>>,
}

impl SinkRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: SinkEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of everything recorded so far, in invocation order.
    #[must_use]
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded invocations.
    #[must_use]
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether the given event was recorded.
    #[must_use]
    pub fn contains(&self, event: &SinkEvent) -> bool {
        self.events.borrow().contains(event)
    }

    /// Discard everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
