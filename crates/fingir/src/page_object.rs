//! Page object facade over a tree-structured UI surface.
//!
//! Integration tests should speak in intents ("navigate to this path",
//! "wait until this item is selected"), not raw element queries. The
//! [`DirectoryTreePage`] translates those intents into primitive queries,
//! input verbs, and bounded polling against whatever [`TreeSurface`]
//! implementation the test supplies.
//!
//! One logical UI surface is assumed: operations are strictly sequential,
//! and concurrent invocations against the same surface are not supported.

use crate::result::{FingirError, FingirResult};
use crate::wait::{wait_until, WaitOptions, WaitResult};

/// Trait for page objects representing a page or component in the UI.
pub trait PageObject {
    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Check if the page is ready for interaction
    fn is_loaded(&self) -> bool {
        true
    }
}

/// Primitive query/input seam a tree page object drives.
///
/// Implementations query a live UI (or a fake of one). All methods are
/// cheap and synchronous; the page object supplies the polling.
pub trait TreeSurface {
    /// Whether an item with this label is currently rendered.
    fn item_exists(&self, label: &str) -> bool;

    /// Whether the labeled item is expanded.
    fn is_expanded(&self, label: &str) -> bool;

    /// Whether the labeled item carries the selected attribute.
    fn is_selected(&self, label: &str) -> bool;

    /// Expand the labeled item, revealing its children.
    fn expand(&mut self, label: &str);

    /// Select the labeled item.
    fn select(&mut self, label: &str);
}

/// Intent-level facade over a directory-tree UI.
#[derive(Debug)]
pub struct DirectoryTreePage<S: TreeSurface> {
    surface: S,
    options: WaitOptions,
}

impl<S: TreeSurface> PageObject for DirectoryTreePage<S> {
    fn page_name(&self) -> &str {
        "DirectoryTreePage"
    }
}

impl<S: TreeSurface> DirectoryTreePage<S> {
    /// Wrap a surface with default polling options.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            options: WaitOptions::default(),
        }
    }

    /// Wrap a surface with explicit polling options.
    #[must_use]
    pub fn with_options(surface: S, options: WaitOptions) -> Self {
        Self { surface, options }
    }

    /// The wrapped surface, for direct assertions.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the wrapped surface, for test-side mutation.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Wait until an item with this label is rendered.
    pub fn wait_for_item_by_label(&mut self, label: &str) -> FingirResult<WaitResult> {
        let surface = &self.surface;
        wait_until(
            || surface.item_exists(label),
            &format!("tree item '{label}' to appear"),
            &self.options,
        )
    }

    /// Wait until the labeled item carries the selected attribute.
    pub fn wait_for_selected_by_label(&mut self, label: &str) -> FingirResult<WaitResult> {
        let surface = &self.surface;
        wait_until(
            || surface.is_selected(label),
            &format!("tree item '{label}' to be selected"),
            &self.options,
        )
    }

    /// Wait until the labeled item is expanded.
    pub fn wait_for_expanded_by_label(&mut self, label: &str) -> FingirResult<WaitResult> {
        let surface = &self.surface;
        wait_until(
            || surface.is_expanded(label),
            &format!("tree item '{label}' to be expanded"),
            &self.options,
        )
    }

    /// Expand the labeled item once it appears, then wait for the expansion
    /// to take effect.
    pub fn expand_item(&mut self, label: &str) -> FingirResult<()> {
        let _ = self.wait_for_item_by_label(label)?;
        self.surface.expand(label);
        let _ = self.wait_for_expanded_by_label(label)?;
        Ok(())
    }

    /// Select the labeled item once it appears, then wait for the selected
    /// attribute.
    pub fn select_item(&mut self, label: &str) -> FingirResult<()> {
        let _ = self.wait_for_item_by_label(label)?;
        self.surface.select(label);
        let _ = self.wait_for_selected_by_label(label)?;
        Ok(())
    }

    /// Navigate a slash-delimited path, expanding every intermediate level
    /// and selecting the final segment.
    ///
    /// Fails with a timeout naming the pending segment if any level's item
    /// never appears within the polling budget.
    pub fn navigate_to_path(&mut self, path: &str) -> FingirResult<()> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(FingirError::InvalidState {
                message: format!("path '{path}' has no segments"),
            });
        }

        let (last, intermediate) = segments.split_last().unwrap_or((&"", &[]));
        for segment in intermediate {
            self.expand_item(segment)?;
        }
        self.select_item(last)
    }
}

// =============================================================================
// FAKE SURFACE
// =============================================================================

/// In-memory [`TreeSurface`] used by this crate's own tests and available
/// to downstream suites that need a scriptable tree UI.
///
/// Items are visible when every ancestor is expanded; selection is
/// exclusive, like a real tree widget.
#[derive(Debug, Clone, Default)]
pub struct FakeTreeSurface {
    items: Vec<FakeTreeItem>,
}

#[derive(Debug, Clone)]
struct FakeTreeItem {
    label: String,
    parent: Option<String>,
    expanded: bool,
    selected: bool,
}

impl FakeTreeSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root-level item.
    #[must_use]
    pub fn with_root(mut self, label: impl Into<String>) -> Self {
        self.items.push(FakeTreeItem {
            label: label.into(),
            parent: None,
            expanded: false,
            selected: false,
        });
        self
    }

    /// Add a child item under an existing parent label.
    #[must_use]
    pub fn with_child(mut self, parent: impl Into<String>, label: impl Into<String>) -> Self {
        self.items.push(FakeTreeItem {
            label: label.into(),
            parent: Some(parent.into()),
            expanded: false,
            selected: false,
        });
        self
    }

    /// Label of the currently selected item, if any.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.selected)
            .map(|i| i.label.as_str())
    }

    fn item(&self, label: &str) -> Option<&FakeTreeItem> {
        self.items.iter().find(|i| i.label == label)
    }

    fn visible(&self, label: &str) -> bool {
        match self.item(label) {
            None => false,
            Some(item) => match &item.parent {
                None => true,
                Some(parent) => {
                    self.item(parent).map_or(false, |p| p.expanded) && self.visible(parent)
                }
            },
        }
    }
}

impl TreeSurface for FakeTreeSurface {
    fn item_exists(&self, label: &str) -> bool {
        self.visible(label)
    }

    fn is_expanded(&self, label: &str) -> bool {
        self.item(label).map_or(false, |i| i.expanded)
    }

    fn is_selected(&self, label: &str) -> bool {
        self.item(label).map_or(false, |i| i.selected)
    }

    fn expand(&mut self, label: &str) {
        if let Some(item) = self.items.iter_mut().find(|i| i.label == label) {
            item.expanded = true;
        }
    }

    fn select(&mut self, label: &str) {
        for item in &mut self.items {
            item.selected = item.label == label;
        }
    }
}
