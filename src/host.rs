//! Host contract for the content container.
//!
//! The host owns the real nodes (DOM elements in a browser, cells in a
//! terminal surface, or [`MemoryHost`](crate::sim::MemoryHost) nodes in
//! tests). The controller only holds cloned handles to them and asks the host
//! to mount, measure and remove them.
//!
//! The content container ("carousel") holds the mounted items and any loading
//! placeholders as direct children, in scroll order. Evicted content is
//! represented by the container's leading and trailing margins.

use crate::viewport::Viewport;

/// Scroll container plus the content element inside it.
pub trait Host: Viewport {
    /// Handle to a mountable node. Cloning must yield a handle to the same
    /// node, not a copy of it (see [`Host::clone_element`] for that).
    type Element: Clone;

    /// Height of the content element, excluding its margins.
    fn content_height(&self) -> f64;

    /// Rendered height of a mounted node, `0.0` if it is not mounted.
    fn element_height(&self, element: &Self::Element) -> f64;

    /// Finds the loading template among the content children, detaches it
    /// from the live tree and returns it.
    fn take_loading_template(&mut self) -> Option<Self::Element>;

    /// Deep-copies a node into a new, unmounted node.
    fn clone_element(&mut self, element: &Self::Element) -> Self::Element;

    /// Mounts `elements` in order right before `next`, or before the first
    /// child when `next` is `None` or not mounted.
    fn insert_before(&mut self, next: Option<&Self::Element>, elements: &[Self::Element]);

    /// Mounts `elements` in order right after `prev`, or at the end when
    /// `prev` is `None` or not mounted.
    fn insert_after(&mut self, prev: Option<&Self::Element>, elements: &[Self::Element]);

    /// Unmounts a node. Unknown nodes are ignored.
    fn remove(&mut self, element: &Self::Element);

    /// Sets the leading and trailing spacer margins of the content element.
    fn apply_margins(&mut self, before: f64, after: f64);
}
