//! In-memory host and data source.
//!
//! [`MemoryHost`] behaves like a vertically scrolling page: some fixed content
//! above the list (`offset`), the list's content element with its margins,
//! and optional trailing content below it. Scroll writes are clamped to the
//! scrollable range the way browsers clamp `scrollTop`, and every write that
//! moves the position queues a synthetic scroll event that the test driver
//! delivers with [`MemoryHost::take_scroll_event`].
//!
//! [`MemorySource`] serves pages out of a `Vec` and records every request, so
//! tests can assert on the exact calls the controller made.
//!
//! ```rust
//! use windowed_scroller::sim::{row_element, MemoryHost, MemorySource};
//! use windowed_scroller::scroller::WindowedListController;
//!
//! let host = MemoryHost::new(300.0).with_loading_template(20.0);
//! let source = MemorySource::uniform(100, 50.0);
//! let mut list = WindowedListController::new(source, host, row_element);
//!
//! let cmd = list.init().unwrap();
//! assert!(cmd.is_some());
//! assert_eq!(list.source().requests().len(), 1);
//! ```

use crate::error::FetchError;
use crate::host::Host;
use crate::scroller::{DataSource, Edge, PageFuture, Record};
use crate::viewport::Viewport;
use std::collections::HashMap;

/// What a [`SimNode`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A list item; its key is the item id.
    Item,
    /// A loading placeholder or the loading template.
    Loading,
}

/// Handle to a node of a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    key: u64,
    height: f64,
    kind: NodeKind,
}

impl SimNode {
    /// An item node keyed by the item id.
    pub fn item(id: u64, height: f64) -> Self {
        Self {
            key: id,
            height,
            kind: NodeKind::Item,
        }
    }

    /// A loading node. Hosts assign fresh keys to clones.
    pub fn loading(height: f64) -> Self {
        Self {
            key: 0,
            height,
            kind: NodeKind::Loading,
        }
    }

    /// The node key.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Height the node renders at.
    pub fn height(&self) -> f64 {
        self.height
    }

    fn same_node(&self, other: &SimNode) -> bool {
        self.key == other.key && self.kind == other.kind
    }
}

/// Transclusion function for [`MemorySource`] rows whose data is their height.
pub fn row_element(id: &u64, height: &f64) -> SimNode {
    SimNode::item(*id, *height)
}

/// In-memory scroll container.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    viewport_height: f64,
    offset: f64,
    trailing: f64,
    scroll: f64,
    nodes: Vec<SimNode>,
    margin_before: f64,
    margin_after: f64,
    writes: Vec<f64>,
    pending_events: usize,
    next_key: u64,
}

impl MemoryHost {
    /// An empty page whose viewport is `viewport_height` pixels tall.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            offset: 0.0,
            trailing: 0.0,
            scroll: 0.0,
            nodes: Vec::new(),
            margin_before: 0.0,
            margin_after: 0.0,
            writes: Vec::new(),
            pending_events: 0,
            next_key: 1,
        }
    }

    /// Puts `offset` pixels of fixed content above the list.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Puts `trailing` pixels of fixed content below the list.
    pub fn with_trailing(mut self, trailing: f64) -> Self {
        self.trailing = trailing;
        self
    }

    /// Adds a loading template child to the content element.
    pub fn with_loading_template(mut self, height: f64) -> Self {
        self.nodes.push(SimNode::loading(height));
        self
    }

    /// Children of the content element in document order.
    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    /// Keys of the mounted item nodes in document order.
    pub fn item_keys(&self) -> Vec<u64> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Item)
            .map(|n| n.key)
            .collect()
    }

    /// Number of mounted loading placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Loading)
            .count()
    }

    /// Margins last applied by the controller.
    pub fn margins(&self) -> (f64, f64) {
        (self.margin_before, self.margin_after)
    }

    /// Height of the list: margins plus content.
    pub fn list_height(&self) -> f64 {
        self.margin_before + self.content_height() + self.margin_after
    }

    /// Largest reachable scroll position.
    pub fn max_scroll(&self) -> f64 {
        (self.offset + self.list_height() + self.trailing - self.viewport_height).max(0.0)
    }

    /// Every position passed to [`Viewport::set_scroll_position`], before
    /// clamping.
    pub fn scroll_writes(&self) -> &[f64] {
        &self.writes
    }

    /// Simulates the user scrolling to `pos`. Does not queue a synthetic
    /// event; the driver calls the controller's scroll handler itself.
    pub fn scroll_to(&mut self, pos: f64) {
        self.scroll = pos.clamp(0.0, self.max_scroll());
    }

    /// Simulates the user scrolling by `delta`.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll + delta);
    }

    /// Pops one queued synthetic scroll event.
    pub fn take_scroll_event(&mut self) -> bool {
        if self.pending_events == 0 {
            return false;
        }
        self.pending_events -= 1;
        true
    }

    /// Number of queued synthetic scroll events.
    pub fn pending_scroll_events(&self) -> usize {
        self.pending_events
    }

    fn position_of(&self, element: &SimNode) -> Option<usize> {
        self.nodes.iter().position(|n| n.same_node(element))
    }
}

impl Viewport for MemoryHost {
    fn scroll_position(&self) -> f64 {
        self.scroll
    }

    fn set_scroll_position(&mut self, pos: f64) {
        self.writes.push(pos);
        let clamped = pos.clamp(0.0, self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.pending_events += 1;
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn container_top(&self) -> f64 {
        self.offset - self.scroll
    }
}

impl Host for MemoryHost {
    type Element = SimNode;

    fn content_height(&self) -> f64 {
        self.nodes.iter().map(|n| n.height).sum()
    }

    fn element_height(&self, element: &SimNode) -> f64 {
        self.position_of(element)
            .map(|i| self.nodes[i].height)
            .unwrap_or(0.0)
    }

    fn take_loading_template(&mut self) -> Option<SimNode> {
        let index = self.nodes.iter().position(|n| n.kind == NodeKind::Loading)?;
        Some(self.nodes.remove(index))
    }

    fn clone_element(&mut self, element: &SimNode) -> SimNode {
        let key = self.next_key;
        self.next_key += 1;
        SimNode {
            key,
            height: element.height,
            kind: element.kind,
        }
    }

    fn insert_before(&mut self, next: Option<&SimNode>, elements: &[SimNode]) {
        let at = next.and_then(|n| self.position_of(n)).unwrap_or(0);
        self.nodes.splice(at..at, elements.iter().cloned());
    }

    fn insert_after(&mut self, prev: Option<&SimNode>, elements: &[SimNode]) {
        let at = prev
            .and_then(|p| self.position_of(p))
            .map(|i| i + 1)
            .unwrap_or(self.nodes.len());
        self.nodes.splice(at..at, elements.iter().cloned());
    }

    fn remove(&mut self, element: &SimNode) {
        if let Some(i) = self.position_of(element) {
            self.nodes.remove(i);
        }
    }

    fn apply_margins(&mut self, before: f64, after: f64) {
        self.margin_before = before;
        self.margin_after = after;
    }
}

/// A request the controller issued to a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Edge the request was issued for.
    pub edge: Edge,
    /// Anchor id passed by the controller.
    pub anchor: Option<u64>,
    /// Number of records requested.
    pub count: usize,
}

/// Vec-backed paged data source.
#[derive(Debug, Clone)]
pub struct MemorySource<D> {
    records: Vec<Record<u64, D>>,
    index: HashMap<u64, usize>,
    start: usize,
    requests: Vec<PageRequest>,
    disposed: Vec<u64>,
    failures: HashMap<Edge, FetchError>,
    declining: bool,
}

impl MemorySource<f64> {
    /// `count` rows with ids `0..count`, each `height` pixels tall.
    pub fn uniform(count: usize, height: f64) -> Self {
        Self::from_heights(vec![height; count])
    }

    /// One row per height, with ids `0..heights.len()`.
    pub fn from_heights(heights: Vec<f64>) -> Self {
        let records = heights
            .into_iter()
            .enumerate()
            .map(|(i, height)| Record::new(i as u64, height))
            .collect();
        Self::new(records)
    }
}

impl<D> MemorySource<D> {
    /// Serves `records` in the given order.
    pub fn new(records: Vec<Record<u64, D>>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();
        Self {
            records,
            index,
            start: 0,
            requests: Vec::new(),
            disposed: Vec::new(),
            failures: HashMap::new(),
            declining: false,
        }
    }

    /// Position the first anchorless "after" page starts at.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start.min(self.records.len());
        self
    }

    /// Makes the next request for `edge` reject with `message`.
    pub fn fail_next(&mut self, edge: Edge, message: &str) {
        self.failures.insert(edge, FetchError::new(message));
    }

    /// While set, every request is declined without a future.
    pub fn set_declining(&mut self, declining: bool) {
        self.declining = declining;
    }

    /// Requests received so far.
    pub fn requests(&self) -> &[PageRequest] {
        &self.requests
    }

    /// Requests received so far for one edge.
    pub fn requests_for(&self, edge: Edge) -> Vec<&PageRequest> {
        self.requests.iter().filter(|r| r.edge == edge).collect()
    }

    /// Ids handed back through [`DataSource::dispose_item`], in order.
    pub fn disposed(&self) -> &[u64] {
        &self.disposed
    }

    fn page(&self, edge: Edge, anchor: Option<&u64>, count: usize) -> Vec<Record<u64, D>>
    where
        D: Clone,
    {
        let range = match (edge, anchor) {
            (Edge::After, None) => self.start..(self.start + count).min(self.records.len()),
            (Edge::After, Some(id)) => match self.index.get(id) {
                Some(&i) => (i + 1)..(i + 1 + count).min(self.records.len()),
                None => 0..0,
            },
            (Edge::Before, None) => 0..0,
            (Edge::Before, Some(id)) => match self.index.get(id) {
                Some(&i) => i.saturating_sub(count)..i,
                None => 0..0,
            },
        };
        self.records[range].to_vec()
    }

    fn request(&mut self, edge: Edge, anchor: Option<&u64>, count: usize) -> Option<PageFuture<u64, D>>
    where
        D: Clone + Send + 'static,
    {
        self.requests.push(PageRequest {
            edge,
            anchor: anchor.copied(),
            count,
        });
        if self.declining {
            return None;
        }
        let result = match self.failures.remove(&edge) {
            Some(err) => Err(err),
            None => Ok(self.page(edge, anchor, count)),
        };
        Some(Box::pin(async move { result }))
    }
}

impl<D: Clone + Send + 'static> DataSource for MemorySource<D> {
    type Id = u64;
    type Data = D;

    fn load_range_before(&mut self, anchor: Option<&u64>, count: usize) -> Option<PageFuture<u64, D>> {
        self.request(Edge::Before, anchor, count)
    }

    fn load_range_after(&mut self, anchor: Option<&u64>, count: usize) -> Option<PageFuture<u64, D>> {
        self.request(Edge::After, anchor, count)
    }

    fn dispose_item(&mut self, id: u64, _data: D) {
        self.disposed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_writes_are_clamped() {
        let mut host = MemoryHost::new(100.0).with_trailing(150.0);
        assert_eq!(host.max_scroll(), 50.0);

        host.set_scroll_position(80.0);
        assert_eq!(host.scroll_position(), 50.0);
        assert_eq!(host.scroll_writes(), &[80.0]);
        assert!(host.take_scroll_event());
        assert!(!host.take_scroll_event());

        host.set_scroll_position(50.0);
        assert_eq!(host.pending_scroll_events(), 0);
    }

    #[test]
    fn test_insert_positions() {
        let mut host = MemoryHost::new(100.0);
        host.insert_after(None, &[SimNode::item(1, 10.0), SimNode::item(2, 10.0)]);
        host.insert_before(Some(&SimNode::item(2, 10.0)), &[SimNode::item(5, 10.0)]);
        host.insert_after(Some(&SimNode::item(2, 10.0)), &[SimNode::item(7, 10.0)]);
        host.insert_before(None, &[SimNode::item(0, 10.0)]);
        assert_eq!(host.item_keys(), vec![0, 1, 5, 2, 7]);

        host.remove(&SimNode::item(5, 10.0));
        host.remove(&SimNode::item(42, 10.0));
        assert_eq!(host.item_keys(), vec![0, 1, 2, 7]);
    }

    #[test]
    fn test_container_top_follows_scroll() {
        let mut host = MemoryHost::new(100.0).with_offset(40.0).with_trailing(500.0);
        assert_eq!(host.container_top(), 40.0);
        host.scroll_to(30.0);
        assert_eq!(host.container_top(), 10.0);
    }

    #[test]
    fn test_pages_follow_anchors() {
        let mut source = MemorySource::uniform(20, 10.0).with_start(10);
        let ids = |page: Vec<Record<u64, f64>>| page.into_iter().map(|r| r.id).collect::<Vec<_>>();

        assert_eq!(ids(source.page(Edge::After, None, 3)), vec![10, 11, 12]);
        assert_eq!(ids(source.page(Edge::After, Some(&18), 5)), vec![19]);
        assert_eq!(ids(source.page(Edge::Before, Some(&10), 3)), vec![7, 8, 9]);
        assert_eq!(ids(source.page(Edge::Before, Some(&1), 3)), vec![0]);
        assert!(source.page(Edge::Before, None, 3).is_empty());
        assert!(source.page(Edge::After, Some(&99), 3).is_empty());

        source.fail_next(Edge::After, "boom");
        assert!(source.load_range_after(None, 3).is_some());
        assert_eq!(source.requests().len(), 1);
    }
}
