//! Layout reconciliation: skew and margin accounting, eviction, and the edge
//! predicates that drive fetching.
//!
//! Skew is the position of the content element's top edge relative to the
//! viewport's top edge. Scrolling down by `d` lowers it by `d`. Mounting
//! content at the top of the content element pushes everything below it
//! down, which lowers skew by the inserted height and is paid back with a
//! scroll write of the same amount, unless the new content can take the
//! place of leading margin instead.

use super::fetch::DataSource;
use super::model::WindowedListController;
use super::types::Item;
use crate::host::Host;

impl<S: DataSource, H: Host> WindowedListController<S, H> {
    /// Whether blank space is visible above the first item.
    pub(super) fn can_unshift(&self) -> bool {
        self.skew > 0.0
    }

    /// Whether the first item has scrolled fully above the viewport.
    pub(super) fn can_shift(&self) -> bool {
        let Some(first) = self.window.first() else {
            return false;
        };
        -self.skew >= self.host.element_height(&first.element)
    }

    /// Whether the bottom of the mounted content is inside the viewport.
    pub(super) fn can_push(&self) -> bool {
        self.host.viewport_height() >= self.host.content_height() + self.skew
    }

    /// Whether the last item is fully below the viewport.
    pub(super) fn can_pop(&self) -> bool {
        let Some(last) = self.window.last() else {
            return false;
        };
        let last_height = self.host.element_height(&last.element);
        self.host.content_height() + self.skew - self.host.viewport_height() - last_height >= 0.0
    }

    /// Evicts leading items that scrolled out of view, converting their
    /// height into leading margin. Returns the number of evicted items.
    ///
    /// The last item stays mounted so the next fetch still has an anchor.
    pub(super) fn shift(&mut self) -> usize {
        let mut evicted = 0;
        while self.window.len() > 1 && self.can_shift() {
            let Some(item) = self.window.pop_front() else {
                break;
            };
            let height = self.host.element_height(&item.element);
            self.skew += height;
            self.margin_before += height;
            self.unmount(item);
            evicted += 1;
        }
        if evicted > 0 {
            self.apply_margins();
            tracing::debug!(evicted, margin_before = self.margin_before, "scroller: shift");
        }
        evicted
    }

    /// Evicts trailing items that are out of view, converting their height
    /// into trailing margin. Returns the number of evicted items.
    pub(super) fn pop(&mut self) -> usize {
        let mut evicted = 0;
        while self.window.len() > 1 && self.can_pop() {
            let Some(item) = self.window.pop_back() else {
                break;
            };
            let height = self.host.element_height(&item.element);
            self.margin_after += height;
            self.unmount(item);
            evicted += 1;
        }
        if evicted > 0 {
            self.apply_margins();
            tracing::debug!(evicted, margin_after = self.margin_after, "scroller: pop");
        }
        evicted
    }

    /// Mounts a batch in front of the window item at `index`.
    pub(super) fn insert_items_before(
        &mut self,
        index: usize,
        items: &[Item<S::Id, S::Data, H::Element>],
    ) {
        if items.is_empty() {
            return;
        }
        let elements: Vec<H::Element> = items.iter().map(|item| item.element.clone()).collect();
        let next = self.window.get(index).map(|item| item.element.clone());

        let prev_height = self.host.content_height();
        self.host.insert_before(next.as_ref(), &elements);
        let unshifted = self.host.content_height() - prev_height;

        self.skew -= unshifted;
        let consumed = unshifted.min(self.margin_before).max(0.0);
        self.margin_before -= consumed;
        self.apply_margins();
        self.writer.adjust(&self.host, unshifted - consumed);
    }

    /// Mounts a batch so that it lands at window position `index`, right
    /// after the item currently before it.
    pub(super) fn insert_items_after(
        &mut self,
        index: usize,
        items: &[Item<S::Id, S::Data, H::Element>],
    ) {
        if items.is_empty() {
            return;
        }
        let elements: Vec<H::Element> = items.iter().map(|item| item.element.clone()).collect();
        let prev = index
            .checked_sub(1)
            .and_then(|i| self.window.get(i))
            .map(|item| item.element.clone());

        let prev_height = self.host.content_height();
        self.host.insert_after(prev.as_ref(), &elements);
        let pushed = self.host.content_height() - prev_height;

        self.margin_after = (self.margin_after - pushed).max(0.0);
        self.apply_margins();
    }

    pub(super) fn apply_margins(&mut self) {
        self.host.apply_margins(self.margin_before, self.margin_after);
    }

    fn unmount(&mut self, item: Item<S::Id, S::Data, H::Element>) {
        self.host.remove(&item.element);
        self.source.dispose_item(item.id, item.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{row_element, MemoryHost, MemorySource, SimNode};
    use crate::viewport::Viewport;

    type Controller = WindowedListController<MemorySource<f64>, MemoryHost>;

    /// A controller with one row per height mounted directly, bypassing fetches.
    fn mounted(viewport: f64, heights: &[f64]) -> Controller {
        let host = MemoryHost::new(viewport).with_trailing(10_000.0);
        let source = MemorySource::from_heights(heights.to_vec());
        let mut list = WindowedListController::new(source, host, row_element);
        let items: Vec<_> = heights
            .iter()
            .enumerate()
            .map(|(i, h)| Item {
                id: i as u64,
                element: SimNode::item(i as u64, *h),
                data: *h,
            })
            .collect();
        list.insert_items_after(0, &items);
        list.window.splice(0, items);
        list
    }

    #[test]
    fn test_shift_evicts_exactly_consumed_items() {
        let mut list = mounted(100.0, &[50.0, 30.0, 40.0]);
        list.skew = -50.0;

        assert_eq!(list.shift(), 1);
        assert_eq!(list.item_ids(), vec![1, 2]);
        assert_eq!(list.margin_before, 50.0);
        assert_eq!(list.skew, 0.0);
        assert_eq!(list.host.margins(), (50.0, 0.0));
        assert_eq!(list.source.disposed(), &[0]);
    }

    #[test]
    fn test_shift_stops_at_partially_visible_item() {
        let mut list = mounted(100.0, &[50.0, 30.0, 40.0]);
        list.skew = -79.0;

        assert_eq!(list.shift(), 1);
        assert_eq!(list.skew, -29.0);
        assert_eq!(list.item_ids(), vec![1, 2]);
    }

    #[test]
    fn test_pop_evicts_items_below_viewport() {
        let mut list = mounted(100.0, &[50.0, 50.0, 50.0, 50.0]);

        assert_eq!(list.pop(), 2);
        assert_eq!(list.item_ids(), vec![0, 1]);
        assert_eq!(list.margin_after, 100.0);
        assert_eq!(list.host.margins(), (0.0, 100.0));
        assert_eq!(list.source.disposed(), &[3, 2]);
    }

    #[test]
    fn test_eviction_keeps_one_item() {
        let mut list = mounted(100.0, &[50.0, 50.0]);
        list.skew = -500.0;
        assert_eq!(list.shift(), 1);
        assert_eq!(list.item_ids(), vec![1]);

        let mut list = mounted(100.0, &[50.0, 50.0, 50.0, 50.0, 50.0]);
        list.skew = 500.0;
        assert_eq!(list.pop(), 4);
        assert_eq!(list.item_ids(), vec![0]);
    }

    #[test]
    fn test_predicates_on_empty_window() {
        let list = mounted(100.0, &[]);
        assert!(!list.can_shift());
        assert!(!list.can_pop());
        assert!(list.can_push());
        assert!(!list.can_unshift());
    }

    #[test]
    fn test_insert_before_compensates_scroll() {
        let mut list = mounted(100.0, &[50.0, 50.0]);
        let batch = vec![Item {
            id: 9,
            element: SimNode::item(9, 30.0),
            data: 30.0,
        }];

        list.insert_items_before(0, &batch);
        list.window.splice(0, batch);
        list.writer.flush(&mut list.host);

        assert_eq!(list.skew, -30.0);
        assert_eq!(list.host.scroll_position(), 30.0);
        assert_eq!(list.host.item_keys(), vec![9, 0, 1]);
    }

    #[test]
    fn test_insert_before_consumes_leading_margin() {
        let mut list = mounted(100.0, &[50.0, 50.0]);
        list.margin_before = 40.0;
        list.apply_margins();
        let batch = vec![Item {
            id: 9,
            element: SimNode::item(9, 30.0),
            data: 30.0,
        }];

        list.insert_items_before(0, &batch);
        list.writer.flush(&mut list.host);

        assert_eq!(list.margin_before, 10.0);
        assert_eq!(list.skew, -30.0);
        assert!(list.host.scroll_writes().is_empty());
    }

    #[test]
    fn test_insert_after_consumes_trailing_margin() {
        let mut list = mounted(100.0, &[50.0]);
        list.margin_after = 20.0;
        let batch = vec![Item {
            id: 5,
            element: SimNode::item(5, 30.0),
            data: 30.0,
        }];

        list.insert_items_after(1, &batch);
        assert_eq!(list.margin_after, 0.0);
        assert_eq!(list.host.item_keys(), vec![0, 5]);
    }
}
