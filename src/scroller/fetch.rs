//! Fetch coordination: requesting pages at either edge and splicing the
//! results into the window.

use super::model::WindowedListController;
use super::types::{Edge, EdgeState, Item, PageLoadedMsg, PendingFetch, Record};
use crate::error::{FetchError, Result, ScrollerError};
use crate::host::Host;
use crate::spinner::{LoadingSpinner, Placeholder};
use bubbletea_rs::{Cmd, Msg};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;

/// A page request in flight. Resolves to records in scroll order; an empty
/// page means the dataset is exhausted at that edge.
pub type PageFuture<Id, D> =
    Pin<Box<dyn Future<Output = std::result::Result<Vec<Record<Id, D>>, FetchError>> + Send>>;

/// An externally paginated dataset.
///
/// Requests are positioned relative to an anchor id. `None` anchors are used
/// while the window is empty.
pub trait DataSource {
    /// Stable item identifier.
    type Id: Clone + Eq + Hash + fmt::Debug + Send + 'static;
    /// Per-item payload.
    type Data: Send + 'static;

    /// Requests up to `count` records immediately preceding `anchor`.
    /// Returns `None` when no request is warranted.
    fn load_range_before(
        &mut self,
        anchor: Option<&Self::Id>,
        count: usize,
    ) -> Option<PageFuture<Self::Id, Self::Data>>;

    /// Requests up to `count` records immediately following `anchor`.
    /// Returns `None` when no request is warranted.
    fn load_range_after(
        &mut self,
        anchor: Option<&Self::Id>,
        count: usize,
    ) -> Option<PageFuture<Self::Id, Self::Data>>;

    /// Releases whatever the source attached to an item that left the window.
    fn dispose_item(&mut self, id: Self::Id, data: Self::Data) {
        let _ = (id, data);
    }
}

impl<S: DataSource, H: Host> WindowedListController<S, H> {
    /// Requests the page preceding `next_id`.
    ///
    /// Returns `None` without touching the source if a fetch before the
    /// window is already outstanding, or if the source declines.
    pub fn load_more_items_before(&mut self, next_id: Option<S::Id>) -> Option<Cmd> {
        let cmd = self.request_before(next_id);
        self.writer.flush(&mut self.host);
        cmd
    }

    /// Requests the page following `prev_id`.
    ///
    /// Returns `None` without touching the source if a fetch after the
    /// window is already outstanding, or if the source declines.
    pub fn load_more_items_after(&mut self, prev_id: Option<S::Id>) -> Option<Cmd> {
        let cmd = self.request_after(prev_id);
        self.writer.flush(&mut self.host);
        cmd
    }

    /// Applies a settled fetch.
    ///
    /// Messages addressed to another controller, or to a fetch that is no
    /// longer outstanding, are ignored. When the inserted batch still leaves
    /// the edge short of content the next fetch is issued right away and its
    /// command returned.
    ///
    /// # Errors
    ///
    /// [`ScrollerError::Fetch`] when the data source rejected the request.
    /// The edge is idle again and its placeholder removed by then; nothing is
    /// retried until the next scroll asks for that edge again.
    pub fn handle_page(&mut self, msg: PageLoadedMsg<S::Id, S::Data>) -> Result<Option<Cmd>> {
        if msg.id != self.id {
            return Ok(None);
        }
        let state = match msg.edge {
            Edge::Before => &mut self.before,
            Edge::After => &mut self.after,
        };
        if state.ticket() != Some(msg.ticket) {
            tracing::debug!(edge = %msg.edge, "scroller: stale page ignored");
            return Ok(None);
        }
        let Some(pending) = state.settle() else {
            return Ok(None);
        };

        let records = match msg.result {
            Ok(records) => records,
            Err(source) => {
                tracing::warn!(edge = %msg.edge, error = %source, "scroller: fetch failed");
                self.release_placeholder(msg.edge, pending.placeholder);
                self.writer.flush(&mut self.host);
                return Err(ScrollerError::Fetch {
                    edge: msg.edge,
                    source,
                });
            }
        };

        tracing::debug!(
            edge = %msg.edge,
            anchor = ?pending.anchor,
            count = records.len(),
            "scroller: got items"
        );
        let cmd = match msg.edge {
            Edge::Before => self.resolve_before(pending, records),
            Edge::After => self.resolve_after(pending, records),
        };
        self.writer.flush(&mut self.host);
        Ok(cmd)
    }

    pub(super) fn request_before(&mut self, next_id: Option<S::Id>) -> Option<Cmd> {
        if self.before.is_loading() {
            return None;
        }
        let count = self.config.effective_buffer_length();
        tracing::debug!(count, anchor = ?next_id, "scroller: request before");
        let request = self.source.load_range_before(next_id.as_ref(), count)?;

        let next = next_id
            .as_ref()
            .and_then(|id| self.window.element(id))
            .cloned();
        let placeholder = self.spinner.insert_before(&mut self.host, next.as_ref());
        if let Some(placeholder) = &placeholder {
            self.skew -= placeholder.height;
            self.writer.adjust(&self.host, placeholder.height);
        }

        let ticket = self.issue_ticket();
        self.before = EdgeState::Loading(PendingFetch {
            anchor: next_id.clone(),
            ticket,
            placeholder,
        });
        Some(self.page_cmd(Edge::Before, next_id, ticket, request))
    }

    pub(super) fn request_after(&mut self, prev_id: Option<S::Id>) -> Option<Cmd> {
        if self.after.is_loading() {
            return None;
        }
        let count = self.config.effective_buffer_length();
        tracing::debug!(count, anchor = ?prev_id, "scroller: request after");
        let request = self.source.load_range_after(prev_id.as_ref(), count)?;

        let prev = prev_id
            .as_ref()
            .and_then(|id| self.window.element(id))
            .cloned();
        let placeholder = self.spinner.insert_after(&mut self.host, prev.as_ref());

        let ticket = self.issue_ticket();
        self.after = EdgeState::Loading(PendingFetch {
            anchor: prev_id.clone(),
            ticket,
            placeholder,
        });
        Some(self.page_cmd(Edge::After, prev_id, ticket, request))
    }

    fn page_cmd(
        &self,
        edge: Edge,
        anchor: Option<S::Id>,
        ticket: u64,
        request: PageFuture<S::Id, S::Data>,
    ) -> Cmd {
        let id = self.id;
        Box::pin(async move {
            let result = request.await;
            Some(Box::new(PageLoadedMsg {
                id,
                edge,
                anchor,
                result,
                ticket,
            }) as Msg)
        })
    }

    fn resolve_before(
        &mut self,
        pending: PendingFetch<S::Id, H::Element>,
        records: Vec<Record<S::Id, S::Data>>,
    ) -> Option<Cmd> {
        let items = self.materialize(records);
        let index = self.anchor_index(Edge::Before, pending.anchor.as_ref());

        self.insert_items_before(index, &items);
        self.release_placeholder(Edge::Before, pending.placeholder);

        let first = items.first().map(|item| item.id.clone());
        self.window.splice(index, items);

        let Some(first) = first else {
            tracing::debug!("scroller: no more items before");
            return None;
        };
        if self.can_unshift() {
            return self.request_before(Some(first));
        }
        None
    }

    fn resolve_after(
        &mut self,
        pending: PendingFetch<S::Id, H::Element>,
        records: Vec<Record<S::Id, S::Data>>,
    ) -> Option<Cmd> {
        let items = self.materialize(records);
        let index = self.anchor_index(Edge::After, pending.anchor.as_ref());

        self.insert_items_after(index, &items);
        self.release_placeholder(Edge::After, pending.placeholder);

        let last = items.last().map(|item| item.id.clone());
        self.window.splice(index, items);

        let Some(last) = last else {
            tracing::debug!("scroller: no more items after");
            return None;
        };
        if self.can_push() {
            return self.request_after(Some(last));
        }
        None
    }

    /// Window position a batch fetched against `anchor` is spliced at.
    ///
    /// An anchor that has left the window since the request was issued falls
    /// back to the last index; host and window both insert there.
    fn anchor_index(&self, edge: Edge, anchor: Option<&S::Id>) -> usize {
        let len = self.window.len();
        let Some(anchor) = anchor else {
            return match edge {
                Edge::Before => 0,
                Edge::After => len,
            };
        };
        match (edge, self.window.index_of(anchor)) {
            (Edge::Before, Some(index)) => index,
            (Edge::After, Some(index)) => index + 1,
            (Edge::Before, None) => {
                tracing::warn!(?anchor, "scroller: anchor gone, inserting before last item");
                len.saturating_sub(1)
            }
            (Edge::After, None) => {
                tracing::warn!(?anchor, "scroller: anchor gone, appending");
                len
            }
        }
    }

    /// Turns records into items, dropping ids that are already mounted or
    /// repeated within the batch.
    fn materialize(
        &mut self,
        records: Vec<Record<S::Id, S::Data>>,
    ) -> Vec<Item<S::Id, S::Data, H::Element>> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());
        for record in records {
            if self.window.contains(&record.id) || !seen.insert(record.id.clone()) {
                tracing::warn!(id = ?record.id, "scroller: duplicate item dropped");
                self.source.dispose_item(record.id, record.data);
                continue;
            }
            let element = (self.transclude)(&record.id, &record.data);
            items.push(Item {
                id: record.id,
                element,
                data: record.data,
            });
        }
        items
    }

    /// Unmounts an edge's placeholder. A placeholder above the window is
    /// compensated like any other removal above the viewport.
    pub(super) fn release_placeholder(
        &mut self,
        edge: Edge,
        placeholder: Option<Placeholder<H::Element>>,
    ) {
        let Some(placeholder) = placeholder else {
            return;
        };
        let height = LoadingSpinner::remove(&mut self.host, placeholder);
        if edge == Edge::Before {
            self.skew += height;
            self.writer.adjust(&self.host, -height);
        }
    }
}
