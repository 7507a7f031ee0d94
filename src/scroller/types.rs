//! Core types for the windowed list controller.

use crate::error::FetchError;
use bubbletea_rs::Msg;
use std::fmt;

/// The number of records requested per fetch unless configured otherwise.
pub const DEFAULT_BUFFER_LENGTH: usize = 5;

/// One end of the mounted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Edge {
    /// Content preceding the first mounted item.
    Before,
    /// Content following the last mounted item.
    After,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Before => f.write_str("before"),
            Edge::After => f.write_str("after"),
        }
    }
}

/// A record delivered by a data source, not yet materialized into a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<Id, D> {
    /// Stable identifier, unique within the dataset.
    pub id: Id,
    /// Per-item payload handed to the transclusion function.
    pub data: D,
}

impl<Id, D> Record<Id, D> {
    /// Pairs an id with its payload.
    pub fn new(id: Id, data: D) -> Self {
        Self { id, data }
    }
}

/// A mounted item: the record plus the node it was materialized into.
#[derive(Debug, Clone)]
pub struct Item<Id, D, E> {
    /// Stable identifier.
    pub id: Id,
    /// Host node handle.
    pub element: E,
    /// Owned per-item state.
    pub data: D,
}

/// Controller configuration.
///
/// ```rust
/// use windowed_scroller::scroller::Config;
///
/// let config = Config::default().with_buffer_length(20);
/// assert_eq!(config.buffer_length, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of records requested per fetch. Values below 1 are raised to 1.
    pub buffer_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_length: DEFAULT_BUFFER_LENGTH,
        }
    }
}

impl Config {
    /// Sets the number of records requested per fetch.
    pub fn with_buffer_length(mut self, buffer_length: usize) -> Self {
        self.buffer_length = buffer_length;
        self
    }

    pub(crate) fn effective_buffer_length(&self) -> usize {
        self.buffer_length.max(1)
    }
}

/// Tells a controller that its scroll container dispatched a scroll event.
///
/// An `id` of 0 addresses every controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMsg {
    /// Controller the event belongs to.
    pub id: i64,
}

/// A page request settled.
///
/// Produced by the command returned from a fetch; feed it back through
/// [`WindowedListController::update`](super::WindowedListController::update).
#[derive(Debug)]
pub struct PageLoadedMsg<Id, D> {
    /// Controller that issued the request.
    pub id: i64,
    /// Edge the request was issued for.
    pub edge: Edge,
    /// The anchor the request was positioned against.
    pub anchor: Option<Id>,
    /// The page, in scroll order, or the rejection.
    pub result: Result<Vec<Record<Id, D>>, FetchError>,
    pub(crate) ticket: u64,
}

/// A page request was rejected by the data source.
///
/// Emitted by [`WindowedListController::update`](super::WindowedListController::update)
/// so the application can surface the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchErrorMsg {
    /// Controller that issued the request.
    pub id: i64,
    /// Edge the request was issued for.
    pub edge: Edge,
    /// Description of the failure.
    pub err: String,
}

impl From<ScrollMsg> for Msg {
    fn from(msg: ScrollMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<FetchErrorMsg> for Msg {
    fn from(msg: FetchErrorMsg) -> Self {
        Box::new(msg) as Msg
    }
}

/// A fetch that has been issued and not yet settled.
#[derive(Debug, Clone)]
pub(crate) struct PendingFetch<Id, E> {
    pub anchor: Option<Id>,
    pub ticket: u64,
    pub placeholder: Option<crate::spinner::Placeholder<E>>,
}

/// Per-edge fetch state: `Idle -> Loading -> Idle`.
#[derive(Debug, Clone)]
pub(crate) enum EdgeState<Id, E> {
    Idle,
    Loading(PendingFetch<Id, E>),
}

impl<Id, E> Default for EdgeState<Id, E> {
    fn default() -> Self {
        EdgeState::Idle
    }
}

impl<Id, E> EdgeState<Id, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, EdgeState::Loading(_))
    }

    pub fn ticket(&self) -> Option<u64> {
        match self {
            EdgeState::Loading(pending) => Some(pending.ticket),
            EdgeState::Idle => None,
        }
    }

    /// Returns the pending fetch and leaves the edge idle.
    pub fn settle(&mut self) -> Option<PendingFetch<Id, E>> {
        match std::mem::take(self) {
            EdgeState::Loading(pending) => Some(pending),
            EdgeState::Idle => None,
        }
    }
}
