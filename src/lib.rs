#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/windowed-scroller/")]

//! # windowed-scroller
//!
//! A windowed ("virtualized") infinite-scroll list controller. Only a bounded
//! window of items is mounted at any time while the user scrolls through a
//! conceptually unbounded dataset that is fetched page by page.
//!
//! ## Overview
//!
//! The crate owns the windowing algorithm: when to fetch, when to mount and
//! unmount, and how to keep the scroll position visually stable when content
//! above the viewport changes. Everything else is a collaborator:
//!
//! - the **host** ([`Host`]) owns the nodes, the layout and the scroll
//!   position (a browser DOM, a terminal surface, or [`sim::MemoryHost`]);
//! - the **data source** ([`DataSource`]) resolves pages asynchronously;
//! - a **transclusion function** turns fetched records into host nodes.
//!
//! Fetches are returned as bubbletea-rs `Cmd`s, so the controller slots into
//! an Elm-style `update` loop: the runtime awaits each command and feeds the
//! resulting message back through [`WindowedListController::update`].
//!
//! ## Quick Start
//!
//! ```rust
//! use windowed_scroller::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let host = MemoryHost::new(300.0).with_loading_template(20.0);
//! let source = MemorySource::uniform(10_000, 40.0);
//! let mut list = WindowedListController::new(source, host, row_element)
//!     .with_config(Config::default().with_buffer_length(10));
//!
//! let mut next = list.init().unwrap();
//! while let Some(cmd) = next {
//!     next = list.update(cmd.await.unwrap());
//! }
//! assert_eq!(list.len(), 10);
//!
//! // The user scrolls; the host reports it.
//! list.host_mut().scroll_by(200.0);
//! let cmd = list.handle_scroll();
//! assert!(cmd.is_some());
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`scroller`] | The controller, data source trait and messages |
//! | [`viewport`] | Scroll position access, write coalescing and suppression |
//! | [`host`] | Content container contract |
//! | [`spinner`] | Loading placeholder bookkeeping |
//! | [`sim`] | In-memory host and data source |
//! | [`error`] | Error types |

pub mod error;
pub mod host;
pub mod scroller;
pub mod sim;
pub mod spinner;
pub mod viewport;

pub use error::{FetchError, Result, ScrollerError};
pub use host::Host;
pub use scroller::{
    Config, DataSource, Edge, FetchErrorMsg, PageFuture, PageLoadedMsg, Record, ScrollMsg,
    WindowedListController,
};
pub use viewport::{ScrollWriter, Suppression, Viewport};

/// Prelude module for convenient imports.
///
/// ```rust
/// use windowed_scroller::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{FetchError, ScrollerError};
    pub use crate::host::Host;
    pub use crate::scroller::{
        Config, DataSource, Edge, FetchErrorMsg, PageFuture, PageLoadedMsg, Record, ScrollMsg,
        WindowedListController,
    };
    pub use crate::sim::{row_element, MemoryHost, MemorySource};
    pub use crate::viewport::Viewport;
}
