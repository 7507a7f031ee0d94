//! Windowed list controller: infinite scrolling over a paged dataset with a
//! bounded number of mounted items.
//!
//! ## Architecture Overview
//!
//! The controller mirrors the mounted part of the dataset in an ordered
//! [`ItemWindow`] and keeps three numbers about the layout:
//!
//! - **skew**: where the top of the content element sits relative to the top
//!   of the viewport. Positive skew means blank space is visible above the
//!   first item; a first item taller than `-skew` is still partly visible.
//! - **margin before / after**: spacer heights standing in for items that
//!   were evicted at either end, so the scrollbar keeps its length.
//!
//! ### Scroll events
//! Each event moves skew by the scroll delta. Scrolling down evicts leading
//! items that left the viewport (`shift`) and requests the next page when the
//! end of the mounted content comes into view. Scrolling up does the reverse
//! (`pop`, then request the previous page when blank space shows above).
//!
//! ### Fetches
//! At most one fetch per edge is outstanding. While it is, a loading
//! placeholder is mounted at that edge and the user cannot scroll past the
//! mounted content on that side. When the page arrives it is spliced in,
//! the placeholder removed, and, if the edge is still short of content, the
//! next fetch is issued right away. Empty pages end that chain.
//!
//! ### Position stability
//! Any height change above the viewport (items or placeholders mounted at
//! the top, margins consumed) is paid back with a scroll write, so the
//! content under the user's eyes stays put. Writes are coalesced per entry
//! point and the resulting synthetic scroll event is ignored exactly once.

mod events;
mod fetch;
mod layout;
mod model;
mod types;

pub mod window;


pub use fetch::{DataSource, PageFuture};
pub use model::{TranscludeFn, WindowedListController};
pub use types::{
    Config, Edge, FetchErrorMsg, Item, PageLoadedMsg, Record, ScrollMsg, DEFAULT_BUFFER_LENGTH,
};
pub use window::ItemWindow;
