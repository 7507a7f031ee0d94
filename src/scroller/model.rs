//! The controller struct, construction, accessors and lifecycle.

use super::fetch::DataSource;
use super::types::{Config, EdgeState};
use super::window::ItemWindow;
use crate::error::{Result, ScrollerError};
use crate::host::Host;
use crate::spinner::LoadingSpinner;
use crate::viewport::{Frame, ScrollWriter};
use bubbletea_rs::Cmd;
use std::sync::atomic::{AtomicI64, Ordering};

// Internal ID management for controller instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Materializes a fetched record into a host node.
/// `Send` so the controller can live inside a bubbletea-rs `Model`.
pub type TranscludeFn<Id, D, E> = Box<dyn FnMut(&Id, &D) -> E + Send>;

/// Windowed infinite-scroll controller.
///
/// Keeps a bounded window of items mounted in the host while the user
/// scrolls through a paged dataset. Items that scroll fully out of view in
/// the trailing direction are evicted and replaced by spacer margins; items
/// are fetched at whichever edge runs out of content. Every mutation above
/// the viewport is compensated by a scroll write so the content under the
/// user's eyes does not move.
///
/// The controller is driven by three kinds of input:
///
/// - [`init`](Self::init), once;
/// - scroll events, through [`handle_scroll`](Self::handle_scroll) or
///   [`update`](Self::update) with a [`ScrollMsg`](super::ScrollMsg);
/// - settled fetches, through [`update`](Self::update) or
///   [`handle_page`](Self::handle_page).
///
/// Fetches are returned as bubbletea-rs [`Cmd`]s. The runtime awaits them and
/// feeds the resulting [`PageLoadedMsg`](super::PageLoadedMsg) back.
///
/// # Examples
///
/// ```rust
/// use windowed_scroller::scroller::WindowedListController;
/// use windowed_scroller::sim::{row_element, MemoryHost, MemorySource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let host = MemoryHost::new(200.0).with_loading_template(20.0);
/// let source = MemorySource::uniform(1_000, 50.0);
/// let mut list = WindowedListController::new(source, host, row_element);
///
/// // Keep feeding settled fetches back until the viewport is filled.
/// let mut next = list.init().unwrap();
/// while let Some(cmd) = next {
///     let msg = cmd.await.unwrap();
///     next = list.update(msg);
/// }
///
/// assert_eq!(list.item_ids(), vec![0, 1, 2, 3, 4]);
/// assert!(!list.loading_items_after());
/// # }
/// ```
pub struct WindowedListController<S: DataSource, H: Host> {
    pub(super) id: i64,
    pub(super) config: Config,
    pub(super) source: S,
    pub(super) host: H,
    pub(super) transclude: TranscludeFn<S::Id, S::Data, H::Element>,
    pub(super) spinner: LoadingSpinner<H::Element>,
    pub(super) window: ItemWindow<S::Id, S::Data, H::Element>,
    pub(super) writer: ScrollWriter,
    /// Carousel top relative to the viewport top.
    pub(super) skew: f64,
    /// Document position of the content element when margins are zero.
    pub(super) offset: f64,
    /// Scroll position seen by the last scroll event.
    pub(super) last_pos: f64,
    pub(super) margin_before: f64,
    pub(super) margin_after: f64,
    pub(super) before: EdgeState<S::Id, H::Element>,
    pub(super) after: EdgeState<S::Id, H::Element>,
    pub(super) next_ticket: u64,
    pub(super) initialized: bool,
}

impl<S: DataSource, H: Host> WindowedListController<S, H> {
    /// Creates a controller with the default [`Config`].
    ///
    /// Nothing happens until [`init`](Self::init) is called.
    pub fn new<F>(source: S, host: H, transclude: F) -> Self
    where
        F: FnMut(&S::Id, &S::Data) -> H::Element + Send + 'static,
    {
        Self {
            id: next_id(),
            config: Config::default(),
            source,
            host,
            transclude: Box::new(transclude),
            spinner: LoadingSpinner::new(),
            window: ItemWindow::new(),
            writer: ScrollWriter::new(),
            skew: 0.0,
            offset: 0.0,
            last_pos: 0.0,
            margin_before: 0.0,
            margin_after: 0.0,
            before: EdgeState::Idle,
            after: EdgeState::Idle,
            next_ticket: 0,
            initialized: false,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    /// Replaces the configuration. Takes effect with the next fetch.
    pub fn set_config(&mut self, config: Config) {
        if config.buffer_length == 0 {
            tracing::debug!("scroller: buffer_length 0 raised to 1");
        }
        self.config = config;
    }

    /// Replaces the function that turns fetched records into host nodes.
    pub fn set_transclusion_function<F>(&mut self, transclude: F)
    where
        F: FnMut(&S::Id, &S::Data) -> H::Element + Send + 'static,
    {
        self.transclude = Box::new(transclude);
    }

    /// Wires the controller to the host and requests the first page.
    ///
    /// Collects the loading template, captures the initial offset of the
    /// content element and issues `load_range_after(None, buffer_length)`.
    ///
    /// # Errors
    ///
    /// [`ScrollerError::AlreadyInitialized`] if called twice without a
    /// [`teardown`](Self::teardown) in between.
    pub fn init(&mut self) -> Result<Option<Cmd>> {
        if self.initialized {
            return Err(ScrollerError::AlreadyInitialized);
        }
        self.initialized = true;
        self.spinner.collect(&mut self.host);

        let scroll = self.host.scroll_position();
        let container_top = self.host.container_top();
        self.offset = scroll + container_top;
        self.skew = container_top;
        self.last_pos = scroll;
        tracing::debug!(id = self.id, offset = self.offset, "scroller: init");

        let cmd = self.request_after(None);
        self.writer.flush(&mut self.host);
        Ok(cmd)
    }

    /// Unmounts and disposes every item, drops loading placeholders and
    /// resets the layout state. Fetches still in flight are ignored when
    /// they settle. The controller can be initialized again afterwards.
    pub fn teardown(&mut self) {
        for pending in [self.before.settle(), self.after.settle()].into_iter().flatten() {
            if let Some(placeholder) = pending.placeholder {
                LoadingSpinner::remove(&mut self.host, placeholder);
            }
        }
        let items = self.window.drain();
        tracing::debug!(id = self.id, items = items.len(), "scroller: teardown");
        for item in items {
            self.host.remove(&item.element);
            self.source.dispose_item(item.id, item.data);
        }
        self.skew = 0.0;
        self.margin_before = 0.0;
        self.margin_after = 0.0;
        self.host.apply_margins(0.0, 0.0);
        self.writer.reset();
        self.initialized = false;
    }

    /// Unique id of this controller, carried by its messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether [`init`](Self::init) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The data source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably. Used by drivers to deliver user scrolls.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Node mounted for `id`, if it is in the window.
    pub fn get_item_element_by_id(&self, id: &S::Id) -> Option<&H::Element> {
        self.window.element(id)
    }

    /// Id of the first mounted item.
    pub fn first_item_id(&self) -> Option<S::Id> {
        self.window.first().map(|item| item.id.clone())
    }

    /// Id of the last mounted item.
    pub fn last_item_id(&self) -> Option<S::Id> {
        self.window.last().map(|item| item.id.clone())
    }

    /// Ids of the mounted items in scroll order.
    pub fn item_ids(&self) -> Vec<S::Id> {
        self.window.ids()
    }

    /// Data of the mounted item with `id`.
    pub fn item_data(&self, id: &S::Id) -> Option<&S::Data> {
        let index = self.window.index_of(id)?;
        self.window.get(index).map(|item| &item.data)
    }

    /// Number of mounted items.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether no item is mounted.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Unpaid height debt above the viewport (carousel top relative to the
    /// viewport top).
    pub fn skew(&self) -> f64 {
        self.skew
    }

    /// Spacer height standing in for evicted leading items.
    pub fn margin_before(&self) -> f64 {
        self.margin_before
    }

    /// Spacer height standing in for evicted trailing items.
    pub fn margin_after(&self) -> f64 {
        self.margin_after
    }

    /// Position of the content element captured at init.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Scroll position seen by the last scroll event.
    pub fn last_position(&self) -> f64 {
        self.last_pos
    }

    /// Whether a fetch before the first item is outstanding.
    pub fn loading_items_before(&self) -> bool {
        self.before.is_loading()
    }

    /// Whether a fetch after the last item is outstanding.
    pub fn loading_items_after(&self) -> bool {
        self.after.is_loading()
    }

    /// The scroll range allowed while fetches are pending.
    pub fn frame(&self) -> Frame {
        Frame::new(
            self.margin_before + self.offset,
            self.host.content_height(),
            self.host.viewport_height(),
        )
    }

    /// Number of programmatic scroll writes issued so far.
    pub fn scroll_write_count(&self) -> u64 {
        self.writer.flush_count()
    }

    pub(super) fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}
