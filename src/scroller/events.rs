//! Scroll-event handling and the message entry point.

use super::fetch::DataSource;
use super::model::WindowedListController;
use super::types::{FetchErrorMsg, PageLoadedMsg, ScrollMsg};
use crate::error::ScrollerError;
use crate::host::Host;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::time::Duration;

impl<S: DataSource, H: Host> WindowedListController<S, H> {
    /// Handles a scroll event dispatched by the host's scroll container.
    ///
    /// While a fetch is pending at an edge the position is clamped to the
    /// mounted content on that side, so the user cannot scroll into space
    /// that is about to be replaced. The movement since the previous event
    /// drives eviction and fetching through [`scroll`](Self::scroll).
    ///
    /// Returns the command of a newly issued fetch, if any.
    pub fn handle_scroll(&mut self) -> Option<Cmd> {
        if !self.initialized {
            return None;
        }
        let pos = self.host.scroll_position();
        let frame = self.frame();
        let framed_pos = frame.clamp(pos, self.before.is_loading(), self.after.is_loading());
        let delta = framed_pos - self.last_pos;
        tracing::trace!(
            frame_start = frame.start,
            frame_end = frame.end,
            pos,
            framed_pos,
            skew = self.skew,
            "scroller: scroll event"
        );

        let cmd = if self.writer.take_suppression() {
            // Our own write. Only a clamp moves the content relative to it.
            tracing::trace!(delta, "scroller: programmatic scroll ignored");
            self.dispatch(framed_pos - pos)
        } else {
            self.dispatch(delta)
        };
        self.last_pos += delta;

        if framed_pos != pos {
            // Keep whatever compensation the dispatch queued on top of the
            // clamped position.
            let compensation = self.writer.position(&self.host) - pos;
            self.writer.write(framed_pos + compensation);
        }
        self.writer.flush(&mut self.host);
        cmd
    }

    /// Applies a scroll movement of `delta` pixels.
    ///
    /// The first call after a programmatic scroll write is swallowed. A
    /// positive delta evicts leading items and fetches more at the end when
    /// the mounted content no longer reaches the viewport bottom; a negative
    /// one evicts trailing items and fetches more at the start when blank
    /// space shows above the window. A zero delta changes nothing.
    pub fn scroll(&mut self, delta: f64) -> Option<Cmd> {
        if self.writer.take_suppression() {
            tracing::trace!(delta, "scroller: programmatic scroll ignored");
            return None;
        }
        let cmd = self.dispatch(delta);
        self.writer.flush(&mut self.host);
        cmd
    }

    /// Elm-style entry point for the controller's messages.
    ///
    /// Handles [`ScrollMsg`] (id 0 or this controller's id) and the
    /// [`PageLoadedMsg`] produced by this controller's fetch commands. A
    /// rejected fetch comes back as a command yielding [`FetchErrorMsg`].
    /// Other messages are ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(scroll_msg) = msg.downcast_ref::<ScrollMsg>() {
            // If an ID is set, and the ID doesn't belong to this controller, reject the message.
            if scroll_msg.id > 0 && scroll_msg.id != self.id {
                return None;
            }
            return self.handle_scroll();
        }

        let page = msg.downcast::<PageLoadedMsg<S::Id, S::Data>>().ok()?;
        match self.handle_page(*page) {
            Ok(cmd) => cmd,
            Err(ScrollerError::Fetch { edge, source }) => {
                let err = FetchErrorMsg {
                    id: self.id,
                    edge,
                    err: source.to_string(),
                };
                Some(bubbletea_tick(Duration::from_nanos(1), move |_| {
                    Box::new(err.clone()) as Msg
                }))
            }
            Err(err) => {
                tracing::warn!(error = %err, "scroller: unexpected error");
                None
            }
        }
    }

    pub(super) fn dispatch(&mut self, delta: f64) -> Option<Cmd> {
        if delta == 0.0 {
            return None;
        }

        self.skew -= delta;

        if delta > 0.0 {
            self.shift();
            if self.can_push() {
                return self.request_after(self.last_item_id());
            }
        } else {
            self.pop();
            if self.can_unshift() {
                return self.request_before(self.first_item_id());
            }
        }
        None
    }
}
