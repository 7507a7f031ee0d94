//! Viewport adapter for the scroll container.
//!
//! The controller never touches the host's scroll position directly. Reads go
//! through [`ScrollWriter::position`] and writes are recorded as pending until
//! the end of the current entry point, when [`ScrollWriter::flush`] issues a
//! single [`Viewport::set_scroll_position`] call.
//!
//! # Suppression
//!
//! Every programmatic write makes the host dispatch a scroll event that the
//! controller must not treat as user input. The writer arms a one-shot
//! [`Suppression`] once the write has moved the container; the next scroll
//! event consumes it.
//! Because writes are coalesced, a turn can never arm twice, so the
//! suppression can never be lost to a second write racing the first event.
//!
//! ```rust
//! use windowed_scroller::viewport::{ScrollWriter, Suppression};
//! use windowed_scroller::sim::MemoryHost;
//!
//! let mut host = MemoryHost::new(400.0).with_trailing(2000.0);
//! let mut writer = ScrollWriter::new();
//!
//! writer.adjust(&host, 30.0);
//! writer.adjust(&host, 20.0);
//! assert_eq!(writer.position(&host), 50.0);
//!
//! writer.flush(&mut host);
//! assert_eq!(host.scroll_writes(), &[50.0]);
//! assert_eq!(writer.suppression(), Suppression::Armed);
//! assert!(writer.take_suppression());
//! assert!(!writer.take_suppression());
//! ```

/// Scroll position and size of the scrolling container.
///
/// All measurements are in pixels. Implementations return `0.0` when a
/// measurement is unavailable instead of failing.
pub trait Viewport {
    /// Current scroll offset of the container.
    fn scroll_position(&self) -> f64;

    /// Moves the container to `pos`. Hosts may clamp the value to their
    /// scrollable range, like browsers do.
    fn set_scroll_position(&mut self, pos: f64);

    /// Visible height of the container.
    fn viewport_height(&self) -> f64;

    /// Top edge of the content container relative to the viewport top.
    ///
    /// Only read once, at initialization, to find where the list starts
    /// inside the scrolling area.
    fn container_top(&self) -> f64;
}

/// One-shot marker for a programmatic write that has not yet been seen as a
/// scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Suppression {
    /// No synthetic event is expected.
    #[default]
    Consumed,
    /// The next scroll event was produced by our own write.
    Armed,
}

/// Coalescing writer for the host scroll position.
#[derive(Debug, Clone, Default)]
pub struct ScrollWriter {
    pending: Option<f64>,
    suppression: Suppression,
    flushes: u64,
}

impl ScrollWriter {
    /// Creates a writer with nothing pending and suppression consumed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The position the container will have once pending writes are flushed.
    pub fn position<V: Viewport + ?Sized>(&self, viewport: &V) -> f64 {
        self.pending.unwrap_or_else(|| viewport.scroll_position())
    }

    /// Records an absolute write. Replaces any earlier pending write.
    pub fn write(&mut self, pos: f64) {
        self.pending = Some(pos);
    }

    /// Records a relative write on top of the effective position.
    pub fn adjust<V: Viewport + ?Sized>(&mut self, viewport: &V, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let pos = self.position(viewport) + delta;
        self.pending = Some(pos);
    }

    /// Whether a write is waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the pending write, if any, and arms suppression.
    ///
    /// A write that leaves the live position unchanged (equal, or clamped
    /// away by the host) does not arm: the host dispatches no event for it,
    /// and an armed flag would then swallow the next real user scroll.
    pub fn flush<V: Viewport + ?Sized>(&mut self, viewport: &mut V) {
        let Some(pos) = self.pending.take() else {
            return;
        };
        let before = viewport.scroll_position();
        if pos == before {
            return;
        }
        tracing::trace!(pos, "viewport: programmatic scroll");
        viewport.set_scroll_position(pos);
        if viewport.scroll_position() == before {
            return;
        }
        self.suppression = Suppression::Armed;
        self.flushes += 1;
    }

    /// Consumes the suppression marker. Returns `true` if the current scroll
    /// event was produced by a programmatic write.
    pub fn take_suppression(&mut self) -> bool {
        match self.suppression {
            Suppression::Armed => {
                self.suppression = Suppression::Consumed;
                true
            }
            Suppression::Consumed => false,
        }
    }

    /// Current suppression state.
    pub fn suppression(&self) -> Suppression {
        self.suppression
    }

    /// Number of writes issued to the host so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// Drops any pending write and disarms suppression.
    pub fn reset(&mut self) {
        self.pending = None;
        self.suppression = Suppression::Consumed;
    }
}

/// The scroll range the user may reach while a fetch is pending.
///
/// `start` is the top of the mounted window and `end` the last position at
/// which the bottom of the window is still inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// First allowed position.
    pub start: f64,
    /// Last allowed position, never below `start`.
    pub end: f64,
}

impl Frame {
    /// Computes the frame for a window starting at `start` with
    /// `content_height` pixels mounted inside a viewport of
    /// `viewport_height`.
    pub fn new(start: f64, content_height: f64, viewport_height: f64) -> Self {
        let end = (start + content_height - viewport_height).max(start);
        Self { start, end }
    }

    /// Clamps `pos` to the edges that are currently loading.
    pub fn clamp(&self, pos: f64, loading_before: bool, loading_after: bool) -> f64 {
        let mut framed = pos;
        if loading_before {
            framed = framed.max(self.start);
        }
        if loading_after {
            framed = framed.min(self.end);
        }
        framed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Fixed {
        pos: f64,
        writes: Vec<f64>,
    }

    impl Viewport for Fixed {
        fn scroll_position(&self) -> f64 {
            self.pos
        }

        fn set_scroll_position(&mut self, pos: f64) {
            self.pos = pos;
            self.writes.push(pos);
        }

        fn viewport_height(&self) -> f64 {
            100.0
        }

        fn container_top(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_writes_coalesce_into_one_flush() {
        let mut vp = Fixed::default();
        let mut writer = ScrollWriter::new();

        writer.adjust(&vp, 10.0);
        writer.write(40.0);
        writer.adjust(&vp, -5.0);
        assert_eq!(writer.position(&vp), 35.0);

        writer.flush(&mut vp);
        assert_eq!(vp.writes, vec![35.0]);
        assert_eq!(writer.flush_count(), 1);
        assert!(!writer.has_pending());
    }

    #[test]
    fn test_suppression_consumes_exactly_one_event() {
        let mut vp = Fixed::default();
        let mut writer = ScrollWriter::new();
        assert!(!writer.take_suppression());

        writer.write(20.0);
        writer.flush(&mut vp);
        assert_eq!(writer.suppression(), Suppression::Armed);
        assert!(writer.take_suppression());
        assert!(!writer.take_suppression());
        assert_eq!(writer.suppression(), Suppression::Consumed);
    }

    #[test]
    fn test_noop_write_does_not_arm() {
        let mut vp = Fixed {
            pos: 50.0,
            ..Default::default()
        };
        let mut writer = ScrollWriter::new();

        writer.write(50.0);
        writer.flush(&mut vp);
        assert!(vp.writes.is_empty());
        assert_eq!(writer.suppression(), Suppression::Consumed);
    }

    #[test]
    fn test_zero_adjust_leaves_nothing_pending() {
        let vp = Fixed::default();
        let mut writer = ScrollWriter::new();
        writer.adjust(&vp, 0.0);
        assert!(!writer.has_pending());
    }

    #[test]
    fn test_frame_end_never_precedes_start() {
        let frame = Frame::new(100.0, 50.0, 400.0);
        assert_eq!(frame.start, 100.0);
        assert_eq!(frame.end, 100.0);

        let frame = Frame::new(100.0, 1000.0, 400.0);
        assert_eq!(frame.end, 700.0);
    }

    #[test]
    fn test_frame_clamps_only_loading_edges() {
        let frame = Frame::new(100.0, 1000.0, 400.0);
        assert_eq!(frame.clamp(20.0, false, false), 20.0);
        assert_eq!(frame.clamp(20.0, true, false), 100.0);
        assert_eq!(frame.clamp(900.0, true, false), 900.0);
        assert_eq!(frame.clamp(900.0, false, true), 700.0);
        assert_eq!(frame.clamp(20.0, false, true), 20.0);
    }
}
