//! Delta-based window dragging.
//!
//! Each move translates the window by the distance from the previously
//! recorded pointer location, so the total displacement depends only on the
//! first and last pointer locations, never on how many moves were delivered.

use super::geometry::Point;

/// Tracks one pointer drag in screen coordinates.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    /// Last recorded pointer location while the button is held
    last: Option<Point>,
}

impl DragTracker {
    /// Creates an idle tracker.
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Starts a drag at `screen`.
    pub fn press(&mut self, screen: Point) {
        self.last = Some(screen);
    }

    /// Records a pointer move and returns the displacement to apply.
    ///
    /// Returns `None` when no drag is in progress.
    pub fn motion(&mut self, screen: Point) -> Option<Point> {
        let last = self.last.replace(screen)?;
        Some(screen - last)
    }

    /// Ends the drag.
    pub fn release(&mut self) {
        self.last = None;
    }

    /// Returns true while the button is held.
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
