//! Window operations the overlay controller depends on.
//!
//! The real implementation wraps a winit window; tests drive the controller
//! through [`MockSurface`].

use std::sync::{Arc, Mutex};

use super::geometry::{Point, Size};

/// The handful of window operations the overlay needs.
pub trait OverlaySurface {
    /// Top-left position of the window as the OS last reported it.
    ///
    /// Window-relative cursor positions are measured against this frame.
    fn origin(&self) -> Point;

    /// Asks the OS to move the window's top-left corner to `origin`.
    ///
    /// The move may land later; [`origin`](Self::origin) follows once the OS
    /// confirms it.
    fn set_origin(&mut self, origin: Point);

    /// Records a position reported by the OS after a move.
    fn sync_origin(&mut self, origin: Point);

    /// Outer window size in physical pixels.
    fn size(&self) -> Size;

    /// Sets whole-window alpha in `[0, 1]`.
    fn set_alpha(&mut self, alpha: f64);

    /// Asks for a repaint at the next opportunity.
    fn request_redraw(&self);
}

// ============================================================================
// MockSurface
// ============================================================================

/// Records every call made by the controller.
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub origins: Vec<Point>,
    pub alphas: Vec<f64>,
    pub redraws: usize,
}

/// In-memory surface for testing.
///
/// The log is shared so a test can keep inspecting it after the surface has
/// been handed to a controller.
#[derive(Debug, Clone)]
pub struct MockSurface {
    origin: Point,
    size: Size,
    /// Moves wait for [`sync_origin`](OverlaySurface::sync_origin)
    lagging: bool,
    log: Arc<Mutex<SurfaceLog>>,
}

impl MockSurface {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            origin,
            size,
            lagging: false,
            log: Arc::new(Mutex::new(SurfaceLog::default())),
        }
    }

    /// Creates a surface whose moves only take effect once the position is
    /// reported back, like a window manager applying moves asynchronously.
    pub fn lagging(origin: Point, size: Size) -> Self {
        Self {
            lagging: true,
            ..Self::new(origin, size)
        }
    }

    /// Returns the last requested origin, if any.
    pub fn last_origin(&self) -> Option<Point> {
        self.log.lock().unwrap().origins.last().copied()
    }

    /// Returns the alpha values applied so far.
    pub fn alphas(&self) -> Vec<f64> {
        self.log.lock().unwrap().alphas.clone()
    }

    /// Returns the origins applied so far.
    pub fn origins(&self) -> Vec<Point> {
        self.log.lock().unwrap().origins.clone()
    }

    /// Returns the last alpha, if any was applied.
    pub fn last_alpha(&self) -> Option<f64> {
        self.log.lock().unwrap().alphas.last().copied()
    }

    pub fn redraw_count(&self) -> usize {
        self.log.lock().unwrap().redraws
    }
}

impl OverlaySurface for MockSurface {
    fn origin(&self) -> Point {
        self.origin
    }

    fn set_origin(&mut self, origin: Point) {
        if !self.lagging {
            self.origin = origin;
        }
        self.log.lock().unwrap().origins.push(origin);
    }

    fn sync_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.log.lock().unwrap().alphas.push(alpha);
    }

    fn request_redraw(&self) {
        self.log.lock().unwrap().redraws += 1;
    }
}
