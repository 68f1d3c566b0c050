//! Overlay window controller.
//!
//! This module provides:
//! - Delta-based dragging from anywhere outside the buttons
//! - Whole-window opacity, clamped to the supported range
//! - One-time centering on the usable screen area
//! - Rendering of the ring, the time label and the buttons
//!
//! # Architecture
//!
//! - `geometry.rs`, `drag.rs`, `layout.rs`: pure and fully testable
//! - `render.rs`: tiny-skia drawing into an offscreen pixmap
//! - `surface.rs`: the window operations the controller needs
//! - `window.rs`: the winit/softbuffer implementation of those operations
//!
//! [`OverlayController`] holds no platform state of its own, so the same
//! logic runs against [`MockSurface`] in tests.

pub mod drag;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod surface;
pub mod window;

pub use drag::DragTracker;
pub use geometry::{centered_origin, Point, Rect, Size};
pub use layout::{HitRegion, Layout};
pub use render::Renderer;
pub use surface::{MockSurface, OverlaySurface};
pub use window::{WinitSurface, WINDOW_TITLE};

use thiserror::Error;

use crate::engine::TimerCommand;
use crate::types::{clamp_opacity, TimerSnapshot};

// ============================================================================
// OverlayError
// ============================================================================

/// Errors raised while creating or drawing the overlay window.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("ウィンドウの作成に失敗しました: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("描画サーフェスの初期化に失敗しました: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),

    #[error("描画バッファを確保できません ({width}x{height})")]
    Pixmap { width: u32, height: u32 },

    #[error("イベントループの実行に失敗しました: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

// ============================================================================
// OverlayController
// ============================================================================

/// Presentation logic of the overlay window.
///
/// The controller tolerates a missing window: until a surface is attached,
/// opacity changes and placement are no-ops.
#[derive(Debug)]
pub struct OverlayController<S: OverlaySurface> {
    surface: Option<S>,
    layout: Layout,
    drag: DragTracker,
    /// Window position requested by the current drag
    drag_origin: Option<Point>,
    /// Last pointer location, relative to the window
    cursor: Option<Point>,
    snapshot: TimerSnapshot,
    applied_opacity: Option<f64>,
    placed: bool,
}

impl<S: OverlaySurface> OverlayController<S> {
    /// Creates a controller with no window attached.
    pub fn new(layout: Layout) -> Self {
        Self {
            surface: None,
            layout,
            drag: DragTracker::new(),
            drag_origin: None,
            cursor: None,
            snapshot: TimerSnapshot::default(),
            applied_opacity: None,
            placed: false,
        }
    }

    /// Attaches the window and applies the current opacity to it.
    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
        self.applied_opacity = None;
        self.apply_opacity(self.snapshot.opacity);
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Detaches and returns the window.
    pub fn detach(&mut self) -> Option<S> {
        self.pointer_released();
        self.surface.take()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Recomputes the layout after a scale factor change.
    pub fn set_scale(&mut self, scale: f64) {
        self.layout = Layout::new(scale);
        self.request_redraw();
    }

    /// Returns the latest timer snapshot.
    pub fn snapshot(&self) -> &TimerSnapshot {
        &self.snapshot
    }

    /// Stores a new engine snapshot, applies its opacity if it changed and
    /// schedules a repaint.
    pub fn apply_snapshot(&mut self, snapshot: TimerSnapshot) {
        let opacity = snapshot.opacity;
        self.snapshot = snapshot;
        if self.applied_opacity != Some(clamp_opacity(opacity)) {
            self.apply_opacity(opacity);
        }
        self.request_redraw();
    }

    /// Applies `value`, clamped to the supported range, as window alpha.
    ///
    /// Returns the alpha actually applied, or `None` when there is no window
    /// or the value is not a number.
    pub fn apply_opacity(&mut self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let surface = self.surface.as_mut()?;
        let alpha = clamp_opacity(value);
        surface.set_alpha(alpha);
        self.applied_opacity = Some(alpha);
        tracing::debug!(alpha, "ウィンドウ透明度を適用しました");
        Some(alpha)
    }

    /// Returns the alpha last applied to the window.
    pub fn applied_opacity(&self) -> Option<f64> {
        self.applied_opacity
    }

    /// Centers the window on `work_area` the first time it is called.
    ///
    /// Returns the new origin, or `None` if already placed or no window is
    /// attached.
    pub fn place_centered(&mut self, work_area: Rect) -> Option<Point> {
        if self.placed {
            return None;
        }
        let surface = self.surface.as_mut()?;
        let origin = centered_origin(work_area, surface.size());
        surface.set_origin(origin);
        self.placed = true;
        tracing::debug!(x = origin.x, y = origin.y, "ウィンドウを中央に配置しました");
        Some(origin)
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Handles a pointer move reported relative to the window.
    ///
    /// While dragging, moves the window by the pointer's displacement in
    /// screen coordinates since the previous event. The pointer is placed on
    /// screen using the window position the OS has confirmed, while the
    /// displacement accumulates onto the position the drag last requested,
    /// so moves the OS applies late neither drop nor repeat a delta.
    pub fn cursor_moved(&mut self, position: Point) {
        self.cursor = Some(position);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let confirmed = surface.origin();
        if let Some(delta) = self.drag.motion(confirmed + position) {
            let target = self.drag_origin.unwrap_or(confirmed) + delta;
            self.drag_origin = Some(target);
            surface.set_origin(target);
        }
    }

    /// Handles the OS reporting the window's new position.
    pub fn window_moved(&mut self, origin: Point) {
        if let Some(surface) = self.surface.as_mut() {
            surface.sync_origin(origin);
        }
    }

    /// Handles the primary button going down.
    ///
    /// A press on a button maps to an engine command. A press anywhere else
    /// starts a drag.
    pub fn pointer_pressed(&mut self) -> Option<TimerCommand> {
        let position = self.cursor?;
        match self.layout.hit_test(position) {
            HitRegion::ToggleButton => Some(TimerCommand::Toggle),
            HitRegion::ResetButton => Some(TimerCommand::Reset),
            HitRegion::Background => {
                let origin = self.surface.as_ref()?.origin();
                self.drag.press(origin + position);
                self.drag_origin = Some(origin);
                None
            }
        }
    }

    /// Handles the primary button going up.
    pub fn pointer_released(&mut self) {
        self.drag.release();
        self.drag_origin = None;
    }

    /// Forgets the pointer location once it leaves the window.
    ///
    /// An active drag keeps its anchor so it can continue when events resume.
    pub fn cursor_left(&mut self) {
        if !self.drag.is_dragging() {
            self.cursor = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    fn request_redraw(&self) {
        if let Some(surface) = self.surface.as_ref() {
            surface.request_redraw();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
