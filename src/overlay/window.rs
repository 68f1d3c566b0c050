//! The winit-backed overlay window.
//!
//! Frames are rendered with tiny-skia and presented through softbuffer.
//! Whole-window alpha and the usable screen area come from AppKit on macOS.
//! Other platforms fade the rendered frame instead and use the monitor
//! bounds as the work area.

use std::num::NonZeroU32;
use std::sync::Arc;

use softbuffer::{Context, Surface};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowLevel};

use super::geometry::{Point, Rect, Size};
use super::layout::{Layout, WINDOW_HEIGHT, WINDOW_WIDTH};
use super::render::Renderer;
use super::surface::OverlaySurface;
use super::OverlayError;
use crate::types::TimerSnapshot;

/// Window title; also used to find the native window on macOS.
pub const WINDOW_TITLE: &str = "Floating Timer";

// ============================================================================
// WinitSurface
// ============================================================================

/// A borderless, always-on-top overlay window.
pub struct WinitSurface {
    window: Arc<Window>,
    /// Position from the last `WindowEvent::Moved`
    origin: Point,
    alpha: f64,
    _context: Context<Arc<Window>>,
    surface: Surface<Arc<Window>, Arc<Window>>,
    renderer: Renderer,
}

impl WinitSurface {
    /// Creates the overlay window. It stays hidden until [`show`](Self::show).
    ///
    /// # Errors
    ///
    /// Returns an error if the window or its drawing surface cannot be
    /// created.
    pub fn create(event_loop: &ActiveEventLoop) -> Result<Self, OverlayError> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(false)
            .with_decorations(false)
            .with_transparent(true)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_visible(false);

        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, Arc::clone(&window))?;
        let renderer = Renderer::new(&Layout::new(window.scale_factor()))?;

        let origin = window
            .outer_position()
            .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
            .unwrap_or_default();

        // NSApplication lists ordered-out windows too, so the still hidden
        // window is found by its title here.
        #[cfg(target_os = "macos")]
        if !macos::join_all_spaces(WINDOW_TITLE) {
            tracing::warn!("ウィンドウが見つからず、全デスクトップ表示を設定できませんでした");
        }

        tracing::debug!(x = origin.x, y = origin.y, "オーバーレイウィンドウを作成しました");

        Ok(Self {
            window,
            origin,
            alpha: 1.0,
            _context: context,
            surface,
            renderer,
        })
    }

    /// Makes the window visible.
    pub fn show(&self) {
        self.window.set_visible(true);
    }

    /// Returns the underlying winit window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the alpha last applied.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the usable screen area in physical pixels.
    ///
    /// On macOS this excludes the menu bar and the Dock.
    pub fn work_area(&self) -> Option<Rect> {
        #[cfg(target_os = "macos")]
        if let Some(area) = macos::visible_frame(self.window.scale_factor()) {
            return Some(area);
        }

        let monitor = self
            .window
            .current_monitor()
            .or_else(|| self.window.primary_monitor())?;
        let position = monitor.position();
        let size = monitor.size();
        Some(Rect::new(
            f64::from(position.x),
            f64::from(position.y),
            f64::from(size.width),
            f64::from(size.height),
        ))
    }

    /// Renders `snapshot` and presents it.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame buffer cannot be resized or presented.
    pub fn draw(&mut self, snapshot: &TimerSnapshot) -> Result<(), OverlayError> {
        let layout = Layout::new(self.window.scale_factor());
        let pixmap = self.renderer.render(snapshot, &layout)?;
        let (Some(width), Some(height)) =
            (NonZeroU32::new(pixmap.width()), NonZeroU32::new(pixmap.height()))
        else {
            return Ok(());
        };

        self.surface.resize(width, height)?;
        let mut buffer = self.surface.buffer_mut()?;
        self.renderer.copy_to(&mut buffer);
        buffer.present()?;
        Ok(())
    }
}

impl OverlaySurface for WinitSurface {
    fn origin(&self) -> Point {
        self.origin
    }

    fn set_origin(&mut self, origin: Point) {
        self.window.set_outer_position(PhysicalPosition::new(
            origin.x.round() as i32,
            origin.y.round() as i32,
        ));
    }

    fn sync_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    fn size(&self) -> Size {
        let size = self.window.outer_size();
        Size::new(f64::from(size.width), f64::from(size.height))
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;

        #[cfg(target_os = "macos")]
        macos::set_alpha(WINDOW_TITLE, alpha);

        #[cfg(not(target_os = "macos"))]
        self.renderer.set_alpha(alpha);
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl std::fmt::Debug for WinitSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinitSurface")
            .field("origin", &self.origin)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// macOS
// ============================================================================

#[cfg(target_os = "macos")]
mod macos {
    use objc2_app_kit::{NSApplication, NSScreen, NSWindow, NSWindowCollectionBehavior};
    use objc2_foundation::MainThreadMarker;

    use crate::overlay::geometry::Rect;

    /// Runs `f` on the app's window titled `title`, visible or not.
    ///
    /// Returns `false` if no such window exists.
    fn with_window(title: &str, f: impl FnOnce(&NSWindow)) -> bool {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::warn!("メインスレッド外からウィンドウを操作しようとしました");
            return false;
        };
        let app = NSApplication::sharedApplication(mtm);
        for window in app.windows().iter() {
            if window.title().to_string() == title {
                f(&window);
                return true;
            }
        }
        false
    }

    #[allow(unused_unsafe)]
    pub(super) fn set_alpha(title: &str, alpha: f64) {
        if !with_window(title, |window| unsafe { window.setAlphaValue(alpha) }) {
            tracing::debug!(alpha, "透明度を適用するウィンドウがありません");
        }
    }

    #[allow(unused_unsafe)]
    pub(super) fn join_all_spaces(title: &str) -> bool {
        with_window(title, |window| unsafe {
            window.setCollectionBehavior(
                NSWindowCollectionBehavior::CanJoinAllSpaces
                    | NSWindowCollectionBehavior::Stationary,
            )
        })
    }

    /// Main screen's visible frame converted to top-left physical pixels.
    pub(super) fn visible_frame(scale: f64) -> Option<Rect> {
        let mtm = MainThreadMarker::new()?;
        let screen = NSScreen::mainScreen(mtm)?;
        let frame = screen.frame();
        let visible = screen.visibleFrame();

        // Cocoa measures y upward from the bottom of the screen.
        let top = frame.origin.y + frame.size.height - (visible.origin.y + visible.size.height);
        Some(Rect::new(
            visible.origin.x * scale,
            top * scale,
            visible.size.width * scale,
            visible.size.height * scale,
        ))
    }

}
