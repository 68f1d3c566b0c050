//! Widget layout and hit testing for the overlay window.
//!
//! Dimensions are declared in logical pixels and scaled to physical pixels
//! with the window's scale factor.

use super::geometry::{Point, Rect, Size};

/// Logical window width.
pub const WINDOW_WIDTH: f64 = 280.0;

/// Logical window height.
pub const WINDOW_HEIGHT: f64 = 160.0;

const RING_CENTER: Point = Point::new(140.0, 66.0);
const RING_RADIUS: f64 = 40.0;
const RING_STROKE: f64 = 3.0;
const DIGIT_HEIGHT: f64 = 16.0;
const BUTTON_SIZE: f64 = 24.0;
const BUTTON_ROW_Y: f64 = 134.0;
const BUTTON_SPACING: f64 = 32.0;

/// Region of the window under a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// The play/pause button
    ToggleButton,
    /// The stop/reset button
    ResetButton,
    /// Anything else; pressing here starts a drag
    Background,
}

/// Physical-pixel layout of the overlay widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Scale factor the layout was computed for
    pub scale: f64,
    /// Window size
    pub size: Size,
    /// Center of the progress ring and the time label
    pub ring_center: Point,
    /// Ring radius, measured to the middle of the stroke
    pub ring_radius: f64,
    /// Ring stroke width
    pub ring_stroke: f64,
    /// Height of one digit of the time label
    pub digit_height: f64,
    /// Play/pause button bounds
    pub toggle_button: Rect,
    /// Stop/reset button bounds
    pub reset_button: Rect,
}

impl Layout {
    /// Computes the layout for a window with the given scale factor.
    pub fn new(scale: f64) -> Self {
        let button = |center_x: f64| {
            Rect::new(
                (center_x - BUTTON_SIZE / 2.0) * scale,
                (BUTTON_ROW_Y - BUTTON_SIZE / 2.0) * scale,
                BUTTON_SIZE * scale,
                BUTTON_SIZE * scale,
            )
        };

        Self {
            scale,
            size: Self::logical_size().scaled(scale),
            ring_center: Point::new(RING_CENTER.x * scale, RING_CENTER.y * scale),
            ring_radius: RING_RADIUS * scale,
            ring_stroke: RING_STROKE * scale,
            digit_height: DIGIT_HEIGHT * scale,
            toggle_button: button(WINDOW_WIDTH / 2.0 - BUTTON_SPACING / 2.0),
            reset_button: button(WINDOW_WIDTH / 2.0 + BUTTON_SPACING / 2.0),
        }
    }

    /// Returns the window size in logical pixels.
    pub fn logical_size() -> Size {
        Size::new(WINDOW_WIDTH, WINDOW_HEIGHT)
    }

    /// Classifies a window-relative point.
    pub fn hit_test(&self, point: Point) -> HitRegion {
        if self.toggle_button.contains(point) {
            HitRegion::ToggleButton
        } else if self.reset_button.contains(point) {
            HitRegion::ResetButton
        } else {
            HitRegion::Background
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(1.0)
    }
}
