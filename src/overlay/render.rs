//! Software rendering of the overlay with tiny-skia.
//!
//! Draws the background plate, the progress ring, a seven-segment `MM:SS`
//! label and the play/pause and stop icons into a pixmap that the window
//! copies into its softbuffer surface. Where the platform has no per-window
//! alpha, the frame itself is faded to the window opacity.

use std::f32::consts::{FRAC_PI_2, TAU};

use tiny_skia::{
    Color, FillRule, LineCap, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect as SkRect,
    Stroke, Transform,
};

use super::geometry::{Point, Rect};
use super::layout::Layout;
use super::OverlayError;
use crate::types::{RunState, TimerSnapshot};

// ============================================================================
// Palette
// ============================================================================

const PLATE: (u8, u8, u8) = (28, 28, 34);
const TRACK: (u8, u8, u8, u8) = (255, 255, 255, 52);
const PROGRESS: (u8, u8, u8, u8) = (96, 120, 255, 255);
const LABEL: (u8, u8, u8, u8) = (236, 236, 240, 255);
const PLAY: (u8, u8, u8, u8) = (72, 200, 110, 255);
const PAUSE: (u8, u8, u8, u8) = (255, 160, 40, 255);
const STOP: (u8, u8, u8, u8) = (240, 72, 72, 255);

/// Segments a..g of each decimal digit.
const SEGMENTS: [[bool; 7]; 10] = [
    [true, true, true, true, true, true, false],
    [false, true, true, false, false, false, false],
    [true, true, false, true, true, false, true],
    [true, true, true, true, false, false, true],
    [false, true, true, false, false, true, true],
    [true, false, true, true, false, true, true],
    [true, false, true, true, true, true, true],
    [true, true, true, false, false, false, false],
    [true, true, true, true, true, true, true],
    [true, true, true, true, false, true, true],
];

const DIGIT_WIDTH_RATIO: f64 = 0.56;
const COLON_WIDTH_RATIO: f64 = 0.3;
const GLYPH_GAP_RATIO: f64 = 0.18;
const SEGMENT_RATIO: f64 = 0.12;

// ============================================================================
// Renderer
// ============================================================================

/// Reusable frame renderer.
pub struct Renderer {
    pixmap: Pixmap,
    /// Whole-frame alpha in `[0, 1]`
    alpha: f32,
}

impl Renderer {
    /// Creates a renderer for the layout's window size.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Pixmap`] for a zero-sized layout.
    pub fn new(layout: &Layout) -> Result<Self, OverlayError> {
        Ok(Self {
            pixmap: allocate(layout)?,
            alpha: 1.0,
        })
    }

    /// Sets the alpha applied to whole frames from the next render on.
    pub fn set_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.alpha = alpha.clamp(0.0, 1.0) as f32;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Draws one frame for `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Pixmap`] if a resize to a zero size is requested.
    pub fn render(&mut self, snapshot: &TimerSnapshot, layout: &Layout) -> Result<&Pixmap, OverlayError> {
        let (width, height) = pixel_size(layout);
        if self.pixmap.width() != width || self.pixmap.height() != height {
            self.pixmap = allocate(layout)?;
        }

        let pixmap = &mut self.pixmap;
        pixmap.fill(Color::from_rgba8(PLATE.0, PLATE.1, PLATE.2, 255));

        draw_ring(pixmap, layout, snapshot.progress);
        draw_label(pixmap, layout, &snapshot.formatted_time);
        draw_toggle_icon(pixmap, layout.toggle_button, snapshot.run_state);
        draw_stop_icon(pixmap, layout.reset_button);
        if self.alpha < 1.0 {
            fade(pixmap, self.alpha);
        }

        Ok(&self.pixmap)
    }

    /// Copies the last frame into a softbuffer buffer of the same size.
    ///
    /// Opaque frames are written as `0RGB`. Faded frames carry their alpha in
    /// the top byte with premultiplied colors: ARGB visuals blend it, other
    /// surfaces ignore the byte and show the frame dimmed.
    pub fn copy_to(&self, buffer: &mut [u32]) {
        let translucent = self.alpha < 1.0;
        for (dst, px) in buffer.iter_mut().zip(self.pixmap.pixels()) {
            let alpha = if translucent { u32::from(px.alpha()) << 24 } else { 0 };
            *dst = alpha
                | (u32::from(px.red()) << 16)
                | (u32::from(px.green()) << 8)
                | u32::from(px.blue());
        }
    }

    /// Returns the last frame.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

fn pixel_size(layout: &Layout) -> (u32, u32) {
    (
        layout.size.width.round().max(0.0) as u32,
        layout.size.height.round().max(0.0) as u32,
    )
}

fn allocate(layout: &Layout) -> Result<Pixmap, OverlayError> {
    let (width, height) = pixel_size(layout);
    Pixmap::new(width, height).ok_or(OverlayError::Pixmap { width, height })
}

/// Scales every premultiplied pixel by `alpha`.
fn fade(pixmap: &mut Pixmap, alpha: f32) {
    let scale = |c: u8| (f32::from(c) * alpha).round() as u8;
    for px in pixmap.pixels_mut() {
        if let Some(faded) = PremultipliedColorU8::from_rgba(
            scale(px.red()),
            scale(px.green()),
            scale(px.blue()),
            scale(px.alpha()),
        ) {
            *px = faded;
        }
    }
}

fn paint(rgba: (u8, u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.0, rgba.1, rgba.2, rgba.3);
    paint.anti_alias = true;
    paint
}

fn fill_rect(pixmap: &mut Pixmap, x: f64, y: f64, w: f64, h: f64, color: (u8, u8, u8, u8)) {
    if let Some(rect) = SkRect::from_xywh(x as f32, y as f32, w as f32, h as f32) {
        pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
    }
}

// ============================================================================
// Ring
// ============================================================================

fn draw_ring(pixmap: &mut Pixmap, layout: &Layout, progress: f64) {
    let cx = layout.ring_center.x as f32;
    let cy = layout.ring_center.y as f32;
    let radius = layout.ring_radius as f32;
    let stroke = Stroke {
        width: layout.ring_stroke as f32,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };

    if let Some(track) = PathBuilder::from_circle(cx, cy, radius) {
        pixmap.stroke_path(&track, &paint(TRACK), &stroke, Transform::identity(), None);
    }

    let sweep = progress.clamp(0.0, 1.0) as f32 * TAU;
    if sweep <= 0.0 {
        return;
    }

    // Polyline arc from 12 o'clock, clockwise in screen coordinates.
    let segments = ((sweep / TAU) * 120.0).ceil().max(2.0) as u32;
    let mut pb = PathBuilder::new();
    for i in 0..=segments {
        let angle = -FRAC_PI_2 + sweep * (i as f32 / segments as f32);
        let (x, y) = (cx + radius * angle.cos(), cy + radius * angle.sin());
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    if let Some(arc) = pb.finish() {
        pixmap.stroke_path(&arc, &paint(PROGRESS), &stroke, Transform::identity(), None);
    }
}

// ============================================================================
// Label
// ============================================================================

/// Returns the label width for `text` at `height`.
pub fn label_width(text: &str, height: f64) -> f64 {
    let glyphs = text.chars().count();
    let advance: f64 = text
        .chars()
        .map(|c| {
            if c == ':' {
                COLON_WIDTH_RATIO * height
            } else {
                DIGIT_WIDTH_RATIO * height
            }
        })
        .sum();
    advance + glyphs.saturating_sub(1) as f64 * GLYPH_GAP_RATIO * height
}

fn draw_label(pixmap: &mut Pixmap, layout: &Layout, text: &str) {
    let h = layout.digit_height;
    let mut x = layout.ring_center.x - label_width(text, h) / 2.0;
    let y = layout.ring_center.y - h / 2.0;

    for c in text.chars() {
        match c.to_digit(10) {
            Some(digit) => {
                draw_digit(pixmap, Point::new(x, y), h, digit as usize);
                x += DIGIT_WIDTH_RATIO * h;
            }
            None => {
                draw_colon(pixmap, Point::new(x, y), h);
                x += COLON_WIDTH_RATIO * h;
            }
        }
        x += GLYPH_GAP_RATIO * h;
    }
}

fn draw_digit(pixmap: &mut Pixmap, at: Point, h: f64, digit: usize) {
    let w = DIGIT_WIDTH_RATIO * h;
    let t = SEGMENT_RATIO * h;
    let half = h / 2.0;
    let upright = half - 1.5 * t;
    let (x, y) = (at.x, at.y);

    let rects = [
        (x + t, y, w - 2.0 * t, t),
        (x + w - t, y + t, t, upright),
        (x + w - t, y + half + t / 2.0, t, upright),
        (x + t, y + h - t, w - 2.0 * t, t),
        (x, y + half + t / 2.0, t, upright),
        (x, y + t, t, upright),
        (x + t, y + half - t / 2.0, w - 2.0 * t, t),
    ];

    for (on, (rx, ry, rw, rh)) in SEGMENTS[digit % 10].iter().zip(rects) {
        if *on {
            fill_rect(pixmap, rx, ry, rw, rh, LABEL);
        }
    }
}

fn draw_colon(pixmap: &mut Pixmap, at: Point, h: f64) {
    let t = SEGMENT_RATIO * h;
    let x = at.x + (COLON_WIDTH_RATIO * h - t) / 2.0;
    fill_rect(pixmap, x, at.y + h * 0.3 - t / 2.0, t, t, LABEL);
    fill_rect(pixmap, x, at.y + h * 0.7 - t / 2.0, t, t, LABEL);
}

// ============================================================================
// Buttons
// ============================================================================

fn draw_toggle_icon(pixmap: &mut Pixmap, bounds: Rect, state: RunState) {
    let c = bounds.center();
    let s = bounds.size.width * 0.3;

    if state.is_running() {
        let bar = s * 0.6;
        fill_rect(pixmap, c.x - s * 0.8, c.y - s, bar, 2.0 * s, PAUSE);
        fill_rect(pixmap, c.x + s * 0.2, c.y - s, bar, 2.0 * s, PAUSE);
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to((c.x - s * 0.7) as f32, (c.y - s) as f32);
    pb.line_to((c.x + s) as f32, c.y as f32);
    pb.line_to((c.x - s * 0.7) as f32, (c.y + s) as f32);
    pb.close();
    if let Some(triangle) = pb.finish() {
        pixmap.fill_path(
            &triangle,
            &paint(PLAY),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

fn draw_stop_icon(pixmap: &mut Pixmap, bounds: Rect) {
    let c = bounds.center();
    let s = bounds.size.width * 0.27;
    fill_rect(pixmap, c.x - s, c.y - s, 2.0 * s, 2.0 * s, STOP);
}

// ============================================================================
// Tests
// ============================================================================
