//! Floating Timer Library
//!
//! This library provides the core functionality of the floating timer widget.
//! It includes:
//! - Timer engine with a 100 ms tick and a deferred return to idle
//! - Overlay window controller: dragging, opacity and placement
//! - Software rendering of the ring, the time label and the buttons
//! - Control panel: menu bar tray (macOS only) and keyboard shortcuts
//! - Sound playback for the completion alert
//! - CLI argument parsing
//! - Type definitions for configuration and state

pub mod app;
pub mod cli;
pub mod engine;
pub mod overlay;
pub mod panel;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{RunState, TimerConfig, TimerSnapshot, TimerState};

// Re-export engine types
pub use engine::{TimerCommand, TimerEngine, TimerEvent};

// Re-export overlay types
pub use overlay::{
    DragTracker, Layout, MockSurface, OverlayController, OverlayError, OverlaySurface, Point,
    Rect, Size,
};

// Re-export panel types
pub use panel::{ControlPanel, PanelAction, PanelBuilder, PanelConfig, PanelItemId};

// Re-export sound types
pub use sound::{
    get_default_sound, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource,
};
