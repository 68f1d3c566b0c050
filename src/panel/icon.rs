//! Tray title generation.
//!
//! This module handles:
//! - Generating the menu bar text (e.g., "⏱ 04:59")
//! - Detecting when the tray menu has to be rebuilt
//!
//! The text generation logic is platform-independent and fully testable.

use crate::types::{RunState, TimerSnapshot};

// ============================================================================
// Constants
// ============================================================================

/// Glyph while idle or counting down
const TIMER_GLYPH: &str = "⏱";

/// Glyph while paused
const PAUSED_GLYPH: &str = "⏸";

/// Glyph while the completion alert is showing
const DONE_GLYPH: &str = "🔔";

// ============================================================================
// IconManager
// ============================================================================

/// What the native menu depends on. The menu only needs rebuilding when one
/// of these changes, not on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MenuKey {
    run_state: RunState,
    original_secs: u64,
    opacity_percent: u32,
}

/// Generates the tray title and tracks menu-relevant changes.
#[derive(Debug, Default)]
pub struct IconManager {
    last_key: Option<MenuKey>,
}

impl IconManager {
    pub fn new() -> Self {
        Self { last_key: None }
    }

    /// Generates the title text for the menu bar.
    ///
    /// Format:
    /// - Idle/Running: "⏱ MM:SS"
    /// - Paused: "⏸ MM:SS"
    /// - Completed: "🔔 00:00"
    pub fn generate_title(&self, snapshot: &TimerSnapshot) -> String {
        format!("{} {}", Self::glyph(snapshot.run_state), snapshot.formatted_time)
    }

    /// Returns the glyph for a run state.
    pub fn glyph(state: RunState) -> &'static str {
        match state {
            RunState::Idle | RunState::Running => TIMER_GLYPH,
            RunState::Paused => PAUSED_GLYPH,
            RunState::Completed => DONE_GLYPH,
        }
    }

    /// Returns true if the menu built for the previous snapshot is stale.
    pub fn menu_changed(&mut self, snapshot: &TimerSnapshot) -> bool {
        let key = MenuKey {
            run_state: snapshot.run_state,
            original_secs: snapshot.original_time.as_secs(),
            opacity_percent: (snapshot.opacity * 100.0).round() as u32,
        };
        let changed = self.last_key != Some(key);
        if changed {
            self.last_key = Some(key);
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
