//! Control panel configuration.
//!
//! This module decides which panel items exist and whether they are enabled
//! or checked for a given timer snapshot. The native tray menu is built from
//! the resulting [`PanelConfig`] on macOS.

use super::event::PanelItemId;
use crate::types::{RunState, TimerSnapshot, MAX_OPACITY, MIN_OPACITY, PRESET_MINUTES};

/// Opacity levels offered in the menu, in percent.
pub const OPACITY_LEVELS: [u32; 8] = [30, 40, 50, 60, 70, 80, 90, 100];

// ============================================================================
// PanelItemConfig
// ============================================================================

/// Configuration for a panel item.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelItemConfig {
    /// Item identifier
    pub id: PanelItemId,
    /// Display text
    pub text: String,
    /// Whether the item is clickable
    pub enabled: bool,
    /// Whether the item shows a check mark
    pub checked: bool,
}

impl PanelItemConfig {
    pub fn new(id: PanelItemId, text: impl Into<String>, enabled: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled,
            checked: false,
        }
    }

    /// Returns the item with the check mark set to `checked`.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

// ============================================================================
// PanelConfig
// ============================================================================

/// Complete panel configuration for one snapshot.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Title item (always disabled)
    pub title: PanelItemConfig,
    /// Status line (always disabled)
    pub status: PanelItemConfig,
    /// Start/pause item
    pub toggle: PanelItemConfig,
    /// Reset item
    pub reset: PanelItemConfig,
    /// Preset items, in ascending order
    pub presets: Vec<PanelItemConfig>,
    /// Opacity level items, in ascending order
    pub opacity_levels: Vec<PanelItemConfig>,
    /// Quit item (always enabled)
    pub quit: PanelItemConfig,
}

// ============================================================================
// PanelBuilder
// ============================================================================

/// Builds the panel configuration from a timer snapshot.
#[derive(Debug, Default)]
pub struct PanelBuilder;

impl PanelBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete panel configuration.
    pub fn build(&self, snapshot: &TimerSnapshot) -> PanelConfig {
        PanelConfig {
            title: PanelItemConfig::new(PanelItemId::Unknown, "フローティングタイマー", false),
            status: self.build_status_item(snapshot),
            toggle: self.build_toggle_item(snapshot),
            reset: self.build_reset_item(snapshot),
            presets: self.build_preset_items(snapshot),
            opacity_levels: self.build_opacity_items(snapshot),
            quit: PanelItemConfig::new(PanelItemId::Quit, "終了", true),
        }
    }

    fn build_status_item(&self, snapshot: &TimerSnapshot) -> PanelItemConfig {
        let label = match snapshot.run_state {
            RunState::Idle => "待機中",
            RunState::Running => "計測中",
            RunState::Paused => "一時停止",
            RunState::Completed => "完了",
        };
        PanelItemConfig::new(
            PanelItemId::Unknown,
            format!("{}: {}", label, snapshot.formatted_time),
            false,
        )
    }

    /// Toggle item; its label follows what a click would do.
    fn build_toggle_item(&self, snapshot: &TimerSnapshot) -> PanelItemConfig {
        let text = match snapshot.run_state {
            RunState::Running => "⏸ 一時停止",
            RunState::Paused => "▶ 再開",
            RunState::Idle | RunState::Completed => "▶ 開始",
        };
        PanelItemConfig::new(PanelItemId::Toggle, text, true)
    }

    /// Enabled when: not Idle
    fn build_reset_item(&self, snapshot: &TimerSnapshot) -> PanelItemConfig {
        PanelItemConfig::new(
            PanelItemId::Reset,
            "⏹ リセット",
            snapshot.run_state != RunState::Idle,
        )
    }

    /// Preset items; disabled while Running, checked for the current baseline.
    fn build_preset_items(&self, snapshot: &TimerSnapshot) -> Vec<PanelItemConfig> {
        let enabled = Self::is_preset_enabled(snapshot.run_state);
        PRESET_MINUTES
            .iter()
            .map(|&minutes| {
                PanelItemConfig::new(PanelItemId::Preset(minutes), format!("{}分", minutes), enabled)
                    .with_checked(snapshot.original_time.as_secs() == u64::from(minutes) * 60)
            })
            .collect()
    }

    fn build_opacity_items(&self, snapshot: &TimerSnapshot) -> Vec<PanelItemConfig> {
        let current = Self::opacity_percent(snapshot.opacity);
        OPACITY_LEVELS
            .iter()
            .map(|&percent| {
                PanelItemConfig::new(PanelItemId::Opacity(percent), format!("{}%", percent), true)
                    .with_checked(current == percent)
            })
            .collect()
    }

    /// Checks if preset items should be enabled.
    pub fn is_preset_enabled(state: RunState) -> bool {
        state.accepts_preset()
    }

    /// Rounds an opacity to whole percent.
    pub fn opacity_percent(opacity: f64) -> u32 {
        (opacity.clamp(MIN_OPACITY, MAX_OPACITY) * 100.0).round() as u32
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimerConfig, TimerState};
    use std::time::Duration;

    fn state() -> TimerState {
        TimerState::new(&TimerConfig::default())
    }

    // ------------------------------------------------------------------------
    // PanelBuilder Tests
    // ------------------------------------------------------------------------

    mod panel_builder_tests {
        use super::*;

        #[test]
        fn test_build_idle() {
            let config = PanelBuilder::new().build(&state().snapshot());

            assert_eq!(config.title.text, "フローティングタイマー");
            assert!(!config.title.enabled);
            assert_eq!(config.status.text, "待機中: 05:00");
            assert_eq!(config.toggle.text, "▶ 開始");
            assert!(!config.reset.enabled);
            assert!(config.presets.iter().all(|item| item.enabled));
            assert!(config.quit.enabled);
        }

        #[test]
        fn test_presets_disabled_while_running() {
            let mut state = state();
            state.start();
            let config = PanelBuilder::new().build(&state.snapshot());

            assert_eq!(config.toggle.text, "⏸ 一時停止");
            assert!(config.reset.enabled);
            assert!(config.presets.iter().all(|item| !item.enabled));
        }

        #[test]
        fn test_presets_enabled_while_paused() {
            let mut state = state();
            state.start();
            state.pause();
            let config = PanelBuilder::new().build(&state.snapshot());

            assert_eq!(config.toggle.text, "▶ 再開");
            assert!(config.presets.iter().all(|item| item.enabled));
        }

        #[test]
        fn test_preset_items_in_order() {
            let config = PanelBuilder::new().build(&state().snapshot());
            let ids: Vec<PanelItemId> = config.presets.iter().map(|item| item.id).collect();
            let expected: Vec<PanelItemId> =
                PRESET_MINUTES.iter().map(|&m| PanelItemId::Preset(m)).collect();
            assert_eq!(ids, expected);
            assert_eq!(config.presets[0].text, "1分");
        }

        #[test]
        fn test_current_preset_is_checked() {
            let config = PanelBuilder::new().build(&state().snapshot());
            let checked: Vec<PanelItemId> = config
                .presets
                .iter()
                .filter(|item| item.checked)
                .map(|item| item.id)
                .collect();
            assert_eq!(checked, vec![PanelItemId::Preset(5)]);
        }

        #[test]
        fn test_opacity_level_checked() {
            let mut state = state();
            state.set_opacity(0.7);
            let config = PanelBuilder::new().build(&state.snapshot());

            assert_eq!(config.opacity_levels.len(), 8);
            let checked: Vec<u32> = config
                .opacity_levels
                .iter()
                .filter(|item| item.checked)
                .filter_map(|item| match item.id {
                    PanelItemId::Opacity(p) => Some(p),
                    _ => None,
                })
                .collect();
            assert_eq!(checked, vec![70]);
        }

        #[test]
        fn test_off_grid_opacity_checks_nothing() {
            let mut state = state();
            state.set_opacity(0.95);
            let config = PanelBuilder::new().build(&state.snapshot());
            assert!(config.opacity_levels.iter().all(|item| !item.checked));
        }

        #[test]
        fn test_completed_status() {
            let mut state = state();
            state.start();
            state.tick(Duration::from_secs(300));
            let config = PanelBuilder::new().build(&state.snapshot());

            assert_eq!(config.status.text, "完了: 00:00");
            assert_eq!(config.toggle.text, "▶ 開始");
            assert!(config.reset.enabled);
        }
    }

    // ------------------------------------------------------------------------
    // Helper Tests
    // ------------------------------------------------------------------------

    mod helper_tests {
        use super::*;

        #[test]
        fn test_opacity_percent() {
            assert_eq!(PanelBuilder::opacity_percent(0.95), 95);
            assert_eq!(PanelBuilder::opacity_percent(0.1), 30);
            assert_eq!(PanelBuilder::opacity_percent(2.0), 100);
        }
    }
}
