//! Event handling for control panel interactions.
//!
//! This module handles:
//! - Mapping panel items to actions
//! - Translating actions into engine commands
//!
//! Menu item ids travel through tray-icon as plain strings such as
//! `"preset:25"` or `"opacity:80"`; everything here is platform-independent.

use std::fmt;

use crate::engine::TimerCommand;
use crate::types::MAX_MINUTES;

// ============================================================================
// PanelAction
// ============================================================================

/// Actions that can be triggered from the control panel or the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    /// Start, pause or resume
    Toggle,
    /// Return to idle
    Reset,
    /// Apply a preset duration in minutes
    Preset(u32),
    /// One opacity step up
    OpacityUp,
    /// One opacity step down
    OpacityDown,
    /// Set an explicit opacity
    SetOpacity(f64),
    /// Quit the application
    Quit,
}

impl fmt::Display for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelAction::Toggle => write!(f, "toggle"),
            PanelAction::Reset => write!(f, "reset"),
            PanelAction::Preset(minutes) => write!(f, "preset({})", minutes),
            PanelAction::OpacityUp => write!(f, "opacity-up"),
            PanelAction::OpacityDown => write!(f, "opacity-down"),
            PanelAction::SetOpacity(value) => write!(f, "opacity({:.2})", value),
            PanelAction::Quit => write!(f, "quit"),
        }
    }
}

impl PanelAction {
    /// Converts the action into an engine command.
    ///
    /// Opacity steps stay relative and are resolved by the engine.
    /// Returns `None` for [`PanelAction::Quit`], which the application
    /// handles itself.
    pub fn to_command(&self) -> Option<TimerCommand> {
        match *self {
            PanelAction::Toggle => Some(TimerCommand::Toggle),
            PanelAction::Reset => Some(TimerCommand::Reset),
            PanelAction::Preset(minutes) => Some(TimerCommand::SetPreset(minutes)),
            PanelAction::OpacityUp => Some(TimerCommand::StepOpacity(1)),
            PanelAction::OpacityDown => Some(TimerCommand::StepOpacity(-1)),
            PanelAction::SetOpacity(value) => Some(TimerCommand::SetOpacity(value)),
            PanelAction::Quit => None,
        }
    }
}

// ============================================================================
// PanelItemId
// ============================================================================

/// Identifiers for panel menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelItemId {
    /// Start/pause item
    Toggle,
    /// Reset item
    Reset,
    /// Preset item, in minutes
    Preset(u32),
    /// Opacity level item, in percent
    Opacity(u32),
    /// Quit item
    Quit,
    /// Title, status or anything unrecognized
    Unknown,
}

impl PanelItemId {
    /// Returns the string id used for the native menu item.
    pub fn as_menu_id(&self) -> String {
        match self {
            PanelItemId::Toggle => "toggle".to_string(),
            PanelItemId::Reset => "reset".to_string(),
            PanelItemId::Preset(minutes) => format!("preset:{}", minutes),
            PanelItemId::Opacity(percent) => format!("opacity:{}", percent),
            PanelItemId::Quit => "quit".to_string(),
            PanelItemId::Unknown => "unknown".to_string(),
        }
    }

    /// Parses a native menu item id.
    pub fn from_menu_id(id: &str) -> Self {
        match id {
            "toggle" => return PanelItemId::Toggle,
            "reset" => return PanelItemId::Reset,
            "quit" => return PanelItemId::Quit,
            _ => {}
        }

        let parsed = id
            .split_once(':')
            .and_then(|(kind, value)| Some((kind, value.parse::<u32>().ok()?)));
        match parsed {
            Some(("preset", minutes)) if minutes <= MAX_MINUTES => PanelItemId::Preset(minutes),
            Some(("opacity", percent)) if percent <= 100 => PanelItemId::Opacity(percent),
            _ => PanelItemId::Unknown,
        }
    }

    /// Converts a menu item id to the corresponding action.
    pub fn to_action(&self) -> Option<PanelAction> {
        match *self {
            PanelItemId::Toggle => Some(PanelAction::Toggle),
            PanelItemId::Reset => Some(PanelAction::Reset),
            PanelItemId::Preset(minutes) => Some(PanelAction::Preset(minutes)),
            PanelItemId::Opacity(percent) => {
                Some(PanelAction::SetOpacity(f64::from(percent) / 100.0))
            }
            PanelItemId::Quit => Some(PanelAction::Quit),
            PanelItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Converts panel clicks to actions and logs them.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Processes a menu item click and returns the corresponding action.
    pub fn handle_click(&self, item_id: PanelItemId) -> Option<PanelAction> {
        let action = item_id.to_action();

        if let Some(ref action) = action {
            tracing::info!(action = %action, "パネルからアクションを受信");
        }

        action
    }

    /// Logs whether the engine accepted an action.
    pub fn log_action_result(&self, action: &PanelAction, accepted: bool) {
        if accepted {
            tracing::debug!(action = %action, "アクションを送信しました");
        } else {
            tracing::warn!(action = %action, "アクションを送信できませんでした");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
