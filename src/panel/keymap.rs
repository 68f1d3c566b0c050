//! Keyboard shortcuts for the overlay window.
//!
//! | Key         | Action                  |
//! |-------------|-------------------------|
//! | `Space`     | start / pause / resume  |
//! | `R`, `Esc`  | reset                   |
//! | `1`..`9`    | presets, shortest first |
//! | `+`, `-`    | opacity up / down       |
//! | `Q`         | quit                    |

use winit::keyboard::{Key, NamedKey};

use super::event::PanelAction;
use crate::types::PRESET_MINUTES;

/// Maps a logical key to a panel action.
pub fn action_for_key(key: &Key) -> Option<PanelAction> {
    match key {
        Key::Named(NamedKey::Space) => Some(PanelAction::Toggle),
        Key::Named(NamedKey::Escape) => Some(PanelAction::Reset),
        Key::Character(text) => action_for_text(text.as_str()),
        _ => None,
    }
}

fn action_for_text(text: &str) -> Option<PanelAction> {
    let mut chars = text.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match c.to_ascii_lowercase() {
        ' ' => Some(PanelAction::Toggle),
        'r' => Some(PanelAction::Reset),
        'q' => Some(PanelAction::Quit),
        '+' | '=' => Some(PanelAction::OpacityUp),
        '-' | '_' => Some(PanelAction::OpacityDown),
        '1'..='9' => {
            let index = c.to_digit(10)? as usize - 1;
            PRESET_MINUTES.get(index).map(|&m| PanelAction::Preset(m))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(text: &str) -> Key {
        Key::Character(text.into())
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::Space)),
            Some(PanelAction::Toggle)
        );
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::Escape)),
            Some(PanelAction::Reset)
        );
        assert_eq!(action_for_key(&Key::Named(NamedKey::Enter)), None);
    }

    #[test]
    fn test_letters_ignore_case() {
        assert_eq!(action_for_key(&character("r")), Some(PanelAction::Reset));
        assert_eq!(action_for_key(&character("R")), Some(PanelAction::Reset));
        assert_eq!(action_for_key(&character("q")), Some(PanelAction::Quit));
        assert_eq!(action_for_key(&character("x")), None);
    }

    #[test]
    fn test_digits_map_to_presets_in_order() {
        let actions: Vec<_> = (1..=9)
            .map(|d| action_for_key(&character(&d.to_string())))
            .collect();
        let expected: Vec<_> = PRESET_MINUTES
            .iter()
            .map(|&m| Some(PanelAction::Preset(m)))
            .collect();
        assert_eq!(actions, expected);
        assert_eq!(action_for_key(&character("0")), None);
    }

    #[test]
    fn test_opacity_keys() {
        assert_eq!(action_for_key(&character("+")), Some(PanelAction::OpacityUp));
        assert_eq!(action_for_key(&character("=")), Some(PanelAction::OpacityUp));
        assert_eq!(action_for_key(&character("-")), Some(PanelAction::OpacityDown));
    }

    #[test]
    fn test_multi_character_text_is_ignored() {
        assert_eq!(action_for_key(&character("rq")), None);
    }
}
