//! Key handling: maps terminal key events to game commands
//!
//! Every press is a single discrete command. Keys that are not bound to
//! anything are ignored.

use crate::settings::Settings;
use blockfall::game::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub reset: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!("ignoring unknown key name {:?} in settings", s);
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            pause: Self::parse_keys(&settings.keys.pause),
            reset: Self::parse_keys(&settings.keys.reset),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Look up the action bound to a key press
    pub fn action_for(&self, key: KeyEvent) -> Option<Action> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let code = normalize_key(key.code);
        let bound = [
            (&self.move_left, Action::Game(Command::MoveLeft)),
            (&self.move_right, Action::Game(Command::MoveRight)),
            (&self.soft_drop, Action::Game(Command::SoftDrop)),
            (&self.hard_drop, Action::Game(Command::HardDrop)),
            (&self.rotate, Action::Game(Command::Rotate)),
            (&self.pause, Action::Game(Command::TogglePause)),
            (&self.reset, Action::Game(Command::Reset)),
            (&self.quit, Action::Quit),
        ];
        bound
            .into_iter()
            .find(|(keys, _)| keys.contains(&code))
            .map(|(_, action)| action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        let expect = [
            (KeyCode::Left, Action::Game(Command::MoveLeft)),
            (KeyCode::Right, Action::Game(Command::MoveRight)),
            (KeyCode::Down, Action::Game(Command::SoftDrop)),
            (KeyCode::Up, Action::Game(Command::Rotate)),
            (KeyCode::Char('w'), Action::Game(Command::Rotate)),
            (KeyCode::Char(' '), Action::Game(Command::HardDrop)),
            (KeyCode::Char('p'), Action::Game(Command::TogglePause)),
            (KeyCode::Char('r'), Action::Game(Command::Reset)),
            (KeyCode::Char('q'), Action::Quit),
        ];
        for (code, action) in expect {
            assert_eq!(keys.action_for(press(code)), Some(action), "{:?}", code);
        }
    }

    #[test]
    fn test_uppercase_matches() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.action_for(press(KeyCode::Char('R'))),
            Some(Action::Game(Command::Reset))
        );
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action_for(press(KeyCode::Char('k'))), None);
        assert_eq!(keys.action_for(press(KeyCode::F(5))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let keys = KeyBindings::default();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys.action_for(event), Some(Action::Quit));
    }

    #[test]
    fn test_custom_bindings() {
        let mut settings = Settings::default();
        settings.keys.rotate = vec!["x".to_string(), "bogus".to_string()];
        let keys = KeyBindings::from_settings(&settings);
        assert_eq!(keys.rotate, vec![KeyCode::Char('x')]);
        assert_eq!(keys.action_for(press(KeyCode::Up)), None);
    }
}
