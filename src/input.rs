//! Key bindings: arrows for play, letters for the control buttons.

use crate::game::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press or a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play(Command),
    Start,
    Pause,
    ToggleLang,
    Quit,
    None,
}

/// Map key event to an action. Shift is tolerated; other modifiers are not, except Ctrl+C.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Left => Action::Play(Command::MoveLeft),
        KeyCode::Right => Action::Play(Command::MoveRight),
        KeyCode::Down => Action::Play(Command::SoftDrop),
        KeyCode::Up => Action::Play(Command::Rotate),
        KeyCode::Char(' ') | KeyCode::Enter => Action::Play(Command::Respawn),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            's' => Action::Start,
            'p' => Action::Pause,
            'l' => Action::ToggleLang,
            'q' => Action::Quit,
            _ => Action::None,
        },
        KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_drive_the_piece() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::Play(Command::MoveLeft));
        assert_eq!(key_to_action(key(KeyCode::Right)), Action::Play(Command::MoveRight));
        assert_eq!(key_to_action(key(KeyCode::Down)), Action::Play(Command::SoftDrop));
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::Play(Command::Rotate));
    }

    #[test]
    fn space_and_enter_change_the_piece() {
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::Play(Command::Respawn));
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Play(Command::Respawn));
    }

    #[test]
    fn letters_are_case_insensitive() {
        let upper = KeyEvent::new(KeyCode::Char('P'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(upper), Action::Pause);
        assert_eq!(key_to_action(key(KeyCode::Char('s'))), Action::Start);
        assert_eq!(key_to_action(key(KeyCode::Char('l'))), Action::ToggleLang);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
    }

    #[test]
    fn other_modifiers_are_ignored() {
        let alt_left = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_left), Action::None);
    }
}
