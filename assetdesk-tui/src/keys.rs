//! Keybinding definitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Page-level commands, used while no form or search box has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPage,
    PrevPage,
    SwitchPage(usize),
    MoveUp,
    MoveDown,
    Open,
    Back,
    Search,
    CycleStatus,
    CycleCategory,
    CycleSort,
    New,
    Edit,
    Delete,
    Restore,
    Transfer,
    History,
    Approve,
    Reject,
    Export,
    ChangePassword,
    Logout,
    Refresh,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::Search),
        KeyCode::Char('f') => Some(Action::CycleStatus),
        KeyCode::Char('c') => Some(Action::CycleCategory),
        KeyCode::Char('s') => Some(Action::CycleSort),
        KeyCode::Char('n') => Some(Action::New),
        KeyCode::Char('e') => Some(Action::Edit),
        KeyCode::Char('d') => Some(Action::Delete),
        KeyCode::Char('r') => Some(Action::Restore),
        KeyCode::Char('t') => Some(Action::Transfer),
        KeyCode::Char('h') => Some(Action::History),
        KeyCode::Char('a') => Some(Action::Approve),
        KeyCode::Char('x') => Some(Action::Reject),
        KeyCode::Char('o') => Some(Action::Export),
        KeyCode::Char('P') => Some(Action::ChangePassword),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Enter => Some(Action::Open),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Tab => Some(Action::NextPage),
        KeyCode::BackTab => Some(Action::PrevPage),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(c @ '1'..='9') => Some(Action::SwitchPage(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Keys while a form, the login screen or a search box has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Submit,
    Cancel,
    NextField,
    PrevField,
    /// Forwarded to the focused field.
    Edit(KeyEvent),
}

pub fn map_form_key(event: KeyEvent) -> FormKey {
    match event.code {
        KeyCode::Enter => FormKey::Submit,
        KeyCode::Esc => FormKey::Cancel,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => FormKey::Cancel,
        KeyCode::Tab | KeyCode::Down => FormKey::NextField,
        KeyCode::BackTab | KeyCode::Up => FormKey::PrevField,
        _ => FormKey::Edit(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn control_chords() {
        assert_eq!(
            map_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Refresh)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(map_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn shifted_letters_are_distinct() {
        assert_eq!(
            map_key(key(KeyCode::Char('P'), KeyModifiers::SHIFT)),
            Some(Action::ChangePassword)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Some(Action::Logout)
        );
        assert_eq!(map_key(key(KeyCode::Char('p'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn zero_is_unbound() {
        assert_eq!(map_key(key(KeyCode::Char('0'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn form_keys_forward_text() {
        let typed = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_form_key(typed), FormKey::Edit(typed));
        assert_eq!(
            map_form_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            FormKey::Submit
        );
        assert_eq!(
            map_form_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            FormKey::Cancel
        );
    }
}
