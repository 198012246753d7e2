//! Turning key presses into dashboard actions

use crate::clock::TimeFormat;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use std::time::Duration;

/// What the app is currently listening for. Decides how keys are read.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Moving around the city cards
    Browse,
    /// Typing into the search box
    Search,
    /// A notice is up, and the next key just dismisses it
    Notice,
}

/// Everything the user can ask for
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Quit,
    ToggleTheme,
    ToggleTimeFormat,
    SetTimeFormat(TimeFormat),
    CursorUp,
    CursorDown,
    RemoveAtCursor,
    PrimaryAtCursor,
    OpenSearch,
    CloseSearch,
    Type(char),
    Erase,
    ResultUp,
    ResultDown,
    ConfirmSearch,
    Dismiss,
}

/// Map a key to an action, based on the current mode. Return `None` for keys
/// that don't do anything.
pub fn action(key: KeyEvent, mode: Mode) -> Option<Action> {
    if key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
    {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Notice => Some(Action::Dismiss),
        Mode::Browse => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('f') => Some(Action::ToggleTimeFormat),
            KeyCode::Char('1') => {
                Some(Action::SetTimeFormat(TimeFormat::TwelveHour))
            }
            KeyCode::Char('2') => {
                Some(Action::SetTimeFormat(TimeFormat::TwentyFourHour))
            }
            KeyCode::Char('/' | 'a') => Some(Action::OpenSearch),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => {
                Some(Action::RemoveAtCursor)
            }
            KeyCode::Char('p') => Some(Action::PrimaryAtCursor),
            _ => None,
        },
        Mode::Search => match key.code {
            KeyCode::Esc => Some(Action::CloseSearch),
            KeyCode::Enter => Some(Action::ConfirmSearch),
            KeyCode::Up => Some(Action::ResultUp),
            KeyCode::Down => Some(Action::ResultDown),
            KeyCode::Backspace => Some(Action::Erase),
            KeyCode::Char(c)
                if !key.modifiers.intersects(
                    KeyModifiers::CONTROL | KeyModifiers::ALT,
                ) =>
            {
                Some(Action::Type(c))
            }
            _ => None,
        },
    }
}

/// A source of key presses. This lets the app loop run against a script in
/// tests.
pub trait EventSource {
    /// Wait up to `timeout` for a key press. Return `None` if nothing was
    /// pressed in time.
    fn next_key(
        &mut self,
        timeout: Duration,
    ) -> anyhow::Result<Option<KeyEvent>>;
}

/// Key presses from the real terminal
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_key(
        &mut self,
        timeout: Duration,
    ) -> anyhow::Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            // Some platforms report releases too; only presses count
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_browse() {
        let browse = |code| action(key(code), Mode::Browse);
        assert_eq!(browse(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(browse(KeyCode::Char('t')), Some(Action::ToggleTheme));
        assert_eq!(
            browse(KeyCode::Char('2')),
            Some(Action::SetTimeFormat(TimeFormat::TwentyFourHour))
        );
        assert_eq!(browse(KeyCode::Char('a')), Some(Action::OpenSearch));
        assert_eq!(browse(KeyCode::Char('/')), Some(Action::OpenSearch));
        assert_eq!(browse(KeyCode::Down), Some(Action::CursorDown));
        assert_eq!(browse(KeyCode::Char('x')), Some(Action::RemoveAtCursor));
        assert_eq!(browse(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_search() {
        let search = |code| action(key(code), Mode::Search);
        // Letters that are commands in browse mode are just text here
        assert_eq!(search(KeyCode::Char('q')), Some(Action::Type('q')));
        assert_eq!(search(KeyCode::Char('ã')), Some(Action::Type('ã')));
        assert_eq!(search(KeyCode::Backspace), Some(Action::Erase));
        assert_eq!(search(KeyCode::Enter), Some(Action::ConfirmSearch));
        assert_eq!(search(KeyCode::Esc), Some(Action::CloseSearch));
        assert_eq!(
            action(
                KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL),
                Mode::Search
            ),
            None
        );
    }

    #[test]
    fn test_notice() {
        assert_eq!(
            action(key(KeyCode::Char('x')), Mode::Notice),
            Some(Action::Dismiss)
        );
        assert_eq!(
            action(key(KeyCode::Enter), Mode::Notice),
            Some(Action::Dismiss)
        );
    }

    #[test]
    fn test_ctrl_c() {
        for mode in [Mode::Browse, Mode::Search, Mode::Notice] {
            assert_eq!(action(ctrl_c(), mode), Some(Action::Quit));
        }
    }
}
