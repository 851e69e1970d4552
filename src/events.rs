use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Action, MonitorState};

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Map a key to an action. Unrecognized keys map to `None`.
pub fn map_key(state: &MonitorState, key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    if state.threshold_draft.is_some() {
        return map_threshold_entry(key);
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc if state.help => Action::ToggleHelp,
        KeyCode::Char('i') => Action::NextInterval,
        KeyCode::Char('I') => Action::PrevInterval,
        KeyCode::Char('T') => Action::RaiseThreshold,
        KeyCode::Char('t') => Action::LowerThreshold,
        KeyCode::Char('=') => Action::BeginThresholdEntry,
        KeyCode::Char('b') => Action::ToggleBrief,
        KeyCode::Char('d') => Action::DumpEvents,

        // Event log scrolling (ignored in brief mode)
        KeyCode::Up | KeyCode::Char('k') if !state.brief => Action::ScrollUp(1),
        KeyCode::Down | KeyCode::Char('j') if !state.brief => Action::ScrollDown(1),
        KeyCode::PageUp if !state.brief => Action::ScrollUp(PAGE),
        KeyCode::PageDown if !state.brief => Action::ScrollDown(PAGE),
        KeyCode::Home if !state.brief => Action::ScrollTop,
        KeyCode::End if !state.brief => Action::ScrollBottom,

        _ => return None,
    };
    Some(action)
}

/// Handle key input while the threshold prompt is open
fn map_threshold_entry(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::CommitThreshold),
        KeyCode::Esc => Some(Action::CancelThreshold),
        KeyCode::Backspace => Some(Action::ThresholdBackspace),
        KeyCode::Char(c) if !c.is_control() => Some(Action::ThresholdInput(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_dispatch_table() {
        let state = MonitorState::default();
        let cases = [
            ('q', Action::Quit),
            ('Q', Action::Quit),
            ('?', Action::ToggleHelp),
            ('i', Action::NextInterval),
            ('I', Action::PrevInterval),
            ('T', Action::RaiseThreshold),
            ('t', Action::LowerThreshold),
            ('=', Action::BeginThresholdEntry),
            ('b', Action::ToggleBrief),
            ('d', Action::DumpEvents),
        ];
        for (c, expected) in cases {
            assert_eq!(map_key(&state, key(KeyCode::Char(c))), Some(expected), "key {c}");
        }
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let state = MonitorState::default();
        assert_eq!(map_key(&state, key(KeyCode::Char('z'))), None);
        assert_eq!(map_key(&state, key(KeyCode::F(5))), None);
        assert_eq!(map_key(&state, key(KeyCode::Esc)), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let state = MonitorState::default();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&state, event), Some(Action::Quit));
    }

    #[test]
    fn test_prompt_captures_text_keys() {
        let state = MonitorState {
            threshold_draft: Some(String::new()),
            ..MonitorState::default()
        };
        assert_eq!(map_key(&state, key(KeyCode::Char('q'))), Some(Action::ThresholdInput('q')));
        assert_eq!(map_key(&state, key(KeyCode::Char('4'))), Some(Action::ThresholdInput('4')));
        assert_eq!(map_key(&state, key(KeyCode::Enter)), Some(Action::CommitThreshold));
        assert_eq!(map_key(&state, key(KeyCode::Esc)), Some(Action::CancelThreshold));
        assert_eq!(map_key(&state, key(KeyCode::Backspace)), Some(Action::ThresholdBackspace));
    }

    #[test]
    fn test_scroll_keys_disabled_in_brief_mode() {
        let mut state = MonitorState::default();
        assert_eq!(map_key(&state, key(KeyCode::PageDown)), Some(Action::ScrollDown(PAGE)));
        state.brief = true;
        assert_eq!(map_key(&state, key(KeyCode::PageDown)), None);
        assert_eq!(map_key(&state, key(KeyCode::Char('j'))), None);
    }

    #[test]
    fn test_escape_closes_help() {
        let state = MonitorState {
            help: true,
            ..MonitorState::default()
        };
        assert_eq!(map_key(&state, key(KeyCode::Esc)), Some(Action::ToggleHelp));
    }

    #[test]
    fn test_key_release_ignored() {
        let state = MonitorState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(map_key(&state, event), None);
    }
}
