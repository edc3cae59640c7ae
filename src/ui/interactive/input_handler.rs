//! Keyboard and mouse input for the interactive panel.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What the host loop should do in response to a terminal event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PanelAction {
    Advance,
    Quit,
    Redraw,
    None,
}

/// Maps a terminal event to a panel action.
///
/// Space, Enter, Right arrow, `n` or a left click advance the panel;
/// `q`, Esc or Ctrl+C quit; a resize forces a redraw.
pub(super) fn map_event(event: &Event) -> PanelAction {
    match event {
        Event::Key(key_event) => map_key_event(key_event),
        Event::Mouse(mouse_event) => map_mouse_event(mouse_event),
        Event::Resize(_, _) => PanelAction::Redraw,
        _ => PanelAction::None,
    }
}

fn map_key_event(key_event: &KeyEvent) -> PanelAction {
    // Windows reports both press and release
    if key_event.kind == KeyEventKind::Release {
        return PanelAction::None;
    }

    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            PanelAction::Quit
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => PanelAction::Quit,
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right => PanelAction::Advance,
        KeyCode::Char('n') | KeyCode::Char('N') => PanelAction::Advance,
        _ => PanelAction::None,
    }
}

fn map_mouse_event(mouse_event: &MouseEvent) -> PanelAction {
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => PanelAction::Advance,
        _ => PanelAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 2,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_advance_keys() {
        for code in [
            KeyCode::Char(' '),
            KeyCode::Enter,
            KeyCode::Right,
            KeyCode::Char('n'),
        ] {
            assert_eq!(map_event(&key(code)), PanelAction::Advance, "{code:?}");
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_event(&key(KeyCode::Char('q'))), PanelAction::Quit);
        assert_eq!(map_event(&key(KeyCode::Esc)), PanelAction::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c), PanelAction::Quit);
    }

    #[test]
    fn test_plain_c_is_ignored() {
        assert_eq!(map_event(&key(KeyCode::Char('c'))), PanelAction::None);
        assert_eq!(map_event(&key(KeyCode::Left)), PanelAction::None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(release)), PanelAction::None);
    }

    #[test]
    fn test_left_click_advances() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left))),
            PanelAction::Advance
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Right))),
            PanelAction::None
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Moved)),
            PanelAction::None
        );
    }

    #[test]
    fn test_resize_redraws() {
        assert_eq!(map_event(&Event::Resize(80, 24)), PanelAction::Redraw);
    }
}
