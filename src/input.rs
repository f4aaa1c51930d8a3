use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use sandfall::BrushMode;
use std::time::Duration;

/// What the app should do in response to one terminal event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    /// Stamp the brush at a terminal cell.
    Stroke { col: u16, row: u16, mode: BrushMode },
    Radius(f32),
    /// Draining follows the key: on while held, off on release.
    Drain(bool),
    DrainToggle,
    PauseToggle,
    CycleShape,
    Clear,
    Quit,
}

/// Turns raw crossterm events into `Action`s and remembers which button is
/// down, so a held button can keep painting between pointer events.
pub(crate) struct InputMapper {
    held: Option<BrushMode>,
    pointer: Option<(u16, u16)>,
    key_release: bool,
}

impl InputMapper {
    /// `key_release` says whether the terminal reports key releases. Without
    /// them, the drain key toggles instead of holding.
    pub(crate) fn new(key_release: bool) -> Self {
        Self {
            held: None,
            pointer: None,
            key_release,
        }
    }

    /// The held button and the last pointer cell, if a button is down.
    pub(crate) fn held(&self) -> Option<(BrushMode, (u16, u16))> {
        self.held.zip(self.pointer)
    }

    pub(crate) fn map(&mut self, ev: Event) -> Option<Action> {
        match ev {
            Event::Mouse(m) => self.map_mouse(m),
            Event::Key(k) => self.map_key(k),
            Event::FocusLost => {
                self.held = None;
                None
            }
            _ => None,
        }
    }

    fn map_mouse(&mut self, m: MouseEvent) -> Option<Action> {
        let at = (m.column, m.row);
        match m.kind {
            MouseEventKind::Down(button) | MouseEventKind::Drag(button) => {
                let mode = match button {
                    MouseButton::Left => BrushMode::Paint,
                    MouseButton::Right => BrushMode::Erase,
                    MouseButton::Middle => return None,
                };
                self.held = Some(mode);
                self.pointer = Some(at);
                Some(Action::Stroke {
                    col: at.0,
                    row: at.1,
                    mode,
                })
            }
            MouseEventKind::Up(_) => {
                self.held = None;
                self.pointer = Some(at);
                None
            }
            MouseEventKind::Moved => {
                self.pointer = Some(at);
                None
            }
            MouseEventKind::ScrollUp => Some(Action::Radius(1.0)),
            MouseEventKind::ScrollDown => Some(Action::Radius(-1.0)),
            _ => None,
        }
    }

    fn map_key(&mut self, k: KeyEvent) -> Option<Action> {
        if k.kind == KeyEventKind::Release {
            return match k.code {
                KeyCode::Char(' ') => Some(Action::Drain(false)),
                _ => None,
            };
        }
        let repeat = k.kind == KeyEventKind::Repeat;

        if matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && k.modifiers.contains(KeyModifiers::CONTROL)
        {
            return Some(Action::Quit);
        }

        match k.code {
            KeyCode::Char(' ') if self.key_release => Some(Action::Drain(true)),
            KeyCode::Char(' ') if !repeat => Some(Action::DrainToggle),
            KeyCode::Char('k' | 'K' | 'p' | 'P') if !repeat => Some(Action::PauseToggle),
            KeyCode::Char(']' | '+' | '=') => Some(Action::Radius(1.0)),
            KeyCode::Char('[' | '-') => Some(Action::Radius(-1.0)),
            KeyCode::Char('s' | 'S') if !repeat => Some(Action::CycleShape),
            KeyCode::Char('c' | 'C') if !repeat => Some(Action::Clear),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Drains pending events without blocking past `max_frame_time`.
pub(crate) fn collect_events_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        out.push(event::read()?);
        // drags flood the queue; leave the rest for the next frame
        if out.len() >= 256 {
            break;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn buttons_select_mode_and_hold() {
        let mut m = InputMapper::new(false);
        assert_eq!(
            m.map(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(Action::Stroke {
                col: 3,
                row: 4,
                mode: BrushMode::Paint
            })
        );
        assert_eq!(
            m.map(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 4)),
            Some(Action::Stroke {
                col: 5,
                row: 4,
                mode: BrushMode::Paint
            })
        );
        assert_eq!(m.held(), Some((BrushMode::Paint, (5, 4))));

        assert_eq!(m.map(mouse(MouseEventKind::Up(MouseButton::Left), 5, 4)), None);
        assert_eq!(m.held(), None);

        assert_eq!(
            m.map(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)),
            Some(Action::Stroke {
                col: 1,
                row: 1,
                mode: BrushMode::Erase
            })
        );
        assert_eq!(m.map(mouse(MouseEventKind::Down(MouseButton::Middle), 1, 1)), None);
    }

    #[test]
    fn moving_without_button_only_tracks_pointer() {
        let mut m = InputMapper::new(false);
        assert_eq!(m.map(mouse(MouseEventKind::Moved, 9, 9)), None);
        assert_eq!(m.held(), None);
    }

    #[test]
    fn wheel_adjusts_radius() {
        let mut m = InputMapper::new(false);
        assert_eq!(m.map(mouse(MouseEventKind::ScrollUp, 0, 0)), Some(Action::Radius(1.0)));
        assert_eq!(m.map(mouse(MouseEventKind::ScrollDown, 0, 0)), Some(Action::Radius(-1.0)));
    }

    #[test]
    fn drain_holds_when_releases_are_reported() {
        let mut m = InputMapper::new(true);
        let space = KeyCode::Char(' ');
        assert_eq!(m.map(key(space, KeyEventKind::Press)), Some(Action::Drain(true)));
        assert_eq!(m.map(key(space, KeyEventKind::Repeat)), Some(Action::Drain(true)));
        assert_eq!(m.map(key(space, KeyEventKind::Release)), Some(Action::Drain(false)));
    }

    #[test]
    fn drain_toggles_without_release_events() {
        let mut m = InputMapper::new(false);
        let space = KeyCode::Char(' ');
        assert_eq!(m.map(key(space, KeyEventKind::Press)), Some(Action::DrainToggle));
        assert_eq!(m.map(key(space, KeyEventKind::Repeat)), None);
    }

    #[test]
    fn pause_is_edge_triggered() {
        let mut m = InputMapper::new(true);
        let k = KeyCode::Char('k');
        assert_eq!(m.map(key(k, KeyEventKind::Press)), Some(Action::PauseToggle));
        assert_eq!(m.map(key(k, KeyEventKind::Repeat)), None);
        assert_eq!(m.map(key(k, KeyEventKind::Release)), None);
    }

    #[test]
    fn ctrl_c_quits_plain_c_clears() {
        let mut m = InputMapper::new(false);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(m.map(ctrl_c), Some(Action::Quit));
        assert_eq!(
            m.map(key(KeyCode::Char('c'), KeyEventKind::Press)),
            Some(Action::Clear)
        );
        assert_eq!(m.map(key(KeyCode::Esc, KeyEventKind::Press)), Some(Action::Quit));
    }
}
