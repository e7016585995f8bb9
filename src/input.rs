use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::round::Side;

/// Arrow keys map to a side. Only the press edge counts, so key repeat
/// release events on terminals that report them do not double-answer.
pub fn side_for_key(key: &KeyEvent) -> Option<Side> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(Side::Left),
        KeyCode::Right => Some(Side::Right),
        _ => None,
    }
}

/// Screen areas of the two number panels on the playing screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTargets {
    pub left: Rect,
    pub right: Rect,
}

impl ClickTargets {
    pub fn side_at(&self, column: u16, row: u16) -> Option<Side> {
        let at = Position { x: column, y: row };
        if self.left.contains(at) {
            Some(Side::Left)
        } else if self.right.contains(at) {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// A left-button press on either number panel.
pub fn side_for_click(mouse: &MouseEvent, targets: &ClickTargets) -> Option<Side> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => targets.side_at(mouse.column, mouse.row),
        _ => None,
    }
}
