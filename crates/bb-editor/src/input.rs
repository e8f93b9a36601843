//! Input abstraction layer.
//!
//! Normalizes DOM events from the board into `InputEvent`s consumed by
//! the editor session.

use bb_core::model::ComponentKind;
use bb_core::id::ComponentId;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Windows/Linux, ⌘ on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized board event. Coordinates are board-relative pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A palette item was dropped on the board.
    DropNew { kind: ComponentKind, x: f64, y: f64 },

    /// An existing component was dragged to a new spot.
    DropExisting { id: ComponentId, x: f64, y: f64 },

    /// Click anywhere on the board.
    Click { x: f64, y: f64, modifiers: Modifiers },

    /// Keyboard shortcut.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn click(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::Click { x, y, modifiers }
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::DropNew { x, y, .. } | Self::DropExisting { x, y, .. } | Self::Click { x, y, .. } => {
                Some((*x, *y))
            }
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_modifier_is_ctrl_or_meta() {
        assert!(!Modifiers::NONE.command());
        assert!(Modifiers { ctrl: true, ..Modifiers::NONE }.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers { shift: true, alt: true, ..Modifiers::NONE }.command());
    }

    #[test]
    fn key_events_have_no_position() {
        assert_eq!(InputEvent::key("r", Modifiers::NONE).position(), None);
        assert_eq!(
            InputEvent::click(3.0, 4.0, Modifiers::NONE).position(),
            Some((3.0, 4.0))
        );
    }
}
