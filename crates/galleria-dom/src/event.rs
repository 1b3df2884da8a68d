#![forbid(unsafe_code)]

//! Input event types for the viewer subsystem.
//!
//! Pointer events arrive with their hit target already resolved to a
//! [`NodeId`](crate::node::NodeId): the host performs hit testing, this
//! subsystem only routes. Focus movement is delivered as an explicit
//! [`Event::FocusMoved`] rather than observed implicitly, so redirect
//! behavior stays deterministic and testable.

use crate::node::NodeId;

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state at the time of a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL = 0b0000_0010;
        const ALT = 0b0000_0100;
    }
}

/// Key identity for the small set of keys the viewer routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Escape: closes the viewer while open.
    Escape,
    /// Tab: focus cycling inside the viewer (Shift reverses).
    Tab,
    Enter,
    /// Left arrow: navigate to the previous item.
    Left,
    /// Right arrow: navigate to the next item.
    Right,
    Char(char),
}

/// Whether a key event is a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// A key press with modifiers.
    pub fn press_with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }
}

/// Pointer button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A pointer event whose hit target has already been resolved by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// The node the pointer landed on.
    pub target: NodeId,
    pub button: MouseButton,
}

impl PointerEvent {
    /// A left-button click on `target`.
    pub fn click(target: NodeId) -> Self {
        Self {
            target,
            button: MouseButton::Left,
        }
    }
}

/// A discrete input event dispatched to the viewer subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Pointer(PointerEvent),
    /// Input focus landed on `target` (delivered after the move, like a
    /// capture-phase focus listener).
    FocusMoved {
        target: NodeId,
    },
}
