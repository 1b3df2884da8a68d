#![forbid(unsafe_code)]

//! Visual-tree, focus, and input primitives for the galleria viewer.
//!
//! This crate is the hosting-platform seam: everything the viewer needs from
//! its surroundings — an ordered tree of addressable nodes, a focus
//! primitive, per-node accessibility exposure, and discrete input events —
//! lives here. The viewer itself (state machine, focus trap, input routing)
//! lives in `galleria-viewer` and only talks to this surface.

pub mod event;
pub mod node;

pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, PointerEvent};
pub use node::{AttrName, Document, Node, NodeFlags, NodeId, Role};
