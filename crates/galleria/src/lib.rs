#![forbid(unsafe_code)]

//! Public facade over the galleria workspace.
//!
//! Re-exports the member crates under stable names and provides a
//! [`prelude`] with the handful of types a typical host needs:
//!
//! ```
//! use galleria::prelude::*;
//!
//! let mut doc = Document::new();
//! let grid = doc.append(doc.root(), Node::new()).unwrap();
//! doc.append(
//!     grid,
//!     Node::role(Role::Trigger).focusable().source("cover.png"),
//! );
//! let viewer = doc
//!     .append(doc.root(), Node::role(Role::Viewer).invisible())
//!     .unwrap();
//! doc.append(viewer, Node::role(Role::ImageSlot)).unwrap();
//! doc.append(viewer, Node::role(Role::Close).focusable())
//!     .unwrap();
//!
//! let mut router = InputRouter::mount(&doc);
//! assert!(router.is_enabled());
//! ```

pub use galleria_a11y as a11y;
pub use galleria_dom as dom;
pub use galleria_viewer as viewer;

/// The types most hosts need, in one import.
pub mod prelude {
    pub use galleria_a11y::IsolationGuard;
    pub use galleria_dom::{
        AttrName, Document, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, Node,
        NodeId, PointerEvent, Role,
    };
    pub use galleria_viewer::{
        CycleOutcome, Direction, FocusTrap, InputRouter, Item, ItemRegistry, Lightbox,
        RouterAction, ViewerError, ViewerStatus,
    };
}
