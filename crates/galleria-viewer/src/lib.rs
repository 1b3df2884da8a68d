#![forbid(unsafe_code)]

//! Modal gallery viewer with accessibility-safe focus isolation.
//!
//! Presents a full-size view of one item from a gallery of triggerable
//! thumbnails, with circular forward/backward navigation. While open, the
//! rest of the page is hidden from assistive technology, keyboard focus is
//! confined to the viewer, and closing restores the page — including which
//! element held input focus — to its exact pre-open state.
//!
//! Components, leaves first:
//!
//! - [`registry::ItemRegistry`] — enumerates the current triggers in
//!   document order.
//! - [`navigation::advance`] — circular next/previous index arithmetic.
//! - [`viewer::Lightbox`] — the open/closed state machine.
//! - [`focus::FocusTrap`] — keeps focus inside the open viewer.
//! - [`router::InputRouter`] — dispatches pointer, keyboard, and focus
//!   events to the above.

pub mod error;
pub mod focus;
pub mod navigation;
pub mod registry;
pub mod router;
pub mod viewer;

pub use error::ViewerError;
pub use focus::{CycleOutcome, FocusTrap};
pub use navigation::{Direction, advance};
pub use registry::{Item, ItemRegistry};
pub use router::{InputRouter, RouterAction};
pub use viewer::{FOCUS_DELAY, Lightbox, ViewerStatus};
