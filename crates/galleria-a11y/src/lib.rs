#![forbid(unsafe_code)]

//! Accessibility isolation layer for the galleria viewer.
//!
//! While the viewer is open, the rest of the page must disappear from
//! assistive technology without any visual change. [`IsolationGuard`] marks
//! every sibling subtree of the viewer accessibility-hidden and remembers
//! exactly which nodes it marked, so closing reverses precisely that set —
//! even if the tree changed shape in between.

mod isolation;

pub use isolation::IsolationGuard;
