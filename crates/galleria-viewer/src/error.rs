#![forbid(unsafe_code)]

//! Error taxonomy for the viewer.
//!
//! Every failure here is non-fatal by design: the viewer is best-effort UI
//! glue and must never take the page down with it. Callers degrade each of
//! these to "do nothing, leave state consistent".

use std::fmt;

/// Non-fatal failures of viewer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerError {
    /// The expected viewer container (or one of its required parts) is
    /// absent; the subsystem self-disables.
    MissingViewerRoot,
    /// An open or navigation was requested outside current registry bounds.
    IndexOutOfRange {
        /// The requested position.
        position: usize,
        /// The registry size at the time of the request.
        len: usize,
    },
    /// Navigation or open attempted with zero items.
    EmptyRegistry,
    /// The focus-restore target is detached or no longer focusable.
    StaleFocusTarget,
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingViewerRoot => write!(f, "viewer root element is absent"),
            Self::IndexOutOfRange { position, len } => {
                write!(f, "position {position} out of range for {len} items")
            }
            Self::EmptyRegistry => write!(f, "gallery has no items"),
            Self::StaleFocusTarget => write!(f, "focus-restore target is stale"),
        }
    }
}

impl std::error::Error for ViewerError {}
