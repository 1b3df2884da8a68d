#![forbid(unsafe_code)]

//! Focus confinement for the open viewer.
//!
//! Two mechanisms, both required while the viewer is open:
//!
//! 1. A redirect for focus that lands outside the viewer subtree — pulled
//!    back to the first focusable element inside (or the display surface
//!    itself when none exists).
//! 2. Explicit Tab/Shift+Tab wraparound at the boundary of the viewer's
//!    focusable sequence: forward from the last element lands on the
//!    first, backward from the first lands on the last.
//!
//! The focusable sequence is computed fresh on every attempt — visibility
//! and disabled state are evaluated at query time, never cached.

use galleria_dom::{Document, NodeId};

/// What a Tab-cycle attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Focus was wrapped to the opposite end; the platform default must be
    /// suppressed.
    Wrapped,
    /// No focusable elements exist; the key is swallowed with no focus
    /// change and the platform default must be suppressed.
    Swallowed,
    /// Focus is mid-sequence; the platform default traversal applies.
    Default,
}

/// Confines input focus to the viewer subtree while it is open.
///
/// Stateless: every decision is made against the tree as it is right now.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusTrap;

impl FocusTrap {
    pub fn new() -> Self {
        Self
    }

    /// Pull focus back inside `viewer_root` if it is currently outside.
    ///
    /// Returns whether a redirect was attempted. The first focusable
    /// element inside the viewer receives focus; if there is none, the
    /// display surface `fallback` is tried (the platform may still refuse
    /// it, which is acceptable — focus then stays where it was).
    pub fn redirect_if_outside(
        &self,
        doc: &mut Document,
        viewer_root: NodeId,
        fallback: NodeId,
    ) -> bool {
        if let Some(focused) = doc.focused()
            && doc.contains(viewer_root, focused)
        {
            return false;
        }
        let target = doc
            .focusables_within(viewer_root)
            .first()
            .copied()
            .unwrap_or(fallback);
        doc.focus(target);
        true
    }

    /// Handle a Tab (`backward = false`) or Shift+Tab (`backward = true`)
    /// press scoped to the viewer.
    ///
    /// Wraps at the sequence boundary, swallows the key when the sequence
    /// is empty, and defers to the platform default mid-sequence.
    pub fn cycle(&self, doc: &mut Document, viewer_root: NodeId, backward: bool) -> CycleOutcome {
        let focusable = doc.focusables_within(viewer_root);
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return CycleOutcome::Swallowed;
        };

        // Focus outside the viewer (or nowhere) is treated like a boundary
        // hit: the trap owns the key while the viewer is open.
        let focused = doc.focused().filter(|&f| doc.contains(viewer_root, f));
        match focused {
            Some(node) if backward && node == first => {
                doc.focus(last);
                CycleOutcome::Wrapped
            }
            Some(node) if !backward && node == last => {
                doc.focus(first);
                CycleOutcome::Wrapped
            }
            Some(_) => CycleOutcome::Default,
            None => {
                doc.focus(if backward { last } else { first });
                CycleOutcome::Wrapped
            }
        }
    }
}
