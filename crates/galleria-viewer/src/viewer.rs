#![forbid(unsafe_code)]

//! The viewer state machine.
//!
//! One [`Lightbox`] exists per page, created in `Closed` status at mount
//! and never destroyed. Opening captures the focused element, hides the
//! rest of the page from assistive technology, renders the active item,
//! and schedules a deferred focus move onto the close affordance. Closing
//! reverses all of it and restores focus to wherever it was.
//!
//! # Invariants
//!
//! - The isolation guard's hidden set is non-empty iff status is `Open`
//!   (on any page where the viewer has at least one sibling).
//! - `active_index` is `Some` iff status is `Open`, and always within the
//!   registry bounds that produced it.
//! - Re-opening while already open never re-captures focus and never
//!   stacks hidden markings.
//!
//! # Failure Modes
//!
//! - Opening out of range or on an empty gallery is a no-op; status stays
//!   `Closed`.
//! - A deferred focus move observed after close is stale and does nothing.
//! - A stale focus-restore target is skipped silently on close.

use crate::error::ViewerError;
use crate::navigation::{Direction, advance};
use crate::registry::{Item, ItemRegistry};
use galleria_a11y::IsolationGuard;
use galleria_dom::{AttrName, Document, NodeId, Role};
use web_time::{Duration, Instant};

/// Delay between the viewer becoming visible and focus moving to its close
/// affordance, giving assistive technology time to notice the new subtree
/// before the focus event fires.
pub const FOCUS_DELAY: Duration = Duration::from_millis(10);

/// Open/closed status of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerStatus {
    #[default]
    Closed,
    Open,
}

/// A scheduled focus move onto the close affordance.
///
/// The epoch ties the move to the open session that scheduled it; a bump
/// of the lightbox epoch (on close) makes any outstanding move stale.
#[derive(Debug, Clone, Copy)]
struct PendingFocus {
    due: Instant,
    epoch: u64,
}

/// The single page-lifetime viewer instance.
pub struct Lightbox {
    root: NodeId,
    image_slot: NodeId,
    close_button: NodeId,
    prev_button: Option<NodeId>,
    next_button: Option<NodeId>,
    backdrop: Option<NodeId>,
    status: ViewerStatus,
    active_index: Option<usize>,
    restore_focus: Option<NodeId>,
    guard: IsolationGuard,
    pending_focus: Option<PendingFocus>,
    epoch: u64,
}

impl Lightbox {
    /// Resolve the viewer's well-known parts from the tree.
    ///
    /// The viewer root, its image slot, and its close affordance are
    /// required; previous/next buttons and the backdrop are optional.
    /// `MissingViewerRoot` means the subsystem should self-disable.
    pub fn mount(doc: &Document) -> Result<Self, ViewerError> {
        let root = doc
            .query_role(Role::Viewer)
            .into_iter()
            .next()
            .ok_or(ViewerError::MissingViewerRoot)?;
        let image_slot = doc
            .find_role_within(root, Role::ImageSlot)
            .ok_or(ViewerError::MissingViewerRoot)?;
        let close_button = doc
            .find_role_within(root, Role::Close)
            .ok_or(ViewerError::MissingViewerRoot)?;
        Ok(Self {
            root,
            image_slot,
            close_button,
            prev_button: doc.find_role_within(root, Role::Prev),
            next_button: doc.find_role_within(root, Role::Next),
            backdrop: doc.find_role_within(root, Role::Backdrop),
            status: ViewerStatus::Closed,
            active_index: None,
            restore_focus: None,
            guard: IsolationGuard::new(),
            pending_focus: None,
            epoch: 0,
        })
    }

    // --- State queries ---

    /// Current status.
    #[inline]
    pub fn status(&self) -> ViewerStatus {
        self.status
    }

    /// Whether the viewer is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == ViewerStatus::Open
    }

    /// The active registry position, `Some` iff open.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// The viewer's root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The display surface node.
    #[inline]
    pub fn image_slot(&self) -> NodeId {
        self.image_slot
    }

    /// The close affordance node.
    #[inline]
    pub fn close_button(&self) -> NodeId {
        self.close_button
    }

    /// The previous-item affordance, if present.
    #[inline]
    pub fn prev_button(&self) -> Option<NodeId> {
        self.prev_button
    }

    /// The next-item affordance, if present.
    #[inline]
    pub fn next_button(&self) -> Option<NodeId> {
        self.next_button
    }

    /// The backdrop region, if present.
    #[inline]
    pub fn backdrop(&self) -> Option<NodeId> {
        self.backdrop
    }

    /// Whether the guard currently hides sibling subtrees.
    pub fn isolation_active(&self) -> bool {
        self.guard.is_active()
    }

    /// Whether a deferred focus move is outstanding.
    pub fn has_pending_focus(&self) -> bool {
        self.pending_focus.is_some()
    }

    // --- Lifecycle ---

    /// Open the viewer at `position`, or re-render there if already open.
    ///
    /// The caller refreshes `registry` first. Out-of-range positions and
    /// empty galleries leave the viewer exactly as it was.
    pub fn open(
        &mut self,
        doc: &mut Document,
        registry: &ItemRegistry,
        position: usize,
    ) -> Result<(), ViewerError> {
        if registry.is_empty() {
            return Err(ViewerError::EmptyRegistry);
        }
        let item = registry.get(position)?;

        if self.status == ViewerStatus::Closed {
            // Captured once per open session; navigation and re-opens keep
            // the original restore target.
            self.restore_focus = doc.focused();
            self.status = ViewerStatus::Open;
            self.guard.hide(doc, self.root);
            doc.set_visible(self.root, true);
        }
        self.active_index = Some(position);
        self.render(doc, item);
        self.schedule_focus();
        Ok(())
    }

    /// Close the viewer. No-op when already closed.
    ///
    /// Returns whether a transition happened.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        if self.status == ViewerStatus::Closed {
            return false;
        }
        self.status = ViewerStatus::Closed;
        self.active_index = None;
        self.guard.unhide(doc);
        doc.set_visible(self.root, false);
        // Drop the content reference so no stale asset stays referenced.
        doc.clear_attr(self.image_slot, AttrName::Source);
        self.cancel_pending_focus();
        if let Err(_stale) = self.restore_focus_target(doc) {
            #[cfg(feature = "tracing")]
            tracing::debug!("focus restore skipped: {_stale}");
        }
        true
    }

    /// Step to the adjacent item with wraparound, re-rendering only.
    ///
    /// No-op (returns `None`) when closed or when the freshly scanned
    /// registry is empty. Focus capture and hide/unhide are not repeated.
    pub fn navigate(
        &mut self,
        doc: &mut Document,
        registry: &ItemRegistry,
        direction: Direction,
    ) -> Option<usize> {
        if self.status == ViewerStatus::Closed {
            return None;
        }
        let current = self.active_index.unwrap_or(0);
        let next = advance(current, direction, registry.len())?;
        let item = registry.get(next).ok()?;
        self.active_index = Some(next);
        self.render(doc, item);
        Some(next)
    }

    // --- Deferred focus ---

    /// Apply the deferred focus move if it is due and still fresh.
    ///
    /// Returns whether focus moved. A move scheduled before a close (or
    /// superseded by a later open) is stale and is discarded without
    /// touching focus — focusing a closed, hidden viewer would break the
    /// focus-trap invariant.
    pub fn flush_pending_focus(&mut self, doc: &mut Document, now: Instant) -> bool {
        let Some(pending) = self.pending_focus else {
            return false;
        };
        if pending.epoch != self.epoch || self.status == ViewerStatus::Closed {
            self.pending_focus = None;
            return false;
        }
        if now < pending.due {
            return false;
        }
        self.pending_focus = None;
        doc.focus(self.close_button)
    }

    fn schedule_focus(&mut self) {
        self.epoch += 1;
        self.pending_focus = Some(PendingFocus {
            due: Instant::now() + FOCUS_DELAY,
            epoch: self.epoch,
        });
    }

    fn cancel_pending_focus(&mut self) {
        self.epoch += 1;
        self.pending_focus = None;
    }

    fn render(&self, doc: &mut Document, item: &Item) {
        doc.set_attr(self.image_slot, AttrName::Source, item.source.clone());
        doc.set_attr(
            self.image_slot,
            AttrName::Description,
            item.description.clone(),
        );
    }

    fn restore_focus_target(&mut self, doc: &mut Document) -> Result<(), ViewerError> {
        let Some(target) = self.restore_focus.take() else {
            return Ok(());
        };
        if doc.is_attached(target) && doc.focus(target) {
            Ok(())
        } else {
            // Leave focus wherever the platform default put it.
            Err(ViewerError::StaleFocusTarget)
        }
    }
}
