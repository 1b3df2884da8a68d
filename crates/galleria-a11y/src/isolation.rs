#![forbid(unsafe_code)]

//! Sibling-subtree hiding with exact reversal.

use ahash::AHashSet;
use galleria_dom::{Document, NodeId};

/// Marks the viewer's sibling subtrees accessibility-hidden while the
/// viewer is open, and reverses exactly that marking on close.
///
/// # Invariants
///
/// - The recorded set is non-empty if and only if a hide is in effect
///   (given the page has at least one sibling next to the viewer).
/// - `unhide` clears markers on exactly the nodes `hide` recorded, never a
///   recomputed "everything except the viewer" set. Siblings added while
///   open are untouched; siblings removed while open are skipped silently.
/// - Only accessibility exposure changes; visual flags are never touched.
///
/// # Failure Modes
///
/// - `hide` while already hidden is a no-op (no marker stacking).
/// - `unhide` with nothing recorded is a no-op.
#[derive(Debug, Default)]
pub struct IsolationGuard {
    hidden: AHashSet<NodeId>,
}

impl IsolationGuard {
    /// Create a guard with nothing hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a hide is currently in effect.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.hidden.is_empty()
    }

    /// The nodes currently recorded as hidden by this guard.
    pub fn hidden(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hidden.iter().copied()
    }

    /// Mark every direct child of the document root other than
    /// `viewer_root` accessibility-hidden, recording the marked set.
    ///
    /// Idempotent: if a hide is already in effect nothing happens, so
    /// re-opening at a new index never stacks markers.
    pub fn hide(&mut self, doc: &mut Document, viewer_root: NodeId) {
        if self.is_active() {
            return;
        }
        let siblings: Vec<NodeId> = doc
            .children(doc.root())
            .iter()
            .copied()
            .filter(|&child| child != viewer_root)
            .collect();
        for sibling in siblings {
            doc.set_hidden_marker(sibling);
            self.hidden.insert(sibling);
        }
    }

    /// Clear the accessibility-hidden marker from every recorded node, then
    /// forget the record. Nodes detached while hidden are skipped.
    pub fn unhide(&mut self, doc: &mut Document) {
        for node in self.hidden.drain() {
            // Detached nodes left the accessibility tree with their marker.
            if doc.is_attached(node) {
                doc.clear_hidden_marker(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galleria_dom::{Node, Role};

    fn page_with_viewer() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let header = doc.append(root, Node::new()).unwrap();
        let grid = doc.append(root, Node::new()).unwrap();
        let viewer = doc.append(root, Node::role(Role::Viewer)).unwrap();
        let footer = doc.append(root, Node::new()).unwrap();
        (doc, viewer, vec![header, grid, footer])
    }

    #[test]
    fn hide_marks_all_siblings_except_viewer() {
        let (mut doc, viewer, siblings) = page_with_viewer();
        let mut guard = IsolationGuard::new();
        guard.hide(&mut doc, viewer);

        assert!(guard.is_active());
        for sibling in &siblings {
            assert!(doc.has_hidden_marker(*sibling));
        }
        assert!(!doc.has_hidden_marker(viewer));
    }

    #[test]
    fn unhide_reverses_exactly_the_recorded_set() {
        let (mut doc, viewer, siblings) = page_with_viewer();
        let mut guard = IsolationGuard::new();
        guard.hide(&mut doc, viewer);
        guard.unhide(&mut doc);

        assert!(!guard.is_active());
        for sibling in &siblings {
            assert!(!doc.has_hidden_marker(*sibling));
        }
        assert!(doc.hidden_marked().is_empty());
    }

    #[test]
    fn hide_is_idempotent_while_active() {
        let (mut doc, viewer, siblings) = page_with_viewer();
        let mut guard = IsolationGuard::new();
        guard.hide(&mut doc, viewer);

        // A sibling added while open must not be swept up by a second hide.
        let late = doc.append(doc.root(), Node::new()).unwrap();
        guard.hide(&mut doc, viewer);

        assert!(!doc.has_hidden_marker(late));
        assert_eq!(guard.hidden.len(), siblings.len());
    }

    #[test]
    fn sibling_added_while_open_is_untouched_by_unhide() {
        let (mut doc, viewer, _) = page_with_viewer();
        let mut guard = IsolationGuard::new();
        guard.hide(&mut doc, viewer);

        let late = doc.append(doc.root(), Node::new()).unwrap();
        // The host marked it on its own; the guard must not clear it.
        doc.set_hidden_marker(late);
        guard.unhide(&mut doc);

        assert!(doc.has_hidden_marker(late));
    }

    #[test]
    fn sibling_removed_while_open_is_skipped() {
        let (mut doc, viewer, siblings) = page_with_viewer();
        let mut guard = IsolationGuard::new();
        guard.hide(&mut doc, viewer);

        doc.detach(siblings[0]);
        guard.unhide(&mut doc);

        assert!(!guard.is_active());
        assert!(doc.hidden_marked().is_empty());
    }

    #[test]
    fn unhide_with_nothing_recorded_is_noop() {
        let (mut doc, _, _) = page_with_viewer();
        let mut guard = IsolationGuard::new();
        guard.unhide(&mut doc);
        assert!(!guard.is_active());
    }

    #[test]
    fn hide_on_page_with_only_viewer_records_nothing() {
        let mut doc = Document::new();
        let viewer = doc.append(doc.root(), Node::role(Role::Viewer)).unwrap();
        let mut guard = IsolationGuard::new();
        guard.hide(&mut doc, viewer);
        assert!(!guard.is_active());
    }
}
