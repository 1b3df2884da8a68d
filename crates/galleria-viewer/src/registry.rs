#![forbid(unsafe_code)]

//! Gallery item enumeration.
//!
//! The registry does not own items: triggers are discovered by querying the
//! visual tree, and the snapshot is only valid until the tree changes shape.
//! Callers refresh before any lookup that depends on current tree
//! composition — opening and navigating always re-scan rather than trusting
//! a cached sequence, since a stale sequence could point the viewer at a
//! removed item.

use crate::error::ViewerError;
use galleria_dom::{AttrName, Document, NodeId, Role};

/// A gallery item as seen at the most recent [`ItemRegistry::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The trigger node this item was read from.
    pub node: NodeId,
    /// Opaque locator for the full-size asset.
    pub source: String,
    /// Textual alternative for the asset.
    pub description: String,
    /// Index within the enumerated sequence at scan time.
    pub position: usize,
}

/// Ordered, index-addressable view of the current gallery triggers.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: Vec<Item>,
}

impl ItemRegistry {
    /// An empty registry. Call [`refresh`](Self::refresh) before lookups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scan the tree for trigger nodes, in document order, and rebuild
    /// the item sequence. Positions are assigned from the scan.
    pub fn refresh(&mut self, doc: &Document) {
        self.items.clear();
        for (position, node) in doc.query_role(Role::Trigger).into_iter().enumerate() {
            self.items.push(Item {
                node,
                source: doc.attr(node, AttrName::Source).unwrap_or("").to_owned(),
                description: doc
                    .attr(node, AttrName::Description)
                    .unwrap_or("")
                    .to_owned(),
                position,
            });
        }
    }

    /// Number of items in the last scan.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the last scan found no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items from the last scan, in order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The item at `position`, or `IndexOutOfRange`.
    pub fn get(&self, position: usize) -> Result<&Item, ViewerError> {
        self.items.get(position).ok_or(ViewerError::IndexOutOfRange {
            position,
            len: self.items.len(),
        })
    }

    /// Resolve a concrete trigger node to its current position.
    ///
    /// An explicit declared-index attribute wins; otherwise the node's
    /// position in the last scan is used. `None` when the node declares no
    /// parseable index and was not part of the scan.
    pub fn resolve_position(&self, doc: &Document, node: NodeId) -> Option<usize> {
        if let Some(declared) = doc.attr(node, AttrName::DeclaredIndex)
            && let Ok(index) = declared.parse::<usize>()
        {
            return Some(index);
        }
        self.items.iter().position(|item| item.node == node)
    }
}
