#![forbid(unsafe_code)]

//! Arena-based visual tree with focus tracking and accessibility exposure.
//!
//! The tree is the stand-in for the host page: an ordered hierarchy of
//! nodes, each with a role, visibility/focusability flags, string
//! attributes, and an accessibility-hidden marker consumed by assistive
//! technology. Node ids are plain indices and are never reused, so a held
//! [`NodeId`] behaves like a weak reference: it stays cheap to copy and
//! [`Document::is_attached`] reports whether it still points at live tree
//! content.
//!
//! # Invariants
//!
//! - Document order is parent-before-child, siblings in insertion order.
//! - The root node is always attached and cannot be detached.
//! - `focused()` is always `None` or an attached node; detaching a subtree
//!   containing the focused node clears focus (platform default).
//!
//! # Failure Modes
//!
//! - Operations on detached or out-of-range ids are no-ops (or return
//!   `None`/`false`); nothing panics.

use ahash::AHashMap;
use bitflags::bitflags;

/// Identity of a node in a [`Document`]. Never reused within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Construct an id from its raw index. Intended for hosts and tests
    /// that record ids out of band.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw index value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

bitflags! {
    /// Per-node behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// The platform allows this node to receive input focus.
        const FOCUSABLE = 0b0000_0001;
        /// The node is rendered (not display-suppressed).
        const VISIBLE = 0b0000_0010;
        /// The node is present but inert for input purposes.
        const DISABLED = 0b0000_0100;
    }
}

/// Semantic role of a node, used for stable queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A gallery item that opens the viewer when activated.
    Trigger,
    /// The "show more" affordance that opens the first item.
    ShowMore,
    /// The viewer's own root container.
    Viewer,
    /// The single content slot the viewer renders the active item into.
    ImageSlot,
    /// The viewer's explicit close affordance.
    Close,
    /// The viewer's previous-item affordance.
    Prev,
    /// The viewer's next-item affordance.
    Next,
    /// The viewer's backdrop region (click-to-close).
    Backdrop,
}

/// Attribute names the viewer reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrName {
    /// Opaque locator for the full-size asset.
    Source,
    /// Textual alternative for the asset.
    Description,
    /// Explicit position hint on a trigger, overriding scan order.
    DeclaredIndex,
}

/// A node under construction. Built with the builder methods, then attached
/// with [`Document::append`].
#[derive(Debug, Clone)]
pub struct Node {
    role: Option<Role>,
    flags: NodeFlags,
    attrs: AHashMap<AttrName, String>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// A plain visible node with no role.
    pub fn new() -> Self {
        Self {
            role: None,
            flags: NodeFlags::VISIBLE,
            attrs: AHashMap::new(),
        }
    }

    /// A visible node with the given role.
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::new()
        }
    }

    /// Mark the node focusable.
    pub fn focusable(mut self) -> Self {
        self.flags |= NodeFlags::FOCUSABLE;
        self
    }

    /// Mark the node display-suppressed.
    pub fn invisible(mut self) -> Self {
        self.flags -= NodeFlags::VISIBLE;
        self
    }

    /// Mark the node disabled.
    pub fn disabled(mut self) -> Self {
        self.flags |= NodeFlags::DISABLED;
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: AttrName, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    /// Set the asset locator attribute.
    pub fn source(self, value: impl Into<String>) -> Self {
        self.attr(AttrName::Source, value)
    }

    /// Set the textual-alternative attribute.
    pub fn description(self, value: impl Into<String>) -> Self {
        self.attr(AttrName::Description, value)
    }

    /// Set the explicit position hint attribute.
    pub fn declared_index(self, index: usize) -> Self {
        self.attr(AttrName::DeclaredIndex, index.to_string())
    }
}

/// Internal storage for an attached (or tombstoned) node.
#[derive(Debug, Clone)]
struct Slot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    role: Option<Role>,
    flags: NodeFlags,
    attrs: AHashMap<AttrName, String>,
    /// Accessibility-hidden marker; skipped by assistive technology.
    hidden_marker: bool,
    /// False once the node has been detached. Ids are never reused, so a
    /// detached slot stays tombstoned for the document's lifetime.
    attached: bool,
}

/// The visual tree.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root node.
    pub fn new() -> Self {
        let root_slot = Slot {
            parent: None,
            children: Vec::new(),
            role: None,
            flags: NodeFlags::VISIBLE,
            attrs: AHashMap::new(),
            hidden_marker: false,
            attached: true,
        };
        Self {
            slots: vec![root_slot],
            root: NodeId(0),
            focused: None,
        }
    }

    /// The root node (the "body").
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.0 as usize).filter(|s| s.attached)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0 as usize).filter(|s| s.attached)
    }

    // --- Structure ---

    /// Attach a new node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is detached or unknown.
    pub fn append(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        self.slot(parent)?;
        let id = NodeId(u32::try_from(self.slots.len()).ok()?);
        self.slots.push(Slot {
            parent: Some(parent),
            children: Vec::new(),
            role: node.role,
            flags: node.flags,
            attrs: node.attrs,
            hidden_marker: false,
            attached: true,
        });
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(id);
        }
        Some(id)
    }

    /// Detach `id` and its whole subtree. The root cannot be detached.
    ///
    /// If the focused node is inside the detached subtree, focus is cleared.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if id == self.root || self.slot(id).is_none() {
            return false;
        }
        if let Some(focused) = self.focused
            && self.contains(id, focused)
        {
            self.focused = None;
        }
        let parent = self.slots[id.0 as usize].parent;
        if let Some(parent) = parent
            && let Some(slot) = self.slot_mut(parent)
        {
            slot.children.retain(|&child| child != id);
        }
        for node in self.descendants(id) {
            self.slots[node.0 as usize].attached = false;
        }
        true
    }

    /// Whether `id` still points at live tree content.
    #[inline]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// The attached children of `id`, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[], |s| s.children.as_slice())
    }

    /// The parent of `id`, if attached and not the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// `id` and every attached node below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let Some(slot) = self.slot(node) else {
                continue;
            };
            out.push(node);
            // Reverse so the leftmost child is popped first.
            stack.extend(slot.children.iter().rev());
        }
        out
    }

    /// Whether `id` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    // --- Roles and attributes ---

    /// The role of `id`, if any.
    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.slot(id)?.role
    }

    /// Every attached node with `role`, in document order.
    pub fn query_role(&self, role: Role) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.role(id) == Some(role))
            .collect()
    }

    /// The first descendant of `root` (exclusive) with `role`, in document
    /// order.
    pub fn find_role_within(&self, root: NodeId, role: Role) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .skip(1)
            .find(|&id| self.role(id) == Some(role))
    }

    /// Read an attribute.
    pub fn attr(&self, id: NodeId, name: AttrName) -> Option<&str> {
        self.slot(id)?.attrs.get(&name).map(String::as_str)
    }

    /// Write an attribute. No-op on detached nodes.
    pub fn set_attr(&mut self, id: NodeId, name: AttrName, value: impl Into<String>) {
        if let Some(slot) = self.slot_mut(id) {
            slot.attrs.insert(name, value.into());
        }
    }

    /// Remove an attribute. No-op when absent.
    pub fn clear_attr(&mut self, id: NodeId, name: AttrName) {
        if let Some(slot) = self.slot_mut(id) {
            slot.attrs.remove(&name);
        }
    }

    /// Toggle display suppression.
    ///
    /// Hiding the focused node (or one of its ancestors) clears focus, as
    /// the platform does.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(slot) = self.slot_mut(id) {
            slot.flags.set(NodeFlags::VISIBLE, visible);
        }
        self.revalidate_focus();
    }

    /// Toggle the disabled flag. Disabling the focused node clears focus.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        if let Some(slot) = self.slot_mut(id) {
            slot.flags.set(NodeFlags::DISABLED, !enabled);
        }
        self.revalidate_focus();
    }

    /// Drop focus if the focused node can no longer hold it.
    fn revalidate_focus(&mut self) {
        if let Some(focused) = self.focused
            && !self.is_focusable(focused)
        {
            self.focused = None;
        }
    }

    // --- Accessibility exposure ---

    /// Set the accessibility-hidden marker on `id`.
    pub fn set_hidden_marker(&mut self, id: NodeId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.hidden_marker = true;
        }
    }

    /// Clear the accessibility-hidden marker on `id`.
    pub fn clear_hidden_marker(&mut self, id: NodeId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.hidden_marker = false;
        }
    }

    /// Whether `id` carries the accessibility-hidden marker.
    pub fn has_hidden_marker(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|s| s.hidden_marker)
    }

    /// Attached nodes currently carrying the accessibility-hidden marker.
    pub fn hidden_marked(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.has_hidden_marker(id))
            .collect()
    }

    // --- Focus ---

    /// Whether the platform would accept focus on `id` right now: attached,
    /// focusable, enabled, and visible along the whole ancestor chain.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        if !slot.flags.contains(NodeFlags::FOCUSABLE) || slot.flags.contains(NodeFlags::DISABLED) {
            return false;
        }
        self.is_effectively_visible(id)
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(slot) = self.slot(node) else {
                return false;
            };
            if !slot.flags.contains(NodeFlags::VISIBLE) {
                return false;
            }
            current = slot.parent;
        }
        true
    }

    /// The focusable descendants of `root` (exclusive), in document order.
    ///
    /// Computed fresh on every call; visibility and disabled state are
    /// evaluated at query time.
    pub fn focusables_within(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .skip(1)
            .filter(|&id| self.is_focusable(id))
            .collect()
    }

    /// Move input focus to `id`. Fails (returns `false`, focus unchanged)
    /// when the platform would reject the move.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(node = id.raw(), "focus moved");
        self.focused = Some(id);
        true
    }

    /// The currently focused node, if any.
    #[inline]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}
