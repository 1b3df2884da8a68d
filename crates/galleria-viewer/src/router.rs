#![forbid(unsafe_code)]

//! Event dispatch for the viewer subsystem.
//!
//! All listeners are permanently installed; most are no-ops while the
//! viewer is closed. A pointer event is resolved to the nearest ancestor
//! carrying a role (the platform's "closest matching element" walk), then
//! routed by that role. Key events route by code and open/closed status.
//!
//! If the expected viewer element is absent at mount, the router
//! self-disables: every dispatch is a no-op and the page is untouched.

use crate::focus::{CycleOutcome, FocusTrap};
use crate::navigation::Direction;
use crate::registry::ItemRegistry;
use crate::viewer::Lightbox;
use galleria_dom::{
    Document, Event, KeyCode, KeyEventKind, Modifiers, MouseButton, NodeId, Role,
};
use web_time::Instant;

/// What a dispatched event did. `None` from [`InputRouter::dispatch`]
/// means the event was not handled and the platform default applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterAction {
    /// The viewer opened (or re-rendered) at this position.
    Opened(usize),
    /// The viewer stepped to this position.
    Navigated(usize),
    /// The viewer closed.
    Closed,
    /// Focus escaped the viewer and was pulled back inside.
    FocusRedirected,
    /// A Tab-cycle wrapped focus at the sequence boundary.
    FocusCycled,
    /// A Tab-cycle found nothing focusable and swallowed the key.
    KeySwallowed,
}

/// Routes pointer, keyboard, and focus events to the viewer components.
pub struct InputRouter {
    lightbox: Option<Lightbox>,
    registry: ItemRegistry,
    trap: FocusTrap,
}

impl InputRouter {
    /// Install the router against the current tree.
    ///
    /// When the viewer element (or a required part of it) is missing, the
    /// router mounts in the disabled state rather than failing: this
    /// subsystem is best-effort glue and must not take the page down.
    pub fn mount(doc: &Document) -> Self {
        Self {
            lightbox: Lightbox::mount(doc).ok(),
            registry: ItemRegistry::new(),
            trap: FocusTrap::new(),
        }
    }

    /// Whether the viewer was found at mount.
    pub fn is_enabled(&self) -> bool {
        self.lightbox.is_some()
    }

    /// The mounted lightbox, if any.
    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    /// The registry as of its last refresh.
    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Apply the deferred focus move if due. See
    /// [`Lightbox::flush_pending_focus`].
    pub fn flush_pending_focus(&mut self, doc: &mut Document, now: Instant) -> bool {
        self.lightbox
            .as_mut()
            .is_some_and(|lightbox| lightbox.flush_pending_focus(doc, now))
    }

    /// Dispatch one input event.
    ///
    /// Returns `Some` when the event was consumed (the host should
    /// suppress its default), `None` when it was ignored.
    pub fn dispatch(&mut self, doc: &mut Document, event: &Event) -> Option<RouterAction> {
        let lightbox = self.lightbox.as_mut()?;
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("viewer_dispatch", open = lightbox.is_open()).entered();

        match *event {
            Event::Pointer(pointer) if pointer.button == MouseButton::Left => {
                let (target, role) = closest_role(doc, pointer.target)?;
                match role {
                    Role::Trigger => {
                        self.registry.refresh(doc);
                        let position = self.registry.resolve_position(doc, target)?;
                        lightbox.open(doc, &self.registry, position).ok()?;
                        Some(RouterAction::Opened(position))
                    }
                    Role::ShowMore => {
                        self.registry.refresh(doc);
                        lightbox.open(doc, &self.registry, 0).ok()?;
                        Some(RouterAction::Opened(0))
                    }
                    Role::Close | Role::Backdrop => {
                        lightbox.close(doc).then_some(RouterAction::Closed)
                    }
                    Role::Prev => {
                        self.registry.refresh(doc);
                        lightbox
                            .navigate(doc, &self.registry, Direction::Previous)
                            .map(RouterAction::Navigated)
                    }
                    Role::Next => {
                        self.registry.refresh(doc);
                        lightbox
                            .navigate(doc, &self.registry, Direction::Next)
                            .map(RouterAction::Navigated)
                    }
                    Role::Viewer | Role::ImageSlot => None,
                }
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Escape if lightbox.is_open() => {
                    lightbox.close(doc);
                    Some(RouterAction::Closed)
                }
                KeyCode::Left if lightbox.is_open() => {
                    self.registry.refresh(doc);
                    lightbox
                        .navigate(doc, &self.registry, Direction::Previous)
                        .map(RouterAction::Navigated)
                }
                KeyCode::Right if lightbox.is_open() => {
                    self.registry.refresh(doc);
                    lightbox
                        .navigate(doc, &self.registry, Direction::Next)
                        .map(RouterAction::Navigated)
                }
                KeyCode::Tab if lightbox.is_open() => {
                    let backward = key.modifiers.contains(Modifiers::SHIFT);
                    match self.trap.cycle(doc, lightbox.root(), backward) {
                        CycleOutcome::Wrapped => Some(RouterAction::FocusCycled),
                        CycleOutcome::Swallowed => Some(RouterAction::KeySwallowed),
                        CycleOutcome::Default => None,
                    }
                }
                _ => None,
            },
            Event::FocusMoved { target } if lightbox.is_open() => {
                if doc.contains(lightbox.root(), target) {
                    return None;
                }
                self.trap
                    .redirect_if_outside(doc, lightbox.root(), lightbox.image_slot());
                Some(RouterAction::FocusRedirected)
            }
            _ => None,
        }
    }
}

/// Walk `node` and its ancestors for the nearest role-bearing node.
fn closest_role(doc: &Document, node: NodeId) -> Option<(NodeId, Role)> {
    let mut current = Some(node);
    while let Some(id) = current {
        if let Some(role) = doc.role(id) {
            return Some((id, role));
        }
        current = doc.parent(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use galleria_dom::{AttrName, KeyEvent, Node, PointerEvent};

    /// Full page fixture: header, grid of triggers (each wrapping an inner
    /// image node), show-more affordance, viewer, footer.
    struct Fixture {
        doc: Document,
        triggers: Vec<NodeId>,
        inner_images: Vec<NodeId>,
        show_more: NodeId,
        header: NodeId,
    }

    fn fixture(triggers: usize) -> (Fixture, InputRouter) {
        let mut doc = Document::new();
        let root = doc.root();
        let header = doc.append(root, Node::new().focusable()).unwrap();
        let grid = doc.append(root, Node::new()).unwrap();
        let mut trigger_ids = Vec::new();
        let mut inner_ids = Vec::new();
        for i in 0..triggers {
            let trigger = doc
                .append(
                    grid,
                    Node::role(Role::Trigger)
                        .focusable()
                        .source(format!("shot-{i}.png"))
                        .description(format!("Screenshot {i}")),
                )
                .unwrap();
            inner_ids.push(doc.append(trigger, Node::new()).unwrap());
            trigger_ids.push(trigger);
        }
        let show_more = doc
            .append(root, Node::role(Role::ShowMore).focusable())
            .unwrap();
        let viewer = doc
            .append(root, Node::role(Role::Viewer).invisible())
            .unwrap();
        doc.append(viewer, Node::role(Role::Backdrop)).unwrap();
        doc.append(viewer, Node::role(Role::ImageSlot)).unwrap();
        doc.append(viewer, Node::role(Role::Close).focusable())
            .unwrap();
        doc.append(viewer, Node::role(Role::Prev).focusable())
            .unwrap();
        doc.append(viewer, Node::role(Role::Next).focusable())
            .unwrap();
        doc.append(root, Node::new()).unwrap();

        let router = InputRouter::mount(&doc);
        (
            Fixture {
                doc,
                triggers: trigger_ids,
                inner_images: inner_ids,
                show_more,
                header,
            },
            router,
        )
    }

    fn click(node: NodeId) -> Event {
        Event::Pointer(PointerEvent::click(node))
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::press(code))
    }

    #[test]
    fn router_without_viewer_is_disabled() {
        let mut doc = Document::new();
        let trigger = doc.append(doc.root(), Node::role(Role::Trigger)).unwrap();
        let mut router = InputRouter::mount(&doc);

        assert!(!router.is_enabled());
        assert_eq!(router.dispatch(&mut doc, &click(trigger)), None);
    }

    #[test]
    fn trigger_click_opens_at_resolved_position() {
        let (mut fx, mut router) = fixture(3);
        let action = router.dispatch(&mut fx.doc, &click(fx.triggers[1]));
        assert_eq!(action, Some(RouterAction::Opened(1)));
        assert_eq!(router.lightbox().unwrap().active_index(), Some(1));
    }

    #[test]
    fn click_on_trigger_descendant_resolves_through_closest_walk() {
        let (mut fx, mut router) = fixture(3);
        let action = router.dispatch(&mut fx.doc, &click(fx.inner_images[2]));
        assert_eq!(action, Some(RouterAction::Opened(2)));
    }

    #[test]
    fn declared_index_overrides_scan_position() {
        let (mut fx, mut router) = fixture(3);
        fx.doc
            .set_attr(fx.triggers[0], AttrName::DeclaredIndex, "2");
        let action = router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        assert_eq!(action, Some(RouterAction::Opened(2)));
    }

    #[test]
    fn show_more_opens_first_item() {
        let (mut fx, mut router) = fixture(3);
        let action = router.dispatch(&mut fx.doc, &click(fx.show_more));
        assert_eq!(action, Some(RouterAction::Opened(0)));
    }

    #[test]
    fn show_more_on_empty_gallery_stays_closed() {
        let (mut fx, mut router) = fixture(0);
        let action = router.dispatch(&mut fx.doc, &click(fx.show_more));
        assert_eq!(action, None);
        assert!(!router.lightbox().unwrap().is_open());
    }

    #[test]
    fn escape_closes_only_while_open() {
        let (mut fx, mut router) = fixture(3);
        assert_eq!(router.dispatch(&mut fx.doc, &press(KeyCode::Escape)), None);

        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        assert_eq!(
            router.dispatch(&mut fx.doc, &press(KeyCode::Escape)),
            Some(RouterAction::Closed)
        );
    }

    #[test]
    fn arrow_keys_ignored_while_closed() {
        let (mut fx, mut router) = fixture(3);
        assert_eq!(router.dispatch(&mut fx.doc, &press(KeyCode::Left)), None);
        assert_eq!(router.dispatch(&mut fx.doc, &press(KeyCode::Right)), None);
    }

    #[test]
    fn arrow_keys_navigate_with_wraparound() {
        let (mut fx, mut router) = fixture(3);
        router.dispatch(&mut fx.doc, &click(fx.triggers[2]));

        assert_eq!(
            router.dispatch(&mut fx.doc, &press(KeyCode::Right)),
            Some(RouterAction::Navigated(0))
        );
        assert_eq!(
            router.dispatch(&mut fx.doc, &press(KeyCode::Left)),
            Some(RouterAction::Navigated(2))
        );
    }

    #[test]
    fn prev_next_button_clicks_navigate() {
        let (mut fx, mut router) = fixture(3);
        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        let prev = router.lightbox().unwrap().prev_button().unwrap();
        let next = router.lightbox().unwrap().next_button().unwrap();

        assert_eq!(
            router.dispatch(&mut fx.doc, &click(next)),
            Some(RouterAction::Navigated(1))
        );
        assert_eq!(
            router.dispatch(&mut fx.doc, &click(prev)),
            Some(RouterAction::Navigated(0))
        );
    }

    #[test]
    fn nav_button_clicks_ignored_while_closed() {
        let (mut fx, mut router) = fixture(3);
        let next = router.lightbox().unwrap().next_button().unwrap();
        assert_eq!(router.dispatch(&mut fx.doc, &click(next)), None);
    }

    #[test]
    fn backdrop_and_close_button_close_the_viewer() {
        let (mut fx, mut router) = fixture(3);
        let backdrop = router.lightbox().unwrap().backdrop().unwrap();
        let close = router.lightbox().unwrap().close_button();

        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        assert_eq!(
            router.dispatch(&mut fx.doc, &click(backdrop)),
            Some(RouterAction::Closed)
        );

        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        assert_eq!(
            router.dispatch(&mut fx.doc, &click(close)),
            Some(RouterAction::Closed)
        );
    }

    #[test]
    fn click_on_viewer_content_does_nothing() {
        let (mut fx, mut router) = fixture(3);
        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        let slot = router.lightbox().unwrap().image_slot();
        assert_eq!(router.dispatch(&mut fx.doc, &click(slot)), None);
        assert!(router.lightbox().unwrap().is_open());
    }

    #[test]
    fn focus_escape_is_redirected_while_open() {
        let (mut fx, mut router) = fixture(3);
        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));

        fx.doc.focus(fx.header);
        let action = router.dispatch(&mut fx.doc, &Event::FocusMoved { target: fx.header });
        assert_eq!(action, Some(RouterAction::FocusRedirected));
        let focused = fx.doc.focused().unwrap();
        let viewer_root = router.lightbox().unwrap().root();
        assert!(fx.doc.contains(viewer_root, focused));
    }

    #[test]
    fn focus_moves_ignored_while_closed() {
        let (mut fx, mut router) = fixture(3);
        fx.doc.focus(fx.header);
        let action = router.dispatch(&mut fx.doc, &Event::FocusMoved { target: fx.header });
        assert_eq!(action, None);
        assert_eq!(fx.doc.focused(), Some(fx.header));
    }

    #[test]
    fn tab_wraps_and_suppresses_default_at_boundary() {
        let (mut fx, mut router) = fixture(3);
        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        let viewer_root = router.lightbox().unwrap().root();
        let focusable = fx.doc.focusables_within(viewer_root);
        fx.doc.focus(*focusable.last().unwrap());

        let action = router.dispatch(&mut fx.doc, &press(KeyCode::Tab));
        assert_eq!(action, Some(RouterAction::FocusCycled));
        assert_eq!(fx.doc.focused(), Some(focusable[0]));

        let shift_tab = Event::Key(KeyEvent::press_with(KeyCode::Tab, Modifiers::SHIFT));
        let action = router.dispatch(&mut fx.doc, &shift_tab);
        assert_eq!(action, Some(RouterAction::FocusCycled));
        assert_eq!(fx.doc.focused(), Some(*focusable.last().unwrap()));
    }

    #[test]
    fn tab_with_no_focusables_is_swallowed() {
        let (mut fx, mut router) = fixture(3);
        router.dispatch(&mut fx.doc, &click(fx.triggers[0]));
        let viewer_root = router.lightbox().unwrap().root();
        for node in fx.doc.focusables_within(viewer_root) {
            fx.doc.set_enabled(node, false);
        }

        let action = router.dispatch(&mut fx.doc, &press(KeyCode::Tab));
        assert_eq!(action, Some(RouterAction::KeySwallowed));
    }

    #[test]
    fn tab_ignored_while_closed() {
        let (mut fx, mut router) = fixture(3);
        assert_eq!(router.dispatch(&mut fx.doc, &press(KeyCode::Tab)), None);
    }

    #[test]
    fn trigger_added_after_mount_is_picked_up() {
        let (mut fx, mut router) = fixture(1);
        let grid = fx.doc.parent(fx.triggers[0]).unwrap();
        let late = fx
            .doc
            .append(grid, Node::role(Role::Trigger).focusable().source("late.png"))
            .unwrap();

        // The registry is refreshed on dispatch, so the new trigger opens.
        let action = router.dispatch(&mut fx.doc, &click(late));
        assert_eq!(action, Some(RouterAction::Opened(1)));
    }
}
