//! Event adapter: raw surface notifications in, abstract triggers out.
//!
//! Each widget owns one adapter. The adapter registers the widget's hit
//! surfaces with an [`InputSurface`] and remembers the handles so they can be
//! released together. Notifications arrive already routed to the widget (see
//! [`InputRouter`](crate::InputRouter)) with widget-local positions; the
//! adapter tracks pointer containment, the press origin and the drag
//! threshold, and emits at most one [`Trigger`] per notification. While an
//! activation key holds the widget down, pointer notifications only update
//! hover tracking.

use super::WidgetId;
use super::state::{InteractionState, Trigger};
use crate::config::InteractionConfig;
use crate::input::{Key, MouseButton};
use crate::scene::{InputSurface, ListenerHandle, SceneResult};
use crate::shapes::ShapeId;
use kurbo::{Point, Vec2};

/// Low-level notification for one widget.
///
/// `tag` is the value the widget attached to the surface when registering it.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Pointer moved onto a surface.
    Over { tag: usize },
    /// Pointer left the widget's surfaces.
    Out { tag: usize },
    Down {
        tag: usize,
        position: Point,
        button: MouseButton,
    },
    /// Button released. `inside` tells whether the pointer is over one of the
    /// widget's surfaces, `tag` which one.
    Up {
        tag: Option<usize>,
        position: Point,
        inside: bool,
        button: MouseButton,
    },
    Move { position: Point },
    KeyDown(Key),
    KeyUp(Key),
    Focus,
    Blur,
    /// The keyboard pulse timer fired.
    TimerElapsed,
}

impl Notification {
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Notification::Over { .. }
                | Notification::Out { .. }
                | Notification::Down { .. }
                | Notification::Up { .. }
                | Notification::Move { .. }
        )
    }

    /// Shift pointer positions from scene coordinates into the coordinates of
    /// a widget whose origin sits at `origin`.
    pub fn localized(self, origin: Vec2) -> Self {
        match self {
            Notification::Down {
                tag,
                position,
                button,
            } => Notification::Down {
                tag,
                position: position - origin,
                button,
            },
            Notification::Up {
                tag,
                position,
                inside,
                button,
            } => Notification::Up {
                tag,
                position: position - origin,
                inside,
                button,
            },
            Notification::Move { position } => Notification::Move {
                position: position - origin,
            },
            other => other,
        }
    }
}

/// A trigger plus the data continuous-input widgets need.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    pub trigger: Trigger,
    /// Tag of the surface the trigger concerns.
    pub target: Option<usize>,
    /// Widget-local pointer position, for pointer triggers.
    pub position: Option<Point>,
}

impl TriggerEvent {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            target: None,
            position: None,
        }
    }

    pub fn with_target(mut self, target: Option<usize>) -> Self {
        self.target = target;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    handle: ListenerHandle,
    shape: ShapeId,
}

/// Per-widget translator from surface notifications to triggers.
#[derive(Debug, Clone)]
pub struct EventAdapter {
    registrations: Vec<Registration>,
    drag_enabled: bool,
    item_scoped: bool,
    drag_threshold: f64,
    press_origin: Option<Point>,
    press_target: Option<usize>,
    dragging: bool,
    pointer_session: bool,
    key_press: bool,
    focused: bool,
    capture: bool,
    pointer_inside: bool,
    hot: Option<usize>,
    hot_changed: bool,
    last_position: Option<Point>,
}

impl Default for EventAdapter {
    fn default() -> Self {
        Self {
            registrations: Vec::new(),
            drag_enabled: false,
            item_scoped: false,
            drag_threshold: InteractionConfig::DEFAULT_DRAG_THRESHOLD,
            press_origin: None,
            press_target: None,
            dragging: false,
            pointer_session: false,
            key_press: false,
            focused: false,
            capture: false,
            pointer_inside: false,
            hot: None,
            hot_changed: false,
            last_position: None,
        }
    }
}

impl EventAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `PointerMove` for presses that travel past the drag threshold.
    /// Widgets without continuous input leave this off, so wandering off and
    /// back onto a pressed button still counts as a click.
    pub fn with_drag(mut self, enabled: bool) -> Self {
        self.drag_enabled = enabled;
        self
    }

    /// Treat each tagged surface as its own press target: a press on one item
    /// released over another does not activate.
    pub fn with_item_scope(mut self, enabled: bool) -> Self {
        self.item_scoped = enabled;
        self
    }

    pub fn set_drag_threshold(&mut self, threshold: f64) {
        self.drag_threshold = threshold.max(0.0);
    }

    pub fn is_drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    /// Subscribe `owner` to input on `shape`.
    pub fn register_surface(
        &mut self,
        surface: &mut dyn InputSurface,
        owner: WidgetId,
        shape: ShapeId,
        tag: usize,
    ) -> SceneResult<ListenerHandle> {
        let handle = surface.listen(shape, owner, tag)?;
        log::debug!("Registered surface {} (tag {}) for widget {}", shape, tag, owner);
        self.registrations.push(Registration { handle, shape });
        Ok(handle)
    }

    /// Release every registration. Returns how many were still live.
    pub fn unregister_all(&mut self, surface: &mut dyn InputSurface) -> usize {
        self.registrations
            .drain(..)
            .filter(|r| surface.unlisten(r.handle))
            .count()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Shapes currently registered, in registration order.
    pub fn registered_shapes(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.registrations.iter().map(|r| r.shape)
    }

    /// Translate one notification. `None` means nothing for the state machine.
    pub fn translate(&mut self, notification: Notification) -> Option<TriggerEvent> {
        if self.key_press && notification.is_pointer() {
            self.track_during_key_press(&notification);
            return None;
        }
        match notification {
            Notification::Over { tag } => {
                let previous = self.hot.replace(tag);
                self.hot_changed |= previous != Some(tag);
                let was_inside = std::mem::replace(&mut self.pointer_inside, true);
                match self.press_target {
                    Some(pressed) if self.item_scoped => {
                        if tag == pressed {
                            Some(TriggerEvent::new(Trigger::PointerEnter).with_target(Some(tag)))
                        } else if was_inside && previous == Some(pressed) {
                            Some(TriggerEvent::new(Trigger::PointerLeave).with_target(Some(pressed)))
                        } else {
                            None
                        }
                    }
                    // Moving between surfaces of the same widget.
                    _ if was_inside => None,
                    _ => Some(TriggerEvent::new(Trigger::PointerEnter).with_target(Some(tag))),
                }
            }
            Notification::Out { tag } => {
                self.pointer_inside = false;
                if self.press_target.is_none() && self.hot.take().is_some() {
                    self.hot_changed = true;
                }
                if self.item_scoped && self.press_target.is_some_and(|p| p != tag) {
                    // Already left the pressed item when crossing to this one.
                    return None;
                }
                Some(TriggerEvent::new(Trigger::PointerLeave).with_target(Some(tag)))
            }
            Notification::Down {
                tag,
                position,
                button,
            } => {
                if button != MouseButton::Left {
                    return None;
                }
                self.press_origin = Some(position);
                self.press_target = Some(tag);
                self.dragging = false;
                self.pointer_session = true;
                self.pointer_inside = true;
                self.last_position = Some(position);
                if self.hot.replace(tag) != Some(tag) {
                    self.hot_changed = true;
                }
                Some(
                    TriggerEvent::new(Trigger::PointerDown)
                        .with_target(Some(tag))
                        .with_position(position),
                )
            }
            Notification::Move { position } => {
                self.last_position = Some(position);
                let origin = self.press_origin?;
                if !self.drag_enabled {
                    return None;
                }
                if !self.dragging {
                    if (position - origin).hypot() < self.drag_threshold {
                        return None;
                    }
                    self.dragging = true;
                }
                Some(
                    TriggerEvent::new(Trigger::PointerMove)
                        .with_target(self.press_target)
                        .with_position(position),
                )
            }
            Notification::Up {
                tag,
                position,
                inside,
                button,
            } => {
                if button != MouseButton::Left {
                    return None;
                }
                let pressed = self.press_target.take();
                let released_inside = match pressed {
                    Some(p) if self.item_scoped => inside && tag == Some(p),
                    _ => inside,
                };
                self.press_origin = None;
                self.dragging = false;
                // A scoped release over another item counts as outside, so the
                // next crossing re-enters.
                self.pointer_inside = if self.item_scoped { released_inside } else { inside };
                self.last_position = Some(position);
                if !inside && self.hot.take().is_some() {
                    self.hot_changed = true;
                } else if inside && tag.is_some() && self.hot != tag {
                    self.hot = tag;
                    self.hot_changed = true;
                }
                let trigger = if released_inside {
                    Trigger::PointerUpInside
                } else {
                    Trigger::PointerUpOutside
                };
                Some(
                    TriggerEvent::new(trigger)
                        .with_target(pressed.or(tag))
                        .with_position(position),
                )
            }
            Notification::KeyDown(key) => Some(TriggerEvent::new(Trigger::KeyDown(key))),
            Notification::KeyUp(key) => Some(TriggerEvent::new(Trigger::KeyUp(key))),
            Notification::Focus => {
                self.focused = true;
                Some(TriggerEvent::new(Trigger::FocusIn))
            }
            Notification::Blur => {
                self.focused = false;
                Some(TriggerEvent::new(Trigger::FocusOut))
            }
            Notification::TimerElapsed => Some(TriggerEvent::new(Trigger::PulseElapsed)),
        }
    }

    /// Re-derive the capture token after a transition: a pointer press holds
    /// capture for as long as the widget stays in a pressed state.
    pub fn sync_capture(&mut self, state: InteractionState) {
        self.capture = self.pointer_session && state.is_pressed();
        if !self.capture {
            self.pointer_session = false;
        }
    }

    /// Note whether an activation key holds the widget down. While it does,
    /// pointer notifications only update hover tracking.
    pub fn sync_key_press(&mut self, trigger: &Trigger, state: InteractionState) {
        if !state.is_pressed() {
            self.key_press = false;
        } else if matches!(trigger, Trigger::KeyDown(key) if key.is_activation())
            && !self.pointer_session
        {
            self.key_press = true;
        }
    }

    fn track_during_key_press(&mut self, notification: &Notification) {
        match notification {
            Notification::Over { tag } => {
                self.hot_changed |= self.hot.replace(*tag) != Some(*tag);
                self.pointer_inside = true;
            }
            Notification::Out { .. } => {
                self.hot_changed |= self.hot.take().is_some();
                self.pointer_inside = false;
            }
            Notification::Move { position } | Notification::Up { position, .. } => {
                self.last_position = Some(*position);
            }
            _ => {}
        }
    }

    /// Abandon any pointer or keyboard press in progress.
    pub fn cancel_press(&mut self) {
        self.press_origin = None;
        self.press_target = None;
        self.dragging = false;
        self.pointer_session = false;
        self.key_press = false;
        self.capture = false;
    }

    pub fn is_key_press(&self) -> bool {
        self.key_press
    }

    /// Whether the widget holds keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Whether this widget wants every pointer event until release.
    pub fn has_capture(&self) -> bool {
        self.capture
    }

    pub fn is_pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Surface the pointer is over, if any.
    pub fn hot(&self) -> Option<usize> {
        self.hot
    }

    /// Surface being pressed, falling back to the hovered one.
    pub fn active_item(&self) -> Option<usize> {
        self.press_target.or(self.hot)
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    /// Whether the hovered surface changed since the last call.
    pub fn take_hot_changed(&mut self) -> bool {
        std::mem::take(&mut self.hot_changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::shapes::Rectangle;
    use uuid::Uuid;

    fn down(tag: usize, x: f64) -> Notification {
        Notification::Down {
            tag,
            position: Point::new(x, 0.0),
            button: MouseButton::Left,
        }
    }

    fn up(tag: Option<usize>, inside: bool) -> Notification {
        Notification::Up {
            tag,
            position: Point::ZERO,
            inside,
            button: MouseButton::Left,
        }
    }

    fn trigger(adapter: &mut EventAdapter, n: Notification) -> Option<Trigger> {
        adapter.translate(n).map(|e| e.trigger)
    }

    #[test]
    fn test_localized_positions() {
        let n = Notification::Move {
            position: Point::new(130.0, 110.0),
        };
        assert_eq!(
            n.localized(Vec2::new(30.0, 100.0)),
            Notification::Move {
                position: Point::new(100.0, 10.0)
            }
        );
        assert_eq!(
            Notification::Focus.localized(Vec2::new(1.0, 1.0)),
            Notification::Focus
        );
    }

    #[test]
    fn test_register_and_unregister() {
        let mut scene = Scene::new();
        let group = scene.create_group(None).unwrap();
        let owner = Uuid::new_v4();
        let a = scene
            .add_shape(group, Rectangle::new(Point::ZERO, 10.0, 10.0))
            .unwrap();
        let b = scene
            .add_shape(group, Rectangle::new(Point::ZERO, 5.0, 5.0))
            .unwrap();

        let mut adapter = EventAdapter::new();
        adapter.register_surface(&mut scene, owner, a, 0).unwrap();
        adapter.register_surface(&mut scene, owner, b, 1).unwrap();
        assert_eq!(adapter.registration_count(), 2);
        assert_eq!(scene.listeners_for(owner), 2);
        assert_eq!(adapter.registered_shapes().collect::<Vec<_>>(), vec![a, b]);

        assert_eq!(adapter.unregister_all(&mut scene), 2);
        assert_eq!(adapter.registration_count(), 0);
        assert_eq!(scene.listener_count(), 0);
        assert_eq!(adapter.unregister_all(&mut scene), 0);
    }

    #[test]
    fn test_register_unknown_shape_fails_without_recording() {
        let mut scene = Scene::new();
        let mut adapter = EventAdapter::new();
        assert!(
            adapter
                .register_surface(&mut scene, Uuid::new_v4(), Uuid::new_v4(), 0)
                .is_err()
        );
        assert_eq!(adapter.registration_count(), 0);
    }

    #[test]
    fn test_enter_once_across_sibling_surfaces() {
        let mut adapter = EventAdapter::new();
        assert_eq!(
            trigger(&mut adapter, Notification::Over { tag: 0 }),
            Some(Trigger::PointerEnter)
        );
        assert!(adapter.take_hot_changed());
        assert_eq!(trigger(&mut adapter, Notification::Over { tag: 1 }), None);
        assert_eq!(adapter.hot(), Some(1));
        assert!(adapter.take_hot_changed());
        assert!(!adapter.take_hot_changed());
        assert_eq!(
            trigger(&mut adapter, Notification::Out { tag: 1 }),
            Some(Trigger::PointerLeave)
        );
        assert_eq!(adapter.hot(), None);
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut adapter = EventAdapter::new().with_drag(true);
        assert_eq!(
            trigger(&mut adapter, Notification::Move { position: Point::new(50.0, 0.0) }),
            None
        );
        assert_eq!(adapter.last_position(), Some(Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_drag_threshold() {
        let mut adapter = EventAdapter::new().with_drag(true);
        adapter.set_drag_threshold(3.0);
        assert_eq!(trigger(&mut adapter, down(0, 10.0)), Some(Trigger::PointerDown));
        assert_eq!(
            trigger(&mut adapter, Notification::Move { position: Point::new(12.0, 0.0) }),
            None
        );
        let event = adapter
            .translate(Notification::Move { position: Point::new(14.0, 0.0) })
            .unwrap();
        assert_eq!(event.trigger, Trigger::PointerMove);
        assert_eq!(event.position, Some(Point::new(14.0, 0.0)));
        assert_eq!(event.target, Some(0));
        // Past the threshold every move is reported.
        assert_eq!(
            trigger(&mut adapter, Notification::Move { position: Point::new(14.5, 0.0) }),
            Some(Trigger::PointerMove)
        );
        assert!(adapter.is_dragging());
    }

    #[test]
    fn test_drag_disabled_suppresses_moves() {
        let mut adapter = EventAdapter::new();
        adapter.translate(down(0, 0.0));
        assert_eq!(
            trigger(&mut adapter, Notification::Move { position: Point::new(100.0, 0.0) }),
            None
        );
    }

    #[test]
    fn test_release_inside_and_outside() {
        let mut adapter = EventAdapter::new();
        adapter.translate(down(0, 0.0));
        assert_eq!(trigger(&mut adapter, up(Some(0), true)), Some(Trigger::PointerUpInside));
        adapter.translate(down(0, 0.0));
        assert_eq!(trigger(&mut adapter, up(None, false)), Some(Trigger::PointerUpOutside));
        assert_eq!(adapter.hot(), None);
    }

    #[test]
    fn test_secondary_buttons_ignored() {
        let mut adapter = EventAdapter::new();
        let n = Notification::Down {
            tag: 0,
            position: Point::ZERO,
            button: MouseButton::Right,
        };
        assert_eq!(adapter.translate(n), None);
        assert!(adapter.active_item().is_none());
    }

    #[test]
    fn test_item_scoped_press() {
        let mut adapter = EventAdapter::new().with_item_scope(true);
        adapter.translate(Notification::Over { tag: 0 });
        adapter.translate(down(0, 0.0));
        // Crossing onto item 1 leaves the pressed item.
        assert_eq!(
            trigger(&mut adapter, Notification::Over { tag: 1 }),
            Some(Trigger::PointerLeave)
        );
        assert_eq!(adapter.active_item(), Some(0));
        // Leaving the widget from item 1 reports nothing new.
        assert_eq!(trigger(&mut adapter, Notification::Out { tag: 1 }), None);
        assert_eq!(
            trigger(&mut adapter, Notification::Over { tag: 0 }),
            Some(Trigger::PointerEnter)
        );
        // Release over another item is outside the press.
        adapter.translate(Notification::Over { tag: 1 });
        let event = adapter.translate(up(Some(1), true)).unwrap();
        assert_eq!(event.trigger, Trigger::PointerUpOutside);
        assert_eq!(event.target, Some(0));
        assert!(!adapter.is_pointer_inside());
        // Crossing to another item afterwards enters again.
        assert_eq!(
            trigger(&mut adapter, Notification::Over { tag: 0 }),
            Some(Trigger::PointerEnter)
        );
    }

    #[test]
    fn test_capture_follows_pointer_press() {
        let mut adapter = EventAdapter::new();
        adapter.translate(down(0, 0.0));
        adapter.sync_capture(InteractionState::Pressed);
        assert!(adapter.has_capture());
        adapter.sync_capture(InteractionState::PressedOutside);
        assert!(adapter.has_capture());
        adapter.translate(up(None, false));
        adapter.sync_capture(InteractionState::IdleUnfocused);
        assert!(!adapter.has_capture());
        // Keyboard presses never capture the pointer.
        adapter.sync_capture(InteractionState::Pressed);
        assert!(!adapter.has_capture());
    }

    #[test]
    fn test_cancel_press() {
        let mut adapter = EventAdapter::new().with_drag(true);
        adapter.translate(down(0, 0.0));
        adapter.sync_capture(InteractionState::Pressed);
        adapter.cancel_press();
        assert!(!adapter.has_capture());
        assert_eq!(
            trigger(&mut adapter, Notification::Move { position: Point::new(100.0, 0.0) }),
            None
        );
    }

    #[test]
    fn test_keys_focus_and_timer() {
        let mut adapter = EventAdapter::new();
        assert_eq!(
            trigger(&mut adapter, Notification::KeyDown(Key::Enter)),
            Some(Trigger::KeyDown(Key::Enter))
        );
        assert_eq!(trigger(&mut adapter, Notification::Focus), Some(Trigger::FocusIn));
        assert_eq!(trigger(&mut adapter, Notification::Blur), Some(Trigger::FocusOut));
        assert_eq!(
            trigger(&mut adapter, Notification::TimerElapsed),
            Some(Trigger::PulseElapsed)
        );
    }

    #[test]
    fn test_key_press_ignores_pointer() {
        let mut adapter = EventAdapter::new();
        adapter.translate(Notification::Over { tag: 0 });
        let key = Trigger::KeyDown(Key::Enter);
        adapter.sync_key_press(&key, InteractionState::Pressed);
        assert!(adapter.is_key_press());

        assert_eq!(trigger(&mut adapter, Notification::Out { tag: 0 }), None);
        assert!(!adapter.is_pointer_inside());
        assert_eq!(adapter.hot(), None);
        assert_eq!(trigger(&mut adapter, Notification::Over { tag: 0 }), None);
        assert_eq!(trigger(&mut adapter, down(0, 0.0)), None);
        assert_eq!(trigger(&mut adapter, up(Some(0), true)), None);
        assert!(!adapter.has_capture());

        adapter.sync_key_press(&Trigger::KeyUp(Key::Enter), InteractionState::KeyActivated);
        assert!(!adapter.is_key_press());
        assert_eq!(trigger(&mut adapter, Notification::Out { tag: 0 }), Some(Trigger::PointerLeave));
    }

    #[test]
    fn test_key_down_during_pointer_press_is_not_a_key_press() {
        let mut adapter = EventAdapter::new();
        adapter.translate(down(0, 0.0));
        adapter.sync_capture(InteractionState::Pressed);
        adapter.sync_key_press(&Trigger::KeyDown(Key::Space), InteractionState::Pressed);
        assert!(!adapter.is_key_press());
        assert_eq!(trigger(&mut adapter, Notification::Out { tag: 0 }), Some(Trigger::PointerLeave));
    }

    #[test]
    fn test_focus_is_tracked() {
        let mut adapter = EventAdapter::new();
        assert!(!adapter.has_focus());
        adapter.translate(Notification::Focus);
        assert!(adapter.has_focus());
        adapter.translate(Notification::Blur);
        assert!(!adapter.has_focus());
    }
}
