//! Render, update, dispatch and destroy for any [`Widget`].

use super::adapter::{Notification, TriggerEvent};
use super::events::{EventArgs, StateChangedArgs, WidgetEvent};
use super::state::{InteractionState, Trigger, transition};
use super::{Activation, Widget, base::Lifecycle, emit};
use crate::Instant;
use crate::config::InteractionConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::scene::{GroupId, Scene};
use crate::timer::TimerQueue;

/// What lifecycle operations need from the owning container.
pub struct WidgetContext<'a> {
    pub scene: &'a mut Scene,
    pub timers: &'a mut TimerQueue,
    pub config: &'a InteractionConfig,
    pub now: Instant,
}

/// Result of delivering input to a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// A trigger reached the state machine.
    pub handled: bool,
    pub state_changed: bool,
    pub activated: bool,
    /// The widget holds pointer capture after this dispatch.
    pub capture: bool,
}

/// Build the widget's visuals, register its surfaces and enter `IdleUnfocused`.
///
/// Runs exactly once per widget.
pub fn render<W: Widget>(widget: &mut W, cx: &mut WidgetContext<'_>) -> WidgetResult<()> {
    let id = widget.core().id();
    match widget.core().lifecycle() {
        Lifecycle::Constructed => {}
        Lifecycle::Rendered => return Err(WidgetError::AlreadyRendered(id)),
        Lifecycle::Destroyed => return Err(WidgetError::Destroyed(id)),
    }

    let group = cx.scene.create_group(None)?;
    cx.scene
        .set_group_offset(group, widget.core().position().to_vec2())?;
    {
        let core = widget.core_mut();
        core.set_group(Some(group));
        core.adapter_mut().set_drag_threshold(cx.config.drag_threshold);
    }
    build_surfaces(widget, cx.scene, group)?;
    widget.layout(cx.scene)?;

    let core = widget.core_mut();
    core.set_lifecycle(Lifecycle::Rendered);
    core.set_state(InteractionState::IdleUnfocused);
    widget.paint(InteractionState::IdleUnfocused).apply(cx.scene)?;
    widget.core_mut().finish_update();

    log::debug!(
        "Rendered {:?} widget {} with {} surface(s)",
        widget.core().role(),
        id,
        widget.core().adapter().registration_count()
    );
    Ok(())
}

fn build_surfaces<W: Widget>(widget: &mut W, scene: &mut Scene, group: GroupId) -> WidgetResult<()> {
    let surfaces = widget.build(scene, group)?;
    let owner = widget.core().id();
    let adapter = widget.core_mut().adapter_mut();
    for surface in surfaces {
        adapter.register_surface(&mut *scene, owner, surface.shape, surface.tag)?;
    }
    Ok(())
}

/// Re-apply geometry and the current state's visuals. Idempotent; never
/// changes the interaction state of an enabled widget.
pub fn update<W: Widget>(widget: &mut W, cx: &mut WidgetContext<'_>) -> WidgetResult<()> {
    let group = widget.core().ensure_live()?;
    let id = widget.core().id();

    if widget.core().needs_rebuild() {
        // Release before rebuilding so no listener outlives its shape.
        let released = widget.core_mut().adapter_mut().unregister_all(&mut *cx.scene);
        cx.scene.clear_group(group)?;
        build_surfaces(widget, cx.scene, group)?;
        log::debug!(
            "Rebuilt widget {}: released {} surface(s), registered {}",
            id,
            released,
            widget.core().adapter().registration_count()
        );
    }

    cx.scene
        .set_group_offset(group, widget.core().position().to_vec2())?;

    let core = widget.core_mut();
    if !core.is_enabled() {
        if let Some(timer) = core.replace_pending_pulse(None) {
            cx.timers.cancel(timer);
            log::debug!("Cancelled keyboard pulse of disabled widget {}", id);
        }
        core.adapter_mut().cancel_press();
    } else if core.take_interrupted() {
        let idle = if core.adapter().has_focus() {
            InteractionState::IdleFocused
        } else {
            InteractionState::IdleUnfocused
        };
        if core.state() != idle {
            core.set_state(idle);
        }
    }

    widget.layout(cx.scene)?;
    widget.paint(widget.core().state()).apply(cx.scene)?;
    widget.core_mut().finish_update();
    Ok(())
}

/// Translate a notification through the widget's adapter and dispatch it.
pub fn deliver<W: Widget>(
    widget: &mut W,
    notification: Notification,
    cx: &mut WidgetContext<'_>,
) -> WidgetResult<DispatchOutcome> {
    widget.core().ensure_live()?;
    match widget.core_mut().adapter_mut().translate(notification) {
        Some(event) => dispatch(widget, event, cx),
        None => {
            let core = widget.core_mut();
            if core.adapter_mut().take_hot_changed() && core.is_enabled() {
                update(widget, cx)?;
            }
            Ok(DispatchOutcome {
                capture: widget.core().adapter().has_capture(),
                ..DispatchOutcome::default()
            })
        }
    }
}

/// Feed one trigger through the state machine and raise resulting events.
///
/// Event order: state change, continuous input events, the activation's own
/// events, then click.
pub fn dispatch<W: Widget>(
    widget: &mut W,
    event: TriggerEvent,
    cx: &mut WidgetContext<'_>,
) -> WidgetResult<DispatchOutcome> {
    widget.core().ensure_live()?;
    let id = widget.core().id();
    if !widget.core().is_enabled() {
        log::trace!("Dropped {:?} for disabled widget {}", event.trigger, id);
        return Ok(DispatchOutcome::default());
    }

    let current = widget.core().state();
    let step = transition(current, &event.trigger, true);
    let mut outcome = DispatchOutcome {
        handled: true,
        ..DispatchOutcome::default()
    };
    let mut events = Vec::new();

    if step.next != current {
        widget.core_mut().set_state(step.next);
        outcome.state_changed = true;
        events.push(WidgetEvent::StateChanged(StateChangedArgs::new(
            id, current, step.next,
        )));
        log::debug!("Widget {}: {:?} -> {:?} on {:?}", id, current, step.next, event.trigger);
    }

    let mut at = step.next;
    while let Some(follow) = settle_trigger(&*widget, current, at, &event.trigger) {
        let settled = transition(at, &follow, true).next;
        if settled == at {
            break;
        }
        widget.core_mut().set_state(settled);
        outcome.state_changed = true;
        events.push(WidgetEvent::StateChanged(StateChangedArgs::new(id, at, settled)));
        log::debug!("Widget {}: {:?} -> {:?} settled by {:?}", id, at, settled, follow);
        at = settled;
    }

    let core = widget.core_mut();
    if step.schedules_pulse {
        let timer = cx.timers.schedule(id, cx.now + cx.config.key_pulse);
        if let Some(stale) = core.replace_pending_pulse(Some(timer)) {
            cx.timers.cancel(stale);
        }
    } else if event.trigger == Trigger::PulseElapsed {
        core.replace_pending_pulse(None);
    } else if current == InteractionState::KeyActivated && step.next != current {
        if let Some(timer) = core.replace_pending_pulse(None) {
            cx.timers.cancel(timer);
        }
    }

    events.extend(widget.input(&event));

    if step.activates {
        let keyboard = event.trigger == Trigger::PulseElapsed;
        let activation = Activation {
            target: if keyboard { None } else { event.target },
            position: event.position,
            keyboard,
        };
        events.extend(widget.activate(&activation));
        events.push(WidgetEvent::Click(EventArgs::new(id)));
        outcome.activated = true;
        log::debug!("Widget {} activated", id);
    }

    let core = widget.core_mut();
    let state = core.state();
    core.adapter_mut().sync_key_press(&event.trigger, state);
    core.adapter_mut().sync_capture(state);
    outcome.capture = core.adapter().has_capture();
    if core.adapter_mut().take_hot_changed() || outcome.state_changed {
        core.mark_dirty();
    }
    if core.is_dirty() {
        update(widget, cx)?;
    }

    for event in events {
        emit(widget, event);
    }
    Ok(outcome)
}

/// Follow-up trigger for a state that has nothing left to wait for: a release
/// parked in `PressedOutside` (the button is already up), or an unfocused
/// idle state while the widget still holds keyboard focus.
fn settle_trigger<W: Widget>(
    widget: &W,
    from: InteractionState,
    at: InteractionState,
    trigger: &Trigger,
) -> Option<Trigger> {
    match at {
        InteractionState::PressedOutside
            if *trigger == Trigger::PointerUpOutside && from != InteractionState::PressedOutside =>
        {
            Some(Trigger::PointerUpOutside)
        }
        InteractionState::IdleUnfocused if widget.core().adapter().has_focus() => {
            Some(Trigger::FocusIn)
        }
        _ => None,
    }
}

/// Cancel timers, release every surface and remove the widget's shapes.
pub fn destroy<W: Widget>(widget: &mut W, cx: &mut WidgetContext<'_>) -> WidgetResult<()> {
    let group = widget.core().ensure_live()?;
    let id = widget.core().id();
    let core = widget.core_mut();
    core.replace_pending_pulse(None);
    cx.timers.cancel_owner(id);
    core.adapter_mut().cancel_press();
    let released = core.adapter_mut().unregister_all(&mut *cx.scene);
    cx.scene.remove_group(group)?;
    core.set_group(None);
    core.set_lifecycle(Lifecycle::Destroyed);
    log::debug!("Destroyed widget {} ({} surface(s) released)", id, released);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Duration;
    use crate::input::{Key, MouseButton};
    use crate::shapes::{Rectangle, SerializableColor, ShapeId, ShapeStyle};
    use crate::widget::{
        EventAdapter, EventKind, Handlers, HitSurface, Paint, Role, ValueChangedArgs,
        WidgetCore,
    };
    use kurbo::{Point, Size};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Counts activations and repaints a single rectangle per state.
    struct Counter {
        core: WidgetCore,
        handlers: Handlers<Counter>,
        count: f64,
        segments: usize,
        rect: Option<ShapeId>,
        inputs: Vec<Trigger>,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                core: WidgetCore::new(Role::Button, Size::new(80.0, 30.0))
                    .with_adapter(EventAdapter::new().with_drag(true)),
                handlers: Handlers::new(),
                count: 0.0,
                segments: 1,
                rect: None,
                inputs: Vec::new(),
            }
        }
    }

    impl Widget for Counter {
        fn core(&self) -> &WidgetCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut WidgetCore {
            &mut self.core
        }

        fn handlers_mut(&mut self) -> &mut Handlers<Self> {
            &mut self.handlers
        }

        fn build(&mut self, scene: &mut Scene, group: GroupId) -> WidgetResult<Vec<HitSurface>> {
            let width = 80.0 / self.segments as f64;
            let mut surfaces = Vec::new();
            for i in 0..self.segments {
                let shape = scene.add_shape(
                    group,
                    Rectangle::new(Point::new(i as f64 * width, 0.0), width, 30.0),
                )?;
                surfaces.push(HitSurface::new(shape, i));
                self.rect = Some(shape);
            }
            Ok(surfaces)
        }

        fn paint(&self, state: InteractionState) -> Paint {
            let Some(rect) = self.rect else {
                return Paint::new();
            };
            let fill = if state.shows_pressed() { 0xc0c0c0 } else { 0x3498db };
            Paint::new().style(rect, ShapeStyle::filled(SerializableColor::hex(fill)))
        }

        fn activate(&mut self, _activation: &Activation) -> Vec<WidgetEvent> {
            let previous = self.count;
            self.count += 1.0;
            vec![WidgetEvent::ValueChanged(ValueChangedArgs::new(
                self.core.id(),
                previous,
                self.count,
            ))]
        }

        fn input(&mut self, event: &TriggerEvent) -> Vec<WidgetEvent> {
            self.inputs.push(event.trigger.clone());
            Vec::new()
        }
    }

    struct Harness {
        scene: Scene,
        timers: TimerQueue,
        config: InteractionConfig,
        now: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                scene: Scene::new(),
                timers: TimerQueue::new(),
                config: InteractionConfig::default(),
                now: Instant::now(),
            }
        }

        fn cx(&mut self) -> WidgetContext<'_> {
            WidgetContext {
                scene: &mut self.scene,
                timers: &mut self.timers,
                config: &self.config,
                now: self.now,
            }
        }
    }

    fn record_events(widget: &mut Counter) -> Rc<RefCell<Vec<EventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        widget
            .handlers
            .on_click(move |_, _| l.borrow_mut().push(EventKind::Click));
        let l = log.clone();
        widget
            .handlers
            .on_value_change(move |_, _| l.borrow_mut().push(EventKind::ValueChanged));
        let l = log.clone();
        widget
            .handlers
            .on_state_change(move |_, _| l.borrow_mut().push(EventKind::StateChanged));
        log
    }

    fn down() -> Notification {
        Notification::Down {
            tag: 0,
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        }
    }

    fn up(inside: bool) -> Notification {
        Notification::Up {
            tag: inside.then_some(0),
            position: Point::new(10.0, 10.0),
            inside,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_render_once() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        widget.core.move_to(30.0, 100.0);
        render(&mut widget, &mut h.cx()).unwrap();

        assert_eq!(widget.core.state(), InteractionState::IdleUnfocused);
        assert!(widget.core.is_rendered());
        assert!(!widget.core.is_dirty());
        assert_eq!(h.scene.listeners_for(widget.core.id()), 1);
        let group = widget.core.group().unwrap();
        assert_eq!(h.scene.world_offset(group), Some(kurbo::Vec2::new(30.0, 100.0)));

        assert!(matches!(
            render(&mut widget, &mut h.cx()),
            Err(WidgetError::AlreadyRendered(_))
        ));
    }

    #[test]
    fn test_operations_before_render_fail() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        assert!(matches!(update(&mut widget, &mut h.cx()), Err(WidgetError::NotRendered(_))));
        assert!(matches!(
            deliver(&mut widget, Notification::Focus, &mut h.cx()),
            Err(WidgetError::NotRendered(_))
        ));
    }

    #[test]
    fn test_click_raises_one_activate_in_order() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        let log = record_events(&mut widget);

        deliver(&mut widget, Notification::Over { tag: 0 }, &mut h.cx()).unwrap();
        assert_eq!(widget.core.state(), InteractionState::Hovered);
        let pressed = deliver(&mut widget, down(), &mut h.cx()).unwrap();
        assert!(pressed.capture);
        assert_eq!(widget.core.state(), InteractionState::Pressed);
        log.borrow_mut().clear();

        let released = deliver(&mut widget, up(true), &mut h.cx()).unwrap();
        assert!(released.activated);
        assert!(!released.capture);
        assert_eq!(widget.core.state(), InteractionState::Hovered);
        assert_eq!(widget.core.previous_state(), InteractionState::Pressed);
        assert!((widget.count - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            *log.borrow(),
            vec![EventKind::StateChanged, EventKind::ValueChanged, EventKind::Click]
        );
    }

    #[test]
    fn test_visual_hook_follows_state() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        let rect = widget.rect.unwrap();
        let fill = |scene: &Scene| scene.shape(rect).and_then(|s| s.style().fill_color);

        assert_eq!(fill(&h.scene), Some(SerializableColor::hex(0x3498db)));
        deliver(&mut widget, Notification::Over { tag: 0 }, &mut h.cx()).unwrap();
        deliver(&mut widget, down(), &mut h.cx()).unwrap();
        assert_eq!(fill(&h.scene), Some(SerializableColor::hex(0xc0c0c0)));
    }

    #[test]
    fn test_drag_out_and_release_outside_no_click() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        let log = record_events(&mut widget);

        deliver(&mut widget, Notification::Over { tag: 0 }, &mut h.cx()).unwrap();
        deliver(&mut widget, down(), &mut h.cx()).unwrap();
        let moved = deliver(
            &mut widget,
            Notification::Move {
                position: Point::new(60.0, 80.0),
            },
            &mut h.cx(),
        )
        .unwrap();
        assert!(moved.capture);
        assert_eq!(widget.core.state(), InteractionState::Dragging);
        deliver(&mut widget, Notification::Out { tag: 0 }, &mut h.cx()).unwrap();
        deliver(&mut widget, up(false), &mut h.cx()).unwrap();

        assert_eq!(widget.core.state(), InteractionState::IdleUnfocused);
        assert!(!log.borrow().contains(&EventKind::Click));
        assert!(widget.count.abs() < f64::EPSILON);
    }

    #[test]
    fn test_release_outside_without_leave_settles() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        let log = record_events(&mut widget);

        deliver(&mut widget, Notification::Over { tag: 0 }, &mut h.cx()).unwrap();
        deliver(&mut widget, down(), &mut h.cx()).unwrap();
        log.borrow_mut().clear();
        let released = deliver(&mut widget, up(false), &mut h.cx()).unwrap();

        assert!(!released.capture);
        assert!(!released.activated);
        assert_eq!(widget.core.state(), InteractionState::IdleUnfocused);
        assert_eq!(widget.core.previous_state(), InteractionState::PressedOutside);
        assert_eq!(
            *log.borrow(),
            vec![EventKind::StateChanged, EventKind::StateChanged]
        );
    }

    #[test]
    fn test_random_input_never_leaves_a_press_behind() {
        let notifications = [
            Notification::Over { tag: 0 },
            Notification::Out { tag: 0 },
            down(),
            up(true),
            up(false),
            Notification::Move {
                position: Point::new(12.0, 10.0),
            },
            Notification::Move {
                position: Point::new(60.0, 80.0),
            },
            Notification::KeyDown(Key::Enter),
            Notification::KeyUp(Key::Enter),
            Notification::KeyDown(Key::Space),
            Notification::KeyUp(Key::Space),
            Notification::Focus,
            Notification::Blur,
            Notification::TimerElapsed,
        ];
        let mut rng = StdRng::seed_from_u64(0x5EED);

        for _ in 0..200 {
            let mut h = Harness::new();
            let mut widget = Counter::new();
            render(&mut widget, &mut h.cx()).unwrap();

            for _ in 0..60 {
                let n = notifications.choose(&mut rng).unwrap().clone();
                let outcome = deliver(&mut widget, n, &mut h.cx()).unwrap();
                let state = widget.core.state();
                let adapter = widget.core.adapter();
                assert!(InteractionState::ALL.contains(&state));
                assert!(!outcome.capture || state.is_pressed());
                // Only a held pointer reaches the pointer-only pressed states.
                if matches!(
                    state,
                    InteractionState::HoverPressed
                        | InteractionState::PressedOutside
                        | InteractionState::Dragging
                ) {
                    assert!(adapter.has_capture(), "{state:?} without a pointer press");
                }
                if state == InteractionState::Pressed {
                    assert!(adapter.has_capture() != adapter.is_key_press());
                }
            }

            // Let go of everything.
            for n in [up(false), Notification::KeyUp(Key::Enter), Notification::TimerElapsed] {
                deliver(&mut widget, n, &mut h.cx()).unwrap();
            }
            let state = widget.core.state();
            assert!(!state.is_pressed(), "stuck in {state:?}");
            assert_ne!(state, InteractionState::KeyActivated);
            assert!(!widget.core.adapter().has_capture());
            assert!(!widget.core.adapter().is_key_press());
        }
    }

    #[test]
    fn test_disabled_widget_is_inert() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        widget.core.set_enabled(false);
        update(&mut widget, &mut h.cx()).unwrap();
        let log = record_events(&mut widget);

        for n in [
            Notification::Over { tag: 0 },
            down(),
            up(true),
            Notification::Focus,
            Notification::KeyDown(Key::Enter),
            Notification::KeyUp(Key::Enter),
        ] {
            let outcome = deliver(&mut widget, n, &mut h.cx()).unwrap();
            assert!(!outcome.handled);
        }
        assert_eq!(widget.core.state(), InteractionState::IdleUnfocused);
        assert!(log.borrow().is_empty());
        assert!(widget.inputs.is_empty());
    }

    #[test]
    fn test_keyboard_activation_waits_for_pulse() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        let log = record_events(&mut widget);

        deliver(&mut widget, Notification::Focus, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyDown(Key::Space), &mut h.cx()).unwrap();
        assert_eq!(widget.core.state(), InteractionState::Pressed);
        let released = deliver(&mut widget, Notification::KeyUp(Key::Space), &mut h.cx()).unwrap();
        assert!(!released.activated);
        assert!(!released.capture);
        assert_eq!(widget.core.state(), InteractionState::KeyActivated);
        assert!(widget.core.has_pending_pulse());
        assert!(!log.borrow().contains(&EventKind::Click));

        let due = h.timers.take_due(h.now + Duration::from_millis(100));
        assert_eq!(due.len(), 1);
        let fired = deliver(&mut widget, Notification::TimerElapsed, &mut h.cx()).unwrap();
        assert!(fired.activated);
        assert_eq!(widget.core.state(), InteractionState::IdleFocused);
        assert!(!widget.core.has_pending_pulse());
        assert_eq!(log.borrow().iter().filter(|k| **k == EventKind::Click).count(), 1);
    }

    #[test]
    fn test_blur_during_pulse_cancels_timer() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::Focus, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyDown(Key::Enter), &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyUp(Key::Enter), &mut h.cx()).unwrap();
        assert_eq!(h.timers.len(), 1);

        deliver(&mut widget, Notification::Blur, &mut h.cx()).unwrap();
        assert_eq!(widget.core.state(), InteractionState::IdleUnfocused);
        assert!(h.timers.is_empty());
    }

    #[test]
    fn test_disable_cancels_pulse_and_reenable_resets() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::Focus, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyDown(Key::Enter), &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyUp(Key::Enter), &mut h.cx()).unwrap();

        widget.core.set_enabled(false);
        update(&mut widget, &mut h.cx()).unwrap();
        assert!(h.timers.is_empty());
        assert_eq!(widget.core.state(), InteractionState::KeyActivated);

        widget.core.set_enabled(true);
        update(&mut widget, &mut h.cx()).unwrap();
        assert_eq!(widget.core.state(), InteractionState::IdleFocused);
    }

    #[test]
    fn test_rebuild_keeps_registrations_unique() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();

        widget.segments = 3;
        widget.core.request_rebuild();
        update(&mut widget, &mut h.cx()).unwrap();
        assert_eq!(h.scene.listeners_for(widget.core.id()), 3);
        assert_eq!(widget.core.adapter().registration_count(), 3);

        widget.core.request_rebuild();
        update(&mut widget, &mut h.cx()).unwrap();
        assert_eq!(h.scene.listeners_for(widget.core.id()), 3);
        assert_eq!(h.scene.shape_count(), 3);
        assert!(!widget.core.needs_rebuild());
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::Over { tag: 0 }, &mut h.cx()).unwrap();
        update(&mut widget, &mut h.cx()).unwrap();
        update(&mut widget, &mut h.cx()).unwrap();
        assert_eq!(widget.core.state(), InteractionState::Hovered);
        assert_eq!(h.scene.listener_count(), 1);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::Focus, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyDown(Key::Enter), &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::KeyUp(Key::Enter), &mut h.cx()).unwrap();

        destroy(&mut widget, &mut h.cx()).unwrap();
        assert!(h.timers.is_empty());
        assert_eq!(h.scene.listener_count(), 0);
        assert!(h.scene.is_empty());
        assert!(matches!(
            deliver(&mut widget, Notification::TimerElapsed, &mut h.cx()),
            Err(WidgetError::Destroyed(_))
        ));
        assert!(matches!(destroy(&mut widget, &mut h.cx()), Err(WidgetError::Destroyed(_))));
    }

    #[test]
    fn test_continuous_input_runs_without_state_change() {
        let mut h = Harness::new();
        let mut widget = Counter::new();
        render(&mut widget, &mut h.cx()).unwrap();
        deliver(&mut widget, Notification::Over { tag: 0 }, &mut h.cx()).unwrap();
        deliver(&mut widget, down(), &mut h.cx()).unwrap();
        for x in [40.0, 50.0, 60.0] {
            deliver(
                &mut widget,
                Notification::Move {
                    position: Point::new(x, 10.0),
                },
                &mut h.cx(),
            )
            .unwrap();
        }
        let moves = widget
            .inputs
            .iter()
            .filter(|t| **t == Trigger::PointerMove)
            .count();
        assert_eq!(moves, 3);
    }
}
