//! The container: owns the scene, the widgets and their input plumbing.

use crate::Instant;
use crate::config::InteractionConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::input::{InputState, Key, KeyEvent, Modifiers, PointerEvent};
use crate::router::{Delivery, InputRouter};
use crate::scene::Scene;
use crate::timer::TimerQueue;
use crate::widget::{DynWidget, Notification, Widget, WidgetContext, WidgetId};
use kurbo::Size;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Typed reference to a widget owned by a [`Container`].
pub struct WidgetHandle<W> {
    id: WidgetId,
    _marker: PhantomData<fn() -> W>,
}

impl<W> WidgetHandle<W> {
    pub fn id(&self) -> WidgetId {
        self.id
    }
}

impl<W> Clone for WidgetHandle<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for WidgetHandle<W> {}

impl<W> PartialEq for WidgetHandle<W> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<W> Eq for WidgetHandle<W> {}

impl<W> std::fmt::Debug for WidgetHandle<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WidgetHandle").field(&self.id).finish()
    }
}

/// Root of a widget tree.
///
/// Widgets are rendered when added and destroyed when removed. The host feeds
/// device input through [`Container::handle_pointer_event`] and
/// [`Container::handle_key_event`] and calls [`Container::tick`] regularly so
/// deferred keyboard activations fire.
pub struct Container {
    size: Size,
    scene: Scene,
    widgets: HashMap<WidgetId, Box<dyn DynWidget>>,
    order: Vec<WidgetId>,
    router: InputRouter,
    timers: TimerQueue,
    input: InputState,
    config: InteractionConfig,
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            scene: Scene::new(),
            widgets: HashMap::new(),
            order: Vec::new(),
            router: InputRouter::new(),
            timers: TimerQueue::new(),
            input: InputState::new(),
            config: InteractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: InteractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// The shapes of every widget, for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn widget_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Widget ids in insertion order.
    pub fn widget_ids(&self) -> &[WidgetId] {
        &self.order
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Render `widget` and take ownership of it.
    pub fn add<W: Widget>(&mut self, widget: W) -> WidgetResult<WidgetHandle<W>> {
        let mut widget: Box<dyn DynWidget> = Box::new(widget);
        let mut cx = WidgetContext {
            scene: &mut self.scene,
            timers: &mut self.timers,
            config: &self.config,
            now: Instant::now(),
        };
        widget.render(&mut cx)?;
        let id = widget.widget_core().id();
        self.widgets.insert(id, widget);
        self.order.push(id);
        Ok(WidgetHandle {
            id,
            _marker: PhantomData,
        })
    }

    /// Typed shared access.
    pub fn get<W: Widget>(&self, handle: WidgetHandle<W>) -> Option<&W> {
        self.widgets.get(&handle.id)?.as_any().downcast_ref::<W>()
    }

    /// Run `f` on the widget, then bring its visuals up to date if it
    /// changed anything.
    pub fn modify<W: Widget, R>(
        &mut self,
        handle: WidgetHandle<W>,
        f: impl FnOnce(&mut W) -> R,
    ) -> WidgetResult<R> {
        let Container {
            scene,
            widgets,
            router,
            timers,
            config,
            ..
        } = self;
        let widget = widgets
            .get_mut(&handle.id)
            .ok_or(WidgetError::UnknownWidget(handle.id))?;
        widget.widget_core().ensure_live()?;
        let typed = widget
            .as_any_mut()
            .downcast_mut::<W>()
            .ok_or(WidgetError::TypeMismatch(handle.id))?;
        let result = f(typed);

        if widget.widget_core().is_dirty() {
            let mut cx = WidgetContext {
                scene,
                timers,
                config,
                now: Instant::now(),
            };
            widget.update(&mut cx)?;
        }
        let core = widget.widget_core();
        router.sync_capture(handle.id, core.adapter().has_capture());
        Ok(result)
    }

    /// Re-run layout and paint on every widget, e.g. once the renderer has
    /// measured text. Returns how many widgets were updated.
    pub fn update_all(&mut self) -> WidgetResult<usize> {
        let mut cx = WidgetContext {
            scene: &mut self.scene,
            timers: &mut self.timers,
            config: &self.config,
            now: Instant::now(),
        };
        let mut updated = 0;
        for id in &self.order {
            let Some(widget) = self.widgets.get_mut(id) else {
                continue;
            };
            widget.widget_core_mut().mark_dirty();
            widget.update(&mut cx)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Destroy a widget and drop it.
    pub fn remove<W: Widget>(&mut self, handle: WidgetHandle<W>) -> WidgetResult<()> {
        self.remove_id(handle.id)
    }

    pub fn remove_id(&mut self, id: WidgetId) -> WidgetResult<()> {
        let mut widget = self
            .widgets
            .remove(&id)
            .ok_or(WidgetError::UnknownWidget(id))?;
        self.order.retain(|w| *w != id);
        self.router.forget(id);
        let mut cx = WidgetContext {
            scene: &mut self.scene,
            timers: &mut self.timers,
            config: &self.config,
            now: Instant::now(),
        };
        widget.destroy(&mut cx)
    }

    /// Destroy every widget.
    pub fn clear(&mut self) -> WidgetResult<()> {
        for id in self.order.clone() {
            self.remove_id(id)?;
        }
        Ok(())
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    /// Feed one pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, now: Instant) -> WidgetResult<()> {
        self.input.handle_pointer_event(&event);
        let deliveries = self.router.route_pointer(&event, &self.scene);
        self.deliver_all(deliveries, now)
    }

    /// Feed one key event. Tab and Shift+Tab move focus.
    pub fn handle_key_event(&mut self, event: KeyEvent, now: Instant) -> WidgetResult<()> {
        self.input.handle_key_event(&event);
        if let KeyEvent::Pressed(Key::Tab) = event {
            let reverse = self.input.modifiers.shift;
            return self.focus_next(reverse, now);
        }
        match self.router.route_key(&event) {
            Some(delivery) => self.deliver(delivery, now),
            None => Ok(()),
        }
    }

    /// Give keyboard focus to a widget, or clear it.
    pub fn focus(&mut self, widget: Option<WidgetId>, now: Instant) -> WidgetResult<()> {
        if let Some(id) = widget {
            if !self.widgets.contains_key(&id) {
                return Err(WidgetError::UnknownWidget(id));
            }
        }
        let deliveries = self.router.set_focus(widget);
        self.deliver_all(deliveries, now)
    }

    /// Move focus along ascending tab index among enabled widgets that have
    /// one, wrapping around.
    pub fn focus_next(&mut self, reverse: bool, now: Instant) -> WidgetResult<()> {
        let mut ring: Vec<(i32, usize, WidgetId)> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let core = self.widgets.get(id)?.widget_core();
                let index = core.tab_index()?;
                core.is_enabled().then_some((index, i, *id))
            })
            .collect();
        if ring.is_empty() {
            return Ok(());
        }
        ring.sort();

        let current = self
            .router
            .focused()
            .and_then(|f| ring.iter().position(|(_, _, id)| *id == f));
        let next = match (current, reverse) {
            (None, false) => 0,
            (None, true) => ring.len() - 1,
            (Some(i), false) => (i + 1) % ring.len(),
            (Some(i), true) => (i + ring.len() - 1) % ring.len(),
        };
        self.focus(Some(ring[next].2), now)
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) -> WidgetResult<usize> {
        let due = self.timers.take_due(now);
        let fired = due.len();
        for (_, owner) in due {
            if self.widgets.contains_key(&owner) {
                self.deliver(
                    Delivery {
                        widget: owner,
                        notification: Notification::TimerElapsed,
                    },
                    now,
                )?;
            }
        }
        Ok(fired)
    }

    fn deliver_all(&mut self, deliveries: Vec<Delivery>, now: Instant) -> WidgetResult<()> {
        for delivery in deliveries {
            self.deliver(delivery, now)?;
        }
        Ok(())
    }

    fn deliver(&mut self, delivery: Delivery, now: Instant) -> WidgetResult<()> {
        let Container {
            scene,
            widgets,
            router,
            timers,
            config,
            ..
        } = self;
        let widget = widgets
            .get_mut(&delivery.widget)
            .ok_or(WidgetError::UnknownWidget(delivery.widget))?;
        let origin = widget
            .widget_core()
            .group()
            .and_then(|group| scene.world_offset(group))
            .unwrap_or_default();
        let mut cx = WidgetContext {
            scene,
            timers,
            config,
            now,
        };
        let outcome = widget.deliver(delivery.notification.localized(origin), &mut cx)?;
        router.sync_capture(delivery.widget, outcome.capture);
        Ok(())
    }
}
