//! Widget core: interaction states, event adapter and lifecycle.
//!
//! A concrete widget owns a [`WidgetCore`] and a [`Handlers`] table and
//! implements [`Widget`]:
//! - `build` creates its shapes and names its hit surfaces
//! - `layout` re-syncs size dependent geometry
//! - `paint` maps an [`InteractionState`] to visual attributes
//! - `activate` performs the domain mutation of a completed press
//! - `input` consumes continuous pointer data and key commands
//!
//! The lifecycle functions in [`lifecycle`] drive all of this. Widgets never
//! see raw input and never decide state transitions themselves.

mod adapter;
mod base;
mod events;
pub mod lifecycle;
mod paint;
mod state;

pub use adapter::{EventAdapter, Notification, TriggerEvent};
pub use base::{Lifecycle, Role, WidgetCore, WidgetId};
pub use events::{
    Callback, CheckedChangedArgs, EventArgs, EventKind, Handlers, SelectionChangedArgs,
    StateChangedArgs, ThumbDirection, ThumbMovedArgs, ValueChangedArgs, WidgetEvent,
};
pub use lifecycle::{DispatchOutcome, WidgetContext};
pub use paint::{Paint, PaintOp};
pub use state::{InteractionState, Transition, Trigger, next_state, transition};

use crate::error::WidgetResult;
use crate::scene::{GroupId, Scene};
use crate::shapes::ShapeId;
use kurbo::Point;
use std::any::Any;

/// A shape registered for input, tagged so the widget can tell which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitSurface {
    pub shape: ShapeId,
    pub tag: usize,
}

impl HitSurface {
    pub fn new(shape: ShapeId, tag: usize) -> Self {
        Self { shape, tag }
    }
}

/// Context of a completed press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    /// Tag of the pressed surface; `None` for keyboard activation.
    pub target: Option<usize>,
    /// Widget-local release position for pointer activation.
    pub position: Option<Point>,
    pub keyboard: bool,
}

/// Behavior a concrete widget plugs into the shared lifecycle.
pub trait Widget: Sized + 'static {
    fn core(&self) -> &WidgetCore;

    fn core_mut(&mut self) -> &mut WidgetCore;

    fn handlers_mut(&mut self) -> &mut Handlers<Self>;

    /// Create the widget's shapes inside `group` and return its hit surfaces.
    fn build(&mut self, scene: &mut Scene, group: GroupId) -> WidgetResult<Vec<HitSurface>>;

    /// Re-sync geometry that depends on properties.
    fn layout(&mut self, _scene: &mut Scene) -> WidgetResult<()> {
        Ok(())
    }

    /// Visual attributes for `state`. Must not change anything.
    fn paint(&self, state: InteractionState) -> Paint;

    /// Domain mutation for a completed press. Returns the events it implies.
    fn activate(&mut self, _activation: &Activation) -> Vec<WidgetEvent> {
        Vec::new()
    }

    /// Runs for every delivered trigger, whatever the transition.
    fn input(&mut self, _event: &TriggerEvent) -> Vec<WidgetEvent> {
        Vec::new()
    }
}

/// Raise `event` through the widget's subscriber for its kind.
pub fn emit<W: Widget>(widget: &mut W, event: WidgetEvent) {
    // Callbacks receive the widget by shared reference while the table is out.
    let mut handlers = std::mem::take(widget.handlers_mut());
    handlers.emit(&*widget, &event);
    *widget.handlers_mut() = handlers;
}

/// Object-safe view of a widget, used by the container.
pub trait DynWidget: Any {
    fn widget_core(&self) -> &WidgetCore;

    fn widget_core_mut(&mut self) -> &mut WidgetCore;

    fn render(&mut self, cx: &mut WidgetContext<'_>) -> WidgetResult<()>;

    fn update(&mut self, cx: &mut WidgetContext<'_>) -> WidgetResult<()>;

    fn deliver(
        &mut self,
        notification: Notification,
        cx: &mut WidgetContext<'_>,
    ) -> WidgetResult<DispatchOutcome>;

    fn destroy(&mut self, cx: &mut WidgetContext<'_>) -> WidgetResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<W: Widget> DynWidget for W {
    fn widget_core(&self) -> &WidgetCore {
        self.core()
    }

    fn widget_core_mut(&mut self) -> &mut WidgetCore {
        self.core_mut()
    }

    fn render(&mut self, cx: &mut WidgetContext<'_>) -> WidgetResult<()> {
        lifecycle::render(self, cx)
    }

    fn update(&mut self, cx: &mut WidgetContext<'_>) -> WidgetResult<()> {
        lifecycle::update(self, cx)
    }

    fn deliver(
        &mut self,
        notification: Notification,
        cx: &mut WidgetContext<'_>,
    ) -> WidgetResult<DispatchOutcome> {
        lifecycle::deliver(self, notification, cx)
    }

    fn destroy(&mut self, cx: &mut WidgetContext<'_>) -> WidgetResult<()> {
        lifecycle::destroy(self, cx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
