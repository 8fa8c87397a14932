//! State shared by every widget.

use super::adapter::EventAdapter;
use super::state::InteractionState;
use crate::error::{WidgetError, WidgetResult};
use crate::scene::GroupId;
use crate::timer::TimerId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for widgets.
pub type WidgetId = Uuid;

/// Where a widget is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Rendered,
    Destroyed,
}

/// Accessibility role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    Button,
    Checkbox,
    RadioGroup,
    ProgressBar,
    Slider,
    ScrollBar,
    Heading,
}

/// Identity, geometry, flags and interaction state of one widget.
#[derive(Debug, Clone)]
pub struct WidgetCore {
    id: WidgetId,
    position: Point,
    size: Size,
    enabled: bool,
    selectable: bool,
    role: Role,
    tab_index: Option<i32>,
    state: InteractionState,
    previous_state: InteractionState,
    lifecycle: Lifecycle,
    group: Option<GroupId>,
    adapter: EventAdapter,
    pending_pulse: Option<TimerId>,
    dirty: bool,
    needs_rebuild: bool,
    interrupted: bool,
}

impl WidgetCore {
    pub fn new(role: Role, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            size,
            enabled: true,
            selectable: false,
            role,
            tab_index: None,
            state: InteractionState::IdleUnfocused,
            previous_state: InteractionState::IdleUnfocused,
            lifecycle: Lifecycle::Constructed,
            group: None,
            adapter: EventAdapter::new(),
            pending_pulse: None,
            dirty: false,
            needs_rebuild: false,
            interrupted: false,
        }
    }

    pub fn with_adapter(mut self, adapter: EventAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Top-left corner in container coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Move the widget's top-left corner.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let position = Point::new(x, y);
        if position != self.position {
            self.position = position;
            self.dirty = true;
        }
    }

    pub fn set_size(&mut self, size: Size) {
        let size = Size::new(size.width.max(0.0), size.height.max(0.0));
        if size != self.size {
            self.size = size;
            self.dirty = true;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling abandons any press or pending keyboard pulse; re-enabling
    /// starts over from `IdleUnfocused`.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            self.enabled = enabled;
            self.interrupted |= !enabled;
            self.dirty = true;
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Position in keyboard focus order; `None` keeps the widget out of it.
    pub fn tab_index(&self) -> Option<i32> {
        self.tab_index
    }

    pub fn set_tab_index(&mut self, tab_index: Option<i32>) {
        self.tab_index = tab_index;
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn previous_state(&self) -> InteractionState {
        self.previous_state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_rendered(&self) -> bool {
        self.lifecycle == Lifecycle::Rendered
    }

    /// Shape group holding the widget's visuals, once rendered.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn adapter(&self) -> &EventAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut EventAdapter {
        &mut self.adapter
    }

    pub fn has_pending_pulse(&self) -> bool {
        self.pending_pulse.is_some()
    }

    /// Ask for `update()` to re-run layout and paint.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Ask for `update()` to rebuild every shape and hit surface.
    pub fn request_rebuild(&mut self) {
        self.needs_rebuild = true;
        self.dirty = true;
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    /// The widget's group, failing unless the widget is rendered and alive.
    pub fn ensure_live(&self) -> WidgetResult<GroupId> {
        match (self.lifecycle, self.group) {
            (Lifecycle::Rendered, Some(group)) => Ok(group),
            (Lifecycle::Destroyed, _) => Err(WidgetError::Destroyed(self.id)),
            _ => Err(WidgetError::NotRendered(self.id)),
        }
    }

    pub(crate) fn set_state(&mut self, next: InteractionState) {
        self.previous_state = self.state;
        self.state = next;
    }

    pub(crate) fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    pub(crate) fn replace_pending_pulse(&mut self, timer: Option<TimerId>) -> Option<TimerId> {
        std::mem::replace(&mut self.pending_pulse, timer)
    }

    pub(crate) fn take_interrupted(&mut self) -> bool {
        std::mem::take(&mut self.interrupted)
    }

    pub(crate) fn finish_update(&mut self) {
        self.dirty = false;
        self.needs_rebuild = false;
    }
}
