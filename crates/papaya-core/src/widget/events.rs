//! Semantic events raised by widgets and the per-kind subscriber slots.

use super::WidgetId;
use super::state::InteractionState;

/// Base event payload: which widget raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventArgs {
    source: WidgetId,
}

impl EventArgs {
    pub fn new(source: WidgetId) -> Self {
        Self { source }
    }

    pub fn source(&self) -> WidgetId {
        self.source
    }
}

/// A numeric value changed (progress bar, slider).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueChangedArgs {
    source: WidgetId,
    previous_value: f64,
    current_value: f64,
}

impl ValueChangedArgs {
    pub fn new(source: WidgetId, previous_value: f64, current_value: f64) -> Self {
        Self {
            source,
            previous_value,
            current_value,
        }
    }

    pub fn source(&self) -> WidgetId {
        self.source
    }

    pub fn previous_value(&self) -> f64 {
        self.previous_value
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }
}

/// A checkbox flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedChangedArgs {
    source: WidgetId,
    previous: bool,
    is_checked: bool,
}

impl CheckedChangedArgs {
    pub fn new(source: WidgetId, previous: bool, is_checked: bool) -> Self {
        Self {
            source,
            previous,
            is_checked,
        }
    }

    pub fn source(&self) -> WidgetId {
        self.source
    }

    pub fn previous(&self) -> bool {
        self.previous
    }

    pub fn is_checked(&self) -> bool {
        self.is_checked
    }
}

/// A radio group selected a different item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChangedArgs {
    source: WidgetId,
    previous_index: usize,
    selected_index: usize,
    selected_label: String,
}

impl SelectionChangedArgs {
    pub fn new(
        source: WidgetId,
        previous_index: usize,
        selected_index: usize,
        selected_label: impl Into<String>,
    ) -> Self {
        Self {
            source,
            previous_index,
            selected_index,
            selected_label: selected_label.into(),
        }
    }

    pub fn source(&self) -> WidgetId {
        self.source
    }

    pub fn previous_index(&self) -> usize {
        self.previous_index
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_label(&self) -> &str {
        &self.selected_label
    }
}

/// How a scroll bar thumb got to its new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbDirection {
    Up,
    Down,
    Jump,
    Drag,
}

/// A scroll bar thumb moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbMovedArgs {
    source: WidgetId,
    direction: ThumbDirection,
    position: f64,
}

impl ThumbMovedArgs {
    pub fn new(source: WidgetId, direction: ThumbDirection, position: f64) -> Self {
        Self {
            source,
            direction,
            position,
        }
    }

    pub fn source(&self) -> WidgetId {
        self.source
    }

    pub fn direction(&self) -> ThumbDirection {
        self.direction
    }

    /// Thumb offset from the top of the track, in pixels.
    pub fn position(&self) -> f64 {
        self.position
    }
}

/// The interaction state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangedArgs {
    source: WidgetId,
    previous: InteractionState,
    current: InteractionState,
}

impl StateChangedArgs {
    pub fn new(source: WidgetId, previous: InteractionState, current: InteractionState) -> Self {
        Self {
            source,
            previous,
            current,
        }
    }

    pub fn source(&self) -> WidgetId {
        self.source
    }

    pub fn previous(&self) -> InteractionState {
        self.previous
    }

    pub fn current(&self) -> InteractionState {
        self.current
    }
}

/// Every semantic event a widget can raise.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    Click(EventArgs),
    ValueChanged(ValueChangedArgs),
    CheckedChanged(CheckedChangedArgs),
    SelectionChanged(SelectionChangedArgs),
    ThumbMoved(ThumbMovedArgs),
    StateChanged(StateChangedArgs),
}

/// Discriminant of [`WidgetEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    ValueChanged,
    CheckedChanged,
    SelectionChanged,
    ThumbMoved,
    StateChanged,
}

impl WidgetEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WidgetEvent::Click(_) => EventKind::Click,
            WidgetEvent::ValueChanged(_) => EventKind::ValueChanged,
            WidgetEvent::CheckedChanged(_) => EventKind::CheckedChanged,
            WidgetEvent::SelectionChanged(_) => EventKind::SelectionChanged,
            WidgetEvent::ThumbMoved(_) => EventKind::ThumbMoved,
            WidgetEvent::StateChanged(_) => EventKind::StateChanged,
        }
    }

    pub fn source(&self) -> WidgetId {
        match self {
            WidgetEvent::Click(args) => args.source(),
            WidgetEvent::ValueChanged(args) => args.source(),
            WidgetEvent::CheckedChanged(args) => args.source(),
            WidgetEvent::SelectionChanged(args) => args.source(),
            WidgetEvent::ThumbMoved(args) => args.source(),
            WidgetEvent::StateChanged(args) => args.source(),
        }
    }
}

/// Subscriber callback: receives the sender and the event payload.
pub type Callback<W, A> = Box<dyn FnMut(&W, &A)>;

/// One subscriber slot per event kind. Subscribing again replaces the
/// previous callback.
pub struct Handlers<W> {
    click: Option<Callback<W, EventArgs>>,
    value_changed: Option<Callback<W, ValueChangedArgs>>,
    checked_changed: Option<Callback<W, CheckedChangedArgs>>,
    selection_changed: Option<Callback<W, SelectionChangedArgs>>,
    thumb_moved: Option<Callback<W, ThumbMovedArgs>>,
    state_changed: Option<Callback<W, StateChangedArgs>>,
}

impl<W> Default for Handlers<W> {
    fn default() -> Self {
        Self {
            click: None,
            value_changed: None,
            checked_changed: None,
            selection_changed: None,
            thumb_moved: None,
            state_changed: None,
        }
    }
}

impl<W> std::fmt::Debug for Handlers<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("click", &self.click.is_some())
            .field("value_changed", &self.value_changed.is_some())
            .field("checked_changed", &self.checked_changed.is_some())
            .field("selection_changed", &self.selection_changed.is_some())
            .field("thumb_moved", &self.thumb_moved.is_some())
            .field("state_changed", &self.state_changed.is_some())
            .finish()
    }
}

impl<W> Handlers<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_click(&mut self, f: impl FnMut(&W, &EventArgs) + 'static) {
        self.click = Some(Box::new(f));
    }

    pub fn on_value_change(&mut self, f: impl FnMut(&W, &ValueChangedArgs) + 'static) {
        self.value_changed = Some(Box::new(f));
    }

    pub fn on_checked_change(&mut self, f: impl FnMut(&W, &CheckedChangedArgs) + 'static) {
        self.checked_changed = Some(Box::new(f));
    }

    pub fn on_selection_change(&mut self, f: impl FnMut(&W, &SelectionChangedArgs) + 'static) {
        self.selection_changed = Some(Box::new(f));
    }

    pub fn on_thumb_move(&mut self, f: impl FnMut(&W, &ThumbMovedArgs) + 'static) {
        self.thumb_moved = Some(Box::new(f));
    }

    pub fn on_state_change(&mut self, f: impl FnMut(&W, &StateChangedArgs) + 'static) {
        self.state_changed = Some(Box::new(f));
    }

    /// Whether a callback is installed for `kind`.
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Click => self.click.is_some(),
            EventKind::ValueChanged => self.value_changed.is_some(),
            EventKind::CheckedChanged => self.checked_changed.is_some(),
            EventKind::SelectionChanged => self.selection_changed.is_some(),
            EventKind::ThumbMoved => self.thumb_moved.is_some(),
            EventKind::StateChanged => self.state_changed.is_some(),
        }
    }

    /// Invoke the subscriber for the event's kind, if any.
    pub fn emit(&mut self, sender: &W, event: &WidgetEvent) {
        match event {
            WidgetEvent::Click(args) => {
                if let Some(f) = self.click.as_mut() {
                    f(sender, args);
                }
            }
            WidgetEvent::ValueChanged(args) => {
                if let Some(f) = self.value_changed.as_mut() {
                    f(sender, args);
                }
            }
            WidgetEvent::CheckedChanged(args) => {
                if let Some(f) = self.checked_changed.as_mut() {
                    f(sender, args);
                }
            }
            WidgetEvent::SelectionChanged(args) => {
                if let Some(f) = self.selection_changed.as_mut() {
                    f(sender, args);
                }
            }
            WidgetEvent::ThumbMoved(args) => {
                if let Some(f) = self.thumb_moved.as_mut() {
                    f(sender, args);
                }
            }
            WidgetEvent::StateChanged(args) => {
                if let Some(f) = self.state_changed.as_mut() {
                    f(sender, args);
                }
            }
        }
    }
}
