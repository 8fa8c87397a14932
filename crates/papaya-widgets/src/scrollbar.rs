//! Vertical scroll bar with step buttons.

use crate::{dimmed, place_rect, theme};
use kurbo::{Point, Size};
use papaya_core::shapes::Rectangle;
use papaya_core::widget::{
    self, Activation, EventAdapter, EventArgs, Handlers, HitSurface, Paint, Role, ThumbDirection,
    ThumbMovedArgs, TriggerEvent, WidgetCore, WidgetEvent,
};
use papaya_core::{
    GroupId, InteractionState, Key, Scene, SerializableColor, ShapeId, ShapeStyle, Trigger,
    Widget, WidgetResult,
};

const BAR_WIDTH: f64 = 20.0;
const BUTTON_HEIGHT: f64 = 20.0;
const THUMB_HEIGHT: f64 = 30.0;
const DEFAULT_HEIGHT: f64 = 150.0;
const DEFAULT_STEP: f64 = 10.0;

pub const UP: usize = 0;
pub const DOWN: usize = 1;
pub const TRACK: usize = 2;
pub const THUMB: usize = 3;

const TRACK_FILL: SerializableColor = SerializableColor::hex(0xFFE0A3);
const BUTTON_HOVER: SerializableColor = SerializableColor::hex(0xE8762A);
const BUTTON_PRESSED: SerializableColor = SerializableColor::hex(0xB34E00);
const THUMB_FILL: SerializableColor = SerializableColor::hex(0xFFB347);
const THUMB_HOVER: SerializableColor = SerializableColor::hex(0xFFC266);
const THUMB_ACTIVE: SerializableColor = SerializableColor::hex(0xFF9E4F);

#[derive(Debug, Clone, Copy)]
struct Parts {
    track: ShapeId,
    up: ShapeId,
    down: ShapeId,
    thumb: ShapeId,
}

/// A track between an up and a down button, with a draggable thumb.
///
/// The thumb position is the distance in pixels from the top of the track,
/// within `[0, scrollbar_height - thumb height]`.
pub struct ScrollBar {
    core: WidgetCore,
    handlers: Handlers<ScrollBar>,
    scrollbar_height: f64,
    thumb_position: f64,
    step: f64,
    grab_offset: f64,
    parts: Option<Parts>,
}

impl Default for ScrollBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollBar {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(Role::ScrollBar, Self::outer_size(DEFAULT_HEIGHT))
                .with_adapter(EventAdapter::new().with_drag(true)),
            handlers: Handlers::new(),
            scrollbar_height: DEFAULT_HEIGHT,
            thumb_position: 0.0,
            step: DEFAULT_STEP,
            grab_offset: 0.0,
            parts: None,
        }
    }

    pub fn with_scrollbar_height(mut self, height: f64) -> Self {
        self.set_scrollbar_height(height);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.abs();
        self
    }

    pub fn scrollbar_height(&self) -> f64 {
        self.scrollbar_height
    }

    /// Resize the track. The thumb is pulled back inside it without raising
    /// an event.
    pub fn set_scrollbar_height(&mut self, height: f64) {
        self.scrollbar_height = height.max(THUMB_HEIGHT);
        self.thumb_position = self.thumb_position.min(self.max_position());
        self.core.set_size(Self::outer_size(self.scrollbar_height));
        self.core.mark_dirty();
    }

    pub fn thumb_position(&self) -> f64 {
        self.thumb_position
    }

    /// Move the thumb, clamped to the track, raising `ThumbMoved` with
    /// `Jump` if it moved.
    pub fn set_thumb_position(&mut self, position: f64) {
        if let Some(event) = self.move_thumb(position, ThumbDirection::Jump) {
            widget::emit(self, event);
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn scroll_up(&mut self) {
        if let Some(event) = self.move_thumb(self.thumb_position - self.step, ThumbDirection::Up) {
            widget::emit(self, event);
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(event) = self.move_thumb(self.thumb_position + self.step, ThumbDirection::Down)
        {
            widget::emit(self, event);
        }
    }

    pub fn max_position(&self) -> f64 {
        (self.scrollbar_height - THUMB_HEIGHT).max(0.0)
    }

    pub fn on_thumb_move(&mut self, f: impl FnMut(&ScrollBar, &ThumbMovedArgs) + 'static) {
        self.handlers.on_thumb_move(f);
    }

    pub fn on_click(&mut self, f: impl FnMut(&ScrollBar, &EventArgs) + 'static) {
        self.handlers.on_click(f);
    }

    fn outer_size(track_height: f64) -> Size {
        Size::new(BAR_WIDTH, track_height + BUTTON_HEIGHT * 2.0)
    }

    fn move_thumb(&mut self, position: f64, direction: ThumbDirection) -> Option<WidgetEvent> {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, self.max_position())
        };
        if (position - self.thumb_position).abs() < f64::EPSILON {
            return None;
        }
        self.thumb_position = position;
        self.core.mark_dirty();
        log::debug!(
            "Scroll bar {} thumb moved {:?} to {}",
            self.core.id(),
            direction,
            position
        );
        Some(WidgetEvent::ThumbMoved(ThumbMovedArgs::new(
            self.core.id(),
            direction,
            position,
        )))
    }

    fn thumb_top(&self) -> f64 {
        BUTTON_HEIGHT + self.thumb_position
    }
}

impl Widget for ScrollBar {
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
        let track = scene.add_shape(
            group,
            Rectangle::new(Point::new(0.0, BUTTON_HEIGHT), BAR_WIDTH, self.scrollbar_height),
        )?;
        let up = scene.add_shape(group, Rectangle::new(Point::ZERO, BAR_WIDTH, BUTTON_HEIGHT))?;
        let down = scene.add_shape(
            group,
            Rectangle::new(
                Point::new(0.0, BUTTON_HEIGHT + self.scrollbar_height),
                BAR_WIDTH,
                BUTTON_HEIGHT,
            ),
        )?;
        let thumb = scene.add_shape(
            group,
            Rectangle::new(Point::new(0.0, self.thumb_top()), BAR_WIDTH, THUMB_HEIGHT),
        )?;
        self.parts = Some(Parts {
            track,
            up,
            down,
            thumb,
        });
        Ok(vec![
            HitSurface::new(up, UP),
            HitSurface::new(down, DOWN),
            HitSurface::new(track, TRACK),
            HitSurface::new(thumb, THUMB),
        ])
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let Some(parts) = self.parts else {
            return Ok(());
        };
        place_rect(
            scene,
            parts.track,
            Point::new(0.0, BUTTON_HEIGHT),
            Size::new(BAR_WIDTH, self.scrollbar_height),
        )?;
        place_rect(
            scene,
            parts.down,
            Point::new(0.0, BUTTON_HEIGHT + self.scrollbar_height),
            Size::new(BAR_WIDTH, BUTTON_HEIGHT),
        )?;
        place_rect(
            scene,
            parts.thumb,
            Point::new(0.0, self.thumb_top()),
            Size::new(BAR_WIDTH, THUMB_HEIGHT),
        )?;
        Ok(())
    }

    fn paint(&self, state: InteractionState) -> Paint {
        let Some(parts) = self.parts else {
            return Paint::new();
        };
        let enabled = self.core.is_enabled();
        let adapter = self.core.adapter();
        let pressed = if state.is_pressed() || state.shows_pressed() {
            adapter.active_item()
        } else {
            None
        };
        let hovered = match state {
            InteractionState::Hovered => adapter.hot(),
            _ => None,
        };
        let button = |tag: usize| {
            let fill = if pressed == Some(tag) {
                BUTTON_PRESSED
            } else if hovered == Some(tag) {
                BUTTON_HOVER
            } else {
                theme::ACCENT_DEEP
            };
            dimmed(ShapeStyle::filled(fill), enabled)
        };
        let thumb_fill = if pressed == Some(THUMB) {
            THUMB_ACTIVE
        } else if hovered == Some(THUMB) {
            THUMB_HOVER
        } else {
            THUMB_FILL
        };
        let mut thumb = ShapeStyle::filled(thumb_fill);
        if state == InteractionState::IdleFocused {
            thumb = thumb.with_stroke(theme::ACCENT_DEEP, 1.5);
        }

        Paint::new()
            .style(parts.track, dimmed(ShapeStyle::filled(TRACK_FILL), enabled))
            .style(parts.up, button(UP))
            .style(parts.down, button(DOWN))
            .style(parts.thumb, dimmed(thumb, enabled))
    }

    fn activate(&mut self, activation: &Activation) -> Vec<WidgetEvent> {
        let event = match (activation.target, activation.position) {
            (Some(UP), _) => self.move_thumb(self.thumb_position - self.step, ThumbDirection::Up),
            (Some(DOWN), _) => {
                self.move_thumb(self.thumb_position + self.step, ThumbDirection::Down)
            }
            (Some(TRACK), Some(position)) => {
                self.move_thumb(position.y - BUTTON_HEIGHT, ThumbDirection::Jump)
            }
            _ => None,
        };
        event.into_iter().collect()
    }

    fn input(&mut self, event: &TriggerEvent) -> Vec<WidgetEvent> {
        let moved = match (&event.trigger, event.target, event.position) {
            (Trigger::PointerDown, Some(THUMB), Some(position)) => {
                self.grab_offset = position.y - self.thumb_top();
                None
            }
            (Trigger::PointerMove, Some(THUMB), Some(position)) => self.move_thumb(
                position.y - BUTTON_HEIGHT - self.grab_offset,
                ThumbDirection::Drag,
            ),
            (Trigger::KeyDown(Key::ArrowUp), _, _) => {
                self.move_thumb(self.thumb_position - self.step, ThumbDirection::Up)
            }
            (Trigger::KeyDown(Key::ArrowDown), _, _) => {
                self.move_thumb(self.thumb_position + self.step, ThumbDirection::Down)
            }
            (Trigger::KeyDown(Key::Home), _, _) => self.move_thumb(0.0, ThumbDirection::Jump),
            (Trigger::KeyDown(Key::End), _, _) => {
                self.move_thumb(self.max_position(), ThumbDirection::Jump)
            }
            _ => None,
        };
        moved.into_iter().collect()
    }
}
