//! Progress bar showing a clamped percentage.

use crate::{add_hit_rect, dimmed, place_rect, sync_text, text_mut, theme};
use kurbo::{Point, Size};
use papaya_core::shapes::{FontWeight, Rectangle, StrokeStyle, Text};
use papaya_core::widget::{
    self, Activation, EventArgs, Handlers, HitSurface, Paint, Role, StateChangedArgs,
    TriggerEvent, ValueChangedArgs, WidgetCore, WidgetEvent,
};
use papaya_core::{
    GroupId, InteractionState, Key, Scene, SerializableColor, ShapeId, ShapeStyle, Trigger,
    Widget, WidgetResult,
};

const DEFAULT_WIDTH: f64 = 200.0;
const DEFAULT_HEIGHT: f64 = 20.0;
const CORNER_RADIUS: f64 = 4.0;
const TEXT_SIZE: f64 = 12.0;
pub const MIN_VALUE: f64 = 0.0;
pub const MAX_VALUE: f64 = 100.0;
pub const DEFAULT_INCREMENT: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Parts {
    background: ShapeId,
    fill: ShapeId,
    text: ShapeId,
    hit: ShapeId,
}

/// A horizontal bar filled to `value` percent.
///
/// Activating the bar (click or Enter/Space) adds one increment.
pub struct ProgressBar {
    core: WidgetCore,
    handlers: Handlers<ProgressBar>,
    value: f64,
    increment_value: f64,
    show_percentage: bool,
    parts: Option<Parts>,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(Role::ProgressBar, Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)),
            handlers: Handlers::new(),
            value: MIN_VALUE,
            increment_value: DEFAULT_INCREMENT,
            show_percentage: true,
            parts: None,
        }
    }

    /// Initial value, clamped; raises no event.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = clamp_value(value);
        self
    }

    pub fn with_increment_value(mut self, step: f64) -> Self {
        self.increment_value = step;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.core.set_size(Size::new(width, height));
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value clamped to `[0, 100]`, raising `ValueChanged` if the
    /// stored value changed.
    pub fn set_value(&mut self, value: f64) {
        if let Some(event) = self.apply_value(value) {
            widget::emit(self, event);
        }
    }

    pub fn set_progress(&mut self, percentage: f64) {
        self.set_value(percentage);
    }

    pub fn increment(&mut self) {
        self.increment_by(self.increment_value);
    }

    pub fn increment_by(&mut self, amount: f64) {
        self.set_value(self.value + amount);
    }

    pub fn reset(&mut self) {
        self.set_value(MIN_VALUE);
    }

    pub fn increment_value(&self) -> f64 {
        self.increment_value
    }

    pub fn set_increment_value(&mut self, step: f64) {
        self.increment_value = step;
    }

    pub fn show_percentage(&self) -> bool {
        self.show_percentage
    }

    pub fn set_show_percentage(&mut self, show: bool) {
        self.show_percentage = show;
        self.core.mark_dirty();
    }

    pub fn width(&self) -> f64 {
        self.core.size().width
    }

    pub fn set_width(&mut self, width: f64) {
        let height = self.core.size().height;
        self.core.set_size(Size::new(width, height));
    }

    pub fn on_value_change(&mut self, f: impl FnMut(&ProgressBar, &ValueChangedArgs) + 'static) {
        self.handlers.on_value_change(f);
    }

    pub fn on_state_change(&mut self, f: impl FnMut(&ProgressBar, &StateChangedArgs) + 'static) {
        self.handlers.on_state_change(f);
    }

    pub fn on_click(&mut self, f: impl FnMut(&ProgressBar, &EventArgs) + 'static) {
        self.handlers.on_click(f);
    }

    fn apply_value(&mut self, value: f64) -> Option<WidgetEvent> {
        let previous = self.value;
        let value = clamp_value(value);
        if (value - previous).abs() < f64::EPSILON {
            return None;
        }
        self.value = value;
        self.core.mark_dirty();
        log::debug!("Progress bar {}: {}% -> {}%", self.core.id(), previous, value);
        Some(WidgetEvent::ValueChanged(ValueChangedArgs::new(
            self.core.id(),
            previous,
            value,
        )))
    }

    fn fill_width(&self) -> f64 {
        self.value / MAX_VALUE * self.core.size().width
    }

    /// Background fill, background stroke, bar fill, dash and bar opacity.
    fn palette(
        state: InteractionState,
    ) -> (SerializableColor, SerializableColor, SerializableColor, StrokeStyle, f64) {
        use InteractionState::*;
        let cream = SerializableColor::hex(0xFFF4E0);
        let border = SerializableColor::hex(0xFFD699);
        let border_strong = SerializableColor::hex(0xFFB84D);
        let bar = SerializableColor::hex(0xFFAB5B);
        let bar_dark = SerializableColor::hex(0xFF8C00);
        match state {
            IdleUnfocused | PressedOutside => (cream, border, bar, StrokeStyle::Solid, 1.0),
            IdleFocused => (SerializableColor::hex(0xFFE5B4), border, bar_dark, StrokeStyle::Solid, 1.0),
            Pressed | HoverPressed | KeyActivated => {
                (border, border_strong, bar_dark, StrokeStyle::Solid, 1.0)
            }
            Hovered => (
                SerializableColor::hex(0xFFEDCC),
                border_strong,
                SerializableColor::hex(0xFF9E4F),
                StrokeStyle::Solid,
                1.0,
            ),
            Dragging => (cream, border_strong, bar, StrokeStyle::Dashed, 0.8),
        }
    }
}

fn clamp_value(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_VALUE;
    }
    value.clamp(MIN_VALUE, MAX_VALUE)
}

impl Widget for ProgressBar {
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
        let size = self.core.size();
        let background = scene.add_shape(
            group,
            Rectangle::new(Point::ZERO, size.width, size.height).with_corner_radius(CORNER_RADIUS),
        )?;
        let fill = scene.add_shape(
            group,
            Rectangle::new(Point::ZERO, self.fill_width(), size.height)
                .with_corner_radius(CORNER_RADIUS),
        )?;
        let text = scene.add_shape(
            group,
            Text::new(Point::ZERO, format!("{}%", self.value))
                .with_font_size(TEXT_SIZE)
                .with_font_weight(FontWeight::Bold),
        )?;
        let hit = add_hit_rect(scene, group, Point::ZERO, size)?;
        self.parts = Some(Parts {
            background,
            fill,
            text,
            hit,
        });
        Ok(vec![HitSurface::new(hit, 0)])
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let Some(parts) = self.parts else {
            return Ok(());
        };
        let size = self.core.size();
        place_rect(scene, parts.background, Point::ZERO, size)?;
        place_rect(
            scene,
            parts.fill,
            Point::ZERO,
            Size::new(self.fill_width(), size.height),
        )?;
        place_rect(scene, parts.hit, Point::ZERO, size)?;

        let text_size = sync_text(scene, parts.text, &format!("{}%", self.value), TEXT_SIZE)?;
        text_mut(scene, parts.text)?.position = Point::new(
            (size.width - text_size.width) / 2.0,
            (size.height - text_size.height) / 2.0,
        );
        Ok(())
    }

    fn paint(&self, state: InteractionState) -> Paint {
        let Some(parts) = self.parts else {
            return Paint::new();
        };
        let enabled = self.core.is_enabled();
        let (background, border, bar, dash, bar_opacity) = Self::palette(state);
        let text = ShapeStyle::filled(theme::TEXT_DARK)
            .with_opacity(if self.show_percentage { 1.0 } else { 0.0 });
        Paint::new()
            .style(
                parts.background,
                dimmed(
                    ShapeStyle::filled(background)
                        .with_stroke(border, 1.0)
                        .with_stroke_style(dash),
                    enabled,
                ),
            )
            .style(
                parts.fill,
                dimmed(ShapeStyle::filled(bar).with_opacity(bar_opacity), enabled),
            )
            .style(parts.text, dimmed(text, enabled))
            .style(parts.hit, ShapeStyle::invisible())
    }

    fn activate(&mut self, _activation: &Activation) -> Vec<WidgetEvent> {
        let target = self.value + self.increment_value;
        self.apply_value(target).into_iter().collect()
    }

    fn input(&mut self, event: &TriggerEvent) -> Vec<WidgetEvent> {
        let target = match &event.trigger {
            Trigger::KeyDown(Key::ArrowRight) => self.value + self.increment_value,
            Trigger::KeyDown(Key::ArrowLeft) => self.value - self.increment_value,
            Trigger::KeyDown(Key::Home) => MIN_VALUE,
            Trigger::KeyDown(Key::End) => MAX_VALUE,
            _ => return Vec::new(),
        };
        self.apply_value(target).into_iter().collect()
    }
}
