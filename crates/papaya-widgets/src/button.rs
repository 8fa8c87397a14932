//! Push button.

use crate::{add_hit_rect, dimmed, place_rect, sync_text, text_mut};
use kurbo::{Point, Size, Vec2};
use papaya_core::shapes::{Rectangle, StrokeStyle, Text};
use papaya_core::widget::{EventArgs, Handlers, HitSurface, Paint, Role, WidgetCore};
use papaya_core::{
    GroupId, InteractionState, Scene, SerializableColor, ShapeId, ShapeStyle, Widget,
    WidgetResult,
};

const DEFAULT_LABEL: &str = "Button";
const DEFAULT_FONT_SIZE: f64 = 18.0;
const DEFAULT_WIDTH: f64 = 80.0;
const DEFAULT_HEIGHT: f64 = 30.0;
const CORNER_RADIUS: f64 = 8.0;
const LABEL_INSET: f64 = 4.0;
/// Label nudge while the button shows pressed.
const PRESS_OFFSET: Vec2 = Vec2::new(1.0, 1.0);

#[derive(Debug, Clone, Copy)]
struct Parts {
    body: ShapeId,
    label: ShapeId,
    hit: ShapeId,
}

/// A rounded push button with a text label.
pub struct Button {
    core: WidgetCore,
    handlers: Handlers<Button>,
    label: String,
    font_size: f64,
    parts: Option<Parts>,
}

impl Default for Button {
    fn default() -> Self {
        Self::new()
    }
}

impl Button {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(Role::Button, Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)),
            handlers: Handlers::new(),
            label: DEFAULT_LABEL.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            parts: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(label);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.set_font_size(size);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.core.set_size(Size::new(width, height));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.core.mark_dirty();
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size.max(1.0);
        self.core.mark_dirty();
    }

    pub fn width(&self) -> f64 {
        self.core.size().width
    }

    pub fn set_width(&mut self, width: f64) {
        let height = self.core.size().height;
        self.core.set_size(Size::new(width, height));
    }

    pub fn height(&self) -> f64 {
        self.core.size().height
    }

    pub fn set_height(&mut self, height: f64) {
        let width = self.core.size().width;
        self.core.set_size(Size::new(width, height));
    }

    pub fn on_click(&mut self, f: impl FnMut(&Button, &EventArgs) + 'static) {
        self.handlers.on_click(f);
    }

    /// Body fill, body stroke, label color, dash and label offset for a state.
    fn palette(
        state: InteractionState,
    ) -> (SerializableColor, (SerializableColor, f64), SerializableColor, StrokeStyle, Vec2) {
        use InteractionState::*;
        let black = SerializableColor::black();
        let blue = SerializableColor::hex(0x4080FF);
        match state {
            IdleUnfocused => (
                SerializableColor::hex(0x3498DB),
                (SerializableColor::hex(0x2980B9), 2.0),
                SerializableColor::white(),
                StrokeStyle::Solid,
                Vec2::ZERO,
            ),
            IdleFocused => (
                SerializableColor::hex(0xE0E0E0),
                (black, 1.0),
                black,
                StrokeStyle::Solid,
                Vec2::ZERO,
            ),
            Hovered => (
                SerializableColor::hex(0xF8F8F8),
                (blue, 1.5),
                blue,
                StrokeStyle::Solid,
                Vec2::ZERO,
            ),
            Pressed | KeyActivated => (
                SerializableColor::hex(0xC0C0C0),
                (black, 1.5),
                black,
                StrokeStyle::Solid,
                PRESS_OFFSET,
            ),
            HoverPressed => (
                SerializableColor::hex(0xD0D0D0),
                (blue, 1.5),
                blue,
                StrokeStyle::Solid,
                PRESS_OFFSET,
            ),
            PressedOutside => (
                SerializableColor::hex(0xF0F0F0),
                (black, 1.0),
                black,
                StrokeStyle::Solid,
                Vec2::ZERO,
            ),
            Dragging => (
                SerializableColor::hex(0xE8E8E8),
                (black, 1.0),
                SerializableColor::hex(0x808080),
                StrokeStyle::Dashed,
                Vec2::ZERO,
            ),
        }
    }
}

impl Widget for Button {
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
        let body = scene.add_shape(
            group,
            Rectangle::new(Point::ZERO, size.width, size.height).with_corner_radius(CORNER_RADIUS),
        )?;
        let label = scene.add_shape(
            group,
            Text::new(Point::ZERO, self.label.clone()).with_font_size(self.font_size),
        )?;
        // Transparent cover so the label never steals input.
        let hit = add_hit_rect(scene, group, Point::ZERO, size)?;
        self.parts = Some(Parts { body, label, hit });
        Ok(vec![HitSurface::new(hit, 0)])
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let Some(parts) = self.parts else {
            return Ok(());
        };
        let size = self.core.size();
        place_rect(scene, parts.body, Point::ZERO, size)?;
        place_rect(scene, parts.hit, Point::ZERO, size)?;

        let text_size = sync_text(scene, parts.label, &self.label, self.font_size)?;
        let x = ((size.width - text_size.width) / 2.0).max(LABEL_INSET);
        let y = ((size.height - text_size.height) / 2.0).max(0.0);
        text_mut(scene, parts.label)?.position = Point::new(x, y);
        Ok(())
    }

    fn paint(&self, state: InteractionState) -> Paint {
        let Some(parts) = self.parts else {
            return Paint::new();
        };
        let enabled = self.core.is_enabled();
        let (fill, (stroke, width), text, dash, offset) = Self::palette(state);
        let body = ShapeStyle::filled(fill)
            .with_stroke(stroke, width)
            .with_stroke_style(dash);
        Paint::new()
            .style(parts.body, dimmed(body, enabled))
            .style_offset(parts.label, dimmed(ShapeStyle::filled(text), enabled), offset)
            .style(parts.hit, ShapeStyle::invisible())
    }
}
