//! Display-only text.

use crate::{dimmed, sync_text, theme};
use kurbo::{Point, Size};
use papaya_core::shapes::{FontWeight, Text};
use papaya_core::widget::{Handlers, HitSurface, Paint, Role, WidgetCore};
use papaya_core::{
    GroupId, InteractionState, Scene, SerializableColor, ShapeId, ShapeStyle, Widget,
    WidgetResult,
};

const DEFAULT_FONT_SIZE: f64 = 16.0;

/// A line of text. Headings never register hit surfaces, so pointer input
/// passes through them; they can still hold keyboard focus when given a tab
/// index.
pub struct Heading {
    core: WidgetCore,
    handlers: Handlers<Heading>,
    text: String,
    font_size: f64,
    color: SerializableColor,
    bold: bool,
    label: Option<ShapeId>,
}

impl Default for Heading {
    fn default() -> Self {
        Self::new("")
    }
}

impl Heading {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            core: WidgetCore::new(Role::Heading, Size::ZERO),
            handlers: Handlers::new(),
            text: text.into(),
            font_size: DEFAULT_FONT_SIZE,
            color: theme::TEXT_DARK,
            bold: false,
            label: None,
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.set_font_size(size);
        self
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self.core.request_rebuild();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.core.mark_dirty();
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size.max(1.0);
        self.core.mark_dirty();
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.color = color;
        self.core.mark_dirty();
    }
}

impl Widget for Heading {
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
        let mut text = Text::new(Point::ZERO, self.text.clone()).with_font_size(self.font_size);
        if self.bold {
            text = text.with_font_weight(FontWeight::Bold);
        }
        self.label = Some(scene.add_shape(group, text)?);
        Ok(Vec::new())
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let Some(label) = self.label else {
            return Ok(());
        };
        let size = sync_text(scene, label, &self.text, self.font_size)?;
        self.core.set_size(size);
        Ok(())
    }

    fn paint(&self, _state: InteractionState) -> Paint {
        let Some(label) = self.label else {
            return Paint::new();
        };
        Paint::new().style(
            label,
            dimmed(ShapeStyle::filled(self.color), self.core.is_enabled()),
        )
    }
}
