//! Concrete widgets built on the Papaya interaction core.
//!
//! - **Button**: labelled push button with a click event
//! - **CheckBox**: toggle with a checked-changed event
//! - **RadioGroup**: exclusive selection over two or more items
//! - **ProgressBar**: clamped percentage that steps on activation
//! - **Slider**: draggable value in `[0, 100]`
//! - **ScrollBar**: step buttons, track jump and thumb drag
//! - **Heading**: display-only text

pub mod button;
pub mod checkbox;
pub mod heading;
pub mod progress;
pub mod radio;
pub mod scrollbar;
pub mod slider;

pub use button::Button;
pub use checkbox::CheckBox;
pub use heading::Heading;
pub use progress::ProgressBar;
pub use radio::RadioGroup;
pub use scrollbar::ScrollBar;
pub use slider::Slider;

use kurbo::{Point, Size};
use papaya_core::shapes::{Circle, Rectangle, Text};
use papaya_core::{GroupId, Scene, SceneError, ShapeId, ShapeStyle, Widget, WidgetResult};

/// Standard colors shared across widgets.
pub mod theme {
    use papaya_core::SerializableColor;

    /// Dark brown label text.
    pub const TEXT: SerializableColor = SerializableColor::hex(0x4A2C1D);
    /// Neutral dark text.
    pub const TEXT_DARK: SerializableColor = SerializableColor::hex(0x333333);
    /// Papaya orange accent.
    pub const ACCENT: SerializableColor = SerializableColor::hex(0xF58020);
    /// Deep orange accent.
    pub const ACCENT_DEEP: SerializableColor = SerializableColor::hex(0xD95F00);
    /// Opacity applied to disabled widgets.
    pub const DISABLED_OPACITY: f64 = 0.5;
}

/// Placement and flag builders available on every widget.
pub trait WidgetExt: Widget {
    /// Place the widget's top-left corner.
    fn at(mut self, x: f64, y: f64) -> Self {
        self.core_mut().move_to(x, y);
        self
    }

    fn with_tab_index(mut self, index: i32) -> Self {
        self.core_mut().set_tab_index(Some(index));
        self
    }

    fn with_enabled(mut self, enabled: bool) -> Self {
        self.core_mut().set_enabled(enabled);
        self
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.core_mut().move_to(x, y);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.core_mut().set_enabled(enabled);
    }
}

impl<W: Widget> WidgetExt for W {}

/// Style adjusted for the widget's enabled flag.
pub(crate) fn dimmed(style: ShapeStyle, enabled: bool) -> ShapeStyle {
    if enabled {
        style
    } else {
        let opacity = style.opacity * theme::DISABLED_OPACITY;
        style.with_opacity(opacity)
    }
}

/// Invisible rectangle used purely as a hit surface.
pub(crate) fn add_hit_rect(
    scene: &mut Scene,
    group: GroupId,
    origin: Point,
    size: Size,
) -> WidgetResult<ShapeId> {
    let rect = Rectangle::new(origin, size.width, size.height).with_style(ShapeStyle::invisible());
    Ok(scene.add_shape(group, rect)?)
}

pub(crate) fn rect_mut(scene: &mut Scene, id: ShapeId) -> WidgetResult<&mut Rectangle> {
    Ok(scene
        .expect_shape_mut(id)?
        .as_rectangle_mut()
        .ok_or(SceneError::UnknownShape(id))?)
}

pub(crate) fn circle_mut(scene: &mut Scene, id: ShapeId) -> WidgetResult<&mut Circle> {
    Ok(scene
        .expect_shape_mut(id)?
        .as_circle_mut()
        .ok_or(SceneError::UnknownShape(id))?)
}

pub(crate) fn text_mut(scene: &mut Scene, id: ShapeId) -> WidgetResult<&mut Text> {
    Ok(scene
        .expect_shape_mut(id)?
        .as_text_mut()
        .ok_or(SceneError::UnknownShape(id))?)
}

/// Set a rectangle's origin and size in one go.
pub(crate) fn place_rect(
    scene: &mut Scene,
    id: ShapeId,
    origin: Point,
    size: Size,
) -> WidgetResult<()> {
    let rect = rect_mut(scene, id)?;
    rect.position = origin;
    rect.set_size(size);
    Ok(())
}

/// Sync a text shape's content and font size, returning its measured size.
pub(crate) fn sync_text(
    scene: &mut Scene,
    id: ShapeId,
    content: &str,
    font_size: f64,
) -> WidgetResult<Size> {
    let text = text_mut(scene, id)?;
    text.set_content(content);
    text.set_font_size(font_size);
    Ok(text.size())
}
