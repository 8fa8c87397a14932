//! Labelled checkbox.

use crate::{add_hit_rect, dimmed, place_rect, sync_text, text_mut, theme};
use kurbo::{Point, Size};
use papaya_core::shapes::{Line, Rectangle, StrokeStyle, Text};
use papaya_core::widget::{
    self, Activation, CheckedChangedArgs, EventArgs, Handlers, HitSurface, Paint, Role,
    WidgetCore, WidgetEvent,
};
use papaya_core::{
    GroupId, InteractionState, Scene, SerializableColor, ShapeId, ShapeStyle, Widget,
    WidgetResult,
};

const BOX_SIZE: f64 = 16.0;
const SPACING: f64 = 8.0;
const DEFAULT_FONT_SIZE: f64 = 14.0;
const DEFAULT_LABEL: &str = "Checkbox";
const CHECK_WIDTH: f64 = 2.0;

const PAPAYA: SerializableColor = SerializableColor::hex(0xFF6A13);
const PAPAYA_LIGHT: SerializableColor = SerializableColor::hex(0xFF8C3D);
const PAPAYA_DARK: SerializableColor = SerializableColor::hex(0xD4570D);
const PAPAYA_DEEP: SerializableColor = SerializableColor::hex(0xB2430B);

#[derive(Debug, Clone, Copy)]
struct Parts {
    frame: ShapeId,
    check: [ShapeId; 2],
    label: ShapeId,
    hit: ShapeId,
}

/// A square toggle followed by a text label.
pub struct CheckBox {
    core: WidgetCore,
    handlers: Handlers<CheckBox>,
    label: String,
    font_size: f64,
    checked: bool,
    parts: Option<Parts>,
}

impl Default for CheckBox {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckBox {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(Role::Checkbox, Size::new(BOX_SIZE, BOX_SIZE)),
            handlers: Handlers::new(),
            label: DEFAULT_LABEL.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            checked: false,
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

    /// Initial checked flag; raises no event.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
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

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Set the checked flag, raising `CheckedChanged` if it changed.
    pub fn set_checked(&mut self, checked: bool) {
        if let Some(event) = self.apply_checked(checked) {
            widget::emit(self, event);
        }
    }

    pub fn toggle(&mut self) {
        self.set_checked(!self.checked);
    }

    pub fn on_checked_change(&mut self, f: impl FnMut(&CheckBox, &CheckedChangedArgs) + 'static) {
        self.handlers.on_checked_change(f);
    }

    pub fn on_click(&mut self, f: impl FnMut(&CheckBox, &EventArgs) + 'static) {
        self.handlers.on_click(f);
    }

    fn apply_checked(&mut self, checked: bool) -> Option<WidgetEvent> {
        let previous = self.checked;
        if previous == checked {
            return None;
        }
        self.checked = checked;
        self.core.mark_dirty();
        log::debug!("Checkbox {} checked: {}", self.core.id(), checked);
        Some(WidgetEvent::CheckedChanged(CheckedChangedArgs::new(
            self.core.id(),
            previous,
            checked,
        )))
    }

    /// Box fill, box stroke, check color, label color and dash for a state.
    fn palette(
        state: InteractionState,
    ) -> (SerializableColor, SerializableColor, SerializableColor, SerializableColor, StrokeStyle) {
        use InteractionState::*;
        let white = SerializableColor::white();
        match state {
            IdleUnfocused | PressedOutside => (PAPAYA, PAPAYA_DARK, white, PAPAYA, StrokeStyle::Solid),
            IdleFocused => (PAPAYA_LIGHT, PAPAYA_DARK, white, theme::TEXT, StrokeStyle::Solid),
            Pressed | KeyActivated => (PAPAYA_DARK, PAPAYA_DEEP, white, theme::TEXT, StrokeStyle::Solid),
            Hovered => (PAPAYA_LIGHT, PAPAYA_DEEP, PAPAYA, PAPAYA, StrokeStyle::Solid),
            HoverPressed => (PAPAYA, PAPAYA_DEEP, white, PAPAYA, StrokeStyle::Solid),
            Dragging => (PAPAYA_LIGHT, PAPAYA_DARK, PAPAYA, PAPAYA, StrokeStyle::Dotted),
        }
    }
}

impl Widget for CheckBox {
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
        let frame = scene.add_shape(
            group,
            Rectangle::new(Point::ZERO, BOX_SIZE, BOX_SIZE).with_corner_radius(2.0),
        )?;
        let check = [
            scene.add_shape(group, Line::new(Point::new(4.0, 8.0), Point::new(7.0, 11.0)))?,
            scene.add_shape(group, Line::new(Point::new(7.0, 11.0), Point::new(12.0, 5.0)))?,
        ];
        let label = scene.add_shape(
            group,
            Text::new(Point::new(BOX_SIZE + SPACING, 0.0), self.label.clone())
                .with_font_size(self.font_size),
        )?;
        let hit = add_hit_rect(scene, group, Point::ZERO, self.core.size())?;
        self.parts = Some(Parts {
            frame,
            check,
            label,
            hit,
        });
        Ok(vec![HitSurface::new(hit, 0)])
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let Some(parts) = self.parts else {
            return Ok(());
        };
        let text_size = sync_text(scene, parts.label, &self.label, self.font_size)?;
        // Label centred on the box's vertical centre.
        let y = BOX_SIZE / 2.0 - text_size.height / 2.0;
        text_mut(scene, parts.label)?.position = Point::new(BOX_SIZE + SPACING, y);

        let size = Size::new(
            BOX_SIZE + SPACING + text_size.width,
            BOX_SIZE.max(self.font_size),
        );
        place_rect(scene, parts.hit, Point::ZERO, size)?;
        self.core.set_size(size);
        Ok(())
    }

    fn paint(&self, state: InteractionState) -> Paint {
        let Some(parts) = self.parts else {
            return Paint::new();
        };
        let enabled = self.core.is_enabled();
        let (fill, stroke, check, text, dash) = Self::palette(state);
        let frame = ShapeStyle::filled(fill)
            .with_stroke(stroke, 1.0)
            .with_stroke_style(dash);
        let mark = ShapeStyle::default()
            .with_stroke(check, CHECK_WIDTH)
            .with_opacity(if self.checked { 1.0 } else { 0.0 });

        let mut paint = Paint::new().style(parts.frame, dimmed(frame, enabled));
        for line in parts.check {
            paint = paint.style(line, dimmed(mark.clone(), enabled));
        }
        paint
            .style(parts.label, dimmed(ShapeStyle::filled(text), enabled))
            .style(parts.hit, ShapeStyle::invisible())
    }

    fn activate(&mut self, _activation: &Activation) -> Vec<WidgetEvent> {
        let checked = !self.checked;
        self.apply_checked(checked).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetExt;
    use crate::testing::{click, container, tap_key};
    use papaya_core::{Duration, EventKind, Instant, Key};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(c: &mut papaya_core::Container, handle: papaya_core::WidgetHandle<CheckBox>) -> Rc<RefCell<Vec<(bool, bool)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        c.modify(handle, |cb| {
            cb.on_checked_change(move |_, args| l.borrow_mut().push((args.previous(), args.is_checked())))
        })
        .unwrap();
        log
    }

    #[test]
    fn test_defaults() {
        let checkbox = CheckBox::new();
        assert_eq!(checkbox.label(), "Checkbox");
        assert!(!checkbox.is_checked());
        assert!((checkbox.font_size() - 14.0).abs() < f64::EPSILON);
        assert_eq!(checkbox.core().role(), Role::Checkbox);
    }

    #[test]
    fn test_two_activations_toggle_twice() {
        let mut c = container();
        let handle = c.add(CheckBox::new().at(30.0, 275.0)).unwrap();
        let log = record(&mut c, handle);

        click(&mut c, 35.0, 280.0);
        assert!(c.get(handle).unwrap().is_checked());
        click(&mut c, 35.0, 280.0);
        assert!(!c.get(handle).unwrap().is_checked());
        assert_eq!(*log.borrow(), vec![(false, true), (true, false)]);
    }

    #[test]
    fn test_setter_raises_only_on_change() {
        let mut c = container();
        let handle = c.add(CheckBox::new()).unwrap();
        let log = record(&mut c, handle);

        c.modify(handle, |cb| cb.set_checked(false)).unwrap();
        assert!(log.borrow().is_empty());
        c.modify(handle, |cb| cb.set_checked(true)).unwrap();
        c.modify(handle, |cb| cb.set_checked(true)).unwrap();
        c.modify(handle, |cb| cb.toggle()).unwrap();
        assert_eq!(*log.borrow(), vec![(false, true), (true, false)]);
    }

    #[test]
    fn test_checked_event_precedes_click() {
        let mut c = container();
        let handle = c.add(CheckBox::new()).unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));
        let o = order.clone();
        let p = order.clone();
        c.modify(handle, |cb| {
            cb.on_checked_change(move |sender, args| {
                // Subscribers see the settled value.
                assert_eq!(sender.is_checked(), args.is_checked());
                o.borrow_mut().push(EventKind::CheckedChanged);
            });
            cb.on_click(move |_, _| p.borrow_mut().push(EventKind::Click));
        })
        .unwrap();

        click(&mut c, 5.0, 5.0);
        assert_eq!(*order.borrow(), vec![EventKind::CheckedChanged, EventKind::Click]);
    }

    #[test]
    fn test_label_area_is_clickable() {
        let mut c = container();
        let handle = c
            .add(CheckBox::new().with_label("Accept Terms").with_font_size(14.0))
            .unwrap();
        let width = c.get(handle).unwrap().core().size().width;
        assert!(width > BOX_SIZE + SPACING);

        click(&mut c, width - 2.0, 8.0);
        assert!(c.get(handle).unwrap().is_checked());
    }

    #[test]
    fn test_check_mark_follows_flag() {
        let mut c = container();
        let handle = c.add(CheckBox::new()).unwrap();
        let line = c.get(handle).unwrap().parts.unwrap().check[0];
        let opacity = |c: &papaya_core::Container| c.scene().shape(line).unwrap().style().opacity;

        assert!(opacity(&c) < f64::EPSILON);
        c.modify(handle, |cb| cb.set_checked(true)).unwrap();
        assert!((opacity(&c) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_keyboard_toggle() {
        let mut c = container();
        let handle = c.add(CheckBox::new().with_tab_index(3)).unwrap();
        let start = Instant::now();
        c.focus(Some(handle.id()), start).unwrap();
        tap_key(&mut c, Key::Enter, start);
        assert!(!c.get(handle).unwrap().is_checked());
        c.tick(start + Duration::from_millis(100)).unwrap();
        assert!(c.get(handle).unwrap().is_checked());
    }
}
