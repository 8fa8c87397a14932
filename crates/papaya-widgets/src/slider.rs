//! Horizontal slider over `[0, 100]`.

use crate::{add_hit_rect, circle_mut, dimmed, place_rect};
use kurbo::{Point, Size};
use papaya_core::shapes::{Circle, Rectangle};
use papaya_core::widget::{
    self, EventAdapter, EventArgs, Handlers, HitSurface, Paint, Role, TriggerEvent,
    ValueChangedArgs, WidgetCore, WidgetEvent,
};
use papaya_core::{
    GroupId, InteractionState, Key, Scene, SerializableColor, ShapeId, ShapeStyle, Trigger,
    Widget, WidgetResult,
};

const DEFAULT_WIDTH: f64 = 200.0;
const DEFAULT_HEIGHT: f64 = 30.0;
const THUMB_SIZE: f64 = 20.0;
const TRACK_HEIGHT: f64 = 6.0;
const DEFAULT_VALUE: f64 = 50.0;
pub const MIN_VALUE: f64 = 0.0;
pub const MAX_VALUE: f64 = 100.0;
const KEY_STEP: f64 = 1.0;

pub const TRACK: usize = 0;
pub const THUMB: usize = 1;

const TRACK_BASE: SerializableColor = SerializableColor::hex(0xE0E0E0);
const DEFAULT_TRACK_COLOR: SerializableColor = SerializableColor::hex(0xF58020);
const DEFAULT_THUMB_COLOR: SerializableColor = SerializableColor::hex(0xFFC87C);
const THUMB_STROKE: SerializableColor = SerializableColor::hex(0xF58020);
const THUMB_HOVER: SerializableColor = SerializableColor::hex(0xFFE4BD);
const THUMB_PRESSED: SerializableColor = SerializableColor::hex(0xFFA54D);
const PRESSED_ACCENT: SerializableColor = SerializableColor::hex(0xD66A00);

#[derive(Debug, Clone, Copy)]
struct Parts {
    track: ShapeId,
    active: ShapeId,
    hit: ShapeId,
    thumb: ShapeId,
}

/// A thumb dragged along a track, reporting an integer value in `[0, 100]`.
///
/// Pressing the track jumps the thumb to the pointer; pressing the thumb
/// keeps the offset between pointer and thumb centre while dragging.
pub struct Slider {
    core: WidgetCore,
    handlers: Handlers<Slider>,
    value: f64,
    track_color: SerializableColor,
    thumb_color: SerializableColor,
    grab_offset: f64,
    parts: Option<Parts>,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

impl Slider {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(Role::Slider, Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT))
                .with_adapter(EventAdapter::new().with_drag(true)),
            handlers: Handlers::new(),
            value: DEFAULT_VALUE,
            track_color: DEFAULT_TRACK_COLOR,
            thumb_color: DEFAULT_THUMB_COLOR,
            grab_offset: 0.0,
            parts: None,
        }
    }

    /// Initial value, rounded and clamped; raises no event.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = normalize(value);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.set_width(width);
        self
    }

    pub fn with_track_color(mut self, color: SerializableColor) -> Self {
        self.set_track_color(color);
        self
    }

    pub fn with_thumb_color(mut self, color: SerializableColor) -> Self {
        self.set_thumb_color(color);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value, rounded and clamped, raising `ValueChanged` if it
    /// changed.
    pub fn set_value(&mut self, value: f64) {
        if let Some(event) = self.apply_value(value) {
            widget::emit(self, event);
        }
    }

    pub fn width(&self) -> f64 {
        self.core.size().width
    }

    pub fn set_width(&mut self, width: f64) {
        let height = self.core.size().height;
        self.core.set_size(Size::new(width.max(1.0), height));
    }

    pub fn track_color(&self) -> SerializableColor {
        self.track_color
    }

    pub fn set_track_color(&mut self, color: SerializableColor) {
        self.track_color = color;
        self.core.mark_dirty();
    }

    pub fn thumb_color(&self) -> SerializableColor {
        self.thumb_color
    }

    pub fn set_thumb_color(&mut self, color: SerializableColor) {
        self.thumb_color = color;
        self.core.mark_dirty();
    }

    pub fn on_value_change(&mut self, f: impl FnMut(&Slider, &ValueChangedArgs) + 'static) {
        self.handlers.on_value_change(f);
    }

    pub fn on_click(&mut self, f: impl FnMut(&Slider, &EventArgs) + 'static) {
        self.handlers.on_click(f);
    }

    fn apply_value(&mut self, value: f64) -> Option<WidgetEvent> {
        let previous = self.value;
        let value = normalize(value);
        if (value - previous).abs() < f64::EPSILON {
            return None;
        }
        self.value = value;
        self.core.mark_dirty();
        Some(WidgetEvent::ValueChanged(ValueChangedArgs::new(
            self.core.id(),
            previous,
            value,
        )))
    }

    /// Thumb centre along the track.
    fn thumb_x(&self) -> f64 {
        self.value / MAX_VALUE * self.width()
    }

    fn value_at(&self, x: f64) -> f64 {
        x.clamp(0.0, self.width()) / self.width() * MAX_VALUE
    }
}

fn normalize(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_VALUE;
    }
    value.round().clamp(MIN_VALUE, MAX_VALUE)
}

impl Widget for Slider {
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
        let track_top = size.height / 2.0 - TRACK_HEIGHT / 2.0;
        let track = scene.add_shape(
            group,
            Rectangle::new(Point::new(0.0, track_top), size.width, TRACK_HEIGHT)
                .with_corner_radius(TRACK_HEIGHT / 2.0),
        )?;
        let active = scene.add_shape(
            group,
            Rectangle::new(Point::new(0.0, track_top), self.thumb_x(), TRACK_HEIGHT)
                .with_corner_radius(TRACK_HEIGHT / 2.0),
        )?;
        // Below the thumb so the thumb wins hit tests where they overlap.
        let hit = add_hit_rect(scene, group, Point::ZERO, size)?;
        let thumb = scene.add_shape(
            group,
            Circle::new(Point::new(self.thumb_x(), size.height / 2.0), THUMB_SIZE / 2.0),
        )?;
        self.parts = Some(Parts {
            track,
            active,
            hit,
            thumb,
        });
        Ok(vec![HitSurface::new(hit, TRACK), HitSurface::new(thumb, THUMB)])
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let Some(parts) = self.parts else {
            return Ok(());
        };
        let size = self.core.size();
        let track_top = size.height / 2.0 - TRACK_HEIGHT / 2.0;
        place_rect(
            scene,
            parts.track,
            Point::new(0.0, track_top),
            Size::new(size.width, TRACK_HEIGHT),
        )?;
        place_rect(
            scene,
            parts.active,
            Point::new(0.0, track_top),
            Size::new(self.thumb_x(), TRACK_HEIGHT),
        )?;
        place_rect(scene, parts.hit, Point::ZERO, size)?;
        circle_mut(scene, parts.thumb)?.center = Point::new(self.thumb_x(), size.height / 2.0);
        Ok(())
    }

    fn paint(&self, state: InteractionState) -> Paint {
        use InteractionState::*;
        let Some(parts) = self.parts else {
            return Paint::new();
        };
        let enabled = self.core.is_enabled();
        let (thumb_fill, thumb_stroke, active) = match state {
            Pressed | HoverPressed | Dragging | KeyActivated => {
                (THUMB_PRESSED, PRESSED_ACCENT, PRESSED_ACCENT)
            }
            Hovered => (THUMB_HOVER, THUMB_STROKE, self.track_color),
            IdleFocused => (self.thumb_color, PRESSED_ACCENT, self.track_color),
            IdleUnfocused | PressedOutside => (self.thumb_color, THUMB_STROKE, self.track_color),
        };
        Paint::new()
            .style(parts.track, dimmed(ShapeStyle::filled(TRACK_BASE), enabled))
            .style(parts.active, dimmed(ShapeStyle::filled(active), enabled))
            .style(parts.hit, ShapeStyle::invisible())
            .style(
                parts.thumb,
                dimmed(ShapeStyle::filled(thumb_fill).with_stroke(thumb_stroke, 2.0), enabled),
            )
    }

    fn input(&mut self, event: &TriggerEvent) -> Vec<WidgetEvent> {
        let target = match (&event.trigger, event.position) {
            (Trigger::PointerDown, Some(position)) => {
                if event.target == Some(THUMB) {
                    self.grab_offset = position.x - self.thumb_x();
                    return Vec::new();
                }
                self.grab_offset = 0.0;
                self.value_at(position.x)
            }
            (Trigger::PointerMove, Some(position)) => self.value_at(position.x - self.grab_offset),
            (Trigger::KeyDown(Key::ArrowRight | Key::ArrowUp), _) => self.value + KEY_STEP,
            (Trigger::KeyDown(Key::ArrowLeft | Key::ArrowDown), _) => self.value - KEY_STEP,
            (Trigger::KeyDown(Key::Home), _) => MIN_VALUE,
            (Trigger::KeyDown(Key::End), _) => MAX_VALUE,
            _ => return Vec::new(),
        };
        self.apply_value(target).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetExt;
    use crate::testing::{container, hover, press, release};
    use papaya_core::{Container, Instant, KeyEvent, WidgetHandle};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(c: &mut Container, handle: WidgetHandle<Slider>) -> Rc<RefCell<Vec<(f64, f64)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        c.modify(handle, |slider| {
            slider.on_value_change(move |_, args| {
                l.borrow_mut().push((args.previous_value(), args.current_value()))
            })
        })
        .unwrap();
        log
    }

    fn value(c: &Container, handle: WidgetHandle<Slider>) -> f64 {
        c.get(handle).unwrap().value()
    }

    #[test]
    fn test_defaults() {
        let slider = Slider::new();
        assert!((slider.value() - 50.0).abs() < f64::EPSILON);
        assert!((slider.width() - 200.0).abs() < f64::EPSILON);
        assert_eq!(slider.track_color(), SerializableColor::hex(0xF58020));
        assert_eq!(slider.thumb_color(), SerializableColor::hex(0xFFC87C));
        assert!(slider.core().adapter().is_drag_enabled());
    }

    #[test]
    fn test_value_is_rounded_and_clamped() {
        let mut slider = Slider::new();
        slider.set_value(40.6);
        assert!((slider.value() - 41.0).abs() < f64::EPSILON);
        slider.set_value(120.0);
        assert!((slider.value() - 100.0).abs() < f64::EPSILON);
        slider.set_value(-3.0);
        assert!(slider.value().abs() < f64::EPSILON);
    }

    #[test]
    fn test_events_carry_true_previous_value() {
        let mut c = container();
        let handle = c.add(Slider::new()).unwrap();
        let log = record(&mut c, handle);
        c.modify(handle, |slider| {
            slider.set_value(40.0);
            slider.set_value(40.2);
            slider.set_value(70.0);
        })
        .unwrap();
        assert_eq!(*log.borrow(), vec![(50.0, 40.0), (40.0, 70.0)]);
    }

    #[test]
    fn test_press_on_track_jumps() {
        let mut c = container();
        let handle = c.add(Slider::new().at(30.0, 500.0)).unwrap();
        let log = record(&mut c, handle);

        hover(&mut c, 80.0, 515.0);
        press(&mut c, 80.0, 515.0);
        assert!((value(&c, handle) - 25.0).abs() < f64::EPSILON);
        release(&mut c, 80.0, 515.0);
        assert_eq!(*log.borrow(), vec![(50.0, 25.0)]);
        assert_eq!(c.get(handle).unwrap().core().state(), InteractionState::Hovered);
    }

    #[test]
    fn test_thumb_drag_keeps_grab_offset() {
        let mut c = container();
        let handle = c.add(Slider::new().with_value(40.0)).unwrap();
        let log = record(&mut c, handle);

        // Thumb centre is at x = 80; grab it 3 px right of centre.
        hover(&mut c, 83.0, 15.0);
        press(&mut c, 83.0, 15.0);
        assert!(log.borrow().is_empty());
        hover(&mut c, 123.0, 15.0);
        assert_eq!(c.get(handle).unwrap().core().state(), InteractionState::Dragging);
        assert!((value(&c, handle) - 60.0).abs() < f64::EPSILON);

        // Capture keeps the drag alive far away from the widget.
        hover(&mut c, 500.0, 300.0);
        assert!((value(&c, handle) - 100.0).abs() < f64::EPSILON);
        release(&mut c, 500.0, 300.0);
        assert_eq!(c.get(handle).unwrap().core().state(), InteractionState::IdleUnfocused);
        assert_eq!(*log.borrow(), vec![(40.0, 60.0), (60.0, 100.0)]);
        assert_eq!(c.router().captured(), None);
    }

    #[test]
    fn test_drag_does_not_click() {
        let mut c = container();
        let handle = c.add(Slider::new()).unwrap();
        let clicks = Rc::new(RefCell::new(0));
        let k = clicks.clone();
        c.modify(handle, |slider| slider.on_click(move |_, _| *k.borrow_mut() += 1))
            .unwrap();

        hover(&mut c, 100.0, 15.0);
        press(&mut c, 100.0, 15.0);
        hover(&mut c, 140.0, 15.0);
        release(&mut c, 140.0, 15.0);
        assert_eq!(*clicks.borrow(), 0);
        assert_eq!(c.get(handle).unwrap().core().state(), InteractionState::Hovered);
    }

    #[test]
    fn test_thumb_follows_value_and_width() {
        let mut c = container();
        let handle = c.add(Slider::new()).unwrap();
        c.modify(handle, |slider| {
            slider.set_width(300.0);
            slider.set_value(10.0);
        })
        .unwrap();
        let parts = c.get(handle).unwrap().parts.unwrap();
        let thumb = c.scene().bbox(parts.thumb).unwrap();
        assert!((thumb.center().x - 30.0).abs() < f64::EPSILON);
        let track = c.scene().bbox(parts.track).unwrap();
        assert!((track.width() - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_arrow_keys_step() {
        let mut c = container();
        let handle = c.add(Slider::new().with_tab_index(1)).unwrap();
        let now = Instant::now();
        c.focus(Some(handle.id()), now).unwrap();
        for _ in 0..3 {
            c.handle_key_event(KeyEvent::Pressed(Key::ArrowRight), now).unwrap();
            c.handle_key_event(KeyEvent::Released(Key::ArrowRight), now).unwrap();
        }
        c.handle_key_event(KeyEvent::Pressed(Key::ArrowLeft), now).unwrap();
        assert!((value(&c, handle) - 52.0).abs() < f64::EPSILON);
        c.handle_key_event(KeyEvent::Pressed(Key::End), now).unwrap();
        assert!((value(&c, handle) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_colors_are_painted() {
        let mut c = container();
        let handle = c
            .add(Slider::new().with_thumb_color(SerializableColor::hex(0x123456)))
            .unwrap();
        let thumb = c.get(handle).unwrap().parts.unwrap().thumb;
        assert_eq!(
            c.scene().shape(thumb).unwrap().style().fill_color,
            Some(SerializableColor::hex(0x123456))
        );
    }
}
