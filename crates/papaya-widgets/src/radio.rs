//! Radio button group: exclusive selection over two or more items.

use crate::{add_hit_rect, circle_mut, dimmed, place_rect, sync_text, text_mut, theme};
use kurbo::{Point, Size};
use papaya_core::shapes::{Circle, StrokeStyle, Text};
use papaya_core::widget::{
    self, Activation, EventAdapter, EventArgs, Handlers, HitSurface, Paint, Role,
    SelectionChangedArgs, TriggerEvent, WidgetCore, WidgetEvent,
};
use papaya_core::{
    GroupId, InteractionState, Key, Scene, SerializableColor, ShapeId, ShapeStyle, Trigger,
    Widget, WidgetResult,
};

const RADIUS: f64 = 8.0;
const SPACING: f64 = 8.0;
const VERTICAL_GAP: f64 = 8.0;
const DEFAULT_FONT_SIZE: f64 = 14.0;
const MIN_ITEMS: usize = 2;
/// Distance between the tops of two consecutive items.
const PITCH: f64 = RADIUS * 2.0 + VERTICAL_GAP;

const RING_FILL: SerializableColor = SerializableColor::hex(0xFFD580);
const RING_STROKE: SerializableColor = SerializableColor::hex(0xFFB347);
const RING_HOVER: SerializableColor = SerializableColor::hex(0xFFE0A3);
const RING_PRESSED: SerializableColor = SerializableColor::hex(0xFFC266);
const RING_MOVE: SerializableColor = SerializableColor::hex(0xF4D5A6);
const MUTED: SerializableColor = SerializableColor::hex(0xD8CAB8);

fn default_label(index: usize) -> String {
    format!("Option {}", index + 1)
}

#[derive(Debug, Clone, Copy)]
struct ItemParts {
    ring: ShapeId,
    dot: ShapeId,
    label: ShapeId,
    hit: ShapeId,
}

/// A vertical list of mutually exclusive options.
///
/// Exactly one item is selected at any time. Each item has its own hit
/// surface, tagged with its index.
pub struct RadioGroup {
    core: WidgetCore,
    handlers: Handlers<RadioGroup>,
    labels: Vec<String>,
    selected: usize,
    font_size: f64,
    parts: Vec<ItemParts>,
}

impl Default for RadioGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioGroup {
    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(Role::RadioGroup, Size::ZERO)
                .with_adapter(EventAdapter::new().with_item_scope(true)),
            handlers: Handlers::new(),
            labels: (0..MIN_ITEMS).map(default_label).collect(),
            selected: 0,
            font_size: DEFAULT_FONT_SIZE,
            parts: Vec::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_labels(labels);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.set_font_size(size);
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rename items in order, adding items when given more labels than
    /// there are items. Extra existing items keep their labels.
    pub fn set_labels<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = labels.into_iter().map(Into::into).collect();
        while values.len() < MIN_ITEMS {
            values.push(default_label(values.len()));
        }
        let grows = values.len() > self.labels.len();
        for (i, value) in values.into_iter().enumerate() {
            match self.labels.get_mut(i) {
                Some(label) => *label = value,
                None => self.labels.push(value),
            }
        }
        if grows {
            self.core.request_rebuild();
        } else {
            self.core.mark_dirty();
        }
    }

    /// Rename one item. Returns false if `index` is out of range.
    pub fn set_label_at(&mut self, index: usize, label: impl Into<String>) -> bool {
        match self.labels.get_mut(index) {
            Some(slot) => {
                *slot = label.into();
                self.core.mark_dirty();
                true
            }
            None => {
                log::warn!("Radio group {} has no item {}", self.core.id(), index);
                false
            }
        }
    }

    pub fn item_count(&self) -> usize {
        self.labels.len()
    }

    /// Grow or shrink the item list, keeping at least two items and a valid
    /// selection.
    pub fn set_item_count(&mut self, count: usize) {
        let count = count.max(MIN_ITEMS);
        if count == self.labels.len() {
            return;
        }
        if count > self.labels.len() {
            let start = self.labels.len();
            self.labels.extend((start..count).map(default_label));
        } else {
            self.labels.truncate(count);
            if self.selected >= count {
                self.selected = 0;
            }
        }
        self.core.request_rebuild();
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> &str {
        self.labels.get(self.selected).map(String::as_str).unwrap_or_default()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        index == self.selected
    }

    /// Select an item, raising `SelectionChanged` if the selection moved.
    /// Returns false if `index` is out of range.
    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if index >= self.labels.len() {
            log::warn!("Radio group {} has no item {}", self.core.id(), index);
            return false;
        }
        if let Some(event) = self.select(index) {
            widget::emit(self, event);
        }
        true
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size.max(1.0);
        self.core.mark_dirty();
    }

    pub fn on_selection_change(
        &mut self,
        f: impl FnMut(&RadioGroup, &SelectionChangedArgs) + 'static,
    ) {
        self.handlers.on_selection_change(f);
    }

    pub fn on_click(&mut self, f: impl FnMut(&RadioGroup, &EventArgs) + 'static) {
        self.handlers.on_click(f);
    }

    fn select(&mut self, index: usize) -> Option<WidgetEvent> {
        let label = self.labels.get(index)?.clone();
        let previous = self.selected;
        if previous == index {
            return None;
        }
        self.selected = index;
        self.core.mark_dirty();
        log::debug!("Radio group {} selected {} ({})", self.core.id(), index, label);
        Some(WidgetEvent::SelectionChanged(SelectionChangedArgs::new(
            self.core.id(),
            previous,
            index,
            label,
        )))
    }

    fn item_top(index: usize) -> f64 {
        index as f64 * PITCH
    }
}

impl Widget for RadioGroup {
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
        self.parts.clear();
        let mut surfaces = Vec::with_capacity(self.labels.len());
        for (i, text) in self.labels.iter().enumerate() {
            let top = Self::item_top(i);
            let centre = Point::new(RADIUS, top + RADIUS);
            let ring = scene.add_shape(group, Circle::new(centre, RADIUS))?;
            let dot = scene.add_shape(group, Circle::new(centre, RADIUS / 2.0))?;
            let label = scene.add_shape(
                group,
                Text::new(Point::new(RADIUS * 2.0 + SPACING, top), text.clone())
                    .with_font_size(self.font_size),
            )?;
            let hit = add_hit_rect(
                scene,
                group,
                Point::new(0.0, top),
                Size::new(RADIUS * 2.0 + SPACING, RADIUS * 2.0),
            )?;
            self.parts.push(ItemParts {
                ring,
                dot,
                label,
                hit,
            });
            surfaces.push(HitSurface::new(hit, i));
        }
        Ok(surfaces)
    }

    fn layout(&mut self, scene: &mut Scene) -> WidgetResult<()> {
        let mut widest: f64 = 0.0;
        for (i, (parts, text)) in self.parts.iter().zip(&self.labels).enumerate() {
            let top = Self::item_top(i);
            let centre = Point::new(RADIUS, top + RADIUS);
            circle_mut(scene, parts.ring)?.center = centre;
            circle_mut(scene, parts.dot)?.center = centre;

            let text_size = sync_text(scene, parts.label, text, self.font_size)?;
            let y = top + (RADIUS * 2.0 - text_size.height) / 2.0;
            text_mut(scene, parts.label)?.position = Point::new(RADIUS * 2.0 + SPACING, y);

            let width = RADIUS * 2.0 + SPACING + text_size.width;
            place_rect(scene, parts.hit, Point::new(0.0, top), Size::new(width, RADIUS * 2.0))?;
            widest = widest.max(width);
        }
        let count = self.parts.len() as f64;
        self.core
            .set_size(Size::new(widest, (count * PITCH - VERTICAL_GAP).max(0.0)));
        Ok(())
    }

    fn paint(&self, state: InteractionState) -> Paint {
        let enabled = self.core.is_enabled();
        let adapter = self.core.adapter();
        let pressed_item = if state.shows_pressed() {
            adapter.active_item().or(Some(self.selected))
        } else {
            None
        };
        let hovered_item = match state {
            InteractionState::Hovered => adapter.hot(),
            _ => None,
        };

        let mut paint = Paint::new();
        for (i, parts) in self.parts.iter().enumerate() {
            let mut ring = ShapeStyle::filled(RING_FILL).with_stroke(RING_STROKE, 2.0);
            let mut text = theme::TEXT;
            if state == InteractionState::Dragging {
                ring = ShapeStyle::filled(RING_MOVE)
                    .with_stroke(MUTED, 2.0)
                    .with_stroke_style(StrokeStyle::Dotted);
                text = MUTED;
            } else if pressed_item == Some(i) {
                ring.fill_color = Some(RING_PRESSED);
            } else if hovered_item == Some(i) {
                ring.fill_color = Some(RING_HOVER);
                text = theme::ACCENT_DEEP;
            } else if state == InteractionState::IdleFocused && i == self.selected {
                ring.stroke_color = theme::ACCENT_DEEP;
            }

            let dot = ShapeStyle::filled(theme::ACCENT_DEEP)
                .with_opacity(if i == self.selected { 1.0 } else { 0.0 });
            paint.push(parts.ring, dimmed(ring, enabled), kurbo::Vec2::ZERO);
            paint.push(parts.dot, dimmed(dot, enabled), kurbo::Vec2::ZERO);
            paint.push(parts.label, dimmed(ShapeStyle::filled(text), enabled), kurbo::Vec2::ZERO);
            paint.push(parts.hit, ShapeStyle::invisible(), kurbo::Vec2::ZERO);
        }
        paint
    }

    fn activate(&mut self, activation: &Activation) -> Vec<WidgetEvent> {
        activation
            .target
            .and_then(|index| self.select(index))
            .into_iter()
            .collect()
    }

    fn input(&mut self, event: &TriggerEvent) -> Vec<WidgetEvent> {
        let Trigger::KeyDown(key) = &event.trigger else {
            return Vec::new();
        };
        let count = self.labels.len();
        let next = match key {
            Key::ArrowDown | Key::ArrowRight => (self.selected + 1) % count,
            Key::ArrowUp | Key::ArrowLeft => (self.selected + count - 1) % count,
            Key::Home => 0,
            Key::End => count - 1,
            _ => return Vec::new(),
        };
        self.select(next).into_iter().collect()
    }
}
