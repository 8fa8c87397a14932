//! Routes device input to widgets: hover tracking, pointer capture and
//! keyboard focus.

use crate::input::{KeyEvent, PointerEvent};
use crate::scene::Scene;
use crate::widget::{Notification, WidgetId};

/// A notification addressed to one widget, positions in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub widget: WidgetId,
    pub notification: Notification,
}

impl Delivery {
    fn new(widget: WidgetId, notification: Notification) -> Self {
        Self {
            widget,
            notification,
        }
    }
}

/// Decides which widget receives each device event.
///
/// While a widget holds capture, pointer events go to it alone and only its
/// own surfaces count as "inside".
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    hover: Option<(WidgetId, usize)>,
    capture: Option<WidgetId>,
    focus: Option<WidgetId>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget under the pointer.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hover.map(|(widget, _)| widget)
    }

    pub fn captured(&self) -> Option<WidgetId> {
        self.capture
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Record whether `widget` holds capture after its last dispatch.
    pub fn sync_capture(&mut self, widget: WidgetId, held: bool) {
        if held {
            if self.capture != Some(widget) {
                log::debug!("Widget {} captured the pointer", widget);
            }
            self.capture = Some(widget);
        } else if self.capture == Some(widget) {
            log::debug!("Widget {} released the pointer", widget);
            self.capture = None;
        }
    }

    /// Notifications produced by one pointer event.
    pub fn route_pointer(&mut self, event: &PointerEvent, scene: &Scene) -> Vec<Delivery> {
        let Some(position) = event.position() else {
            // Pointer left the host surface.
            return self
                .hover
                .take()
                .map(|(widget, tag)| vec![Delivery::new(widget, Notification::Out { tag })])
                .unwrap_or_default();
        };

        let hit = scene.hit_test(position).map(|hit| (hit.owner, hit.tag));
        let hit = match self.capture {
            Some(captor) => hit.filter(|(owner, _)| *owner == captor),
            None => hit,
        };
        let mut out = self.update_hover(hit);

        match event {
            PointerEvent::Move { .. } => {
                if let Some(captor) = self.capture {
                    out.push(Delivery::new(captor, Notification::Move { position }));
                }
            }
            PointerEvent::Down { button, .. } => {
                if let Some((widget, tag)) = hit {
                    out.push(Delivery::new(
                        widget,
                        Notification::Down {
                            tag,
                            position,
                            button: *button,
                        },
                    ));
                }
            }
            PointerEvent::Up { button, .. } => {
                let target = self.capture.or(hit.map(|(widget, _)| widget));
                if let Some(widget) = target {
                    out.push(Delivery::new(
                        widget,
                        Notification::Up {
                            tag: hit.map(|(_, tag)| tag),
                            position,
                            inside: hit.is_some(),
                            button: *button,
                        },
                    ));
                }
            }
            PointerEvent::Leave => {}
        }
        out
    }

    fn update_hover(&mut self, hit: Option<(WidgetId, usize)>) -> Vec<Delivery> {
        if self.hover == hit {
            return Vec::new();
        }
        let mut out = Vec::new();
        match (self.hover, hit) {
            (Some((old, _)), Some((new, tag))) if old == new => {
                out.push(Delivery::new(new, Notification::Over { tag }));
            }
            (old, new) => {
                if let Some((widget, tag)) = old {
                    out.push(Delivery::new(widget, Notification::Out { tag }));
                }
                if let Some((widget, tag)) = new {
                    out.push(Delivery::new(widget, Notification::Over { tag }));
                }
            }
        }
        self.hover = hit;
        out
    }

    /// Keys go to the focused widget only.
    pub fn route_key(&self, event: &KeyEvent) -> Option<Delivery> {
        let widget = self.focus?;
        let notification = match event {
            KeyEvent::Pressed(key) => Notification::KeyDown(key.clone()),
            KeyEvent::Released(key) => Notification::KeyUp(key.clone()),
        };
        Some(Delivery::new(widget, notification))
    }

    /// Move keyboard focus, producing blur and focus notifications.
    pub fn set_focus(&mut self, widget: Option<WidgetId>) -> Vec<Delivery> {
        if self.focus == widget {
            return Vec::new();
        }
        let mut out = Vec::new();
        if let Some(old) = self.focus.take() {
            out.push(Delivery::new(old, Notification::Blur));
        }
        if let Some(new) = widget {
            out.push(Delivery::new(new, Notification::Focus));
        }
        self.focus = widget;
        out
    }

    /// Drop every reference to a removed widget.
    pub fn forget(&mut self, widget: WidgetId) {
        if self.hovered() == Some(widget) {
            self.hover = None;
        }
        if self.capture == Some(widget) {
            self.capture = None;
        }
        if self.focus == Some(widget) {
            self.focus = None;
        }
    }
}
