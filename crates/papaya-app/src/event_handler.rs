//! Translation of winit window events into container input.

use kurbo::Point;
use papaya_core::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Tracks the pointer between winit events, which only carry a position on
/// motion.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Last pointer position in logical pixels.
    pointer_position: Point,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_position(&self) -> Point {
        self.pointer_position
    }

    /// Record a cursor motion. Container coordinates are logical pixels.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) -> PointerEvent {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        self.pointer_position = Point::new(position.x / scale, position.y / scale);
        PointerEvent::Move {
            position: self.pointer_position,
        }
    }

    /// A button press or release at the last known position. Buttons the
    /// toolkit does not know are dropped.
    pub fn mouse_input(&self, state: ElementState, button: WinitButton) -> Option<PointerEvent> {
        let button = translate_button(button)?;
        let position = self.pointer_position;
        Some(match state {
            ElementState::Pressed => PointerEvent::Down { position, button },
            ElementState::Released => PointerEvent::Up { position, button },
        })
    }
}

pub fn translate_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn translate_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::Enter) => Key::Enter,
        WinitKey::Named(NamedKey::Space) => Key::Space,
        WinitKey::Named(NamedKey::Tab) => Key::Tab,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Named(NamedKey::ArrowUp) => Key::ArrowUp,
        WinitKey::Named(NamedKey::ArrowDown) => Key::ArrowDown,
        WinitKey::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
        WinitKey::Named(NamedKey::ArrowRight) => Key::ArrowRight,
        WinitKey::Named(NamedKey::Home) => Key::Home,
        WinitKey::Named(NamedKey::End) => Key::End,
        // Some platforms report the space bar as a character.
        WinitKey::Character(s) if s.as_str() == " " => Key::Space,
        WinitKey::Character(s) => Key::Character(s.to_string()),
        _ => Key::Other,
    }
}

pub fn translate_key_event(state: ElementState, key: &WinitKey) -> KeyEvent {
    let key = translate_key(key);
    match state {
        ElementState::Pressed => KeyEvent::Pressed(key),
        ElementState::Released => KeyEvent::Released(key),
    }
}

pub fn translate_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}
