//! Interaction states and the transition table shared by every widget.

use crate::input::Key;
use serde::{Deserialize, Serialize};

/// The interaction state of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractionState {
    /// Pointer elsewhere, no keyboard focus.
    #[default]
    IdleUnfocused,
    /// Keyboard focus, pointer elsewhere.
    IdleFocused,
    /// Pointer over the widget, no button held.
    Hovered,
    /// Pressed by pointer or activation key.
    Pressed,
    /// Pressed, left, and came back while still held.
    HoverPressed,
    /// Pressed, then the pointer left the widget while held.
    PressedOutside,
    /// Pressed and moved past the drag threshold.
    Dragging,
    /// Activation key released; the visible pulse before activate fires.
    KeyActivated,
}

impl InteractionState {
    /// Every state, in declaration order.
    pub const ALL: [InteractionState; 8] = [
        InteractionState::IdleUnfocused,
        InteractionState::IdleFocused,
        InteractionState::Hovered,
        InteractionState::Pressed,
        InteractionState::HoverPressed,
        InteractionState::PressedOutside,
        InteractionState::Dragging,
        InteractionState::KeyActivated,
    ];

    /// States in which a button is held down.
    pub fn is_pressed(&self) -> bool {
        matches!(
            self,
            Self::Pressed | Self::HoverPressed | Self::PressedOutside | Self::Dragging
        )
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::IdleUnfocused | Self::IdleFocused)
    }

    /// States whose visuals show the widget pushed in.
    pub fn shows_pressed(&self) -> bool {
        matches!(self, Self::Pressed | Self::HoverPressed | Self::KeyActivated)
    }
}

/// Abstract input notification delivered to the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerUpInside,
    PointerUpOutside,
    /// Pointer moved past the drag threshold while pressed.
    PointerMove,
    FocusIn,
    FocusOut,
    KeyDown(Key),
    KeyUp(Key),
    /// The keyboard activation pulse has elapsed.
    PulseElapsed,
}

/// Outcome of feeding one trigger to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: InteractionState,
    /// The transition is a completed press: raise activate.
    pub activates: bool,
    /// Start the keyboard activation pulse timer.
    pub schedules_pulse: bool,
}

impl Transition {
    fn to(next: InteractionState) -> Self {
        Self {
            next,
            activates: false,
            schedules_pulse: false,
        }
    }

    fn activate(next: InteractionState) -> Self {
        Self {
            activates: true,
            ..Self::to(next)
        }
    }

    fn pulse(next: InteractionState) -> Self {
        Self {
            schedules_pulse: true,
            ..Self::to(next)
        }
    }
}

/// Next state for `trigger`. Pure and total.
pub fn next_state(current: InteractionState, trigger: &Trigger, enabled: bool) -> InteractionState {
    transition(current, trigger, enabled).next
}

/// Full transition for `trigger`, including side effects to perform.
///
/// Unhandled pairs map to the current state; a disabled widget never moves.
pub fn transition(current: InteractionState, trigger: &Trigger, enabled: bool) -> Transition {
    use InteractionState::*;

    if !enabled {
        return Transition::to(current);
    }

    match (current, trigger) {
        (IdleUnfocused | IdleFocused, Trigger::PointerEnter) => Transition::to(Hovered),
        (IdleUnfocused, Trigger::FocusIn) => Transition::to(IdleFocused),
        (IdleFocused, Trigger::FocusOut) => Transition::to(IdleUnfocused),
        (IdleUnfocused | IdleFocused | Hovered, Trigger::PointerDown) => Transition::to(Pressed),
        (IdleUnfocused | IdleFocused | Hovered, Trigger::KeyDown(key)) if key.is_activation() => {
            Transition::to(Pressed)
        }

        (Hovered, Trigger::PointerLeave) => Transition::to(IdleUnfocused),

        (Pressed | HoverPressed, Trigger::PointerUpInside) => Transition::activate(Hovered),
        (Pressed, Trigger::PointerUpOutside) => Transition::to(PressedOutside),
        (Pressed | HoverPressed | PressedOutside, Trigger::PointerMove) => Transition::to(Dragging),
        (Pressed | HoverPressed, Trigger::PointerLeave) => Transition::to(PressedOutside),
        (Pressed, Trigger::KeyUp(key)) if key.is_activation() => Transition::pulse(KeyActivated),
        (Pressed, Trigger::FocusOut) => Transition::to(IdleUnfocused),

        (HoverPressed, Trigger::PointerUpOutside) => Transition::to(IdleUnfocused),

        (PressedOutside, Trigger::PointerEnter) => Transition::to(HoverPressed),
        (PressedOutside, Trigger::PointerUpOutside) => Transition::to(IdleUnfocused),
        (PressedOutside, Trigger::PointerUpInside) => Transition::to(Hovered),

        (Dragging, Trigger::PointerUpInside) => Transition::to(Hovered),
        (Dragging, Trigger::PointerUpOutside) => Transition::to(IdleUnfocused),

        (KeyActivated, Trigger::PulseElapsed) => Transition::activate(IdleFocused),
        (KeyActivated, Trigger::FocusOut) => Transition::to(IdleUnfocused),

        _ => Transition::to(current),
    }
}
