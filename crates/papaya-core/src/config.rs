//! Tunables for pointer and keyboard interaction.

use crate::Duration;

/// Interaction tunables shared by every widget in a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Distance in pixels the pointer must travel while pressed before the
    /// press turns into a drag.
    pub drag_threshold: f64,
    /// How long a keyboard activation stays visibly pressed before the
    /// activate event fires.
    pub key_pulse: Duration,
}

impl InteractionConfig {
    /// Default drag threshold in pixels.
    pub const DEFAULT_DRAG_THRESHOLD: f64 = 3.0;
    /// Default keyboard pulse in milliseconds.
    pub const DEFAULT_KEY_PULSE_MS: u64 = 100;

    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold.max(0.0);
        self
    }

    pub fn with_key_pulse(mut self, pulse: Duration) -> Self {
        self.key_pulse = pulse;
        self
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: Self::DEFAULT_DRAG_THRESHOLD,
            key_pulse: Duration::from_millis(Self::DEFAULT_KEY_PULSE_MS),
        }
    }
}
