//! Error types for widget lifecycle faults.

use crate::scene::SceneError;
use crate::widget::WidgetId;
use thiserror::Error;

/// Structural misuse of a widget or container.
///
/// Invalid trigger sequences and out-of-range property values never show up
/// here: the former are absorbed by the state machine, the latter clamped.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("widget {0} has not been rendered")]
    NotRendered(WidgetId),
    #[error("widget {0} has already been rendered")]
    AlreadyRendered(WidgetId),
    #[error("widget {0} has been destroyed")]
    Destroyed(WidgetId),
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),
    #[error("widget {0} is not of the requested type")]
    TypeMismatch(WidgetId),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
