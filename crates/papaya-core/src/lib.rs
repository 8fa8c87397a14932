//! Papaya Core Library
//!
//! Platform-agnostic core of the Papaya widget toolkit: the shape scene that
//! widgets draw into, the input model, the interaction state machine shared by
//! every widget and the container that routes input to them.

pub mod config;
pub mod container;
pub mod error;
pub mod input;
pub mod router;
pub mod scene;
pub mod shapes;
pub mod timer;
pub mod widget;

pub use config::InteractionConfig;
pub use container::{Container, WidgetHandle};
pub use error::{WidgetError, WidgetResult};
pub use input::{InputState, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use router::InputRouter;
pub use scene::{GroupId, Hit, InputSurface, ListenerHandle, Scene, SceneError};
pub use shapes::{Shape, ShapeId, ShapeStyle, SerializableColor, parse_hex_color};
pub use timer::{TimerId, TimerQueue};
pub use widget::{
    DynWidget, EventKind, Handlers, HitSurface, InteractionState, Paint, Role, Trigger,
    Widget, WidgetCore, WidgetEvent, WidgetId,
};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};
