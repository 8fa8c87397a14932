//! Papaya Application
//!
//! Window shell around the widget toolkit: opens a window, renders the demo
//! container through Vello and feeds it pointer, keyboard and timer input.

mod app;
mod demo;
mod error;
mod event_handler;

pub use app::{App, AppConfig};
pub use demo::Demo;
pub use error::{AppError, AppResult};
pub use event_handler::EventHandler;
