//! Application error type.

use papaya_core::WidgetError;
use papaya_render::RendererError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("widget error: {0}")]
    Widget(#[from] WidgetError),
    #[error("renderer error: {0}")]
    Render(#[from] RendererError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type AppResult<T> = Result<T, AppError>;
