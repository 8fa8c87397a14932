//! Papaya Render Library
//!
//! Renderer abstraction for the widget scene. The default implementation
//! draws through Vello and lays out text with Parley.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
