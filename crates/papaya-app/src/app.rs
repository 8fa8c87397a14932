//! Main application state and event loop.

use crate::demo::Demo;
use crate::error::{AppError, AppResult};
use crate::event_handler::{EventHandler, translate_key_event, translate_modifiers};
use papaya_core::{Container, Instant, PointerEvent, SerializableColor, WidgetResult};
use papaya_render::{RenderContext, Renderer, VelloRenderer};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Environment variable naming a JSON file with an [`AppConfig`].
pub const CONFIG_ENV: &str = "PAPAYA_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: SerializableColor,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Papaya".to_string(),
            width: 1280,
            height: 800,
            background_color: SerializableColor::white(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the file named by `PAPAYA_CONFIG`, or the defaults when unset.
    pub fn load() -> AppResult<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path).map_err(|source| {
                    AppError::ConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                let config = Self::from_json(&json)?;
                log::info!("Loaded config from {}", path);
                Ok(config)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn background(&self) -> Color {
        self.background_color.into()
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // Widgets
    container: Container,
    demo: Demo,
    event_handler: EventHandler,
    /// Text changed since the last measurement.
    needs_measure: bool,
}

impl AppState {
    /// Log a dispatch failure, then apply whatever the callbacks queued.
    fn settle(&mut self, result: WidgetResult<()>) {
        if let Err(e) = result {
            log::error!("Input dispatch failed: {}", e);
        }
        match self.demo.apply_pending(&mut self.container) {
            Ok(0) => {}
            Ok(_) => self.needs_measure = true,
            Err(e) => log::error!("Failed to apply demo updates: {}", e),
        }
        self.window.request_redraw();
    }

    fn logical_size(&self) -> (f64, f64) {
        let scale = self.window.scale_factor();
        (
            self.surface.config.width as f64 / scale,
            self.surface.config.height as f64 / scale,
        )
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application until its window closes.
    pub async fn run() -> AppResult<()> {
        let config = AppConfig::load()?;
        let event_loop = EventLoop::new()?;
        let mut app = App::with_config(config);
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    /// Finish initialization after the surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> AppResult<()> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| papaya_render::RendererError::InitFailed("no render context".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| papaya_render::RendererError::InitFailed(e.to_string()))?;

        // Vello renders to Rgba8Unorm, the surface may want another format.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let scale = window.scale_factor();
        let mut container = Container::new(
            surface.config.width as f64 / scale,
            surface.config.height as f64 / scale,
        );
        let demo = Demo::build(&mut container)?;

        log::info!(
            "Papaya initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            container,
            demo,
            event_handler: EventHandler::new(),
            needs_measure: true,
        });

        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match state.container.tick(Instant::now()) {
            Ok(0) => {}
            Ok(_) => state.settle(Ok(())),
            Err(e) => log::error!("Timer dispatch failed: {}", e),
        }

        // Re-lay out once Parley has measured the current text.
        if state.needs_measure {
            state.shape_renderer.measure_text(state.container.scene());
            if let Err(e) = state.container.update_all() {
                log::error!("Layout failed: {}", e);
            }
            state.needs_measure = false;
        }

        let (width, height) = (state.surface.config.width, state.surface.config.height);
        let render_ctx = RenderContext::new(
            state.container.scene(),
            kurbo::Size::new(width as f64, height as f64),
        )
        .with_scale_factor(state.window.scale_factor())
        .with_background(self.config.background());
        state.shape_renderer.build_scene(&render_ctx);
        let base_color = state.shape_renderer.background_color(&render_ctx);

        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };
        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding Rgba8Unorm target.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            state.shape_renderer.scene(),
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());
        let mut blit_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state
            .texture_blitter
            .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
        queue.submit(std::iter::once(blit_encoder.finish()));

        surface_texture.present();

        // Keep frames coming so keyboard pulses elapse on time.
        if state.container.next_deadline().is_some() {
            state.window.request_redraw();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);
        let surface: RenderSurface<'static> = match pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        )) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.finish_init(window, surface) {
            log::error!("Initialization failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw();
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };
        let now = Instant::now();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                let (width, height) = state.logical_size();
                state.container.set_size(kurbo::Size::new(width, height));
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = state
                    .event_handler
                    .cursor_moved(position, state.window.scale_factor());
                let result = state.container.handle_pointer_event(event, now);
                state.settle(result);
            }

            WindowEvent::CursorLeft { .. } => {
                let result = state
                    .container
                    .handle_pointer_event(PointerEvent::Leave, now);
                state.settle(result);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(event) = state.event_handler.mouse_input(button_state, button) {
                    let result = state.container.handle_pointer_event(event, now);
                    state.settle(result);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let event = translate_key_event(event.state, &event.logical_key);
                let result = state.container.handle_key_event(event, now);
                state.settle(result);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state
                    .container
                    .set_modifiers(translate_modifiers(modifiers.state()));
            }

            _ => {}
        }
    }
}
