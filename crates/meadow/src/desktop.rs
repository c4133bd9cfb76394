//! Desktop backend: a winit window drawn with wgpu.
//!
//! winit normally owns the main loop (`run_app` never returns). The engine
//! needs to own it instead, so [`Desktop`] drives winit with
//! `pump_app_events` and a zero timeout: each `poll_events` drains whatever
//! the OS has queued and returns straight away.
//!
//! ```text
//! Desktop::new     pump until `resumed` has created window + GPU
//! poll_events      pump(0) ─► DesktopApp::window_event (keys, resize, close)
//! draw_*           QuadBatch::push
//! present_frame    render_quads ─► surface present, batch cleared
//! ```
//!
//! Surface errors never reach the engine: a lost or outdated surface is
//! reconfigured, running out of GPU memory closes the window, anything else
//! is logged and the frame is dropped.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

use crate::config::{EngineConfig, WindowConfig};
use crate::error::{LoadError, StartupError};
use crate::input::{KeyCode, KeyState};
use crate::math::Rect;
use crate::platform::{Canvas, TextureLoader, Window};
use crate::render::GpuContext;
use crate::render2d::batch::QuadBatch;
use crate::render2d::draw::render_quads;
use crate::render2d::pipeline::QuadRenderer;
use crate::render2d::texture::{TextureStore, decode_image};
use crate::texture::TextureHandle;

/// How long `Desktop::new` waits per pump while the window comes up.
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

pub struct Desktop {
    event_loop: EventLoop<()>,
    app: DesktopApp,
}

impl Desktop {
    /// Open the window and bring up the GPU. Blocks until both exist.
    pub fn new(config: &EngineConfig) -> Result<Self, StartupError> {
        let mut event_loop = EventLoop::new()?;
        let mut app = DesktopApp::new(config);

        while app.gpu.is_none() {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut app);
            if let Some(e) = app.startup_error.take() {
                return Err(e);
            }
            if let PumpStatus::Exit(code) = status {
                return Err(StartupError::Exited(code));
            }
        }

        Ok(Self { event_loop, app })
    }
}

impl Window for Desktop {
    fn should_close(&self) -> bool {
        self.app.close_requested
    }

    fn request_close(&mut self) {
        self.app.close_requested = true;
    }

    fn poll_events(&mut self) {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app)
        {
            log::info!("Event loop exited with code {code}");
            self.app.close_requested = true;
        }
    }

    fn present_frame(&mut self) {
        self.app.present();
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.app.keys.is_pressed(key)
    }

    fn viewport_size(&self) -> (u32, u32) {
        match &self.app.gpu {
            Some(gpu) => gpu.surface_size(),
            None => (self.app.window_config.width, self.app.window_config.height),
        }
    }
}

impl Canvas for Desktop {
    fn draw_textured_rect(&mut self, texture: TextureHandle, rect: Rect, viewport: (u32, u32)) {
        self.app.batch.push(texture, rect, viewport);
    }
}

impl TextureLoader for Desktop {
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, LoadError> {
        let image = decode_image(path)?;
        let (Some(gpu), Some(renderer)) = (&self.app.gpu, &self.app.renderer) else {
            return Err(LoadError::NoDevice {
                path: path.to_path_buf(),
            });
        };
        let label = path.to_string_lossy();
        let handle = self.app.store.upload(gpu, renderer, &label, &image);
        if let Some(texture) = self.app.store.get(handle) {
            log::debug!(
                "Uploaded {label} ({}x{}), {} textures on GPU",
                texture.width,
                texture.height,
                self.app.store.len()
            );
        }
        Ok(handle)
    }
}

/// The state winit calls back into.
struct DesktopApp {
    window_config: WindowConfig,
    clear_color: wgpu::Color,
    window: Option<Arc<winit::window::Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<QuadRenderer>,
    store: TextureStore,
    batch: QuadBatch,
    keys: KeyState,
    close_requested: bool,
    startup_error: Option<StartupError>,
}

impl DesktopApp {
    fn new(config: &EngineConfig) -> Self {
        let [r, g, b, a] = config.clear_color;
        Self {
            window_config: config.window.clone(),
            clear_color: wgpu::Color { r, g, b, a },
            window: None,
            gpu: None,
            renderer: None,
            store: TextureStore::new(),
            batch: QuadBatch::new(),
            keys: KeyState::new(),
            close_requested: false,
            startup_error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), StartupError> {
        let attrs = winit::window::Window::default_attributes()
            .with_title(&self.window_config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_config.width as f64,
                self.window_config.height as f64,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let renderer = QuadRenderer::new(&gpu);
        let (width, height) = gpu.surface_size();
        log::info!(
            "Created window '{}' ({width}x{height})",
            self.window_config.title
        );

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn present(&mut self) {
        let (Some(gpu), Some(renderer)) = (&mut self.gpu, &self.renderer) else {
            self.batch.clear();
            return;
        };

        if let Some(window) = &self.window {
            window.pre_present_notify();
        }

        match render_quads(gpu, renderer, &self.store, &self.batch, self.clear_color) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.surface_size();
                gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                self.close_requested = true;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
            }
        }
        self.batch.clear();
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("{e}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested");
                self.close_requested = true;
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }

            WindowEvent::Focused(false) => self.keys.release_all(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.keys.press(key_code),
                        ElementState::Released => self.keys.release(key_code),
                    }
                }
            }

            _ => {}
        }
    }
}
