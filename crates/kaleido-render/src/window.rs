//! Window management with winit for the real-time demos

use crate::context::{GpuContext, init_with_surface};
use crate::error::{RenderError, Result};
use crate::frame_stats::FrameStats;
use crate::scene::{FrameContext, Scene};
use kaleido_core::pointer::Pointer;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

/// Configuration for the demo window
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Window title, the scene name when unset
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 1280,
            height: 720,
        }
    }
}

/// GPU state that only exists once the window is up
struct Running<S> {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    gpu: GpuContext,
    scene: S,
}

/// Application state for a demo window
struct DemoApp<S: Scene> {
    config: WindowConfig,
    scene_config: S::Config,
    instance: wgpu::Instance,
    running: Option<Running<S>>,
    pointer: Pointer,
    stats: FrameStats,
    start_time: Instant,
    init_error: Option<RenderError>,
}

impl<S: Scene> DemoApp<S> {
    fn new(config: WindowConfig, scene_config: S::Config) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        Self {
            config,
            scene_config,
            instance,
            running: None,
            pointer: Pointer::new(),
            stats: FrameStats::new(),
            start_time: Instant::now(),
            init_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Running<S>> {
        let title = self.config.title.as_deref().unwrap_or(S::NAME);
        let window_attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let surface = self.instance.create_surface(window.clone())?;
        let gpu = pollster::block_on(init_with_surface(&self.instance, &surface))?;

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: gpu.format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &surface_config);

        let scene = S::create(
            &gpu,
            &self.scene_config,
            surface_config.width,
            surface_config.height,
        )?;
        info!(
            scene = S::NAME,
            width = surface_config.width,
            height = surface_config.height,
            format = ?gpu.format,
            "Scene ready"
        );

        Ok(Running {
            window,
            surface,
            surface_config,
            gpu,
            scene,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if let Some(running) = &mut self.running {
            let config = &mut running.surface_config;
            if config.width == new_size.width && config.height == new_size.height {
                return;
            }
            config.width = new_size.width;
            config.height = new_size.height;
            running.surface.configure(&running.gpu.device, config);
            running.scene.resize(new_size.width, new_size.height);
        }
    }

    fn handle_pointer(&mut self, position: PhysicalPosition<f64>) {
        if let Some(running) = &self.running {
            let size = running.window.inner_size();
            self.pointer.update(
                position.x,
                position.y,
                f64::from(size.width),
                f64::from(size.height),
            );
        }
    }

    fn render(&mut self) {
        // Some platforms resize without delivering a Resized event
        if let Some(size) = self.running.as_ref().map(|r| r.window.inner_size()) {
            self.resize(size);
        }

        let Some(running) = &mut self.running else {
            return;
        };

        let output = match running.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                running
                    .surface
                    .configure(&running.gpu.device, &running.surface_config);
                return;
            }
            Err(e) => {
                warn!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = FrameContext {
            elapsed: self.start_time.elapsed().as_secs_f32(),
            width: running.surface_config.width,
            height: running.surface_config.height,
            pixel_ratio: running.window.scale_factor() as f32,
            pointer: self.pointer.position(),
        };
        running.scene.render(&view, &frame);

        output.present();
        self.stats.tick();
    }
}

impl<S: Scene> ApplicationHandler for DemoApp<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(running) => {
                self.running = Some(running);
                self.start_time = Instant::now();
            }
            Err(e) => {
                error!("Failed to start {}: {:#}", S::NAME, e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_pointer(position);
            }
            WindowEvent::Touch(touch) => {
                if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
                    self.handle_pointer(touch.location);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

/// Open a window and drive `S` until it is closed
pub fn run<S: Scene>(config: WindowConfig, scene_config: S::Config) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::<S>::new(config, scene_config);
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Demo controls help text
pub fn controls_help() -> &'static str {
    r#"
Controls:
  Mouse / Touch  - Steer the lattice camera
  Escape         - Close the window
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_uses_scene_name() {
        let config = WindowConfig::default();
        assert!(config.title.is_none());
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[test]
    fn test_controls_help_mentions_escape() {
        assert!(controls_help().contains("Escape"));
    }
}
