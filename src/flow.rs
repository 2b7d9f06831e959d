//! Frame loop driving a single lab.
//!
//! A [`Lab`] is one runnable scene. The loop owns the window and the GPU
//! [`Context`]; each frame it
//! 1. collects window/device events into [`Input`]
//! 2. moves the free camera
//! 3. calls [`Lab::on_update`] with the elapsed time
//! 4. collects draw calls from [`Lab::on_render`]
//! 5. renders them through the context's renderer and presents the frame

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::EngineConfig,
    context::Context,
    data_structures::texture::Texture,
    input::Input,
    render::{DrawCall, FrameSettings},
};

/// A runnable scene.
///
/// `on_init` is awaited once after the GPU is ready; it is the place to
/// generate meshes, load textures and build the scene graph.
#[allow(async_fn_in_trait)]
pub trait Lab {
    async fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()>;

    /// Advance the scene by `dt`. Input reflects the events since the last frame.
    fn on_update(&mut self, ctx: &mut Context, input: &Input, dt: Duration);

    /// Push this frame's draw calls.
    fn on_render(&self, ctx: &Context, calls: &mut Vec<DrawCall>);
}

/// GPU context plus the surface status.
struct AppState {
    ctx: Context,
    is_surface_configured: bool,
    calls: Vec<DrawCall>,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render<L: Lab>(&mut self, lab: &L) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.calls.clear();
        lab.on_render(&self.ctx, &mut self.calls);

        let settings = FrameSettings {
            clear_colour: self.ctx.clear_colour,
            polygon_mode: self.ctx.polygon_mode,
        };
        self.ctx.renderer.draw_frame(
            &self.ctx.device,
            &self.ctx.queue,
            &view,
            &self.ctx.depth_texture.view,
            &self.calls,
            settings,
        );
        output.present();
        Ok(())
    }
}

pub struct App<L: Lab> {
    async_runtime: tokio::runtime::Runtime,
    config: EngineConfig,
    lab: L,
    state: Option<AppState>,
    input: Input,
    last_time: Instant,
    /// Fatal setup error, handed back by [`run`].
    error: Option<anyhow::Error>,
}

impl<L: Lab> App<L> {
    fn new(config: EngineConfig, lab: L) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            lab,
            state: None,
            input: Input::new(),
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn update(&mut self, dt: Duration) {
        let Some(state) = &mut self.state else {
            return;
        };
        let ctx = &mut state.ctx;
        if ctx.camera.enabled {
            ctx.camera.controller.update(&mut ctx.camera.camera, dt);
        }
        ctx.elapsed += dt.as_secs_f32();
        self.lab.on_update(ctx, &self.input, dt);
        self.input.end_frame();
    }
}

impl<L: Lab> ApplicationHandler for App<L> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let config = &self.config;
        let lab = &mut self.lab;
        let init = self.async_runtime.block_on(async move {
            let mut ctx = Context::new(window, config).await?;
            lab.on_init(&mut ctx).await?;
            anyhow::Ok(ctx)
        });
        match init {
            Ok(ctx) => {
                log::info!("{} ready", self.config.title);
                let size = ctx.window.inner_size();
                let mut state = AppState {
                    ctx,
                    is_surface_configured: false,
                    calls: Vec::new(),
                };
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e.context("initialising the lab")),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.mouse_motion(dx, dy);
            if state.ctx.camera.enabled && self.input.right_mouse() {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.ctx.camera.enabled {
            state.ctx.camera.controller.handle_window_events(&event);
        }
        self.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                self.update(dt);

                let Some(state) = &mut self.state else {
                    return;
                };
                match state.render(&self.lab) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open a window and run `lab` until it is closed or Escape is pressed.
pub fn run<L: Lab>(config: EngineConfig, lab: L) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, lab)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
