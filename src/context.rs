use std::{path::Path, sync::Arc};

use winit::window::Window;

use crate::{
    camera::{self, Camera, CameraController, Projection},
    config::EngineConfig,
    data_structures::{mesh::MeshData, texture},
    pipelines::PolygonMode,
    render::{DrawContext, MeshId, Renderer, TextureId},
    resources,
};

/// The camera and what moves it.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    /// Whether keyboard and mouse steer the camera.
    pub enabled: bool,
}

/// Window, GPU objects and per-run settings shared by the frame loop and a lab.
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub renderer: Renderer,
    pub clear_colour: wgpu::Color,
    pub polygon_mode: PolygonMode,
    /// Seconds since the lab started.
    pub elapsed: f32,
    pub engine: EngineConfig,
}

impl Context {
    pub async fn new(window: Arc<Window>, engine: &EngineConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        // wireframe and point rendering are optional
        let wanted = wgpu::Features::POLYGON_MODE_LINE | wgpu::Features::POLYGON_MODE_POINT;
        let required_features = adapter.features() & wanted;
        if required_features != wanted {
            log::warn!(
                "adapter lacks {:?}, polygon modes fall back to fill",
                wanted.difference(required_features)
            );
        }

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders output linear colour and rely on an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface is not compatible with the adapter"))?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = CameraResources {
            camera: Camera::new(engine.camera_position, engine.camera_yaw, engine.camera_pitch),
            controller: CameraController::new(engine.movement_speed, engine.mouse_sensitivity),
            enabled: engine.free_camera,
        };
        let projection = camera::Projection::new(
            config.width,
            config.height,
            engine.fovy,
            engine.znear,
            engine.zfar,
        );

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let renderer = Renderer::new(&device, &queue, config.format)?;

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            renderer,
            clear_colour: engine.clear_colour,
            polygon_mode: PolygonMode::Fill,
            elapsed: 0.0,
            engine: engine.clone(),
        })
    }

    pub fn assets(&self) -> &Path {
        &self.engine.assets
    }

    pub fn set_title(&self, status: &str) {
        self.window
            .set_title(&format!("{} | {}", self.engine.title, status));
    }

    /// Matrices, camera and time for this frame with the default light and material.
    pub fn draw_context(&self) -> DrawContext {
        DrawContext {
            view_projection: camera::view_projection(&self.camera.camera, &self.projection),
            camera_position: self.camera.camera.position_vec(),
            time: self.elapsed,
            ..Default::default()
        }
    }

    /// Switch to the next polygon mode the device can draw.
    pub fn cycle_polygon_mode(&mut self) {
        self.polygon_mode = self
            .polygon_mode
            .next()
            .supported_by(self.renderer.features());
        log::info!("polygon mode {:?}", self.polygon_mode);
    }

    pub fn add_mesh(&mut self, label: &str, mesh: &MeshData) -> MeshId {
        self.renderer.add_mesh(&self.device, label, mesh)
    }

    /// `None` when the file cannot be loaded; the default texture is used instead.
    pub async fn load_texture(&mut self, file_name: &str, is_normal_map: bool) -> Option<TextureId> {
        let texture = resources::texture::load_texture(
            &self.engine.assets,
            file_name,
            is_normal_map,
            &self.device,
            &self.queue,
        )
        .await;
        self.renderer.add_texture_or_default(texture)
    }

    pub async fn load_cube_map(&mut self, dir: &str, extension: &str) -> Option<TextureId> {
        let texture = resources::texture::load_cube_map(
            &self.engine.assets,
            dir,
            extension,
            &self.device,
            &self.queue,
        )
        .await;
        self.renderer.add_texture_or_default(texture)
    }
}
