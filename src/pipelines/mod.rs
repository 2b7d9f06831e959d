//! Shader programs and render pipeline construction.
//!
//! All lab shaders live in one WGSL module (`lab.wgsl`). A [`ShaderKind`]
//! selects the entry points, a [`PolygonMode`] the rasterisation, and
//! [`Pipelines`] builds and caches one `wgpu::RenderPipeline` per pair.

use std::collections::HashMap;

use crate::{data_structures::mesh::ModelVertex, data_structures::texture::Texture};

pub mod basic;

/// Which shader program a node is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    /// Flat colour, needs nothing but the matrices.
    #[default]
    Fallback,
    /// Unlit diffuse texture.
    Default,
    /// Lambert term against the light position.
    Diffuse,
    /// World-space normal as colour.
    Normal,
    /// Texture coordinates as colour.
    TexCoord,
    /// Blinn-less Phong with material colours and optional diffuse texture.
    Phong,
    /// Environment lookup along the view direction, used for sky spheres.
    CubeMap,
    /// Phong with a tangent-space normal map.
    BumpMap,
    /// Animated waves with fresnel-blended reflection.
    Water,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 9] = [
        ShaderKind::Fallback,
        ShaderKind::Default,
        ShaderKind::Diffuse,
        ShaderKind::Normal,
        ShaderKind::TexCoord,
        ShaderKind::Phong,
        ShaderKind::CubeMap,
        ShaderKind::BumpMap,
        ShaderKind::Water,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShaderKind::Fallback => "fallback",
            ShaderKind::Default => "default",
            ShaderKind::Diffuse => "diffuse",
            ShaderKind::Normal => "normal",
            ShaderKind::TexCoord => "texcoord",
            ShaderKind::Phong => "phong",
            ShaderKind::CubeMap => "cube_map",
            ShaderKind::BumpMap => "bump_map",
            ShaderKind::Water => "water",
        }
    }

    pub fn vertex_entry(self) -> &'static str {
        match self {
            ShaderKind::Water => "vs_water",
            _ => "vs_main",
        }
    }

    pub fn fragment_entry(self) -> &'static str {
        match self {
            ShaderKind::Fallback => "fs_fallback",
            ShaderKind::Default => "fs_default",
            ShaderKind::Diffuse => "fs_diffuse",
            ShaderKind::Normal => "fs_normal",
            ShaderKind::TexCoord => "fs_texcoord",
            ShaderKind::Phong => "fs_phong",
            ShaderKind::CubeMap => "fs_cube",
            ShaderKind::BumpMap => "fs_bump",
            ShaderKind::Water => "fs_water",
        }
    }
}

/// How triangles are rasterised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
    Point,
}

impl PolygonMode {
    /// Fill → Line → Point → Fill.
    pub fn next(self) -> Self {
        match self {
            PolygonMode::Fill => PolygonMode::Line,
            PolygonMode::Line => PolygonMode::Point,
            PolygonMode::Point => PolygonMode::Fill,
        }
    }

    /// Device feature needed to rasterise in this mode, if any.
    pub fn required_feature(self) -> wgpu::Features {
        match self {
            PolygonMode::Fill => wgpu::Features::empty(),
            PolygonMode::Line => wgpu::Features::POLYGON_MODE_LINE,
            PolygonMode::Point => wgpu::Features::POLYGON_MODE_POINT,
        }
    }

    /// `self` if the device supports it, [`PolygonMode::Fill`] otherwise.
    pub fn supported_by(self, features: wgpu::Features) -> Self {
        if features.contains(self.required_feature()) {
            self
        } else {
            log::warn!("polygon mode {:?} is not supported by this adapter, using Fill", self);
            PolygonMode::Fill
        }
    }

    pub fn to_wgpu(self) -> wgpu::PolygonMode {
        match self {
            PolygonMode::Fill => wgpu::PolygonMode::Fill,
            PolygonMode::Line => wgpu::PolygonMode::Line,
            PolygonMode::Point => wgpu::PolygonMode::Point,
        }
    }
}

/// Lazily built render pipelines sharing one layout and one shader module.
pub struct Pipelines {
    layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    features: wgpu::Features,
    cache: HashMap<(ShaderKind, PolygonMode), wgpu::RenderPipeline>,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
        material_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lab Pipeline Layout"),
            bind_group_layouts: &[uniform_layout, material_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lab Shaders"),
            source: wgpu::ShaderSource::Wgsl(include_str!("lab.wgsl").into()),
        });
        Self {
            layout,
            shader,
            color_format,
            features: device.features(),
            cache: HashMap::new(),
        }
    }

    /// Pipeline for `kind` in `mode`, compiled on first use.
    ///
    /// Unsupported polygon modes fall back to filled triangles.
    pub fn get(
        &mut self,
        device: &wgpu::Device,
        kind: ShaderKind,
        mode: PolygonMode,
    ) -> &wgpu::RenderPipeline {
        let mode = self.resolve(mode);
        let (layout, shader, color_format) = (&self.layout, &self.shader, self.color_format);
        self.cache.entry((kind, mode)).or_insert_with(|| {
            log::info!("building {} pipeline ({:?})", kind.label(), mode);
            basic::mk_render_pipeline(
                device,
                layout,
                color_format,
                Some(wgpu::BlendState::REPLACE),
                Some(Texture::DEPTH_FORMAT),
                &[ModelVertex::desc()],
                shader,
                basic::Stage {
                    label: kind.label(),
                    vertex_entry: kind.vertex_entry(),
                    fragment_entry: kind.fragment_entry(),
                    polygon_mode: mode.to_wgpu(),
                },
            )
        })
    }

    /// Pipeline for `kind` in `mode` if [`Pipelines::get`] already built it.
    pub fn cached(&self, kind: ShaderKind, mode: PolygonMode) -> Option<&wgpu::RenderPipeline> {
        self.cache.get(&(kind, self.resolve(mode)))
    }

    /// The mode pipelines are actually built with on this device.
    pub fn resolve(&self, mode: PolygonMode) -> PolygonMode {
        if self.features.contains(mode.required_feature()) {
            mode
        } else {
            PolygonMode::Fill
        }
    }

    /// Device features relevant to pipeline selection.
    pub fn features(&self) -> wgpu::Features {
        self.features
    }
}
