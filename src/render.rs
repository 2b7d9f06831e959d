//! Per-frame draw state and the GPU renderer.
//!
//! A frame is rendered in two steps. Traversing a scene graph turns every
//! drawable node into a [`DrawCall`]: the node's world matrix plus the
//! [`DrawUniforms`] its [`SetUniforms`] function filled in from the frame's
//! [`DrawContext`]. The calls are collected by a [`DrawTarget`] and finally
//! recorded into a render pass by the [`Renderer`].
//!
//! Nothing in the draw calls refers to GPU objects directly, which keeps
//! traversal testable without a device.

use std::collections::{HashMap, HashSet};

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};
use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        mesh::MeshData,
        scene_graph::NodeId,
        texture::{Texture, TextureTarget},
    },
    pipelines::{Pipelines, PolygonMode, ShaderKind},
    resources::{
        mesh::GpuMesh,
        texture::{material_layout, uniform_layout},
    },
};

/// Handle of a mesh uploaded to a [`Renderer`]. Many nodes may share one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Handle of a texture owned by a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// A named texture attached to a node.
///
/// The name decides the sampler slot: `diffuse_texture`, `normal_map` or
/// `cube_map`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBinding {
    pub name: String,
    pub texture: TextureId,
    pub target: TextureTarget,
}

pub const DIFFUSE_TEXTURE: &str = "diffuse_texture";
pub const NORMAL_MAP: &str = "normal_map";
pub const CUBE_MAP: &str = "cube_map";

/// Everything a uniform setter may read for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawContext {
    pub view_projection: Matrix4<f32>,
    pub camera_position: Vector3<f32>,
    pub light_position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
    /// Seconds since the lab started.
    pub time: f32,
}

impl Default for DrawContext {
    fn default() -> Self {
        Self {
            view_projection: Matrix4::identity(),
            camera_position: Vector3::new(0.0, 0.0, 0.0),
            light_position: Vector3::new(-2.0, 4.0, 2.0),
            ambient: Vector3::new(0.2, 0.2, 0.2),
            diffuse: Vector3::new(0.7, 0.2, 0.4),
            specular: Vector3::new(1.0, 1.0, 1.0),
            shininess: 10.0,
            time: 0.0,
        }
    }
}

/// Uniform block shared by all lab shaders, one per draw call.
///
/// Must match `DrawUniforms` in `lab.wgsl`. Vectors are padded to `vec4`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for normals.
    pub normal_model: [[f32; 4]; 4],
    pub view_projection: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub camera_position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// `x` shininess, `y` time, `z` has diffuse texture, `w` has normal map.
    pub params: [f32; 4],
}

impl DrawUniforms {
    /// Matrices for a node at `world`; everything else zeroed.
    pub fn new(world: Matrix4<f32>, ctx: &DrawContext) -> Self {
        // a degenerate scale (e.g. a parked object scaled to 0) has no inverse
        let normal_model = world.invert().unwrap_or(world).transpose();
        Self {
            model: world.into(),
            normal_model: normal_model.into(),
            view_projection: ctx.view_projection.into(),
            light_position: [0.0; 4],
            camera_position: [0.0; 4],
            ambient: [0.0; 4],
            diffuse: [0.0; 4],
            specular: [0.0; 4],
            params: [0.0; 4],
        }
    }

    pub fn shininess(&self) -> f32 {
        self.params[0]
    }

    pub fn time(&self) -> f32 {
        self.params[1]
    }

    fn set_texture_flags(&mut self, textures: &[TextureBinding]) {
        let bound = |name: &str| {
            textures
                .iter()
                .any(|t| t.name == name && t.target == slot_target(name))
        };
        self.set_flags(bound(DIFFUSE_TEXTURE), bound(NORMAL_MAP));
    }

    fn set_flags(&mut self, has_diffuse: bool, has_normal: bool) {
        self.params[2] = if has_diffuse { 1.0 } else { 0.0 };
        self.params[3] = if has_normal { 1.0 } else { 0.0 };
    }
}

fn vec4(v: Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 1.0]
}

/// Fills the shader-specific part of a node's uniforms.
pub type SetUniforms = fn(&DrawContext, &mut DrawUniforms);

/// Matrices only.
pub fn no_uniforms(_: &DrawContext, _: &mut DrawUniforms) {}

/// Light position.
pub fn light_uniforms(ctx: &DrawContext, uniforms: &mut DrawUniforms) {
    uniforms.light_position = vec4(ctx.light_position);
}

/// Camera position, for view-dependent lookups such as cube maps.
pub fn camera_uniforms(ctx: &DrawContext, uniforms: &mut DrawUniforms) {
    uniforms.camera_position = vec4(ctx.camera_position);
}

/// Light, camera and the full material.
pub fn phong_uniforms(ctx: &DrawContext, uniforms: &mut DrawUniforms) {
    light_uniforms(ctx, uniforms);
    camera_uniforms(ctx, uniforms);
    uniforms.ambient = vec4(ctx.ambient);
    uniforms.diffuse = vec4(ctx.diffuse);
    uniforms.specular = vec4(ctx.specular);
    uniforms.params[0] = ctx.shininess;
}

/// Camera, light and elapsed time for the wave animation.
pub fn water_uniforms(ctx: &DrawContext, uniforms: &mut DrawUniforms) {
    light_uniforms(ctx, uniforms);
    camera_uniforms(ctx, uniforms);
    uniforms.params[1] = ctx.time;
}

/// One mesh drawn once with one shader.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub node: NodeId,
    pub mesh: MeshId,
    pub shader: ShaderKind,
    pub world: Matrix4<f32>,
    pub uniforms: DrawUniforms,
    pub textures: Vec<TextureBinding>,
}

impl DrawCall {
    pub fn new(
        node: NodeId,
        mesh: MeshId,
        shader: ShaderKind,
        set_uniforms: SetUniforms,
        world: Matrix4<f32>,
        textures: &[TextureBinding],
        ctx: &DrawContext,
    ) -> Self {
        let mut uniforms = DrawUniforms::new(world, ctx);
        set_uniforms(ctx, &mut uniforms);
        uniforms.set_texture_flags(textures);
        Self {
            node,
            mesh,
            shader,
            world,
            uniforms,
            textures: textures.to_vec(),
        }
    }
}

/// Sink for the draw calls produced by a traversal.
pub trait DrawTarget {
    fn draw(&mut self, call: DrawCall);
}

impl DrawTarget for Vec<DrawCall> {
    fn draw(&mut self, call: DrawCall) {
        self.push(call);
    }
}

/// Per-frame settings of a render pass.
#[derive(Clone, Copy, Debug)]
pub struct FrameSettings {
    pub clear_colour: wgpu::Color,
    pub polygon_mode: PolygonMode,
}

/// Diffuse, normal and environment texture of a draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
struct MaterialKey {
    diffuse: Option<TextureId>,
    normal: Option<TextureId>,
    environment: Option<TextureId>,
}

/// A texture binding that could not be placed in a sampler slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
enum BindingIssue {
    #[error("ignoring texture binding with unknown name {0:?}")]
    UnknownName(String),
    #[error("texture bound as {0:?} has the wrong target")]
    WrongTarget(String),
    #[error("texture binding {name:?} refers to unknown texture {texture:?}")]
    MissingTexture { name: String, texture: TextureId },
}

/// Target a texture needs to fill the slot called `name`.
fn slot_target(name: &str) -> TextureTarget {
    if name == CUBE_MAP {
        TextureTarget::Cube
    } else {
        TextureTarget::D2
    }
}

/// Sort `bindings` into sampler slots.
///
/// `target_of` looks up an uploaded texture. Bindings that fit no slot are
/// returned as issues and leave the slot on its default.
fn resolve_bindings(
    bindings: &[TextureBinding],
    target_of: impl Fn(TextureId) -> Option<TextureTarget>,
) -> (MaterialKey, Vec<BindingIssue>) {
    let mut key = MaterialKey::default();
    let mut issues = Vec::new();
    for binding in bindings {
        let slot = match binding.name.as_str() {
            DIFFUSE_TEXTURE => &mut key.diffuse,
            NORMAL_MAP => &mut key.normal,
            CUBE_MAP => &mut key.environment,
            other => {
                issues.push(BindingIssue::UnknownName(other.to_string()));
                continue;
            }
        };
        match target_of(binding.texture) {
            Some(target) if target == slot_target(&binding.name) => *slot = Some(binding.texture),
            Some(_) => issues.push(BindingIssue::WrongTarget(binding.name.clone())),
            None => issues.push(BindingIssue::MissingTexture {
                name: binding.name.clone(),
                texture: binding.texture,
            }),
        }
    }
    (key, issues)
}

/// Owns everything on the GPU a lab draws with.
pub struct Renderer {
    meshes: Vec<GpuMesh>,
    textures: Vec<Texture>,
    default_diffuse: Texture,
    default_normal: Texture,
    default_cube: Texture,
    sampler: wgpu::Sampler,
    pipelines: Pipelines,
    uniform_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_capacity: usize,
    materials: HashMap<MaterialKey, wgpu::BindGroup>,
    reported: HashSet<BindingIssue>,
}

impl Renderer {
    const INITIAL_UNIFORM_CAPACITY: usize = 64;

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
    ) -> anyhow::Result<Self> {
        let uniform_layout = uniform_layout(device);
        let material_layout = material_layout(device);
        let pipelines = Pipelines::new(device, color_format, &uniform_layout, &material_layout);

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = align_to(std::mem::size_of::<DrawUniforms>() as u64, alignment);
        let (uniform_buffer, uniform_bind_group) = create_uniform_buffer(
            device,
            &uniform_layout,
            uniform_stride,
            Self::INITIAL_UNIFORM_CAPACITY,
        );

        Ok(Self {
            meshes: Vec::new(),
            textures: Vec::new(),
            default_diffuse: Texture::create_solid(
                device,
                queue,
                [255, 255, 255, 255],
                "default diffuse",
                false,
            ),
            default_normal: Texture::create_solid(
                device,
                queue,
                [127, 127, 255, 255],
                "default normal map",
                true,
            ),
            default_cube: Texture::create_solid_cube(
                device,
                queue,
                [128, 128, 128, 255],
                "default cube map",
            )?,
            sampler: crate::data_structures::texture::create_default_sampler(device),
            pipelines,
            uniform_layout,
            material_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_capacity: Self::INITIAL_UNIFORM_CAPACITY,
            materials: HashMap::new(),
            reported: HashSet::new(),
        })
    }

    /// Upload a generated mesh once; the handle can be shared by many nodes.
    pub fn add_mesh(&mut self, device: &wgpu::Device, label: &str, mesh: &MeshData) -> MeshId {
        if !mesh.is_consistent() {
            log::warn!("mesh {label} has mismatched attributes or out-of-range indices");
        }
        self.meshes.push(GpuMesh::upload(device, label, mesh));
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    /// Texture handle, or `None` when loading failed and the default slot should be used.
    pub fn add_texture_or_default(&mut self, texture: anyhow::Result<Texture>) -> Option<TextureId> {
        match texture {
            Ok(texture) => Some(self.add_texture(texture)),
            Err(e) => {
                log::warn!("texture unavailable, falling back to default: {:#}", e);
                None
            }
        }
    }

    pub fn features(&self) -> wgpu::Features {
        self.pipelines.features()
    }

    /// Record all `calls` into one render pass on `view` and submit it.
    pub fn draw_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        calls: &[DrawCall],
        settings: FrameSettings,
    ) {
        let keys: Vec<MaterialKey> = calls.iter().map(|c| self.material_key(&c.textures)).collect();
        for key in &keys {
            self.ensure_material(device, *key);
        }

        self.ensure_uniform_capacity(device, calls.len());
        for (i, (call, key)) in calls.iter().zip(&keys).enumerate() {
            // the shader must only sample what actually landed in a slot
            let mut uniforms = call.uniforms;
            uniforms.set_flags(key.diffuse.is_some(), key.normal.is_some());
            queue.write_buffer(
                &self.uniform_buffer,
                i as u64 * self.uniform_stride,
                bytemuck::bytes_of(&uniforms),
            );
        }
        for call in calls {
            self.pipelines.get(device, call.shader, settings.polygon_mode);
        }
        let mode = settings.polygon_mode;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(settings.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for (i, (call, key)) in calls.iter().zip(&keys).enumerate() {
                let Some(mesh) = self.meshes.get(call.mesh.0) else {
                    log::warn!("node {:?} refers to unknown mesh {:?}", call.node, call.mesh);
                    continue;
                };
                let (Some(pipeline), Some(material)) = (
                    self.pipelines.cached(call.shader, mode),
                    self.materials.get(key),
                ) else {
                    continue;
                };
                let offset = (i as u64 * self.uniform_stride) as wgpu::DynamicOffset;
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                render_pass.set_bind_group(1, material, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
    }

    fn ensure_uniform_capacity(&mut self, device: &wgpu::Device, needed: usize) {
        if needed <= self.uniform_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        log::info!("growing uniform buffer to {} draw calls", capacity);
        let (buffer, bind_group) =
            create_uniform_buffer(device, &self.uniform_layout, self.uniform_stride, capacity);
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_capacity = capacity;
    }

    fn material_key(&mut self, bindings: &[TextureBinding]) -> MaterialKey {
        let textures = &self.textures;
        let (key, issues) = resolve_bindings(bindings, |id| textures.get(id.0).map(|t| t.target));
        for issue in issues {
            if !self.reported.contains(&issue) {
                log::warn!("{issue}");
                self.reported.insert(issue);
            }
        }
        key
    }

    fn ensure_material(&mut self, device: &wgpu::Device, key: MaterialKey) {
        if self.materials.contains_key(&key) {
            return;
        }
        let pick = |id: Option<TextureId>, fallback: &Texture| -> wgpu::TextureView {
            id.and_then(|id| self.textures.get(id.0))
                .map_or(fallback.view.clone(), |t| t.view.clone())
        };
        let diffuse = pick(key.diffuse, &self.default_diffuse);
        let normal = pick(key.normal, &self.default_normal);
        let environment = pick(key.environment, &self.default_cube);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&environment),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("material_bind_group"),
        });
        self.materials.insert(key, bind_group);
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

fn create_uniform_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Draw Uniform Buffer"),
        contents: &vec![0u8; (stride * capacity as u64) as usize],
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
        label: Some("draw_uniform_bind_group"),
    });
    (buffer, bind_group)
}
