use std::path::Path;

use anyhow::Context;

use crate::{data_structures::texture, resources::load_binary};

/// Group 0: the per-draw uniform block, addressed with a dynamic offset.
pub fn uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("draw_uniform_bind_group_layout"),
    })
}

/// Group 1: diffuse, normal map and environment cube map with one shared sampler.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding, view_dimension| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            texture_entry(0, wgpu::TextureViewDimension::D2),
            texture_entry(1, wgpu::TextureViewDimension::D2),
            texture_entry(2, wgpu::TextureViewDimension::Cube),
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

pub async fn load_texture(
    assets: &Path,
    file_name: &str,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(assets, file_name).await?;
    texture::Texture::from_bytes(device, queue, &data, file_name, None, is_normal_map)
}

/// Load the six faces of a cube map from `<dir>/{posx,negx,posy,negy,posz,negz}.<ext>`.
pub async fn load_cube_map(
    assets: &Path,
    dir: &str,
    extension: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    const FACES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];
    let mut images = Vec::with_capacity(FACES.len());
    for face in FACES {
        let file_name = format!("{dir}/{face}.{extension}");
        let data = load_binary(assets, &file_name).await?;
        let img = image::load_from_memory(&data)
            .with_context(|| format!("decoding cube map face {file_name}"))?;
        images.push(img);
    }
    let faces: [image::DynamicImage; 6] = images
        .try_into()
        .map_err(|_| anyhow::anyhow!("cube map {dir} needs exactly six faces"))?;
    texture::Texture::from_cube_faces(device, queue, &faces, dir)
}
