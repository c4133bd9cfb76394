//! # Texture: image files on the GPU
//!
//! Loading is split in two so the file side can fail (and be tested) without
//! a device:
//!
//! 1. [`decode_image`]: read the file and decode it to RGBA8. Read failures
//!    are [`LoadError::Io`], bad or unsupported data is [`LoadError::Decode`].
//! 2. [`TextureStore::upload`]: create the `wgpu::Texture` and its bind
//!    group, and hand out a [`TextureHandle`].
//!
//! ```text
//! TextureStore
//! ┌──────────────────────────────────┐
//! │ entries: Vec<GpuTexture>         │
//! │   [0] apple.png   ◄── tex#1      │
//! │   [1] grass1.png  ◄── tex#2      │
//! └──────────────────────────────────┘
//! ```
//!
//! Handles are `index + 1`, since `tex#0` means "not loaded".

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::error::LoadError;
use crate::render::GpuContext;
use crate::texture::TextureHandle;

use super::pipeline::QuadRenderer;

/// Read and decode an image file to RGBA8.
pub(crate) fn decode_image(path: &Path) -> Result<image::RgbaImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

pub(crate) struct GpuTexture {
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

#[derive(Default)]
pub(crate) struct TextureStore {
    entries: Vec<GpuTexture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload RGBA8 pixels and return the new handle.
    pub fn upload(
        &mut self,
        gpu: &GpuContext,
        renderer: &QuadRenderer,
        label: &str,
        image: &image::RgbaImage,
    ) -> TextureHandle {
        let (width, height) = image.dimensions();
        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &renderer.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&renderer.sampler),
                },
            ],
        });

        self.entries.push(GpuTexture {
            bind_group,
            width,
            height,
        });
        TextureHandle::from_raw(self.entries.len() as u32)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        let index = handle.raw().checked_sub(1)?;
        self.entries.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
