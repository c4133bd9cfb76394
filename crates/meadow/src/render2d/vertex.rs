//! Per-corner data sent to the GPU.
//!
//! ```text
//! QuadVertex (20 bytes per vertex)
//! ┌────────────────┬──────────────┐
//! │ position       │ uv           │
//! │ [f32; 3]       │ [f32; 2]     │
//! │ offset 0       │ offset 12    │
//! │ location(0)    │ location(1)  │
//! └────────────────┴──────────────┘
//! ```
//!
//! Positions are already in clip space: the batch applies the pixel
//! projection on the CPU, so the shader has no uniforms.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}
