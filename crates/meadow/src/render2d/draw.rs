//! The per-frame render pass.
//!
//! ```text
//! render_quads
//!   ├─ acquire surface texture       (SurfaceError goes to the caller)
//!   ├─ upload vertex + index buffers (skipped when nothing was drawn)
//!   ├─ clear with the background color
//!   ├─ for each run: bind texture, draw_indexed(range)
//!   └─ submit, present
//! ```

use wgpu::util::DeviceExt;

use crate::render::GpuContext;

use super::batch::QuadBatch;
use super::pipeline::QuadRenderer;
use super::texture::TextureStore;

pub(crate) fn render_quads(
    gpu: &GpuContext,
    renderer: &QuadRenderer,
    store: &TextureStore,
    batch: &QuadBatch,
    clear_color: wgpu::Color,
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("meadow frame encoder"),
        });

    let buffers = (!batch.is_empty()).then(|| {
        let vertex_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertex buffer"),
            contents: bytemuck::cast_slice(&batch.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad index buffer"),
            contents: bytemuck::cast_slice(&batch.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        (vertex_buffer, index_buffer)
    });

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quad render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some((vb, ib)) = &buffers {
            render_pass.set_pipeline(&renderer.pipeline);
            render_pass.set_vertex_buffer(0, vb.slice(..));
            render_pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);

            for run in &batch.runs {
                let Some(texture) = store.get(run.texture) else {
                    log::debug!("Skipping draw with unknown texture {}", run.texture);
                    continue;
                };
                render_pass.set_bind_group(0, &texture.bind_group, &[]);
                render_pass.draw_indexed(run.index_start..(run.index_start + run.index_count), 0, 0..1);
            }
        }
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();
    Ok(())
}
