//! # render2d: textured quads on wgpu
//!
//! The desktop backend draws every `Canvas::draw_textured_rect` call as one
//! quad. Quads are collected CPU-side during the render pass and flushed to
//! the GPU in one render pass when the frame is presented:
//!
//! ```text
//! draw_textured_rect ─► QuadBatch::push   (project to clip space, merge runs)
//!            ...
//! present_frame ───────► draw::render_quads (upload, clear, one draw per run)
//! ```
//!
//! - [`vertex`]: per-corner layout shared with `shader.wgsl`
//! - [`batch`]: CPU-side vertex/index accumulation
//! - [`pipeline`]: the render pipeline, bind group layout and sampler
//! - [`texture`]: image decoding and the GPU texture store
//! - [`draw`]: the per-frame render pass

pub(crate) mod batch;
pub(crate) mod draw;
pub(crate) mod pipeline;
pub(crate) mod texture;
pub(crate) mod vertex;
