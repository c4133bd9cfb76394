//! CPU-side quad accumulation.
//!
//! Every draw appends four vertices and six indices. Consecutive draws with
//! the same texture extend the current [`DrawRun`] so they go out in a
//! single `draw_indexed`; a texture change starts a new run. Draw order is
//! preserved, which keeps later entities on top.

use crate::math::{Rect, pixel_projection};
use crate::texture::TextureHandle;

use super::vertex::QuadVertex;

/// UVs for the corners returned by [`Rect::corners`].
const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A contiguous range of indices drawn with one texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DrawRun {
    pub texture: TextureHandle,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub(crate) struct QuadBatch {
    pub vertices: Vec<QuadVertex>,
    pub indices: Vec<u32>,
    pub runs: Vec<DrawRun>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, texture: TextureHandle, rect: Rect, viewport: (u32, u32)) {
        let projection = pixel_projection(viewport);
        let base = self.vertices.len() as u32;
        for (corner, uv) in rect.corners().into_iter().zip(CORNER_UVS) {
            let clip = projection.transform_point3(corner.extend(0.0));
            self.vertices.push(QuadVertex {
                position: clip.to_array(),
                uv,
            });
        }

        let index_start = self.indices.len() as u32;
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));

        if let Some(last) = self.runs.last_mut() {
            if last.texture == texture {
                last.index_count += QUAD_INDICES.len() as u32;
                return;
            }
        }
        self.runs.push(DrawRun {
            texture,
            index_start,
            index_count: QUAD_INDICES.len() as u32,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.runs.clear();
    }
}
