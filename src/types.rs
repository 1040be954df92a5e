//! Vertex data for the full-screen quad.

use bytemuck::{Pod, Zeroable};

/// One interleaved quad vertex, matching
/// [`VertexLayout::POSITION_TEX`](crate::VertexLayout::POSITION_TEX).
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// A quad covering NDC `[-1, 1]²`, in triangle-strip order.
pub const FULL_SCREEN_QUAD: [QuadVertex; 4] = [
    // top right
    QuadVertex {
        position: [1.0, 1.0, 0.0],
        tex_coord: [1.0, 1.0],
    },
    // top left
    QuadVertex {
        position: [-1.0, 1.0, 0.0],
        tex_coord: [0.0, 1.0],
    },
    // bottom right
    QuadVertex {
        position: [1.0, -1.0, 0.0],
        tex_coord: [1.0, 0.0],
    },
    // bottom left
    QuadVertex {
        position: [-1.0, -1.0, 0.0],
        tex_coord: [0.0, 0.0],
    },
];
