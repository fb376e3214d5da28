//! The hardcoded vertex batches the samples draw every frame.
//!
//! Both batches live on the stack and are submitted straight from process
//! memory with `DrawPrimitiveUP`; nothing here ever touches a vertex buffer
//! object.

/// `D3DFVF_XYZ`: untransformed position, three floats.
pub const FVF_XYZ: u32 = 0x002;
/// `D3DFVF_XYZRHW`: pre-transformed screen-space position, four floats.
pub const FVF_XYZRHW: u32 = 0x004;
/// `D3DFVF_DIFFUSE`: packed ARGB diffuse color dword.
pub const FVF_DIFFUSE: u32 = 0x040;

/// Vertex layout of the textured quad: object-space position + diffuse.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PosDiffuseVertex {
    pub position: [f32; 3],
    pub color: u32,
}

/// Vertex layout of the flat triangle: screen-space position (x, y, z, rhw)
/// + diffuse.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ScreenDiffuseVertex {
    pub position: [f32; 4],
    pub color: u32,
}

/// Packs an opaque color the way `D3DCOLOR_XRGB` does: `0xFFrrggbb`.
pub const fn diffuse_xrgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Primitive count for a non-indexed triangle list of `vertex_count` vertices.
pub const fn triangle_list_primitives(vertex_count: u32) -> u32 {
    vertex_count / 3
}

/// Primitive count for a triangle strip of `vertex_count` vertices.
pub const fn triangle_strip_primitives(vertex_count: u32) -> u32 {
    vertex_count.saturating_sub(2)
}

/// One pre-transformed triangle in screen coordinates, red/blue/green corners.
pub fn screen_triangle() -> [ScreenDiffuseVertex; 3] {
    [
        ScreenDiffuseVertex {
            position: [0.0, 0.0, 0.0, 1.0],
            color: diffuse_xrgb(255, 0, 0),
        },
        ScreenDiffuseVertex {
            position: [400.0, 0.0, 0.0, 1.0],
            color: diffuse_xrgb(0, 0, 255),
        },
        ScreenDiffuseVertex {
            position: [400.0, 400.0, 0.0, 1.0],
            color: diffuse_xrgb(0, 255, 0),
        },
    ]
}

/// The unit quad as a 4-vertex triangle strip, one colored corner each.
/// Spanning [-1, 1] on x and y lets the vertex shader derive texture
/// coordinates directly from the position.
pub fn unit_quad() -> [PosDiffuseVertex; 4] {
    [
        PosDiffuseVertex {
            position: [-1.0, -1.0, 0.0],
            color: diffuse_xrgb(0, 0, 0),
        },
        PosDiffuseVertex {
            position: [1.0, -1.0, 0.0],
            color: diffuse_xrgb(255, 0, 0),
        },
        PosDiffuseVertex {
            position: [-1.0, 1.0, 0.0],
            color: diffuse_xrgb(0, 255, 0),
        },
        PosDiffuseVertex {
            position: [1.0, 1.0, 0.0],
            color: diffuse_xrgb(255, 255, 0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_batch_is_three_vertices_one_primitive() {
        let batch = screen_triangle();
        assert_eq!(batch.len(), 3);
        assert_eq!(triangle_list_primitives(batch.len() as u32), 1);
    }

    #[test]
    fn quad_batch_is_four_vertices_two_primitives() {
        let batch = unit_quad();
        assert_eq!(batch.len(), 4);
        assert_eq!(triangle_strip_primitives(batch.len() as u32), 2);
    }

    #[test]
    fn strip_primitive_count_never_underflows() {
        assert_eq!(triangle_strip_primitives(0), 0);
        assert_eq!(triangle_strip_primitives(2), 0);
    }

    #[test]
    fn diffuse_color_packs_as_opaque_argb() {
        assert_eq!(diffuse_xrgb(255, 0, 0), 0xFFFF_0000);
        assert_eq!(diffuse_xrgb(0, 255, 0), 0xFF00_FF00);
        assert_eq!(diffuse_xrgb(255, 255, 0), 0xFFFF_FF00);
        assert_eq!(diffuse_xrgb(0, 0, 0), 0xFF00_0000);
    }

    #[test]
    fn vertex_strides_match_the_declared_fvf_layouts() {
        // float3 + dword, float4 + dword
        assert_eq!(std::mem::size_of::<PosDiffuseVertex>(), 16);
        assert_eq!(std::mem::size_of::<ScreenDiffuseVertex>(), 20);
    }
}
