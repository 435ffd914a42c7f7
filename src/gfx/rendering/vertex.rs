//! Interleaved vertex format shared by every pipeline.

use crate::gfx::geometry::GeometryData;

/// Position, normal and texture coordinate, 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: position (Float32x3)
    /// - Attribute 1: normal (Float32x3)
    /// - Attribute 2: uv (Float32x2)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleaves the separate attribute arrays of generated geometry.
    /// Missing normals or uvs are filled with zeros.
    pub fn interleave(data: &GeometryData) -> Vec<Vertex3D> {
        data.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: data.normals.get(i).copied().unwrap_or([0.0; 3]),
                uv: data.tex_coords.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex3D>(), 32);
        let layout = Vertex3D::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn test_interleave_keeps_attribute_order() {
        let mut data = GeometryData::new();
        data.push_vertex([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.25, 0.75]);
        data.vertices.push([4.0, 5.0, 6.0]);

        let vertices = Vertex3D::interleave(&data);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].uv, [0.25, 0.75]);
        assert_eq!(vertices[1].normal, [0.0; 3]);
    }
}
