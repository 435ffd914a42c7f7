//! # Procedural Geometry Generation
//!
//! Every mesh in the sketches is generated at run time: boxes, spheres, tori,
//! cones and planes from [`Primitive`], extruded text from [`TextDescriptor`].
//! Generated data is immutable once inserted into a [`GeometryStore`] and is
//! shared between scene objects by [`GeometryId`].
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::gfx::geometry::{GeometryStore, Primitive};
//!
//! let mut store = GeometryStore::default();
//! let torus = store.insert_primitive(Primitive::torus(0.5, 0.25, 20, 45));
//! assert_eq!(store.live_count(), 1);
//! assert!(store.get(torus).is_some());
//! ```

pub mod primitives;
pub mod store;
pub mod text;
pub mod triangulate;

use std::collections::HashSet;

pub use primitives::Primitive;
pub use store::{GeometryId, GeometryResource, GeometryStore};
pub use text::{build_text_geometry, Contour, OutlineSource, TextDescriptor};

/// What a stored geometry was generated from.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDescriptor {
    Primitive(Primitive),
    Text(TextDescriptor),
}

/// Axis-aligned bounds of a vertex set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    /// Bounds of all vertices, `None` for an empty geometry.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.vertices.first()?;
        let mut bounds = BoundingBox {
            min: first,
            max: first,
        };
        for vertex in &self.vertices[1..] {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(vertex[axis]);
                bounds.max[axis] = bounds.max[axis].max(vertex[axis]);
            }
        }
        Some(bounds)
    }

    /// Translates the vertices so the bounding-box centre sits at the origin.
    pub fn center(&mut self) {
        let Some(bounds) = self.bounding_box() else {
            return;
        };
        let offset = bounds.center();
        for vertex in &mut self.vertices {
            vertex[0] -= offset[0];
            vertex[1] -= offset[1];
            vertex[2] -= offset[2];
        }
    }

    /// Unique triangle edges as a line list, in first-seen order.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_moves_bounds_to_origin() {
        let mut data = GeometryData::new();
        data.push_vertex([1.0, 2.0, 3.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        data.push_vertex([3.0, 6.0, 4.0], [0.0, 0.0, 1.0], [1.0, 1.0]);
        data.center();

        let bounds = data.bounding_box().unwrap();
        assert_eq!(bounds.center(), [0.0, 0.0, 0.0]);
        assert_eq!(bounds.size(), [2.0, 4.0, 1.0]);
    }

    #[test]
    fn test_center_on_empty_geometry_is_noop() {
        let mut data = GeometryData::new();
        data.center();
        assert!(data.bounding_box().is_none());
        assert!(data.is_empty());
    }

    #[test]
    fn test_wireframe_indices_share_edges() {
        let mut data = GeometryData::new();
        for position in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            data.push_vertex(position, [0.0, 0.0, 1.0], [0.0, 0.0]);
        }
        data.indices = vec![0, 1, 2, 0, 2, 3];

        // Two triangles of a quad share the diagonal: 5 unique edges.
        assert_eq!(data.wireframe_indices().len(), 10);
    }
}
