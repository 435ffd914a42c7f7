//! # Primitive Shape Generation
//!
//! Boxes, spheres, tori, cones and planes with the vertex layout and segment
//! conventions of three.js, so segment counts read the same as in a browser
//! sketch. All shapes are centred at the origin with outward normals and UVs
//! in `[0, 1]`.

use super::GeometryData;
use std::f32::consts::PI;

/// Parameters of a procedural shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Box {
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Primitive {
    /// A box with the same number of segments along every axis.
    pub fn cube(width: f32, height: f32, depth: f32, segments: u32) -> Self {
        Self::Box {
            width,
            height,
            depth,
            width_segments: segments,
            height_segments: segments,
            depth_segments: segments,
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        Self::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        }
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::Cone {
            radius,
            height,
            radial_segments,
        }
    }

    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Plane {
            width,
            height,
            width_segments,
            height_segments,
        }
    }

    pub fn generate(&self) -> GeometryData {
        match *self {
            Primitive::Box {
                width,
                height,
                depth,
                width_segments,
                height_segments,
                depth_segments,
            } => generate_box(
                [width, height, depth],
                [width_segments, height_segments, depth_segments],
            ),
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
            Primitive::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => generate_torus(radius, tube, radial_segments, tubular_segments),
            Primitive::Cone {
                radius,
                height,
                radial_segments,
            } => generate_cone(radius, height, radial_segments),
            Primitive::Plane {
                width,
                height,
                width_segments,
                height_segments,
            } => generate_plane(width, height, width_segments, height_segments),
        }
    }
}

/// Generate a box from six subdivided faces.
///
/// `size` and `segments` are ordered (x, y, z). Each face owns its vertices
/// so normals stay flat across edges.
pub fn generate_box(size: [f32; 3], segments: [u32; 3]) -> GeometryData {
    let [width, height, depth] = size;
    let [ws, hs, ds] = segments.map(|s| s.max(1));
    let mut data = GeometryData::new();

    // (u axis, v axis, w axis, u dir, v dir, face width, face height, face depth, grid x, grid y)
    let faces = [
        (2, 1, 0, -1.0, -1.0, depth, height, width, ds, hs),
        (2, 1, 0, 1.0, -1.0, depth, height, -width, ds, hs),
        (0, 2, 1, 1.0, 1.0, width, depth, height, ws, ds),
        (0, 2, 1, 1.0, -1.0, width, depth, -height, ws, ds),
        (0, 1, 2, 1.0, -1.0, width, height, depth, ws, hs),
        (0, 1, 2, -1.0, -1.0, width, height, -depth, ws, hs),
    ];
    for (u, v, w, u_dir, v_dir, face_width, face_height, face_depth, grid_x, grid_y) in faces {
        build_face(
            &mut data,
            [u, v, w],
            [u_dir, v_dir],
            [face_width, face_height, face_depth],
            [grid_x, grid_y],
        );
    }
    data
}

fn build_face(
    data: &mut GeometryData,
    axes: [usize; 3],
    dirs: [f32; 2],
    extent: [f32; 3],
    grid: [u32; 2],
) {
    let [u, v, w] = axes;
    let [width, height, depth] = extent;
    let [grid_x, grid_y] = grid;
    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let offset = data.vertices.len() as u32;

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height * 0.5;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width * 0.5;
            let mut position = [0.0; 3];
            position[u] = x * dirs[0];
            position[v] = y * dirs[1];
            position[w] = depth * 0.5;
            let mut normal = [0.0; 3];
            normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };
            data.push_vertex(
                position,
                normal,
                [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
            );
        }
    }

    let row = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = offset + ix + row * iy;
            let b = offset + ix + row * (iy + 1);
            let c = offset + ix + 1 + row * (iy + 1);
            let d = offset + ix + 1 + row * iy;
            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

/// Generate a UV sphere.
///
/// Poles are degenerate rows: the first and last rings only emit one
/// triangle per segment.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut data = GeometryData::new();

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let u_offset = if iy == 0 {
            0.5 / ws as f32
        } else if iy == hs {
            -0.5 / ws as f32
        } else {
            0.0
        };
        let theta = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * 2.0 * PI;
            let position = [
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ];
            data.push_vertex(position, normalize(position), [u + u_offset, 1.0 - v]);
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    data
}

/// Generate a torus lying in the xy plane.
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let radial = radial_segments.max(2);
    let tubular = tubular_segments.max(3);
    let mut data = GeometryData::new();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let ring = radius + tube * v.cos();
            let position = [ring * u.cos(), ring * u.sin(), tube * v.sin()];
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = normalize([
                position[0] - center[0],
                position[1] - center[1],
                position[2] - center[2],
            ]);
            data.push_vertex(
                position,
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    data
}

/// Generate a cone with its apex on +y and a closed base cap.
pub fn generate_cone(radius: f32, height: f32, radial_segments: u32) -> GeometryData {
    let segments = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = radius / height;
    let mut data = GeometryData::new();

    // Side: two rings, apex (radius 0) and base.
    for ring in 0..=1u32 {
        let v = ring as f32;
        let ring_radius = v * radius;
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let theta = u * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            data.push_vertex(
                [ring_radius * sin, -v * height + half_height, ring_radius * cos],
                normalize([sin, slope, cos]),
                [u, 1.0 - v],
            );
        }
    }
    let row = segments + 1;
    for x in 0..segments {
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        // The apex row is degenerate: one triangle per segment.
        data.indices.extend_from_slice(&[b, c, d]);
    }

    // Base cap: a centre vertex per segment, then the rim.
    let center_start = data.vertices.len() as u32;
    for _ in 0..segments {
        data.push_vertex([0.0, -half_height, 0.0], [0.0, -1.0, 0.0], [0.5, 0.5]);
    }
    let rim_start = data.vertices.len() as u32;
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * 2.0 * PI;
        let (sin, cos) = theta.sin_cos();
        data.push_vertex(
            [radius * sin, -half_height, radius * cos],
            [0.0, -1.0, 0.0],
            [cos * 0.5 + 0.5, -sin * 0.5 + 0.5],
        );
    }
    for x in 0..segments {
        let center = center_start + x;
        let rim = rim_start + x;
        data.indices.extend_from_slice(&[rim + 1, rim, center]);
    }
    data
}

/// Generate a plane in the xy plane facing +z.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let grid_x = width_segments.max(1);
    let grid_y = height_segments.max(1);
    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let mut data = GeometryData::new();

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height * 0.5;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width * 0.5;
            data.push_vertex(
                [x, -y, 0.0],
                [0.0, 0.0, 1.0],
                [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
            );
        }
    }

    let row = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = ix + 1 + row * (iy + 1);
            let d = ix + 1 + row * iy;
            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    data
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length <= f32::EPSILON {
        return [0.0, 1.0, 0.0];
    }
    [v[0] / length, v[1] / length, v[2] / length]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(data: &GeometryData) {
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
        assert_eq!(data.indices.len() % 3, 0);
    }

    #[test]
    fn test_box_generation() {
        let data = Primitive::cube(1.0, 1.0, 1.0, 1).generate();
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        assert_indices_in_range(&data);

        let bounds = data.bounding_box().unwrap();
        assert_eq!(bounds.min, [-0.5, -0.5, -0.5]);
        assert_eq!(bounds.max, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_box_segments_scale_vertex_count() {
        let data = Primitive::cube(1.6, 1.6, 1.6, 6).generate();
        // Six faces of 7x7 vertices and 6x6 quads each.
        assert_eq!(data.vertex_count(), 6 * 49);
        assert_eq!(data.triangle_count(), 6 * 36 * 2);
        assert_indices_in_range(&data);
    }

    #[test]
    fn test_box_faces_point_outward() {
        let data = Primitive::cube(2.0, 2.0, 2.0, 1).generate();
        for (position, normal) in data.vertices.iter().zip(&data.normals) {
            let dot: f32 = (0..3).map(|i| position[i] * normal[i]).sum();
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let data = Primitive::sphere(1.0, 64, 64).generate();
        assert_eq!(data.vertex_count(), 65 * 65);
        // Pole rows contribute one triangle per segment.
        assert_eq!(data.triangle_count(), 64 * 62 * 2 + 64 * 2);
        assert_indices_in_range(&data);

        for vertex in &data.vertices {
            let r = (vertex[0].powi(2) + vertex[1].powi(2) + vertex[2].powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus_generation() {
        let data = Primitive::torus(0.5, 0.25, 20, 45).generate();
        assert_eq!(data.vertex_count(), 21 * 46);
        assert_eq!(data.triangle_count(), 20 * 45 * 2);
        assert_indices_in_range(&data);

        let bounds = data.bounding_box().unwrap();
        assert!((bounds.max[0] - 0.75).abs() < 1e-5);
        assert!((bounds.max[2] - 0.25).abs() < 1e-2);
    }

    #[test]
    fn test_cone_generation() {
        let data = Primitive::cone(0.9, 2.4, 32).generate();
        assert_eq!(data.vertex_count(), 2 * 33 + 32 + 33);
        assert_eq!(data.triangle_count(), 32 + 32);
        assert_indices_in_range(&data);

        let bounds = data.bounding_box().unwrap();
        assert!((bounds.max[1] - 1.2).abs() < 1e-5);
        assert!((bounds.min[1] + 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_plane_generation() {
        let data = Primitive::plane(1.0, 1.0, 100, 100).generate();
        assert_eq!(data.vertex_count(), 101 * 101);
        assert_eq!(data.triangle_count(), 100 * 100 * 2);
        assert!(data.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
        assert_indices_in_range(&data);
    }
}
