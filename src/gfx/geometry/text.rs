//! # Extruded Text
//!
//! Glyph outlines are flattened into closed contours, grouped into solid
//! shapes with holes, capped front and back, and joined by side walls. An
//! optional bevel adds `bevel_segments` layers on each side following a
//! quarter circle: depth grows with the cosine, outward offset with the sine.

use std::f32::consts::FRAC_PI_2;

use rusttype::{Font, OutlineBuilder, Scale};

use super::triangulate::{contains_point, signed_area, triangulate};
use super::GeometryData;

/// A closed polygon in the text plane, y up. The closing edge is implicit.
pub type Contour = Vec<[f32; 2]>;

/// Parameters of an extruded text mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDescriptor {
    pub content: String,
    /// Em size in scene units.
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextDescriptor {
    fn default() -> Self {
        Self {
            content: String::new(),
            size: 1.0,
            depth: 0.15,
            curve_segments: 5,
            bevel_enabled: true,
            bevel_thickness: 0.02,
            bevel_size: 0.015,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

/// Anything that can lay out a string as flattened glyph contours.
pub trait OutlineSource {
    /// Contours of `text` at em size `size`, curves split into
    /// `curve_segments` straight pieces. Lines are separated by `\n`.
    fn outline(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Contour>;
}

impl OutlineSource for Font<'_> {
    fn outline(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Contour> {
        let units = f32::from(self.units_per_em().max(1));
        let metrics = self.v_metrics_unscaled();
        let scale = Scale::uniform(size * (metrics.ascent - metrics.descent) / units);
        let line_height = size * (metrics.ascent - metrics.descent + metrics.line_gap) / units;

        let mut flattener = ContourFlattener::new(curve_segments);
        for (row, line) in text.split('\n').enumerate() {
            let mut caret = 0.0;
            let mut previous = None;
            for ch in line.chars() {
                let glyph = self.glyph(ch).scaled(scale);
                if let Some(previous) = previous {
                    caret += self.pair_kerning(scale, previous, glyph.id());
                }
                flattener.origin = [caret, -(row as f32) * line_height];
                glyph.build_outline(&mut flattener);
                flattener.finish_contour();
                caret += glyph.h_metrics().advance_width;
                previous = Some(glyph.id());
            }
        }
        flattener.contours
    }
}

/// Collects outline callbacks into flattened contours.
struct ContourFlattener {
    curve_segments: u32,
    origin: [f32; 2],
    cursor: [f32; 2],
    current: Contour,
    contours: Vec<Contour>,
}

impl ContourFlattener {
    fn new(curve_segments: u32) -> Self {
        Self {
            curve_segments: curve_segments.max(1),
            origin: [0.0, 0.0],
            cursor: [0.0, 0.0],
            current: Vec::new(),
            contours: Vec::new(),
        }
    }

    fn push(&mut self, x: f32, y: f32) {
        self.cursor = [x, y];
        // rusttype emits y-down coordinates.
        let point = [self.origin[0] + x, self.origin[1] - y];
        if self.current.last() != Some(&point) {
            self.current.push(point);
        }
    }

    fn finish_contour(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
    }
}

impl OutlineBuilder for ContourFlattener {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish_contour();
        self.push(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let [x0, y0] = self.cursor;
        let n = self.curve_segments;
        for i in 1..=n {
            let t = i as f32 / n as f32;
            let mt = 1.0 - t;
            self.push(
                mt * mt * x0 + 2.0 * mt * t * x1 + t * t * x,
                mt * mt * y0 + 2.0 * mt * t * y1 + t * t * y,
            );
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let [x0, y0] = self.cursor;
        let n = self.curve_segments;
        for i in 1..=n {
            let t = i as f32 / n as f32;
            let mt = 1.0 - t;
            let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
            self.push(
                a * x0 + b * x1 + c * x2 + d * x,
                a * y0 + b * y1 + c * y2 + d * y,
            );
        }
    }

    fn close(&mut self) {
        self.finish_contour();
    }
}

/// A solid region: counter-clockwise outer ring and clockwise holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

/// Groups contours into shapes by containment depth: even depth is solid,
/// odd depth is a hole of the smallest enclosing solid one level up.
pub fn group_shapes(contours: Vec<Contour>) -> Vec<Shape> {
    let contours: Vec<Contour> = contours
        .into_iter()
        .filter(|c| c.len() >= 3 && signed_area(c).abs() > f32::EPSILON)
        .collect();
    let areas: Vec<f32> = contours.iter().map(|c| signed_area(c).abs()).collect();
    let depths: Vec<usize> = contours
        .iter()
        .enumerate()
        .map(|(i, c)| {
            contours
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && contains_point(other, c[0]))
                .count()
        })
        .collect();

    let mut shape_of = vec![None; contours.len()];
    let mut shapes = Vec::new();
    for (i, contour) in contours.iter().enumerate() {
        if depths[i] % 2 == 0 {
            shape_of[i] = Some(shapes.len());
            shapes.push(Shape {
                outer: wound(contour.clone(), true),
                holes: Vec::new(),
            });
        }
    }
    for (i, contour) in contours.iter().enumerate() {
        if depths[i] % 2 == 0 {
            continue;
        }
        let parent = (0..contours.len())
            .filter(|&j| depths[j] + 1 == depths[i] && contains_point(&contours[j], contour[0]))
            .min_by(|&a, &b| areas[a].total_cmp(&areas[b]))
            .and_then(|j| shape_of[j]);
        if let Some(parent) = parent {
            shapes[parent].holes.push(wound(contour.clone(), false));
        }
    }
    shapes
}

fn wound(mut contour: Contour, counter_clockwise: bool) -> Contour {
    if (signed_area(&contour) > 0.0) != counter_clockwise {
        contour.reverse();
    }
    contour
}

/// Builds a centred, extruded text mesh. Empty or blank content yields empty
/// geometry.
pub fn build_text_geometry(source: &dyn OutlineSource, descriptor: &TextDescriptor) -> GeometryData {
    let contours = source.outline(&descriptor.content, descriptor.size, descriptor.curve_segments);
    let shapes = group_shapes(contours);

    let mut data = GeometryData::new();
    let layers = extrusion_layers(descriptor);
    for shape in &shapes {
        extrude_shape(&mut data, shape, &layers);
    }
    data.center();
    data
}

/// (z, outward offset) for every ring of vertices, front to back.
fn extrusion_layers(descriptor: &TextDescriptor) -> Vec<(f32, f32)> {
    let depth = descriptor.depth;
    if !descriptor.bevel_enabled {
        return vec![(0.0, 0.0), (depth, 0.0)];
    }

    let segments = descriptor.bevel_segments;
    let thickness = descriptor.bevel_thickness;
    let full = descriptor.bevel_size + descriptor.bevel_offset;
    let profile = |b: u32| {
        let t = b as f32 / segments as f32 * FRAC_PI_2;
        (
            thickness * t.cos(),
            descriptor.bevel_size * t.sin() + descriptor.bevel_offset,
        )
    };

    let mut layers = Vec::with_capacity(segments as usize * 2 + 2);
    for b in 0..segments {
        let (z, offset) = profile(b);
        layers.push((-z, offset));
    }
    layers.push((0.0, full));
    layers.push((depth, full));
    for b in (0..segments).rev() {
        let (z, offset) = profile(b);
        layers.push((depth + z, offset));
    }
    layers
}

fn extrude_shape(data: &mut GeometryData, shape: &Shape, layers: &[(f32, f32)]) {
    let rings: Vec<&Contour> = std::iter::once(&shape.outer).chain(&shape.holes).collect();
    let base: Vec<[f32; 2]> = rings.iter().flat_map(|r| r.iter().copied()).collect();
    let movements: Vec<[f32; 2]> = rings.iter().flat_map(|r| bevel_vectors(r)).collect();
    let at = |index: usize, (z, offset): (f32, f32)| {
        [
            base[index][0] + movements[index][0] * offset,
            base[index][1] + movements[index][1] * offset,
            z,
        ]
    };

    let triangles = triangulate(&shape.outer, &shape.holes);
    if let (Some(&front), Some(&back)) = (layers.first(), layers.last()) {
        for [a, b, c] in &triangles {
            for (index, layer, normal) in [
                ([*c, *b, *a], front, [0.0, 0.0, -1.0]),
                ([*a, *b, *c], back, [0.0, 0.0, 1.0]),
            ] {
                for i in index {
                    let position = at(i as usize, layer);
                    let vertex = data.push_vertex(position, normal, [position[0], position[1]]);
                    data.indices.push(vertex);
                }
            }
        }
    }

    let mut start = 0;
    for ring in &rings {
        let n = ring.len();
        for i in 0..n {
            let (p, q) = (start + i, start + (i + 1) % n);
            for pair in layers.windows(2) {
                let a = at(p, pair[0]);
                let b = at(q, pair[0]);
                let c = at(q, pair[1]);
                let d = at(p, pair[1]);
                push_flat_triangle(data, a, b, c);
                push_flat_triangle(data, a, c, d);
            }
        }
        start += n;
    }
}

fn push_flat_triangle(data: &mut GeometryData, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if length <= 1e-12 {
        return;
    }
    let normal = [n[0] / length, n[1] / length, n[2] / length];
    for position in [a, b, c] {
        let vertex = data.push_vertex(position, normal, [position[0], position[2]]);
        data.indices.push(vertex);
    }
}

/// Per-vertex shift that moves both adjacent edges outward by one unit.
/// Rings keep the solid on their left, so the right-hand normal points away
/// from it.
fn bevel_vectors(ring: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let n1 = edge_normal(prev, cur);
            let n2 = edge_normal(cur, next);
            let sum = [n1[0] + n2[0], n1[1] + n2[1]];
            let length_sq = sum[0] * sum[0] + sum[1] * sum[1];
            if length_sq < 1e-6 {
                return n1;
            }
            // Miter length 2/|n1 + n2|, capped at sharp corners.
            let scale = (2.0 / length_sq).min(3.0 / length_sq.sqrt());
            [sum[0] * scale, sum[1] * scale]
        })
        .collect()
}

fn edge_normal(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return [0.0, 0.0];
    }
    [dy / length, -dx / length]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every visible character is a 0.8 x 1.0 block with a rectangular hole.
    /// Outer rings are emitted clockwise to exercise winding normalisation.
    pub(crate) struct BlockFont;

    impl OutlineSource for BlockFont {
        fn outline(&self, text: &str, size: f32, _curve_segments: u32) -> Vec<Contour> {
            let mut contours = Vec::new();
            for (i, ch) in text.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let x = i as f32 * size;
                let rect = |x0: f32, y0: f32, x1: f32, y1: f32| {
                    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
                };
                let mut outer = rect(x, 0.0, x + 0.8 * size, size);
                outer.reverse();
                contours.push(outer);
                contours.push(rect(x + 0.2 * size, 0.2 * size, x + 0.6 * size, 0.8 * size));
            }
            contours
        }
    }

    fn flat(content: &str) -> TextDescriptor {
        TextDescriptor {
            content: content.to_string(),
            size: 1.0,
            depth: 0.2,
            bevel_enabled: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_text_is_centred_on_its_bounding_box() {
        let data = build_text_geometry(&BlockFont, &flat("AB"));
        let bounds = data.bounding_box().unwrap();

        for axis in 0..3 {
            assert!(bounds.center()[axis].abs() < 1e-5);
        }
        let size = bounds.size();
        assert!((size[0] - 1.8).abs() < 1e-5);
        assert!((size[1] - 1.0).abs() < 1e-5);
        assert!((size[2] - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_bevel_grows_every_axis() {
        let mut descriptor = flat("A");
        descriptor.bevel_enabled = true;
        descriptor.bevel_thickness = 0.02;
        descriptor.bevel_size = 0.015;
        descriptor.bevel_segments = 3;

        let size = build_text_geometry(&BlockFont, &descriptor)
            .bounding_box()
            .unwrap()
            .size();
        assert!((size[0] - (0.8 + 0.03)).abs() < 1e-4);
        assert!((size[1] - (1.0 + 0.03)).abs() < 1e-4);
        assert!((size[2] - (0.2 + 0.04)).abs() < 1e-4);
    }

    #[test]
    fn test_bevel_layer_profile() {
        let mut descriptor = flat("A");
        descriptor.bevel_enabled = true;
        descriptor.bevel_segments = 3;
        let layers = extrusion_layers(&descriptor);

        assert_eq!(layers.len(), 3 * 2 + 2);
        assert!((layers[0].0 + descriptor.bevel_thickness).abs() < 1e-6);
        assert_eq!(layers[0].1, 0.0);
        assert!(layers.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert!(build_text_geometry(&BlockFont, &flat("")).is_empty());
        assert!(build_text_geometry(&BlockFont, &flat("   ")).is_empty());
    }

    #[test]
    fn test_group_shapes_pairs_holes_with_outers() {
        let shapes = group_shapes(BlockFont.outline("AB", 1.0, 5));
        assert_eq!(shapes.len(), 2);
        for shape in &shapes {
            assert_eq!(shape.holes.len(), 1);
            assert!(signed_area(&shape.outer) > 0.0);
            assert!(signed_area(&shape.holes[0]) < 0.0);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let data = build_text_geometry(&BlockFont, &TextDescriptor {
            content: "Hi".into(),
            ..Default::default()
        });
        assert!(!data.is_empty());
        for n in &data.normals {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_quadratic_curves_are_flattened() {
        let mut flattener = ContourFlattener::new(5);
        flattener.move_to(0.0, 0.0);
        flattener.quad_to(1.0, -1.0, 2.0, 0.0);
        flattener.line_to(1.0, 1.0);
        flattener.close();

        assert_eq!(flattener.contours.len(), 1);
        // Start point, five curve steps, one line point.
        assert_eq!(flattener.contours[0].len(), 7);
        assert_eq!(flattener.contours[0][5], [2.0, 0.0]);
    }
}
