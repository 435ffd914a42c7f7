//! Polygon triangulation for text caps.
//!
//! Holes are first merged into the outer ring through bridge edges, then the
//! resulting simple ring is ear-clipped. Glyph contours are small (tens of
//! points), so the quadratic visibility and ear searches are fine here.

/// Signed area of a closed ring, positive for counter-clockwise winding.
pub fn signed_area(ring: &[[f32; 2]]) -> f32 {
    let mut area = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = ring[(i + 1) % ring.len()];
        area += p[0] * q[1] - q[0] * p[1];
    }
    area * 0.5
}

/// Even-odd point-in-polygon test.
pub fn contains_point(ring: &[[f32; 2]], point: [f32; 2]) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, a) in ring.iter().enumerate() {
        let b = ring[j];
        if (a[1] > point[1]) != (b[1] > point[1]) {
            let x = (b[0] - a[0]) * (point[1] - a[1]) / (b[1] - a[1]) + a[0];
            if point[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Triangulates `outer` (counter-clockwise) with `holes` (clockwise).
///
/// Indices address the concatenation `outer ++ holes[0] ++ holes[1] ...`,
/// and every triangle winds counter-clockwise.
pub fn triangulate(outer: &[[f32; 2]], holes: &[Vec<[f32; 2]>]) -> Vec<[u32; 3]> {
    if outer.len() < 3 {
        return Vec::new();
    }

    let mut points: Vec<[f32; 2]> = outer.to_vec();
    let mut ring: Vec<usize> = (0..outer.len()).collect();

    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        let start = points.len();
        points.extend_from_slice(hole);
        hole_rings.push((start..points.len()).collect());
    }

    // Rightmost holes first so later bridges never cross earlier ones.
    hole_rings.sort_by(|a, b| {
        let ax = max_x(&points, a);
        let bx = max_x(&points, b);
        bx.total_cmp(&ax)
    });

    for (index, hole) in hole_rings.iter().enumerate() {
        bridge_hole(&points, &mut ring, hole, &hole_rings[index + 1..]);
    }

    clip_ears(&points, ring)
}

fn max_x(points: &[[f32; 2]], ring: &[usize]) -> f32 {
    ring.iter()
        .map(|&i| points[i][0])
        .fold(f32::NEG_INFINITY, f32::max)
}

fn bridge_hole(points: &[[f32; 2]], ring: &mut Vec<usize>, hole: &[usize], pending: &[Vec<usize>]) {
    let Some((hole_start, &anchor)) = hole
        .iter()
        .enumerate()
        .max_by(|a, b| points[*a.1][0].total_cmp(&points[*b.1][0]))
    else {
        return;
    };
    let m = points[anchor];

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        distance_sq(points[ring[a]], m).total_cmp(&distance_sq(points[ring[b]], m))
    });

    let visible = candidates.iter().copied().find(|&position| {
        let p = points[ring[position]];
        !crosses_ring(points, ring, m, p)
            && !crosses_ring(points, hole, m, p)
            && !pending.iter().any(|other| crosses_ring(points, other, m, p))
    });
    let position = visible.unwrap_or(candidates[0]);

    // ... P, M, hole..., M, P, ...
    let mut splice = Vec::with_capacity(hole.len() + 2);
    for offset in 0..=hole.len() {
        splice.push(hole[(hole_start + offset) % hole.len()]);
    }
    splice.push(ring[position]);
    ring.splice(position + 1..position + 1, splice);
}

fn crosses_ring(points: &[[f32; 2]], ring: &[usize], a: [f32; 2], b: [f32; 2]) -> bool {
    (0..ring.len()).any(|i| {
        let c = points[ring[i]];
        let d = points[ring[(i + 1) % ring.len()]];
        if same(c, a) || same(c, b) || same(d, a) || same(d, b) {
            return false;
        }
        segments_intersect(a, b, c, d)
    })
}

fn clip_ears(points: &[[f32; 2]], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));

    while ring.len() > 3 {
        let n = ring.len();
        let ear = (0..n).find(|&i| is_ear(points, &ring, i));
        let i = ear.unwrap_or_else(|| least_degenerate(points, &ring));
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        if cross(points[prev], points[ring[i]], points[next]) > 0.0 {
            triangles.push([prev as u32, ring[i] as u32, next as u32]);
        }
        ring.remove(i);
    }

    if ring.len() == 3 && cross(points[ring[0]], points[ring[1]], points[ring[2]]) > 0.0 {
        triangles.push([ring[0] as u32, ring[1] as u32, ring[2] as u32]);
    }
    triangles
}

fn is_ear(points: &[[f32; 2]], ring: &[usize], i: usize) -> bool {
    let n = ring.len();
    let a = points[ring[(i + n - 1) % n]];
    let b = points[ring[i]];
    let c = points[ring[(i + 1) % n]];
    if cross(a, b, c) <= 0.0 {
        return false;
    }
    ring.iter().all(|&index| {
        let p = points[index];
        same(p, a) || same(p, b) || same(p, c) || !in_triangle(a, b, c, p)
    })
}

/// Fallback when no proper ear exists (numerically degenerate input).
fn least_degenerate(points: &[[f32; 2]], ring: &[usize]) -> usize {
    let n = ring.len();
    (0..n)
        .min_by(|&x, &y| {
            let area = |i: usize| {
                cross(
                    points[ring[(i + n - 1) % n]],
                    points[ring[i]],
                    points[ring[(i + 1) % n]],
                )
                .abs()
            };
            area(x).total_cmp(&area(y))
        })
        .unwrap_or(0)
}

fn cross(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn in_triangle(a: [f32; 2], b: [f32; 2], c: [f32; 2], p: [f32; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

fn segments_intersect(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn same(a: [f32; 2], b: [f32; 2]) -> bool {
    a[0] == b[0] && a[1] == b[1]
}

fn distance_sq(a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}
