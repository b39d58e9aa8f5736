//! Triangulation of region outlines into fill meshes.
//!
//! Region polygons are concave, so fills go through ear clipping. The
//! tessellator works on a single exterior ring; multi-part regions get one
//! sub-mesh per ring, merged with index offsets.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Ear-clip a simple polygon ring into triangles, returned as index triples
/// into `ring`. Winding of the input does not matter. Produces n-2 triangles
/// for a simple polygon; on degenerate input it clips what it can and fans
/// the remainder so the mesh is never left with holes.
pub fn triangulate(ring: &[Vec2]) -> Vec<[u32; 3]> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }

    // Work on a CCW index list.
    let mut indices: Vec<u32> = if signed_area(ring) >= 0.0 {
        (0..n as u32).collect()
    } else {
        (0..n as u32).rev().collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);
    let mut stuck_passes = 0;
    while indices.len() > 3 && stuck_passes < 2 {
        let m = indices.len();
        let mut clipped = false;
        for i in 0..m {
            let prev = ring[indices[(i + m - 1) % m] as usize];
            let cur = ring[indices[i] as usize];
            let next = ring[indices[(i + 1) % m] as usize];

            // Reflex corner: not an ear.
            if cross(prev, cur, next) <= 0.0 {
                continue;
            }
            // Any other remaining vertex inside the candidate ear blocks it.
            let blocked = indices.iter().enumerate().any(|(j, &idx)| {
                if j == (i + m - 1) % m || j == i || j == (i + 1) % m {
                    return false;
                }
                point_in_triangle(ring[idx as usize], prev, cur, next)
            });
            if blocked {
                continue;
            }

            triangles.push([
                indices[(i + m - 1) % m],
                indices[i],
                indices[(i + 1) % m],
            ]);
            indices.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            stuck_passes += 1;
        }
    }

    if indices.len() == 3 {
        triangles.push([indices[0], indices[1], indices[2]]);
    } else {
        // Degenerate leftover (collinear runs, self-touching input): fan it.
        for w in indices.windows(3) {
            triangles.push([indices[0], w[1], w[2]]);
        }
    }
    triangles
}

/// Build a flat fill mesh for a multi-ring region outline, already projected
/// to world space.
pub fn build_fill_mesh(rings: &[Vec<Vec2>]) -> Mesh {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for ring in rings {
        let base = positions.len() as u32;
        positions.extend(ring.iter().map(|p| [p.x, p.y, 0.0]));
        for tri in triangulate(ring) {
            indices.extend(tri.iter().map(|i| base + i));
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_area(ring: &[Vec2], tri: [u32; 3]) -> f32 {
        let [a, b, c] = tri.map(|i| ring[i as usize]);
        cross(a, b, c).abs() * 0.5
    }

    fn total_area(ring: &[Vec2], triangles: &[[u32; 3]]) -> f32 {
        triangles.iter().map(|&t| triangle_area(ring, t)).sum()
    }

    #[test]
    fn test_square() {
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 2);
        assert!((total_area(&ring, &triangles) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_clockwise_input() {
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 0.0),
        ];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 2);
        assert!((total_area(&ring, &triangles) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_concave_l_shape() {
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 4);
        // L-shape area: 3x1 + 1x2 = 5.
        assert!((total_area(&ring, &triangles) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X]).is_empty());
    }

    #[test]
    fn test_fill_mesh_merges_rings() {
        let rings = vec![
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
            ],
            vec![
                Vec2::new(5.0, 5.0),
                Vec2::new(6.0, 5.0),
                Vec2::new(6.0, 6.0),
            ],
        ];
        let mesh = build_fill_mesh(&rings);
        assert_eq!(mesh.count_vertices(), 6);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        // One triangle per ring, second offset past the first ring's vertices.
        assert_eq!(indices.len(), 6);
        assert!(indices[3..].iter().all(|&i| i >= 3));
    }
}
