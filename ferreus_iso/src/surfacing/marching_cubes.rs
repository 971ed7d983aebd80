/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements marching cubes over a scalar field for a single iso level.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::collections::HashMap;

use super::lookup_tables::{CUBE_CORNERS, CUBE_EDGES, EDGE_TABLE, TRI_TABLE};
use crate::{error::ExtractionError, grid::ScalarField};

/// Triangle mesh in fractional grid-index coordinates, as produced by
/// [`marching_cubes`]. Vertices may contain NaN where the field is undefined.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshFragment {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[usize; 3]>,
}

impl MeshFragment {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Extracts the `level` iso-surface of `field`.
///
/// A corner is inside when its value is below `level`; NaN corners are never
/// inside. Vertices are placed by linear interpolation along crossed edges and
/// shared between neighbouring cubes. A vertex that falls on a sample equal to
/// `level` is shared by every edge meeting there, and triangles that collapse
/// onto it are dropped. Faces are wound so their normals point towards
/// decreasing values.
///
/// Returns [`ExtractionError::GridTooSmall`] if the field has fewer than two
/// samples along any axis and [`ExtractionError::NoSurface`] if no triangle is
/// produced.
pub fn marching_cubes(field: &ScalarField, level: f64) -> Result<MeshFragment, ExtractionError> {
    let shape = field.shape();
    if shape.iter().any(|&n| n < 2) {
        return Err(ExtractionError::GridTooSmall { shape });
    }

    let [n0, n1, n2] = shape;
    let mut mesh = MeshFragment::default();

    // (linear index of the edge's lower corner, edge axis) -> vertex index.
    // Axis 3 marks a vertex sitting exactly on the sample at that index.
    let mut edge_vertices: HashMap<(usize, usize), usize> = HashMap::new();

    for k in 0..n2 - 1 {
        for j in 0..n1 - 1 {
            for i in 0..n0 - 1 {
                let corners = CUBE_CORNERS.map(|[di, dj, dk]| [i + di, j + dj, k + dk]);
                let values = corners.map(|[ci, cj, ck]| field.get(ci, cj, ck));

                let case = values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v < level)
                    .fold(0usize, |case, (corner, _)| case | (1 << corner));

                if EDGE_TABLE[case] == 0 {
                    continue;
                }

                let mut cube_vertices = [usize::MAX; 12];
                for (edge, &[a, b]) in CUBE_EDGES.iter().enumerate() {
                    if EDGE_TABLE[case] & (1 << edge) == 0 {
                        continue;
                    }

                    // Interpolate from the lower corner so a shared edge gives
                    // the same vertex from every cube.
                    let (lo, hi) = if corners[a] <= corners[b] { (a, b) } else { (b, a) };
                    let axis = (0..3)
                        .find(|&d| corners[lo][d] != corners[hi][d])
                        .unwrap_or(0);
                    let (v0, v1) = (values[lo], values[hi]);
                    let t = (level - v0) / (v1 - v0);

                    // A vertex landing on a sample is keyed by that sample,
                    // so every edge meeting there reuses it.
                    let (key, position) = if t <= 0.0 || t >= 1.0 {
                        let corner = if t <= 0.0 { corners[lo] } else { corners[hi] };
                        let [ci, cj, ck] = corner;
                        ((field.index(ci, cj, ck), 3), corner.map(|c| c as f64))
                    } else {
                        let [li, lj, lk] = corners[lo];
                        let mut position = corners[lo].map(|c| c as f64);
                        position[axis] += t;
                        ((field.index(li, lj, lk), axis), position)
                    };

                    cube_vertices[edge] = *edge_vertices.entry(key).or_insert_with(|| {
                        mesh.vertices.push(position);
                        mesh.vertices.len() - 1
                    });
                }

                for triangle in TRI_TABLE[case].chunks_exact(3) {
                    if triangle[0] < 0 {
                        break;
                    }
                    let [a, b, c] = [0, 1, 2].map(|n| cube_vertices[triangle[n] as usize]);

                    // collapsed onto a sample
                    if a == b || b == c || a == c {
                        continue;
                    }
                    mesh.faces.push([a, b, c]);
                }
            }
        }
    }

    if mesh.faces.is_empty() {
        return Err(ExtractionError::NoSurface { level });
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn field_from_fn(shape: [usize; 3], f: impl Fn(f64, f64, f64) -> f64) -> ScalarField {
        let [n0, n1, n2] = shape;
        let mut values = Vec::with_capacity(n0 * n1 * n2);
        for k in 0..n2 {
            for j in 0..n1 {
                for i in 0..n0 {
                    values.push(f(i as f64, j as f64, k as f64));
                }
            }
        }
        ScalarField::new(shape, values).unwrap()
    }

    fn sphere(n: usize) -> ScalarField {
        let c = (n - 1) as f64 / 2.0;
        field_from_fn([n, n, n], |x, y, z| {
            ((x - c).powi(2) + (y - c).powi(2) + (z - c).powi(2)).sqrt()
        })
    }

    fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn sphere_is_closed_and_consistently_wound() {
        let mesh = marching_cubes(&sphere(9), 3.2).unwrap();

        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        for f in &mesh.faces {
            for e in 0..3 {
                *directed.entry((f[e], f[(e + 1) % 3])).or_default() += 1;
            }
        }
        for (&(a, b), &count) in &directed {
            assert_eq!(count, 1);
            assert_eq!(directed.get(&(b, a)), Some(&1));
        }
    }

    fn assert_unique_vertices(mesh: &MeshFragment) {
        let mut seen = mesh.vertices.clone();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seen.dedup();
        assert_eq!(seen.len(), mesh.vertices.len());
    }

    fn assert_on_sphere(mesh: &MeshFragment, radius: f64) {
        // Every vertex sits on the sphere up to linear interpolation error.
        for v in &mesh.vertices {
            let r = ((v[0] - 4.0).powi(2) + (v[1] - 4.0).powi(2) + (v[2] - 4.0).powi(2)).sqrt();
            assert!((r - radius).abs() < 0.2, "radius {r}");
        }
    }

    #[test]
    fn shared_edges_produce_one_vertex() {
        let mesh = marching_cubes(&sphere(9), 3.2).unwrap();
        assert_unique_vertices(&mesh);
        assert_on_sphere(&mesh, 3.2);
    }

    #[test]
    fn level_on_samples_shares_sample_vertices() {
        // Several lattice samples lie exactly at distance 3 from the centre.
        let mesh = marching_cubes(&sphere(9), 3.0).unwrap();

        assert_unique_vertices(&mesh);
        assert_on_sphere(&mesh, 3.0);
        assert!(mesh.vertices.contains(&[4.0, 4.0, 7.0]));
        for f in &mesh.faces {
            assert!(f[0] != f[1] && f[1] != f[2] && f[0] != f[2]);
            assert!(f.iter().all(|&v| v < mesh.vertices.len()));
        }
    }

    #[test]
    fn level_at_maximum_sits_on_samples() {
        // Integer data with the level at its maximum: the surface runs
        // through the x = 3 samples.
        let field = field_from_fn([4, 3, 3], |x, _, _| x);
        let mesh = marching_cubes(&field, 3.0).unwrap();

        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.faces.len(), 8);
        assert!(mesh.vertices.iter().all(|v| v[0] == 3.0));

        for f in &mesh.faces {
            let [a, b, c] = f.map(|v| mesh.vertices[v]);
            let normal = cross(sub(b, a), sub(c, a));
            assert!(normal[0] < 0.0);
        }
    }

    #[test]
    fn normals_point_towards_lower_values() {
        // Values increase with x; the plane sits at x = 1.25.
        let field = field_from_fn([4, 3, 3], |x, _, _| x);
        let mesh = marching_cubes(&field, 1.25).unwrap();

        for f in &mesh.faces {
            let [a, b, c] = f.map(|v| mesh.vertices[v]);
            assert!((a[0] - 1.25).abs() < 1e-12);
            let normal = cross(sub(b, a), sub(c, a));
            assert!(normal[0] < 0.0);
        }
    }

    #[test]
    fn level_at_minimum_touches_without_crossing() {
        let field = field_from_fn([3, 3, 3], |x, _, _| x);
        assert_eq!(
            marching_cubes(&field, 0.0),
            Err(ExtractionError::NoSurface { level: 0.0 })
        );

        let constant = field_from_fn([3, 3, 3], |_, _, _| 2.0);
        assert!(marching_cubes(&constant, 2.0).is_err());
    }

    #[test]
    fn small_grids_are_rejected() {
        let field = field_from_fn([1, 4, 4], |_, y, _| y);
        assert_eq!(
            marching_cubes(&field, 1.5),
            Err(ExtractionError::GridTooSmall { shape: [1, 4, 4] })
        );
    }

    #[test]
    fn nan_corners_give_nan_vertices() {
        let field = field_from_fn([3, 2, 2], |x, _, _| if x > 1.5 { f64::NAN } else { x });
        let mesh = marching_cubes(&field, 0.5).unwrap();

        assert!(mesh.vertices.iter().any(|v| v[0] == 0.5));

        let field = field_from_fn([3, 2, 2], |x, _, _| if x > 1.5 { f64::NAN } else { 0.0 });
        let mesh = marching_cubes(&field, 0.5).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.iter().any(|c| c.is_nan())));
    }
}
