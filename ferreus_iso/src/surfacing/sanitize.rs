/////////////////////////////////////////////////////////////////////////////////////////////
//
// Removes undefined vertices, and the faces that use them, from extracted meshes.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use super::marching_cubes::MeshFragment;
use crate::error::ExtractionError;

/// A mesh with finite vertices and compact `u32` face indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SanitizedMesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl SanitizedMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

/// Drops every vertex with a NaN coordinate along with every face that
/// references one, then renumbers the surviving vertices in order.
///
/// Face indices outside the vertex list are treated like dead vertices.
pub fn remove_nan_vertices(fragment: MeshFragment) -> Result<SanitizedMesh, ExtractionError> {
    let MeshFragment { vertices, faces } = fragment;

    let alive: Vec<bool> = vertices
        .iter()
        .map(|v| !v.iter().any(|c| c.is_nan()))
        .collect();

    let num_alive = alive.iter().filter(|&&a| a).count();
    if num_alive > u32::MAX as usize {
        return Err(ExtractionError::IndexOverflow {
            num_vertices: num_alive,
        });
    }

    // Exclusive prefix sum over the liveness mask; dead slots never appear in
    // a surviving face.
    let mut new_index = vec![u32::MAX; vertices.len()];
    let mut next = 0u32;
    for (slot, &is_alive) in new_index.iter_mut().zip(&alive) {
        if is_alive {
            *slot = next;
            next += 1;
        }
    }

    let faces = faces
        .into_iter()
        .filter(|face| face.iter().all(|&v| alive.get(v).copied().unwrap_or(false)))
        .map(|face| face.map(|v| new_index[v]))
        .collect();

    let vertices = vertices
        .into_iter()
        .zip(alive)
        .filter_map(|(vertex, is_alive)| is_alive.then_some(vertex))
        .collect();

    Ok(SanitizedMesh { vertices, faces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn faces_touching_nan_vertices_are_dropped() {
        let fragment = MeshFragment {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [f64::NAN, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            faces: vec![[0, 2, 3], [0, 1, 3], [2, 4, 3]],
        };

        let mesh = remove_nan_vertices(fragment).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.vertices[1], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn all_nan_gives_an_empty_mesh() {
        let fragment = MeshFragment {
            vertices: vec![[f64::NAN; 3]; 3],
            faces: vec![[0, 1, 2]],
        };
        let mesh = remove_nan_vertices(fragment).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn random_meshes_keep_indices_valid() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let num_vertices = rng.random_range(3..60);
            let vertices: Vec<[f64; 3]> = (0..num_vertices)
                .map(|_| {
                    let x = if rng.random_range(0.0..1.0) < 0.3 { f64::NAN } else { 1.0 };
                    [x, rng.random_range(0.0..1.0), 0.0]
                })
                .collect();
            let faces: Vec<[usize; 3]> = (0..rng.random_range(1..80))
                .map(|_| std::array::from_fn(|_| rng.random_range(0..num_vertices)))
                .collect();

            let fragment = MeshFragment {
                vertices: vertices.clone(),
                faces: faces.clone(),
            };
            let mesh = remove_nan_vertices(fragment).unwrap();

            assert!(mesh.vertices.len() <= vertices.len());
            assert!(mesh.vertices.iter().flatten().all(|c| !c.is_nan()));
            assert!(
                mesh.faces
                    .iter()
                    .flatten()
                    .all(|&v| (v as usize) < mesh.vertices.len())
            );

            let expected_faces = faces
                .iter()
                .filter(|f| f.iter().all(|&v| !vertices[v][0].is_nan()))
                .count();
            assert_eq!(mesh.faces.len(), expected_faces);
        }
    }
}
