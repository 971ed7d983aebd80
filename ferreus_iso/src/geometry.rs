/////////////////////////////////////////////////////////////////////////////////////////////
//
// Describes the source objects that iso-surfaces can be extracted from.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::{Mat, mat};
use serde::{Deserialize, Serialize};

/// World-space position of a block model's local frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Origin {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Local frame of a block model.
///
/// Points in the local frame are rotated counter-clockwise about the vertical
/// axis through `pivot` by `rotation` degrees, then translated by `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationFrame {
    /// Point the rotation is performed about.
    pub pivot: [f64; 3],

    /// Rotation angle in degrees (positive = counter-clockwise seen from +Z).
    pub rotation: f64,

    /// Translation applied after rotation.
    pub origin: Origin,
}

impl RotationFrame {
    /// Maps an `(N × 3)` matrix of local coordinates into world space.
    ///
    /// A zero rotation skips the rotation step entirely, so the result is the
    /// input plus the origin, exactly.
    pub fn to_world(&self, points: &Mat<f64>) -> Mat<f64> {
        let origin = [self.origin.x, self.origin.y, self.origin.z];

        let rotated = if self.rotation == 0.0 {
            points.clone()
        } else {
            let pivot = self.pivot;
            let centred = Mat::from_fn(points.nrows(), 3, |i, j| points[(i, j)] - pivot[j]);

            let theta = self.rotation.to_radians();
            let (sin, cos) = theta.sin_cos();

            // Row vectors, so this is the transpose of the usual
            // counter-clockwise rotation about Z.
            let rotation = mat![
                [cos, sin, 0.0],
                [-sin, cos, 0.0],
                [0.0, 0.0, 1.0],
            ];

            let turned = &centred * &rotation;
            Mat::from_fn(points.nrows(), 3, |i, j| turned[(i, j)] + pivot[j])
        };

        Mat::from_fn(rotated.nrows(), 3, |i, j| rotated[(i, j)] + origin[j])
    }
}

/// A block model: a regular grid of cells described by per-axis cell
/// boundaries in a local (u, v, z) frame.
///
/// Values attached to a block model are stored with z varying fastest, then
/// u, then v: the value of cell `(i, j, k)` sits at `k + nz * (i + nu * j)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockModel {
    /// Number of cells along u, v and z, if known.
    pub shape: Option<[usize; 3]>,

    /// Cell boundaries along u, relative to the origin.
    pub u_cell_delimiters: Vec<f64>,

    /// Cell boundaries along v, relative to the origin.
    pub v_cell_delimiters: Vec<f64>,

    /// Cell boundaries along z, relative to the origin.
    pub z_cell_delimiters: Vec<f64>,

    /// Rotation of the local frame about the vertical axis, in degrees.
    pub rotation: f64,

    /// World position of the local frame.
    pub origin: Origin,

    /// Point the rotation is performed about. Defaults to `[0, 0, 0]`.
    pub pivot: [f64; 3],
}

impl BlockModel {
    /// Creates a block model from its delimiters, with the shape derived from
    /// the delimiter counts, no rotation and a zero origin.
    pub fn new(
        u_cell_delimiters: Vec<f64>,
        v_cell_delimiters: Vec<f64>,
        z_cell_delimiters: Vec<f64>,
    ) -> Self {
        let count = |d: &Vec<f64>| d.len().saturating_sub(1);
        let shape = [
            count(&u_cell_delimiters),
            count(&v_cell_delimiters),
            count(&z_cell_delimiters),
        ];

        Self {
            shape: Some(shape),
            u_cell_delimiters,
            v_cell_delimiters,
            z_cell_delimiters,
            rotation: 0.0,
            origin: Origin::default(),
            pivot: [0.0; 3],
        }
    }

    /// Sets the rotation angle in degrees.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the world origin.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the rotation pivot.
    pub fn with_pivot(mut self, pivot: [f64; 3]) -> Self {
        self.pivot = pivot;
        self
    }

    /// Returns the local frame of this block model.
    pub fn frame(&self) -> RotationFrame {
        RotationFrame {
            pivot: self.pivot,
            rotation: self.rotation,
            origin: self.origin,
        }
    }

    /// World-space cell centroids, ordered like the block model's values
    /// (z fastest, then u, then v). Returns `None` without a shape.
    pub fn locations(&self) -> Option<Mat<f64>> {
        let [nu, nv, nz] = self.shape?;
        let u = ferreus_iso_utils::cell_centres(&self.u_cell_delimiters);
        let v = ferreus_iso_utils::cell_centres(&self.v_cell_delimiters);
        let z = ferreus_iso_utils::cell_centres(&self.z_cell_delimiters);

        if u.len() != nu || v.len() != nv || z.len() != nz {
            return None;
        }

        let local = Mat::from_fn(nu * nv * nz, 3, |row, col| {
            let k = row % nz;
            let i = (row / nz) % nu;
            let j = row / (nz * nu);
            match col {
                0 => u[i],
                1 => v[j],
                _ => z[k],
            }
        });

        Some(self.frame().to_world(&local))
    }
}

/// Scattered samples: points, or the vertices/cells of curves and surfaces.
#[derive(Clone, Debug, Default)]
pub struct ScatteredPoints {
    /// Vertex positions `(N × 3)`, for vertex-associated data.
    pub vertices: Option<Mat<f64>>,

    /// Cell centroid positions `(M × 3)`, for cell-associated data.
    pub centroids: Option<Mat<f64>>,
}

impl ScatteredPoints {
    /// Samples located at vertices.
    pub fn from_vertices(vertices: Mat<f64>) -> Self {
        Self {
            vertices: Some(vertices),
            centroids: None,
        }
    }

    /// Samples located at cell centroids.
    pub fn from_centroids(centroids: Mat<f64>) -> Self {
        Self {
            vertices: None,
            centroids: Some(centroids),
        }
    }

    /// Samples located at the centroids of `cells`, each cell being a list
    /// of vertex indices (segments of a curve, triangles of a surface, ...).
    ///
    /// Cells referencing a vertex outside `vertices` get a NaN centroid, which
    /// excludes their value from gridding. The centroids have as many columns
    /// as `vertices`.
    pub fn from_cells<C: AsRef<[usize]>>(vertices: &Mat<f64>, cells: &[C]) -> Self {
        let nv = vertices.nrows();
        let centroids = Mat::from_fn(cells.len(), vertices.ncols(), |row, col| {
            let cell = cells[row].as_ref();
            if cell.is_empty() || cell.iter().any(|&v| v >= nv) {
                return f64::NAN;
            }
            let sum: f64 = cell.iter().map(|&v| vertices[(v, col)]).sum();
            sum / cell.len() as f64
        });

        Self::from_centroids(centroids)
    }

    /// Sample locations: the vertices when present, otherwise the centroids.
    pub fn locations(&self) -> Option<&Mat<f64>> {
        self.vertices.as_ref().or(self.centroids.as_ref())
    }
}

/// A source object for iso-surface extraction.
#[derive(Clone, Debug)]
pub enum SourceGeometry {
    /// Regular block model; values are already on a grid.
    Block(BlockModel),

    /// Irregular samples; values are interpolated onto a regular grid first.
    Scattered(ScatteredPoints),
}

impl From<BlockModel> for SourceGeometry {
    fn from(value: BlockModel) -> Self {
        SourceGeometry::Block(value)
    }
}

impl From<ScatteredPoints> for SourceGeometry {
    fn from(value: ScatteredPoints) -> Self {
        SourceGeometry::Scattered(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::utils::approx::*;

    #[test]
    fn zero_rotation_translates_exactly() {
        let points = mat![[0.1, 0.2, 0.3], [-5.5, 7.25, 1e6]];
        let frame = RotationFrame {
            pivot: [0.0; 3],
            rotation: 0.0,
            origin: Origin::new(100.0, -200.0, 3.5),
        };

        let world = frame.to_world(&points);

        for i in 0..points.nrows() {
            assert!(world[(i, 0)] == points[(i, 0)] + 100.0);
            assert!(world[(i, 1)] == points[(i, 1)] - 200.0);
            assert!(world[(i, 2)] == points[(i, 2)] + 3.5);
        }
    }

    #[test]
    fn quarter_turn_is_counter_clockwise_about_pivot() {
        let points = mat![[2.0, 1.0, 5.0]];
        let frame = RotationFrame {
            pivot: [1.0, 1.0, 0.0],
            rotation: 90.0,
            origin: Origin::new(10.0, 0.0, 0.0),
        };

        let world = frame.to_world(&points);
        let expected = mat![[11.0, 2.0, 5.0]];

        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0);
        assert!(&world ~ &expected);
    }

    #[test]
    fn block_locations_follow_value_order() {
        let model = BlockModel::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0], vec![0.0, 1.0, 3.0])
            .with_origin(Origin::new(10.0, 20.0, 30.0));

        let locations = model.locations().unwrap();
        assert!(locations.nrows() == 4);

        // z fastest, then u.
        let expected = mat![
            [10.5, 21.0, 30.5],
            [10.5, 21.0, 32.0],
            [11.5, 21.0, 30.5],
            [11.5, 21.0, 32.0],
        ];
        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0);
        assert!(&locations ~ &expected);
    }

    #[test]
    fn block_locations_need_a_shape() {
        let mut model = BlockModel::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]);
        model.shape = None;
        assert!(model.locations().is_none());
    }

    #[test]
    fn scattered_locations_prefer_vertices() {
        let vertices = mat![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 4.0, 0.0]];
        let cells = [[0usize, 1], [1, 2]];

        let from_cells = ScatteredPoints::from_cells(&vertices, &cells);
        let centroids = from_cells.locations().unwrap();
        assert!(centroids[(0, 0)] == 1.0);
        assert!(centroids[(1, 1)] == 2.0);

        let both = ScatteredPoints {
            vertices: Some(vertices.clone()),
            centroids: from_cells.centroids.clone(),
        };
        assert!(both.locations().unwrap().nrows() == 3);

        assert!(ScatteredPoints::default().locations().is_none());
    }

    #[test]
    fn out_of_range_cells_get_nan_centroids() {
        let vertices = mat![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let cells = vec![vec![0usize, 7]];
        let points = ScatteredPoints::from_cells(&vertices, &cells);
        assert!(points.locations().unwrap()[(0, 0)].is_nan());
    }
}
