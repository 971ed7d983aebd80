/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds regular sampling grids and scalar fields from block models and scattered samples.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use ferreus_iso_utils::{arange, cell_centres, get_finite_extents, is_strictly_increasing};

use crate::{
    error::ConfigError,
    geometry::{BlockModel, ScatteredPoints},
};

const BLOCK_AXES: [&str; 3] = ["u", "v", "z"];
const WORLD_AXES: [&str; 3] = ["x", "y", "z"];

/// A rectilinear lattice described by three strictly increasing axes.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingGrid {
    axes: [Vec<f64>; 3],
}

impl SamplingGrid {
    /// Creates a grid from three axes, checking that each has at least two
    /// strictly increasing coordinates.
    pub fn new(axes: [Vec<f64>; 3]) -> Result<Self, ConfigError> {
        Self::with_axis_names(axes, WORLD_AXES)
    }

    fn with_axis_names(axes: [Vec<f64>; 3], names: [&'static str; 3]) -> Result<Self, ConfigError> {
        for (axis, name) in axes.iter().zip(names) {
            if axis.len() < 2 {
                return Err(ConfigError::DegenerateAxis {
                    axis: name,
                    len: axis.len(),
                });
            }
            if !is_strictly_increasing(axis) {
                return Err(ConfigError::NonIncreasingAxis { axis: name });
            }
        }
        Ok(Self { axes })
    }

    /// Number of coordinates along each axis.
    pub fn shape(&self) -> [usize; 3] {
        [self.axes[0].len(), self.axes[1].len(), self.axes[2].len()]
    }

    /// Coordinates along axis `dim` (0, 1 or 2).
    pub fn axis(&self, dim: usize) -> &[f64] {
        &self.axes[dim]
    }

    /// All three axes.
    pub fn axes(&self) -> &[Vec<f64>; 3] {
        &self.axes
    }

    /// Total number of lattice points.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Whether the lattice has no point. Never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every lattice point as an `(N × 3)` matrix with the first axis
    /// varying fastest, matching the layout of [`ScalarField`].
    pub fn lattice_points(&self) -> Mat<f64> {
        let [n0, n1, _] = self.shape();
        let [a0, a1, a2] = &self.axes;

        Mat::from_fn(self.len(), 3, |row, col| match col {
            0 => a0[row % n0],
            1 => a1[(row / n0) % n1],
            _ => a2[row / (n0 * n1)],
        })
    }
}

/// Scalar values at every point of a [`SamplingGrid`].
///
/// Values are stored flat with the first axis varying fastest:
/// `index = i + n0 * (j + n1 * k)`. Undefined samples are NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    shape: [usize; 3],
    values: Vec<f64>,
}

impl ScalarField {
    /// Wraps `values`, which must hold one entry per lattice point of `shape`.
    pub fn new(shape: [usize; 3], values: Vec<f64>) -> Result<Self, ConfigError> {
        let expected = shape.iter().product::<usize>();
        if values.len() != expected {
            return Err(ConfigError::ValueCountMismatch {
                expected,
                found: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    #[inline(always)]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    #[inline(always)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at lattice index `(i, j, k)`.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.values[self.index(i, j, k)]
    }

    #[inline(always)]
    pub(crate) fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.shape[0] * (j + self.shape[1] * k)
    }

    /// Minimum and maximum of the finite values, ignoring NaN.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        ferreus_iso_utils::finite_range(&self.values)
    }
}

/// Scattered samples that survived finite filtering, ready for resampling.
#[derive(Clone, Debug)]
pub(crate) struct FiniteSamples {
    pub locations: Mat<f64>,
    pub values: Vec<f64>,
}

/// Builds the sampling grid and scalar field of a block model.
///
/// Axis coordinates are the cell centres in the block model's local frame.
/// `values` are given with z varying fastest, then u, then v, and are
/// reordered into the field layout.
pub fn block_model_grid(
    model: &BlockModel,
    values: &[f64],
) -> Result<(SamplingGrid, ScalarField), ConfigError> {
    let shape = model.shape.ok_or(ConfigError::MissingShape)?;
    let delimiters = [
        &model.u_cell_delimiters,
        &model.v_cell_delimiters,
        &model.z_cell_delimiters,
    ];

    for ((delims, count), name) in delimiters.iter().zip(shape).zip(BLOCK_AXES) {
        if delims.len() != count + 1 {
            return Err(ConfigError::DelimiterMismatch {
                axis: name,
                expected: count + 1,
                found: delims.len(),
            });
        }
        if !is_strictly_increasing(delims) {
            return Err(ConfigError::NonIncreasingAxis { axis: name });
        }
    }

    let [nu, nv, nz] = shape;
    let num_cells = nu * nv * nz;
    if values.len() != num_cells {
        return Err(ConfigError::ValueCountMismatch {
            expected: num_cells,
            found: values.len(),
        });
    }

    let axes = delimiters.map(|d| cell_centres(d));
    let grid = SamplingGrid::with_axis_names(axes, BLOCK_AXES)?;

    let mut reordered = vec![f64::NAN; num_cells];
    for j in 0..nv {
        for i in 0..nu {
            for k in 0..nz {
                reordered[i + nu * (j + nv * k)] = values[k + nz * (i + nu * j)];
            }
        }
    }

    let field = ScalarField::new(shape, reordered)?;
    Ok((grid, field))
}

/// Builds the sampling grid for scattered samples and returns it with the
/// samples that have finite coordinates and a finite value.
///
/// Each axis spans `arange(min, max + resolution, resolution)` over the finite
/// samples' extents.
pub(crate) fn scattered_grid(
    points: &ScatteredPoints,
    values: &[f64],
    resolution: f64,
) -> Result<(SamplingGrid, FiniteSamples), ConfigError> {
    let locations = points.locations().ok_or(ConfigError::MissingLocations)?;

    if locations.ncols() != 3 {
        return Err(ConfigError::InvalidLocationShape {
            ncols: locations.ncols(),
        });
    }

    if values.len() != locations.nrows() {
        return Err(ConfigError::ValueCountMismatch {
            expected: locations.nrows(),
            found: values.len(),
        });
    }

    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(ConfigError::InvalidResolution(resolution));
    }

    let keep: Vec<usize> = (0..locations.nrows())
        .filter(|&row| {
            values[row].is_finite() && (0..3).all(|col| locations[(row, col)].is_finite())
        })
        .collect();

    if keep.is_empty() {
        return Err(ConfigError::NoFiniteData);
    }

    let finite_locations = Mat::from_fn(keep.len(), 3, |row, col| locations[(keep[row], col)]);
    let finite_values: Vec<f64> = keep.iter().map(|&row| values[row]).collect();

    let extents = get_finite_extents(&finite_locations).ok_or(ConfigError::NoFiniteData)?;
    let axes: [Vec<f64>; 3] =
        std::array::from_fn(|dim| arange(extents[dim], extents[dim + 3] + resolution, resolution));

    let grid = SamplingGrid::with_axis_names(axes, WORLD_AXES)?;

    Ok((
        grid,
        FiniteSamples {
            locations: finite_locations,
            values: finite_values,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn lattice_points_run_first_axis_fastest() {
        let grid = SamplingGrid::new([vec![0.0, 1.0], vec![10.0, 20.0, 30.0], vec![-1.0, 1.0]])
            .unwrap();
        let points = grid.lattice_points();

        assert_eq!(grid.len(), 12);
        assert_eq!(points.nrows(), 12);
        assert_eq!((points[(1, 0)], points[(1, 1)], points[(1, 2)]), (1.0, 10.0, -1.0));
        assert_eq!((points[(2, 0)], points[(2, 1)], points[(2, 2)]), (0.0, 20.0, -1.0));
        assert_eq!((points[(6, 0)], points[(6, 1)], points[(6, 2)]), (0.0, 10.0, 1.0));

        let field = ScalarField::new(grid.shape(), (0..12).map(|v| v as f64).collect()).unwrap();
        assert_eq!(field.get(1, 2, 1), 11.0);
    }

    #[test]
    fn grid_rejects_short_and_unsorted_axes() {
        let short = SamplingGrid::new([vec![0.0], vec![0.0, 1.0], vec![0.0, 1.0]]);
        assert_eq!(short, Err(ConfigError::DegenerateAxis { axis: "x", len: 1 }));

        let unsorted = SamplingGrid::new([vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(unsorted, Err(ConfigError::NonIncreasingAxis { axis: "y" }));
    }

    #[test]
    fn field_finite_range_ignores_nan() {
        let field = ScalarField::new([2, 1, 1], vec![f64::NAN, 4.0]).unwrap();
        assert_eq!(field.finite_range(), Some((4.0, 4.0)));

        let empty = ScalarField::new([2, 1, 1], vec![f64::NAN, f64::NAN]).unwrap();
        assert_eq!(empty.finite_range(), None);

        assert!(ScalarField::new([2, 2, 2], vec![0.0; 3]).is_err());
    }

    #[test]
    fn block_grid_uses_cell_centres_and_reorders_values() {
        let model = BlockModel::new(
            vec![0.0, 10.0, 30.0],
            vec![0.0, 5.0, 10.0, 15.0],
            vec![-4.0, -2.0, 0.0],
        );
        let [nu, nv, nz] = [2, 3, 2];
        let values: Vec<f64> = (0..nu * nv * nz).map(|v| v as f64).collect();

        let (grid, field) = block_model_grid(&model, &values).unwrap();

        assert_eq!(grid.axis(0), &[5.0, 20.0]);
        assert_eq!(grid.axis(1), &[2.5, 7.5, 12.5]);
        assert_eq!(grid.axis(2), &[-3.0, -1.0]);

        for j in 0..nv {
            for i in 0..nu {
                for k in 0..nz {
                    assert_eq!(field.get(i, j, k), values[k + nz * (i + nu * j)]);
                }
            }
        }
    }

    #[test]
    fn block_grid_configuration_errors() {
        let good = BlockModel::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]);

        let mut no_shape = good.clone();
        no_shape.shape = None;
        assert_eq!(block_model_grid(&no_shape, &[0.0; 8]), Err(ConfigError::MissingShape));

        let mut bad_count = good.clone();
        bad_count.shape = Some([2, 2, 3]);
        assert_eq!(
            block_model_grid(&bad_count, &[0.0; 12]),
            Err(ConfigError::DelimiterMismatch {
                axis: "z",
                expected: 4,
                found: 3
            })
        );

        let mut unsorted = good.clone();
        unsorted.v_cell_delimiters = vec![0.0, 2.0, 1.0];
        assert_eq!(
            block_model_grid(&unsorted, &[0.0; 8]),
            Err(ConfigError::NonIncreasingAxis { axis: "v" })
        );

        assert_eq!(
            block_model_grid(&good, &[0.0; 7]),
            Err(ConfigError::ValueCountMismatch {
                expected: 8,
                found: 7
            })
        );

        let flat = BlockModel::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![0.0, 1.0]);
        assert_eq!(
            block_model_grid(&flat, &[0.0; 4]),
            Err(ConfigError::DegenerateAxis { axis: "z", len: 1 })
        );
    }

    #[test]
    fn scattered_grid_covers_finite_extents() {
        let locations = mat![
            [0.0, 0.0, 0.0],
            [2.0, 1.0, 0.5],
            [100.0, 100.0, 100.0],
            [f64::NAN, 0.0, 0.0],
        ];
        let values = [1.0, 2.0, f64::NAN, 3.0];
        let points = ScatteredPoints::from_vertices(locations);

        let (grid, samples) = scattered_grid(&points, &values, 0.5).unwrap();

        assert_eq!(samples.values, vec![1.0, 2.0]);
        assert_eq!(samples.locations.nrows(), 2);
        assert_eq!(grid.axis(0), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(grid.axis(1), &[0.0, 0.5, 1.0]);
        assert_eq!(grid.axis(2), &[0.0, 0.5]);
    }

    #[test]
    fn scattered_grid_configuration_errors() {
        let points = ScatteredPoints::from_vertices(mat![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);

        assert!(matches!(
            scattered_grid(&ScatteredPoints::default(), &[], 1.0),
            Err(ConfigError::MissingLocations)
        ));
        assert!(matches!(
            scattered_grid(&points, &[1.0], 1.0),
            Err(ConfigError::ValueCountMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            scattered_grid(&points, &[f64::NAN, f64::NAN], 1.0),
            Err(ConfigError::NoFiniteData)
        ));
        assert!(matches!(
            scattered_grid(&points, &[0.0, 1.0], -1.0),
            Err(ConfigError::InvalidResolution(_))
        ));

        let planar = ScatteredPoints::from_vertices(mat![[0.0, 0.0, 5.0], [1.0, 1.0, 5.0]]);
        assert!(matches!(
            scattered_grid(&planar, &[0.0, 1.0], 1.0),
            Err(ConfigError::DegenerateAxis { axis: "z", len: 1 })
        ));
    }

    #[test]
    fn two_column_locations_are_rejected() {
        let flat = Mat::from_fn(4, 2, |i, j| (i + j) as f64);
        let values = [0.0, 1.0, 2.0, 3.0];

        assert_eq!(
            scattered_grid(&ScatteredPoints::from_vertices(flat.clone()), &values, 1.0).err(),
            Some(ConfigError::InvalidLocationShape { ncols: 2 })
        );

        let cells = [[0usize, 1], [1, 2], [2, 3]];
        assert_eq!(
            scattered_grid(&ScatteredPoints::from_cells(&flat, &cells), &values[..3], 1.0).err(),
            Some(ConfigError::InvalidLocationShape { ncols: 2 })
        );
    }
}
