/////////////////////////////////////////////////////////////////////////////////////////////
//
// Maps fractional grid-index coordinates back to world coordinates.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;

use crate::{geometry::RotationFrame, grid::SamplingGrid};

/// Piecewise-linear map from fractional index to coordinate along one axis,
/// extrapolating linearly past both ends.
#[derive(Clone, Debug)]
pub struct AxisInterpolator<'a> {
    coordinates: &'a [f64],
}

impl<'a> AxisInterpolator<'a> {
    /// `coordinates` must hold at least two values.
    pub fn new(coordinates: &'a [f64]) -> Self {
        debug_assert!(coordinates.len() >= 2);
        Self { coordinates }
    }

    /// Coordinate at fractional index `x`. Exact at integer indices.
    #[inline]
    pub fn interpolate(&self, x: f64) -> f64 {
        let c = self.coordinates;
        let last = c.len().saturating_sub(2) as f64;
        let i = x.floor().clamp(0.0, last);
        let t = x - i;
        let i = i as usize;

        if t == 0.0 {
            return c[i];
        }
        (1.0 - t) * c[i] + t * c[i + 1]
    }
}

/// Converts meshes from grid-index space to world space: per-axis
/// interpolation, then the source's local frame if it has one.
#[derive(Clone, Debug)]
pub struct CoordinateMapper<'a> {
    axes: [AxisInterpolator<'a>; 3],
    frame: Option<RotationFrame>,
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(grid: &'a SamplingGrid, frame: Option<RotationFrame>) -> Self {
        Self {
            axes: std::array::from_fn(|dim| AxisInterpolator::new(grid.axis(dim))),
            frame,
        }
    }

    /// Maps `vertices` to an `(N × 3)` matrix of world coordinates.
    pub fn to_world(&self, vertices: &[[f64; 3]]) -> Mat<f64> {
        let local = Mat::from_fn(vertices.len(), 3, |row, col| {
            self.axes[col].interpolate(vertices[row][col])
        });

        match &self.frame {
            Some(frame) => frame.to_world(&local),
            None => local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Origin;

    #[test]
    fn integer_indices_map_exactly() {
        let axis = [0.1, 0.35, 0.7, 1.3];
        let interp = AxisInterpolator::new(&axis);
        for (k, &c) in axis.iter().enumerate() {
            assert_eq!(interp.interpolate(k as f64), c);
        }
    }

    #[test]
    fn interpolates_and_extrapolates_linearly() {
        let axis = [0.0, 2.0, 3.0];
        let interp = AxisInterpolator::new(&axis);

        assert_eq!(interp.interpolate(0.5), 1.0);
        assert_eq!(interp.interpolate(1.5), 2.5);
        assert_eq!(interp.interpolate(-1.0), -2.0);
        assert_eq!(interp.interpolate(3.0), 4.0);
    }

    #[test]
    fn mapper_applies_frame_after_axes() {
        let grid = SamplingGrid::new([vec![0.5, 1.5], vec![0.5, 1.5, 2.5], vec![-1.0, 1.0]])
            .unwrap();
        let frame = RotationFrame {
            pivot: [0.0; 3],
            rotation: 0.0,
            origin: Origin::new(1000.0, 2000.0, 50.0),
        };

        let vertices = [[0.0, 2.0, 0.5], [1.0, 0.25, 1.0]];

        let local = CoordinateMapper::new(&grid, None).to_world(&vertices);
        assert_eq!((local[(0, 0)], local[(0, 1)], local[(0, 2)]), (0.5, 2.5, 0.0));
        assert_eq!((local[(1, 0)], local[(1, 1)], local[(1, 2)]), (1.5, 0.75, 1.0));

        let world = CoordinateMapper::new(&grid, Some(frame)).to_world(&vertices);
        for row in 0..2 {
            assert_eq!(world[(row, 0)], local[(row, 0)] + 1000.0);
            assert_eq!(world[(row, 1)], local[(row, 1)] + 2000.0);
            assert_eq!(world[(row, 2)], local[(row, 2)] + 50.0);
        }
    }
}
