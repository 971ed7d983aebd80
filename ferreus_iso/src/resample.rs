/////////////////////////////////////////////////////////////////////////////////////////////
//
// Resamples scattered values onto lattice points with an inverse-distance weighted average.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::kdtree::KDTree;

/// Estimates a value at every row of `targets` from the samples at `locations`.
///
/// For each target, the `num_neighbours` nearest samples within
/// `max_distance` are weighted by `1 / (distance + threshold)` and averaged.
/// Targets with no sample in reach are NaN.
///
/// `locations` and `values` must be finite and have matching lengths.
pub fn weighted_average(
    locations: &Mat<f64>,
    values: &[f64],
    targets: &Mat<f64>,
    num_neighbours: usize,
    max_distance: f64,
    threshold: f64,
) -> Vec<f64> {
    let tree = KDTree::new(locations);
    let k = num_neighbours.min(tree.len());

    let estimate = |row: usize| {
        let target = [targets[(row, 0)], targets[(row, 1)], targets[(row, 2)]];
        let neighbours = tree.k_nearest_within(&target, k, max_distance);

        if neighbours.is_empty() {
            return f64::NAN;
        }

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (id, distance) in neighbours {
            let weight = 1.0 / (distance + threshold);
            weighted_sum += values[id] * weight;
            weight_sum += weight;
        }
        weighted_sum / weight_sum
    };

    #[cfg(feature = "parallel")]
    let estimates = (0..targets.nrows()).into_par_iter().map(estimate).collect();

    #[cfg(not(feature = "parallel"))]
    let estimates = (0..targets.nrows()).map(estimate).collect();

    estimates
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn uniform_neighbourhood_reproduces_value_exactly() {
        let locations = Mat::from_fn(27, 3, |row, col| ((row / 3usize.pow(col as u32)) % 3) as f64);
        let values = vec![1.0; 27];
        let targets = mat![[1.0, 1.0, 1.0], [0.3, 1.7, 0.9]];

        let estimates = weighted_average(&locations, &values, &targets, 8, 2.0, 0.25);
        assert_eq!(estimates, vec![1.0, 1.0]);
    }

    #[test]
    fn out_of_reach_targets_are_nan() {
        let locations = mat![[0.0, 0.0, 0.0]];
        let targets = mat![[0.5, 0.0, 0.0], [3.0, 0.0, 0.0]];

        let estimates = weighted_average(&locations, &[2.0], &targets, 8, 1.0, 0.5);
        assert_eq!(estimates[0], 2.0);
        assert!(estimates[1].is_nan());
    }

    #[test]
    fn weights_favour_closer_samples() {
        let locations = mat![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]];
        let targets = mat![[1.0, 0.0, 0.0]];

        // distances 1 and 2, threshold 1 => weights 1/2 and 1/3
        let estimates = weighted_average(&locations, &[0.0, 10.0], &targets, 8, 10.0, 1.0);
        let expected = (10.0 / 3.0) / (0.5 + 1.0 / 3.0);
        assert!((estimates[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn only_the_nearest_neighbours_contribute() {
        let locations = mat![[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [0.9, 0.0, 0.0]];
        let targets = mat![[0.0, 0.0, 0.0]];

        let estimates = weighted_average(&locations, &[5.0, 5.0, 100.0], &targets, 2, 10.0, 0.5);
        assert_eq!(estimates, vec![5.0]);
    }
}
