/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies general-purpose utilities for axis construction, extents and distances.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;

/// Returns evenly spaced values within the half-open interval `[start, stop)`.
///
/// The number of values is `ceil((stop - start) / step)` and the `i`-th value
/// is `start + i * step`, so the last value can land on `stop - step` or just
/// past it depending on floating point rounding.
///
/// Returns an empty vector if `step` is not strictly positive or the interval
/// is empty.
///
/// # Examples
///
/// ```
/// use ferreus_iso_utils::arange;
///
/// let values = arange(-8.0, 0.5, 0.5);
///
/// assert_eq!(values.len(), 17);
/// assert_eq!(values[0], -8.0);
/// assert_eq!(values[16], 0.0);
/// ```
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }

    let num_values = ((stop - start) / step).ceil();

    if !(num_values > 0.0) {
        return Vec::new();
    }

    (0..num_values as usize)
        .map(|i| start + i as f64 * step)
        .collect()
}

/// Returns the centre of each cell delimited by consecutive boundary positions.
///
/// A delimiter sequence of length `n + 1` describes `n` cells; the result has
/// length `n` with `centre[i] = delimiter[i] + (delimiter[i + 1] - delimiter[i]) / 2`.
///
/// # Examples
///
/// ```
/// use ferreus_iso_utils::cell_centres;
///
/// let centres = cell_centres(&[0.0, 2.0, 6.0]);
///
/// assert_eq!(centres, vec![1.0, 4.0]);
/// ```
pub fn cell_centres(delimiters: &[f64]) -> Vec<f64> {
    delimiters
        .windows(2)
        .map(|pair| {
            let width = pair[1] - pair[0];
            pair[0] + width / 2.0
        })
        .collect()
}

/// Returns `true` if every value is strictly greater than the one before it.
///
/// Sequences of length zero or one are trivially increasing. Any NaN makes the
/// sequence non-increasing.
#[inline(always)]
pub fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

/// Returns the minimum and maximum of the finite entries of `values`.
///
/// Non-finite values (NaN, ±∞) are ignored. Returns `None` when there is no
/// finite value.
///
/// # Examples
///
/// ```
/// use ferreus_iso_utils::finite_range;
///
/// let values = [f64::NAN, 3.0, -1.0, f64::INFINITY];
///
/// assert_eq!(finite_range(&values), Some((-1.0, 3.0)));
/// assert_eq!(finite_range(&[f64::NAN]), None);
/// ```
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Computes the axis aligned bounding box (AABB) extents of the finite
/// entries of a matrix of points.
///
/// The result is arranged as `[min_0, ..., min_n, max_0, ..., max_n]` where
/// `n` is the number of columns. Non-finite entries are ignored per column.
/// Returns `None` if any column has no finite entry.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use ferreus_iso_utils::get_finite_extents;
///
/// let points = mat![
///     [1.0, 2.0],
///     [3.0, f64::NAN],
///     [0.5, 4.0f64]
/// ];
/// let extents = get_finite_extents(&points);
/// assert_eq!(extents, Some(vec![0.5, 2.0, 3.0, 4.0]));
/// ```
pub fn get_finite_extents(points: &Mat<f64>) -> Option<Vec<f64>> {
    let ncols = points.ncols();
    let mut extents = vec![0.0; 2 * ncols];

    for col in 0..ncols {
        let column: Vec<f64> = (0..points.nrows()).map(|row| points[(row, col)]).collect();
        let (lo, hi) = finite_range(&column)?;
        extents[col] = lo;
        extents[col + ncols] = hi;
    }

    Some(extents)
}

/// Calculates the euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use ferreus_iso_utils::get_distance;
///
/// let dist = get_distance(&[1.0, 2.0, 0.0], &[4.0, 6.0, 0.0]);
///
/// assert_eq!(dist, 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: &[f64], source: &[f64]) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arange_matches_half_open_interval() {
        let values = arange(0.0, 10.5, 0.5);
        assert_eq!(values.len(), 21);
        assert_eq!(values[20], 10.0);
    }

    #[test]
    fn arange_single_value_when_interval_shorter_than_step() {
        let values = arange(3.0, 3.5, 0.5);
        assert_eq!(values, vec![3.0]);
    }

    #[test]
    fn arange_rejects_bad_steps() {
        assert!(arange(0.0, 1.0, 0.0).is_empty());
        assert!(arange(0.0, 1.0, -1.0).is_empty());
        assert!(arange(0.0, 1.0, f64::NAN).is_empty());
        assert!(arange(1.0, 0.0, 0.5).is_empty());
    }

    #[test]
    fn cell_centres_of_uneven_cells() {
        let centres = cell_centres(&[-10.0, -5.0, 0.0, 20.0]);
        assert_eq!(centres, vec![-7.5, -2.5, 10.0]);
        assert!(cell_centres(&[1.0]).is_empty());
    }

    #[test]
    fn strictly_increasing_checks() {
        assert!(is_strictly_increasing(&[0.0, 1.0, 2.5]));
        assert!(!is_strictly_increasing(&[0.0, 1.0, 1.0]));
        assert!(!is_strictly_increasing(&[0.0, f64::NAN, 2.0]));
        assert!(is_strictly_increasing(&[]));
    }

    #[test]
    fn finite_extents_none_when_column_is_all_nan() {
        let points = Mat::from_fn(3, 3, |_, j| if j == 1 { f64::NAN } else { 1.0 });
        assert_eq!(get_finite_extents(&points), None);
    }
}
