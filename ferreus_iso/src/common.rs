/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for CSV sample loading and naming of extracted surfaces.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use csv::{ReaderBuilder, Trim};
use faer::{Mat, MatRef};
use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Load a CSV file of `x, y, z, value` rows into a point matrix and a value
/// vector.
///
/// Empty cells and `nan` parse as NaN, so samples with missing values are
/// kept and later ignored by gridding.
///
/// # Arguments
/// * `file_path` - Path to the CSV file.
/// * `has_headers` - Whether the file has a single header row to skip.
///
/// # Returns
/// On success, returns `(points, values)` where `points` has shape
/// `(n_rows, 3)` and `values` has length `n_rows`.
pub fn csv_to_point_arrays<P: AsRef<Path>>(
    file_path: P,
    has_headers: bool,
) -> Result<(Mat<f64>, Vec<f64>), Box<dyn Error>> {
    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(Trim::All)
        .from_reader(file);

    let mut coordinates = Vec::new();
    let mut values = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != 4 {
            return Err(format!(
                "row {row}: expected 4 columns (x, y, z, value), found {}",
                record.len()
            )
            .into());
        }

        for (i, cell) in record.iter().enumerate() {
            let parsed: f64 = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse()?
            };
            if i == 3 {
                values.push(parsed);
            } else {
                coordinates.push(parsed);
            }
        }
    }

    let points = MatRef::from_row_major_slice(coordinates.as_slice(), values.len(), 3).to_owned();

    Ok((points, values))
}

/// Formats `value` like C's `%.2e`: two decimals and an exponent with a sign
/// and at least two digits (`1.25e+03`).
fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }

    let formatted = format!("{value:.2e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}

/// Name of the surface extracted at `level` from data called `data_name`:
/// `<data_name>_<level as %.2e>` with every `.` replaced by `_`.
///
/// # Example
/// ```
/// use ferreus_iso::surface_name;
///
/// assert_eq!(surface_name("Au ppm", 0.5), "Au ppm_5_00e-01");
/// assert_eq!(surface_name("density", -1234.5), "density_-1_23e+03");
/// ```
pub fn surface_name(data_name: &str, level: f64) -> String {
    format!("{data_name}_{}", format_scientific(level)).replace('.', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scientific_format_pads_exponent() {
        assert_eq!(format_scientific(0.0), "0.00e+00");
        assert_eq!(format_scientific(1.0), "1.00e+00");
        assert_eq!(format_scientific(0.012345), "1.23e-02");
        assert_eq!(format_scientific(6.02e23), "6.02e+23");
        assert_eq!(format_scientific(1e-300), "1.00e-300");
        assert_eq!(format_scientific(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn surface_names_replace_dots() {
        assert_eq!(surface_name("grade.v2", 2.5), "grade_v2_2_50e+00");
        assert_eq!(surface_name("grade", f64::NAN), "grade_nan");
    }

    #[test]
    fn csv_rows_load_with_missing_values() {
        let path = std::env::temp_dir()
            .join(format!("ferreus_iso_{}_samples.csv", std::process::id()));
        fs::write(&path, "x,y,z,value\n0,1,2,3.5\n4, 5, 6,nan\n7,8,9,\n").unwrap();

        let (points, values) = csv_to_point_arrays(&path, true).unwrap();

        assert_eq!(points.nrows(), 3);
        assert_eq!((points[(1, 0)], points[(1, 1)], points[(1, 2)]), (4.0, 5.0, 6.0));
        assert_eq!(values[0], 3.5);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());

        fs::write(&path, "0,1,2\n").unwrap();
        assert!(csv_to_point_arrays(&path, false).is_err());

        fs::remove_file(&path).unwrap();
    }
}
