/////////////////////////////////////////////////////////////////////////////////////////////
//
// Example iso-surface extraction from scattered samples of a spherical grade shell, or from
// an x, y, z, value CSV file given on the command line.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use ferreus_iso::{
    IsoSurfaceExtractor, IsoSurfaceParams, ObjDirectorySink, ScatteredPoints,
    csv_to_point_arrays, export_surfaces,
    progress::{ProgressMsg, ProgressSink, closure_sink},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::{env, sync::Arc};

/// Generates a callback closure_sink
fn get_callback_sink() -> Arc<dyn ProgressSink> {
    let (sink, _listener) = closure_sink(256, |msg| match msg {
        ProgressMsg::SurfacingProgress {
            isovalue,
            stage,
            progress,
        } => {
            println!(
                "Level: {:?}    Stage: {}    {:>.1}%",
                isovalue,
                stage,
                progress * 100.0
            );
        }
        ProgressMsg::LevelsSkipped { levels } => {
            println!("Warning: skipped levels {levels:?} (out of range or no surface)");
        }
        ProgressMsg::Message { message } => {
            println!("{message}");
        }
    });

    sink
}

/// Random samples in a 200 m cube whose grade decays away from its centre.
fn synthetic_samples(num_points: usize) -> (Mat<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(42);
    let points: Mat<f64> = Mat::from_fn(num_points, 3, |_, _| rng.random_range(0.0..200.0));

    let values = (0..num_points)
        .map(|i| {
            let r2: f64 = (0..3).map(|j| (points[(i, j)] - 100.0).powi(2)).sum();
            10.0 * (-r2 / (2.0 * 40.0 * 40.0)).exp()
        })
        .collect();

    (points, values)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cwd = env::current_dir()?;

    // Load samples from a CSV file if one was given, otherwise make some up
    let (points, values) = match env::args().nth(1) {
        Some(path) => csv_to_point_arrays(path, true)?,
        None => synthetic_samples(5_000),
    };

    let params = IsoSurfaceParams::builder()
        .resolution(5.0)
        .max_distance(25.0)
        .build();

    // Create a callback to receive progress updates
    let callback = get_callback_sink();

    let extractor = IsoSurfaceExtractor::builder(ScatteredPoints::from_vertices(points), values)
        .params(params)
        .progress_callback(callback.clone())
        .build()?;

    println!("Sampling grid shape: {:?}", extractor.grid().shape());

    // Define the levels at which to surface
    let levels = vec![1.0, 2.5, 5.0, 50.0];
    let surfaces = extractor.extract(&levels);

    // Save the surfaces out to obj files
    let mut sink = ObjDirectorySink::new(cwd.join("iso_surfaces_scattered"))?;
    let exported = export_surfaces(&mut sink, "grade", &surfaces)?;

    println!("Wrote {exported} surfaces:");
    for path in sink.written() {
        println!("  {}", path.display());
    }

    Ok(())
}
