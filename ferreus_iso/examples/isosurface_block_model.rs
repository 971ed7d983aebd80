/////////////////////////////////////////////////////////////////////////////////////////////
//
// Example iso-surface extraction from a rotated block model with variable cell sizes.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use ferreus_iso::{BlockModel, IsoSurfaceParams, Origin, iso_surfaces, save_obj, surface_name};
use std::env;

/// Cell boundaries growing geometrically away from zero, like padding cells.
fn padded_delimiters(core_cells: usize, core_size: f64, padding_cells: usize) -> Vec<f64> {
    let mut delimiters = vec![0.0];
    for _ in 0..core_cells {
        let last = delimiters[delimiters.len() - 1];
        delimiters.push(last + core_size);
    }
    let mut size = core_size;
    for _ in 0..padding_cells {
        size *= 1.3;
        let last = delimiters[delimiters.len() - 1];
        delimiters.push(last + size);
    }
    delimiters
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cwd = env::current_dir()?;

    let u = padded_delimiters(30, 10.0, 5);
    let v = padded_delimiters(20, 10.0, 5);
    let z: Vec<f64> = padded_delimiters(15, 5.0, 3).iter().map(|d| -d).rev().collect();

    // Rotated 30 degrees counter-clockwise about the model origin
    let model = BlockModel::new(u.clone(), v.clone(), z.clone())
        .with_rotation(30.0)
        .with_origin(Origin::new(315_000.0, 6_120_000.0, 420.0));

    let [nu, nv, nz] = model.shape.unwrap_or([0, 0, 0]);
    let centres = |d: &[f64], i: usize| (d[i] + d[i + 1]) / 2.0;

    // A dipping conductor, values stored z fastest, then u, then v
    let mut values = Vec::with_capacity(nu * nv * nz);
    for j in 0..nv {
        for i in 0..nu {
            for k in 0..nz {
                let (x, y, depth) = (centres(&u, i), centres(&v, j), centres(&z, k));
                let distance = (x - 150.0 + 0.5 * depth).abs() + 0.2 * (y - 100.0).abs();
                values.push(1000.0 / (1.0 + distance));
            }
        }
    }

    let levels = [10.0, 20.0, 50.0];
    let result = iso_surfaces(model, values, &levels, IsoSurfaceParams::default())?;

    if !result.skipped_levels.is_empty() {
        println!("Skipped levels: {:?}", result.skipped_levels);
    }

    // Save each surface out to an obj file
    for surface in result.surfaces.iter().filter(|s| !s.is_empty()) {
        let name = surface_name("conductivity", surface.level);
        let outpath = cwd.join(format!("{name}.obj"));
        save_obj(&outpath, &name, surface.vertices.as_ref(), surface.faces.as_ref())?;
        println!(
            "{name}: {} vertices, {} faces",
            surface.vertices.nrows(),
            surface.faces.nrows()
        );
    }

    Ok(())
}
