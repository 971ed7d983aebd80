/////////////////////////////////////////////////////////////////////////////////////////////
//
// Writes extracted iso-surfaces to OBJ files and hands batches of surfaces to output sinks.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::MatRef;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

use crate::{
    common::surface_name,
    iso_surfaces::{IsoSurface, IsoSurfaces},
};

/// Write an iso-surface to an OBJ file.
///
/// - `name`: object name to write as `o <name>`
/// - `verts`: (V × 3) positions (f64)
/// - `faces`: (F × 3) triangle indices (u32, **0-based**)
///
/// # Errors
/// - `InvalidInput` if `verts.ncols() != 3` or `faces.ncols() != 3` or mesh is empty.
/// - `InvalidData` if any face index is out of range (`>= V`).
pub fn save_obj<P: AsRef<Path>>(
    path: P,
    name: &str,
    verts: MatRef<f64>,
    faces: MatRef<u32>,
) -> Result<()> {
    let (nv, dv) = (verts.nrows(), verts.ncols());
    let (nf, k) = (faces.nrows(), faces.ncols());

    if dv != 3 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("vertices must be (V x 3), got (V x {dv})"),
        ));
    }
    if k != 3 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("faces must be triangles (F x 3), got (F x {k})"),
        ));
    }
    if nv == 0 || nf == 0 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "mesh is empty (no verts or faces)",
        ));
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# iso-surface (triangles)")?;
    writeln!(w, "\no {name}")?;

    for r in 0..nv {
        writeln!(w, "v {} {} {}", verts[(r, 0)], verts[(r, 1)], verts[(r, 2)])?;
    }

    // OBJ is 1-based
    for r in 0..nf {
        let [a, b, c] = [faces[(r, 0)], faces[(r, 1)], faces[(r, 2)]].map(|v| v as usize);
        if a >= nv || b >= nv || c >= nv {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("face {r}: index out of bounds (nv = {nv})"),
            ));
        }
        writeln!(w, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    w.flush()
}

/// Destination for extracted surfaces, such as a directory of files or a
/// geoscience data store.
pub trait SurfaceSink {
    /// Stores one non-empty surface under `name`.
    fn accept(&mut self, name: &str, surface: &IsoSurface) -> Result<()>;
}

/// Writes each surface to `<directory>/<name>.obj`.
#[derive(Debug, Clone)]
pub struct ObjDirectorySink {
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl ObjDirectorySink {
    /// Creates the sink, creating `directory` if it does not exist.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            written: Vec::new(),
        })
    }

    /// Paths of the files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SurfaceSink for ObjDirectorySink {
    fn accept(&mut self, name: &str, surface: &IsoSurface) -> Result<()> {
        let path = self.directory.join(format!("{name}.obj"));
        save_obj(&path, name, surface.vertices.as_ref(), surface.faces.as_ref())?;
        self.written.push(path);
        Ok(())
    }
}

/// Hands every non-empty surface of `surfaces` to `sink`, named after
/// `data_name` and the surface's level. Returns how many were exported.
pub fn export_surfaces<S: SurfaceSink + ?Sized>(
    sink: &mut S,
    data_name: &str,
    surfaces: &IsoSurfaces,
) -> Result<usize> {
    let mut exported = 0;
    for surface in surfaces.surfaces.iter().filter(|s| !s.is_empty()) {
        sink.accept(&surface_name(data_name, surface.level), surface)?;
        exported += 1;
    }
    Ok(exported)
}
