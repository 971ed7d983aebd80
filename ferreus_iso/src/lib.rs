/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for iso-surface extraction.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Iso-surface extraction from scattered and block-model data.
//!
//! Turns a scalar property, sampled either at irregular 3D locations or on
//! the cells of a block model, into one triangulated surface per requested
//! level.
//!
//! The pipeline runs in four steps:
//!
//! - **Gridding** - block models are used on their own cell centres. Scattered
//!   samples are resampled onto a regular lattice spanning their extents with an
//!   inverse-distance weighted average of the nearest samples.
//! - **Marching cubes** - each level is extracted with the classic 256-case
//!   lookup tables, sharing vertices between neighbouring cubes.
//! - **Clean-up** - vertices that fall on undefined (NaN) parts of the field are
//!   removed along with the faces that use them.
//! - **Mapping** - vertices are mapped from grid-index space to world space,
//!   including the rotation and origin of a block model's local frame.
//!
//! Levels outside the data range, or that produce no surface, are skipped and
//! reported once through the optional [`progress::ProgressSink`].
//!
//! Check out the examples directory in the repository for more examples of usage.
//!
//! # Examples
//!
//! ```
//! use ferreus_iso::{BlockModel, IsoSurfaceExtractor, Origin};
//!
//! // A 4 x 4 x 4 block model with unit cells, shifted to a world origin.
//! let delimiters: Vec<f64> = (0..=4).map(|v| v as f64).collect();
//! let model = BlockModel::new(delimiters.clone(), delimiters.clone(), delimiters)
//!     .with_origin(Origin::new(1000.0, 2000.0, 100.0));
//!
//! // Values are stored z fastest, then u, then v; here value = distance along u.
//! let values: Vec<f64> = (0..64).map(|i| ((i / 4) % 4) as f64 + 0.5).collect();
//!
//! let extractor = IsoSurfaceExtractor::builder(model, values).build()?;
//! let result = extractor.extract(&[2.0]);
//!
//! let surface = &result.surfaces[0];
//! assert!(!surface.is_empty());
//! assert!((0..surface.vertices.nrows()).all(|r| surface.vertices[(r, 0)] == 1002.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod config;

pub mod error;

pub mod progress;

mod common;

mod geometry;

mod grid;

mod iso_surfaces;

mod kdtree;

mod mapping;

mod resample;

mod surfacing;

pub use {
    common::{csv_to_point_arrays, surface_name},
    config::{IsoSurfaceParams, IsoSurfaceParamsBuilder},
    error::{ConfigError, ExtractionError},
    geometry::{BlockModel, Origin, RotationFrame, ScatteredPoints, SourceGeometry},
    grid::{SamplingGrid, ScalarField, block_model_grid},
    iso_surfaces::{
        IsoSurface, IsoSurfaceExtractor, IsoSurfaceExtractorBuilder, IsoSurfaces, iso_surfaces,
    },
    mapping::{AxisInterpolator, CoordinateMapper},
    resample::weighted_average,
    surfacing::{
        marching_cubes::{MeshFragment, marching_cubes},
        sanitize::{SanitizedMesh, remove_nan_vertices},
        surfacing_io::{ObjDirectorySink, SurfaceSink, export_surfaces, save_obj},
    },
};
