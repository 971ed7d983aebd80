/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the extraction pipeline from source geometry and values to world-space iso-surfaces.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use std::sync::Arc;

use crate::{
    config::IsoSurfaceParams,
    error::{ConfigError, ExtractionError},
    geometry::{RotationFrame, SourceGeometry},
    grid::{ScalarField, SamplingGrid, block_model_grid, scattered_grid},
    mapping::CoordinateMapper,
    progress::{ProgressMsg, ProgressSink, report},
    resample::weighted_average,
    surfacing::{marching_cubes::marching_cubes, sanitize::remove_nan_vertices},
};

/// A triangulated iso-surface in world coordinates.
#[derive(Clone, Debug)]
pub struct IsoSurface {
    /// Scalar level the surface was extracted at.
    pub level: f64,

    /// (V × 3) vertex positions.
    pub vertices: Mat<f64>,

    /// (F × 3) triangle vertex indices, 0-based.
    pub faces: Mat<u32>,
}

impl IsoSurface {
    /// A surface with no vertex and no face.
    pub fn empty(level: f64) -> Self {
        Self {
            level,
            vertices: Mat::zeros(0, 3),
            faces: Mat::from_fn(0, 3, |_, _| 0),
        }
    }

    /// True when the surface has no vertex or no face.
    pub fn is_empty(&self) -> bool {
        self.vertices.nrows() == 0 || self.faces.nrows() == 0
    }
}

/// Surfaces for a set of levels.
#[derive(Clone, Debug)]
pub struct IsoSurfaces {
    /// One surface per requested level, in request order. Skipped levels
    /// have an empty surface.
    pub surfaces: Vec<IsoSurface>,

    /// Levels that were out of range or failed to extract, in request order.
    pub skipped_levels: Vec<f64>,
}

/// A builder for [`IsoSurfaceExtractor`].
///
/// Created with [`IsoSurfaceExtractor::builder`].
pub struct IsoSurfaceExtractorBuilder {
    source: SourceGeometry,
    values: Vec<f64>,
    params: IsoSurfaceParams,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl IsoSurfaceExtractorBuilder {
    fn new(source: SourceGeometry, values: Vec<f64>) -> Self {
        Self {
            source,
            values,
            params: IsoSurfaceParams::default(),
            progress_callback: None,
        }
    }

    /// Sets custom gridding parameters.
    pub fn params(mut self, params: IsoSurfaceParams) -> Self {
        self.params = params;
        self
    }

    /// Optional callback for reporting gridding and surfacing progress.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Builds the sampling grid and scalar field.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the source and values cannot be turned
    /// into a valid grid.
    pub fn build(self) -> Result<IsoSurfaceExtractor, ConfigError> {
        IsoSurfaceExtractor::new(self.source, &self.values, self.params, self.progress_callback)
    }
}

/// Extracts iso-surfaces from a scalar field gridded from a source object.
///
/// Block models are used on their own grid, scattered samples are first
/// resampled onto a regular grid with an inverse-distance weighted average.
///
/// # Example
/// ```
/// use faer::Mat;
/// use ferreus_iso::{IsoSurfaceExtractor, IsoSurfaceParams, ScatteredPoints};
///
/// // Samples on a 5 x 5 x 5 lattice with value equal to x.
/// let points = Mat::from_fn(125, 3, |i, j| ((i / 5usize.pow(j as u32)) % 5) as f64);
/// let values: Vec<f64> = (0..125).map(|i| points[(i, 0)]).collect();
///
/// let params = IsoSurfaceParams::builder().resolution(0.5).max_distance(2.0).build();
/// let extractor = IsoSurfaceExtractor::builder(ScatteredPoints::from_vertices(points), values)
///     .params(params)
///     .build()?;
///
/// let result = extractor.extract(&[2.0, 10.0]);
///
/// assert_eq!(result.surfaces.len(), 2);
/// assert!(!result.surfaces[0].is_empty());
/// assert_eq!(result.skipped_levels, vec![10.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct IsoSurfaceExtractor {
    grid: SamplingGrid,
    field: ScalarField,
    frame: Option<RotationFrame>,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl IsoSurfaceExtractor {
    /// Returns a builder for gridding `values` attached to `source`.
    ///
    /// Block model values are ordered z fastest, then u, then v. Scattered
    /// values follow the order of the source's locations.
    pub fn builder(
        source: impl Into<SourceGeometry>,
        values: impl Into<Vec<f64>>,
    ) -> IsoSurfaceExtractorBuilder {
        IsoSurfaceExtractorBuilder::new(source.into(), values.into())
    }

    fn new(
        source: SourceGeometry,
        values: &[f64],
        params: IsoSurfaceParams,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Self, ConfigError> {
        let (grid, field, frame) = match &source {
            SourceGeometry::Block(model) => {
                let (grid, field) = block_model_grid(model, values)?;
                (grid, field, Some(model.frame()))
            }
            SourceGeometry::Scattered(points) => {
                params.validate()?;
                let (grid, samples) = scattered_grid(points, values, params.resolution)?;

                report(
                    &progress_callback,
                    ProgressMsg::Message {
                        message: String::from("Interpolating the model onto a regular grid..."),
                    },
                );

                let estimates = weighted_average(
                    &samples.locations,
                    &samples.values,
                    &grid.lattice_points(),
                    params.num_neighbours,
                    params.max_distance,
                    params.threshold(),
                );
                let field = ScalarField::new(grid.shape(), estimates)?;
                (grid, field, None)
            }
        };

        Ok(Self {
            grid,
            field,
            frame,
            progress_callback,
        })
    }

    /// The regular grid the field is sampled on.
    pub fn grid(&self) -> &SamplingGrid {
        &self.grid
    }

    /// The gridded scalar values.
    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    /// Extracts one surface per level, in order.
    ///
    /// Levels outside the field's finite range, or that fail to extract, are
    /// returned as empty surfaces and listed in
    /// [`IsoSurfaces::skipped_levels`]. When any level is skipped a single
    /// [`ProgressMsg::LevelsSkipped`] is reported after the last level.
    pub fn extract(&self, levels: &[f64]) -> IsoSurfaces {
        let mut surfaces = Vec::with_capacity(levels.len());
        let mut skipped_levels = Vec::new();

        for &level in levels {
            match self.extract_level(level) {
                Ok(surface) => surfaces.push(surface),
                Err(_) => {
                    skipped_levels.push(level);
                    surfaces.push(IsoSurface::empty(level));
                }
            }
        }

        if !skipped_levels.is_empty() {
            report(
                &self.progress_callback,
                ProgressMsg::LevelsSkipped {
                    levels: skipped_levels.clone(),
                },
            );
        }

        IsoSurfaces {
            surfaces,
            skipped_levels,
        }
    }

    /// Extracts the surface for a single level.
    ///
    /// A surface whose vertices were all undefined is returned empty rather
    /// than as an error.
    pub fn extract_level(&self, level: f64) -> Result<IsoSurface, ExtractionError> {
        self.emit_stage(level, "Checking level range", 0.0);
        match self.field.finite_range() {
            Some((min, max)) if !(level < min || level > max) => {}
            _ => return Err(ExtractionError::OutOfRange { level }),
        }

        self.emit_stage(level, "Marching cubes", 0.1);
        let fragment = marching_cubes(&self.field, level)?;

        self.emit_stage(level, "Removing undefined vertices", 0.6);
        let mesh = remove_nan_vertices(fragment)?;

        if mesh.is_empty() {
            self.emit_stage(level, "Finished", 1.0);
            return Ok(IsoSurface::empty(level));
        }

        self.emit_stage(level, "Mapping to world coordinates", 0.8);
        let mapper = CoordinateMapper::new(&self.grid, self.frame);
        let vertices = mapper.to_world(&mesh.vertices);
        let faces = Mat::from_fn(mesh.faces.len(), 3, |row, col| mesh.faces[row][col]);

        self.emit_stage(level, "Finished", 1.0);

        Ok(IsoSurface {
            level,
            vertices,
            faces,
        })
    }

    fn emit_stage(&self, level: f64, stage: &str, progress: f64) {
        report(
            &self.progress_callback,
            ProgressMsg::SurfacingProgress {
                isovalue: level,
                stage: String::from(stage),
                progress,
            },
        );
    }
}

/// Grids `values` on `source` with `params` and extracts one surface per
/// level.
///
/// Shorthand for [`IsoSurfaceExtractor::builder`] followed by
/// [`IsoSurfaceExtractor::extract`].
pub fn iso_surfaces(
    source: impl Into<SourceGeometry>,
    values: impl Into<Vec<f64>>,
    levels: &[f64],
    params: IsoSurfaceParams,
) -> Result<IsoSurfaces, ConfigError> {
    let extractor = IsoSurfaceExtractor::builder(source, values)
        .params(params)
        .build()?;
    Ok(extractor.extract(levels))
}
