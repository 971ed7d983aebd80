/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the configuration type for gridding and iso-surface extraction.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares the configuration type for gridding and iso-surface extraction.
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters controlling how scattered data is gridded before surfacing.
///
/// Block models are already regular, so `resolution` and `max_distance` are
/// only read for scattered sources.
///
/// ### Default Values
/// - `resolution`: `50.0`
/// - `max_distance`: `500.0`
/// - `num_neighbours`: `8`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct IsoSurfaceParams {
    /// Spacing of the regular sampling grid, in world units.
    pub resolution: f64,

    /// Maximum distance from a grid point to the samples used to estimate
    /// its value. Grid points with no sample within this distance are left
    /// undefined, which leaves holes in the surfaces. May be infinite.
    pub max_distance: f64,

    /// Number of nearest samples averaged at each grid point.
    pub num_neighbours: usize,
}

impl Default for IsoSurfaceParams {
    fn default() -> Self {
        IsoSurfaceParams {
            resolution: 50.0,
            max_distance: 500.0,
            num_neighbours: 8,
        }
    }
}

impl IsoSurfaceParams {
    /// Returns a new [`IsoSurfaceParamsBuilder`] populated with defaults.
    pub fn builder() -> IsoSurfaceParamsBuilder {
        IsoSurfaceParamsBuilder::new()
    }

    /// Smoothing length added to every sample distance in the weighted
    /// average. Samples closer than this dominate the estimate.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.resolution / 2.0
    }

    /// Checks the parameters used when gridding scattered data.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(ConfigError::InvalidResolution(self.resolution));
        }
        if !(self.max_distance > 0.0) {
            return Err(ConfigError::InvalidMaxDistance(self.max_distance));
        }
        if self.num_neighbours == 0 {
            return Err(ConfigError::InvalidNeighbourCount);
        }
        Ok(())
    }
}

/// A convenience builder for constructing an [`IsoSurfaceParams`] instance.
///
/// The builder should be called via the [`IsoSurfaceParams::builder`] method.
///
/// See [`IsoSurfaceParams`] for details on each field.
#[derive(Debug, Clone)]
pub struct IsoSurfaceParamsBuilder {
    pub resolution: f64,
    pub max_distance: f64,
    pub num_neighbours: usize,
}

impl IsoSurfaceParamsBuilder {
    fn new() -> Self {
        let defaults = IsoSurfaceParams::default();
        Self {
            resolution: defaults.resolution,
            max_distance: defaults.max_distance,
            num_neighbours: defaults.num_neighbours,
        }
    }

    /// Sets the grid spacing.
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the maximum interpolation distance.
    pub fn max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Sets the number of neighbours averaged per grid point.
    pub fn num_neighbours(mut self, num_neighbours: usize) -> Self {
        self.num_neighbours = num_neighbours;
        self
    }

    /// Builds and returns an [`IsoSurfaceParams`] instance.
    pub fn build(self) -> IsoSurfaceParams {
        IsoSurfaceParams {
            resolution: self.resolution,
            max_distance: self.max_distance,
            num_neighbours: self.num_neighbours,
        }
    }
}
