/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the configuration and per-level extraction error types.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::{error::Error, fmt};

/// Errors raised while turning a source object and its values into a
/// sampling grid and scalar field.
///
/// These are fatal: they are returned from
/// [`IsoSurfaceExtractorBuilder::build`](crate::IsoSurfaceExtractorBuilder::build)
/// before any level is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The scattered source has neither vertices nor centroids.
    MissingLocations,

    /// The block model has no shape.
    MissingShape,

    /// Scattered locations are not an `(N × 3)` matrix.
    InvalidLocationShape { ncols: usize },

    /// The number of values does not match the number of locations or cells.
    ValueCountMismatch { expected: usize, found: usize },

    /// A block model delimiter array does not have `cells + 1` entries.
    DelimiterMismatch {
        axis: &'static str,
        expected: usize,
        found: usize,
    },

    /// A block model delimiter array is not strictly increasing.
    NonIncreasingAxis { axis: &'static str },

    /// An axis of the sampling grid has fewer than two coordinates.
    DegenerateAxis { axis: &'static str, len: usize },

    /// No sample has both finite coordinates and a finite value.
    NoFiniteData,

    /// The grid resolution is not a finite, strictly positive number.
    InvalidResolution(f64),

    /// The maximum interpolation distance is NaN or not strictly positive.
    InvalidMaxDistance(f64),

    /// The number of interpolation neighbours is zero.
    InvalidNeighbourCount,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingLocations => {
                write!(f, "input entity must have vertices or centroids")
            }
            ConfigError::MissingShape => write!(f, "block model must have a shape"),
            ConfigError::InvalidLocationShape { ncols } => {
                write!(f, "locations must have 3 columns (x, y, z), found {ncols}")
            }
            ConfigError::ValueCountMismatch { expected, found } => {
                write!(f, "expected {expected} values, found {found}")
            }
            ConfigError::DelimiterMismatch {
                axis,
                expected,
                found,
            } => write!(
                f,
                "{axis} cell delimiters: expected {expected} entries, found {found}"
            ),
            ConfigError::NonIncreasingAxis { axis } => {
                write!(f, "{axis} cell delimiters must be strictly increasing")
            }
            ConfigError::DegenerateAxis { axis, len } => write!(
                f,
                "{axis} axis has {len} coordinate(s); at least 2 are required"
            ),
            ConfigError::NoFiniteData => write!(f, "no finite data values to grid"),
            ConfigError::InvalidResolution(resolution) => {
                write!(f, "resolution must be finite and positive, got {resolution}")
            }
            ConfigError::InvalidMaxDistance(max_distance) => {
                write!(f, "max distance must be positive, got {max_distance}")
            }
            ConfigError::InvalidNeighbourCount => {
                write!(f, "at least one interpolation neighbour is required")
            }
        }
    }
}

impl Error for ConfigError {}

/// Reasons a single level produced no surface.
///
/// These never abort a batch; the level is recorded as skipped and processing
/// continues with the next level.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The level lies outside the finite range of the scalar field, or the
    /// field has no finite value.
    OutOfRange { level: f64 },

    /// Marching cubes produced no triangle for the level.
    NoSurface { level: f64 },

    /// The scalar field is smaller than a single 2×2×2 cube.
    GridTooSmall { shape: [usize; 3] },

    /// The surviving vertex count does not fit in a `u32` face index.
    IndexOverflow { num_vertices: usize },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::OutOfRange { level } => {
                write!(f, "level {level} is outside the data range")
            }
            ExtractionError::NoSurface { level } => {
                write!(f, "no surface found at level {level}")
            }
            ExtractionError::GridTooSmall { shape } => write!(
                f,
                "grid of shape {}x{}x{} is smaller than 2x2x2",
                shape[0], shape[1], shape[2]
            ),
            ExtractionError::IndexOverflow { num_vertices } => {
                write!(f, "{num_vertices} vertices cannot be indexed with u32")
            }
        }
    }
}

impl Error for ExtractionError {}
