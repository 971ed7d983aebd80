/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports numeric helpers used across the ferreus_iso crates.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the `ferreus_iso` crate
mod utils;

pub use utils::{
    arange, cell_centres, finite_range, get_distance, get_finite_extents, is_strictly_increasing,
};
