/////////////////////////////////////////////////////////////////////////////////////////////
//
// Groups the marching cubes extractor, mesh clean-up and surface output.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

pub mod lookup_tables;
pub mod marching_cubes;
pub mod sanitize;
pub mod surfacing_io;
