//! Dataset implementations for meshprep.
//!
//! This crate provides concrete implementations of the [`Dataset`] trait:
//! - [`PolyData`]: polygonal surfaces, with point normal computation and
//!   sharp-edge splitting
//! - [`UnstructuredGrid`]: volumetric and mixed cells, with boundary surface
//!   extraction
//! - [`AnyDataset`]: an owned value of either kind

// Geometry code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod any_dataset;
pub mod poly_data;
pub mod unstructured_grid;

pub use any_dataset::AnyDataset;
pub use poly_data::{NormalsOptions, PolyData, NORMALS};
pub use unstructured_grid::{CellType, UnstructuredGrid, ORIGINAL_CELL_IDS, ORIGINAL_POINT_IDS};

pub use meshprep_core::Dataset;
