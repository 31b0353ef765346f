//! meshprep: prepares meshes for smooth-shaded rendering.
//!
//! Two operations sit between a user's dataset and a renderer:
//!
//! - [`prepare_smooth_shading`] turns any dataset into a surface with point
//!   normals, optionally splitting sharp edges, and keeps caller-supplied
//!   scalars and texture coordinates aligned with the output points.
//! - [`process_opacity`] resolves an opacity argument (an attribute name, a
//!   literal array, a preset curve name or control points, or a single value)
//!   into concrete opacity values.
//!
//! # Quick Start
//!
//! ```
//! use meshprep::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
//!     let grid = UnstructuredGrid::new_tet_mesh(points, &[[0, 1, 2, 3]])?;
//!     let scalars = DataArray::Scalars(vec![0.0, 1.0, 2.0, 3.0]);
//!
//!     let (surface, scalars) =
//!         prepare_smooth_shading(grid, Some(scalars), &ShadingOptions::default())?;
//!     assert!(surface.is_surface());
//!     assert_eq!(scalars.map(|s| s.len()), Some(surface.n_points()));
//!
//!     let transfer = OpacityTransferFunction::new();
//!     let opacity = process_opacity(
//!         &surface,
//!         "sigmoid",
//!         None,
//!         &OpacityOptions::default(),
//!         &transfer,
//!     )?;
//!     assert!(!opacity.is_literal());
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `meshprep-core`: attribute arrays, the [`Dataset`] trait, errors, options
//! - `meshprep-structures`: [`PolyData`], [`UnstructuredGrid`], surface extraction
//! - `meshprep-transfer`: the [`OpacityTransferFunction`] preset registry

// Numeric conversions between ids and floats are intentional
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod init;
pub mod opacity;
pub mod shading;

pub use init::init_logging;
pub use opacity::{
    process_opacity, process_opacity_with_range, OpacityRange, OpacitySpec, OpacityValues,
    OpacityWarning, ResolvedOpacity,
};
pub use shading::{prepare_smooth_shading, TEMP_ORIGINAL_IDS};

// Re-export core types
pub use meshprep_core::{
    ArrayKind, DataArray, DataMap, Dataset, FieldAssociation, MeshPrepError, OpacityOptions,
    Options, Result, ShadingOptions, TransferInterpolation, Vec2, Vec3,
};

// Re-export structures
pub use meshprep_structures::{
    AnyDataset, CellType, NormalsOptions, PolyData, UnstructuredGrid, NORMALS,
    ORIGINAL_CELL_IDS, ORIGINAL_POINT_IDS,
};

// Re-export transfer functions
pub use meshprep_transfer::{from_control_points, CurveShape, OpacityTransferFunction, TransferPreset};
