//! Opacity transfer curves for meshprep.
//!
//! This crate generates the fixed-length opacity tables used when opacity is
//! not given per element:
//! - Named presets (`linear`, `geom`, `sigmoid`, ...) via [`OpacityTransferFunction`]
//! - User control points resampled to the table length via [`from_control_points`]

// Table math converts between indices and floats
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod transfer_function;

pub use transfer_function::{from_control_points, CurveShape, OpacityTransferFunction, TransferPreset};
