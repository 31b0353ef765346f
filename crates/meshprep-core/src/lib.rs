//! Core abstractions for meshprep.
//!
//! This crate provides the fundamental traits and types used throughout meshprep:
//! - [`Dataset`] trait for mesh-like objects with point and cell attributes
//! - [`DataArray`] and [`DataMap`] for named per-element attribute arrays
//! - Error types and configuration options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod attributes;
pub mod dataset;
pub mod error;
pub mod options;

pub use attributes::{gather, ArrayKind, DataArray, DataMap, FieldAssociation};
pub use dataset::Dataset;
pub use error::{MeshPrepError, Result};
pub use options::{OpacityOptions, Options, ShadingOptions, TransferInterpolation};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
