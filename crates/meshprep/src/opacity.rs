//! Opacity argument resolution.
//!
//! An opacity argument comes in one of several shapes: the name of an
//! attribute on the mesh, the name of a preset curve, a literal per-element
//! array, a list of curve control points, or a single value. [`process_opacity`]
//! turns any of them into concrete values and reports whether the result is a
//! per-element array or a fixed-length curve.

use std::fmt;

use meshprep_core::{DataArray, Dataset, MeshPrepError, OpacityOptions, Result};
use meshprep_transfer::{from_control_points, OpacityTransferFunction};

/// An opacity argument as given by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum OpacitySpec {
    /// An attribute name on the mesh, or a preset curve name if no such attribute exists.
    Name(String),
    /// A literal per-point or per-cell array, or curve control points.
    Values(Vec<f32>),
    /// One opacity for the whole mesh.
    Uniform(f32),
}

impl From<&str> for OpacitySpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for OpacitySpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<f32>> for OpacitySpec {
    fn from(values: Vec<f32>) -> Self {
        Self::Values(values)
    }
}

impl From<&[f32]> for OpacitySpec {
    fn from(values: &[f32]) -> Self {
        Self::Values(values.to_vec())
    }
}

impl From<f32> for OpacitySpec {
    fn from(value: f32) -> Self {
        Self::Uniform(value)
    }
}

/// Resolved opacity values.
#[derive(Debug, Clone, PartialEq)]
pub enum OpacityValues {
    /// One value per point or per cell of the mesh.
    PerElement(Vec<f32>),
    /// A curve of `n_colors` samples to be mapped over the scalar range.
    Curve(Vec<f32>),
    /// One value for the whole mesh.
    Uniform(f32),
}

impl OpacityValues {
    /// Returns the values as a slice. A uniform value is a one-element slice.
    pub fn as_slice(&self) -> &[f32] {
        match self {
            Self::PerElement(v) | Self::Curve(v) => v,
            Self::Uniform(v) => std::slice::from_ref(v),
        }
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if there are no values.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Largest value, `None` when empty.
    pub fn max(&self) -> Option<f32> {
        self.as_slice().iter().copied().reduce(f32::max)
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        match self {
            Self::PerElement(v) => Self::PerElement(v.into_iter().map(f).collect()),
            Self::Curve(v) => Self::Curve(v.into_iter().map(f).collect()),
            Self::Uniform(v) => Self::Uniform(f(v)),
        }
    }
}

/// A non-fatal problem found in per-element opacity values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpacityWarning {
    /// Some values are greater than 1.
    ValuesOverOne,
    /// Some values are less than 0.
    ValuesBelowZero,
}

impl fmt::Display for OpacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValuesOverOne => f.write_str("opacity scalars contain values over 1"),
            Self::ValuesBelowZero => f.write_str("opacity scalars contain values less than 0"),
        }
    }
}

/// The result of [`process_opacity`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOpacity {
    /// The resolved values.
    pub values: OpacityValues,
    /// Warnings raised while resolving. They are also logged.
    pub warnings: Vec<OpacityWarning>,
}

impl ResolvedOpacity {
    /// Returns true if the values are one per point or per cell.
    pub fn is_literal(&self) -> bool {
        matches!(self.values, OpacityValues::PerElement(_))
    }

    /// Splits into the literal flag and the values.
    pub fn into_parts(self) -> (bool, OpacityValues) {
        (self.is_literal(), self.values)
    }
}

/// Value range used when inverting opacity into transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpacityRange {
    /// Values in `[0, 1]`, inverted as `1 - v`.
    Normalized,
    /// Values in `[0, 255]`, inverted as `255 - v`.
    Byte,
}

impl OpacityRange {
    fn full_scale(self) -> f32 {
        match self {
            Self::Normalized => 1.0,
            Self::Byte => 255.0,
        }
    }
}

/// Resolves an opacity argument against a mesh.
///
/// - A name is first looked up as a point or cell array (honoring
///   `options.preference`). If found, its values are used per element. When
///   `scalars` is given, both must have the same length. If no such array
///   exists, the name is treated as a preset curve of `options.n_colors`
///   samples.
/// - Values whose length matches the point or cell count are used per
///   element; any other length is resampled as curve control points.
/// - A uniform value is passed through.
///
/// With `options.use_transparency`, the values are inverted. The value range
/// is guessed: a maximum of at most 1 means `[0, 1]`, anything else means
/// `[0, 255]` (a uniform value above 1 is left as is). Use
/// [`process_opacity_with_range`] to state the range explicitly.
///
/// # Errors
///
/// - [`MeshPrepError::OpacityShapeMismatch`] if a named array and `scalars`
///   differ in length.
/// - [`MeshPrepError::UnknownTransferFunction`] if a name matches neither an
///   array nor a preset.
/// - [`MeshPrepError::EmptyTransferFunction`] or
///   [`MeshPrepError::TransferFunctionTooLong`] for unusable control points.
pub fn process_opacity(
    mesh: &dyn Dataset,
    opacity: impl Into<OpacitySpec>,
    scalars: Option<&DataArray>,
    options: &OpacityOptions,
    transfer: &OpacityTransferFunction,
) -> Result<ResolvedOpacity> {
    let mut resolved = resolve(mesh, opacity.into(), scalars, options, transfer)?;
    if options.use_transparency {
        resolved.values = match resolved.values.max() {
            Some(max) if max <= 1.0 => resolved.values.map(|v| 1.0 - v),
            _ => match resolved.values {
                uniform @ OpacityValues::Uniform(_) => uniform,
                values => values.map(|v| 255.0 - v),
            },
        };
    }
    Ok(resolved)
}

/// Like [`process_opacity`], but inverts for transparency using an explicit
/// value range instead of guessing it from the values.
pub fn process_opacity_with_range(
    mesh: &dyn Dataset,
    opacity: impl Into<OpacitySpec>,
    scalars: Option<&DataArray>,
    options: &OpacityOptions,
    transfer: &OpacityTransferFunction,
    range: OpacityRange,
) -> Result<ResolvedOpacity> {
    let mut resolved = resolve(mesh, opacity.into(), scalars, options, transfer)?;
    if options.use_transparency {
        let scale = range.full_scale();
        resolved.values = resolved.values.map(|v| scale - v);
    }
    Ok(resolved)
}

fn resolve(
    mesh: &dyn Dataset,
    opacity: OpacitySpec,
    scalars: Option<&DataArray>,
    options: &OpacityOptions,
    transfer: &OpacityTransferFunction,
) -> Result<ResolvedOpacity> {
    let mut warnings = Vec::new();

    let values = match opacity {
        OpacitySpec::Name(name) => match named_values(mesh, &name, options) {
            Ok(values) => {
                if values.iter().any(|&v| v > 1.0) {
                    warnings.push(OpacityWarning::ValuesOverOne);
                }
                if values.iter().any(|&v| v < 0.0) {
                    warnings.push(OpacityWarning::ValuesBelowZero);
                }
                for warning in &warnings {
                    log::warn!("'{name}': {warning}");
                }
                if let Some(scalars) = scalars {
                    if scalars.len() != values.len() {
                        return Err(MeshPrepError::OpacityShapeMismatch {
                            opacity: values.len(),
                            scalars: scalars.len(),
                        });
                    }
                }
                OpacityValues::PerElement(values)
            }
            Err(MeshPrepError::ArrayNotFound(_)) => {
                log::debug!("no array named '{name}', using it as a transfer function");
                OpacityValues::Curve(transfer.generate(&name, options.n_colors)?)
            }
            Err(e) => return Err(e),
        },
        OpacitySpec::Values(values) => {
            if values.len() == mesh.n_points() || values.len() == mesh.n_cells() {
                OpacityValues::PerElement(values)
            } else {
                OpacityValues::Curve(from_control_points(
                    &values,
                    options.n_colors,
                    options.interpolation,
                )?)
            }
        }
        OpacitySpec::Uniform(value) => OpacityValues::Uniform(value),
    };

    Ok(ResolvedOpacity { values, warnings })
}

/// Looks up a named array and converts it to floats.
///
/// Vector and texture coordinate arrays are not opacities, so they count as missing.
fn named_values(mesh: &dyn Dataset, name: &str, options: &OpacityOptions) -> Result<Vec<f32>> {
    match mesh.get_array(name, options.preference)? {
        DataArray::Scalars(v) => Ok(v.clone()),
        DataArray::Ids(v) => Ok(v.iter().map(|&i| i as f32).collect()),
        DataArray::Vectors(_) | DataArray::TCoords(_) => {
            log::debug!("array '{name}' has more than one component");
            Err(MeshPrepError::ArrayNotFound(name.to_string()))
        }
    }
}
