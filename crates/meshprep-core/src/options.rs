//! Configuration options for meshprep.

use serde::{Deserialize, Serialize};

use crate::attributes::FieldAssociation;
use crate::error::Result;

/// Top-level configuration, grouping shading and opacity settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Smooth shading preparation settings.
    pub shading: ShadingOptions,

    /// Opacity resolution settings.
    pub opacity: OpacityOptions,
}

impl Options {
    /// Parses options from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Settings for smooth shading preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingOptions {
    /// Carry the mesh's texture coordinates through re-indexing.
    pub texture: bool,

    /// Split edges sharper than `feature_angle` so normals do not blend across them.
    pub split_sharp_edges: bool,

    /// Angle in degrees above which an edge is considered sharp.
    pub feature_angle: f32,
}

impl Default for ShadingOptions {
    fn default() -> Self {
        Self {
            texture: false,
            split_sharp_edges: false,
            feature_angle: 30.0,
        }
    }
}

impl ShadingOptions {
    /// Creates shading options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether texture coordinates are carried through.
    pub fn with_texture(mut self, texture: bool) -> Self {
        self.texture = texture;
        self
    }

    /// Sets whether sharp edges are split.
    pub fn with_split_sharp_edges(mut self, split: bool) -> Self {
        self.split_sharp_edges = split;
        self
    }

    /// Sets the feature angle in degrees.
    pub fn with_feature_angle(mut self, degrees: f32) -> Self {
        self.feature_angle = degrees;
        self
    }
}

/// How control points of an opacity curve are resampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransferInterpolation {
    /// Piecewise linear between control points.
    #[default]
    Linear,
    /// Value of the closest control point.
    Nearest,
}

/// Settings for opacity resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityOptions {
    /// Table to prefer when a name exists as both a point and a cell array.
    pub preference: FieldAssociation,

    /// Number of entries in a generated opacity curve.
    pub n_colors: usize,

    /// Invert the opacity so the values correspond to transparency.
    pub use_transparency: bool,

    /// Resampling used for control-point curves.
    pub interpolation: TransferInterpolation,
}

impl Default for OpacityOptions {
    fn default() -> Self {
        Self {
            preference: FieldAssociation::Point,
            n_colors: 256,
            use_transparency: false,
            interpolation: TransferInterpolation::Linear,
        }
    }
}

impl OpacityOptions {
    /// Creates opacity options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the point/cell preference.
    pub fn with_preference(mut self, preference: FieldAssociation) -> Self {
        self.preference = preference;
        self
    }

    /// Sets the curve length.
    pub fn with_n_colors(mut self, n_colors: usize) -> Self {
        self.n_colors = n_colors;
        self
    }

    /// Sets whether values are inverted into transparency.
    pub fn with_use_transparency(mut self, use_transparency: bool) -> Self {
        self.use_transparency = use_transparency;
        self
    }

    /// Sets the control-point interpolation.
    pub fn with_interpolation(mut self, interpolation: TransferInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}
