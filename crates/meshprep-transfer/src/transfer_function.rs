//! Opacity transfer functions.
//!
//! An opacity transfer function is a fixed-length table with one opacity per
//! color-table entry. Tables use the 8-bit range: entries are whole numbers in
//! `0..=255`, stored as `f32`.

use std::collections::HashMap;

use meshprep_core::{MeshPrepError, Result, TransferInterpolation};

/// Shape of a named opacity curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    /// Evenly spaced from 0 to 255.
    Linear,
    /// Geometrically spaced from 1e-6 to 255.
    Geom,
    /// Logistic curve sampled over `[-k, k]`.
    Sigmoid(f64),
}

/// A named opacity curve.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPreset {
    /// Preset name.
    pub name: String,
    /// Curve shape.
    pub shape: CurveShape,
    /// Whether the curve runs from opaque to transparent.
    pub reversed: bool,
}

impl TransferPreset {
    /// Creates a new preset.
    pub fn new(name: impl Into<String>, shape: CurveShape, reversed: bool) -> Self {
        Self {
            name: name.into(),
            shape,
            reversed,
        }
    }

    /// Samples the curve at `n_colors` evenly spaced positions.
    pub fn sample(&self, n_colors: usize) -> Vec<f32> {
        let values = match self.shape {
            CurveShape::Linear => linspace(0.0, 255.0, n_colors),
            CurveShape::Geom => geomspace(1e-6, 255.0, n_colors),
            CurveShape::Sigmoid(k) => linspace(-k, k, n_colors)
                .into_iter()
                .map(|x| 255.0 / (1.0 + (-x).exp()))
                .collect(),
        };

        let mut table: Vec<f32> = values.into_iter().map(to_byte).collect();
        if self.reversed {
            table.reverse();
        }
        table
    }
}

/// Registry for named opacity transfer functions.
#[derive(Default)]
pub struct OpacityTransferFunction {
    presets: HashMap<String, TransferPreset>,
}

impl OpacityTransferFunction {
    /// Creates a new registry with the default presets.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        for reversed in [false, true] {
            let suffix = if reversed { "_r" } else { "" };
            self.register(TransferPreset::new(
                format!("linear{suffix}"),
                CurveShape::Linear,
                reversed,
            ));
            self.register(TransferPreset::new(
                format!("geom{suffix}"),
                CurveShape::Geom,
                reversed,
            ));
            self.register(TransferPreset::new(
                format!("sigmoid{suffix}"),
                CurveShape::Sigmoid(10.0),
                reversed,
            ));
            for k in 3..=10 {
                self.register(TransferPreset::new(
                    format!("sigmoid_{k}{suffix}"),
                    CurveShape::Sigmoid(f64::from(k)),
                    reversed,
                ));
            }
        }
    }

    /// Registers a preset, replacing any preset with the same name.
    pub fn register(&mut self, preset: TransferPreset) {
        self.presets.insert(preset.name.clone(), preset);
    }

    /// Gets a preset by name.
    pub fn get(&self, name: &str) -> Option<&TransferPreset> {
        self.presets.get(name)
    }

    /// Returns all preset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Generates the table of a named preset.
    pub fn generate(&self, name: &str, n_colors: usize) -> Result<Vec<f32>> {
        let preset = self
            .get(name)
            .ok_or_else(|| MeshPrepError::UnknownTransferFunction {
                name: name.to_string(),
                valid: self.names().into_iter().map(String::from).collect(),
            })?;
        log::debug!("generating '{name}' opacity curve with {n_colors} entries");
        Ok(preset.sample(n_colors))
    }
}

/// Builds a table from user control points.
///
/// A list exactly `n_colors` long is taken as a ready-made table. Shorter lists
/// are spread over the table and resampled; values outside `[0, 1]` are first
/// rescaled into it. The result is in the 8-bit range.
pub fn from_control_points(
    points: &[f32],
    n_colors: usize,
    interpolation: TransferInterpolation,
) -> Result<Vec<f32>> {
    if points.is_empty() {
        return Err(MeshPrepError::EmptyTransferFunction);
    }
    if points.len() == n_colors {
        return Ok(points.to_vec());
    }
    if points.len() > n_colors {
        return Err(MeshPrepError::TransferFunctionTooLong {
            len: points.len(),
            n_colors,
        });
    }

    let mut values: Vec<f64> = points.iter().map(|&v| f64::from(v)).collect();
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi > 1.0 || lo < 0.0) && hi > lo {
        for v in &mut values {
            *v = (*v - lo) / (hi - lo);
        }
    }

    let n = n_colors as f64;
    let anchors: Vec<f64> = linspace(0.0, n, values.len())
        .into_iter()
        .map(f64::trunc)
        .collect();
    let table = linspace(0.0, n, n_colors)
        .into_iter()
        .map(|x| {
            let x = x.trunc();
            let v = match interpolation {
                TransferInterpolation::Linear => interp(x, &anchors, &values),
                TransferInterpolation::Nearest => nearest(x, &anchors, &values),
            };
            to_byte(v.clamp(0.0, 1.0) * 255.0)
        })
        .collect();
    Ok(table)
}

/// Truncates to a whole number in the 8-bit range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(v: f64) -> f32 {
    f32::from(v as u8)
}

/// `n` evenly spaced values from `start` to `stop`, both included.
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// `n` geometrically spaced values from `start` to `stop`, both included.
fn geomspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let mut values: Vec<f64> = linspace(start.ln(), stop.ln(), n)
        .into_iter()
        .map(f64::exp)
        .collect();
    if let Some(first) = values.first_mut() {
        *first = start;
    }
    if n > 1 {
        values[n - 1] = stop;
    }
    values
}

/// Piecewise linear interpolation, clamped to the end values outside the anchors.
fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if x <= xs[0] {
        return ys[0];
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        return ys[last];
    }
    let i = xs.partition_point(|&a| a <= x) - 1;
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + t * (ys[i + 1] - ys[i])
}

/// Value of the closest anchor; ties go to the earlier anchor.
fn nearest(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let mut best = 0;
    for (i, &a) in xs.iter().enumerate() {
        if (a - x).abs() < (xs[best] - x).abs() {
            best = i;
        }
    }
    ys[best]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_presets() {
        let registry = OpacityTransferFunction::new();
        let names = registry.names();
        assert_eq!(names.len(), 22);
        for name in ["linear", "linear_r", "geom", "geom_r", "sigmoid", "sigmoid_5_r"] {
            assert!(names.contains(&name), "missing preset {name}");
        }
    }

    #[test]
    fn test_linear() {
        let table = OpacityTransferFunction::new().generate("linear", 256).unwrap();
        assert_eq!(table.len(), 256);
        assert_eq!(table[0], 0.0);
        assert_eq!(table[255], 255.0);
        assert!(table.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_reversed() {
        let registry = OpacityTransferFunction::new();
        let mut forward = registry.generate("sigmoid", 64).unwrap();
        let reversed = registry.generate("sigmoid_r", 64).unwrap();
        forward.reverse();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_geom_endpoints() {
        let table = OpacityTransferFunction::new().generate("geom", 10).unwrap();
        assert_eq!(table[0], 0.0);
        assert_eq!(table[9], 255.0);
    }

    #[test]
    fn test_sigmoid_is_centered() {
        let table = OpacityTransferFunction::new().generate("sigmoid_3", 3).unwrap();
        assert_eq!(table[1], 127.0);
        assert!(table[0] < 20.0);
        assert!(table[2] > 235.0);
    }

    #[test]
    fn test_unknown_preset() {
        let err = OpacityTransferFunction::new()
            .generate("not_a_curve", 256)
            .unwrap_err();
        match err {
            MeshPrepError::UnknownTransferFunction { name, valid } => {
                assert_eq!(name, "not_a_curve");
                assert!(valid.contains(&"linear".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_control_points_full_table_passthrough() {
        let points = [0.0, 0.25, 0.5, 1.0];
        let table = from_control_points(&points, 4, TransferInterpolation::Linear).unwrap();
        assert_eq!(table, points.to_vec());
    }

    #[test]
    fn test_control_points_linear() {
        let table = from_control_points(&[0.0, 1.0], 256, TransferInterpolation::Linear).unwrap();
        assert_eq!(table.len(), 256);
        assert_eq!(table[0], 0.0);
        assert_eq!(table[255], 255.0);
        assert!(table.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_control_points_are_rescaled() {
        // Out-of-range control points are rescaled to [0, 1] first.
        let table = from_control_points(&[0.0, 10.0, 20.0], 11, TransferInterpolation::Linear).unwrap();
        assert_eq!(table[0], 0.0);
        assert_eq!(table[10], 255.0);
    }

    #[test]
    fn test_control_points_nearest() {
        let table = from_control_points(&[0.0, 1.0], 10, TransferInterpolation::Nearest).unwrap();
        assert_eq!(table.len(), 10);
        assert!(table.iter().all(|&v| v == 0.0 || v == 255.0));
        assert_eq!(table[0], 0.0);
        assert_eq!(table[9], 255.0);
    }

    #[test]
    fn test_control_points_errors() {
        assert!(matches!(
            from_control_points(&[], 8, TransferInterpolation::Linear),
            Err(MeshPrepError::EmptyTransferFunction)
        ));
        assert!(matches!(
            from_control_points(&[0.0, 0.5, 1.0], 2, TransferInterpolation::Linear),
            Err(MeshPrepError::TransferFunctionTooLong { len: 3, n_colors: 2 })
        ));
    }

    #[test]
    fn test_single_control_point_is_constant() {
        let table = from_control_points(&[0.5], 8, TransferInterpolation::Linear).unwrap();
        assert!(table.iter().all(|&v| v == 127.0));
    }

    proptest! {
        #[test]
        fn prop_tables_are_whole_bytes(
            n_colors in 8usize..512,
            points in prop::collection::vec(-5.0f32..5.0, 1..8),
        ) {
            let registry = OpacityTransferFunction::new();
            for name in registry.names() {
                let table = registry.generate(name, n_colors).unwrap();
                prop_assert_eq!(table.len(), n_colors);
                prop_assert!(table.iter().all(|&v| (0.0..=255.0).contains(&v) && v.fract() == 0.0));
            }

            let table = from_control_points(&points, n_colors, TransferInterpolation::Linear).unwrap();
            prop_assert_eq!(table.len(), n_colors);
            prop_assert!(table.iter().all(|&v| (0.0..=255.0).contains(&v) && v.fract() == 0.0));
        }
    }
}
