//! Dataset trait.
//!
//! A [`Dataset`] is a point set with optional cell topology and two attribute
//! tables, one indexed by point and one indexed by cell.

use glam::{Vec2, Vec3};

use crate::attributes::{DataArray, DataMap, FieldAssociation};
use crate::error::{MeshPrepError, Result};

/// A mesh-like object that carries per-point and per-cell attributes.
pub trait Dataset {
    /// Returns the type name of this dataset (e.g., "`PolyData`").
    fn type_name(&self) -> &'static str;

    /// Returns the point positions.
    fn points(&self) -> &[Vec3];

    /// Returns the number of points.
    fn n_points(&self) -> usize {
        self.points().len()
    }

    /// Returns the number of cells.
    fn n_cells(&self) -> usize;

    /// Returns whether this dataset is a pure surface (polygons only, no volumetric cells).
    fn is_surface(&self) -> bool;

    /// Returns the per-point attribute table.
    fn point_data(&self) -> &DataMap;

    /// Returns the mutable per-point attribute table.
    fn point_data_mut(&mut self) -> &mut DataMap;

    /// Returns the per-cell attribute table.
    fn cell_data(&self) -> &DataMap;

    /// Returns the mutable per-cell attribute table.
    fn cell_data_mut(&mut self) -> &mut DataMap;

    /// Returns the active texture coordinates, if any.
    fn t_coords(&self) -> Option<&[Vec2]>;

    /// Sets or clears the active texture coordinates.
    fn set_t_coords(&mut self, t_coords: Option<Vec<Vec2>>);

    /// Returns the axis-aligned bounding box.
    ///
    /// Returns `None` if the dataset has no points.
    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let points = self.points();
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    /// Adds a per-point array, replacing any point array with the same name.
    fn add_point_array(&mut self, name: impl Into<String>, array: impl Into<DataArray>) -> Result<()>
    where
        Self: Sized,
    {
        let array = array.into();
        check_len(self.n_points(), &array)?;
        self.point_data_mut().insert(name, array);
        Ok(())
    }

    /// Adds a per-cell array, replacing any cell array with the same name.
    fn add_cell_array(&mut self, name: impl Into<String>, array: impl Into<DataArray>) -> Result<()>
    where
        Self: Sized,
    {
        let array = array.into();
        check_len(self.n_cells(), &array)?;
        self.cell_data_mut().insert(name, array);
        Ok(())
    }

    /// Looks up a point or cell array by name.
    ///
    /// When both tables hold an array with this name, `preference` decides.
    fn get_array(&self, name: &str, preference: FieldAssociation) -> Result<&DataArray> {
        match (self.point_data().get(name), self.cell_data().get(name)) {
            (Some(p), Some(c)) => Ok(match preference {
                FieldAssociation::Point => p,
                FieldAssociation::Cell => c,
            }),
            (Some(p), None) => Ok(p),
            (None, Some(c)) => Ok(c),
            (None, None) => Err(MeshPrepError::ArrayNotFound(name.to_string())),
        }
    }
}

fn check_len(expected: usize, array: &DataArray) -> Result<()> {
    if array.len() == expected {
        Ok(())
    } else {
        Err(MeshPrepError::SizeMismatch {
            expected,
            actual: array.len(),
        })
    }
}
