//! Named attribute arrays and the tables that hold them.
//!
//! A [`DataArray`] holds one value per point or per cell of a dataset. Arrays are
//! grouped by association into a [`DataMap`]: every dataset carries one map for
//! its points and one for its cells.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{MeshPrepError, Result};

/// The kind of values stored in a [`DataArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    /// Scalar values (single float per element).
    Scalars,
    /// Integer ids (single index per element).
    Ids,
    /// Vector values (Vec3 per element).
    Vectors,
    /// Texture coordinates (Vec2 per element).
    TCoords,
}

/// A typed array with one entry per point or cell.
#[derive(Debug, Clone, PartialEq)]
pub enum DataArray {
    /// One float per element.
    Scalars(Vec<f32>),
    /// One index per element.
    Ids(Vec<u32>),
    /// One 3D vector per element.
    Vectors(Vec<Vec3>),
    /// One texture coordinate per element.
    TCoords(Vec<Vec2>),
}

impl DataArray {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalars(v) => v.len(),
            Self::Ids(v) => v.len(),
            Self::Vectors(v) => v.len(),
            Self::TCoords(v) => v.len(),
        }
    }

    /// Returns true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the kind of this array.
    #[must_use]
    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Scalars(_) => ArrayKind::Scalars,
            Self::Ids(_) => ArrayKind::Ids,
            Self::Vectors(_) => ArrayKind::Vectors,
            Self::TCoords(_) => ArrayKind::TCoords,
        }
    }

    /// Gathers elements by index, so that `out[i] == self[indices[i]]`.
    ///
    /// The result has `indices.len()` elements. Indices may repeat.
    pub fn take(&self, indices: &[u32]) -> Result<DataArray> {
        Ok(match self {
            Self::Scalars(v) => Self::Scalars(gather(v, indices)?),
            Self::Ids(v) => Self::Ids(gather(v, indices)?),
            Self::Vectors(v) => Self::Vectors(gather(v, indices)?),
            Self::TCoords(v) => Self::TCoords(gather(v, indices)?),
        })
    }

    /// Returns the values as floats, if this is a scalar array.
    #[must_use]
    pub fn as_scalars(&self) -> Option<&[f32]> {
        match self {
            Self::Scalars(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the values as ids, if this is an id array.
    #[must_use]
    pub fn as_ids(&self) -> Option<&[u32]> {
        match self {
            Self::Ids(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the values as vectors, if this is a vector array.
    #[must_use]
    pub fn as_vectors(&self) -> Option<&[Vec3]> {
        match self {
            Self::Vectors(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the values as texture coordinates, if this is a texture coordinate array.
    #[must_use]
    pub fn as_t_coords(&self) -> Option<&[Vec2]> {
        match self {
            Self::TCoords(v) => Some(v),
            _ => None,
        }
    }

    /// Largest scalar value. `None` for empty or non-scalar arrays.
    #[must_use]
    pub fn max(&self) -> Option<f32> {
        self.as_scalars()?.iter().copied().reduce(f32::max)
    }

    /// Smallest scalar value. `None` for empty or non-scalar arrays.
    #[must_use]
    pub fn min(&self) -> Option<f32> {
        self.as_scalars()?.iter().copied().reduce(f32::min)
    }
}

impl From<Vec<f32>> for DataArray {
    fn from(values: Vec<f32>) -> Self {
        Self::Scalars(values)
    }
}

impl From<Vec<u32>> for DataArray {
    fn from(values: Vec<u32>) -> Self {
        Self::Ids(values)
    }
}

impl From<Vec<Vec3>> for DataArray {
    fn from(values: Vec<Vec3>) -> Self {
        Self::Vectors(values)
    }
}

impl From<Vec<Vec2>> for DataArray {
    fn from(values: Vec<Vec2>) -> Self {
        Self::TCoords(values)
    }
}

/// Gathers `values` by index, so that `out[i] == values[indices[i]]`.
pub fn gather<T: Copy>(values: &[T], indices: &[u32]) -> Result<Vec<T>> {
    indices
        .iter()
        .map(|&i| {
            values
                .get(i as usize)
                .copied()
                .ok_or(MeshPrepError::IndexOutOfBounds {
                    index: i as usize,
                    len: values.len(),
                })
        })
        .collect()
}

/// An ordered table of named arrays.
///
/// Inserting under an existing name replaces the old array in place, so the
/// insertion order of names is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMap {
    arrays: Vec<(String, DataArray)>,
}

impl DataMap {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an array, replacing any array with the same name.
    pub fn insert(&mut self, name: impl Into<String>, array: impl Into<DataArray>) {
        let name = name.into();
        let array = array.into();
        if let Some(slot) = self.arrays.iter_mut().find(|(n, _)| *n == name) {
            log::debug!("replacing array '{name}'");
            slot.1 = array;
        } else {
            self.arrays.push((name, array));
        }
    }

    /// Gets an array by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    /// Gets a mutable array by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        self.arrays
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a)
    }

    /// Removes and returns an array by name.
    pub fn remove(&mut self, name: &str) -> Option<DataArray> {
        let idx = self.arrays.iter().position(|(n, _)| n == name)?;
        Some(self.arrays.remove(idx).1)
    }

    /// Returns true if an array with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns all array names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over `(name, array)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataArray)> {
        self.arrays.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Returns the number of arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns true if the table holds no arrays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Re-indexes every array through `indices`.
    ///
    /// Used whenever the elements the table is attached to are permuted,
    /// filtered or duplicated.
    pub fn take_all(&self, indices: &[u32]) -> Result<DataMap> {
        let arrays = self
            .arrays
            .iter()
            .map(|(n, a)| Ok((n.clone(), a.take(indices)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(DataMap { arrays })
    }
}

/// Which table of a dataset an array lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldAssociation {
    /// One value per point.
    #[default]
    Point,
    /// One value per cell.
    Cell,
}

impl FromStr for FieldAssociation {
    type Err = MeshPrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "point" | "points" => Ok(Self::Point),
            "cell" | "cells" => Ok(Self::Cell),
            _ => Err(MeshPrepError::InvalidFieldAssociation(s.to_string())),
        }
    }
}

impl fmt::Display for FieldAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point => f.write_str("point"),
            Self::Cell => f.write_str("cell"),
        }
    }
}
