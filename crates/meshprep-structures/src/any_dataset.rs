//! Owned dataset of any supported kind.

use glam::{Vec2, Vec3};
use meshprep_core::{DataMap, Dataset, Result};

use crate::{PolyData, UnstructuredGrid};

/// Either a surface or a volumetric dataset, owned.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyDataset {
    /// A polygonal surface.
    PolyData(PolyData),
    /// A grid of volumetric and planar cells.
    UnstructuredGrid(UnstructuredGrid),
}

impl AnyDataset {
    fn inner(&self) -> &dyn Dataset {
        match self {
            Self::PolyData(mesh) => mesh,
            Self::UnstructuredGrid(grid) => grid,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Dataset {
        match self {
            Self::PolyData(mesh) => mesh,
            Self::UnstructuredGrid(grid) => grid,
        }
    }

    /// Converts into a surface.
    ///
    /// A `PolyData` is returned as-is; a grid has its boundary surface extracted.
    /// The flag is true when extraction took place.
    pub fn into_surface(self) -> Result<(PolyData, bool)> {
        match self {
            Self::PolyData(mesh) => Ok((mesh, false)),
            Self::UnstructuredGrid(grid) => Ok((grid.extract_surface()?, true)),
        }
    }
}

impl From<PolyData> for AnyDataset {
    fn from(mesh: PolyData) -> Self {
        Self::PolyData(mesh)
    }
}

impl From<UnstructuredGrid> for AnyDataset {
    fn from(grid: UnstructuredGrid) -> Self {
        Self::UnstructuredGrid(grid)
    }
}

impl Dataset for AnyDataset {
    fn type_name(&self) -> &'static str {
        self.inner().type_name()
    }

    fn points(&self) -> &[Vec3] {
        self.inner().points()
    }

    fn n_cells(&self) -> usize {
        self.inner().n_cells()
    }

    fn is_surface(&self) -> bool {
        self.inner().is_surface()
    }

    fn point_data(&self) -> &DataMap {
        self.inner().point_data()
    }

    fn point_data_mut(&mut self) -> &mut DataMap {
        self.inner_mut().point_data_mut()
    }

    fn cell_data(&self) -> &DataMap {
        self.inner().cell_data()
    }

    fn cell_data_mut(&mut self) -> &mut DataMap {
        self.inner_mut().cell_data_mut()
    }

    fn t_coords(&self) -> Option<&[Vec2]> {
        self.inner().t_coords()
    }

    fn set_t_coords(&mut self, t_coords: Option<Vec<Vec2>>) {
        self.inner_mut().set_t_coords(t_coords);
    }
}
