//! Unstructured grid of volumetric and planar cells.
//!
//! # Overview
//!
//! `UnstructuredGrid` stores mixed cells in a flat connectivity array with one
//! offset per cell. Supported cells are tetrahedra, pyramids, wedges and
//! hexahedra, plus planar triangles, quads and polygons.
//!
//! A grid is never a surface representation, even when it only holds planar
//! cells. Use [`UnstructuredGrid::extract_surface`] to obtain a [`PolyData`](crate::PolyData).
//!
//! # Example
//!
//! ```rust,ignore
//! use glam::Vec3;
//! use meshprep_structures::UnstructuredGrid;
//!
//! let points = vec![
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(0.5, 1.0, 0.0),
//!     Vec3::new(0.5, 0.5, 1.0),
//! ];
//! let grid = UnstructuredGrid::new_tet_mesh(points, &[[0, 1, 2, 3]])?;
//! let surface = grid.extract_surface()?;
//! assert_eq!(surface.n_faces(), 4);
//! ```

mod surface;

pub use surface::{ORIGINAL_CELL_IDS, ORIGINAL_POINT_IDS};

use glam::{Vec2, Vec3};
use meshprep_core::{DataMap, Dataset, MeshPrepError, Result};

/// Cell type for unstructured grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Triangle (3 points)
    Triangle,
    /// Quadrilateral (4 points)
    Quad,
    /// Planar polygon (any number of points, at least 3)
    Polygon,
    /// Tetrahedron (4 points)
    Tetra,
    /// Pyramid with quad base (5 points)
    Pyramid,
    /// Triangular prism (6 points)
    Wedge,
    /// Hexahedron (8 points)
    Hexahedron,
}

impl CellType {
    /// Number of points a cell of this type has. `None` for polygons.
    pub fn n_points(self) -> Option<usize> {
        match self {
            Self::Triangle => Some(3),
            Self::Quad | Self::Tetra => Some(4),
            Self::Polygon => None,
            Self::Pyramid => Some(5),
            Self::Wedge => Some(6),
            Self::Hexahedron => Some(8),
        }
    }

    /// Returns whether this cell encloses a volume.
    pub fn is_volumetric(self) -> bool {
        matches!(
            self,
            Self::Tetra | Self::Pyramid | Self::Wedge | Self::Hexahedron
        )
    }
}

/// A grid of arbitrary cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnstructuredGrid {
    points: Vec<Vec3>,
    cell_types: Vec<CellType>,
    offsets: Vec<usize>, // start of each cell in `connectivity`
    connectivity: Vec<u32>,
    point_data: DataMap,
    cell_data: DataMap,
    t_coords: Option<Vec<Vec2>>,
}

impl UnstructuredGrid {
    /// Creates a grid with points and no cells.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Creates a tetrahedral grid.
    pub fn new_tet_mesh(points: Vec<Vec3>, tets: &[[u32; 4]]) -> Result<Self> {
        let mut grid = Self::new(points);
        for tet in tets {
            grid.add_cell(CellType::Tetra, tet)?;
        }
        Ok(grid)
    }

    /// Creates a hexahedral grid.
    pub fn new_hex_mesh(points: Vec<Vec3>, hexes: &[[u32; 8]]) -> Result<Self> {
        let mut grid = Self::new(points);
        for hex in hexes {
            grid.add_cell(CellType::Hexahedron, hex)?;
        }
        Ok(grid)
    }

    /// Appends a cell.
    ///
    /// Fails if the number of points does not match the cell type, or if any
    /// index refers past the end of the point array.
    pub fn add_cell(&mut self, cell_type: CellType, point_ids: &[u32]) -> Result<&mut Self> {
        let expected = cell_type.n_points().unwrap_or(point_ids.len().max(3));
        if point_ids.len() != expected {
            return Err(MeshPrepError::SizeMismatch {
                expected,
                actual: point_ids.len(),
            });
        }
        if let Some(&bad) = point_ids
            .iter()
            .find(|&&i| i as usize >= self.points.len())
        {
            return Err(MeshPrepError::IndexOutOfBounds {
                index: bad as usize,
                len: self.points.len(),
            });
        }

        self.cell_types.push(cell_type);
        self.offsets.push(self.connectivity.len());
        self.connectivity.extend_from_slice(point_ids);
        Ok(self)
    }

    /// Returns the type of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell_idx` is not less than [`n_cells`](Dataset::n_cells).
    pub fn cell_type(&self, cell_idx: usize) -> CellType {
        self.cell_types[cell_idx]
    }

    /// Returns the point ids of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell_idx` is not less than [`n_cells`](Dataset::n_cells).
    pub fn cell(&self, cell_idx: usize) -> &[u32] {
        let start = self.offsets[cell_idx];
        let end = self
            .offsets
            .get(cell_idx + 1)
            .copied()
            .unwrap_or(self.connectivity.len());
        &self.connectivity[start..end]
    }

    /// Iterates over `(type, point ids)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (CellType, &[u32])> {
        (0..self.cell_types.len()).map(|i| (self.cell_types[i], self.cell(i)))
    }

    /// Sets the texture coordinates (builder style).
    #[must_use]
    pub fn with_t_coords(mut self, t_coords: Vec<Vec2>) -> Self {
        self.t_coords = Some(t_coords);
        self
    }
}

impl Dataset for UnstructuredGrid {
    fn type_name(&self) -> &'static str {
        "UnstructuredGrid"
    }

    fn points(&self) -> &[Vec3] {
        &self.points
    }

    fn n_cells(&self) -> usize {
        self.cell_types.len()
    }

    fn is_surface(&self) -> bool {
        false
    }

    fn point_data(&self) -> &DataMap {
        &self.point_data
    }

    fn point_data_mut(&mut self) -> &mut DataMap {
        &mut self.point_data
    }

    fn cell_data(&self) -> &DataMap {
        &self.cell_data
    }

    fn cell_data_mut(&mut self) -> &mut DataMap {
        &mut self.cell_data
    }

    fn t_coords(&self) -> Option<&[Vec2]> {
        self.t_coords.as_deref()
    }

    fn set_t_coords(&mut self, t_coords: Option<Vec<Vec2>>) {
        self.t_coords = t_coords;
    }
}
