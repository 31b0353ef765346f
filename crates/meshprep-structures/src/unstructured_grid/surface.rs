//! Boundary surface extraction.
//!
//! Only exterior faces (not shared between volumetric cells) end up in the
//! surface. This is determined by hashing sorted face point indices and
//! counting occurrences. Planar cells are already faces and pass through.

use std::collections::HashMap;

use meshprep_core::{gather, Dataset, Result};

use super::{CellType, UnstructuredGrid};
use crate::PolyData;

/// Point array mapping each extracted surface point to its source grid point.
pub const ORIGINAL_POINT_IDS: &str = "original_point_ids";

/// Cell array mapping each extracted surface face to its source grid cell.
pub const ORIGINAL_CELL_IDS: &str = "original_cell_ids";

impl UnstructuredGrid {
    /// Extracts the boundary surface of the grid.
    ///
    /// Surface points are the grid points used by boundary faces, in order of
    /// first use. Point arrays, cell arrays and texture coordinates are carried
    /// over, and the [`ORIGINAL_POINT_IDS`] and [`ORIGINAL_CELL_IDS`] arrays
    /// record where every surface point and face came from.
    pub fn extract_surface(&self) -> Result<PolyData> {
        let face_counts = self.compute_face_counts();

        let mut point_map = vec![u32::MAX; self.points.len()];
        let mut orig_point_ids: Vec<u32> = Vec::new();
        let mut orig_cell_ids: Vec<u32> = Vec::new();
        let mut faces: Vec<Vec<u32>> = Vec::new();

        let mut emit = |face: &mut dyn Iterator<Item = u32>, cell_idx: usize| {
            let face = face
                .map(|p| {
                    let slot = &mut point_map[p as usize];
                    if *slot == u32::MAX {
                        *slot = orig_point_ids.len() as u32;
                        orig_point_ids.push(p);
                    }
                    *slot
                })
                .collect();
            faces.push(face);
            orig_cell_ids.push(cell_idx as u32);
        };

        for (cell_idx, (cell_type, cell)) in self.cells().enumerate() {
            if !cell_type.is_volumetric() {
                emit(&mut cell.iter().copied(), cell_idx);
                continue;
            }
            for stencil in face_stencil(cell_type) {
                let key = canonical_face_key(stencil.iter().map(|&i| cell[i]));
                if face_counts[&key] == 1 {
                    emit(&mut stencil.iter().map(|&i| cell[i]), cell_idx);
                }
            }
        }

        let points = orig_point_ids
            .iter()
            .map(|&p| self.points[p as usize])
            .collect();
        let mut surface = PolyData::new(points, faces);

        *surface.point_data_mut() = self.point_data.take_all(&orig_point_ids)?;
        *surface.cell_data_mut() = self.cell_data.take_all(&orig_cell_ids)?;
        if let Some(t_coords) = self.t_coords() {
            surface.set_t_coords(Some(gather(t_coords, &orig_point_ids)?));
        }
        surface.add_point_array(ORIGINAL_POINT_IDS, orig_point_ids)?;
        surface.add_cell_array(ORIGINAL_CELL_IDS, orig_cell_ids)?;

        log::debug!(
            "extracted surface with {} points and {} faces from {} cells",
            surface.n_points(),
            surface.n_faces(),
            self.n_cells()
        );
        Ok(surface)
    }

    /// Computes face counts for interior/exterior detection.
    fn compute_face_counts(&self) -> HashMap<[u32; 4], usize> {
        let mut face_counts: HashMap<[u32; 4], usize> = HashMap::new();

        for (cell_type, cell) in self.cells() {
            for stencil in face_stencil(cell_type) {
                let key = canonical_face_key(stencil.iter().map(|&i| cell[i]));
                *face_counts.entry(key).or_insert(0) += 1;
            }
        }

        face_counts
    }
}

/// Generates a canonical (sorted) face key for hashing.
/// For triangular faces, the fourth element is `u32::MAX`.
fn canonical_face_key(face: impl Iterator<Item = u32>) -> [u32; 4] {
    let mut key = [u32::MAX; 4];
    for (slot, p) in key.iter_mut().zip(face) {
        *slot = p;
    }
    key.sort_unstable();
    key
}

/// Outward-facing local faces of a volumetric cell. Empty for planar cells.
fn face_stencil(cell_type: CellType) -> &'static [&'static [usize]] {
    match cell_type {
        CellType::Tetra => TET_FACE_STENCIL,
        CellType::Pyramid => PYRAMID_FACE_STENCIL,
        CellType::Wedge => WEDGE_FACE_STENCIL,
        CellType::Hexahedron => HEX_FACE_STENCIL,
        CellType::Triangle | CellType::Quad | CellType::Polygon => &[],
    }
}

/// Face stencil for tetrahedra: 4 triangular faces
const TET_FACE_STENCIL: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[1, 2, 3]];

/// Face stencil for pyramids: quad base and 4 triangles meeting at the apex
const PYRAMID_FACE_STENCIL: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[3, 0, 4],
];

/// Face stencil for wedges: 2 triangle caps and 3 quad sides
const WEDGE_FACE_STENCIL: &[&[usize]] = &[
    &[0, 1, 2],
    &[3, 5, 4],
    &[0, 3, 4, 1],
    &[1, 4, 5, 2],
    &[2, 5, 3, 0],
];

/// Face stencil for hexahedra: 6 quad faces
const HEX_FACE_STENCIL: &[&[usize]] = &[
    &[0, 3, 2, 1], // Bottom
    &[4, 5, 6, 7], // Top
    &[0, 1, 5, 4], // Front
    &[1, 2, 6, 5], // Right
    &[2, 3, 7, 6], // Back
    &[3, 0, 4, 7], // Left
];
