//! Polygonal surface dataset.
//!
//! `PolyData` is the surface representation every shading path ends in: a point
//! set plus polygon faces of arbitrary size. Faces are the cells of the dataset,
//! so cell arrays hold one value per face.

mod geometry;

pub use geometry::NormalsOptions;

use glam::{Vec2, Vec3};
use meshprep_core::{DataArray, DataMap, Dataset};

/// Name of the point (and, when requested, cell) array holding computed normals.
pub const NORMALS: &str = "Normals";

/// A surface mesh made of polygon faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    points: Vec<Vec3>,
    faces: Vec<Vec<u32>>, // Variable-length polygons
    point_data: DataMap,
    cell_data: DataMap,
    t_coords: Option<Vec<Vec2>>,
}

impl PolyData {
    /// Creates a new surface from points and polygon faces.
    ///
    /// Each face is a variable-length list of point indices forming a polygon.
    /// Triangles have 3 indices, quads have 4, etc.
    pub fn new(points: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            points,
            faces,
            point_data: DataMap::new(),
            cell_data: DataMap::new(),
            t_coords: None,
        }
    }

    /// Creates a new surface from triangles (convenience method).
    pub fn from_triangles(points: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let faces: Vec<Vec<u32>> = triangles.into_iter().map(|t| t.to_vec()).collect();
        Self::new(points, faces)
    }

    /// Returns the number of faces.
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns the faces (polygon indices).
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Returns the point normals, if they have been computed.
    pub fn point_normals(&self) -> Option<&[Vec3]> {
        self.point_data.get(NORMALS).and_then(DataArray::as_vectors)
    }

    /// Returns the cell normals, if they have been computed.
    pub fn cell_normals(&self) -> Option<&[Vec3]> {
        self.cell_data.get(NORMALS).and_then(DataArray::as_vectors)
    }

    /// Sets the texture coordinates (builder style).
    #[must_use]
    pub fn with_t_coords(mut self, t_coords: Vec<Vec2>) -> Self {
        self.t_coords = Some(t_coords);
        self
    }
}

impl Dataset for PolyData {
    fn type_name(&self) -> &'static str {
        "PolyData"
    }

    fn points(&self) -> &[Vec3] {
        &self.points
    }

    fn n_cells(&self) -> usize {
        self.faces.len()
    }

    fn is_surface(&self) -> bool {
        true
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

#[cfg(test)]
mod tests {
    use super::*;
    use meshprep_core::{FieldAssociation, MeshPrepError};

    fn triangle() -> PolyData {
        PolyData::from_triangles(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]])
    }

    #[test]
    fn test_poly_data_creation() {
        let mesh = triangle();
        assert_eq!(mesh.n_points(), 3);
        assert_eq!(mesh.n_cells(), 1);
        assert_eq!(mesh.n_faces(), 1);
        assert!(mesh.is_surface());
        assert!(mesh.point_normals().is_none());
        assert_eq!(mesh.type_name(), "PolyData");
    }

    #[test]
    fn test_bounding_box() {
        let mesh = triangle();
        assert_eq!(mesh.bounding_box(), Some((Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0))));
        assert_eq!(PolyData::default().bounding_box(), None);
    }

    #[test]
    fn test_add_point_array_checks_length() {
        let mut mesh = triangle();
        assert!(mesh.add_point_array("temp", vec![0.0_f32, 1.0, 2.0]).is_ok());
        let err = mesh.add_point_array("bad", vec![0.0_f32]).unwrap_err();
        assert!(matches!(
            err,
            MeshPrepError::SizeMismatch {
                expected: 3,
                actual: 1
            }
        ));
        assert!(mesh.add_cell_array("area", vec![0.5_f32]).is_ok());
    }

    #[test]
    fn test_get_array_preference() {
        // Three points, three faces: a name can be both a point and a cell array.
        let mut mesh = PolyData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![vec![0, 1, 2], vec![0, 2, 1], vec![1, 2, 0]],
        );
        mesh.add_point_array("v", vec![1.0_f32, 1.0, 1.0]).unwrap();
        mesh.add_cell_array("v", vec![2.0_f32, 2.0, 2.0]).unwrap();
        mesh.add_cell_array("only_cell", vec![3.0_f32, 3.0, 3.0]).unwrap();

        let point = mesh.get_array("v", FieldAssociation::Point).unwrap();
        assert_eq!(point.max(), Some(1.0));
        let cell = mesh.get_array("v", FieldAssociation::Cell).unwrap();
        assert_eq!(cell.max(), Some(2.0));
        let only = mesh.get_array("only_cell", FieldAssociation::Point).unwrap();
        assert_eq!(only.max(), Some(3.0));
        assert!(matches!(
            mesh.get_array("missing", FieldAssociation::Point),
            Err(MeshPrepError::ArrayNotFound(_))
        ));
    }

    #[test]
    fn test_t_coords() {
        let mut mesh = triangle().with_t_coords(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert_eq!(mesh.t_coords().map(<[Vec2]>::len), Some(3));
        mesh.set_t_coords(None);
        assert!(mesh.t_coords().is_none());
    }
}
