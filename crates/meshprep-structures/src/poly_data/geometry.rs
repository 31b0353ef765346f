//! Normal computation for polygonal surfaces.
//!
//! This module contains methods for computing derived data from points and faces:
//! - Face normals
//! - Area-weighted point normals
//! - Sharp-edge splitting, which duplicates points along creases so that
//!   smooth shading does not blend normals across them

use std::collections::HashMap;

use glam::Vec3;
use meshprep_core::{gather, Dataset, MeshPrepError, Result};

use super::{PolyData, NORMALS};

/// Options for [`PolyData::compute_normals`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalsOptions {
    /// Also store face normals as a cell array.
    pub cell_normals: bool,
    /// Duplicate points along sharp edges.
    pub split_vertices: bool,
    /// Angle in degrees above which an edge is considered sharp.
    pub feature_angle: f32,
}

impl Default for NormalsOptions {
    fn default() -> Self {
        Self {
            cell_normals: false,
            split_vertices: false,
            feature_angle: 30.0,
        }
    }
}

impl PolyData {
    /// Computes point normals and stores them as the `"Normals"` point array.
    ///
    /// With `split_vertices`, points on sharp edges are duplicated first, so the
    /// point count may grow. Returns the number of points added.
    pub fn compute_normals(&mut self, options: &NormalsOptions) -> Result<usize> {
        self.check_faces()?;
        let face_normals = self.compute_face_normals();

        let added = if options.split_vertices {
            self.split_sharp_edges(&face_normals, options.feature_angle)?
        } else {
            0
        };

        let point_normals = self.compute_point_normals(&face_normals);
        self.point_data.insert(NORMALS, point_normals);
        if options.cell_normals {
            self.cell_data.insert(NORMALS, face_normals);
        }

        log::debug!(
            "computed normals for {} points ({added} added by splitting)",
            self.points.len()
        );
        Ok(added)
    }

    /// Fails if any face refers past the end of the point array.
    fn check_faces(&self) -> Result<()> {
        let len = self.points.len();
        match self.faces.iter().flatten().find(|&&i| i as usize >= len) {
            Some(&bad) => Err(MeshPrepError::IndexOutOfBounds {
                index: bad as usize,
                len,
            }),
            None => Ok(()),
        }
    }

    /// Computes face normals using cross product of first two edges.
    #[must_use]
    pub fn compute_face_normals(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|face| {
                if face.len() >= 3 {
                    let v0 = self.points[face[0] as usize];
                    let v1 = self.points[face[1] as usize];
                    let v2 = self.points[face[2] as usize];
                    (v1 - v0).cross(v2 - v0).normalize_or_zero()
                } else {
                    Vec3::ZERO
                }
            })
            .collect()
    }

    /// Computes the area of a polygon by fan triangulation.
    fn face_area(&self, face: &[u32]) -> f32 {
        let v0 = self.points[face[0] as usize];
        let mut area = 0.0;
        for i in 1..(face.len() - 1) {
            let v1 = self.points[face[i] as usize];
            let v2 = self.points[face[i + 1] as usize];
            area += (v1 - v0).cross(v2 - v0).length() * 0.5;
        }
        area
    }

    /// Computes point normals as area-weighted average of incident face normals.
    fn compute_point_normals(&self, face_normals: &[Vec3]) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.points.len()];

        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                continue;
            }
            let weighted_normal = face_normals[face_idx] * self.face_area(face);
            for &vi in face {
                normals[vi as usize] += weighted_normal;
            }
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }
        normals
    }

    /// Duplicates points so that no point is shared across a sharp edge.
    ///
    /// Faces around each point are grouped into regions connected by smooth
    /// manifold edges (shared by exactly two faces whose normals are within
    /// `feature_angle`). The first region keeps the original point; every other
    /// region gets a copy appended after the existing points. Point arrays and
    /// texture coordinates follow the copies.
    fn split_sharp_edges(&mut self, face_normals: &[Vec3], feature_angle: f32) -> Result<usize> {
        let cos_angle = feature_angle.to_radians().cos();
        let n_points = self.points.len();

        let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        let mut point_faces: Vec<Vec<usize>> = vec![Vec::new(); n_points];
        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                continue;
            }
            let n = face.len();
            for i in 0..n {
                let edge = edge_key(face[i], face[(i + 1) % n]);
                edge_faces.entry(edge).or_default().push(face_idx);
            }
            for &vi in face {
                let incident = &mut point_faces[vi as usize];
                if !incident.contains(&face_idx) {
                    incident.push(face_idx);
                }
            }
        }

        let is_smooth = |edge: (u32, u32), fa: usize, fb: usize| {
            edge_faces.get(&edge).is_some_and(|faces| faces.len() == 2)
                && face_normals[fa].dot(face_normals[fb]) > cos_angle
        };

        // Topology queries use the original connectivity; rewiring happens on `self.faces`.
        let original_faces = self.faces.clone();
        let mut new_to_old: Vec<u32> = (0..n_points as u32).collect();

        for (p, incident) in point_faces.iter().enumerate() {
            if incident.len() < 2 {
                continue;
            }
            let p = p as u32;

            let mut region = vec![usize::MAX; incident.len()];
            let mut n_regions = 0;
            for start in 0..incident.len() {
                if region[start] != usize::MAX {
                    continue;
                }
                region[start] = n_regions;
                let mut stack = vec![start];
                while let Some(i) = stack.pop() {
                    let fa = incident[i];
                    for q in neighbors_in_face(&original_faces[fa], p) {
                        let edge = edge_key(p, q);
                        let Some(across) = edge_faces.get(&edge) else {
                            continue;
                        };
                        for &fb in across {
                            if fb == fa || !is_smooth(edge, fa, fb) {
                                continue;
                            }
                            if let Some(j) = incident.iter().position(|&f| f == fb) {
                                if region[j] == usize::MAX {
                                    region[j] = n_regions;
                                    stack.push(j);
                                }
                            }
                        }
                    }
                }
                n_regions += 1;
            }

            for r in 1..n_regions {
                let copy = new_to_old.len() as u32;
                new_to_old.push(p);
                for (i, &face_idx) in incident.iter().enumerate() {
                    if region[i] != r {
                        continue;
                    }
                    for slot in &mut self.faces[face_idx] {
                        if *slot == p {
                            *slot = copy;
                        }
                    }
                }
            }
        }

        let added = new_to_old.len() - n_points;
        if added > 0 {
            self.points = new_to_old.iter().map(|&i| self.points[i as usize]).collect();
            self.point_data = self.point_data.take_all(&new_to_old)?;
            if let Some(t_coords) = self.t_coords() {
                self.t_coords = Some(gather(t_coords, &new_to_old)?);
            }
        }
        Ok(added)
    }
}

/// Sorted point pair identifying an undirected edge.
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Points adjacent to `p` along the boundary of `face`.
fn neighbors_in_face(face: &[u32], p: u32) -> Vec<u32> {
    let n = face.len();
    let mut out = Vec::with_capacity(2);
    for (k, &v) in face.iter().enumerate() {
        if v == p {
            out.push(face[(k + n - 1) % n]);
            out.push(face[(k + 1) % n]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use meshprep_core::DataArray;
    use proptest::prelude::*;

    /// Unit cube as 6 outward-facing quads.
    fn cube() -> PolyData {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            vec![0, 3, 2, 1], // Bottom
            vec![4, 5, 6, 7], // Top
            vec![0, 1, 5, 4], // Front
            vec![1, 2, 6, 5], // Right
            vec![2, 3, 7, 6], // Back
            vec![3, 0, 4, 7], // Left
        ];
        PolyData::new(points, faces)
    }

    /// Two coplanar triangles forming a unit square in the XY plane.
    fn flat_square() -> PolyData {
        PolyData::from_triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_face_normals() {
        let normals = cube().compute_face_normals();
        assert_eq!(normals.len(), 6);
        assert!((normals[0] - Vec3::NEG_Z).length() < 1e-6);
        assert!((normals[1] - Vec3::Z).length() < 1e-6);
        assert!((normals[2] - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_face_has_zero_normal() {
        let mesh = PolyData::new(vec![Vec3::ZERO, Vec3::X], vec![vec![0, 1]]);
        assert_eq!(mesh.compute_face_normals(), vec![Vec3::ZERO]);
    }

    #[test]
    fn test_point_normals_without_splitting() {
        let mut mesh = cube();
        let added = mesh.compute_normals(&NormalsOptions::default()).unwrap();
        assert_eq!(added, 0);
        assert_eq!(mesh.n_points(), 8);

        let normals = mesh.point_normals().unwrap();
        assert_eq!(normals.len(), 8);
        // Corner 0 touches the bottom, front and left faces equally.
        let expected = Vec3::new(-1.0, -1.0, -1.0).normalize();
        assert!((normals[0] - expected).length() < 1e-5);
        assert!(mesh.cell_normals().is_none());
    }

    #[test]
    fn test_cell_normals_option() {
        let mut mesh = cube();
        let options = NormalsOptions {
            cell_normals: true,
            ..NormalsOptions::default()
        };
        mesh.compute_normals(&options).unwrap();
        assert_eq!(mesh.cell_normals().map(<[Vec3]>::len), Some(6));
    }

    #[test]
    fn test_split_cube_corners() {
        let mut mesh = cube();
        let options = NormalsOptions {
            split_vertices: true,
            ..NormalsOptions::default()
        };
        let added = mesh.compute_normals(&options).unwrap();

        // Every corner is shared by three mutually perpendicular faces.
        assert_eq!(added, 16);
        assert_eq!(mesh.n_points(), 24);
        for (face, normal) in mesh.faces().iter().zip(mesh.compute_face_normals()) {
            for &vi in face {
                let n = mesh.point_normals().unwrap()[vi as usize];
                assert!((n - normal).length() < 1e-5, "point normal should match its face");
            }
        }
    }

    #[test]
    fn test_split_keeps_smooth_edges() {
        let mut mesh = flat_square();
        let options = NormalsOptions {
            split_vertices: true,
            feature_angle: 30.0,
            ..NormalsOptions::default()
        };
        assert_eq!(mesh.compute_normals(&options).unwrap(), 0);
        assert_eq!(mesh.n_points(), 4);
    }

    #[test]
    fn test_split_zero_angle_splits_everything() {
        let mut mesh = flat_square();
        let options = NormalsOptions {
            split_vertices: true,
            feature_angle: 0.0,
            ..NormalsOptions::default()
        };
        // Points 0 and 2 are shared by both triangles.
        assert_eq!(mesh.compute_normals(&options).unwrap(), 2);
        assert_eq!(mesh.n_points(), 6);
    }

    #[test]
    fn test_split_carries_point_arrays_and_t_coords() {
        let mut mesh = cube().with_t_coords((0..8).map(|i| Vec2::splat(i as f32)).collect());
        mesh.add_point_array("ids", (0..8).collect::<Vec<u32>>()).unwrap();
        let options = NormalsOptions {
            split_vertices: true,
            ..NormalsOptions::default()
        };
        mesh.compute_normals(&options).unwrap();

        let ids = mesh.point_data().get("ids").and_then(DataArray::as_ids).unwrap();
        assert_eq!(ids.len(), mesh.n_points());
        let t_coords = mesh.t_coords().unwrap();
        for (i, &orig) in ids.iter().enumerate() {
            assert_eq!(mesh.points()[i], cube().points()[orig as usize]);
            assert_eq!(t_coords[i], Vec2::splat(orig as f32));
        }
    }

    #[test]
    fn test_split_boundary_edges_do_not_connect() {
        // Two triangles touching only at point 0 (bow tie).
        let mut mesh = PolyData::from_triangles(
            vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(-1.0, -1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 3, 4]],
        );
        let options = NormalsOptions {
            split_vertices: true,
            feature_angle: 90.0,
            ..NormalsOptions::default()
        };
        assert_eq!(mesh.compute_normals(&options).unwrap(), 1);
    }

    #[test]
    fn test_face_index_past_points_errors() {
        let mut mesh = PolyData::from_triangles(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 7]]);
        let err = mesh.compute_normals(&NormalsOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MeshPrepError::IndexOutOfBounds { index: 7, len: 3 }
        ));
        assert!(mesh.point_normals().is_none());
    }

    #[test]
    fn test_split_with_short_t_coords_errors() {
        let mut mesh = cube().with_t_coords(vec![Vec2::ZERO; 3]);
        let options = NormalsOptions {
            split_vertices: true,
            ..NormalsOptions::default()
        };
        let err = mesh.compute_normals(&options).unwrap_err();
        assert!(matches!(err, MeshPrepError::IndexOutOfBounds { len: 3, .. }));
    }

    proptest! {
        #[test]
        fn prop_split_never_removes_points(angle in 0.0f32..180.0) {
            let mut mesh = cube();
            let options = NormalsOptions {
                split_vertices: true,
                feature_angle: angle,
                ..NormalsOptions::default()
            };
            let added = mesh.compute_normals(&options).unwrap();
            prop_assert_eq!(mesh.n_points(), 8 + added);
            prop_assert_eq!(mesh.point_normals().unwrap().len(), mesh.n_points());
        }
    }
}
