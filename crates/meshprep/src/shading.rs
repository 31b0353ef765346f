//! Smooth shading preparation.
//!
//! [`prepare_smooth_shading`] produces a surface with point normals from any
//! dataset. Extraction and sharp-edge splitting both change the point set, so
//! the caller's scalars and texture coordinates are re-indexed through an
//! index array that maps every output point back to an input point.

use meshprep_core::{gather, DataArray, Dataset, Result, ShadingOptions, Vec2};
use meshprep_structures::{AnyDataset, NormalsOptions, PolyData, ORIGINAL_POINT_IDS};

/// Name of the identity index array added to a surface before splitting.
///
/// It only lives for the duration of [`prepare_smooth_shading`] and is never
/// present on the returned mesh.
pub const TEMP_ORIGINAL_IDS: &str = "__orig_ids__";

/// Prepares a dataset for smooth shading.
///
/// Non-surface datasets have their boundary surface extracted first. Point
/// normals are then computed, splitting edges sharper than
/// `options.feature_angle` when `options.split_sharp_edges` is set.
///
/// `scalars` must be aligned with the input points. When the point set
/// changed, the returned scalars are re-indexed so that they stay aligned
/// with the output points; otherwise they are returned unchanged. With
/// `options.texture`, the input's texture coordinates are carried over the
/// same way.
///
/// The mesh is taken by value and the result is always a new surface; clone
/// the input beforehand to keep it.
///
/// # Errors
///
/// Returns [`MeshPrepError::IndexOutOfBounds`](meshprep_core::MeshPrepError::IndexOutOfBounds)
/// if `scalars` or the texture coordinates are shorter than the input point set,
/// or if a face refers past the end of the point array.
pub fn prepare_smooth_shading(
    mesh: impl Into<AnyDataset>,
    scalars: Option<DataArray>,
    options: &ShadingOptions,
) -> Result<(PolyData, Option<DataArray>)> {
    let mesh = mesh.into();

    // Captured before extraction: the index array always refers to input points
    let t_coords = if options.texture {
        let t_coords = mesh.t_coords().map(<[Vec2]>::to_vec);
        if t_coords.is_none() {
            log::debug!("texture requested but {} has no texture coordinates", mesh.type_name());
        }
        t_coords
    } else {
        None
    };

    let (mut surface, extracted) = mesh.into_surface()?;
    let mut index_array = if extracted {
        log::debug!(
            "extracted surface with {} points and {} faces",
            surface.n_points(),
            surface.n_faces()
        );
        Some(ORIGINAL_POINT_IDS)
    } else {
        None
    };

    if options.split_sharp_edges {
        if index_array.is_none() {
            let ids: Vec<u32> = (0..surface.n_points() as u32).collect();
            surface.add_point_array(TEMP_ORIGINAL_IDS, ids)?;
            index_array = Some(TEMP_ORIGINAL_IDS);
        }
        let added = surface.compute_normals(&NormalsOptions {
            cell_normals: false,
            split_vertices: true,
            feature_angle: options.feature_angle,
        })?;
        log::debug!(
            "split sharp edges at {} degrees, {added} points added",
            options.feature_angle
        );
    } else {
        surface.compute_normals(&NormalsOptions::default())?;
    }

    let indices = index_array
        .and_then(|name| surface.point_data().get(name))
        .and_then(DataArray::as_ids)
        .map(<[u32]>::to_vec);

    let scalars = match (scalars, &indices) {
        (Some(scalars), Some(indices)) => Some(scalars.take(indices)?),
        (scalars, _) => scalars,
    };

    if let Some(t_coords) = t_coords {
        let t_coords = match &indices {
            Some(indices) => gather(&t_coords, indices)?,
            None => t_coords,
        };
        surface.set_t_coords(Some(t_coords));
    }

    if index_array == Some(TEMP_ORIGINAL_IDS) {
        surface.point_data_mut().remove(TEMP_ORIGINAL_IDS);
    }

    Ok((surface, scalars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshprep_core::Vec3;
    use meshprep_structures::UnstructuredGrid;

    /// Unit square made of two triangles in the z = 0 plane.
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

    /// Open box: a square floor with one wall folded up at 90 degrees.
    fn folded_sheet() -> PolyData {
        PolyData::from_triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3], [1, 5, 4], [1, 4, 2]],
        )
    }

    #[test]
    fn test_surface_without_splitting_keeps_points() {
        let mesh = flat_square();
        let scalars = DataArray::Scalars(vec![0.0, 1.0, 2.0, 3.0]);

        let (surface, out) =
            prepare_smooth_shading(mesh, Some(scalars.clone()), &ShadingOptions::default())
                .unwrap();

        assert_eq!(surface.n_points(), 4);
        assert_eq!(out, Some(scalars));
        let normals = surface.point_normals().unwrap();
        for n in normals {
            assert!((*n - Vec3::Z).length() < 1e-5);
        }
        assert!(!surface.point_data().contains(ORIGINAL_POINT_IDS));
    }

    #[test]
    fn test_split_reindexes_scalars() {
        let mesh = folded_sheet();
        let scalars = DataArray::Scalars(vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        let options = ShadingOptions::default().with_split_sharp_edges(true);

        let (surface, out) = prepare_smooth_shading(mesh, Some(scalars), &options).unwrap();

        // The fold runs through points 1 and 2
        assert_eq!(surface.n_points(), 8);
        let out = out.unwrap();
        let values = out.as_scalars().unwrap();
        assert_eq!(values.len(), 8);
        assert_eq!(&values[..6], &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        let mut copies = values[6..].to_vec();
        copies.sort_by(f32::total_cmp);
        assert_eq!(copies, vec![10.0, 20.0]);
        assert!(!surface.point_data().contains(TEMP_ORIGINAL_IDS));
    }

    #[test]
    fn test_split_with_gentle_fold_adds_nothing() {
        let options = ShadingOptions::default()
            .with_split_sharp_edges(true)
            .with_feature_angle(120.0);
        let (surface, _) = prepare_smooth_shading(folded_sheet(), None, &options).unwrap();
        assert_eq!(surface.n_points(), 6);
    }

    #[test]
    fn test_grid_is_extracted_and_scalars_follow() {
        let points = vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::new(5.0, 5.0, 5.0), // unused
        ];
        let grid = UnstructuredGrid::new_tet_mesh(points, &[[0, 1, 2, 3]]).unwrap();
        let scalars = DataArray::Scalars(vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        let (surface, out) =
            prepare_smooth_shading(grid, Some(scalars), &ShadingOptions::default()).unwrap();

        assert!(surface.is_surface());
        assert_eq!(surface.n_points(), 4);
        let ids = surface
            .point_data()
            .get(ORIGINAL_POINT_IDS)
            .and_then(DataArray::as_ids)
            .unwrap()
            .to_vec();
        let expected: Vec<f32> = ids.iter().map(|&i| i as f32).collect();
        assert_eq!(out.unwrap().as_scalars().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_texture_follows_split() {
        let t_coords: Vec<Vec2> = (0..6).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let mesh = folded_sheet().with_t_coords(t_coords);
        let options = ShadingOptions::default()
            .with_split_sharp_edges(true)
            .with_texture(true);

        let (surface, _) = prepare_smooth_shading(mesh, None, &options).unwrap();

        let t_coords = surface.t_coords().unwrap();
        assert_eq!(t_coords.len(), surface.n_points());
        assert_eq!(t_coords[4], Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_short_scalars_error() {
        let options = ShadingOptions::default().with_split_sharp_edges(true);
        let scalars = DataArray::Scalars(vec![0.0, 1.0]);
        let err = prepare_smooth_shading(folded_sheet(), Some(scalars), &options).unwrap_err();
        assert!(matches!(
            err,
            meshprep_core::MeshPrepError::IndexOutOfBounds { .. }
        ));
    }

    #[test]
    fn test_short_texture_on_split_surface_errors() {
        let mesh = folded_sheet().with_t_coords(vec![Vec2::ZERO; 3]);
        let options = ShadingOptions::default()
            .with_split_sharp_edges(true)
            .with_texture(true);
        let err = prepare_smooth_shading(mesh, None, &options).unwrap_err();
        assert!(matches!(
            err,
            meshprep_core::MeshPrepError::IndexOutOfBounds { len: 3, .. }
        ));
    }

    #[test]
    fn test_short_texture_on_grid_errors() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let grid = UnstructuredGrid::new_tet_mesh(points, &[[0, 1, 2, 3]])
            .unwrap()
            .with_t_coords(vec![Vec2::ZERO; 2]);
        let options = ShadingOptions::default().with_texture(true);
        let err = prepare_smooth_shading(grid, None, &options).unwrap_err();
        assert!(matches!(
            err,
            meshprep_core::MeshPrepError::IndexOutOfBounds { len: 2, .. }
        ));
    }

    #[test]
    fn test_face_index_past_points_errors() {
        let mesh = PolyData::from_triangles(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 7]]);
        let err = prepare_smooth_shading(mesh, None, &ShadingOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            meshprep_core::MeshPrepError::IndexOutOfBounds { index: 7, len: 3 }
        ));
    }
}
