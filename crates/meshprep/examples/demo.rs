//! Demo showing basic meshprep usage.
//!
//! This demo builds a small hexahedral block, prepares it for smooth shading
//! with sharp edges split, and resolves a few opacity arguments against it.
//! Run with `RUST_LOG=debug` to see each pipeline step.

use meshprep::*;

fn main() -> Result<()> {
    init_logging();

    // A 2x2x2 block of unit hexahedra
    let n = 3;
    let idx = |i: usize, j: usize, k: usize| (i * n * n + j * n + k) as u32;
    let mut points = Vec::new();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                points.push(Vec3::new(i as f32, j as f32, k as f32));
            }
        }
    }
    let mut hexes = Vec::new();
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            for k in 0..n - 1 {
                hexes.push([
                    idx(i, j, k),
                    idx(i + 1, j, k),
                    idx(i + 1, j + 1, k),
                    idx(i, j + 1, k),
                    idx(i, j, k + 1),
                    idx(i + 1, j, k + 1),
                    idx(i + 1, j + 1, k + 1),
                    idx(i, j + 1, k + 1),
                ]);
            }
        }
    }
    let grid = UnstructuredGrid::new_hex_mesh(points, &hexes)?;

    // Height above the base as a point scalar
    let heights = DataArray::Scalars(grid.points().iter().map(|p| p.z).collect());

    let options = ShadingOptions::default().with_split_sharp_edges(true);
    let (mut surface, heights) = prepare_smooth_shading(grid, Some(heights), &options)?;
    println!(
        "Surface: {} points, {} faces",
        surface.n_points(),
        surface.n_faces()
    );

    let transfer = OpacityTransferFunction::new();
    let opacity_options = OpacityOptions::default();

    // A preset curve
    let curve = process_opacity(&surface, "sigmoid_5", None, &opacity_options, &transfer)?;
    println!("sigmoid_5: {} entries", curve.values.len());

    // A per-point array on the prepared surface
    if let Some(heights) = heights {
        let alpha: Vec<f32> = heights
            .as_scalars()
            .unwrap_or_default()
            .iter()
            .map(|h| h / 2.0)
            .collect();
        surface.add_point_array("alpha", alpha)?;
        let literal =
            process_opacity(&surface, "alpha", Some(&heights), &opacity_options, &transfer)?;
        println!("alpha: literal = {}", literal.is_literal());
    }

    // Control points, inverted into transparency
    let transparent = process_opacity(
        &surface,
        vec![0.0_f32, 1.0, 0.3],
        None,
        &opacity_options.clone().with_use_transparency(true),
        &transfer,
    )?;
    println!("control points: {:?}", &transparent.values.as_slice()[..8]);

    Ok(())
}
