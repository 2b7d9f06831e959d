//! Parametric mesh generators.
//!
//! Every generator sweeps two parameters over a regular grid of samples and
//! returns a [`MeshData`] ready for upload. The shapes share one triangulation:
//! the sample `(i, j)` is stored at `i * res_j + j` and every grid cell is split
//! into two triangles.
//!
//! Resolutions are not validated. Anything below two samples per dimension
//! divides by zero when computing the step and yields NaN or infinite
//! coordinates, but never panics.

mod circle_ring;
mod grid;
mod quad;
mod sphere;
mod torus;

pub use circle_ring::circle_ring;
pub use grid::grid;
pub use quad::quad;
pub use sphere::sphere;
pub use torus::torus;

use crate::data_structures::mesh::MeshData;

/// Step between `res` evenly spaced samples covering `range`.
pub(crate) fn step(range: f32, res: u32) -> f32 {
    range / (res as f32 - 1.0)
}

/// Normalised parameter of sample `index` out of `res`.
pub(crate) fn unit(index: u32, res: u32) -> f32 {
    index as f32 / (res as f32 - 1.0)
}

/// Number of triangles produced by [`push_grid_triangles`] for a `res_i × res_j` grid.
pub(crate) fn grid_triangle_count(res_i: u32, res_j: u32) -> usize {
    2 * res_i.saturating_sub(1) as usize * res_j.saturating_sub(1) as usize
}

/// Append two triangles for every cell of a row-major `res_i × res_j` sample grid.
pub(crate) fn push_grid_triangles(mesh: &mut MeshData, res_i: u32, res_j: u32) {
    for i in 0..res_i.saturating_sub(1) {
        for j in 0..res_j.saturating_sub(1) {
            let k = res_j * i + j;
            mesh.indices.push([k, k + 1, k + 1 + res_j]);
            mesh.indices.push([k, k + res_j + 1, k + res_j]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_split_along_the_diagonal() {
        let mut mesh = MeshData::with_capacity(6, grid_triangle_count(2, 3));
        push_grid_triangles(&mut mesh, 2, 3);
        assert_eq!(
            mesh.indices,
            vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]]
        );
        assert_eq!(mesh.triangle_count(), grid_triangle_count(2, 3));
    }

    #[test]
    fn degenerate_resolutions_produce_no_triangles() {
        let mut mesh = MeshData::default();
        push_grid_triangles(&mut mesh, 0, 5);
        push_grid_triangles(&mut mesh, 1, 1);
        assert!(mesh.indices.is_empty());
        assert_eq!(grid_triangle_count(0, 0), 0);
    }

    #[test]
    fn single_sample_step_is_not_finite() {
        assert!(!step(1.0, 1).is_finite());
        assert_eq!(step(4.0, 5), 1.0);
        assert_eq!(unit(3, 4), 1.0);
    }
}
