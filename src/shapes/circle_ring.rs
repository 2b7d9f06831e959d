use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::mesh::MeshData;

use super::{grid_triangle_count, push_grid_triangles, step, unit};

/// Flat annulus in the XY plane between `inner` and `outer` radius.
///
/// The outer loop sweeps θ over `res_theta` samples, the inner loop walks the
/// radius over `res_radius` samples, so vertex `i * res_radius` is always on
/// the inner edge. The tangent points radially outwards and the normal is +Z.
pub fn circle_ring(res_radius: u32, res_theta: u32, inner: f32, outer: f32) -> MeshData {
    let vertex_count = res_radius as usize * res_theta as usize;
    let mut mesh = MeshData::with_capacity(vertex_count, grid_triangle_count(res_theta, res_radius));

    let d_theta = step(TAU, res_theta);
    let d_radius = step(outer - inner, res_radius);

    let mut index = 0;
    for i in 0..res_theta {
        let (sin_theta, cos_theta) = (i as f32 * d_theta).sin_cos();
        for j in 0..res_radius {
            let radius = inner + j as f32 * d_radius;

            mesh.positions[index] = Vector3::new(radius * cos_theta, radius * sin_theta, 0.0);
            mesh.texcoords[index] = Vector3::new(unit(j, res_radius), unit(i, res_theta), 0.0);

            let tangent = Vector3::new(cos_theta, sin_theta, 0.0).normalize();
            let binormal = Vector3::new(-sin_theta, cos_theta, 0.0).normalize();
            mesh.tangents[index] = tangent;
            mesh.binormals[index] = binormal;
            mesh.normals[index] = tangent.cross(binormal);

            index += 1;
        }
    }

    push_grid_triangles(&mut mesh, res_theta, res_radius);
    mesh
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn normal_is_plus_z() {
        let mesh = circle_ring(3, 7, 0.5, 1.0);
        for normal in &mesh.normals {
            assert_relative_eq!(*normal, Vector3::unit_z(), epsilon = 1e-5);
        }
    }

    #[test]
    fn everything_lies_in_the_xy_plane() {
        let mesh = circle_ring(4, 10, 1.0, 2.0);
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
    }
}
