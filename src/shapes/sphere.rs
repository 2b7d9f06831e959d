use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::mesh::MeshData;

use super::{grid_triangle_count, push_grid_triangles, step, unit};

/// UV sphere of the given radius centred at the origin.
///
/// θ sweeps `[0, 2π]` around the Y axis over `res_theta` samples and φ sweeps
/// `[0, π]` from the south pole (−Y) to the north pole over `res_phi` samples.
/// The seam column at θ = 2π duplicates θ = 0 so texture coordinates can reach 1.
pub fn sphere(res_theta: u32, res_phi: u32, radius: f32) -> MeshData {
    let vertex_count = res_theta as usize * res_phi as usize;
    let mut mesh = MeshData::with_capacity(vertex_count, grid_triangle_count(res_theta, res_phi));

    let d_theta = step(TAU, res_theta);
    let d_phi = step(PI, res_phi);

    let mut index = 0;
    for i in 0..res_theta {
        let (sin_theta, cos_theta) = (i as f32 * d_theta).sin_cos();
        for j in 0..res_phi {
            let (sin_phi, cos_phi) = (j as f32 * d_phi).sin_cos();

            mesh.positions[index] = Vector3::new(
                radius * sin_theta * sin_phi,
                -radius * cos_phi,
                radius * cos_theta * sin_phi,
            );
            mesh.texcoords[index] = Vector3::new(unit(i, res_theta), unit(j, res_phi), 0.0);

            let tangent = Vector3::new(cos_theta, 0.0, -sin_theta).normalize();
            let binormal = Vector3::new(sin_theta * cos_phi, sin_phi, cos_theta * cos_phi).normalize();
            mesh.tangents[index] = tangent;
            mesh.binormals[index] = binormal;
            mesh.normals[index] = tangent.cross(binormal);

            index += 1;
        }
    }

    push_grid_triangles(&mut mesh, res_theta, res_phi);
    mesh
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn poles_sit_on_the_y_axis() {
        let mesh = sphere(8, 5, 2.0);
        assert_relative_eq!(mesh.positions[0], Vector3::new(0.0, -2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(mesh.positions[4], Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn normals_point_outwards() {
        let mesh = sphere(16, 9, 1.0);
        // skip the poles where the position is parallel to the axis
        for (k, position) in mesh.positions.iter().enumerate() {
            if k % 9 == 0 || k % 9 == 8 {
                continue;
            }
            assert!(mesh.normals[k].dot(*position) > 0.0);
            assert_relative_eq!(mesh.normals[k].magnitude(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn texcoords_span_the_unit_square() {
        let mesh = sphere(4, 3, 1.0);
        let last = mesh.texcoords[mesh.vertex_count() - 1];
        assert_eq!(mesh.texcoords[0], Vector3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(last, Vector3::new(1.0, 1.0, 0.0));
    }
}
