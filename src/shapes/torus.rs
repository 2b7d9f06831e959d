use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::mesh::MeshData;

use super::{grid_triangle_count, push_grid_triangles, step, unit};

/// Spiral-shell "torus": a sphere sweep whose radius grows with φ.
///
/// Angles follow [`super::sphere`]. For every θ column the radius starts at
/// `inner` and grows linearly to `outer` over the `res_phi` samples, so the
/// surface opens from a small south pole to a wide north rim. The frame
/// vectors are the sphere's; they ignore the radial growth.
pub fn torus(res_theta: u32, res_phi: u32, inner: f32, outer: f32) -> MeshData {
    let vertex_count = res_theta as usize * res_phi as usize;
    let mut mesh = MeshData::with_capacity(vertex_count, grid_triangle_count(res_theta, res_phi));

    let d_theta = step(TAU, res_theta);
    let d_phi = step(PI, res_phi);
    let d_radius = step(outer - inner, res_phi);

    let mut index = 0;
    for i in 0..res_theta {
        let (sin_theta, cos_theta) = (i as f32 * d_theta).sin_cos();
        for j in 0..res_phi {
            let (sin_phi, cos_phi) = (j as f32 * d_phi).sin_cos();
            let radius = inner + j as f32 * d_radius;

            mesh.positions[index] = Vector3::new(
                radius * sin_theta * sin_phi,
                -radius * cos_phi,
                radius * cos_theta * sin_phi,
            );
            // swapped relative to the sphere: u runs along φ
            mesh.texcoords[index] = Vector3::new(unit(j, res_phi), unit(i, res_theta), 0.0);

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
