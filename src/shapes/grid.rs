use cgmath::Vector3;

use crate::data_structures::mesh::MeshData;

use super::{grid_triangle_count, push_grid_triangles, unit};

/// Flat heightfield of `res_width × res_height` samples on the XZ plane.
///
/// Samples are one unit apart: sample `(i, j)` sits at `(i, 0, j)`. The water
/// shader displaces it vertically, so the frame points straight up with the
/// tangent along +X and the binormal along −Z.
pub fn grid(res_width: u32, res_height: u32) -> MeshData {
    let vertex_count = res_width as usize * res_height as usize;
    let mut mesh = MeshData::with_capacity(
        vertex_count,
        grid_triangle_count(res_width, res_height),
    );

    let mut index = 0;
    for i in 0..res_width {
        for j in 0..res_height {
            mesh.positions[index] = Vector3::new(i as f32, 0.0, j as f32);
            mesh.texcoords[index] = Vector3::new(unit(i, res_width), unit(j, res_height), 0.0);
            mesh.normals[index] = Vector3::unit_y();
            mesh.tangents[index] = Vector3::unit_x();
            mesh.binormals[index] = -Vector3::unit_z();
            index += 1;
        }
    }

    push_grid_triangles(&mut mesh, res_width, res_height);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_right_handed() {
        let mesh = grid(3, 3);
        for k in 0..mesh.vertex_count() {
            assert_eq!(mesh.tangents[k].cross(mesh.binormals[k]), mesh.normals[k]);
        }
    }

    #[test]
    fn single_row_has_vertices_but_no_triangles() {
        let mesh = grid(1, 4);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
