use cgmath::Vector3;

use crate::data_structures::mesh::MeshData;

/// A `width × height` rectangle in the XY plane with its lower-left corner at the origin.
///
/// Only positions and texture coordinates are filled in. Normals, tangents
/// and binormals stay zero.
pub fn quad(width: f32, height: f32) -> MeshData {
    let mut mesh = MeshData::with_capacity(4, 2);
    mesh.positions = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(width, 0.0, 0.0),
        Vector3::new(width, height, 0.0),
        Vector3::new(0.0, height, 0.0),
    ];
    mesh.texcoords = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    ];
    mesh.indices.push([0, 1, 2]);
    mesh.indices.push([0, 2, 3]);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_and_triangles() {
        let mesh = quad(2.0, 3.0);
        assert_eq!(mesh.positions[2], Vector3::new(2.0, 3.0, 0.0));
        assert_eq!(mesh.indices, vec![[0, 1, 2], [0, 2, 3]]);
        assert!(mesh.is_consistent());
    }

    #[test]
    fn frame_vectors_are_left_zero() {
        let mesh = quad(1.0, 1.0);
        let zero = Vector3::new(0.0, 0.0, 0.0);
        assert!(mesh.normals.iter().all(|&n| n == zero));
        assert!(mesh.tangents.iter().all(|&t| t == zero));
        assert!(mesh.binormals.iter().all(|&b| b == zero));
    }
}
