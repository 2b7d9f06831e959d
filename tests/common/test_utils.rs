#![allow(dead_code)]

use orrery_ngin::{
    InnerSpace, Matrix4, Vector3,
    data_structures::{
        mesh::MeshData,
        scene_graph::{Node, NodeId, SceneGraph},
    },
    render::{DrawCall, DrawTarget, MeshId},
};

pub const EPSILON: f32 = 1e-4;

/// Panics with the offending attribute if the generated arrays disagree.
pub fn assert_well_formed(mesh: &MeshData) {
    let n = mesh.positions.len();
    assert_eq!(mesh.normals.len(), n, "normals");
    assert_eq!(mesh.tangents.len(), n, "tangents");
    assert_eq!(mesh.binormals.len(), n, "binormals");
    assert_eq!(mesh.texcoords.len(), n, "texcoords");
    for triangle in &mesh.indices {
        for &index in triangle {
            assert!((index as usize) < n, "index {index} out of range for {n} vertices");
        }
    }
    assert!(mesh.is_consistent());
}

pub fn length(v: Vector3<f32>) -> f32 {
    v.magnitude()
}

/// Records the nodes handed to it, in order.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn nodes(&self) -> Vec<NodeId> {
        self.calls.iter().map(|c| c.node).collect()
    }

    pub fn world_of(&self, node: NodeId) -> Option<Matrix4<f32>> {
        self.calls.iter().find(|c| c.node == node).map(|c| c.world)
    }
}

impl DrawTarget for Recorder {
    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

/// A drawable node with a fallback shader.
pub fn drawable() -> Node {
    use orrery_ngin::{pipelines::ShaderKind, render::no_uniforms};
    Node::new()
        .with_mesh(MeshId(0))
        .with_shader(ShaderKind::Fallback, no_uniforms)
}

/// `root -> a -> (b -> d, c)`, each node translated by one unit along a different axis.
pub struct Tree {
    pub graph: SceneGraph,
    pub root: NodeId,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub d: NodeId,
}

pub fn tree() -> Tree {
    let mut graph = SceneGraph::new();
    let root = graph.add_node(drawable().with_translation(Vector3::new(1.0, 0.0, 0.0)));
    let a = graph.add_node(drawable().with_translation(Vector3::new(0.0, 2.0, 0.0)));
    let b = graph.add_node(drawable().with_scaling(Vector3::new(2.0, 2.0, 2.0)));
    let c = graph.add_node(drawable().with_translation(Vector3::new(0.0, 0.0, 3.0)));
    let d = graph.add_node(drawable().with_translation(Vector3::new(1.0, 1.0, 1.0)));
    graph.add_child(root, a).unwrap();
    graph.add_child(a, b).unwrap();
    graph.add_child(a, c).unwrap();
    graph.add_child(b, d).unwrap();
    Tree {
        graph,
        root,
        a,
        b,
        c,
        d,
    }
}
