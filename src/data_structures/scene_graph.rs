//! Hierarchical scene organisation.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`]. Each node carries a local [`Transform`] and optionally a mesh,
//! a shader with its uniform setter, and texture bindings. A node without a
//! mesh is a pivot: it only contributes its transform to its children.
//!
//! Rendering walks the tree from a root with an explicit stack, composing
//! `world = parent_world * local` on the way down, and hands every drawable
//! node to a [`DrawTarget`].

use std::ops::{Index, IndexMut};

use cgmath::{Matrix4, SquareMatrix, Vector3};
use thiserror::Error;

use crate::{
    data_structures::{texture::TextureTarget, transform::Transform},
    pipelines::ShaderKind,
    render::{DrawCall, DrawContext, DrawTarget, MeshId, SetUniforms, TextureBinding, TextureId},
};

/// Index of a node inside its [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} is not part of this scene graph")]
    UnknownNode(NodeId),
    #[error("node {0:?} cannot be its own child")]
    SelfEdge(NodeId),
    #[error("node {child:?} is already a child of {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} below {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Shader program plus the function filling its uniforms.
#[derive(Clone, Copy, Debug)]
pub struct ShaderBinding {
    pub kind: ShaderKind,
    pub set_uniforms: SetUniforms,
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub local: Transform,
    pub mesh: Option<MeshId>,
    pub shader: Option<ShaderBinding>,
    pub textures: Vec<TextureBinding>,
    children: Vec<NodeId>,
}

impl Node {
    /// A pivot at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mesh(mut self, mesh: MeshId) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_shader(mut self, kind: ShaderKind, set_uniforms: SetUniforms) -> Self {
        self.set_program(kind, set_uniforms);
        self
    }

    pub fn with_texture(mut self, name: &str, texture: TextureId, target: TextureTarget) -> Self {
        self.add_texture(name, texture, target);
        self
    }

    /// Like [`Node::with_texture`] but skips a texture that failed to load.
    pub fn with_loaded_texture(
        self,
        name: &str,
        texture: Option<TextureId>,
        target: TextureTarget,
    ) -> Self {
        match texture {
            Some(texture) => self.with_texture(name, texture, target),
            None => self,
        }
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.local.set_translation(translation);
        self
    }

    pub fn with_scaling(mut self, scale: Vector3<f32>) -> Self {
        self.local.set_scaling(scale);
        self
    }

    /// Replace the shader, e.g. when a lab switches programs at runtime.
    pub fn set_program(&mut self, kind: ShaderKind, set_uniforms: SetUniforms) {
        self.shader = Some(ShaderBinding { kind, set_uniforms });
    }

    /// Attach a texture under `name`; a second binding with the same name replaces the first.
    pub fn add_texture(&mut self, name: &str, texture: TextureId, target: TextureTarget) {
        let binding = TextureBinding {
            name: name.to_string(),
            texture,
            target,
        };
        match self.textures.iter_mut().find(|b| b.name == name) {
            Some(existing) => *existing = binding,
            None => self.textures.push(binding),
        }
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.local.set_translation(translation);
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.local.translate(delta);
    }

    pub fn set_scaling(&mut self, scale: Vector3<f32>) {
        self.local.set_scaling(scale);
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.local.rotate_x(angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.local.rotate_y(angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.local.rotate_z(angle);
    }

    /// Local matrix `T * R * S`.
    pub fn get_transform(&self) -> Matrix4<f32> {
        self.local.to_matrix()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Emit a draw call for this node placed below `parent_world`.
    ///
    /// Nodes without a mesh or without a shader draw nothing. Returns the
    /// node's world matrix either way.
    pub fn render(
        &self,
        id: NodeId,
        ctx: &DrawContext,
        parent_world: Matrix4<f32>,
        target: &mut dyn DrawTarget,
    ) -> Matrix4<f32> {
        let world = parent_world * self.get_transform();
        if let (Some(mesh), Some(shader)) = (self.mesh, self.shader) {
            target.draw(DrawCall::new(
                id,
                mesh,
                shader.kind,
                shader.set_uniforms,
                world,
                &self.textures,
                ctx,
            ));
        }
        world
    }
}

/// Arena of nodes with parent links for edge validation.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        // children can only be attached through `add_child`
        self.nodes.push(Node {
            children: Vec::new(),
            ..node
        });
        self.parents.push(None);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// `true` if `ancestor` lies on the parent chain of `node` (or is `node`).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append `child` to the children of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        for id in [parent, child] {
            if id.0 >= self.nodes.len() {
                return Err(SceneError::UnknownNode(id));
            }
        }
        if parent == child {
            return Err(SceneError::SelfEdge(child));
        }
        if let Some(existing) = self.parent(child) {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        self.nodes[parent.0].children.push(child);
        self.parents[child.0] = Some(parent);
        Ok(())
    }

    /// World matrix of `id`, composed from its root down.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut world = self.get(id)?.get_transform();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            world = self.nodes[parent.0].get_transform() * world;
            current = self.parent(parent);
        }
        Some(world)
    }

    /// Depth-first pre-order walk below `root`, children left to right.
    ///
    /// `visit` receives each node with the world matrix of its parent
    /// (identity for `root`). An unknown root visits nothing.
    pub fn traverse<F>(&self, root: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, &Node, Matrix4<f32>),
    {
        if self.get(root).is_none() {
            log::warn!("traversal root {:?} is not part of this scene graph", root);
            return;
        }
        let mut node_stack = vec![root];
        let mut matrix_stack = vec![Matrix4::identity()];
        #[cfg(debug_assertions)]
        let mut visited = std::collections::HashSet::new();

        while let (Some(id), Some(parent_world)) = (node_stack.pop(), matrix_stack.pop()) {
            #[cfg(debug_assertions)]
            debug_assert!(visited.insert(id), "node {:?} reached twice", id);

            let node = &self.nodes[id.0];
            visit(id, node, parent_world);

            let world = parent_world * node.get_transform();
            for &child in node.children.iter().rev() {
                node_stack.push(child);
                matrix_stack.push(world);
            }
        }
    }

    /// Collect the draw calls of every drawable node below `root`.
    pub fn render(&self, root: NodeId, ctx: &DrawContext, target: &mut dyn DrawTarget) {
        self.traverse(root, |id, node, parent_world| {
            node.render(id, ctx, parent_world, target);
        });
    }

    /// World matrix of every node below `root`, in traversal order.
    pub fn world_matrices(&self, root: NodeId) -> Vec<(NodeId, Matrix4<f32>)> {
        let mut worlds = Vec::new();
        self.traverse(root, |id, node, parent_world| {
            worlds.push((id, parent_world * node.get_transform()));
        });
        worlds
    }
}

/// Panics on ids from another graph.
impl Index<NodeId> for SceneGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for SceneGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::render::{no_uniforms, DrawCall};

    fn drawable() -> Node {
        Node::new()
            .with_mesh(MeshId(0))
            .with_shader(ShaderKind::Fallback, no_uniforms)
    }

    #[test]
    fn rejects_unknown_ids_and_self_edges() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(Node::new());
        let stranger = NodeId(7);
        assert_eq!(graph.add_child(a, stranger), Err(SceneError::UnknownNode(stranger)));
        assert_eq!(graph.add_child(stranger, a), Err(SceneError::UnknownNode(stranger)));
        assert_eq!(graph.add_child(a, a), Err(SceneError::SelfEdge(a)));
    }

    #[test]
    fn rejects_second_parent_and_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(Node::new());
        let b = graph.add_node(Node::new());
        let c = graph.add_node(Node::new());
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();

        assert_eq!(
            graph.add_child(a, c),
            Err(SceneError::AlreadyParented { child: c, parent: b })
        );
        assert_eq!(graph.add_child(c, a), Err(SceneError::Cycle { parent: c, child: a }));
        assert_eq!(graph[a].children(), &[b]);
    }

    #[test]
    fn pivots_draw_nothing() {
        let mut graph = SceneGraph::new();
        let pivot = graph.add_node(Node::new().with_shader(ShaderKind::Phong, no_uniforms));
        let planet = graph.add_node(drawable());
        let unshaded = graph.add_node(Node::new().with_mesh(MeshId(1)));
        graph.add_child(pivot, planet).unwrap();
        graph.add_child(pivot, unshaded).unwrap();

        let mut calls: Vec<DrawCall> = Vec::new();
        graph.render(pivot, &DrawContext::default(), &mut calls);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].node, planet);
    }

    #[test]
    fn world_matrix_matches_traversal() {
        let mut graph = SceneGraph::new();
        let pivot = graph.add_node(Node::new());
        let earth = graph.add_node(drawable().with_translation(Vector3::new(3.0, 0.0, 0.0)));
        graph.add_child(pivot, earth).unwrap();
        graph[pivot].rotate_y(1.0);

        let from_traversal = graph
            .world_matrices(pivot)
            .into_iter()
            .find(|(id, _)| *id == earth)
            .map(|(_, m)| m)
            .unwrap();
        assert_relative_eq!(graph.world_matrix(earth).unwrap(), from_traversal);
    }

    #[test]
    fn nodes_are_added_without_children() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(Node::new());
        let b = graph.add_node(Node::new());
        graph.add_child(a, b).unwrap();
        // a copy of `a` must not inherit its edges
        let copy = graph.add_node(graph[a].clone());
        assert!(graph[copy].children().is_empty());
        assert_eq!(graph.parent(b), Some(a));
    }

    #[test]
    fn textures_replace_by_name() {
        let mut node = drawable();
        node.add_texture("diffuse_texture", TextureId(0), TextureTarget::D2);
        node.add_texture("diffuse_texture", TextureId(3), TextureTarget::D2);
        assert_eq!(node.textures.len(), 1);
        assert_eq!(node.textures[0].texture, TextureId(3));
    }
}
