//! Engine data structures: meshes, transforms, textures and the scene graph.
//!
//! - `mesh` holds generated vertex attributes and the GPU vertex layout
//! - `transform` is a node's local translation, rotation and scale
//! - `texture` wraps GPU textures, including cube maps and the depth buffer
//! - `scene_graph` is the node arena with parent/child edges

pub mod mesh;
pub mod scene_graph;
pub mod texture;
pub mod transform;
