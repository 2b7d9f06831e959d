//! orrery-ngin
//!
//! A small wgpu engine for graphics lab scenes: parametric meshes, an arena
//! scene graph with per-node shaders and uniforms, curve interpolation and a
//! frame loop that drives one lab at a time.
//!
//! High-level modules
//! - `shapes`: generators for quads, grids, spheres, tori and circle rings
//! - `data_structures`: mesh data, transforms, textures and the scene graph
//! - `render`: draw context, per-draw uniforms and the GPU renderer
//! - `pipelines`: shader programs and render pipeline construction
//! - `resources`: asset loading and uploads to the GPU
//! - `interpolation`: linear and Catmull-Rom paths through control points
//! - `game`: rules of the asteroids lab
//! - `camera`, `input`, `config`, `context`, `flow`: the window and frame loop
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod game;
pub mod input;
pub mod interpolation;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod shapes;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::keyboard::KeyCode;
