//! Generated shapes: a spinning circle ring carrying a quad, a torus, and a
//! sphere travelling along a closed path.
//!
//! Keys: 1-4 sphere shader, Z polygon mode, L linear / Catmull-Rom,
//! Up/Down tension.

use instant::Duration;
use orrery_ngin::{
    KeyCode, Vector3,
    config::EngineConfig,
    context::Context,
    data_structures::scene_graph::{Node, NodeId, SceneGraph},
    flow::{self, Lab},
    input::Input,
    interpolation::{Interpolation, Path},
    pipelines::ShaderKind,
    render::{DrawCall, light_uniforms},
    shapes,
};

const RING_SPIN: f32 = 0.6;
/// Control points per second.
const PATH_SPEED: f32 = 1.0;
const TENSION_STEP: f32 = 0.05;

const SPHERE_SHADERS: [(KeyCode, ShaderKind); 4] = [
    (KeyCode::Digit1, ShaderKind::Fallback),
    (KeyCode::Digit2, ShaderKind::Diffuse),
    (KeyCode::Digit3, ShaderKind::Normal),
    (KeyCode::Digit4, ShaderKind::TexCoord),
];

fn control_points() -> Vec<Vector3<f32>> {
    vec![
        Vector3::new(1.0, 2.0, -1.0),
        Vector3::new(4.0, 8.0, 2.0),
        Vector3::new(6.0, 3.0, 0.0),
        Vector3::new(6.0, 2.0, 7.0),
        Vector3::new(8.0, -2.0, 8.0),
        Vector3::new(4.0, -2.0, 0.0),
        Vector3::new(0.0, -6.0, 2.0),
        Vector3::new(7.0, 8.0, 6.0),
        Vector3::new(-2.0, -4.0, -2.0),
        Vector3::new(0.0, 0.0, 0.0),
    ]
}

struct Shapes {
    scene: SceneGraph,
    root: Option<NodeId>,
    ring: Option<NodeId>,
    sphere: Option<NodeId>,
    path: Path,
    along: f32,
    linear: bool,
    tension: f32,
}

impl Shapes {
    fn new() -> Self {
        Self {
            scene: SceneGraph::new(),
            root: None,
            ring: None,
            sphere: None,
            path: Path::new(control_points()),
            along: 0.0,
            linear: true,
            tension: 0.0,
        }
    }

    fn interpolation(&self) -> Interpolation {
        if self.linear {
            Interpolation::Linear
        } else {
            Interpolation::CatmullRom {
                tension: self.tension,
            }
        }
    }
}

impl Lab for Shapes {
    async fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let ring_mesh = ctx.add_mesh("circle ring", &shapes::circle_ring(4, 60, 1.0, 2.0));
        let quad_mesh = ctx.add_mesh("quad", &shapes::quad(4.0, 6.0));
        let sphere_mesh = ctx.add_mesh("sphere", &shapes::sphere(30, 40, 1.0));
        let torus_mesh = ctx.add_mesh("torus", &shapes::torus(5, 10, 2.0, 3.0));

        let drawable = |mesh| {
            Node::new()
                .with_mesh(mesh)
                .with_shader(ShaderKind::Fallback, light_uniforms)
        };

        let scene = &mut self.scene;
        let root = scene.add_node(Node::new());
        let ring = scene.add_node(drawable(ring_mesh));
        let quad = scene.add_node(drawable(quad_mesh).with_scaling(Vector3::new(0.3, 0.3, 0.3)));
        let sphere = scene.add_node(drawable(sphere_mesh));
        let torus = scene.add_node(
            drawable(torus_mesh).with_translation(Vector3::new(-8.0, 0.0, -4.0)),
        );

        scene.add_child(root, ring)?;
        scene.add_child(ring, quad)?;
        scene.add_child(root, sphere)?;
        scene.add_child(root, torus)?;

        self.root = Some(root);
        self.ring = Some(ring);
        self.sphere = Some(sphere);
        ctx.set_title(&self.status());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut Context, input: &Input, dt: Duration) {
        let dt = dt.as_secs_f32();

        if let Some(sphere) = self.sphere {
            for (key, kind) in SPHERE_SHADERS {
                if input.just_pressed(key) {
                    self.scene[sphere].set_program(kind, light_uniforms);
                }
            }
        }
        if input.just_pressed(KeyCode::KeyZ) {
            ctx.cycle_polygon_mode();
        }
        let mut changed = false;
        if input.just_pressed(KeyCode::KeyL) {
            self.linear = !self.linear;
            changed = true;
        }
        if input.just_pressed(KeyCode::ArrowUp) {
            self.tension = (self.tension + TENSION_STEP).min(1.0);
            changed = true;
        }
        if input.just_pressed(KeyCode::ArrowDown) {
            self.tension = (self.tension - TENSION_STEP).max(0.0);
            changed = true;
        }
        if changed {
            ctx.set_title(&self.status());
        }

        if let Some(ring) = self.ring {
            self.scene[ring].rotate_y(RING_SPIN * dt);
        }

        self.along = self.path.advance(self.along, PATH_SPEED * dt);
        let position = self.path.sample(self.along, self.interpolation());
        if let (Some(sphere), Some(position)) = (self.sphere, position) {
            self.scene[sphere].set_translation(position);
        }
    }

    fn on_render(&self, ctx: &Context, calls: &mut Vec<DrawCall>) {
        if let Some(root) = self.root {
            self.scene.render(root, &ctx.draw_context(), calls);
        }
    }
}

impl Shapes {
    fn status(&self) -> String {
        if self.linear {
            "linear".to_string()
        } else {
            format!("catmull-rom, tension {:.2}", self.tension)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::default().with_title("shapes");
    flow::run(config, Shapes::new())
}
