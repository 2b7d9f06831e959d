//! Sun, an earth with its moon and a ringed planet, moved by rotating pivots.

use instant::Duration;
use orrery_ngin::{
    KeyCode, Vector3,
    config::EngineConfig,
    context::Context,
    data_structures::{
        scene_graph::{Node, NodeId, SceneGraph},
        texture::TextureTarget,
    },
    flow::{self, Lab},
    input::Input,
    pipelines::ShaderKind,
    render::{DIFFUSE_TEXTURE, DrawCall, no_uniforms},
    shapes,
};

/// Radians per second.
const SUN_SPIN: f32 = 0.3;
const EARTH_ORBIT: f32 = 0.5;
const EARTH_SPIN: f32 = 1.0;
const MOON_ORBIT_Z: f32 = 0.4;
const MOON_ORBIT_Y: f32 = 1.0;
const PLANET_ORBIT: f32 = 0.2;

#[derive(Default)]
struct SolarSystem {
    scene: SceneGraph,
    world: Option<NodeId>,
    sun: Option<NodeId>,
    earth_pivot: Option<NodeId>,
    earth: Option<NodeId>,
    moon_pivot: Option<NodeId>,
    planet_pivot: Option<NodeId>,
}

impl Lab for SolarSystem {
    async fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let sphere = ctx.add_mesh("sphere", &shapes::sphere(40, 30, 1.0));
        let ring = ctx.add_mesh("ring", &shapes::circle_ring(4, 60, 1.3, 2.0));

        let sun_texture = ctx.load_texture("sunmap.png", false).await;
        let earth_texture = ctx.load_texture("earth_diffuse.png", false).await;
        let moon_texture = ctx.load_texture("marble.png", false).await;
        let planet_texture = ctx.load_texture("jupiter.png", false).await;
        let ring_texture = ctx.load_texture("saturn_rings.png", false).await;

        let body = |texture| {
            Node::new()
                .with_mesh(sphere)
                .with_shader(ShaderKind::Default, no_uniforms)
                .with_loaded_texture(DIFFUSE_TEXTURE, texture, TextureTarget::D2)
        };

        let scene = &mut self.scene;
        let world = scene.add_node(Node::new());
        let sun = scene.add_node(body(sun_texture));
        let earth_pivot = scene.add_node(Node::new());
        let earth = scene.add_node(
            body(earth_texture)
                .with_translation(Vector3::new(2.5, 0.0, 1.0))
                .with_scaling(Vector3::new(0.6, 0.6, 0.6)),
        );
        let moon_pivot = scene.add_node(Node::new());
        let moon = scene.add_node(
            body(moon_texture)
                .with_translation(Vector3::new(2.5, 0.0, 1.0))
                .with_scaling(Vector3::new(0.3, 0.3, 0.3)),
        );
        let planet_pivot = scene.add_node(Node::new());
        let planet = scene.add_node(
            body(planet_texture)
                .with_translation(Vector3::new(5.0, 0.0, 2.0))
                .with_scaling(Vector3::new(0.8, 0.8, 0.8)),
        );
        let mut ring_node = Node::new()
            .with_mesh(ring)
            .with_shader(ShaderKind::Default, no_uniforms)
            .with_loaded_texture(DIFFUSE_TEXTURE, ring_texture, TextureTarget::D2);
        // the ring is generated in the xy plane
        ring_node.rotate_x(std::f32::consts::FRAC_PI_2 * 0.8);
        let ring = scene.add_node(ring_node);

        scene.add_child(world, sun)?;
        scene.add_child(world, earth_pivot)?;
        scene.add_child(world, planet_pivot)?;
        scene.add_child(earth_pivot, earth)?;
        scene.add_child(earth, moon_pivot)?;
        scene.add_child(moon_pivot, moon)?;
        scene.add_child(planet_pivot, planet)?;
        scene.add_child(planet, ring)?;

        self.world = Some(world);
        self.sun = Some(sun);
        self.earth_pivot = Some(earth_pivot);
        self.earth = Some(earth);
        self.moon_pivot = Some(moon_pivot);
        self.planet_pivot = Some(planet_pivot);
        log::info!("solar system with {} nodes", self.scene.len());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut Context, input: &Input, dt: Duration) {
        if input.just_pressed(KeyCode::KeyZ) {
            ctx.cycle_polygon_mode();
        }
        let dt = dt.as_secs_f32();
        let spins = [
            (self.sun, SUN_SPIN, 0.0),
            (self.earth_pivot, EARTH_ORBIT, 0.0),
            (self.earth, 0.0, EARTH_SPIN),
            (self.moon_pivot, MOON_ORBIT_Y, MOON_ORBIT_Z),
            (self.planet_pivot, PLANET_ORBIT, 0.0),
        ];
        for (id, y, z) in spins {
            if let Some(node) = id.and_then(|id| self.scene.get_mut(id)) {
                node.rotate_y(y * dt);
                node.rotate_z(z * dt);
            }
        }
    }

    fn on_render(&self, ctx: &Context, calls: &mut Vec<DrawCall>) {
        if let Some(world) = self.world {
            self.scene.render(world, &ctx.draw_context(), calls);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::default()
        .with_title("solar system")
        .with_clear_colour(wgpu::Color::BLACK);
    flow::run(config, SolarSystem::default())
}
