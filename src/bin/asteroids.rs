//! Shoot the falling asteroids before they pass the ship.
//!
//! Keys: X/C move left/right, Space fire, V reload, B restart,
//! =/- fall faster/slower, Z polygon mode.

use instant::Duration;
use orrery_ngin::{
    Deg, KeyCode, Point3, Vector3,
    config::EngineConfig,
    context::Context,
    data_structures::{
        scene_graph::{Node, NodeId, SceneGraph},
        texture::TextureTarget,
    },
    flow::{self, Lab},
    game::{self, BULLET_SCALE, GameInput, GameState},
    input::Input,
    pipelines::ShaderKind,
    render::{
        CUBE_MAP, DIFFUSE_TEXTURE, DrawCall, NORMAL_MAP, camera_uniforms, no_uniforms,
        phong_uniforms,
    },
    shapes,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Diffuse and normal map pairs an asteroid may wear.
const ROCKS: [(&str, &str); 3] = [
    ("earth_diffuse.png", "earth_bump.png"),
    ("stone43_diffuse.png", "stone43_bump.png"),
    ("stone47_diffuse.png", "stone47_bump.png"),
];

const SHIP_SCALE: Vector3<f32> = Vector3 {
    x: 1.2,
    y: 0.5,
    z: 0.8,
};
const EXPLOSION_SCALE: f32 = 0.8;

struct Asteroids {
    rng: StdRng,
    state: GameState,
    scene: SceneGraph,
    root: Option<NodeId>,
    sky: Option<NodeId>,
    ship: Option<NodeId>,
    asteroids: Vec<NodeId>,
    bullets: Vec<NodeId>,
    explosion: Option<NodeId>,
}

impl Asteroids {
    fn new() -> Self {
        let mut rng = StdRng::from_entropy();
        let state = GameState::new(&mut rng);
        Self {
            rng,
            state,
            scene: SceneGraph::new(),
            root: None,
            sky: None,
            ship: None,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            explosion: None,
        }
    }

    fn read_input(input: &Input) -> GameInput {
        GameInput {
            fire: input.just_pressed(KeyCode::Space),
            reload: input.just_pressed(KeyCode::KeyV),
            left: input.just_pressed(KeyCode::KeyX),
            right: input.just_pressed(KeyCode::KeyC),
            restart: input.just_pressed(KeyCode::KeyB),
            faster: input.just_pressed(KeyCode::Equal),
            slower: input.just_pressed(KeyCode::Minus),
        }
    }

    /// Copy the simulation into the scene graph.
    fn sync_scene(&mut self) {
        if let Some(ship) = self.ship {
            self.scene[ship].set_translation(self.state.ship.position);
        }
        for (&id, asteroid) in self.asteroids.iter().zip(&self.state.asteroids) {
            self.scene[id].local = asteroid.transform;
        }
        for (&id, bullet) in self.bullets.iter().zip(&self.state.bullets) {
            self.scene[id].set_translation(bullet.position);
        }
        if let (Some(id), Some(position)) = (self.explosion, self.state.explosion) {
            self.scene[id].set_translation(position);
        }
    }
}

impl Lab for Asteroids {
    async fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let rock_mesh = ctx.add_mesh("asteroid", &shapes::sphere(6, 7, 1.0));
        let explosion_mesh = ctx.add_mesh("explosion", &shapes::sphere(30, 20, 1.0));
        let ship_mesh = ctx.add_mesh("ship", &shapes::sphere(20, 16, 1.0));
        let sky_mesh = ctx.add_mesh("sky", &shapes::sphere(60, 70, 5.0));

        let mut rocks = Vec::with_capacity(ROCKS.len());
        for (diffuse, normal) in ROCKS {
            let diffuse = ctx.load_texture(diffuse, false).await;
            let normal = ctx.load_texture(normal, true).await;
            rocks.push((diffuse, normal));
        }
        let red = ctx.load_texture("red.png", false).await;
        let exploded = ctx.load_texture("exploded2.png", false).await;
        let metal = ctx.load_texture("metal-crate.png", false).await;
        let space = ctx.load_cube_map("space", "png").await;

        let scene = &mut self.scene;
        let root = scene.add_node(Node::new());

        let sky = scene.add_node(
            Node::new()
                .with_mesh(sky_mesh)
                .with_shader(ShaderKind::CubeMap, camera_uniforms)
                .with_scaling(Vector3::new(10.0, 10.0, 10.0))
                .with_loaded_texture(CUBE_MAP, space, TextureTarget::Cube),
        );
        scene.add_child(root, sky)?;

        let ship = scene.add_node(
            Node::new()
                .with_mesh(ship_mesh)
                .with_shader(ShaderKind::Phong, phong_uniforms)
                .with_scaling(SHIP_SCALE)
                .with_loaded_texture(DIFFUSE_TEXTURE, metal, TextureTarget::D2),
        );
        scene.add_child(root, ship)?;

        let asteroid_pivot = scene.add_node(Node::new());
        scene.add_child(root, asteroid_pivot)?;
        for _ in 0..game::ASTEROID_COUNT {
            let (diffuse, normal) = rocks[self.rng.gen_range(0..rocks.len())];
            let id = scene.add_node(
                Node::new()
                    .with_mesh(rock_mesh)
                    .with_shader(ShaderKind::BumpMap, phong_uniforms)
                    .with_loaded_texture(DIFFUSE_TEXTURE, diffuse, TextureTarget::D2)
                    .with_loaded_texture(NORMAL_MAP, normal, TextureTarget::D2),
            );
            scene.add_child(asteroid_pivot, id)?;
            self.asteroids.push(id);
        }

        let bullet_pivot = scene.add_node(Node::new());
        scene.add_child(root, bullet_pivot)?;
        for _ in 0..game::BULLET_COUNT {
            let id = scene.add_node(
                Node::new()
                    .with_mesh(rock_mesh)
                    .with_shader(ShaderKind::Default, no_uniforms)
                    .with_scaling(Vector3::new(BULLET_SCALE, BULLET_SCALE, BULLET_SCALE))
                    .with_loaded_texture(DIFFUSE_TEXTURE, red, TextureTarget::D2),
            );
            scene.add_child(bullet_pivot, id)?;
            self.bullets.push(id);
        }

        // drawn on its own once something was shot
        let explosion = scene.add_node(
            Node::new()
                .with_mesh(explosion_mesh)
                .with_shader(ShaderKind::Default, no_uniforms)
                .with_scaling(Vector3::new(EXPLOSION_SCALE, EXPLOSION_SCALE, EXPLOSION_SCALE))
                .with_loaded_texture(DIFFUSE_TEXTURE, exploded, TextureTarget::D2),
        );

        self.root = Some(root);
        self.sky = Some(sky);
        self.ship = Some(ship);
        self.explosion = Some(explosion);
        self.sync_scene();
        ctx.set_title(&self.state.summary());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut Context, input: &Input, dt: Duration) {
        if input.just_pressed(KeyCode::KeyZ) {
            ctx.cycle_polygon_mode();
        }

        let before = (self.state.score, self.state.lives, self.state.ship.alive);
        self.state = game::advance(
            &self.state,
            dt.as_secs_f32(),
            &Self::read_input(input),
            &mut self.rng,
        );
        if before != (self.state.score, self.state.lives, self.state.ship.alive) {
            ctx.set_title(&self.state.summary());
        }

        self.sync_scene();
        if let Some(sky) = self.sky {
            self.scene[sky].set_translation(ctx.camera.camera.position_vec());
        }
    }

    fn on_render(&self, ctx: &Context, calls: &mut Vec<DrawCall>) {
        let draw = ctx.draw_context();
        if let Some(root) = self.root {
            self.scene.render(root, &draw, calls);
        }
        if let (Some(explosion), Some(_)) = (self.explosion, self.state.explosion) {
            self.scene.render(explosion, &draw, calls);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::default()
        .with_title("asteroids")
        .with_clear_colour(wgpu::Color::BLACK)
        .with_camera(Point3::new(0.0, 6.0, 40.0), Deg(-90.0), Deg(0.0))
        .with_free_camera(false);
    flow::run(config, Asteroids::new())
}
