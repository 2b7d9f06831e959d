//! A heightfield grid animated by the water shader, reflecting a sky cube map.
//!
//! Keys: Z polygon mode, P pause the waves.

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
    input::Input,
    pipelines::ShaderKind,
    render::{CUBE_MAP, DrawCall, DrawContext, NORMAL_MAP, camera_uniforms, water_uniforms},
    shapes,
};

const GRID_RESOLUTION: u32 = 100;

#[derive(Default)]
struct Water {
    scene: SceneGraph,
    root: Option<NodeId>,
    sky: Option<NodeId>,
    paused: bool,
    /// Wave clock, separate from the lab's elapsed time so it can pause.
    wave_time: f32,
}

impl Lab for Water {
    async fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let grid = ctx.add_mesh("water", &shapes::grid(GRID_RESOLUTION, GRID_RESOLUTION));
        let sky_mesh = ctx.add_mesh("sky", &shapes::sphere(60, 70, 5.0));

        let cube_map = ctx.load_cube_map("cloudyhills", "png").await;
        let ripples = ctx.load_texture("waves.png", true).await;

        let half = GRID_RESOLUTION as f32 / 2.0;
        let scene = &mut self.scene;
        let root = scene.add_node(Node::new());
        let water = scene.add_node(
            Node::new()
                .with_mesh(grid)
                .with_shader(ShaderKind::Water, water_uniforms)
                .with_translation(Vector3::new(-half, -2.0, -half))
                .with_loaded_texture(CUBE_MAP, cube_map, TextureTarget::Cube)
                .with_loaded_texture(NORMAL_MAP, ripples, TextureTarget::D2),
        );
        let sky = scene.add_node(
            Node::new()
                .with_mesh(sky_mesh)
                .with_shader(ShaderKind::CubeMap, camera_uniforms)
                .with_scaling(Vector3::new(20.0, 20.0, 20.0))
                .with_loaded_texture(CUBE_MAP, cube_map, TextureTarget::Cube),
        );
        scene.add_child(root, sky)?;
        scene.add_child(root, water)?;

        self.root = Some(root);
        self.sky = Some(sky);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut Context, input: &Input, dt: Duration) {
        if input.just_pressed(KeyCode::KeyZ) {
            ctx.cycle_polygon_mode();
        }
        if input.just_pressed(KeyCode::KeyP) {
            self.paused = !self.paused;
            ctx.set_title(if self.paused { "paused" } else { "running" });
        }
        if !self.paused {
            self.wave_time += dt.as_secs_f32();
        }
        if let Some(sky) = self.sky {
            self.scene[sky].set_translation(ctx.camera.camera.position_vec());
        }
    }

    fn on_render(&self, ctx: &Context, calls: &mut Vec<DrawCall>) {
        let Some(root) = self.root else {
            return;
        };
        let draw = DrawContext {
            time: self.wave_time,
            ..ctx.draw_context()
        };
        self.scene.render(root, &draw, calls);
    }
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::default()
        .with_title("water")
        .with_camera(Point3::new(0.0, 4.0, 20.0), Deg(-90.0), Deg(-15.0))
        .with_movement(10.0, 0.4);
    flow::run(config, Water::default())
}
