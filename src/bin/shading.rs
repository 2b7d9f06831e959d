//! One sphere under every lab shader, inside a sky sphere that follows the camera.
//!
//! Keys: 1-7 fallback / diffuse / normal / texcoord / phong / cube map / bump
//! map, Z polygon mode, Up/Down shininess, Left/Right light x,
//! PageUp/PageDown ambient.

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
    render::{
        CUBE_MAP, DIFFUSE_TEXTURE, DrawCall, DrawContext, NORMAL_MAP, SetUniforms,
        camera_uniforms, light_uniforms, phong_uniforms,
    },
    shapes,
};

const PROGRAMS: [(KeyCode, ShaderKind, SetUniforms); 7] = [
    (KeyCode::Digit1, ShaderKind::Fallback, light_uniforms),
    (KeyCode::Digit2, ShaderKind::Diffuse, light_uniforms),
    (KeyCode::Digit3, ShaderKind::Normal, light_uniforms),
    (KeyCode::Digit4, ShaderKind::TexCoord, light_uniforms),
    (KeyCode::Digit5, ShaderKind::Phong, phong_uniforms),
    (KeyCode::Digit6, ShaderKind::CubeMap, camera_uniforms),
    (KeyCode::Digit7, ShaderKind::BumpMap, phong_uniforms),
];

const MAX_SHININESS: f32 = 1000.0;
const LIGHT_STEP: f32 = 1.0;
const AMBIENT_STEP: f32 = 0.05;

struct Shading {
    scene: SceneGraph,
    root: Option<NodeId>,
    sphere: Option<NodeId>,
    sky: Option<NodeId>,
    light_position: Vector3<f32>,
    ambient: f32,
    shininess: f32,
}

impl Shading {
    fn new() -> Self {
        let defaults = DrawContext::default();
        Self {
            scene: SceneGraph::new(),
            root: None,
            sphere: None,
            sky: None,
            light_position: defaults.light_position,
            ambient: defaults.ambient.x,
            shininess: 1.0,
        }
    }

    fn status(&self) -> String {
        format!(
            "shininess {:.0} | ambient {:.2} | light ({:.0}, {:.0}, {:.0})",
            self.shininess,
            self.ambient,
            self.light_position.x,
            self.light_position.y,
            self.light_position.z
        )
    }
}

impl Lab for Shading {
    async fn on_init(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let sphere_mesh = ctx.add_mesh("sphere", &shapes::sphere(60, 70, 1.0));
        let sky_mesh = ctx.add_mesh("sky", &shapes::sphere(60, 70, 5.0));

        let cube_map = ctx.load_cube_map("sunset_sky", "png").await;
        let normal_map = ctx.load_texture("earth_bump.png", true).await;
        let diffuse = ctx.load_texture("earth_diffuse.png", false).await;

        let textured = |node: Node| {
            node.with_loaded_texture(CUBE_MAP, cube_map, TextureTarget::Cube)
                .with_loaded_texture(NORMAL_MAP, normal_map, TextureTarget::D2)
                .with_loaded_texture(DIFFUSE_TEXTURE, diffuse, TextureTarget::D2)
        };

        let scene = &mut self.scene;
        let root = scene.add_node(Node::new());
        let sphere = scene.add_node(textured(
            Node::new()
                .with_mesh(sphere_mesh)
                .with_shader(ShaderKind::Fallback, light_uniforms),
        ));
        let sky = scene.add_node(textured(
            Node::new()
                .with_mesh(sky_mesh)
                .with_shader(ShaderKind::CubeMap, camera_uniforms)
                .with_scaling(Vector3::new(10.0, 10.0, 10.0)),
        ));
        scene.add_child(root, sky)?;
        scene.add_child(root, sphere)?;

        self.root = Some(root);
        self.sphere = Some(sphere);
        self.sky = Some(sky);
        ctx.set_title(&self.status());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut Context, input: &Input, _dt: Duration) {
        if let Some(sphere) = self.sphere {
            for (key, kind, set_uniforms) in PROGRAMS {
                if input.just_pressed(key) {
                    log::info!("sphere uses the {} shader", kind.label());
                    self.scene[sphere].set_program(kind, set_uniforms);
                }
            }
        }
        if input.just_pressed(KeyCode::KeyZ) {
            ctx.cycle_polygon_mode();
        }

        let before = (self.shininess, self.ambient, self.light_position);
        if input.just_pressed(KeyCode::ArrowUp) {
            self.shininess = (self.shininess * 2.0).min(MAX_SHININESS);
        }
        if input.just_pressed(KeyCode::ArrowDown) {
            self.shininess = (self.shininess / 2.0).max(1.0);
        }
        if input.just_pressed(KeyCode::ArrowLeft) {
            self.light_position.x -= LIGHT_STEP;
        }
        if input.just_pressed(KeyCode::ArrowRight) {
            self.light_position.x += LIGHT_STEP;
        }
        if input.just_pressed(KeyCode::PageUp) {
            self.ambient = (self.ambient + AMBIENT_STEP).min(1.0);
        }
        if input.just_pressed(KeyCode::PageDown) {
            self.ambient = (self.ambient - AMBIENT_STEP).max(0.0);
        }
        if before != (self.shininess, self.ambient, self.light_position) {
            ctx.set_title(&self.status());
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
            light_position: self.light_position,
            ambient: Vector3::new(self.ambient, self.ambient, self.ambient),
            shininess: self.shininess,
            ..ctx.draw_context()
        };
        self.scene.render(root, &draw, calls);
    }
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::default()
        .with_title("shading")
        .with_clear_colour(wgpu::Color::BLACK);
    flow::run(config, Shading::new())
}
