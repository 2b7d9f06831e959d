//! Engine settings a lab binary passes to [`crate::flow::run`].

use std::{ffi::OsString, path::PathBuf};

use cgmath::{Deg, Point3};

/// Environment variable overriding the asset directory.
pub const ASSETS_ENV: &str = "ORRERY_ASSETS";
pub const DEFAULT_ASSETS: &str = "assets";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub camera_position: Point3<f32>,
    pub camera_yaw: Deg<f32>,
    pub camera_pitch: Deg<f32>,
    /// Units per second.
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Whether WASD and right-drag move the camera.
    pub free_camera: bool,
    pub assets: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "orrery".to_string(),
            width: 1600,
            height: 900,
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            fovy: Deg(45.0),
            znear: 0.01,
            zfar: 1000.0,
            camera_position: Point3::new(0.0, 0.0, 6.0),
            camera_yaw: Deg(-90.0),
            camera_pitch: Deg(0.0),
            movement_speed: 3.0,
            mouse_sensitivity: 0.4,
            free_camera: true,
            assets: assets_dir(std::env::var_os(ASSETS_ENV)),
        }
    }
}

impl EngineConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_clear_colour(mut self, clear_colour: wgpu::Color) -> Self {
        self.clear_colour = clear_colour;
        self
    }

    pub fn with_fovy(mut self, fovy: Deg<f32>) -> Self {
        self.fovy = fovy;
        self
    }

    pub fn with_planes(mut self, znear: f32, zfar: f32) -> Self {
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    pub fn with_camera(mut self, position: Point3<f32>, yaw: Deg<f32>, pitch: Deg<f32>) -> Self {
        self.camera_position = position;
        self.camera_yaw = yaw;
        self.camera_pitch = pitch;
        self
    }

    pub fn with_movement(mut self, speed: f32, sensitivity: f32) -> Self {
        self.movement_speed = speed;
        self.mouse_sensitivity = sensitivity;
        self
    }

    pub fn with_free_camera(mut self, free_camera: bool) -> Self {
        self.free_camera = free_camera;
        self
    }

    pub fn with_assets(mut self, assets: impl Into<PathBuf>) -> Self {
        self.assets = assets.into();
        self
    }
}

/// Asset directory from the environment value, or `./assets`.
pub fn assets_dir(env: Option<OsString>) -> PathBuf {
    match env {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_ASSETS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_lab_setup() {
        let config = EngineConfig::default();
        assert_eq!((config.width, config.height), (1600, 900));
        assert_eq!(config.fovy, Deg(45.0));
        assert_eq!((config.znear, config.zfar), (0.01, 1000.0));
        assert_eq!(config.camera_position, Point3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn builders_override_fields() {
        let config = EngineConfig::default()
            .with_title("shapes")
            .with_resolution(800, 600)
            .with_free_camera(false)
            .with_assets("/tmp/res");
        assert_eq!(config.title, "shapes");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.free_camera);
        assert_eq!(config.assets, PathBuf::from("/tmp/res"));
    }

    #[test]
    fn environment_overrides_the_asset_dir() {
        assert_eq!(assets_dir(None), PathBuf::from("assets"));
        assert_eq!(assets_dir(Some(OsString::new())), PathBuf::from("assets"));
        assert_eq!(
            assets_dir(Some(OsString::from("/srv/textures"))),
            PathBuf::from("/srv/textures")
        );
    }
}
