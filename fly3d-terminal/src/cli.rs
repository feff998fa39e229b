// cli.rs - Command-line interface configuration
use clap::Parser;
use fly3d_core::camera::{CameraConfig, LookMode};
use fly3d_core::Vec3;

#[derive(Parser, Debug, Clone)]
#[command(name = "fly3d-terminal")]
#[command(about = "Fly a camera around a spinning textured quad", long_about = None)]
pub struct Cli {
    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    pub fov: f32,

    /// Starting distance of the camera along +z
    #[arg(long, default_value_t = 5.0)]
    pub distance: f32,

    /// Distance travelled per wheel notch or W/S press
    #[arg(long, default_value_t = 0.1)]
    pub move_step: f32,

    /// Degrees the quad spins per click or space press
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub angle_step: f32,

    /// Degrees the camera turns per arrow or pitch key press
    #[arg(long, default_value_t = 5.0)]
    pub turn_step: f32,

    /// Degrees the quad spins on its own every frame
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub spin: f32,

    /// Target frame rate
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Let pitch steer the camera (default keeps movement on the x/z plane)
    #[arg(long = "free-fly", default_value = "false")]
    pub free_fly: bool,

    /// Horizontal offset of the quad
    #[arg(long, default_value_t = 0.01, allow_hyphen_values = true)]
    pub offset_x: f32,
}

impl Cli {
    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            position: Vec3::new(0.0, 0.0, self.distance),
            fov_degrees: self.fov,
            look_mode: if self.free_fly {
                LookMode::FreeFly
            } else {
                LookMode::Planar
            },
            ..CameraConfig::default()
        }
    }
}
