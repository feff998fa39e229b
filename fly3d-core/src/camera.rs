/// Free-fly camera with cached view and projection matrices
use crate::error::{MathError, Result};
use crate::matrix::{look_at, perspective, try_perspective, Mat4};
use crate::transform::wrap_degrees;
use crate::vector::Vec3;

pub const FIELD_OF_VIEW_DEFAULT: f32 = 45.0;
pub const Z_CAMERA_DEFAULT: f32 = 5.0;
pub const NEAR_PLANE_DEFAULT: f32 = 0.1;
pub const FAR_PLANE_DEFAULT: f32 = 100.0;
pub const YAW_DEFAULT: f32 = -90.0;

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT: f32 = 89.0;

/// How orientation feeds the look/move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookMode {
    /// Heading comes from yaw alone; pitch is tracked but never applied.
    #[default]
    Planar,
    /// Heading comes from yaw and pitch, so forward motion can climb or dive.
    FreeFly,
}

/// Initial camera state and lens parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub look_mode: LookMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, Z_CAMERA_DEFAULT),
            yaw: YAW_DEFAULT,
            pitch: 0.0,
            fov_degrees: FIELD_OF_VIEW_DEFAULT,
            aspect: 1.0,
            near: NEAR_PLANE_DEFAULT,
            far: FAR_PLANE_DEFAULT,
            look_mode: LookMode::Planar,
        }
    }
}

/// Camera configuration for 3D rendering
///
/// The target is always derived from the position and the heading, so look
/// and move directions stay locked together. None of the movement operations
/// refresh the cached matrices: call [`Camera::update_view_matrix`] before
/// reading [`Camera::view_matrix`] for the next frame.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    look_mode: LookMode,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub fn new() -> Self {
        let config = CameraConfig::default();
        let mut camera = Self::unprojected(&config);
        camera.projection = perspective(config.fov_degrees, config.aspect, config.near, config.far);
        camera
    }

    /// Build a camera from `config`, rejecting a lens that would produce a
    /// degenerate projection.
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        let projection = try_perspective(config.fov_degrees, config.aspect, config.near, config.far)?;
        let mut camera = Self::unprojected(config);
        camera.projection = projection;
        Ok(camera)
    }

    fn unprojected(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: config.position,
            target: config.position,
            up: Vec3::UP,
            yaw: wrap_degrees(config.yaw),
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov_degrees: config.fov_degrees,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
            look_mode: config.look_mode,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.set_target_from_yaw();
        camera.update_view_matrix();
        camera
    }

    pub fn update_view_matrix(&mut self) {
        self.view = look_at(self.position, self.target, self.up);
        log::trace!("view matrix refreshed at {:?} -> {:?}", self.position, self.target);
    }

    /// Recompute the projection for a `width` x `height` viewport. On error
    /// the previous projection stays in place.
    pub fn update_projection_matrix(&mut self, width: u32, height: u32) -> Result<()> {
        if height == 0 {
            log::warn!("ignoring projection update for zero-height viewport ({width}x0)");
            return Err(MathError::ZeroViewportHeight { width });
        }

        let aspect = width as f32 / height as f32;
        let projection = try_perspective(self.fov_degrees, aspect, self.near, self.far)
            .inspect_err(|e| log::warn!("ignoring projection update: {e}"))?;

        self.aspect = aspect;
        self.projection = projection;
        log::trace!("projection matrix refreshed for {width}x{height}");
        Ok(())
    }

    /// Change the vertical field of view, keeping the current aspect ratio.
    pub fn set_field_of_view(&mut self, fov_degrees: f32) -> Result<()> {
        self.projection = try_perspective(fov_degrees, self.aspect, self.near, self.far)?;
        self.fov_degrees = fov_degrees;
        Ok(())
    }

    /// Unit heading used for both looking and moving.
    ///
    /// In [`LookMode::Planar`] this is `(cos yaw, 0, sin yaw)`.
    pub fn forward_direction(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        match self.look_mode {
            LookMode::Planar => Vec3::new(yaw.cos(), 0.0, yaw.sin()),
            LookMode::FreeFly => {
                let pitch = self.pitch.to_radians();
                Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
            }
        }
    }

    /// Re-derive the target one unit ahead of the position.
    pub fn set_target_from_yaw(&mut self) {
        self.target = self.position + self.forward_direction();
    }

    pub fn move_forward(&mut self, distance: f32) {
        let direction = self.forward_direction();
        self.position = self.position + direction * distance;
        self.target = self.position + direction;
    }

    pub fn move_backwards(&mut self, distance: f32) {
        self.move_forward(-distance);
    }

    pub fn move_up(&mut self, delta: f32) {
        self.position.y += delta;
        self.set_target_from_yaw();
    }

    pub fn move_down(&mut self, delta: f32) {
        self.move_up(-delta);
    }

    pub fn rotate_yaw(&mut self, degrees: f32) {
        self.yaw = wrap_degrees(self.yaw + degrees);
        self.set_target_from_yaw();
    }

    /// Tilt the heading. Only [`LookMode::FreeFly`] cameras look along the
    /// pitched direction.
    pub fn rotate_pitch(&mut self, degrees: f32) {
        self.pitch = (self.pitch + degrees).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.set_target_from_yaw();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.set_target_from_yaw();
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn look_mode(&self) -> LookMode {
        self.look_mode
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new();
        assert_vec_close(camera.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_vec_close(camera.target(), Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(camera.up(), Vec3::UP);
        assert!((camera.yaw() - 270.0).abs() < EPS);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.look_mode(), LookMode::Planar);
        assert_eq!(*camera.projection_matrix(), perspective(45.0, 1.0, 0.1, 100.0));
    }

    #[test]
    fn test_default_view_maps_position_to_origin() {
        let camera = Camera::new();
        let p = camera.view_matrix().transform_point(camera.position());
        assert!(p[..3].iter().all(|v| v.abs() < EPS));
    }

    #[test]
    fn test_move_forward_along_yaw() {
        let mut camera = Camera::new();
        let yaw = camera.yaw().to_radians();
        camera.move_forward(1.0);

        let expected = Vec3::new(yaw.cos(), 0.0, 5.0 + yaw.sin());
        assert_vec_close(camera.position(), expected);
        assert_vec_close(camera.target(), expected + camera.forward_direction());
        assert_vec_close(camera.position(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_move_backwards_undoes_forward() {
        let mut camera = Camera::new();
        camera.rotate_yaw(33.0);
        let start = camera.position();
        camera.move_forward(2.5);
        camera.move_backwards(2.5);
        assert_vec_close(camera.position(), start);
    }

    #[test]
    fn test_view_matrix_not_refreshed_until_asked() {
        let mut camera = Camera::new();
        let before = *camera.view_matrix();
        camera.move_forward(1.0);
        assert_eq!(*camera.view_matrix(), before);

        camera.update_view_matrix();
        assert_ne!(*camera.view_matrix(), before);
        let p = camera.view_matrix().transform_point(camera.position());
        assert!(p[..3].iter().all(|v| v.abs() < EPS));
    }

    #[test]
    fn test_move_up_keeps_heading() {
        let mut camera = Camera::new();
        camera.move_up(2.0);
        assert_vec_close(camera.position(), Vec3::new(0.0, 2.0, 5.0));
        assert_vec_close(camera.target(), Vec3::new(0.0, 2.0, 4.0));

        camera.move_down(0.5);
        assert!((camera.position().y - 1.5).abs() < EPS);
        assert!((camera.target().y - 1.5).abs() < EPS);
    }

    #[test]
    fn test_rotate_yaw_wraps() {
        let mut camera = Camera::new();
        camera.rotate_yaw(100.0);
        assert!((camera.yaw() - 10.0).abs() < 1e-4);
        camera.rotate_yaw(-20.0);
        assert!((camera.yaw() - 350.0).abs() < 1e-4);
        camera.rotate_yaw(720.0);
        assert!((camera.yaw() - 350.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_yaw_turns_target() {
        let mut camera = Camera::new();
        camera.rotate_yaw(90.0);
        // yaw 0 looks down +x
        assert_vec_close(camera.target(), Vec3::new(1.0, 0.0, 5.0));
    }

    #[test]
    fn test_planar_ignores_pitch() {
        let mut camera = Camera::new();
        camera.rotate_pitch(30.0);
        assert_eq!(camera.pitch(), 30.0);
        assert_vec_close(camera.target(), Vec3::new(0.0, 0.0, 4.0));

        camera.move_forward(1.0);
        assert!(camera.position().y.abs() < EPS);
    }

    #[test]
    fn test_free_fly_applies_clamped_pitch() {
        let config = CameraConfig {
            look_mode: LookMode::FreeFly,
            ..CameraConfig::default()
        };
        let mut camera = Camera::from_config(&config).unwrap();
        camera.rotate_pitch(120.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);

        camera.rotate_pitch(-PITCH_LIMIT - 30.0);
        assert_eq!(camera.pitch(), -30.0);

        camera.move_forward(2.0);
        assert!((camera.position().y + 1.0).abs() < EPS);
        assert!((camera.forward_direction().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_update_projection_matrix() {
        let mut camera = Camera::new();
        camera.update_projection_matrix(800, 600).unwrap();
        assert!((camera.aspect() - 800.0 / 600.0).abs() < EPS);
        assert_eq!(*camera.projection_matrix(), perspective(45.0, 800.0 / 600.0, 0.1, 100.0));
    }

    #[test]
    fn test_update_projection_rejects_zero_height() {
        let mut camera = Camera::new();
        let before = *camera.projection_matrix();
        assert_eq!(
            camera.update_projection_matrix(640, 0),
            Err(MathError::ZeroViewportHeight { width: 640 })
        );
        assert!(matches!(
            camera.update_projection_matrix(0, 480),
            Err(MathError::InvalidAspect(_))
        ));
        assert_eq!(*camera.projection_matrix(), before);
        assert_eq!(camera.aspect(), 1.0);
    }

    #[test]
    fn test_from_config_rejects_bad_lens() {
        let config = CameraConfig {
            near: 10.0,
            far: 10.0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            Camera::from_config(&config),
            Err(MathError::DegenerateDepthRange { .. })
        ));
    }

    #[test]
    fn test_set_field_of_view() {
        let mut camera = Camera::new();
        camera.set_field_of_view(90.0).unwrap();
        assert!((camera.projection_matrix().get(1, 1) - 1.0).abs() < EPS);
        assert!(camera.set_field_of_view(0.0).is_err());
        assert_eq!(camera.fov_degrees(), 90.0);
    }
}
