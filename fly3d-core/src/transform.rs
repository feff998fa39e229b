/// Model transforms and model-view-projection composition
use crate::matrix::{identity, multiply, Mat4};
use crate::vector::Vec3;

/// Wrap an angle in degrees into [0, 360).
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Translation followed (in the local frame) by a rotation about y
    pub fn model_matrix(position: Vec3, theta_degrees: f32) -> Mat4 {
        identity()
            .translate(position.x, position.y, position.z)
            .rotate_y(theta_degrees)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
        let model_view = multiply(view, model);
        multiply(projection, &model_view)
    }
}

/// An object placed in the world and spun about its vertical axis.
///
/// Both cached matrices are rebuilt by [`Transformable::compose_mvp`] and only
/// reflect the last call.
#[derive(Debug, Clone)]
pub struct Transformable {
    position: Vec3,
    theta: f32,
    model: Mat4,
    mvp: Mat4,
}

impl Transformable {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            theta: 0.0,
            model: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
        }
    }

    /// Spin by `angle_increment` degrees. Theta always stays in [0, 360),
    /// whatever the size of the step.
    pub fn update(&mut self, angle_increment: f32) {
        self.theta = wrap_degrees(self.theta + angle_increment);
    }

    pub fn compose_mvp(&mut self, view: &Mat4, projection: &Mat4) -> Mat4 {
        self.model = Transform::model_matrix(self.position, self.theta);
        self.mvp = Transform::mvp_matrix(&self.model, view, projection);
        self.mvp
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    pub fn mvp_matrix(&self) -> &Mat4 {
        &self.mvp
    }
}

impl Default for Transformable {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::matrix::{perspective, rotate_y, translate};

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(365.0), 5.0);
        assert_eq!(wrap_degrees(-15.0), 345.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert_eq!(wrap_degrees(-1e-9), 0.0);
    }

    #[test]
    fn test_update_wraps_past_full_turn() {
        let mut entity = Transformable::default();
        entity.update(355.0);
        entity.update(10.0);
        assert!((entity.theta() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_update_wraps_negative() {
        let mut entity = Transformable::default();
        entity.update(-15.0);
        assert_eq!(entity.theta(), 345.0);
    }

    #[test]
    fn test_model_matrix_composition_order() {
        let mut entity = Transformable::new(1.0, 2.0, 3.0);
        entity.update(90.0);
        entity.compose_mvp(&Mat4::IDENTITY, &Mat4::IDENTITY);

        let expected = rotate_y(&translate(&identity(), 1.0, 2.0, 3.0), 90.0);
        assert_eq!(*entity.model_matrix(), expected);

        // Local +x spins to -z before the offset is applied
        let p = entity.model_matrix().transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((p[0] - 1.0).abs() < 1e-5);
        assert!((p[2] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_compose_mvp_matches_manual_product() {
        let camera = Camera::new();
        let mut entity = Transformable::new(0.01, 0.0, 0.0);
        entity.update(10.0);

        let mvp = entity.compose_mvp(camera.view_matrix(), camera.projection_matrix());
        let manual = *camera.projection_matrix() * (*camera.view_matrix() * *entity.model_matrix());
        assert!(mvp.approx_eq(&manual, 1e-6));
        assert_eq!(*entity.mvp_matrix(), mvp);
    }

    #[test]
    fn test_entity_at_origin_projects_to_center() {
        let camera = Camera::new();
        let mut entity = Transformable::default();
        let mvp = entity.compose_mvp(camera.view_matrix(), &perspective(45.0, 2.0, 0.1, 100.0));
        let (x, y, _) = mvp.project_to_screen(Vec3::ZERO, 200, 100).unwrap();
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
    }
}
