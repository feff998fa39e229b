/// 4x4 homogeneous matrices stored as 16 column-major floats
///
/// Entry `(col, row)` lives at flat index `col * 4 + row`, which is the layout
/// WebGL and most GPU APIs expect for a `mat4` uniform. Every operation here
/// returns a fresh matrix; nothing accumulates in place.
use nalgebra::Matrix4;
use std::fmt;
use std::ops::Mul;

use crate::error::{MathError, Result};
use crate::vector::{cross, dot, normalize, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const fn from_cols_array(data: [f32; 16]) -> Self {
        Self { data }
    }

    /// Build from a column-major slice, e.g. a uniform buffer handed back
    /// from a renderer.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let data: [f32; 16] = values
            .try_into()
            .map_err(|_| MathError::InvalidLength(values.len()))?;
        Ok(Self { data })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn to_array(self) -> [f32; 16] {
        self.data
    }

    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.data[col * 4 + row]
    }

    /// Overwrite `self` with the entries of `source`.
    pub fn copy_from(&mut self, source: &Mat4) {
        self.data = source.data;
    }

    pub fn multiply(&self, rhs: &Mat4) -> Mat4 {
        multiply(self, rhs)
    }

    pub fn rotate_x(&self, degrees: f32) -> Mat4 {
        rotate_x(self, degrees)
    }

    pub fn rotate_y(&self, degrees: f32) -> Mat4 {
        rotate_y(self, degrees)
    }

    pub fn rotate_z(&self, degrees: f32) -> Mat4 {
        rotate_z(self, degrees)
    }

    pub fn translate(&self, x: f32, y: f32, z: f32) -> Mat4 {
        translate(self, x, y, z)
    }

    pub fn scale(&self, x: f32, y: f32, z: f32) -> Mat4 {
        scale(self, x, y, z)
    }

    /// Multiply by a homogeneous column vector.
    pub fn mul_vec4(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|col| self.data[col * 4 + row] * v[col]).sum();
        }
        out
    }

    /// Transform a point (w = 1) without the perspective divide.
    pub fn transform_point(&self, p: Vec3) -> [f32; 4] {
        self.mul_vec4([p.x, p.y, p.z, 1.0])
    }

    /// Project a model-space point through this MVP matrix to viewport
    /// coordinates `(x, y, ndc_depth)`, with y growing downward. Points off
    /// the sides of the viewport still map, to coordinates outside
    /// `[0, width] x [0, height]`. Returns `None` only for points behind the eye.
    pub fn project_to_viewport(&self, point: Vec3, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let clip = self.transform_point(point);
        let w = clip[3];

        // Prevent division by near-zero or negative w (behind the camera)
        if w < 1e-6 {
            return None;
        }

        let ndc_x = clip[0] / w;
        let ndc_y = clip[1] / w;
        let ndc_z = clip[2] / w;

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc_z))
    }

    /// Like [`Mat4::project_to_viewport`], but also `None` for points outside
    /// the clip square.
    pub fn project_to_screen(&self, point: Vec3, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let (x, y, depth) = self.project_to_viewport(point, width, height)?;
        let inside = (0.0..=width as f32).contains(&x) && (0.0..=height as f32).contains(&y);
        inside.then_some((x, y, depth))
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// `a * b`: applied to a point, `b` acts first.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut data = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for i in 0..4 {
                sum += a.data[i * 4 + row] * b.data[col * 4 + i];
            }
            data[col * 4 + row] = sum;
        }
    }
    Mat4 { data }
}

pub fn rotate_x(m: &Mat4, degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    let mut rot = Mat4::IDENTITY;
    rot.data[5] = c;
    rot.data[6] = s;
    rot.data[9] = -s;
    rot.data[10] = c;
    multiply(m, &rot)
}

pub fn rotate_y(m: &Mat4, degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    let mut rot = Mat4::IDENTITY;
    rot.data[0] = c;
    rot.data[2] = -s;
    rot.data[8] = s;
    rot.data[10] = c;
    multiply(m, &rot)
}

pub fn rotate_z(m: &Mat4, degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    let mut rot = Mat4::IDENTITY;
    rot.data[0] = c;
    rot.data[1] = s;
    rot.data[4] = -s;
    rot.data[5] = c;
    multiply(m, &rot)
}

pub fn translate(m: &Mat4, x: f32, y: f32, z: f32) -> Mat4 {
    let mut t = Mat4::IDENTITY;
    t.data[12] = x;
    t.data[13] = y;
    t.data[14] = z;
    multiply(m, &t)
}

pub fn scale(m: &Mat4, x: f32, y: f32, z: f32) -> Mat4 {
    let mut s = Mat4::IDENTITY;
    s.data[0] = x;
    s.data[5] = y;
    s.data[10] = z;
    multiply(m, &s)
}

fn check_lens(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
    if !(near > 0.0 && far > 0.0) {
        return Err(MathError::NonPositiveClipPlane { near, far });
    }
    if near >= far {
        return Err(MathError::DegenerateDepthRange { near, far });
    }
    if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(MathError::InvalidFieldOfView(fov_degrees));
    }
    if !(aspect.is_finite() && aspect > 0.0) {
        return Err(MathError::InvalidAspect(aspect));
    }
    Ok(())
}

/// Right-handed perspective projection mapping depth into [-1, 1].
///
/// Callers must pass `0 < near < far`; use [`try_perspective`] when the lens
/// comes from untrusted input.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(
        check_lens(fov_degrees, aspect, near, far).is_ok(),
        "invalid perspective lens: fov {fov_degrees}, aspect {aspect}, near {near}, far {far}"
    );

    let focal_length = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
    let range_inverse = 1.0 / (near - far);

    Mat4::from_cols_array([
        focal_length / aspect, 0.0, 0.0, 0.0, //
        0.0, focal_length, 0.0, 0.0, //
        0.0, 0.0, (near + far) * range_inverse, -1.0, //
        0.0, 0.0, 2.0 * near * far * range_inverse, 0.0,
    ])
}

pub fn try_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4> {
    check_lens(fov_degrees, aspect, near, far)?;
    Ok(perspective(fov_degrees, aspect, near, far))
}

/// Camera basis for `look_at`, or `None` when eye, target and up are
/// collinear.
fn view_basis(eye: Vec3, target: Vec3, up: Vec3) -> Option<(Vec3, Vec3, Vec3)> {
    let forward = normalize(target - eye);
    let side = normalize(cross(forward, up));
    if side == Vec3::ZERO {
        return None;
    }
    let camera_up = cross(side, forward);
    Some((forward, side, camera_up))
}

/// Right-handed view matrix looking from `eye` toward `target`.
///
/// The basis vectors go into the rows of the rotation block. `up` must not
/// be parallel to `target - eye` (and `eye != target`), otherwise the side
/// vector collapses to zero and the matrix is singular.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let basis = view_basis(eye, target, up);
    debug_assert!(basis.is_some(), "look_at with collinear eye {eye:?}, target {target:?}, up {up:?}");

    // Release builds fall through to the singular matrix
    let (forward, side, camera_up) =
        basis.unwrap_or_else(|| (normalize(target - eye), Vec3::ZERO, Vec3::ZERO));

    let mut m = Mat4::IDENTITY;

    m.data[0] = side.x;
    m.data[4] = side.y;
    m.data[8] = side.z;

    m.data[1] = camera_up.x;
    m.data[5] = camera_up.y;
    m.data[9] = camera_up.z;

    m.data[2] = -forward.x;
    m.data[6] = -forward.y;
    m.data[10] = -forward.z;

    m.data[12] = -dot(side, eye);
    m.data[13] = -dot(camera_up, eye);
    m.data[14] = dot(forward, eye);

    m
}

pub fn try_look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Mat4> {
    view_basis(eye, target, up).ok_or(MathError::CollinearLookAt)?;
    Ok(look_at(eye, target, up))
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        multiply(&self, &rhs)
    }
}

impl<'a> Mul<&'a Mat4> for &'a Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: &'a Mat4) -> Mat4 {
        multiply(self, rhs)
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            writeln!(
                f,
                "[{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
                self.get(0, row),
                self.get(1, row),
                self.get(2, row),
                self.get(3, row)
            )?;
        }
        Ok(())
    }
}

impl From<Mat4> for [f32; 16] {
    fn from(m: Mat4) -> Self {
        m.data
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        Matrix4::from_column_slice(&m.data)
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(m: Matrix4<f32>) -> Self {
        let mut data = [0.0; 16];
        data.copy_from_slice(m.as_slice());
        Self { data }
    }
}
