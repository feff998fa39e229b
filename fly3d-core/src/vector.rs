/// Three-component vector algebra
use nalgebra::{Point3, Vector3};
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        dot(self, other)
    }

    pub fn cross(self, other: Self) -> Self {
        cross(self, other)
    }

    pub fn normalize(self) -> Self {
        normalize(self)
    }

    pub fn length(self) -> f32 {
        dot(self, self).sqrt()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Sum of componentwise products
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Right-handed cross product
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// Scale `v` to unit length. A zero-length (or NaN-length) vector maps to
/// the zero vector instead of dividing by zero.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 {
        Vec3::new(v.x / len, v.y / len, v.z / len)
    } else {
        Vec3::ZERO
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<Vector3<f32>> for Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3<f32> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Point3<f32>> for Vec3 {
    fn from(p: Point3<f32>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for Point3<f32> {
    fn from(v: Vec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-6
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_normalize_nan_vector() {
        let v = normalize(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1.0, 2.0, -7.5),
            Vec3::new(0.001, 0.0, 0.002),
        ];
        for v in samples {
            let n = normalize(v);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(close(normalize(n), n));
        }
    }

    #[test]
    fn test_dot_symmetric() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(0.5, 4.0, -1.0);
        assert_eq!(dot(a, b), dot(b, a));
        assert!((dot(a, b) - (0.5 - 8.0 - 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_cross_anticommutative_and_orthogonal() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(0.5, 4.0, -1.0);
        let c = cross(a, b);
        assert!(close(c, -cross(b, a)));
        assert!(dot(c, a).abs() < 1e-5);
        assert!(dot(c, b).abs() < 1e-5);
    }

    #[test]
    fn test_cross_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(cross(x, y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cross_parallel_is_zero() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(cross(a, a * 2.0), Vec3::ZERO);
        assert_eq!(cross(a, Vec3::ZERO), Vec3::ZERO);
    }
}
