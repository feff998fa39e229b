/// fly3d Core Library - camera and transformation math
///
/// Vector algebra, column-major 4x4 matrices, a free-fly camera and a
/// transformable entity that composes the model-view-projection matrix a
/// renderer uploads each frame.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, CameraConfig, LookMode};
pub use error::{MathError, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use matrix::Mat4;
pub use transform::{Transform, Transformable};
pub use vector::Vec3;
