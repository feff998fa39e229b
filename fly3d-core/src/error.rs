/// Precondition violations for matrix and camera construction
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    #[error("near clip plane ({near}) must be closer than far ({far})")]
    DegenerateDepthRange { near: f32, far: f32 },

    #[error("clip planes must be positive (near {near}, far {far})")]
    NonPositiveClipPlane { near: f32, far: f32 },

    #[error("field of view must lie in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspect(f32),

    #[error("viewport height must be non-zero (width {width})")]
    ZeroViewportHeight { width: u32 },

    #[error("eye, target and up are collinear")]
    CollinearLookAt,

    #[error("expected 16 matrix entries, got {0}")]
    InvalidLength(usize),
}

pub type Result<T> = std::result::Result<T, MathError>;
