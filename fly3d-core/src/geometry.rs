/// Geometry primitives for the textured quad
use crate::vector::{cross, normalize, Vec3};

/// A 3D vertex with position and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            uv: [u, v],
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal following counter-clockwise winding
    pub fn calculate_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        normalize(cross(v1 - v0, v2 - v0))
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Unit quad spanning [-1, 1] on x and y at z = 0, facing +z, with
    /// texture coordinates running (0,0) bottom-left to (1,1) top-right.
    pub fn quad() -> Self {
        let mut mesh = Self::new();

        mesh.add_triangle(Triangle::new(
            Vertex::new(-1.0, -1.0, 0.0, 0.0, 0.0),
            Vertex::new(1.0, -1.0, 0.0, 1.0, 0.0),
            Vertex::new(-1.0, 1.0, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-1.0, 1.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, -1.0, 0.0, 1.0, 0.0),
            Vertex::new(1.0, 1.0, 0.0, 1.0, 1.0),
        ));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
