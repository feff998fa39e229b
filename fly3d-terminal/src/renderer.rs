/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use fly3d_core::{Mat4, Mesh, Triangle};
use std::io::Write;

/// Number of checker cells across each face
const TEXTURE_CELLS: f32 = 4.0;

/// Which side of a triangle faces the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

/// A projected vertex: screen x, screen y, NDC depth, texture coordinate
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    uv: [f32; 2],
}

/// ASCII renderer that converts projected triangles to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, mostly for inspection in tests
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// Rasterize every triangle of `mesh` through a model-view-projection
    /// matrix. Returns the number of triangles drawn; a triangle with any
    /// vertex behind the eye is skipped, everything else is clipped per cell.
    pub fn render_mesh(&mut self, mesh: &Mesh, mvp: &Mat4) -> usize {
        mesh.triangles
            .iter()
            .filter(|triangle| self.render_triangle(triangle, mvp))
            .count()
    }

    fn render_triangle(&mut self, triangle: &Triangle, mvp: &Mat4) -> bool {
        let mut screen = Vec::with_capacity(3);
        for vertex in &triangle.vertices {
            match mvp.project_to_viewport(vertex.position, self.width as u32, self.height as u32) {
                Some((x, y, depth)) => screen.push(ScreenVertex {
                    x,
                    y,
                    depth,
                    uv: vertex.uv,
                }),
                None => return false, // Vertex behind the eye
            }
        }

        let (v0, v1, v2) = (screen[0], screen[1], screen[2]);

        // Screen y grows downward, so counter-clockwise model winding shows up
        // as a negative signed area.
        let area = (v1.x - v0.x) * (v2.y - v0.y) - (v2.x - v0.x) * (v1.y - v0.y);
        let facing = if area < 0.0 { Facing::Front } else { Facing::Back };

        self.rasterize_triangle(v0, v1, v2, facing);
        true
    }

    fn rasterize_triangle(&mut self, v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex, facing: Facing) {
        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let u = w0 * v0.uv[0] + w1 * v1.uv[0] + w2 * v2.uv[0];
                    let v = w0 * v0.uv[1] + w1 * v1.uv[1] + w2 * v2.uv[1];
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = sample_texture(facing, u, v);
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    '#' => Color::Cyan,
                    '+' => Color::Blue,
                    '%' => Color::Yellow,
                    ':' => Color::DarkYellow,
                    _ => Color::DarkGrey,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Procedural stand-ins for the two face textures. The back face mirrors u
/// so its pattern reads correctly from behind.
pub fn sample_texture(facing: Facing, u: f32, v: f32) -> char {
    let cell = |t: f32| ((t * TEXTURE_CELLS).floor() as i32).clamp(0, TEXTURE_CELLS as i32 - 1);
    match facing {
        Facing::Front => {
            if (cell(u) + cell(v)) % 2 == 0 {
                '#'
            } else {
                '+'
            }
        }
        Facing::Back => {
            if cell(1.0 - u) % 2 == 0 {
                '%'
            } else {
                ':'
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly3d_core::{Camera, Transformable};

    fn render_quad(theta: f32) -> AsciiRenderer {
        let mut camera = Camera::new();
        camera.update_projection_matrix(80, 80).unwrap();
        let mut quad = Transformable::default();
        quad.update(theta);
        let mvp = quad.compose_mvp(camera.view_matrix(), camera.projection_matrix());

        let mut renderer = AsciiRenderer::new(80, 40);
        assert_eq!(renderer.render_mesh(&Mesh::quad(), &mvp), 2);
        renderer
    }

    #[test]
    fn test_front_face_uses_front_texture() {
        let renderer = render_quad(0.0);
        assert!(matches!(renderer.cell(40, 20), '#' | '+'));
        assert_eq!(renderer.cell(0, 0), ' ');
    }

    #[test]
    fn test_back_face_after_half_turn() {
        let renderer = render_quad(180.0);
        assert!(matches!(renderer.cell(40, 20), '%' | ':'));
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = render_quad(0.0);
        renderer.clear();
        assert_eq!(renderer.cell(40, 20), ' ');
    }

    #[test]
    fn test_sample_texture_checker() {
        assert_eq!(sample_texture(Facing::Front, 0.1, 0.1), '#');
        assert_eq!(sample_texture(Facing::Front, 0.3, 0.1), '+');
        assert_eq!(sample_texture(Facing::Back, 0.9, 0.5), '%');
        assert_eq!(sample_texture(Facing::Front, 1.0, 1.0), '#');
    }

    #[test]
    fn test_draw_emits_every_cell() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }
}
