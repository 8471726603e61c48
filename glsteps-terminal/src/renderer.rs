/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

use glsteps_core::transform::{transform_point, W_EPSILON};
use glsteps_core::{Mesh, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Floor so faces turned away from the light stay visible
const AMBIENT: f32 = 0.2;

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    light_dir: Vector3<f32>,
    background: Color,
    cull_back_faces: bool,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            light_dir: Vector3::new(0.4, 0.6, 1.0).normalize(),
            background: Color::Reset,
            cull_back_faces: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height of the grid once each cell's own shape is accounted for
    pub fn aspect(&self, cell_aspect: f32) -> f32 {
        self.width as f32 * cell_aspect / self.height.max(1) as f32
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        log::debug!("resizing render target to {width}x{height}");
        *self = Self {
            background: self.background,
            cull_back_faces: self.cull_back_faces,
            ..Self::new(width, height)
        };
    }

    pub fn set_background(&mut self, rgb: [u8; 3]) {
        self.background = Color::Rgb {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        };
    }

    /// Counter-clockwise triangles (in normalized device coordinates) are front faces
    pub fn set_cull_back_faces(&mut self, cull: bool) {
        self.cull_back_faces = cull;
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn filled_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    /// Draw `mesh` transformed by `clip_matrix` (projection * model-view)
    pub fn render_mesh(&mut self, mesh: &Mesh, clip_matrix: &Matrix4<f32>) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, clip_matrix);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, clip_matrix: &Matrix4<f32>) {
        // Project vertices to normalized device coordinates
        let mut ndc = [Point3::origin(); 3];
        for (out, vertex) in ndc.iter_mut().zip(&triangle.vertices) {
            match self.to_ndc(clip_matrix, &vertex.position) {
                Some(p) => *out = p,
                None => return, // Triangle is clipped
            }
        }

        if self.cull_back_faces && signed_area(&ndc) <= 0.0 {
            return;
        }

        // Shade by the face normal against a fixed light
        let normal = triangle.calculate_normal();
        let brightness = AMBIENT + (1.0 - AMBIENT) * normal.dot(&self.light_dir).max(0.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        let screen = ndc.map(|p| self.to_screen(&p));
        self.rasterize_triangle(&screen, character);
    }

    /// Clip-space transform plus perspective divide; `None` behind the eye or
    /// outside the depth range
    fn to_ndc(&self, clip_matrix: &Matrix4<f32>, position: &Point3<f32>) -> Option<Point3<f32>> {
        let clip = transform_point(clip_matrix, position);
        if clip.w < W_EPSILON {
            return None;
        }
        let ndc = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
        (-1.0..=1.0).contains(&ndc.z).then_some(ndc)
    }

    fn to_screen(&self, ndc: &Point3<f32>) -> (f32, f32, f32) {
        let x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        (x, y, ndc.z)
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(self.background))?;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Black,
                    _ => Color::White,
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

/// Twice the signed area of the triangle's NDC footprint; positive when counter-clockwise
fn signed_area(ndc: &[Point3<f32>; 3]) -> f32 {
    let (a, b, c) = (ndc[0], ndc[1], ndc[2]);
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
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
