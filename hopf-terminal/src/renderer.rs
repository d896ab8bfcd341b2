/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use hopf_core::{Color, IndexedMesh};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

use crate::camera::Camera;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph used for fiber curves.
const LINE_CHAR: char = 'o';

/// Lines win depth ties against the surfaces they lie on.
const LINE_DEPTH_BIAS: f64 = 1e-3;

/// Share of surface brightness that does not depend on the light direction.
const AMBIENT: f32 = 0.3;

/// ASCII renderer that converts meshes and polylines to colored characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    light_dir: Vector3<f64>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::WHITE; size],
            light_dir: Vector3::new(-0.4, 0.6, 1.0).normalize(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::WHITE);
    }

    /// Rasterize every finite triangle of `mesh`, shaded from both sides.
    pub fn render_mesh(&mut self, mesh: &IndexedMesh, color: Color, model_matrix: &Matrix4<f64>, camera: &Camera) {
        for triangle in mesh.triangles() {
            if !triangle.is_finite() {
                continue;
            }
            let Some(normal) = triangle.normal() else {
                continue;
            };

            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            let mut visible = true;
            for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
                match self.project(vertex, model_matrix, camera) {
                    Some(coords) => *slot = coords,
                    None => {
                        visible = false;
                        break;
                    }
                }
            }
            if !visible {
                continue;
            }

            let world_normal = model_matrix.transform_vector(&normal);
            let brightness = world_normal.normalize().dot(&self.light_dir).abs() as f32;

            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
            let shade = color.scaled(AMBIENT + (1.0 - AMBIENT) * brightness);

            self.rasterize_triangle(&screen_coords, character, shade);
        }
    }

    /// Draw a polyline given as flat `[x, y, z, ...]` positions. Segments
    /// touching a non-projectable point are skipped.
    pub fn render_polyline(&mut self, positions: &[f32], color: Color, model_matrix: &Matrix4<f64>, camera: &Camera) {
        let mut previous = None;
        for chunk in positions.chunks_exact(3) {
            let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let current = self.project(&point, model_matrix, camera);
            if let (Some(a), Some(b)) = (previous, current) {
                self.rasterize_line(a, b, color);
            }
            previous = current;
        }
    }

    fn project(&self, point: &Point3<f64>, model_matrix: &Matrix4<f64>, camera: &Camera) -> Option<(f64, f64, f64)> {
        camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
    }

    fn rasterize_triangle(&mut self, coords: &[(f64, f64, f64); 3], character: char, color: Color) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) else {
                    continue;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x as usize, y as usize, depth, character, color);
                }
            }
        }
    }

    /// DDA line with linearly interpolated depth
    fn rasterize_line(&mut self, a: (f64, f64, f64), b: (f64, f64, f64), color: Color) {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let steps = dx.abs().max(dy.abs()).ceil();
        // Segments spanning far beyond the screen come from samples near the
        // projection's singularity.
        if steps > 4.0 * (self.width + self.height) as f64 {
            return;
        }
        let steps = steps.max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = a.0 + dx * t;
            let y = a.1 + dy * t;
            if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
                continue;
            }
            let depth = a.2 + (b.2 - a.2) * t - LINE_DEPTH_BIAS;
            self.plot(x as usize, y as usize, depth, LINE_CHAR, color);
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f64, character: char, color: Color) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn color_at(&self, x: usize, y: usize) -> Color {
        self.color_buffer[y * self.width + x]
    }

    /// Rows of the character buffer without color.
    pub fn lines(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let (r, g, b) = self.color_buffer[idx].to_rgb8();
                writer.queue(SetForegroundColor(TermColor::Rgb { r, g, b }))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    pub fn draw_plain<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for line in self.lines() {
            writeln!(writer, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), p: (f64, f64)) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
