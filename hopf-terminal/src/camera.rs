/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 0.5;

/// Perspective camera looking at the origin
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Camera sized for a `width × height` character grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 6.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f64::consts::PI / 4.0, // 45 degrees
            aspect: width as f64 / height.max(1) as f64 * CELL_ASPECT,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a 3D point to screen space as `(column, row, depth)`.
    ///
    /// Returns `None` for non-finite input and for points outside the depth
    /// range, including anything behind the camera. Points outside the
    /// screen rectangle are kept so that partly visible primitives can be
    /// clipped by the rasterizer.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        model_matrix: &Matrix4<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Also rejects NaN.
        if !(clip.w > 1e-9) {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !ndc.iter().all(|v| v.is_finite()) || ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f64;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
