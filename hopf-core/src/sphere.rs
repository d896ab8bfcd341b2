/// Points on the base 2-sphere and their Hopf coordinates
use nalgebra::{Point3, Vector3};

/// A point on S², stored as a 3D vector.
///
/// Callers are expected to supply unit-length input; nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpherePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SpherePoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Spherical to cartesian with azimuth `theta` and polar angle `phi`
    /// measured from +Z: `(r sinφ cosθ, r sinφ sinθ, r cosφ)`.
    pub fn from_spherical(r: f64, theta: f64, phi: f64) -> Self {
        Self {
            x: r * phi.sin() * theta.cos(),
            y: r * phi.sin() * theta.sin(),
            z: r * phi.cos(),
        }
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn as_point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn norm(&self) -> f64 {
        self.as_vector().norm()
    }

    /// Rescale onto the unit sphere. The zero vector stays zero.
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            return *self;
        }
        Self::new(self.x / n, self.y / n, self.z / n)
    }

    pub fn hopf_coordinates(&self) -> HopfCoordinates {
        HopfCoordinates {
            alpha: ((1.0 + self.y) / 2.0).sqrt(),
            beta: ((1.0 - self.y) / 2.0).sqrt(),
            angle_sum: (-self.x).atan2(self.z),
        }
    }
}

impl Default for SpherePoint {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

impl From<Vector3<f64>> for SpherePoint {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Parameters of the fiber over a base point.
///
/// `alpha` and `beta` are the moduli of the two complex coordinates of the
/// fiber in S³; `angle_sum` fixes their relative phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HopfCoordinates {
    pub alpha: f64,
    pub beta: f64,
    pub angle_sum: f64,
}

impl HopfCoordinates {
    /// Sample the projected fiber at parameter `theta`.
    ///
    /// The denominator `1 - alpha·sin(theta)` reaches zero only at the north
    /// pole with `theta = π/2`; the result is then non-finite.
    pub fn fiber_point(&self, theta: f64, scale: f64) -> Point3<f64> {
        let phi = self.angle_sum - theta;

        let proj = scale / (1.0 - self.alpha * theta.sin());
        let b = -self.beta * phi.cos();
        let c = self.alpha * theta.cos();
        let d = -self.beta * phi.sin();

        Point3::new(b * proj, c * proj, d * proj)
    }
}
