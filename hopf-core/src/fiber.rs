/// Fiber projection: the Hopf circle over a base point, projected into 3D
///
/// One per-sample formula ([`HopfCoordinates::fiber_point`]) feeds both output
/// shapes: a [`FiberCurve`] of points for mesh building and a flat `f32`
/// position buffer for direct upload.
///
/// Singular samples are not clamped. At the north pole the sample at
/// `theta = π/2` divides by zero and comes out infinite or NaN; use
/// [`FiberCurve::is_finite`] or [`FiberCurve::singular_indices`] to detect it.
use nalgebra::Point3;
use std::f64::consts::TAU;

use crate::error::{HopfError, Result};
use crate::sphere::{HopfCoordinates, SpherePoint};

/// Scale applied by the projection.
pub const FIBER_SCALE: f64 = 0.5;

/// Divisions used for the interactively selected fiber.
pub const DEFAULT_DIVISIONS: usize = 256;

/// Divisions used for fibers stitched into sweep surfaces.
pub const SURFACE_DIVISIONS: usize = 250;

/// Base point shown before anything is selected.
pub const DEFAULT_POINT: SpherePoint = SpherePoint::new(1.0, 0.0, 0.0);

/// Discretized fiber over a base point: `divisions + 1` samples, the last
/// revisiting the start angle.
#[derive(Debug, Clone, PartialEq)]
pub struct FiberCurve {
    points: Vec<Point3<f64>>,
}

impl FiberCurve {
    pub fn compute(point: &SpherePoint, divisions: usize) -> Result<Self> {
        let points = samples(point, divisions)?.collect();
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Samples without the repeated endpoint, one per division.
    pub fn distinct_points(&self) -> &[Point3<f64>] {
        &self.points[..self.points.len().saturating_sub(1)]
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(is_finite_point)
    }

    /// Indices of samples that hit the projection's singularity.
    pub fn singular_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| !is_finite_point(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// Flatten into `[x0, y0, z0, x1, ...]`.
    pub fn to_position_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 3);
        extend_flat(&mut out, self.points.iter().copied());
        out
    }
}

/// Fiber over `point` as a sequence of points.
pub fn fiber_vertices(point: &SpherePoint, divisions: usize) -> Result<FiberCurve> {
    FiberCurve::compute(point, divisions)
}

/// Fiber over `point` as a flat position buffer of `3 * (divisions + 1)` floats.
pub fn fiber_points(point: &SpherePoint, divisions: usize) -> Result<Vec<f32>> {
    let mut out = Vec::with_capacity((divisions + 1) * 3);
    write_fiber_points(point, divisions, &mut out)?;
    Ok(out)
}

/// Refill `out` with the flat fiber buffer, reusing its allocation.
pub fn write_fiber_points(point: &SpherePoint, divisions: usize, out: &mut Vec<f32>) -> Result<()> {
    let iter = samples(point, divisions)?;
    out.clear();
    extend_flat(out, iter);
    Ok(())
}

fn samples(point: &SpherePoint, divisions: usize) -> Result<impl Iterator<Item = Point3<f64>>> {
    if divisions == 0 {
        return Err(HopfError::InvalidDivisions(divisions));
    }

    let hopf: HopfCoordinates = point.hopf_coordinates();
    Ok((0..=divisions).map(move |i| {
        let theta = TAU * i as f64 / divisions as f64;
        hopf.fiber_point(theta, FIBER_SCALE)
    }))
}

fn extend_flat(out: &mut Vec<f32>, points: impl Iterator<Item = Point3<f64>>) {
    for p in points {
        out.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
    }
}

pub(crate) fn is_finite_point(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
