/// Sweeps: families of fibers over a path on S², stitched into band surfaces
use std::f64::consts::PI;
use tracing::debug;

use crate::band::build_band;
use crate::color::{index_to_color, point_to_color, Color};
use crate::error::{HopfError, Result};
use crate::fiber::{fiber_vertices, FiberCurve, SURFACE_DIVISIONS};
use crate::geometry::IndexedMesh;
use crate::sphere::SpherePoint;

/// A one-parameter path on the unit sphere, in the `(θ, φ)` convention of
/// [`SpherePoint::from_spherical`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepPath {
    /// Fixed azimuth `theta`; the sweep parameter is the polar angle.
    Meridian { theta: f64 },
    /// Fixed polar angle `phi`; the sweep parameter is the azimuth.
    Parallel { phi: f64 },
}

impl SweepPath {
    pub fn at(&self, t: f64) -> SpherePoint {
        match *self {
            SweepPath::Meridian { theta } => SpherePoint::from_spherical(1.0, theta, t),
            SweepPath::Parallel { phi } => SpherePoint::from_spherical(1.0, t, phi),
        }
    }

    /// `steps` samples from `start` toward `end`, excluding `end`.
    pub fn sample(&self, start: f64, end: f64, steps: usize) -> Vec<SpherePoint> {
        (0..steps)
            .map(|i| self.at(start + (i as f64 / steps as f64) * (end - start)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandColoring {
    /// Every band of the surface shares one color.
    Uniform(Color),
    /// Each band takes the color of its first base point.
    PerFiber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub path: SweepPath,
    pub start: f64,
    pub end: f64,
    pub steps: usize,
    pub divisions: usize,
    pub coloring: BandColoring,
    /// Add a band from the last fiber back to the first.
    pub wrap: bool,
    /// Close each band strip along the fiber direction. The repeated last
    /// sample of each fiber is dropped first, so the closing quad joins the
    /// final division back to the start. Needs at least 3 divisions.
    pub closed_strips: bool,
}

/// A colored band between two neighbouring fibers
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub mesh: IndexedMesh,
    pub color: Color,
}

/// Output of a sweep: the sampled base points (the curve drawn on S²) and one
/// band per neighbouring fiber pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FiberSurface {
    pub base_points: Vec<SpherePoint>,
    pub bands: Vec<Band>,
}

impl FiberSurface {
    pub fn triangle_count(&self) -> usize {
        self.bands.iter().map(|b| b.mesh.triangle_count()).sum()
    }
}

impl Sweep {
    pub fn sample_points(&self) -> Vec<SpherePoint> {
        self.path.sample(self.start, self.end, self.steps)
    }

    pub fn build(&self) -> Result<FiberSurface> {
        if self.steps < 2 {
            return Err(HopfError::InvalidSteps(self.steps));
        }

        let base_points = self.sample_points();
        let fibers = base_points
            .iter()
            .map(|p| fiber_vertices(p, self.divisions))
            .collect::<Result<Vec<FiberCurve>>>()?;

        let pair_count = if self.wrap { fibers.len() } else { fibers.len() - 1 };
        let mut bands = Vec::with_capacity(pair_count);
        for i in 0..pair_count {
            let next = (i + 1) % fibers.len();
            let mesh = if self.closed_strips {
                build_band(fibers[i].distinct_points(), fibers[next].distinct_points(), true)?
            } else {
                build_band(fibers[i].points(), fibers[next].points(), false)?
            };
            let color = match self.coloring {
                BandColoring::Uniform(color) => color,
                BandColoring::PerFiber => point_to_color(&base_points[i]),
            };
            bands.push(Band { mesh, color });
        }

        let surface = FiberSurface { base_points, bands };
        debug!(
            steps = self.steps,
            divisions = self.divisions,
            bands = surface.bands.len(),
            triangles = surface.triangle_count(),
            "built fiber surface"
        );
        Ok(surface)
    }
}

/// Four half-meridian sweeps at azimuths π·{0, 1/8, 2/8, 3/8}, each starting
/// one offset further around, colored by index.
pub fn default_sweeps() -> Vec<Sweep> {
    const FRACTIONS: [f64; 4] = [0.0, 1.0 / 8.0, 2.0 / 8.0, 3.0 / 8.0];

    FRACTIONS
        .iter()
        .enumerate()
        .map(|(i, &fraction)| {
            let start = -PI * fraction;
            Sweep {
                path: SweepPath::Meridian { theta: PI * fraction },
                start,
                end: start + PI,
                steps: 40,
                divisions: SURFACE_DIVISIONS,
                coloring: BandColoring::Uniform(index_to_color(i, FRACTIONS.len())),
                wrap: false,
                closed_strips: false,
            }
        })
        .collect()
}
