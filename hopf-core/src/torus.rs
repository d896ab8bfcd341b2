/// Flat-ring torus approximation of a fiber
///
/// The projected fiber is a circle (or a line through infinity at the north
/// pole). Three samples pin it down: the ±90° samples are diametrically
/// opposite, and the 0° sample fixes the plane.
use nalgebra::{Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::fiber::{is_finite_point, FIBER_SCALE};
use crate::geometry::IndexedMesh;
use crate::sphere::SpherePoint;
use crate::transform::RingPlacement;

/// Radius of the tube swept around the ring.
pub const TUBE_RADIUS: f64 = 0.02;

/// Segments around the tube cross-section.
pub const TUBE_SEGMENTS: usize = 8;

/// Bounds for the ring segment count. Near the north pole the radius grows
/// without limit, so the count saturates at the upper bound.
pub const MIN_RING_SEGMENTS: usize = 16;
pub const MAX_RING_SEGMENTS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusApprox {
    pub center: Point3<f64>,
    pub radius: f64,
    /// Unit normal of the ring's plane.
    pub orientation: Vector3<f64>,
    pub tube_radius: f64,
}

impl TorusApprox {
    pub fn from_point(point: &SpherePoint) -> Self {
        let hopf = point.hopf_coordinates();

        let left = hopf.fiber_point(FRAC_PI_2, FIBER_SCALE);
        let right = hopf.fiber_point(-FRAC_PI_2, FIBER_SCALE);
        let other = hopf.fiber_point(0.0, FIBER_SCALE);

        let center = nalgebra::center(&left, &right);
        let right = right - center;
        let other = other - center;

        Self {
            center,
            radius: right.norm(),
            orientation: other.cross(&right).normalize(),
            tube_radius: TUBE_RADIUS,
        }
    }

    /// Ring segments scaled with the radius so small rings stay cheap.
    pub fn segments(&self) -> usize {
        ((self.radius * 64.0).ceil() as usize).clamp(MIN_RING_SEGMENTS, MAX_RING_SEGMENTS)
    }

    pub fn is_finite(&self) -> bool {
        is_finite_point(&self.center)
            && self.radius.is_finite()
            && self.orientation.iter().all(|v| v.is_finite())
    }

    /// Tessellate with [`Self::segments`] ring segments.
    pub fn to_mesh(&self, tube_segments: usize) -> IndexedMesh {
        self.to_mesh_with(self.segments(), tube_segments)
    }

    /// Tessellate into `ring_segments × tube_segments` quads with outward
    /// vertex normals. Both counts are raised to at least 3.
    pub fn to_mesh_with(&self, ring_segments: usize, tube_segments: usize) -> IndexedMesh {
        let ring_segments = ring_segments.max(3);
        let tube_segments = tube_segments.max(3);
        let placement = RingPlacement::new(&self.center, &self.orientation);

        let vertex_count = ring_segments * tube_segments;
        let mut mesh = IndexedMesh::with_capacity(vertex_count, 2 * vertex_count);
        mesh.normals.reserve(vertex_count);

        for i in 0..ring_segments {
            let u = TAU * i as f64 / ring_segments as f64;
            let (sin_u, cos_u) = u.sin_cos();
            let ring_center = Point3::new(self.radius * cos_u, self.radius * sin_u, 0.0);

            for j in 0..tube_segments {
                let v = TAU * j as f64 / tube_segments as f64;
                let (sin_v, cos_v) = v.sin_cos();
                let normal = Vector3::new(cos_v * cos_u, cos_v * sin_u, sin_v);
                let position = ring_center + normal * self.tube_radius;

                mesh.positions.push(placement.apply_point(&position));
                mesh.normals.push(placement.apply_vector(&normal));
            }
        }

        let index = |i: usize, j: usize| ((i % ring_segments) * tube_segments + j % tube_segments) as u32;
        for i in 0..ring_segments {
            for j in 0..tube_segments {
                let a = index(i, j);
                let b = index(i + 1, j);
                let c = index(i + 1, j + 1);
                let d = index(i, j + 1);
                mesh.indices.push([a, b, d]);
                mesh.indices.push([b, c, d]);
            }
        }

        mesh
    }
}
