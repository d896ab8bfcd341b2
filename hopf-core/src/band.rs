/// Band mesh builder: a ruled triangle strip between two aligned curves
use nalgebra::Point3;
use tracing::trace;

use crate::error::{HopfError, Result};
use crate::geometry::IndexedMesh;

/// Stitch `curve_a` and `curve_b` into a strip.
///
/// Vertices are `curve_a` followed by `curve_b`, so `curve_a[i]` sits at index
/// `i` and `curve_b[i]` at `i + m`. Each consecutive pair contributes
///
/// ```text
///   i+1 ---- i+m+1
///    |     /   |
///    |   /     |
///    i ------ i+m
/// ```
///
/// the triangles `(i, i+m, i+m+1)` and `(i, i+m+1, i+1)`. With `closed` set,
/// one more quad joins the last pair back to the first.
///
/// The curves must be aligned sample for sample, which holds for fibers
/// computed with the same division count.
pub fn build_band(curve_a: &[Point3<f64>], curve_b: &[Point3<f64>], closed: bool) -> Result<IndexedMesh> {
    let m = curve_a.len();
    if m != curve_b.len() {
        return Err(HopfError::CurveLengthMismatch {
            left: m,
            right: curve_b.len(),
        });
    }
    if m == 0 {
        return Err(HopfError::EmptyCurve);
    }
    if closed && m < 3 {
        return Err(HopfError::ClosedBandTooShort(m));
    }

    let quads = if closed { m } else { m - 1 };
    let mut mesh = IndexedMesh::with_capacity(2 * m, 2 * quads);
    mesh.positions.extend_from_slice(curve_a);
    mesh.positions.extend_from_slice(curve_b);

    let m = m as u32;
    for i in 0..m - 1 {
        push_quad(&mut mesh, i, i + 1, m);
    }
    if closed {
        push_quad(&mut mesh, m - 1, 0, m);
    }

    mesh.compute_vertex_normals();
    trace!(vertices = mesh.vertex_count(), triangles = mesh.triangle_count(), closed, "built band");
    Ok(mesh)
}

fn push_quad(mesh: &mut IndexedMesh, i: u32, next: u32, m: u32) {
    mesh.indices.push([i, i + m, next + m]);
    mesh.indices.push([i, next + m, next]);
}
