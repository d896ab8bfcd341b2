/// Indexed triangle meshes handed to renderers
use nalgebra::{Point3, Vector3};

use crate::fiber::is_finite_point;

/// A triangle by vertex positions
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized face normal; its length is twice the triangle's area.
    pub fn area_normal(&self) -> Vector3<f64> {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Unit face normal, or `None` for a degenerate triangle
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.area_normal().try_normalize(f64::EPSILON)
    }

    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(is_finite_point)
    }
}

/// Vertex positions, optional per-vertex normals, and triangles as index
/// triples into `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub indices: Vec<[u32; 3]>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::new(),
            indices: Vec::with_capacity(triangles),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.indices[index];
        Triangle::new(
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.indices.len()).map(move |i| self.triangle(i))
    }

    /// Area-weighted vertex normals. Vertices touching only degenerate or
    /// non-finite faces get a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];

        for (i, [a, b, c]) in self.indices.iter().enumerate() {
            let triangle = self.triangle(i);
            if !triangle.is_finite() {
                continue;
            }
            let n = triangle.area_normal();
            normals[*a as usize] += n;
            normals[*b as usize] += n;
            normals[*c as usize] += n;
        }

        for n in &mut normals {
            *n = n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        self.normals = normals;
    }

    /// Positions as `[x0, y0, z0, x1, ...]`.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    /// Normals as `[x0, y0, z0, x1, ...]`; empty if none were computed.
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals
            .iter()
            .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
            .collect()
    }

    pub fn index_buffer(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> IndexedMesh {
        IndexedMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: Vec::new(),
            indices: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn test_triangle_normal() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let n = t.normal().unwrap();
        assert!((n - Vector3::z()).norm() < 1e-12);
        assert!((t.area_normal().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_triangle() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(Triangle::new(p, p, p).normal().is_none());
    }

    #[test]
    fn test_vertex_normals() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((n - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_non_finite_faces_ignored() {
        let mut mesh = quad();
        mesh.positions.push(Point3::new(f64::INFINITY, 0.0, 0.0));
        mesh.indices.push([1, 4, 2]);
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals[4], Vector3::zeros());
        assert!((mesh.normals[1] - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_buffers() {
        let mut mesh = quad();
        assert_eq!(mesh.position_buffer().len(), 12);
        assert!(mesh.normal_buffer().is_empty());
        assert_eq!(mesh.index_buffer(), vec![0, 1, 2, 0, 2, 3]);

        mesh.compute_vertex_normals();
        let normals = mesh.normal_buffer();
        assert_eq!(normals.len(), 12);
        assert_eq!(&normals[0..3], &[0.0, 0.0, 1.0]);
    }
}
