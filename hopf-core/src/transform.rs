/// View rotation state and rigid placement of ring geometry
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};
use std::f64::consts::PI;

/// Rotation of the whole scene around three axes (in radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewRotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl ViewRotation {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn rotate(&mut self, d_pitch: f64, d_yaw: f64, d_roll: f64) {
        self.pitch += d_pitch;
        self.yaw += d_yaw;
        self.roll += d_roll;
    }

    /// Model matrix applying roll, then yaw, then pitch.
    pub fn matrix(&self) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(self.pitch, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.yaw, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.roll));
        rx * ry * rz
    }
}

/// Rotation carrying +Z onto `normal`.
///
/// Antiparallel input has no unique shortest rotation; a half turn about X
/// is used.
pub fn align_z_to(normal: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::rotation_between(&Vector3::z(), normal)
        .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI))
}

/// Placement of geometry modelled around the origin in the XY plane: rotate
/// +Z onto `normal`, then move the origin to `center`.
#[derive(Debug, Clone, Copy)]
pub struct RingPlacement {
    pub rotation: Rotation3<f64>,
    pub translation: Translation3<f64>,
}

impl RingPlacement {
    pub fn new(center: &Point3<f64>, normal: &Vector3<f64>) -> Self {
        Self {
            rotation: align_z_to(normal),
            translation: Translation3::new(center.x, center.y, center.z),
        }
    }

    pub fn apply_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.translation * (self.rotation * p)
    }

    pub fn apply_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_rotation() {
        let mut state = ViewRotation::default();
        assert_eq!(state, ViewRotation::new(0.0, 0.0, 0.0));

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.pitch - 0.1).abs() < 1e-12);
        assert!((state.yaw - 0.2).abs() < 1e-12);
        assert!((state.roll - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = ViewRotation::default().matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_align_z() {
        let target = Vector3::new(1.0, 1.0, 0.0).normalize();
        let r = align_z_to(&target);
        assert!((r * Vector3::z() - target).norm() < 1e-12);

        let flipped = align_z_to(&-Vector3::z());
        assert!((flipped * Vector3::z() + Vector3::z()).norm() < 1e-12);

        let same = align_z_to(&Vector3::z());
        assert!((same * Vector3::x() - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn test_ring_placement() {
        let placement = RingPlacement::new(&Point3::new(1.0, 2.0, 3.0), &Vector3::x());
        let moved = placement.apply_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((moved - Point3::new(2.0, 2.0, 3.0)).norm() < 1e-12);

        let n = placement.apply_vector(&Vector3::z());
        assert!((n - Vector3::x()).norm() < 1e-12);
    }
}
