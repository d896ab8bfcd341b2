/// Hopf Core Library - fiber geometry for visualizing the Hopf fibration
///
/// This library provides the renderer-agnostic core: projecting the fiber over
/// a point of S² into 3D, coloring base points, approximating fibers by tori,
/// and stitching neighbouring fibers into band surfaces. Outputs are plain
/// position, normal and index buffers.

pub mod band;
pub mod color;
pub mod error;
pub mod fiber;
pub mod geometry;
pub mod scene;
pub mod sphere;
pub mod sweep;
pub mod torus;
pub mod transform;

// Re-export commonly used types
pub use band::build_band;
pub use color::{index_to_color, point_to_color, point_to_hsl, Color, Hsl};
pub use error::{HopfError, Result};
pub use fiber::{fiber_points, fiber_vertices, write_fiber_points, FiberCurve};
pub use geometry::{IndexedMesh, Triangle};
pub use scene::{PlacedFiber, SceneState, Selection};
pub use sphere::{HopfCoordinates, SpherePoint};
pub use sweep::{default_sweeps, Band, BandColoring, FiberSurface, Sweep, SweepPath};
pub use torus::TorusApprox;
pub use transform::{RingPlacement, ViewRotation};
