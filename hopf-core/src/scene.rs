/// Scene state: the selected fiber, fibers placed so far, and sweep surfaces
///
/// Owned by whichever driver presents it; there is no global scene.
use tracing::{debug, warn};

use crate::color::{point_to_color, Color};
use crate::error::{HopfError, Result};
use crate::fiber::{write_fiber_points, DEFAULT_POINT};
use crate::geometry::IndexedMesh;
use crate::sphere::SpherePoint;
use crate::sweep::{FiberSurface, Sweep, SweepPath};
use crate::torus::{TorusApprox, TUBE_SEGMENTS};

/// The fiber currently under the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub point: SpherePoint,
    pub color: Color,
}

/// A fiber committed to the scene, drawn as a torus
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFiber {
    pub point: SpherePoint,
    pub color: Color,
    pub torus: TorusApprox,
    pub mesh: IndexedMesh,
}

#[derive(Debug, Clone)]
pub struct SceneState {
    divisions: usize,
    selection: Option<Selection>,
    /// Flat positions of the selected fiber, refilled in place on update.
    fiber_positions: Vec<f32>,
    placed: Vec<PlacedFiber>,
    surfaces: Vec<FiberSurface>,
}

impl SceneState {
    /// New scene showing the fiber over [`DEFAULT_POINT`].
    pub fn new(divisions: usize) -> Result<Self> {
        if divisions == 0 {
            return Err(HopfError::InvalidDivisions(divisions));
        }
        let mut scene = Self {
            divisions,
            selection: None,
            fiber_positions: Vec::with_capacity((divisions + 1) * 3),
            placed: Vec::new(),
            surfaces: Vec::new(),
        };
        scene.update(Some(DEFAULT_POINT))?;
        Ok(scene)
    }

    pub fn divisions(&self) -> usize {
        self.divisions
    }

    /// Select `point`, or hide the selection with `None`.
    ///
    /// The previous fiber buffer is kept while hidden so that the next
    /// selection refills the same allocation.
    pub fn update(&mut self, point: Option<SpherePoint>) -> Result<()> {
        let Some(point) = point else {
            self.selection = None;
            return Ok(());
        };

        write_fiber_points(&point, self.divisions, &mut self.fiber_positions)?;
        self.selection = Some(Selection {
            point,
            color: point_to_color(&point),
        });
        Ok(())
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.selection.is_some()
    }

    /// Flat positions of the selected fiber, or `None` while hidden.
    pub fn fiber_positions(&self) -> Option<&[f32]> {
        self.selection.as_ref().map(|_| self.fiber_positions.as_slice())
    }

    /// Commit the selected fiber as a torus. Returns `None` if nothing is
    /// selected or the fiber passes through infinity.
    pub fn add_point(&mut self) -> Option<&PlacedFiber> {
        let selection = self.selection.as_ref()?;

        let torus = TorusApprox::from_point(&selection.point);
        if !torus.is_finite() {
            warn!(point = ?selection.point, "fiber passes through infinity, not placing torus");
            return None;
        }

        let placed = PlacedFiber {
            point: selection.point,
            color: selection.color,
            torus,
            mesh: torus.to_mesh(TUBE_SEGMENTS),
        };
        debug!(
            radius = placed.torus.radius,
            triangles = placed.mesh.triangle_count(),
            "placed fiber"
        );
        self.placed.push(placed);
        self.placed.last()
    }

    /// Select and place `steps` points along `path`, ending with the last one
    /// selected.
    pub fn add_circle(&mut self, path: SweepPath, start: f64, end: f64, steps: usize) -> Result<usize> {
        let mut added = 0;
        for point in path.sample(start, end, steps) {
            self.update(Some(point))?;
            if self.add_point().is_some() {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn add_surface(&mut self, sweep: &Sweep) -> Result<&FiberSurface> {
        let surface = sweep.build()?;
        self.surfaces.push(surface);
        Ok(&self.surfaces[self.surfaces.len() - 1])
    }

    pub fn placed(&self) -> &[PlacedFiber] {
        &self.placed
    }

    pub fn surfaces(&self) -> &[FiberSurface] {
        &self.surfaces
    }

    pub fn clear_placed(&mut self) {
        self.placed.clear();
    }

    pub fn clear_surfaces(&mut self) {
        self.surfaces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiber::fiber_points;
    use crate::sweep::BandColoring;
    use crate::torus::MAX_RING_SEGMENTS;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_new_shows_default_fiber() {
        let scene = SceneState::new(64).unwrap();
        assert!(scene.is_visible());
        assert_eq!(scene.selection().unwrap().point, DEFAULT_POINT);
        assert_eq!(scene.fiber_positions().unwrap(), fiber_points(&DEFAULT_POINT, 64).unwrap().as_slice());
    }

    #[test]
    fn test_zero_divisions() {
        assert_eq!(SceneState::new(0).unwrap_err(), HopfError::InvalidDivisions(0));
    }

    #[test]
    fn test_update_and_hide() {
        let mut scene = SceneState::new(32).unwrap();
        let p = SpherePoint::new(0.0, 0.6, 0.8);

        scene.update(Some(p)).unwrap();
        let selection = scene.selection().unwrap();
        assert_eq!(selection.point, p);
        assert_eq!(selection.color, point_to_color(&p));
        assert_eq!(scene.fiber_positions().unwrap().len(), 33 * 3);

        scene.update(None).unwrap();
        assert!(!scene.is_visible());
        assert!(scene.fiber_positions().is_none());
        assert!(scene.add_point().is_none());
        assert!(scene.placed().is_empty());
    }

    #[test]
    fn test_update_reuses_buffer() {
        let mut scene = SceneState::new(128).unwrap();
        let ptr = scene.fiber_positions().unwrap().as_ptr();
        scene.update(Some(SpherePoint::new(0.0, 0.0, 1.0))).unwrap();
        scene.update(None).unwrap();
        scene.update(Some(SpherePoint::new(0.0, -1.0, 0.0))).unwrap();
        assert_eq!(scene.fiber_positions().unwrap().as_ptr(), ptr);
    }

    #[test]
    fn test_add_point() {
        let mut scene = SceneState::new(32).unwrap();
        let p = SpherePoint::new(-0.48, -0.6, 0.64);
        scene.update(Some(p)).unwrap();

        let placed = scene.add_point().unwrap();
        assert_eq!(placed.point, p);
        assert_eq!(placed.torus, TorusApprox::from_point(&p));
        assert!(placed.mesh.triangle_count() > 0);
        assert_eq!(scene.placed().len(), 1);

        scene.clear_placed();
        assert!(scene.placed().is_empty());
    }

    #[test]
    fn test_north_pole_not_placed() {
        let mut scene = SceneState::new(4).unwrap();
        scene.update(Some(SpherePoint::new(0.0, 1.0, 0.0))).unwrap();
        assert!(scene.is_visible());
        assert!(scene.add_point().is_none());
        assert!(scene.placed().is_empty());
    }

    #[test]
    fn test_near_pole_placement_is_bounded() {
        let mut scene = SceneState::new(16).unwrap();
        let y = 1.0 - f64::EPSILON;
        scene.update(Some(SpherePoint::new((1.0 - y * y).sqrt(), y, 0.0))).unwrap();

        let placed = scene.add_point().unwrap();
        assert!(placed.mesh.vertex_count() <= MAX_RING_SEGMENTS * TUBE_SEGMENTS);
    }

    #[test]
    fn test_add_circle() {
        let mut scene = SceneState::new(16).unwrap();
        let added = scene
            .add_circle(SweepPath::Meridian { theta: PI / 4.0 }, 0.0, PI, 10)
            .unwrap();
        assert_eq!(added, 10);
        assert_eq!(scene.placed().len(), 10);
        assert_eq!(scene.selection().unwrap().point, scene.placed()[9].point);
    }

    #[test]
    fn test_add_surface() {
        let mut scene = SceneState::new(16).unwrap();
        let sweep = Sweep {
            path: SweepPath::Parallel { phi: PI / 3.0 },
            start: 0.0,
            end: TAU,
            steps: 8,
            divisions: 16,
            coloring: BandColoring::PerFiber,
            wrap: true,
            closed_strips: false,
        };
        let bands = scene.add_surface(&sweep).unwrap().bands.len();
        assert_eq!(bands, 8);
        assert_eq!(scene.surfaces().len(), 1);

        scene.clear_surfaces();
        assert!(scene.surfaces().is_empty());
    }
}
