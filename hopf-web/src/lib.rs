/// Hopf fibration bindings for the browser
///
/// Exposes flat `f32`/`u32` buffers ready for upload to WebGL vertex and
/// index buffers. Each export wraps a plain Rust function so the geometry
/// paths are testable off wasm; errors become `JsValue` strings at the edge.
use hopf_core::{
    build_band, default_sweeps, point_to_color, Color, HopfError, IndexedMesh, SceneState, SpherePoint,
    TorusApprox,
};
use nalgebra::Point3;
use wasm_bindgen::prelude::*;

fn to_js(err: HopfError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Vertex, normal and index buffers of one mesh.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

#[wasm_bindgen]
impl MeshBuffers {
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn normals(&self) -> Vec<f32> {
        self.normals.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn indices(&self) -> Vec<u32> {
        self.indices.clone()
    }
}

impl From<&IndexedMesh> for MeshBuffers {
    fn from(mesh: &IndexedMesh) -> Self {
        Self {
            positions: mesh.position_buffer(),
            normals: mesh.normal_buffer(),
            indices: mesh.index_buffer(),
        }
    }
}

fn fiber_buffer(x: f64, y: f64, z: f64, divisions: usize) -> Result<Vec<f32>, HopfError> {
    hopf_core::fiber_points(&SpherePoint::new(x, y, z), divisions)
}

/// `None` if the buffer length is not a multiple of three.
fn points_from_buffer(buffer: &[f32]) -> Option<Vec<Point3<f64>>> {
    if buffer.len() % 3 != 0 {
        return None;
    }
    Some(
        buffer
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
            .collect(),
    )
}

fn band_buffers(a: &[Point3<f64>], b: &[Point3<f64>], closed: bool) -> Result<MeshBuffers, HopfError> {
    build_band(a, b, closed).map(|mesh| MeshBuffers::from(&mesh))
}

/// `[cx, cy, cz, radius, nx, ny, nz, tube_radius]`
fn torus_params(torus: &TorusApprox) -> Vec<f32> {
    let c = torus.center;
    let n = torus.orientation;
    [c.x, c.y, c.z, torus.radius, n.x, n.y, n.z, torus.tube_radius]
        .iter()
        .map(|&v| v as f32)
        .collect()
}

fn point_vec(point: &SpherePoint) -> Vec<f32> {
    vec![point.x as f32, point.y as f32, point.z as f32]
}

fn color_vec(color: Color) -> Vec<f32> {
    color.to_array().to_vec()
}

/// Fiber over `(x, y, z)` as `3 * (divisions + 1)` floats.
#[wasm_bindgen]
pub fn fiber_points(x: f64, y: f64, z: f64, divisions: usize) -> Result<Vec<f32>, JsValue> {
    fiber_buffer(x, y, z, divisions).map_err(to_js)
}

/// RGB color of a base point.
#[wasm_bindgen]
pub fn point_color(x: f64, y: f64, z: f64) -> Vec<f32> {
    color_vec(point_to_color(&SpherePoint::new(x, y, z)))
}

/// Triangle band between two flat position buffers of equal length.
#[wasm_bindgen]
pub fn band_mesh(curve_a: &[f32], curve_b: &[f32], closed: bool) -> Result<MeshBuffers, JsValue> {
    let (Some(a), Some(b)) = (points_from_buffer(curve_a), points_from_buffer(curve_b)) else {
        return Err(JsValue::from_str("curve buffers must hold x, y, z triples"));
    };
    band_buffers(&a, &b, closed).map_err(to_js)
}

/// Torus fitted to the fiber over `(x, y, z)`.
#[wasm_bindgen]
pub fn torus_approx(x: f64, y: f64, z: f64) -> Vec<f32> {
    torus_params(&TorusApprox::from_point(&SpherePoint::new(x, y, z)))
}

/// Scene driven from JavaScript: selection, placed tori and sweep surfaces.
#[wasm_bindgen]
pub struct WebScene {
    scene: SceneState,
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new(divisions: usize) -> Result<WebScene, JsValue> {
        let scene = SceneState::new(divisions).map_err(to_js)?;
        Ok(WebScene { scene })
    }

    /// Select the base point `(x, y, z)`; it is normalized first.
    pub fn select(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        let point = SpherePoint::new(x, y, z).normalized();
        self.scene.update(Some(point)).map_err(to_js)
    }

    pub fn hide(&mut self) -> Result<(), JsValue> {
        self.scene.update(None).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.scene.is_visible()
    }

    /// Positions of the selected fiber, or `undefined` while hidden.
    pub fn fiber_positions(&self) -> Option<Vec<f32>> {
        self.scene.fiber_positions().map(<[f32]>::to_vec)
    }

    pub fn selection_color(&self) -> Option<Vec<f32>> {
        self.scene.selection().map(|s| color_vec(s.color))
    }

    /// Returns `false` when nothing is selected or the fiber is singular.
    pub fn add_point(&mut self) -> bool {
        self.scene.add_point().is_some()
    }

    pub fn placed_count(&self) -> usize {
        self.scene.placed().len()
    }

    pub fn placed_mesh(&self, index: usize) -> Option<MeshBuffers> {
        self.scene.placed().get(index).map(|p| MeshBuffers::from(&p.mesh))
    }

    pub fn placed_color(&self, index: usize) -> Option<Vec<f32>> {
        self.scene.placed().get(index).map(|p| color_vec(p.color))
    }

    /// Base point on S² of a placed fiber, for inset markers.
    pub fn placed_point(&self, index: usize) -> Option<Vec<f32>> {
        self.scene.placed().get(index).map(|p| point_vec(&p.point))
    }

    pub fn placed_torus(&self, index: usize) -> Option<Vec<f32>> {
        self.scene.placed().get(index).map(|p| torus_params(&p.torus))
    }

    /// Build the four stock meridian surfaces.
    pub fn add_default_sweeps(&mut self) -> Result<usize, JsValue> {
        let sweeps = default_sweeps();
        for sweep in &sweeps {
            self.scene.add_surface(sweep).map_err(to_js)?;
        }
        Ok(sweeps.len())
    }

    pub fn surface_count(&self) -> usize {
        self.scene.surfaces().len()
    }

    pub fn band_count(&self, surface: usize) -> usize {
        self.scene.surfaces().get(surface).map_or(0, |s| s.bands.len())
    }

    /// Flat `[x, y, z, ...]` base points of a surface, the curve it sweeps
    /// on S².
    pub fn surface_base_points(&self, surface: usize) -> Option<Vec<f32>> {
        let surface = self.scene.surfaces().get(surface)?;
        Some(surface.base_points.iter().flat_map(point_vec).collect())
    }

    pub fn band_mesh(&self, surface: usize, band: usize) -> Option<MeshBuffers> {
        let band = self.scene.surfaces().get(surface)?.bands.get(band)?;
        Some(MeshBuffers::from(&band.mesh))
    }

    pub fn band_color(&self, surface: usize, band: usize) -> Option<Vec<f32>> {
        let band = self.scene.surfaces().get(surface)?.bands.get(band)?;
        Some(color_vec(band.color))
    }

    pub fn clear_placed(&mut self) {
        self.scene.clear_placed();
    }

    pub fn clear_surfaces(&mut self) {
        self.scene.clear_surfaces();
    }
}
