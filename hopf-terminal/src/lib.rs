/// Terminal viewer for the Hopf fibration
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use hopf_core::{fiber::DEFAULT_POINT, HopfError, SceneState, SpherePoint, ViewRotation};
use std::f64::consts::{PI, TAU};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::info;

pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod renderer;

pub use camera::Camera;
pub use config::ViewerConfig;
pub use error::AppError;
pub use renderer::AsciiRenderer;

/// View rotation applied per key press (radians).
const VIEW_STEP: f64 = 0.1;

/// Selected base point in spherical coordinates (azimuth `theta`, polar
/// angle `phi` from +Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCursor {
    pub theta: f64,
    pub phi: f64,
}

impl SphereCursor {
    pub fn from_point(point: &SpherePoint) -> Self {
        let p = point.normalized();
        Self {
            theta: p.y.atan2(p.x).rem_euclid(TAU),
            phi: p.z.clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn point(&self) -> SpherePoint {
        SpherePoint::from_spherical(1.0, self.theta, self.phi)
    }

    /// Azimuth wraps around; the polar angle stops at the poles.
    pub fn step(&mut self, d_theta: f64, d_phi: f64) {
        self.theta = (self.theta + d_theta).rem_euclid(TAU);
        self.phi = (self.phi + d_phi).clamp(0.0, PI);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Scene, cursor and view state plus the rasterizer, independent of the
/// terminal itself.
pub struct Viewer {
    scene: SceneState,
    cursor: SphereCursor,
    cursor_step: f64,
    rotation: ViewRotation,
    camera: Camera,
    renderer: AsciiRenderer,
}

impl Viewer {
    /// `cursor_step` is in radians.
    pub fn new(scene: SceneState, cursor_step: f64, width: u16, height: u16) -> Self {
        let start = scene.selection().map(|s| s.point).unwrap_or(DEFAULT_POINT);
        Self {
            scene,
            cursor: SphereCursor::from_point(&start),
            cursor_step,
            rotation: ViewRotation::new(0.3, -0.4, 0.0),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn cursor(&self) -> SphereCursor {
        self.cursor
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.camera = Camera::new(width as u32, height as u32);
        self.renderer = AsciiRenderer::new(width as usize, height as usize);
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<Action, HopfError> {
        let step = self.cursor_step;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Left => self.move_cursor(-step, 0.0)?,
            KeyCode::Right => self.move_cursor(step, 0.0)?,
            KeyCode::Up => self.move_cursor(0.0, -step)?,
            KeyCode::Down => self.move_cursor(0.0, step)?,
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.scene.add_point();
            }
            KeyCode::Char('h') => {
                let next = if self.scene.is_visible() {
                    None
                } else {
                    Some(self.cursor.point())
                };
                self.scene.update(next)?;
            }
            KeyCode::Char('c') => self.scene.clear_placed(),
            KeyCode::Char('w') => self.rotation.rotate(VIEW_STEP, 0.0, 0.0),
            KeyCode::Char('s') => self.rotation.rotate(-VIEW_STEP, 0.0, 0.0),
            KeyCode::Char('a') => self.rotation.rotate(0.0, -VIEW_STEP, 0.0),
            KeyCode::Char('d') => self.rotation.rotate(0.0, VIEW_STEP, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, VIEW_STEP),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -VIEW_STEP),
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn move_cursor(&mut self, d_theta: f64, d_phi: f64) -> Result<(), HopfError> {
        self.cursor.step(d_theta, d_phi);
        self.scene.update(Some(self.cursor.point()))
    }

    /// Rasterize surfaces, placed tori, then the selected fiber on top.
    pub fn render(&mut self) {
        let model = self.rotation.matrix();
        self.renderer.clear();

        for surface in self.scene.surfaces() {
            for band in &surface.bands {
                self.renderer.render_mesh(&band.mesh, band.color, &model, &self.camera);
            }
        }
        for placed in self.scene.placed() {
            self.renderer.render_mesh(&placed.mesh, placed.color, &model, &self.camera);
        }
        if let (Some(selection), Some(positions)) = (self.scene.selection(), self.scene.fiber_positions()) {
            self.renderer.render_polyline(positions, selection.color, &model, &self.camera);
        }
    }

    pub fn status_line(&self) -> String {
        let selected = match self.scene.selection() {
            Some(s) => format!("({:+.2}, {:+.2}, {:+.2})", s.point.x, s.point.y, s.point.z),
            None => "hidden".to_string(),
        };
        format!(
            "Hopf fibration | point {} | placed {} | Arrows=Move Space=Place H=Hide C=Clear WASD/E/R=View Q=Quit",
            selected,
            self.scene.placed().len()
        )
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    viewer: Viewer,
    running: bool,
    target_fps: u32,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: SceneState, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            viewer: Viewer::new(scene, config.cursor_step * PI, width, height),
            running: true,
            target_fps: config.fps.max(1),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        info!(placed = self.viewer.scene().placed().len(), "viewer closed");
        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = Duration::from_millis(1000 / self.target_fps as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> Result<(), AppError> {
        match event::read()? {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if self.viewer.handle_key(code)? == Action::Quit {
                    self.running = false;
                }
            }
            Event::Resize(width, height) => self.viewer.resize(width, height),
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.viewer.render();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.viewer.renderer().draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("{} | FPS: {:.1}", self.viewer.status_line(), self.fps)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Render a single frame of `scene` as plain text.
pub fn snapshot<W: Write>(scene: SceneState, width: u16, height: u16, writer: &mut W) -> io::Result<()> {
    let mut viewer = Viewer::new(scene, 0.0, width, height);
    viewer.render();
    viewer.renderer().draw_plain(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopf_core::{point_to_color, BandColoring, Sweep, SweepPath};

    fn viewer() -> Viewer {
        Viewer::new(SceneState::new(64).unwrap(), PI / 16.0, 60, 30)
    }

    #[test]
    fn cursor_round_trip() {
        let p = SpherePoint::new(0.48, -0.6, 0.64);
        let back = SphereCursor::from_point(&p).point();
        assert!((back.as_vector() - p.as_vector()).norm() < 1e-12);
    }

    #[test]
    fn cursor_clamps_and_wraps() {
        let mut cursor = SphereCursor { theta: 0.1, phi: 0.1 };
        cursor.step(-0.2, -1.0);
        assert_eq!(cursor.phi, 0.0);
        assert!((cursor.theta - (TAU - 0.1)).abs() < 1e-12);
        cursor.step(0.0, 10.0);
        assert_eq!(cursor.phi, PI);
    }

    #[test]
    fn arrows_move_selection() {
        let mut viewer = viewer();
        let before = viewer.scene().selection().unwrap().point;
        assert_eq!(viewer.handle_key(KeyCode::Right).unwrap(), Action::Continue);
        let after = viewer.scene().selection().unwrap().point;
        assert_ne!(before, after);
        assert_eq!(viewer.scene().selection().unwrap().color, point_to_color(&after));
        assert_eq!(after, viewer.cursor().point());
    }

    #[test]
    fn place_hide_clear() {
        let mut viewer = viewer();
        viewer.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(viewer.scene().placed().len(), 1);

        viewer.handle_key(KeyCode::Char('h')).unwrap();
        assert!(!viewer.scene().is_visible());
        viewer.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(viewer.scene().placed().len(), 1);

        viewer.handle_key(KeyCode::Char('h')).unwrap();
        assert!(viewer.scene().is_visible());

        viewer.handle_key(KeyCode::Char('c')).unwrap();
        assert!(viewer.scene().placed().is_empty());
        assert_eq!(viewer.handle_key(KeyCode::Char('q')).unwrap(), Action::Quit);
    }

    #[test]
    fn render_draws_fiber_and_surface() {
        let mut scene = SceneState::new(128).unwrap();
        scene
            .add_surface(&Sweep {
                path: SweepPath::Meridian { theta: 0.0 },
                start: 0.0,
                end: PI,
                steps: 6,
                divisions: 48,
                coloring: BandColoring::PerFiber,
                wrap: false,
                closed_strips: false,
            })
            .unwrap();
        let mut viewer = Viewer::new(scene, PI / 16.0, 80, 40);
        viewer.render();

        let text = viewer.renderer().lines().concat();
        assert!(text.contains('o'));
        assert!(text.chars().any(|c| c != ' ' && c != 'o'));

        viewer.handle_key(KeyCode::Char('h')).unwrap();
        viewer.render();
        assert!(!viewer.renderer().lines().concat().contains('o'));
    }

    #[test]
    fn snapshot_writes_rows() {
        let mut out = Vec::new();
        snapshot(SceneState::new(64).unwrap(), 50, 20, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 20);
        assert!(text.contains('o'));
    }

    #[test]
    fn status_line_reports_selection() {
        let mut viewer = viewer();
        assert!(viewer.status_line().contains("(+1.00, +0.00, +0.00)"));
        viewer.handle_key(KeyCode::Char('h')).unwrap();
        assert!(viewer.status_line().contains("hidden"));
    }
}
