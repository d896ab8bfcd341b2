/// Viewer configuration loaded from TOML.
///
/// Every field has a default, so an empty file (or no file) reproduces the
/// stock demo: the fiber over (1, 0, 0) and four meridian sweeps.
///
/// Sweep angles are written in multiples of π:
///
/// ```toml
/// divisions = 256
///
/// [[sweeps]]
/// path = "parallel"
/// fixed = 0.5        # polar angle π/2
/// start = 0.0
/// end = 2.0
/// wrap = true
/// ```
use hopf_core::{default_sweeps, BandColoring, Color, SpherePoint, Sweep, SweepPath};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Invalid(String),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Divisions of the interactively selected fiber.
    pub divisions: usize,
    /// Target frame rate of the interactive viewer.
    pub fps: u32,
    /// Base point selected at startup; normalized on use.
    pub initial_point: [f64; 3],
    /// Angle moved per arrow key press, in multiples of π.
    pub cursor_step: f64,
    /// Sweep surfaces to build. Absent means the stock set; an empty list
    /// means none.
    pub sweeps: Option<Vec<SweepConfig>>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            divisions: hopf_core::fiber::DEFAULT_DIVISIONS,
            fps: 30,
            initial_point: [1.0, 0.0, 0.0],
            cursor_step: 1.0 / 32.0,
            sweeps: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Meridian,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub path: PathKind,
    /// The angle held fixed along the path (azimuth for meridians, polar
    /// angle for parallels), in multiples of π.
    pub fixed: f64,
    pub start: f64,
    pub end: f64,
    pub steps: usize,
    pub divisions: usize,
    /// RGB in `[0, 1]`; absent colors each band by its base point.
    pub color: Option<[f32; 3]>,
    pub wrap: bool,
    pub closed_strips: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            path: PathKind::Meridian,
            fixed: 0.0,
            start: 0.0,
            end: 1.0,
            steps: 40,
            divisions: hopf_core::fiber::SURFACE_DIVISIONS,
            color: None,
            wrap: false,
            closed_strips: false,
        }
    }
}

impl SweepConfig {
    pub fn to_sweep(&self) -> Sweep {
        let fixed = self.fixed * PI;
        Sweep {
            path: match self.path {
                PathKind::Meridian => SweepPath::Meridian { theta: fixed },
                PathKind::Parallel => SweepPath::Parallel { phi: fixed },
            },
            start: self.start * PI,
            end: self.end * PI,
            steps: self.steps,
            divisions: self.divisions,
            coloring: match self.color {
                Some([r, g, b]) => BandColoring::Uniform(Color::new(r, g, b)),
                None => BandColoring::PerFiber,
            },
            wrap: self.wrap,
            closed_strips: self.closed_strips,
        }
    }
}

impl ViewerConfig {
    pub fn initial_point(&self) -> SpherePoint {
        let [x, y, z] = self.initial_point;
        SpherePoint::new(x, y, z).normalized()
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn sweeps(&self) -> Vec<Sweep> {
        match &self.sweeps {
            Some(sweeps) => sweeps.iter().map(SweepConfig::to_sweep).collect(),
            None => default_sweeps(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.divisions == 0 {
            return Err(ConfigError::Invalid("divisions must be at least 1".into()));
        }
        if !(1..=120).contains(&self.fps) {
            return Err(ConfigError::Invalid(format!("fps must be in 1..=120, got {}", self.fps)));
        }
        let [x, y, z] = self.initial_point;
        let norm = (x * x + y * y + z * z).sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(ConfigError::Invalid("initial_point must be a non-zero finite vector".into()));
        }
        if !(self.cursor_step.is_finite() && self.cursor_step > 0.0) {
            return Err(ConfigError::Invalid("cursor_step must be positive".into()));
        }

        for (i, sweep) in self.sweeps.iter().flatten().enumerate() {
            if sweep.steps < 2 {
                return Err(ConfigError::Invalid(format!("sweeps[{i}]: steps must be at least 2")));
            }
            if sweep.divisions == 0 {
                return Err(ConfigError::Invalid(format!("sweeps[{i}]: divisions must be at least 1")));
            }
            if sweep.closed_strips && sweep.divisions < 3 {
                return Err(ConfigError::Invalid(format!(
                    "sweeps[{i}]: closed strips need at least 3 divisions"
                )));
            }
            if ![sweep.fixed, sweep.start, sweep.end].iter().all(|v| v.is_finite()) {
                return Err(ConfigError::Invalid(format!("sweeps[{i}]: angles must be finite")));
            }
        }
        Ok(())
    }
}

/// Parse and validate a config from TOML text.
pub fn parse(content: &str) -> Result<ViewerConfig, ConfigError> {
    let config: ViewerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a specific TOML file path.
pub fn load_from_path(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse(&content)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load from `path` if given, otherwise use defaults.
pub fn load(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => Ok(ViewerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.sweeps(), default_sweeps());
        assert_eq!(config.initial_point(), SpherePoint::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn sweeps_from_toml() {
        let config = parse(
            r#"
            divisions = 64
            initial_point = [0.0, 0.0, 2.0]

            [[sweeps]]
            path = "parallel"
            fixed = 0.5
            start = 0.0
            end = 2.0
            steps = 12
            wrap = true

            [[sweeps]]
            fixed = 0.25
            color = [1.0, 0.5, 0.0]
            closed_strips = true
            "#,
        )
        .unwrap();

        assert_eq!(config.divisions, 64);
        assert_eq!(config.initial_point(), SpherePoint::new(0.0, 0.0, 1.0));

        let sweeps = config.sweeps();
        assert_eq!(sweeps.len(), 2);
        assert_eq!(sweeps[0].path, SweepPath::Parallel { phi: PI * 0.5 });
        assert_eq!(sweeps[0].end, 2.0 * PI);
        assert_eq!(sweeps[0].steps, 12);
        assert_eq!(sweeps[0].coloring, BandColoring::PerFiber);
        assert!(sweeps[0].wrap);

        assert_eq!(sweeps[1].path, SweepPath::Meridian { theta: PI * 0.25 });
        assert_eq!(sweeps[1].steps, 40);
        assert_eq!(sweeps[1].coloring, BandColoring::Uniform(Color::new(1.0, 0.5, 0.0)));
        assert!(sweeps[1].closed_strips);
    }

    #[test]
    fn empty_sweep_list_disables_sweeps() {
        let config = parse("sweeps = []").unwrap();
        assert!(config.sweeps().is_empty());
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(parse("divisions = 0"), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse("fps = 0"), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse("initial_point = [0.0, 0.0, 0.0]"), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            parse("[[sweeps]]\nsteps = 1"),
            Err(ConfigError::Invalid(msg)) if msg.contains("sweeps[0]")
        ));
        assert!(matches!(parse("divisions = \"many\""), Err(ConfigError::Parse(_))));
        assert!(matches!(
            parse("[[sweeps]]\ndivisions = 2\nclosed_strips = true"),
            Err(ConfigError::Invalid(msg)) if msg.contains("3 divisions")
        ));
    }

    #[test]
    fn load_missing_file() {
        let err = load_from_path(Path::new("/nonexistent/hopf.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
        assert_eq!(err.to_string(), "config file not found: /nonexistent/hopf.toml");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = 24\ncursor_step = 0.125").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.fps, 24);
        assert_eq!(config.cursor_step, 0.125);
        assert_eq!(config.divisions, ViewerConfig::default().divisions);
    }

    #[test]
    fn toml_round_trip_with_sweeps() {
        let mut config = ViewerConfig::default();
        config.sweeps = Some(vec![SweepConfig::default(), SweepConfig {
            path: PathKind::Parallel,
            color: Some([0.25, 0.5, 1.0]),
            ..SweepConfig::default()
        }]);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[[sweeps]]"));
        assert_eq!(parse(&text).unwrap(), config);
    }

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(load(None).unwrap(), ViewerConfig::default());
    }
}
