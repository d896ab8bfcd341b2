/// Hopf fibration viewer
///
/// Renders the fiber over a selected point of the 2-sphere, tori placed at
/// earlier selections, and swept fiber surfaces as ASCII art.
/// Controls:
///   - Arrow Keys: Move the selected point
///   - Space: Place a torus for the current fiber
///   - H: Hide / show the selected fiber
///   - C: Clear placed tori
///   - WASD / E/R: Rotate the view
///   - Q/ESC: Quit
use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

use hopf_core::SceneState;
use hopf_terminal::{cli, config, snapshot, AppError, TerminalApp, ViewerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "hopf_terminal=info,hopf_core=warn";

fn init_logging(args: &cli::Args) -> Result<(), AppError> {
    let filter = match args.log_level.as_deref() {
        Some(directive) => EnvFilter::try_new(directive).map_err(|e| AppError::Logging(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let result = match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))
}

fn effective_config(args: &cli::Args) -> Result<ViewerConfig, AppError> {
    let mut config = config::load(args.config.as_deref())?;
    if let Some(divisions) = args.divisions {
        config.divisions = divisions;
    }
    if let Some(point) = args.point {
        config.initial_point = [point.x, point.y, point.z];
    }
    if args.no_sweeps {
        config.sweeps = Some(Vec::new());
    }
    config.validate()?;
    Ok(config)
}

fn build_scene(config: &ViewerConfig) -> Result<SceneState, AppError> {
    let mut scene = SceneState::new(config.divisions)?;
    scene.update(Some(config.initial_point()))?;

    for sweep in config.sweeps() {
        let surface = scene.add_surface(&sweep)?;
        info!(bands = surface.bands.len(), triangles = surface.triangle_count(), "built sweep surface");
    }
    Ok(scene)
}

fn run() -> Result<(), AppError> {
    let args = cli::parse();
    init_logging(&args)?;

    info!("hopf-terminal v{} starting", env!("CARGO_PKG_VERSION"));

    let config = effective_config(&args)?;
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let scene = build_scene(&config)?;
    if args.snapshot {
        let mut stdout = io::stdout().lock();
        snapshot(scene, args.width, args.height, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    let mut app = TerminalApp::new(scene, &config)?;
    app.run()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
