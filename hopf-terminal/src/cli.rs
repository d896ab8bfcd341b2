use clap::Parser;
use hopf_core::SpherePoint;
use std::path::PathBuf;

/// Terminal viewer for the Hopf fibration.
#[derive(Parser, Debug)]
#[command(name = "hopf-terminal", version, about)]
pub struct Args {
    /// Config file path.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Divisions of the selected fiber, overriding the config.
    #[arg(long)]
    pub divisions: Option<usize>,

    /// Initial base point as `x,y,z`; normalized onto the sphere.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub point: Option<SpherePoint>,

    /// Skip building sweep surfaces.
    #[arg(long)]
    pub no_sweeps: bool,

    /// Render one frame as plain text to stdout and exit.
    #[arg(long)]
    pub snapshot: bool,

    /// Snapshot width in characters.
    #[arg(long, default_value_t = 100)]
    pub width: u16,

    /// Snapshot height in characters.
    #[arg(long, default_value_t = 40)]
    pub height: u16,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Log filter override (e.g. `debug`, `hopf_core=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Parse `x,y,z` into a unit sphere point.
pub fn parse_point(s: &str) -> Result<SpherePoint, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in {s:?}: {e}"))?;

    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected three comma-separated coordinates, got {s:?}"));
    };

    let point = SpherePoint::new(x, y, z);
    let norm = point.norm();
    if !norm.is_finite() || norm == 0.0 {
        return Err(format!("point {s:?} cannot be normalized"));
    }
    Ok(point.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_is_normalized() {
        let p = parse_point("0, 3, -4").unwrap();
        assert!((p.y - 0.6).abs() < 1e-12);
        assert!((p.z + 0.8).abs() < 1e-12);
    }

    #[test]
    fn bad_points_rejected() {
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,2,3,4").is_err());
        assert!(parse_point("a,b,c").is_err());
        assert!(parse_point("0,0,0").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "hopf-terminal",
            "--point",
            "-1,0,0",
            "--snapshot",
            "--width",
            "60",
            "--no-sweeps",
        ])
        .unwrap();
        assert_eq!(args.point, Some(SpherePoint::new(-1.0, 0.0, 0.0)));
        assert!(args.snapshot);
        assert!(args.no_sweeps);
        assert_eq!(args.width, 60);
        assert_eq!(args.height, 40);
    }
}
