/// Example: Place tori for the fibers over a circle of latitude and print
/// one frame.
///
/// Usage: cargo run --example circle_of_tori -- [polar angle in multiples of π]
use std::env;
use std::f64::consts::PI;
use std::io;

use hopf_core::{SceneState, SweepPath};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fraction = match env::args().nth(1) {
        Some(arg) => arg.parse::<f64>()?,
        None => 0.6,
    };

    let mut scene = SceneState::new(128)?;
    let placed = scene.add_circle(SweepPath::Parallel { phi: fraction * PI }, 0.0, 2.0 * PI, 24)?;
    println!("placed {placed} tori over the parallel at {fraction}π");

    hopf_terminal::snapshot(scene, 100, 40, &mut io::stdout().lock())?;
    Ok(())
}
