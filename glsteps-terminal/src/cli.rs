use clap::Parser;
use std::time::Duration;

use glsteps_core::Tutorial;

#[derive(Parser, Debug)]
#[command(
    name = "glsteps-terminal",
    about = "Runs the glsteps tutorial scenes in the terminal",
    long_about = "Rasterizes the triangle, rectangle, cube, many-cubes and orbit camera \
                  tutorials to ASCII using the glsteps transform library"
)]
pub struct Cli {
    /// Tutorial to start with: triangle, rectangle, cube, many-cubes, camera
    #[arg(short = 's', long, default_value = "many-cubes", value_name = "SCENE")]
    pub scene: Tutorial,

    /// Target frames per second
    #[arg(
        short = 'f',
        long,
        default_value = "30",
        value_name = "FPS",
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    pub fps: u32,

    /// Width over height of one terminal cell
    #[arg(long, default_value = "0.5", value_name = "RATIO")]
    pub cell_aspect: f32,

    /// Log filter in env_logger syntax; overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Cli {
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    /// Rejects values clap cannot range-check itself
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cell_aspect.is_finite() && self.cell_aspect > 0.0) {
            return Err(format!(
                "cell aspect must be a positive number, got {}",
                self.cell_aspect
            ));
        }
        Ok(())
    }
}
