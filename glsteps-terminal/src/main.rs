/// glsteps Terminal Demo - the tutorial scenes rendered as ASCII
///
/// Controls:
///   - 1-5: Triangle, Rectangle, Cube, Many Cubes, Camera
///   - WASD / Arrow Keys: Orbit the camera (Camera scene)
///   - P: Pause the animation clock
///   - Q/ESC: Quit
use anyhow::{anyhow, Context};
use clap::Parser;
use glsteps_terminal::logging::{init_logging, LoggingConfig};
use glsteps_terminal::{Cli, TerminalApp};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.validate().map_err(|msg| anyhow!(msg))?;

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    log::info!("starting glsteps terminal renderer with scene '{}'", cli.scene);

    let mut app = TerminalApp::new(&cli).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    log::info!("glsteps terminal renderer exited cleanly");
    Ok(())
}
