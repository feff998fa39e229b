/// fly3d Terminal Demo - Spinning Quad
///
/// Controls:
///   - W/S, Up/Down, mouse wheel: Move along the heading
///   - A/D, Left/Right: Turn (yaw)
///   - E/C, PageUp/PageDown: Move up/down
///   - R/F: Pitch (only steers with --free-fly)
///   - Space / left click: Spin the quad
///   - Q/ESC: Quit
///
/// Logs go to stderr; set RUST_LOG=debug and redirect stderr to a file.
use clap::Parser;
use fly3d_terminal::{Cli, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("starting with {cli:?}");

    let mut app = TerminalApp::new(cli)?;
    app.run()?;

    println!("Thank you for using fly3d!");
    Ok(())
}
