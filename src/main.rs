// A 3D floor-plan editor made with the Bevy game engine.

use anyhow::Result;
use clap::Parser;

use maquette::core::cli::CliArgs;
use maquette::core::create_app;
use maquette::logger::init_custom_logger;

fn main() -> Result<()> {
    init_custom_logger();
    let cli_args = CliArgs::parse();
    let mut app = create_app(cli_args)?;
    app.run();
    Ok(())
}
