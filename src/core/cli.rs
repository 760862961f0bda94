//! Command line arguments for the application

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

/// command line arguments for plan loading and floor selection
#[derive(Parser, Debug, Resource)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// path to a floor-plan json file to load
    #[arg(long = "load-plan", default_value = "assets/plans/demo-floor.json")]
    pub plan_path: Option<PathBuf>,

    /// which floor index to open the editor on
    #[arg(long = "floor", default_value_t = 0)]
    pub floor: u32,

    /// display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
