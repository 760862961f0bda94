//! Application initialization and configuration

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use std::path::Path;

use crate::core::cli::CliArgs;
use crate::core::errors::MaquetteResult;
use crate::core::io::input::InputState;
use crate::core::io::keyboard::KeyboardPlugin;
use crate::core::io::pointer::PointerPlugin;
use crate::core::session::EditorSession;
use crate::data::assets::ModelCache;
use crate::data::{load_plan, Catalog};
use crate::editing::entity::PlanModel;
use crate::editing::selection::SelectionPlugin;
use crate::rendering::RenderingPlugin;
use crate::tools::place::ActiveFloor;
use crate::tools::ToolsPlugin;

const CATALOG_PATH: &str = "assets/catalog.json";

/// Creates a fully configured editor application ready to run.
pub fn create_app(cli_args: CliArgs) -> MaquetteResult<App> {
    let model = match &cli_args.plan_path {
        Some(path) => load_plan(path)?,
        None => PlanModel::new(),
    };

    // A missing catalog degrades to uncolored fixtures, it does not block
    // opening the editor.
    let catalog = match Catalog::load(Path::new(CATALOG_PATH)) {
        Ok(catalog) => catalog,
        Err(error) => {
            warn!("catalog unavailable, using empty lookups: {error:#}");
            Catalog::default()
        }
    };

    let mut app = App::new();
    configure_app_settings(&mut app, cli_args, model, catalog);
    add_all_plugins(&mut app);
    Ok(app)
}

/// Sets up application resources and configuration.
fn configure_app_settings(app: &mut App, cli_args: CliArgs, model: PlanModel, catalog: Catalog) {
    let floor = cli_args.floor;
    app.insert_resource(WinitSettings::desktop_app())
        .insert_resource(ClearColor(Color::srgb(0.13, 0.14, 0.16)))
        .insert_resource(EditorSession::new(model))
        .insert_resource(catalog)
        .insert_resource(ActiveFloor(floor))
        .init_resource::<InputState>()
        .init_resource::<ModelCache>()
        .insert_resource(cli_args);
}

/// Adds all plugins to the application.
fn add_all_plugins(app: &mut App) {
    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: "Maquette".into(),
            resolution: (1280., 800.).into(),
            ..default()
        }),
        ..default()
    };

    app.add_plugins(DefaultPlugins.set(window_plugin))
        .add_plugins((
            PointerPlugin,
            KeyboardPlugin,
            SelectionPlugin,
            ToolsPlugin,
            RenderingPlugin,
        ));
}
