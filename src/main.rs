use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;

use hoop_shot::interaction::session::config_hot_reload::ConfigReloadSettings;
use hoop_shot::{load_hoop_model, GameConfig, GamePlugin};

#[derive(Parser, Debug)]
#[command(name = "hoop_shot", about = "Place a hoop on a detected surface and shoot")]
struct Args {
    /// Config layers, merged in order (later files override earlier keys).
    #[arg(
        long = "config",
        default_values = ["assets/config/game.ron", "assets/config/game.local.ron"]
    )]
    configs: Vec<PathBuf>,
    /// Exit after this many seconds (overrides window.autoClose).
    #[arg(long)]
    auto_close: Option<f32>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // Optional overlays are simply skipped when absent.
    let layers: Vec<&PathBuf> = args.configs.iter().filter(|p| p.exists()).collect();
    let (mut cfg, used, errors) = GameConfig::load_layered(layers);
    if let Some(secs) = args.auto_close {
        cfg.window.auto_close = secs;
    }

    // A missing or broken hoop model is unrecoverable; fail before opening a window.
    let model = load_hoop_model(&cfg.hoop.bundle_path, &cfg.hoop.object_name)
        .with_context(|| format!("loading hoop object '{}'", cfg.hoop.object_name))?;

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: cfg.window.title.clone(),
            resolution: (cfg.window.width, cfg.window.height).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }));

    if used.is_empty() {
        warn!("CONFIG: no config files found, using defaults");
    } else {
        info!("CONFIG: layers used {used:?}");
    }
    for e in errors {
        warn!("CONFIG: {e}");
    }
    for w in cfg.validate() {
        warn!("CONFIG: {w}");
    }
    if let Some(w) = model.clearance_warning(cfg.ball.radius) {
        warn!("MODEL: {w}");
    }

    app.insert_resource(ConfigReloadSettings {
        paths: args.configs.clone(),
        auto_close_override: args.auto_close,
        ..default()
    })
    .insert_resource(cfg)
    .insert_resource(model)
    .add_plugins(GamePlugin)
    .run();
    Ok(())
}
