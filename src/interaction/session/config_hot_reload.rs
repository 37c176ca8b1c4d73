use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::GameConfig;
use crate::interaction::controller::{ControllerSettings, InteractionController};
use crate::scene::assets::HoopModel;

/// Which files to watch. `main` replaces the defaults with the `--config` layers.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
    /// `--auto-close` from the command line; wins over reloaded files.
    pub auto_close_override: Option<f32>,
}
impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ],
            interval_secs: 0.5,
            auto_close_override: None,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}
impl Default for ConfigReloadState {
    fn default() -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

/// Polls the config files and pushes changes into the window and the controller.
/// Tracking planes and the hoop model are fixed for the session and not reapplied.
pub struct ConfigHotReloadPlugin;
impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Startup, record_initial_mtimes)
                .add_systems(Update, poll_and_reload_config);
        }
    }
}

/// Record newer modification times; true when anything changed since the last poll.
fn files_changed(paths: &[PathBuf], last_mod: &mut HashMap<PathBuf, SystemTime>) -> bool {
    use std::fs;
    use std::time::UNIX_EPOCH;
    let mut dirty = false;
    for path in paths {
        let Ok(mod_time) = fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let entry = last_mod.entry(path.clone()).or_insert(UNIX_EPOCH);
        if mod_time > *entry {
            *entry = mod_time;
            dirty = true;
        }
    }
    dirty
}

// The files were already merged at startup; only later edits count as changes.
fn record_initial_mtimes(
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
) {
    files_changed(&settings.paths, &mut state.last_mod);
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<GameConfig>,
    mut windows: Query<&mut Window>,
    mut controller: ResMut<InteractionController>,
    model: Option<Res<HoopModel>>,
) {
    if (state.timer.duration().as_secs_f32() - settings.interval_secs).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(settings.interval_secs.max(0.05)));
    }
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    if !files_changed(&settings.paths, &mut state.last_mod) {
        return;
    }
    // Optional overlays may not exist; skip them instead of reporting read errors.
    let layers = settings.paths.iter().filter(|p| p.exists());
    let (mut new_cfg, _used, errors) = GameConfig::load_layered(layers);
    if let Some(secs) = settings.auto_close_override {
        new_cfg.window.auto_close = secs;
    }
    for e in errors {
        warn!("CONFIG HOT-RELOAD issue: {e}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    for w in new_cfg.validate() {
        warn!("CONFIG: {w}");
    }
    if let Some(w) = model.and_then(|m| m.clearance_warning(new_cfg.ball.radius)) {
        warn!("MODEL: {w}");
    }
    info!("Config hot-reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window.resolution.set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    controller.apply_settings(ControllerSettings::from_config(&new_cfg));
    *cfg_res = new_cfg;
}
