//! Debug module: periodic session logging.
//! Systems are only registered when compiled with `--features debug`.

mod logging;

use bevy::prelude::*;

use crate::core::config::GameConfig;
#[cfg(feature = "debug")]
use crate::core::system::system_order::PresentationSet;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DebugState {
    pub frame_counter: u64,
    pub time_accum: f32,
    pub log_interval: f32,
}
impl Default for DebugState {
    fn default() -> Self {
        Self {
            frame_counter: 0,
            time_accum: 0.0,
            log_interval: 2.0,
        }
    }
}

pub struct DebugPlugin;
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        let interval = app
            .world()
            .get_resource::<GameConfig>()
            .map(|cfg| cfg.debug_log_interval.max(0.1))
            .unwrap_or(2.0);
        app.insert_resource(DebugState {
            log_interval: interval,
            ..default()
        });
        #[cfg(feature = "debug")]
        app.add_systems(
            Update,
            logging::session_logging_system.in_set(PresentationSet),
        );
    }
}
