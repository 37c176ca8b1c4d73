use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::system::system_order::{InteractionSet, TrackingSet};
use crate::interaction::controller::{ControllerSettings, InteractionController};
use crate::tracking::planes::{PlaneDetected, SimulatedTracking};

/// Owns the controller resource and wires it to the frame loop:
/// start tracking on startup, forward detections, advance timers, tear down on Escape.
pub struct ControllerLifecyclePlugin;

impl Plugin for ControllerLifecyclePlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<GameConfig>()
            .map(ControllerSettings::from_config)
            .unwrap_or_default();
        app.insert_resource(InteractionController::new(settings))
            .configure_sets(Update, InteractionSet.after(TrackingSet))
            .add_systems(Startup, start_tracking)
            .add_systems(
                Update,
                (forward_plane_detections, tick_controller, teardown_on_escape)
                    .chain()
                    .in_set(InteractionSet),
            );
    }
}

fn start_tracking(mut controller: ResMut<InteractionController>, mut tracking: SimulatedTracking) {
    if let Err(e) = controller.start_tracking(&mut tracking) {
        warn!("tracking did not start: {e}");
    }
}

fn forward_plane_detections(
    mut detected: EventReader<PlaneDetected>,
    mut controller: ResMut<InteractionController>,
) {
    for ev in detected.read() {
        controller.on_plane_detected(ev.anchor);
    }
}

/// Pointer handling runs after this, so a press never counts the frame it started in.
pub(crate) fn tick_controller(time: Res<Time>, mut controller: ResMut<InteractionController>) {
    controller.tick(time.delta());
}

fn teardown_on_escape(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut controller: ResMut<InteractionController>,
    mut tracking: SimulatedTracking,
    mut exit: EventWriter<AppExit>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::Escape) {
        controller.teardown(&mut tracking);
        exit.write(AppExit::Success);
    }
}
