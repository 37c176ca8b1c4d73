#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use super::DebugState;
#[cfg(feature = "debug")]
use crate::core::components::Basketball;
#[cfg(feature = "debug")]
use crate::interaction::controller::InteractionController;
#[cfg(feature = "debug")]
use crate::tracking::planes::TrackingSession;

#[cfg(feature = "debug")]
pub fn session_logging_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    controller: Res<InteractionController>,
    tracking: Res<TrackingSession>,
    balls: Query<(), With<Basketball>>,
) {
    state.frame_counter += 1;
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!(
            "SESSION frame={} t={:.3}s phase={:?} charge={:.2} charging={} planes={} balls={} \
             launches={} label={}",
            state.frame_counter,
            time.elapsed_secs(),
            controller.phase(),
            controller.charge_level(),
            controller.is_charging(),
            tracking.detected_count(),
            balls.iter().count(),
            controller.launches(),
            controller.plane_label_visible()
        );
    }
}
