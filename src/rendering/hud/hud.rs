use bevy::prelude::*;

use crate::core::components::{ChargeReadout, PlaneLabel};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PresentationSet;
use crate::interaction::controller::{HoopPhase, InteractionController};
use crate::tracking::planes::TrackingSession;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, sync_hud.in_set(PresentationSet));
    }
}

fn spawn_hud(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((
        Text::new(cfg.label.text.clone()),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::srgb(0.45, 1.0, 0.55)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
        Visibility::Hidden,
        PlaneLabel,
    ));
    commands.spawn((
        Text::new(String::new()),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
        ChargeReadout,
    ));
}

/// Bottom-line hint for the current session state.
pub fn hint_text(phase: HoopPhase, planes: usize, charging: bool, charge: f32) -> String {
    match phase {
        HoopPhase::NoHoop if planes == 0 => "Scanning for surfaces...".into(),
        HoopPhase::NoHoop => "Tap a surface to place the hoop".into(),
        HoopPhase::Settling => "Placing hoop...".into(),
        HoopPhase::Ready if charging => format!("Power {charge:.1}"),
        HoopPhase::Ready => "Hold to charge, release to shoot".into(),
    }
}

fn sync_hud(
    controller: Res<InteractionController>,
    tracking: Res<TrackingSession>,
    mut labels: Query<&mut Visibility, With<PlaneLabel>>,
    mut readouts: Query<&mut Text, With<ChargeReadout>>,
) {
    let vis = if controller.plane_label_visible() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut v in labels.iter_mut() {
        v.set_if_neq(vis);
    }
    let hint = hint_text(
        controller.phase(),
        tracking.detected_count(),
        controller.is_charging(),
        controller.charge_level(),
    );
    for mut text in readouts.iter_mut() {
        if text.0 != hint {
            text.0 = hint.clone();
        }
    }
}
