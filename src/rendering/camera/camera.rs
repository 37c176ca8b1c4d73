use bevy::prelude::*;

use crate::core::components::ArCamera;
use crate::core::config::{CameraConfig, GameConfig};

const MAX_PITCH: f32 = 1.4;

/// Spawns the camera standing in for the tracked device, plus scene lighting.
/// WASD/QE move it, arrow keys turn it.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, drive_camera_rig);
    }
}

fn setup_camera(mut commands: Commands, cfg: Res<GameConfig>) {
    let eye = Vec3::from(cfg.camera.position);
    commands.spawn((
        Name::new("ArCamera"),
        Camera3d::default(),
        ArCamera,
        Transform::from_translation(eye).looking_at(cfg.camera.look_at.into(), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
}

/// Per-frame rig intent. `translate` is (right, up, forward); yaw/pitch are -1..1.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RigInput {
    pub translate: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl RigInput {
    pub fn from_keys(keys: &ButtonInput<KeyCode>) -> Self {
        let axis = |pos: KeyCode, neg: KeyCode| {
            (keys.pressed(pos) as i32 - keys.pressed(neg) as i32) as f32
        };
        Self {
            translate: Vec3::new(
                axis(KeyCode::KeyD, KeyCode::KeyA),
                axis(KeyCode::KeyE, KeyCode::KeyQ),
                axis(KeyCode::KeyW, KeyCode::KeyS),
            ),
            yaw: axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
            pitch: axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.translate == Vec3::ZERO && self.yaw == 0.0 && self.pitch == 0.0
    }
}

/// Turn, then walk along the ground plane (pitch doesn't change walking height).
pub fn apply_rig_input(tf: &mut Transform, input: RigInput, cfg: &CameraConfig, dt: f32) {
    let (yaw, pitch, _) = tf.rotation.to_euler(EulerRot::YXZ);
    let yaw = yaw + input.yaw * cfg.turn_speed * dt;
    let pitch = (pitch + input.pitch * cfg.turn_speed * dt).clamp(-MAX_PITCH, MAX_PITCH);
    tf.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);

    let fwd = tf.forward();
    let right = tf.right();
    let flat_fwd = Vec3::new(fwd.x, 0.0, fwd.z).normalize_or_zero();
    let flat_right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
    let step = flat_right * input.translate.x
        + Vec3::Y * input.translate.y
        + flat_fwd * input.translate.z;
    tf.translation += step * cfg.move_speed * dt;
}

fn drive_camera_rig(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    cfg: Res<GameConfig>,
    mut q: Query<&mut Transform, With<ArCamera>>,
) {
    let Some(keys) = keys else {
        return;
    };
    let input = RigInput::from_keys(&keys);
    if input.is_idle() {
        return;
    }
    for mut tf in q.iter_mut() {
        apply_rig_input(&mut tf, input, &cfg.camera, time.delta_secs());
    }
}
