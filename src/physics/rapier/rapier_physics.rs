use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::config::GameConfig;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .add_systems(Update, sync_gravity);
        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|cfg| cfg.rapier_debug);
        if debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

// Runs every frame: the Rapier context is created after startup and gravity may be hot-reloaded.
fn sync_gravity(cfg: Res<GameConfig>, mut contexts: Query<&mut RapierConfiguration>) {
    let gravity = Vec3::new(0.0, cfg.gravity.y, 0.0);
    for mut rc in contexts.iter_mut() {
        if rc.gravity != gravity {
            rc.gravity = gravity;
        }
    }
}
