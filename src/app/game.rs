// This file is part of Hoop Shot.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::system::system_order::{InteractionSet, PresentationSet, TrackingSet};
use crate::debug::DebugPlugin;
use crate::interaction::input::pointer::PointerInputPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::interaction::session::lifecycle::ControllerLifecyclePlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;
use crate::rendering::hud::hud::HudPlugin;
use crate::scene::spawn::ScenePlugin;
use crate::tracking::planes::TrackingPlugin;

/// Everything except windowing/rendering defaults. Expects `GameConfig` and
/// `HoopModel` resources to be inserted before it is added.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                TrackingSet,
                InteractionSet.after(TrackingSet),
                PresentationSet.after(InteractionSet),
            ),
        )
        .add_plugins((
            CameraPlugin,
            PhysicsSetupPlugin,
            TrackingPlugin,
            ScenePlugin,
            ControllerLifecyclePlugin,
            PointerInputPlugin,
            HudPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ));
    }
}
