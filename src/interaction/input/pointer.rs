use bevy::prelude::*;

use crate::core::config::{GameConfig, PointerConfig};
use crate::core::system::system_order::InteractionSet;
use crate::interaction::controller::{InteractionController, TapOutcome};
use crate::interaction::session::lifecycle::tick_controller;
use crate::scene::spawn::BevyScene;
use crate::tracking::planes::SimulatedTracking;

pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerGesture>()
            .add_systems(
                Update,
                drive_pointer.in_set(InteractionSet).after(tick_controller),
            );
    }
}

/// Mouse-left / first-touch gesture in progress. A short, still release also
/// counts as a tap in addition to ending the press.
#[derive(Resource, Default, Debug)]
pub struct PointerGesture {
    pub down: bool,
    pub start: Vec2,
    pub last: Vec2,
    pub held_secs: f32,
    pub max_moved: f32,
}

impl PointerGesture {
    pub fn press(&mut self, pos: Vec2) {
        *self = Self {
            down: true,
            start: pos,
            last: pos,
            held_secs: 0.0,
            max_moved: 0.0,
        };
    }

    pub fn track(&mut self, pos: Option<Vec2>, dt: f32) {
        if !self.down {
            return;
        }
        self.held_secs += dt;
        if let Some(p) = pos {
            self.last = p;
            self.max_moved = self.max_moved.max(p.distance(self.start));
        }
    }

    /// Ends the gesture; `Some(point)` when it qualifies as a tap.
    pub fn release(&mut self, cfg: &PointerConfig) -> Option<Vec2> {
        if !self.down {
            return None;
        }
        self.down = false;
        let is_tap = self.held_secs <= cfg.tap_max_time && self.max_moved <= cfg.tap_max_move;
        is_tap.then_some(self.last)
    }
}

fn pointer_position(window: Option<&Window>, touches: &Touches) -> Option<Vec2> {
    if let Some(touch) = touches.iter().next() {
        return Some(touch.position());
    }
    if let Some(touch) = touches.iter_just_released().next() {
        return Some(touch.position());
    }
    window?.cursor_position()
}

fn drive_pointer(
    time: Res<Time>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows_q: Query<&Window>,
    cfg: Res<GameConfig>,
    mut gesture: ResMut<PointerGesture>,
    mut controller: ResMut<InteractionController>,
    tracking: SimulatedTracking,
    mut scene: BevyScene,
) {
    let pressed =
        buttons.just_pressed(MouseButton::Left) || touches.iter_just_pressed().next().is_some();
    let released =
        buttons.just_released(MouseButton::Left) || touches.iter_just_released().next().is_some();
    let pos = pointer_position(windows_q.single().ok(), &touches);

    if pressed {
        gesture.press(pos.unwrap_or_default());
        controller.on_press_start();
    }
    gesture.track(pos, time.delta_secs());
    if !released {
        return;
    }
    // Tap is delivered before the release, the same as a recognizer that
    // doesn't cancel the underlying touch.
    if let Some(tap_at) = gesture.release(&cfg.pointer) {
        match controller.on_tap(tap_at, &tracking, &mut scene) {
            Ok(TapOutcome::HoopPlaced(at)) => debug!("tap placed hoop at {at}"),
            Ok(_) => {}
            Err(e) => warn!("hoop placement failed: {e}"),
        }
    }
    controller.on_press_end(&tracking, &mut scene);
}
