// This file is part of Hoop Shot.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Engine-agnostic interaction controller.
//!
//! Owns the session (hoop phase, charge level, pending timers) and turns taps,
//! presses and releases into calls on a [`TrackingEngine`] and a [`SceneEngine`].
//! All delayed work is held as cancellable `Option<Timer>` handles advanced by
//! [`InteractionController::tick`], so the whole thing runs on one event loop.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::error::EngineError;
use crate::tracking::engine::{
    BallSpec, PlaneAnchorId, SceneEngine, TrackingConfig, TrackingEngine, BALL_TAG,
};

const MIN_TICK_SECS: f32 = 0.001;

// Microsecond resolution keeps 0.05s at exactly 50ms; from_secs_f32 lands 1ns past it.
fn timer_secs(secs: f32, mode: TimerMode) -> Timer {
    let micros = (secs.max(0.0) * 1_000_000.0).round() as u64;
    Timer::new(Duration::from_micros(micros), mode)
}

/// Tunables copied out of [`GameConfig`]; refreshed on config hot reload.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub horizontal_planes: bool,
    pub baseline: f32,
    pub reset_value: f32,
    pub increment: f32,
    pub tick_secs: f32,
    pub max_charge: f32,
    pub settle_secs: f32,
    pub label_secs: f32,
    pub ball_radius: f32,
    pub restitution: f32,
    pub ball_mass: f32,
    pub spawn_offset: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl ControllerSettings {
    pub fn from_config(cfg: &GameConfig) -> Self {
        Self {
            horizontal_planes: cfg.tracking.horizontal,
            baseline: cfg.charge.baseline,
            reset_value: cfg.charge.reset_value,
            increment: cfg.charge.increment,
            tick_secs: cfg.charge.tick_secs,
            max_charge: cfg.charge.max,
            settle_secs: cfg.hoop.settle_secs,
            label_secs: cfg.label.visible_secs,
            ball_radius: cfg.ball.radius,
            restitution: cfg.ball.restitution,
            ball_mass: cfg.ball.mass,
            spawn_offset: cfg.ball.spawn_offset,
        }
    }
}

/// `NoHoop -> Settling -> Ready`; never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoopPhase {
    #[default]
    NoHoop,
    Settling,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    NoHit,
    HoopPlaced(Vec3),
    /// A hoop already exists (settling or ready); taps never move it.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaunchOutcome {
    Launched { spec: BallSpec, removed: usize },
    HoopNotReady,
    NoCameraPose,
}

#[derive(Debug)]
pub struct SessionState {
    pub phase: HoopPhase,
    pub charge_level: f32,
    pub plane_label_visible: bool,
    pub tracking_started: bool,
    pub launches: u32,
    charge_timer: Option<Timer>,
    settle_timer: Option<Timer>,
    label_timer: Option<Timer>,
}

impl SessionState {
    fn new(baseline: f32) -> Self {
        Self {
            phase: HoopPhase::NoHoop,
            charge_level: baseline,
            plane_label_visible: false,
            tracking_started: false,
            launches: 0,
            charge_timer: None,
            settle_timer: None,
            label_timer: None,
        }
    }
}

#[derive(Resource, Debug)]
pub struct InteractionController {
    settings: ControllerSettings,
    session: SessionState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl InteractionController {
    pub fn new(settings: ControllerSettings) -> Self {
        let session = SessionState::new(settings.baseline);
        Self { settings, session }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Swap tunables mid-session. Running timers keep their current period.
    pub fn apply_settings(&mut self, settings: ControllerSettings) {
        self.settings = settings;
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> HoopPhase {
        self.session.phase
    }

    pub fn hoop_placed(&self) -> bool {
        self.session.phase == HoopPhase::Ready
    }

    pub fn charge_level(&self) -> f32 {
        self.session.charge_level
    }

    pub fn is_charging(&self) -> bool {
        self.session.charge_timer.is_some()
    }

    pub fn plane_label_visible(&self) -> bool {
        self.session.plane_label_visible
    }

    pub fn launches(&self) -> u32 {
        self.session.launches
    }

    pub fn start_tracking(
        &mut self,
        tracking: &mut impl TrackingEngine,
    ) -> Result<(), EngineError> {
        tracking.start(&TrackingConfig {
            horizontal_planes: self.settings.horizontal_planes,
        })?;
        self.session.tracking_started = true;
        info!(target: "controller", "tracking started (horizontal planes)");
        Ok(())
    }

    /// Show the status label and (re)arm its hide timer. Repeated detections
    /// extend the visible window instead of stacking independent hides.
    pub fn on_plane_detected(&mut self, anchor: PlaneAnchorId) {
        debug!(target: "controller", anchor = anchor.0, "plane label shown");
        self.session.plane_label_visible = true;
        self.session.label_timer = Some(timer_secs(self.settings.label_secs, TimerMode::Once));
    }

    pub fn on_tap(
        &mut self,
        screen_point: Vec2,
        tracking: &impl TrackingEngine,
        scene: &mut impl SceneEngine,
    ) -> Result<TapOutcome, EngineError> {
        if self.session.phase != HoopPhase::NoHoop {
            return Ok(TapOutcome::Ignored);
        }
        let Some(hit) = tracking.hit_test(screen_point).into_iter().next() else {
            debug!(target: "controller", "tap at {screen_point} hit no plane");
            return Ok(TapOutcome::NoHit);
        };
        scene.place_hoop(hit.world_position)?;
        self.session.phase = HoopPhase::Settling;
        self.session.settle_timer = Some(timer_secs(self.settings.settle_secs, TimerMode::Once));
        info!(
            target: "controller",
            anchor = hit.anchor.0,
            "hoop placed at {}", hit.world_position
        );
        Ok(TapOutcome::HoopPlaced(hit.world_position))
    }

    /// Begin charging. Returns whether a charge timer is running afterwards.
    /// Calling again while already charging keeps the existing timer.
    pub fn on_press_start(&mut self) -> bool {
        if !self.hoop_placed() {
            return false;
        }
        if self.session.charge_timer.is_none() {
            self.session.charge_timer = Some(timer_secs(
                self.settings.tick_secs.max(MIN_TICK_SECS),
                TimerMode::Repeating,
            ));
        }
        true
    }

    /// Stop charging and shoot with the accumulated charge, then reset the charge
    /// to `reset_value` whether or not a shot happened.
    pub fn on_press_end(
        &mut self,
        tracking: &impl TrackingEngine,
        scene: &mut impl SceneEngine,
    ) -> Option<LaunchOutcome> {
        let outcome = if self.hoop_placed() {
            self.session.charge_timer = None;
            match self.launch(tracking, scene) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(target: "controller", "launch failed: {e}");
                    None
                }
            }
        } else {
            None
        };
        self.session.charge_level = self.settings.reset_value;
        outcome
    }

    pub fn launch(
        &mut self,
        tracking: &impl TrackingEngine,
        scene: &mut impl SceneEngine,
    ) -> Result<LaunchOutcome, EngineError> {
        if !self.hoop_placed() {
            return Ok(LaunchOutcome::HoopNotReady);
        }
        let Some(pose) = tracking.camera_pose() else {
            debug!(target: "controller", "launch skipped: no camera pose");
            return Ok(LaunchOutcome::NoCameraPose);
        };
        let removed = scene.remove_tagged(BALL_TAG);
        let forward = pose.forward.normalize_or_zero();
        let spec = BallSpec {
            position: pose.position + forward * self.settings.spawn_offset,
            impulse: forward * self.session.charge_level,
            radius: self.settings.ball_radius,
            restitution: self.settings.restitution,
            mass: self.settings.ball_mass,
        };
        scene.spawn_ball(spec)?;
        self.session.launches += 1;
        info!(
            target: "controller",
            charge = self.session.charge_level,
            removed,
            "ball launched"
        );
        Ok(LaunchOutcome::Launched { spec, removed })
    }

    /// Advance pending timers by `delta`. Each elapsed charge period adds one
    /// increment, so a long frame can add several.
    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.session.settle_timer.as_mut() {
            timer.tick(delta);
            if timer.finished() {
                self.session.settle_timer = None;
                self.session.phase = HoopPhase::Ready;
                info!(target: "controller", "hoop ready");
            }
        }
        if let Some(timer) = self.session.charge_timer.as_mut() {
            timer.tick(delta);
            let ticks = timer.times_finished_this_tick();
            for _ in 0..ticks {
                self.session.charge_level = (self.session.charge_level
                    + self.settings.increment)
                    .min(self.settings.max_charge);
            }
        }
        if let Some(timer) = self.session.label_timer.as_mut() {
            timer.tick(delta);
            if timer.finished() {
                self.session.label_timer = None;
                self.session.plane_label_visible = false;
            }
        }
    }

    /// Cancel every pending timer and release the tracker.
    pub fn teardown(&mut self, tracking: &mut impl TrackingEngine) {
        self.session.charge_timer = None;
        self.session.settle_timer = None;
        self.session.label_timer = None;
        if self.session.tracking_started {
            tracking.stop();
            self.session.tracking_started = false;
        }
        info!(target: "controller", launches = self.session.launches, "session torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut cfg = GameConfig::default();
        cfg.charge.increment = 3.0;
        cfg.hoop.settle_secs = 0.5;
        let s = ControllerSettings::from_config(&cfg);
        assert_eq!(s.increment, 3.0);
        assert_eq!(s.settle_secs, 0.5);
        assert_eq!(s.restitution, 0.2);
    }

    #[test]
    fn starts_at_baseline_without_hoop() {
        let c = InteractionController::default();
        assert_eq!(c.phase(), HoopPhase::NoHoop);
        assert!(!c.hoop_placed());
        assert_eq!(c.charge_level(), 0.5);
        assert!(!c.plane_label_visible());
    }

    #[test]
    fn label_hides_after_visible_window() {
        let mut c = InteractionController::default();
        c.on_plane_detected(PlaneAnchorId(0));
        assert!(c.plane_label_visible());
        c.tick(Duration::from_millis(2900));
        assert!(c.plane_label_visible());
        c.tick(Duration::from_millis(200));
        assert!(!c.plane_label_visible());
    }

    #[test]
    fn repeated_detection_extends_label() {
        let mut c = InteractionController::default();
        c.on_plane_detected(PlaneAnchorId(0));
        c.tick(Duration::from_millis(2000));
        c.on_plane_detected(PlaneAnchorId(1));
        c.tick(Duration::from_millis(2000));
        assert!(c.plane_label_visible(), "second detection restarts the window");
        c.tick(Duration::from_millis(1100));
        assert!(!c.plane_label_visible());
    }

    #[test]
    fn press_ignored_before_hoop() {
        let mut c = InteractionController::default();
        assert!(!c.on_press_start());
        assert!(!c.is_charging());
        c.tick(Duration::from_secs(1));
        assert_eq!(c.charge_level(), 0.5);
    }
}
