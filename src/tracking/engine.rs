//! Contracts between the interaction controller and the engines it drives.
//! The controller only talks to these traits; `tracking::planes` and `scene::spawn`
//! provide the Bevy implementations, tests provide in-memory fakes.
use bevy::prelude::*;

use crate::core::error::EngineError;

/// Name every launched ball carries; `SceneEngine::remove_tagged` matches on it.
pub const BALL_TAG: &str = "Basketball";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneAnchorId(pub u32);

/// Static configuration handed to `TrackingEngine::start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingConfig {
    pub horizontal_planes: bool,
}
impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            horizontal_planes: true,
        }
    }
}

/// One ray/plane intersection; hit-tests return these nearest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub anchor: PlaneAnchorId,
    pub world_position: Vec3,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Unit length.
    pub forward: Vec3,
}

/// Everything the scene engine needs to create one ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpec {
    pub position: Vec3,
    pub impulse: Vec3,
    pub radius: f32,
    pub restitution: f32,
    pub mass: f32,
}

pub trait TrackingEngine {
    fn start(&mut self, config: &TrackingConfig) -> Result<(), EngineError>;
    fn stop(&mut self);
    /// Intersections against detected plane geometry, ranked nearest first.
    fn hit_test(&self, screen_point: Vec2) -> Vec<HitResult>;
    fn camera_pose(&self) -> Option<CameraPose>;
}

pub trait SceneEngine {
    /// Instantiate the hoop at `position` as a static body.
    fn place_hoop(&mut self, position: Vec3) -> Result<(), EngineError>;
    /// Instantiate a dynamic ball and apply its impulse.
    fn spawn_ball(&mut self, spec: BallSpec) -> Result<(), EngineError>;
    /// Remove every node named `tag`; returns how many were removed.
    fn remove_tagged(&mut self, tag: &str) -> usize;
}
