//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. Tracking (plane discovery, detection events)
//! 2. Interaction (timers, pointer gestures -> controller operations)
//! 3. Rapier (handled by plugin)
//! 4. Presentation (HUD sync, debug logging)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct TrackingSet; // simulated tracker advances and reports planes

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InteractionSet; // controller timers + pointer input

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PresentationSet; // reads controller state only
