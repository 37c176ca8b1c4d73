use bevy::prelude::*;

use crate::tracking::engine::PlaneAnchorId;

/// Marker for a launched ball (also carries `Name("Basketball")` for tag lookups).
#[derive(Component, Debug)]
pub struct Basketball;

/// Root entity of the placed hoop; children hold the pole, board and rim colliders.
#[derive(Component, Debug)]
pub struct Hoop;

/// Horizontal surface reported by the tracker, in world space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DetectedPlane {
    pub anchor: PlaneAnchorId,
    pub center: Vec3,
    pub half_extents: Vec2,
}

/// The "plane detected" status text.
#[derive(Component)]
pub struct PlaneLabel;

/// Bottom hint / power readout text.
#[derive(Component)]
pub struct ChargeReadout;

/// The camera whose pose stands in for the tracked device.
#[derive(Component, Debug)]
pub struct ArCamera;
