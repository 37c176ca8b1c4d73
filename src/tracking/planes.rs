use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::core::components::{ArCamera, DetectedPlane};
use crate::core::config::{GameConfig, PlaneSeed, TrackingSettings};
use crate::core::error::EngineError;
use crate::core::system::system_order::TrackingSet;

use super::engine::{CameraPose, HitResult, PlaneAnchorId, TrackingConfig, TrackingEngine};
use super::hit_test::{ray_hits, PlaneExtent};

/// Fired once per newly detected surface.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDetected {
    pub anchor: PlaneAnchorId,
}

/// Simulated world-tracking session: reveals configured planes as time passes.
#[derive(Resource, Debug)]
pub struct TrackingSession {
    seeds: Vec<PlaneSeed>,
    detected: Vec<bool>,
    config: Option<TrackingConfig>,
    elapsed: f32,
}

impl FromWorld for TrackingSession {
    fn from_world(world: &mut World) -> Self {
        world
            .get_resource::<GameConfig>()
            .map(|cfg| Self::from_settings(&cfg.tracking))
            .unwrap_or_else(|| Self::from_settings(&TrackingSettings::default()))
    }
}

impl TrackingSession {
    pub fn from_settings(settings: &TrackingSettings) -> Self {
        Self {
            seeds: settings.planes.clone(),
            detected: vec![false; settings.planes.len()],
            config: None,
            elapsed: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.config.is_some()
    }

    pub fn detected_count(&self) -> usize {
        self.detected.iter().filter(|d| **d).count()
    }

    pub fn start(&mut self, config: TrackingConfig) -> Result<(), EngineError> {
        if !config.horizontal_planes {
            return Err(EngineError::UnsupportedConfiguration(
                "no plane detection mode enabled (only horizontal planes are tracked)".into(),
            ));
        }
        self.config = Some(config);
        self.elapsed = 0.0;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.config = None;
    }

    /// Advance session time; returns the planes that became visible during this step.
    pub fn advance(&mut self, dt: f32) -> Vec<(PlaneAnchorId, PlaneSeed)> {
        if !self.is_running() {
            return Vec::new();
        }
        self.elapsed += dt.max(0.0);
        let mut found = Vec::new();
        for (i, seed) in self.seeds.iter().enumerate() {
            if !self.detected[i] && seed.detect_after <= self.elapsed {
                self.detected[i] = true;
                found.push((PlaneAnchorId(i as u32), seed.clone()));
            }
        }
        found
    }
}

/// Bevy-side `TrackingEngine`: session state plus the camera and detected plane entities.
#[derive(SystemParam)]
pub struct SimulatedTracking<'w, 's> {
    session: ResMut<'w, TrackingSession>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<ArCamera>>,
    planes: Query<'w, 's, &'static DetectedPlane>,
}

impl SimulatedTracking<'_, '_> {
    pub fn detected_count(&self) -> usize {
        self.session.detected_count()
    }
}

impl TrackingEngine for SimulatedTracking<'_, '_> {
    fn start(&mut self, config: &TrackingConfig) -> Result<(), EngineError> {
        self.session.start(*config)
    }

    fn stop(&mut self) {
        self.session.stop();
    }

    fn hit_test(&self, screen_point: Vec2) -> Vec<HitResult> {
        if !self.session.is_running() {
            return Vec::new();
        }
        let Ok((camera, cam_tf)) = self.cameras.single() else {
            return Vec::new();
        };
        let Ok(ray) = camera.viewport_to_world(cam_tf, screen_point) else {
            return Vec::new();
        };
        let extents: Vec<PlaneExtent> = self
            .planes
            .iter()
            .map(|p| PlaneExtent {
                anchor: p.anchor,
                center: p.center,
                half_extents: p.half_extents,
            })
            .collect();
        ray_hits(ray.origin, *ray.direction, &extents)
    }

    fn camera_pose(&self) -> Option<CameraPose> {
        let (_, cam_tf) = self.cameras.single().ok()?;
        Some(CameraPose {
            position: cam_tf.translation(),
            forward: *cam_tf.forward(),
        })
    }
}

pub struct TrackingPlugin;

impl Plugin for TrackingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaneDetected>()
            .init_resource::<TrackingSession>()
            .add_systems(
                Update,
                (discover_planes, attach_plane_visuals)
                    .chain()
                    .in_set(TrackingSet),
            );
    }
}

fn discover_planes(
    time: Res<Time>,
    mut session: ResMut<TrackingSession>,
    mut commands: Commands,
    mut detected: EventWriter<PlaneDetected>,
) {
    for (anchor, seed) in session.advance(time.delta_secs()) {
        let center = Vec3::from(seed.center);
        info!(target: "tracking", anchor = anchor.0, "plane detected at {center}");
        commands.spawn((
            Name::new(format!("Plane{}", anchor.0)),
            DetectedPlane {
                anchor,
                center,
                half_extents: Vec2::new(seed.half_x, seed.half_z),
            },
            Transform::from_translation(center),
            Visibility::default(),
        ));
        detected.write(PlaneDetected { anchor });
    }
}

// Headless apps have no mesh/material assets; planes stay data-only there.
fn attach_plane_visuals(
    mut commands: Commands,
    q: Query<(Entity, &DetectedPlane), Added<DetectedPlane>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    cfg: Res<GameConfig>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    for (e, plane) in q.iter() {
        let mesh = meshes.add(Plane3d::new(Vec3::Y, plane.half_extents));
        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(0.25, 0.65, 1.0, cfg.tracking.plane_alpha),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        commands
            .entity(e)
            .insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}
