use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::components::{Basketball, DetectedPlane, Hoop};
use crate::core::error::EngineError;
use crate::tracking::engine::{BallSpec, SceneEngine, BALL_TAG};

use super::assets::HoopModel;

const PLANE_COLLIDER_HALF_THICKNESS: f32 = 0.01;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, build_scene_visuals)
            .add_systems(Update, add_plane_colliders);
    }
}

/// Mesh/material handles shared by every hoop and ball. Absent in headless apps.
#[derive(Resource, Clone)]
pub struct SceneVisuals {
    unit_sphere: Handle<Mesh>,
    ball_material: Handle<StandardMaterial>,
    pole_mesh: Handle<Mesh>,
    board_mesh: Handle<Mesh>,
    rim_mesh: Handle<Mesh>,
    metal_material: Handle<StandardMaterial>,
    board_material: Handle<StandardMaterial>,
    rim_material: Handle<StandardMaterial>,
}

fn build_scene_visuals(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    model: Res<HoopModel>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    let board = model.board_size();
    commands.insert_resource(SceneVisuals {
        unit_sphere: meshes.add(Sphere::new(1.0)),
        ball_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.93, 0.45, 0.12),
            perceptual_roughness: 0.8,
            ..default()
        }),
        pole_mesh: meshes.add(Cylinder::new(model.pole_radius, model.pole_height)),
        board_mesh: meshes.add(Cuboid::new(board.x, board.y, board.z)),
        rim_mesh: meshes.add(Torus::new(
            model.rim_radius - model.rim_tube,
            model.rim_radius + model.rim_tube,
        )),
        metal_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.36, 0.4),
            metallic: 0.8,
            ..default()
        }),
        board_material: materials.add(StandardMaterial {
            base_color: Color::srgba(0.95, 0.95, 0.98, 0.85),
            alpha_mode: AlphaMode::Blend,
            ..default()
        }),
        rim_material: materials.add(Color::srgb(0.9, 0.25, 0.1)),
    });
}

// Detected surfaces double as static floors so launched balls land on them.
fn add_plane_colliders(
    mut commands: Commands,
    q: Query<(Entity, &DetectedPlane), Added<DetectedPlane>>,
) {
    for (e, plane) in q.iter() {
        commands.entity(e).insert((
            RigidBody::Fixed,
            Collider::cuboid(
                plane.half_extents.x,
                PLANE_COLLIDER_HALF_THICKNESS,
                plane.half_extents.y,
            ),
        ));
    }
}

/// Bevy-side `SceneEngine`: spawns through `Commands`, finds tagged nodes by `Name`.
#[derive(SystemParam)]
pub struct BevyScene<'w, 's> {
    commands: Commands<'w, 's>,
    named: Query<'w, 's, (Entity, &'static Name)>,
    model: Res<'w, HoopModel>,
    visuals: Option<Res<'w, SceneVisuals>>,
}

impl SceneEngine for BevyScene<'_, '_> {
    fn place_hoop(&mut self, position: Vec3) -> Result<(), EngineError> {
        if !position.is_finite() {
            return Err(EngineError::Instantiate(format!(
                "{} at non-finite position {position}",
                self.model.name
            )));
        }
        let model = self.model.clone();
        let visuals = self.visuals.as_deref().cloned();
        // Compound keeps the ring hollow; a single convex shape would plug the hole.
        let rim_parts: Vec<(Vec3, Quat, Collider)> = model
            .rim_segments()
            .into_iter()
            .map(|(a, b)| {
                let segment = Collider::capsule(a, b, model.rim_tube);
                (Vec3::ZERO, Quat::IDENTITY, segment)
            })
            .collect();
        self.commands
            .spawn((
                Name::new(model.name.clone()),
                Hoop,
                Transform::from_translation(position),
                Visibility::default(),
                RigidBody::Fixed,
            ))
            .with_children(|parent| {
                let mut pole = parent.spawn((
                    Name::new("HoopPole"),
                    Transform::from_translation(model.pole_center()),
                    Collider::cylinder(model.pole_height * 0.5, model.pole_radius),
                ));
                if let Some(v) = &visuals {
                    pole.insert((
                        Mesh3d(v.pole_mesh.clone()),
                        MeshMaterial3d(v.metal_material.clone()),
                    ));
                }
                let half = model.board_size() * 0.5;
                let mut board = parent.spawn((
                    Name::new("HoopBoard"),
                    Transform::from_translation(model.board_center()),
                    Collider::cuboid(half.x, half.y, half.z),
                ));
                if let Some(v) = &visuals {
                    board.insert((
                        Mesh3d(v.board_mesh.clone()),
                        MeshMaterial3d(v.board_material.clone()),
                    ));
                }
                let mut rim = parent.spawn((
                    Name::new("HoopRim"),
                    Transform::from_translation(model.rim_center()),
                    Collider::compound(rim_parts),
                ));
                if let Some(v) = &visuals {
                    rim.insert((
                        Mesh3d(v.rim_mesh.clone()),
                        MeshMaterial3d(v.rim_material.clone()),
                    ));
                }
            });
        Ok(())
    }

    fn spawn_ball(&mut self, spec: BallSpec) -> Result<(), EngineError> {
        // Rapier cannot simulate zero-size shapes or NaN state.
        let finite = spec.position.is_finite() && spec.impulse.is_finite();
        let sized = spec.radius > 0.0 && spec.mass > 0.0;
        if !finite || !sized {
            return Err(EngineError::Instantiate(format!(
                "{BALL_TAG} with radius {} mass {} impulse {}",
                spec.radius, spec.mass, spec.impulse
            )));
        }
        let visuals = self.visuals.as_deref().cloned();
        let mut ball = self.commands.spawn((
            Name::new(BALL_TAG),
            Basketball,
            Transform::from_translation(spec.position),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::ball(spec.radius),
            Restitution::coefficient(spec.restitution),
            ColliderMassProperties::Mass(spec.mass),
            ExternalImpulse {
                impulse: spec.impulse,
                torque_impulse: Vec3::ZERO,
            },
            Ccd::enabled(),
        ));
        // Mesh lives on a child: scaling the body itself would also scale its collider.
        if let Some(v) = visuals {
            ball.with_child((
                Mesh3d(v.unit_sphere),
                MeshMaterial3d(v.ball_material),
                Transform::from_scale(Vec3::splat(spec.radius)),
            ));
        }
        Ok(())
    }

    fn remove_tagged(&mut self, tag: &str) -> usize {
        let mut removed = 0;
        for (e, name) in self.named.iter() {
            if name.as_str() == tag {
                self.commands.entity(e).despawn();
                removed += 1;
            }
        }
        removed
    }
}
