use std::time::Duration;

use bevy::asset::AssetEvent;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::render::camera::{camera_system, ManualTextureViews, RenderTarget};
use bevy::time::TimeUpdateStrategy;
use bevy::window::{WindowCreated, WindowRef, WindowResized, WindowScaleFactorChanged};
use bevy_rapier3d::prelude::*;
use hoop_shot::core::components::{ArCamera, Basketball, DetectedPlane, Hoop};
use hoop_shot::core::config::{GameConfig, PlaneSeed, Vec3Config};
use hoop_shot::core::error::EngineError;
use hoop_shot::interaction::controller::{InteractionController, TapOutcome};
use hoop_shot::interaction::input::pointer::PointerInputPlugin;
use hoop_shot::interaction::session::lifecycle::ControllerLifecyclePlugin;
use hoop_shot::scene::assets::parse_hoop_model;
use hoop_shot::scene::spawn::{BevyScene, ScenePlugin};
use hoop_shot::tracking::engine::{
    BallSpec, CameraPose, HitResult, PlaneAnchorId, SceneEngine, TrackingConfig, TrackingEngine,
    BALL_TAG,
};
use hoop_shot::tracking::planes::{SimulatedTracking, TrackingPlugin, TrackingSession};

const BUNDLE: &str = r#"(
    objects: [
        (
            name: "Basket",
            pole_height: 2.2,
            pole_radius: 0.06,
            board: (x: 1.8, y: 1.05, z: 0.05),
            rim_height: 1.6,
            rim_radius: 0.45,
            rim_tube: 0.02,
            rim_segments: 12,
            rim_gap: 0.15,
        ),
    ],
)"#;

fn test_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.tracking.planes = vec![PlaneSeed {
        center: Vec3Config::new(0.0, 0.0, -3.0),
        half_x: 3.0,
        half_z: 3.0,
        detect_after: 0.0,
    }];
    cfg.label.visible_secs = 0.5;
    cfg
}

fn test_app(cfg: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)));
    app.insert_resource(cfg);
    app.insert_resource(parse_hoop_model(BUNDLE, "Basket", "inline").expect("bundle"));
    // Not running Rapier; only checks which bodies/colliders get attached.
    app.add_plugins((TrackingPlugin, ScenePlugin, ControllerLifecyclePlugin));
    app
}

/// Stand-in for the camera ray: always hits the floor in front of the device.
struct FixedTracking;

impl TrackingEngine for FixedTracking {
    fn start(&mut self, _config: &TrackingConfig) -> Result<(), EngineError> {
        Ok(())
    }
    fn stop(&mut self) {}
    fn hit_test(&self, _screen_point: Vec2) -> Vec<HitResult> {
        vec![HitResult {
            anchor: PlaneAnchorId(0),
            world_position: Vec3::new(0.0, 0.0, -3.0),
            distance: 3.3,
        }]
    }
    fn camera_pose(&self) -> Option<CameraPose> {
        Some(CameraPose {
            position: Vec3::new(0.0, 1.4, 0.0),
            forward: Vec3::NEG_Z,
        })
    }
}

fn tap_floor(mut controller: ResMut<InteractionController>, mut scene: BevyScene) {
    let out = controller
        .on_tap(Vec2::new(640.0, 500.0), &FixedTracking, &mut scene)
        .expect("tap");
    assert!(matches!(out, TapOutcome::HoopPlaced(_)));
}

fn press(mut controller: ResMut<InteractionController>) {
    assert!(controller.on_press_start());
}

fn release(mut controller: ResMut<InteractionController>, mut scene: BevyScene) {
    controller.on_press_end(&FixedTracking, &mut scene);
}

fn spawn_two_balls(mut scene: BevyScene) {
    let spec = BallSpec {
        position: Vec3::new(0.0, 1.4, -1.0),
        impulse: Vec3::new(0.0, 0.0, -5.0),
        radius: 0.3,
        restitution: 0.2,
        mass: 1.0,
    };
    scene.spawn_ball(spec).expect("ball");
    scene.spawn_ball(spec).expect("ball");
}

fn clear_balls(mut scene: BevyScene) {
    assert_eq!(scene.remove_tagged(BALL_TAG), 2);
}

fn teardown(mut controller: ResMut<InteractionController>, mut tracking: SimulatedTracking) {
    controller.teardown(&mut tracking);
}

fn spawn_degenerate_ball(mut scene: BevyScene) -> bool {
    let spec = BallSpec {
        position: Vec3::new(0.0, 1.4, -1.0),
        impulse: Vec3::new(0.0, f32::NAN, -5.0),
        radius: 0.0,
        restitution: 0.2,
        mass: 1.0,
    };
    matches!(scene.spawn_ball(spec), Err(EngineError::Instantiate(_)))
}

fn place_hoop_at_infinity(mut scene: BevyScene) -> bool {
    scene.place_hoop(Vec3::new(0.0, f32::INFINITY, -3.0)).is_err()
}

const SCREEN_CENTER: Vec2 = Vec2::new(640.0, 360.0);

/// Headless stand-in for the phone: a window-backed `ArCamera` whose viewport
/// values are filled by Bevy's own camera system.
fn spawn_device_camera(app: &mut App) -> Transform {
    let mut window = Window::default();
    window.set_cursor_position(Some(SCREEN_CENTER));
    let win = app.world_mut().spawn(window).id();
    let eye = Transform::from_xyz(0.0, 1.4, 0.0).looking_at(Vec3::new(0.0, 0.6, -3.0), Vec3::Y);
    app.world_mut().spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Window(WindowRef::Entity(win)),
            ..default()
        },
        ArCamera,
        eye,
        GlobalTransform::from(eye),
    ));
    app.add_event::<WindowResized>()
        .add_event::<WindowCreated>()
        .add_event::<WindowScaleFactorChanged>()
        .add_event::<AssetEvent<Image>>()
        .init_resource::<Assets<Image>>()
        .init_resource::<ManualTextureViews>();
    app.world_mut()
        .run_system_once(camera_system)
        .expect("camera system");
    eye
}

fn with_mouse(app: &mut App, f: impl FnOnce(&mut ButtonInput<MouseButton>)) {
    let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
    // No InputPlugin here, so last frame's edges are cleared by hand.
    mouse.clear();
    f(&mut mouse);
}

fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}

#[test]
fn detected_plane_shows_label_then_hides_it() {
    let mut app = test_app(test_config());
    app.update();
    assert!(app.world().resource::<TrackingSession>().is_running());
    assert_eq!(app.world().resource::<TrackingSession>().detected_count(), 1);
    assert!(app.world().resource::<InteractionController>().plane_label_visible());

    for _ in 0..12 {
        app.update();
    }
    assert!(!app.world().resource::<InteractionController>().plane_label_visible());
}

#[test]
fn detected_plane_becomes_static_floor() {
    let mut app = test_app(test_config());
    app.update();
    app.update();
    let mut q = app
        .world_mut()
        .query::<(&DetectedPlane, &RigidBody, &Collider)>();
    let planes: Vec<_> = q.iter(app.world()).collect();
    assert_eq!(planes.len(), 1);
    assert_eq!(planes[0].0.anchor, PlaneAnchorId(0));
    assert!(matches!(planes[0].1, RigidBody::Fixed));
}

#[test]
fn tap_settle_press_release_spawns_one_charged_ball() {
    let mut app = test_app(test_config());
    app.update();
    app.world_mut().run_system_once(tap_floor).expect("tap system");
    assert_eq!(count::<With<Hoop>>(&mut app), 1);

    let mut frames = 0;
    while !app.world().resource::<InteractionController>().hoop_placed() {
        app.update();
        frames += 1;
        assert!(frames < 20, "hoop never became ready");
    }

    app.world_mut().run_system_once(press).expect("press system");
    for _ in 0..20 {
        app.update();
    }
    assert_eq!(app.world().resource::<InteractionController>().charge_level(), 20.5);

    app.world_mut().run_system_once(release).expect("release system");
    assert_eq!(app.world().resource::<InteractionController>().charge_level(), 1.0);

    let mut q = app
        .world_mut()
        .query_filtered::<(&Name, &ExternalImpulse, &Restitution), With<Basketball>>();
    let balls: Vec<_> = q.iter(app.world()).collect();
    assert_eq!(balls.len(), 1);
    assert_eq!(balls[0].0.as_str(), BALL_TAG);
    assert_eq!(balls[0].1.impulse, Vec3::new(0.0, 0.0, -20.5));
    assert_eq!(balls[0].2.coefficient, 0.2);
}

#[test]
fn hoop_is_fixed_with_hollow_rim() {
    let mut app = test_app(test_config());
    app.world_mut().run_system_once(tap_floor).expect("tap system");
    let mut q = app
        .world_mut()
        .query_filtered::<(&RigidBody, &Children, &Transform), With<Hoop>>();
    let hoops: Vec<_> = q.iter(app.world()).collect();
    assert_eq!(hoops.len(), 1);
    assert!(matches!(hoops[0].0, RigidBody::Fixed));
    assert_eq!(hoops[0].1.len(), 3);
    assert_eq!(hoops[0].2.translation, Vec3::new(0.0, 0.0, -3.0));

    let rim = app
        .world_mut()
        .query::<(&Name, &Collider)>()
        .iter(app.world())
        .find(|(n, _)| n.as_str() == "HoopRim")
        .map(|(_, c)| c.as_compound().is_some());
    assert_eq!(rim, Some(true));
}

#[test]
fn remove_tagged_clears_every_ball() {
    let mut app = test_app(test_config());
    app.world_mut().run_system_once(spawn_two_balls).expect("spawn");
    assert_eq!(count::<With<Basketball>>(&mut app), 2);
    app.world_mut().run_system_once(clear_balls).expect("clear");
    assert_eq!(count::<With<Basketball>>(&mut app), 0);
}

#[test]
fn teardown_stops_tracking_session() {
    let mut app = test_app(test_config());
    app.update();
    app.world_mut().run_system_once(teardown).expect("teardown");
    assert!(!app.world().resource::<TrackingSession>().is_running());
    assert!(!app.world().resource::<InteractionController>().session().tracking_started);
}

#[test]
fn degenerate_spawns_are_refused() {
    let mut app = test_app(test_config());
    let refused = app.world_mut().run_system_once(spawn_degenerate_ball).expect("spawn");
    assert!(refused);
    let refused = app.world_mut().run_system_once(place_hoop_at_infinity).expect("place");
    assert!(refused);
    assert_eq!(count::<With<Basketball>>(&mut app), 0);
    assert_eq!(count::<With<Hoop>>(&mut app), 0);
}

#[test]
fn click_places_hoop_then_hold_release_shoots_along_camera() {
    let mut app = test_app(test_config());
    app.add_plugins(PointerInputPlugin)
        .init_resource::<ButtonInput<MouseButton>>()
        .init_resource::<Touches>();
    let eye = spawn_device_camera(&mut app);
    app.update();
    assert_eq!(app.world().resource::<TrackingSession>().detected_count(), 1);

    // Quick click at the screen centre: the camera ray meets the floor at z = -1.4 * 3 / 0.8.
    with_mouse(&mut app, |m| m.press(MouseButton::Left));
    app.update();
    with_mouse(&mut app, |m| m.release(MouseButton::Left));
    app.update();
    with_mouse(&mut app, |_| {});

    let mut hoops = app.world_mut().query_filtered::<&Transform, With<Hoop>>();
    let placed: Vec<Vec3> = hoops.iter(app.world()).map(|t| t.translation).collect();
    assert_eq!(placed.len(), 1);
    assert!(
        placed[0].distance(Vec3::new(0.0, 0.0, -5.25)) < 1e-2,
        "hoop at {}",
        placed[0]
    );
    assert_eq!(app.world().resource::<InteractionController>().charge_level(), 1.0);

    let mut frames = 0;
    while !app.world().resource::<InteractionController>().hoop_placed() {
        app.update();
        frames += 1;
        assert!(frames < 20, "hoop never became ready");
    }

    // The press frame adds nothing; ten held frames and the release frame add one each.
    with_mouse(&mut app, |m| m.press(MouseButton::Left));
    app.update();
    with_mouse(&mut app, |_| {});
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(app.world().resource::<InteractionController>().charge_level(), 11.0);
    with_mouse(&mut app, |m| m.release(MouseButton::Left));
    app.update();

    assert_eq!(app.world().resource::<InteractionController>().charge_level(), 1.0);
    assert_eq!(count::<With<Hoop>>(&mut app), 1, "hold never moves the hoop");
    let mut q = app
        .world_mut()
        .query_filtered::<(&Transform, &ExternalImpulse), With<Basketball>>();
    let balls: Vec<_> = q.iter(app.world()).collect();
    assert_eq!(balls.len(), 1);
    let forward = *eye.forward();
    assert!((balls[0].1.impulse - forward * 12.0).length() < 1e-3, "{}", balls[0].1.impulse);
    let expected_spawn = eye.translation + forward;
    assert!((balls[0].0.translation - expected_spawn).length() < 1e-4);
}
