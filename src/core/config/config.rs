use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

/// Plain xyz triple as written in RON (`(x: 0.0, y: 1.4, z: 0.0)`).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Vec3Config {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl Vec3Config {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
impl From<Vec3Config> for Vec3 {
    fn from(v: Vec3Config) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Hoop Shot".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GravityConfig {
    pub y: f32,
}
impl Default for GravityConfig {
    fn default() -> Self {
        Self { y: -9.81 }
    }
}

/// A surface the simulated tracker reveals `detect_after` seconds into the session.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlaneSeed {
    pub center: Vec3Config,
    pub half_x: f32,
    pub half_z: f32,
    pub detect_after: f32,
}
impl Default for PlaneSeed {
    fn default() -> Self {
        Self {
            center: Vec3Config::default(),
            half_x: 1.0,
            half_z: 1.0,
            detect_after: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrackingSettings {
    pub horizontal: bool,
    pub plane_alpha: f32,
    pub planes: Vec<PlaneSeed>,
}
impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            horizontal: true,
            plane_alpha: 0.35,
            planes: vec![
                PlaneSeed {
                    center: Vec3Config::new(0.0, 0.0, -3.0),
                    half_x: 2.5,
                    half_z: 3.0,
                    detect_after: 1.5,
                },
                PlaneSeed {
                    center: Vec3Config::new(1.8, 0.75, -2.0),
                    half_x: 0.6,
                    half_z: 0.4,
                    detect_after: 3.0,
                },
            ],
        }
    }
}

/// Power accumulation while the pointer is held.
/// `reset_value` is what release restores; it intentionally differs from `baseline`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChargeConfig {
    pub baseline: f32,
    pub reset_value: f32,
    pub increment: f32,
    pub tick_secs: f32,
    pub max: f32,
}
impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            baseline: 0.5,
            reset_value: 1.0,
            increment: 1.0,
            tick_secs: 0.05,
            max: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub restitution: f32,
    pub mass: f32,
    pub spawn_offset: f32,
}
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            restitution: 0.2,
            mass: 1.0,
            spawn_offset: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HoopConfig {
    pub bundle_path: String,
    pub object_name: String,
    pub settle_secs: f32,
}
impl Default for HoopConfig {
    fn default() -> Self {
        Self {
            bundle_path: "assets/models/hoop.ron".into(),
            object_name: "Basket".into(),
            settle_secs: 0.2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub visible_secs: f32,
    pub text: String,
}
impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            visible_secs: 3.0,
            text: "Plane detected".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PointerConfig {
    pub tap_max_time: f32,
    pub tap_max_move: f32,
}
impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            tap_max_time: 0.3,
            tap_max_move: 12.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3Config,
    pub look_at: Vec3Config,
    pub move_speed: f32,
    pub turn_speed: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3Config::new(0.0, 1.4, 0.0),
            look_at: Vec3Config::new(0.0, 0.6, -3.0),
            move_speed: 1.5,
            turn_speed: 1.2,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub gravity: GravityConfig,
    pub tracking: TrackingSettings,
    pub charge: ChargeConfig,
    pub ball: BallConfig,
    pub hoop: HoopConfig,
    pub label: LabelConfig,
    pub pointer: PointerConfig,
    pub camera: CameraConfig,
    pub rapier_debug: bool,
    pub debug_log_interval: f32,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            gravity: Default::default(),
            tracking: Default::default(),
            charge: Default::default(),
            ball: Default::default(),
            hoop: Default::default(),
            label: Default::default(),
            pointer: Default::default(),
            camera: Default::default(),
            rapier_debug: false,
            debug_log_interval: 2.0,
        }
    }
}

impl GameConfig {
    /// Merge every readable file in order (later files override earlier keys).
    /// Returns the config, the paths that were used, and any read/parse problems.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        match merged {
            Some(val) => match val.into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (GameConfig::default(), used, errors)
                }
            },
            None => (GameConfig::default(), used, errors),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if self.window.auto_close > 0.0 && self.window.auto_close < 0.01 {
            w.push(format!(
                "window.autoClose {} very small; closes almost immediately",
                self.window.auto_close
            ));
        }
        if self.gravity.y.abs() < 1e-4 {
            w.push("gravity.y magnitude near zero; balls will float".into());
        }
        if self.gravity.y > 0.0 {
            w.push(format!(
                "gravity.y is positive ({}); balls fall upwards",
                self.gravity.y
            ));
        }
        if !self.tracking.horizontal {
            w.push("tracking.horizontal is false; no planes will ever be detected".into());
        }
        if self.tracking.planes.is_empty() {
            w.push("tracking.planes is empty; nothing to place the hoop on".into());
        }
        for (i, p) in self.tracking.planes.iter().enumerate() {
            if p.half_x <= 0.0 || p.half_z <= 0.0 {
                w.push(format!("tracking.planes[{i}] extents must be > 0"));
            }
            if p.detect_after < 0.0 {
                w.push(format!(
                    "tracking.planes[{i}].detect_after {} negative -> detected immediately",
                    p.detect_after
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.tracking.plane_alpha) {
            w.push(format!(
                "tracking.plane_alpha {} outside 0..1",
                self.tracking.plane_alpha
            ));
        }
        let c = &self.charge;
        if c.increment <= 0.0 {
            w.push("charge.increment must be > 0; holding will not build power".into());
        }
        if c.tick_secs <= 0.0 {
            w.push(format!(
                "charge.tick_secs {} must be > 0 (clamped to 1ms)",
                c.tick_secs
            ));
        }
        if c.max < c.baseline {
            w.push(format!(
                "charge.max ({}) below charge.baseline ({})",
                c.max, c.baseline
            ));
        }
        if c.reset_value > c.max {
            w.push(format!(
                "charge.reset_value ({}) above charge.max ({})",
                c.reset_value, c.max
            ));
        }
        if self.ball.radius <= 0.0 {
            w.push("ball.radius must be > 0".into());
        }
        if self.ball.mass <= 0.0 {
            w.push("ball.mass must be > 0".into());
        }
        if !(0.0..=1.5).contains(&self.ball.restitution) {
            w.push(format!(
                "ball.restitution {} outside recommended 0..1.5",
                self.ball.restitution
            ));
        }
        if self.ball.spawn_offset < self.ball.radius {
            w.push(format!(
                "ball.spawn_offset {} smaller than ball.radius {}; ball spawns inside the camera",
                self.ball.spawn_offset, self.ball.radius
            ));
        }
        if self.hoop.settle_secs < 0.0 {
            w.push("hoop.settle_secs negative -> hoop ready immediately".into());
        }
        if self.hoop.object_name.is_empty() {
            w.push("hoop.object_name is empty".into());
        }
        if self.label.visible_secs <= 0.0 {
            w.push("label.visible_secs must be > 0; label hides the same frame".into());
        }
        if self.pointer.tap_max_time <= 0.0 {
            w.push("pointer.tap_max_time must be > 0; taps will never register".into());
        }
        if self.debug_log_interval <= 0.0 {
            w.push("debug_log_interval must be > 0".into());
        }
        w
    }
}
