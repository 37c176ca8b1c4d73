//! Hoop model bundle: a RON file of named objects, one of which is instantiated.
use bevy::prelude::*;
use serde::Deserialize;
use std::{f32::consts::TAU, fs, path::Path};

use crate::core::config::Vec3Config;
use crate::core::error::AssetError;

#[derive(Debug, Deserialize)]
struct ModelBundle {
    objects: Vec<HoopModel>,
}

/// Dimensions of the hoop, in metres, relative to its base on the floor.
/// The rim sits in front of the board along +Z.
#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
pub struct HoopModel {
    pub name: String,
    pub pole_height: f32,
    pub pole_radius: f32,
    /// Width, height and thickness of the backboard.
    pub board: Vec3Config,
    pub rim_height: f32,
    pub rim_radius: f32,
    pub rim_tube: f32,
    pub rim_segments: u32,
    /// Gap between the board's front face and the rim's back edge.
    pub rim_gap: f32,
}

impl HoopModel {
    pub fn board_size(&self) -> Vec3 {
        self.board.into()
    }

    pub fn pole_center(&self) -> Vec3 {
        let back = -self.board.z * 0.5 - self.pole_radius;
        Vec3::new(0.0, self.pole_height * 0.5, back)
    }

    pub fn board_center(&self) -> Vec3 {
        Vec3::new(0.0, self.rim_height + self.board.y * 0.3, 0.0)
    }

    pub fn rim_center(&self) -> Vec3 {
        Vec3::new(
            0.0,
            self.rim_height,
            self.board.z * 0.5 + self.rim_gap + self.rim_radius,
        )
    }

    /// Capsule endpoints approximating the rim, local to `rim_center`.
    /// Consecutive segments share endpoints and the last closes the ring.
    pub fn rim_segments(&self) -> Vec<(Vec3, Vec3)> {
        let n = self.rim_segments.max(3);
        let point = |i: u32| {
            let a = TAU * i as f32 / n as f32;
            Vec3::new(a.cos() * self.rim_radius, 0.0, a.sin() * self.rim_radius)
        };
        (0..n).map(|i| (point(i), point((i + 1) % n))).collect()
    }

    /// Clear radius inside the rim tube.
    pub fn rim_inner_radius(&self) -> f32 {
        self.rim_radius - self.rim_tube
    }

    /// `Some(warning)` when a ball of `ball_radius` cannot drop through the rim.
    pub fn clearance_warning(&self, ball_radius: f32) -> Option<String> {
        let inner = self.rim_inner_radius();
        (inner <= ball_radius).then(|| {
            format!(
                "hoop '{}' rim inner radius {inner} does not clear ball.radius {ball_radius}",
                self.name
            )
        })
    }

    fn check(&self) -> Result<(), String> {
        let positive = [
            ("pole_height", self.pole_height),
            ("pole_radius", self.pole_radius),
            ("board.x", self.board.x),
            ("board.y", self.board.y),
            ("board.z", self.board.z),
            ("rim_radius", self.rim_radius),
            ("rim_tube", self.rim_tube),
        ];
        for (label, v) in positive {
            if v <= 0.0 {
                return Err(format!("{label} must be > 0 (got {v})"));
            }
        }
        if self.rim_tube >= self.rim_radius {
            return Err(
                "rim_tube must be smaller than rim_radius; the rim would have no hole".into(),
            );
        }
        if self.rim_height > self.pole_height {
            return Err(format!(
                "rim_height {} above pole_height {}",
                self.rim_height, self.pole_height
            ));
        }
        Ok(())
    }
}

pub fn parse_hoop_model(
    text: &str,
    object_name: &str,
    path_label: &str,
) -> Result<HoopModel, AssetError> {
    let bundle: ModelBundle = ron::from_str(text).map_err(|e| AssetError::Parse {
        path: path_label.to_string(),
        message: e.to_string(),
    })?;
    let model = bundle
        .objects
        .into_iter()
        .find(|o| o.name == object_name)
        .ok_or_else(|| AssetError::MissingObject {
            name: object_name.to_string(),
            path: path_label.to_string(),
        })?;
    model.check().map_err(|reason| AssetError::Invalid {
        name: object_name.to_string(),
        path: path_label.to_string(),
        reason,
    })?;
    Ok(model)
}

pub fn load_hoop_model(
    path: impl AsRef<Path>,
    object_name: &str,
) -> Result<HoopModel, AssetError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: label.clone(),
        source,
    })?;
    parse_hoop_model(&text, object_name, &label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"(
        objects: [
            (
                name: "Basket",
                pole_height: 3.0,
                pole_radius: 0.06,
                board: (x: 1.8, y: 1.05, z: 0.05),
                rim_height: 2.6,
                rim_radius: 0.23,
                rim_tube: 0.02,
                rim_segments: 16,
                rim_gap: 0.15,
            ),
        ],
    )"#;

    #[test]
    fn finds_named_object() {
        let m = parse_hoop_model(BUNDLE, "Basket", "inline").unwrap();
        assert_eq!(m.rim_segments, 16);
        assert!(m.rim_center().z > m.board_center().z);
    }

    #[test]
    fn rim_ring_is_closed_and_on_radius() {
        let m = parse_hoop_model(BUNDLE, "Basket", "inline").unwrap();
        let segs = m.rim_segments();
        assert_eq!(segs.len(), 16);
        for (a, b) in &segs {
            assert!((a.length() - m.rim_radius).abs() < 1e-5);
            assert!((b.length() - m.rim_radius).abs() < 1e-5);
        }
        assert!(segs[15].1.distance(segs[0].0) < 1e-5);
    }

    #[test]
    fn narrow_rim_warns_about_ball_clearance() {
        let m = parse_hoop_model(BUNDLE, "Basket", "inline").unwrap();
        assert!((m.rim_inner_radius() - 0.21).abs() < 1e-5);
        let warning = m.clearance_warning(0.3).expect("0.21 rim cannot pass a 0.3 ball");
        assert!(warning.contains("ball.radius"), "{warning}");
        assert_eq!(m.clearance_warning(0.2), None);
    }

    #[test]
    fn tube_wider_than_rim_is_invalid() {
        let text = BUNDLE.replace("rim_tube: 0.02", "rim_tube: 0.5");
        let err = parse_hoop_model(&text, "Basket", "inline").unwrap_err();
        assert!(matches!(err, AssetError::Invalid { .. }), "{err}");
    }
}
