pub mod config;

pub use config::{
    BallConfig, CameraConfig, ChargeConfig, GameConfig, GravityConfig, HoopConfig, LabelConfig,
    PlaneSeed, PointerConfig, TrackingSettings, Vec3Config, WindowConfig,
};
