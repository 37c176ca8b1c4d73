pub mod engine;
pub mod planes;

pub use engine::{
    BallSpec, CameraPose, HitResult, PlaneAnchorId, SceneEngine, TrackingConfig, TrackingEngine,
    BALL_TAG,
};
pub use planes::{PlaneDetected, SimulatedTracking, TrackingPlugin, TrackingSession};
