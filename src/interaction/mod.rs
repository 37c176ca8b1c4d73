pub mod controller;
pub mod input;
pub mod session;

pub use controller::{
    ControllerSettings, HoopPhase, InteractionController, LaunchOutcome, SessionState, TapOutcome,
};
