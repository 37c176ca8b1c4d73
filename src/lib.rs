pub mod app;
pub mod core;
pub mod debug;
pub mod interaction;
pub mod physics;
pub mod rendering;
pub mod scene;
pub mod tracking;

// Curated re-exports
pub use app::game::GamePlugin;
pub use core::config::{config::GameConfig, config::WindowConfig};
pub use interaction::controller::{HoopPhase, InteractionController};
pub use scene::assets::{load_hoop_model, HoopModel};
