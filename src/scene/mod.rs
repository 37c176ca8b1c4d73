pub mod assets;
pub mod spawn;

pub use assets::{load_hoop_model, parse_hoop_model, HoopModel};
pub use spawn::{BevyScene, ScenePlugin, SceneVisuals};
