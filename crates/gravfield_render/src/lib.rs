pub mod camera;
pub mod field;
pub mod particles;
pub mod plugin;
pub mod ui;

pub use plugin::GravfieldRenderPlugin;
