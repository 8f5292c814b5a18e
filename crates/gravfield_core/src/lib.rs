pub mod config;
pub mod constants;
pub mod error;
pub mod system;
pub mod types;
pub mod vector;

pub use config::*;
pub use constants::*;
pub use error::{GravfieldError, Result};
pub use system::*;
pub use types::*;
pub use vector::Vector2;
