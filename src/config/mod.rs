mod loader;
mod types;

pub use loader::init_config;
pub use types::{Config, LayoutConfig};
