pub mod backend;
pub mod softbuffer_backend;
pub mod theme;

pub use backend::{Color, RenderBackend};
pub use softbuffer_backend::SoftbufferBackend;
pub use theme::{Palette, Theme, ThemePreference};
