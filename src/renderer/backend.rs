use crate::pane::Rect;
use crate::utils::Result;
use std::sync::Arc;
use winit::window::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

/// Abstract rendering backend trait
pub trait RenderBackend {
    /// Initialize the backend
    fn new(window: Arc<Window>, font_size: f32) -> Result<Self>
    where
        Self: Sized;

    /// Handle window resize
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Fill the whole buffer with one color
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Fill a rectangle, blending when `color.a < 255`
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Draw a single line of text with its top-left corner at (x, y),
    /// clipped to `clip`
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, bold: bool, clip: Rect) -> Result<()>;

    /// Draw a border around a rectangular region
    fn draw_border(&mut self, rect: Rect, thickness: u32, color: Color) -> Result<()>;

    /// Present the rendered frame to the window
    fn present(&mut self) -> Result<()>;

    /// Get cell dimensions in pixels
    fn cell_dimensions(&self) -> (f32, f32);

    /// Get current font size
    fn font_size(&self) -> f32;

    /// Set font size and recalculate cell dimensions
    fn set_font_size(&mut self, size: f32) -> Result<()>;
}
