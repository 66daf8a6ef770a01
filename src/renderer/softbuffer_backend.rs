use crate::pane::Rect;
use crate::renderer::backend::{Color, RenderBackend};
use crate::utils::{Result, WorkbenchError};
use cosmic_text::{Attrs, Buffer, Color as CosmicColor, FontSystem, Metrics, Shaping, SwashCache};
use softbuffer::{Context, Surface};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use winit::window::Window;

/// Cache key for shaped glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphCacheKey {
    ch: char,
    bold: bool,
}

pub struct SoftbufferBackend {
    surface: Surface<Arc<Window>, Arc<Window>>,
    font_system: FontSystem,
    swash_cache: SwashCache,
    glyph_buffer_cache: HashMap<GlyphCacheKey, Buffer>,
    font_size: f32,
    cell_width: f32,
    cell_height: f32,
    width: u32,
    height: u32,
    buffer: Vec<u32>,
}

impl SoftbufferBackend {
    fn color_to_u32(color: Color) -> u32 {
        // softbuffer uses 0RGB format (or XRGB), top 8 bits are ignored
        0xFF000000 | ((color.r as u32) << 16) | ((color.g as u32) << 8) | (color.b as u32)
    }

    fn blend(bg: u32, r: f32, g: f32, b: f32, alpha: f32) -> u32 {
        let bg_r = ((bg >> 16) & 0xFF) as f32;
        let bg_g = ((bg >> 8) & 0xFF) as f32;
        let bg_b = (bg & 0xFF) as f32;

        let r = (r * alpha + bg_r * (1.0 - alpha)) as u32;
        let g = (g * alpha + bg_g * (1.0 - alpha)) as u32;
        let b = (b * alpha + bg_b * (1.0 - alpha)) as u32;

        0xFF000000 | (r << 16) | (g << 8) | b
    }

    /// Intersect a rectangle with the framebuffer
    fn clip_to_buffer(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let x1 = rect.x.saturating_add(rect.width).min(self.width);
        let y1 = rect.y.saturating_add(rect.height).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn shaped_glyph(&mut self, ch: char, bold: bool) -> GlyphCacheKey {
        let cache_key = GlyphCacheKey { ch, bold };
        if self.glyph_buffer_cache.contains_key(&cache_key) {
            return cache_key;
        }

        let metrics = Metrics::new(self.font_size, self.cell_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        // Set buffer size to cell width to constrain text
        buffer.set_size(&mut self.font_system, self.cell_width, self.cell_height);

        let mut attrs = Attrs::new().family(cosmic_text::Family::SansSerif);
        if bold {
            attrs = attrs.weight(cosmic_text::Weight::BOLD);
        }

        buffer.set_text(&mut self.font_system, &ch.to_string(), attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        self.glyph_buffer_cache.insert(cache_key, buffer);
        cache_key
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: char, color: Color, bold: bool, clip: (u32, u32, u32, u32)) {
        let cache_key = self.shaped_glyph(ch, bold);
        let Some(buffer) = self.glyph_buffer_cache.get(&cache_key) else {
            return;
        };

        let (clip_x0, clip_y0, clip_x1, clip_y1) = clip;
        let baseline_offset = self.font_size * 1.1;
        let width = self.width as i32;
        let pixels = &mut self.buffer;

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let glyph_x = x as f32 + glyph.x;
                let glyph_y = y as f32 + glyph.y + baseline_offset;

                let physical_glyph = glyph.physical((glyph_x, glyph_y), 1.0);

                self.swash_cache.with_pixels(
                    &mut self.font_system,
                    physical_glyph.cache_key,
                    CosmicColor::rgb(color.r, color.g, color.b),
                    |gx, gy, alpha_color| {
                        let px = physical_glyph.x + gx;
                        let py = physical_glyph.y + gy;

                        if px < clip_x0 as i32 || px >= clip_x1 as i32 || py < clip_y0 as i32 || py >= clip_y1 as i32 {
                            return;
                        }

                        let idx = (py * width + px) as usize;
                        if idx >= pixels.len() {
                            return;
                        }

                        let color_u32 = alpha_color.0;
                        let alpha = ((color_u32 >> 24) & 0xFF) as f32 / 255.0;
                        if alpha > 0.0 {
                            let fg_r = ((color_u32 >> 16) & 0xFF) as f32;
                            let fg_g = ((color_u32 >> 8) & 0xFF) as f32;
                            let fg_b = (color_u32 & 0xFF) as f32;
                            pixels[idx] = Self::blend(pixels[idx], fg_r, fg_g, fg_b, alpha);
                        }
                    },
                );
            }
        }
    }
}

impl RenderBackend for SoftbufferBackend {
    fn new(window: Arc<Window>, font_size: f32) -> Result<Self> {
        let context = Context::new(window.clone())
            .map_err(|e| WorkbenchError::rendering(format!("Failed to create softbuffer context: {}", e)))?;

        let mut surface = Surface::new(&context, window.clone())
            .map_err(|e| WorkbenchError::rendering(format!("Failed to create softbuffer surface: {}", e)))?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();

        // Fixed advance per character keeps tab hit-testing independent of shaping
        let cell_width = font_size * 0.6;
        let cell_height = font_size * 1.3;

        let buffer = vec![0u32; (width * height) as usize];

        surface
            .resize(
                NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
            )
            .map_err(|e| WorkbenchError::rendering(format!("Failed to resize surface: {}", e)))?;

        log::info!(
            "SoftbufferBackend initialized: {}x{} px, cell: {}x{} px, font_size: {}",
            width,
            height,
            cell_width,
            cell_height,
            font_size
        );

        Ok(Self {
            surface,
            font_system,
            swash_cache,
            glyph_buffer_cache: HashMap::new(),
            font_size,
            cell_width,
            cell_height,
            width,
            height,
            buffer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            // Minimized windows report 0x0; keep the old buffer
            return Ok(());
        };

        self.width = width;
        self.height = height;
        self.buffer.resize((width * height) as usize, 0);

        self.surface
            .resize(w, h)
            .map_err(|e| WorkbenchError::rendering(format!("Failed to resize surface: {}", e)))?;
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.buffer.fill(Self::color_to_u32(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let Some((x0, y0, x1, y1)) = self.clip_to_buffer(rect) else {
            return Ok(());
        };

        let opaque = Self::color_to_u32(color);
        let alpha = color.a as f32 / 255.0;

        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                let idx = row + px as usize;
                if color.a == 255 {
                    self.buffer[idx] = opaque;
                } else {
                    self.buffer[idx] = Self::blend(self.buffer[idx], color.r as f32, color.g as f32, color.b as f32, alpha);
                }
            }
        }

        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, bold: bool, clip: Rect) -> Result<()> {
        let Some(clip) = self.clip_to_buffer(clip) else {
            return Ok(());
        };

        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let char_x = x + (i as f32 * self.cell_width) as i32;
            if char_x >= clip.2 as i32 {
                break;
            }
            self.draw_char(char_x, y, ch, color, bold, clip);
        }

        Ok(())
    }

    fn draw_border(&mut self, rect: Rect, thickness: u32, color: Color) -> Result<()> {
        let t = thickness.min(rect.width).min(rect.height);
        let right = rect.x + rect.width - t;
        let bottom = rect.y + rect.height - t;

        // Top, bottom, left, right
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, t), color)?;
        self.fill_rect(Rect::new(rect.x, bottom, rect.width, t), color)?;
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.height), color)?;
        self.fill_rect(Rect::new(right, rect.y, t, rect.height), color)?;

        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let mut surface_buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| WorkbenchError::rendering(format!("Failed to get surface buffer: {}", e)))?;

        if surface_buffer.len() != self.buffer.len() {
            log::error!(
                "Buffer size mismatch: surface={}, internal={}",
                surface_buffer.len(),
                self.buffer.len()
            );
            return Err(WorkbenchError::rendering("Buffer size mismatch"));
        }

        surface_buffer.copy_from_slice(&self.buffer);

        surface_buffer
            .present()
            .map_err(|e| WorkbenchError::rendering(format!("Failed to present buffer: {}", e)))?;

        Ok(())
    }

    fn cell_dimensions(&self) -> (f32, f32) {
        (self.cell_width, self.cell_height)
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f32) -> Result<()> {
        self.font_size = size;
        self.cell_width = size * 0.6;
        self.cell_height = size * 1.3;
        // Glyphs were shaped at the old size
        self.glyph_buffer_cache.clear();
        log::info!("Font size changed to {}, cell dimensions: {}x{}", size, self.cell_width, self.cell_height);
        Ok(())
    }
}
