//! Software compositing for particle rendering.
//!
//! Particles are drawn in two steps: a filled circle goes onto a small
//! transparent [`Sprite`], then the sprite is composited onto a
//! [`RenderTarget`] with the sprite's surface alpha applied on top of the
//! per-pixel coverage. [`Canvas`] is the CPU framebuffer implementation used
//! by the engine host and by tests.

use std::path::Path;

use flicker_common::{Bounds, ConfigError, FlickerError, FlickerResult, Rgba};
use glam::{IVec2, Vec2};

/// Anything particles can be composited onto.
pub trait RenderTarget {
    /// Composites `sprite` with its top-left corner at `origin`.
    ///
    /// Pixels that fall outside the target are clipped.
    fn composite(&mut self, sprite: &Sprite, origin: IVec2);
}

/// Source-over blend of `src` (with effective alpha `alpha`) onto `dst`.
fn blend_over(dst: Rgba, src: Rgba, alpha: u32) -> Rgba {
    let inv = 255 - alpha;
    let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * inv + 127) / 255) as u8;
    Rgba {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: (alpha + (u32::from(dst.a) * inv + 127) / 255).min(255) as u8,
    }
}

/// Small transparent surface a single particle is drawn onto.
#[derive(Debug, Clone)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    alpha: u8,
}

impl Sprite {
    /// Creates a fully transparent sprite with surface alpha 255.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
            alpha: 255,
        }
    }

    /// Sprite width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Sprite height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Surface alpha applied when compositing.
    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Sets the surface alpha.
    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    /// Pixel at (x, y), or `None` outside the sprite.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Fills every pixel whose center lies within `radius` of `center`.
    ///
    /// A zero radius draws nothing.
    pub fn fill_circle(&mut self, center: Vec2, radius: u32, color: Rgba) {
        if radius == 0 {
            return;
        }
        let r = radius as f32;
        let r_sq = r * r;

        // Only scan the circle's bounding square.
        let x0 = (center.x - r).floor().max(0.0) as u32;
        let y0 = (center.y - r).floor().max(0.0) as u32;
        let x1 = ((center.x + r).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((center.y + r).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r_sq {
                    self.pixels[y as usize * self.width as usize + x as usize] = color;
                }
            }
        }
    }

    /// Number of pixels with non-zero coverage.
    #[must_use]
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a > 0).count()
    }
}

/// CPU-side RGBA framebuffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Creates a canvas filled with transparent black.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidCanvas { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        })
    }

    /// Scene rectangle covered by this canvas.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.width, self.height)
    }

    /// Fills the whole canvas with one color.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Pixel at (x, y), or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Raw RGBA8 bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels that differ from `background`.
    #[must_use]
    pub fn count_not(&self, background: Rgba) -> usize {
        self.pixels.iter().filter(|&&p| p != background).count()
    }

    /// Copies the framebuffer into an `image` buffer.
    pub fn to_image(&self) -> FlickerResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec()).ok_or_else(
            || {
                FlickerError::Image(format!(
                    "buffer does not match {}x{} canvas",
                    self.width, self.height
                ))
            },
        )
    }

    /// Encodes the framebuffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> FlickerResult<()> {
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| FlickerError::Image(e.to_string()))
    }
}

impl RenderTarget for Canvas {
    fn composite(&mut self, sprite: &Sprite, origin: IVec2) {
        let surface_alpha = u32::from(sprite.alpha);
        if surface_alpha == 0 {
            return;
        }

        for sy in 0..sprite.height {
            let ty = origin.y + sy as i32;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for sx in 0..sprite.width {
                let tx = origin.x + sx as i32;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                let src = sprite.pixels[sy as usize * sprite.width as usize + sx as usize];
                let alpha = u32::from(src.a) * surface_alpha / 255;
                if alpha == 0 {
                    continue;
                }
                let idx = ty as usize * self.width as usize + tx as usize;
                self.pixels[idx] = blend_over(self.pixels[idx], src, alpha);
            }
        }
    }
}
