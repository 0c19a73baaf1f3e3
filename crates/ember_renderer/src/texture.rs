//! Textures map a surface coordinate to a color.

use std::path::Path;
use std::sync::Arc;

use crate::{Color, Vec3};
use ember_core::{ImageBuffer, ImageResult};

/// Color returned by an image texture that has no pixels.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// Trait for spatially varying colors.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates (u, v) and world point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl From<Color> for SolidColor {
    fn from(albedo: Color) -> Self {
        Self::new(albedo)
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checkerboard alternating between two textures.
///
/// Cells are `scale` units wide and selected by the parity of the truncated
/// cell coordinates, so the cells straddling each axis are twice as wide.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checker between two solid colors.
    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = p * self.inv_scale;
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-neighbour lookup into a decoded bitmap.
///
/// `v = 0` is the bottom row of the image.
pub struct ImageTexture {
    image: ImageBuffer,
}

impl ImageTexture {
    pub fn new(image: ImageBuffer) -> Self {
        Self { image }
    }

    /// Decode an image file into a texture (linear color).
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        Ok(Self::new(ImageBuffer::load(path)?))
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.image.is_empty() {
            return MISSING_TEXTURE_COLOR;
        }

        let width = self.image.width();
        let height = self.image.height();

        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        // u = 1 or v = 0 would land one past the last pixel
        let x = ((u * width as f32) as u32).min(width - 1);
        let y = ((v * height as f32) as u32).min(height - 1);
        self.image.get(x, y)
    }
}
