//! Linear-space pixel buffers and image file I/O.
//!
//! Pixels are stored as linear RGB floats. Gamma is applied only when an
//! image crosses the file boundary: decoded on load, encoded before save.

use std::path::Path;

use ember_math::Vec3;
use thiserror::Error;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Gamma assumed for 8-bit image files.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Errors that can occur while reading or writing images.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A width x height grid of linear RGB colors, stored row-major from the top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Create an image buffer from row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> ImageResult<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Encode every pixel with `c^(1/gamma)`; negative channels clamp to zero.
    pub fn gamma_corrected(&self, gamma: f32) -> ImageBuffer {
        let inverse_gamma = 1.0 / gamma;
        self.map(|c| c.max(Color::ZERO).powf(inverse_gamma))
    }

    /// Inverse of [`ImageBuffer::gamma_corrected`]: `c^gamma`.
    pub fn gamma_decoded(&self, gamma: f32) -> ImageBuffer {
        self.map(|c| c.max(Color::ZERO).powf(gamma))
    }

    fn map(&self, f: impl Fn(Color) -> Color) -> ImageBuffer {
        ImageBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| f(c)).collect(),
        }
    }

    /// Convert to packed 8-bit RGB. Channels are clamped to [0, 1], scaled and truncated.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            let scaled = (*color * 255.0).clamp(Vec3::ZERO, Vec3::splat(255.0));
            bytes.extend_from_slice(&[scaled.x as u8, scaled.y as u8, scaled.z as u8]);
        }
        bytes
    }

    /// Write the buffer as-is (no gamma) to `path`. The format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        if self.is_empty() {
            return Err(ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let rgb = image::RgbImage::from_raw(self.width, self.height, self.to_rgb8()).ok_or(
            ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            },
        )?;
        rgb.save(path)?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Decode an image file into linear RGB, undoing [`DEFAULT_GAMMA`].
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    byte_to_linear(p[0]),
                    byte_to_linear(p[1]),
                    byte_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded image: {} ({}x{})", path.display(), width, height);

        Self::from_pixels(width, height, pixels)
    }
}

/// Convert a gamma-encoded byte to a linear float.
fn byte_to_linear(value: u8) -> f32 {
    (value as f32 / 255.0).powf(DEFAULT_GAMMA)
}
