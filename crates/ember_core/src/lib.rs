//! Ember Core - image buffers and file I/O shared by the renderer and CLI.
//!
//! This crate provides:
//!
//! - **`ImageBuffer`**: a linear RGB pixel grid with gamma helpers
//! - **Image I/O**: PNG/JPEG/etc. load and save through the `image` crate
//!
//! # Example
//!
//! ```ignore
//! use ember_core::ImageBuffer;
//!
//! let mut image = ImageBuffer::new(320, 240);
//! image.set(0, 0, ember_core::Color::ONE);
//! image.gamma_corrected(2.2).save("out.png")?;
//! ```

pub mod image;

// Re-export commonly used types
pub use crate::image::{Color, ImageBuffer, ImageError, ImageResult, DEFAULT_GAMMA};
