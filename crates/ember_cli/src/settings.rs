//! JSON render settings read by the `ember` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ember_renderer::{Background, Color};
use serde::Deserialize;

/// Built-in demo scenes.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Ground plane with a grid of small random spheres and three large ones
    #[default]
    Spheres,
    /// Lit box with two rotated blocks
    Cornell,
    /// Two large checker-textured spheres
    Checker,
    /// A single image-textured globe
    Earth,
}

/// Environment seen by rays that leave the scene.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSetting {
    Solid([f32; 3]),
    Sky,
}

impl From<BackgroundSetting> for Background {
    fn from(setting: BackgroundSetting) -> Self {
        match setting {
            BackgroundSetting::Solid([r, g, b]) => Background::Solid(Color::new(r, g, b)),
            BackgroundSetting::Sky => Background::SkyGradient,
        }
    }
}

/// Everything needed to render one image. Missing fields take their defaults.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RenderSettings {
    /// Width in pixels of the output image
    pub width: u32,

    /// Height in pixels of the output image
    pub height: u32,

    /// Camera rays averaged per pixel
    pub samples_per_pixel: u32,

    /// Scatter events allowed after the camera ray
    pub max_bounces: u32,

    /// Seed for scene generation and per-pixel sampling
    pub seed: u64,

    /// output = pow(output, 1.0 / gamma)
    pub gamma: f32,

    /// Where to write the image; the extension picks the format
    pub output: PathBuf,

    pub scene: SceneKind,

    /// Overrides the scene's own background
    pub background: Option<BackgroundSetting>,

    /// Image used by the earth scene
    pub texture: Option<PathBuf>,

    // Camera overrides
    pub look_from: Option<[f32; 3]>,
    pub look_at: Option<[f32; 3]>,
    pub vfov: Option<f32>,
    pub defocus_angle: Option<f32>,
    pub focus_dist: Option<f32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            samples_per_pixel: 100,
            max_bounces: 50,
            seed: 0,
            gamma: ember_core::DEFAULT_GAMMA,
            output: PathBuf::from("render.png"),
            scene: SceneKind::default(),
            background: None,
            texture: None,
            look_from: None,
            look_at: None,
            vfov: None,
            defocus_angle: None,
            focus_dist: None,
        }
    }
}

impl RenderSettings {
    /// Read and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text).context("Failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("Image size must be positive, got {}x{}", self.width, self.height);
        }
        if self.samples_per_pixel == 0 {
            bail!("samples_per_pixel must be positive");
        }
        if !(self.gamma > 0.0) {
            bail!("gamma must be positive, got {}", self.gamma);
        }
        if let Some(vfov) = self.vfov {
            if !(vfov > 0.0 && vfov < 180.0) {
                bail!("vfov must be between 0 and 180 degrees, got {}", vfov);
            }
        }
        Ok(())
    }
}
