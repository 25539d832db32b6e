//! Showcase Settings
//!
//! Every tunable of the showcase lives in [`ShowcaseSettings`]. The defaults
//! reproduce the shipped page; hosts may override any subset from JSON:
//!
//! ```rust,ignore
//! use vitrine::settings::ShowcaseSettings;
//!
//! let settings = ShowcaseSettings::from_json_str(r#"{ "view": { "max_pixel_ratio": 1.5 } }"#)?;
//! assert_eq!(settings.view.background.to_hex(), 0xe8f3e8);
//! ```
//!
//! | Section     | Controls                                             |
//! |-------------|------------------------------------------------------|
//! | `assets`    | Base paths and file names of the HDR and model       |
//! | `view`      | Background, visibility threshold, pixel ratio cap    |
//! | `color`     | Tone mapping operator and exposure of both renderers |
//! | `bloom`     | Hero bloom strength / radius / threshold             |
//! | `cameras`   | Projection and initial placement of both cameras     |
//! | `parallax`  | Smoothing factors and targets of the hero parallax   |
//! | `animation` | Durations and poses of the intro and detail tweens   |
//! | `products`  | Detail camera presets and descriptive content        |

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::render::ToneMapping;
use crate::scene::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub hdr_base: PathBuf,
    pub hdr_file: String,
    pub model_base: PathBuf,
    pub model_file: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            hdr_base: PathBuf::from("hdr"),
            hdr_file: "qwantani_sunset_puresky_2k.hdr".to_string(),
            model_base: PathBuf::from("models"),
            model_file: "cosmetics.glb".to_string(),
        }
    }
}

impl AssetSettings {
    #[must_use]
    pub fn hdr_path(&self) -> PathBuf {
        self.hdr_base.join(&self.hdr_file)
    }

    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.model_base.join(&self.model_file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Clear color used by both views.
    pub background: Color,
    /// Intersection ratio above which the detail view takes over.
    pub visibility_threshold: f32,
    /// Device pixel ratios above this are clamped.
    pub max_pixel_ratio: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0xe8f3e8),
            visibility_threshold: 0.05,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    /// Only luminance above this blooms.
    pub threshold: f32,
    pub mip_levels: u32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 0.05,
            radius: 0.2,
            threshold: 0.95,
            mip_levels: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub hero_position: Vec3,
    pub detail_position: Vec3,
    pub detail_rotation: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 35.0,
            near: 1.0,
            far: 100.0,
            hero_position: Vec3::new(20.0, 1.54, -0.1),
            detail_position: Vec3::new(2.0, 2.0, 2.0),
            detail_rotation: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Targets and smoothing rates of the hero parallax.
///
/// Each `*_rate` is the exponential smoothing rate (per second) of one output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    pub light_y_rate: f32,
    pub light_x_rate: f32,
    pub light_z_rate: f32,
    pub rig_x_rate: f32,
    pub rig_z_rate: f32,

    /// Height the fill light is pulled toward when the cursor is centered.
    pub light_base_height: f32,
    pub light_y_scale: f32,
    pub light_x_scale: f32,
    /// Depth the fill light settles to, regardless of input.
    pub light_depth: f32,
    pub rig_scale: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            light_y_rate: 1.0,
            light_x_rate: 2.0,
            light_z_rate: 6.0,
            rig_x_rate: 2.0,
            rig_z_rate: 2.0,
            light_base_height: 2.0,
            light_y_scale: 9.0,
            light_x_scale: 8.0,
            light_depth: 1.8,
            rig_scale: 1.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub detail_duration: f32,
    pub intro_duration: f32,
    pub intro_start_position: Vec3,
    pub intro_start_rotation: Vec3,
    pub intro_end_position: Vec3,
    pub reveal_intro_delay: f32,
    pub reveal_header_delay: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            detail_duration: 1.8,
            intro_duration: 3.5,
            intro_start_position: Vec3::new(0.0, 3.5, 5.0),
            intro_start_rotation: Vec3::new(-0.25, 0.0, 0.0),
            intro_end_position: Vec3::new(0.0, 2.6, 2.25),
            reveal_intro_delay: 0.5,
            reveal_header_delay: 1.0,
        }
    }
}

/// A selectable product: where the detail camera goes and what the page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPreset {
    pub id: String,
    pub position: Vec3,
    pub rotation: Vec3,
    #[serde(default)]
    pub content: String,
}

impl ProductPreset {
    #[must_use]
    pub fn new(id: impl Into<String>, position: Vec3, rotation: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            rotation,
            content: String::new(),
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

fn default_products() -> Vec<ProductPreset> {
    vec![
        ProductPreset::new("product1", Vec3::new(-1.0, 2.0, 1.5), Vec3::new(0.0, -0.1, 0.0))
            .with_content(
                "Olive oil face cleanser: a soft gel that removes impurities without irritating \
                 the skin. 150 ml, 30€.",
            ),
        ProductPreset::new("product2", Vec3::new(0.0, 2.0, 1.5), Vec3::new(0.0, 0.1, 0.0))
            .with_content(
                "White truffle eye contour: a light cream that refreshes tired eyes. 15 ml, 40€.",
            ),
        ProductPreset::new("product3", Vec3::new(0.5, 2.0, 1.5), Vec3::new(0.0, 0.2, 0.0))
            .with_content(
                "Prickly pear face cream: hydrating and rebalancing, for combination skin. \
                 50 ml, 35€.",
            ),
    ]
}

fn default_glass_meshes() -> Vec<String> {
    ["Cylinder025", "Cylinder025_1", "Cylinder025_3", "Cylinder024", "Cylinder024_2"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Complete showcase configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseSettings {
    pub assets: AssetSettings,
    pub view: ViewSettings,
    pub color: ColorSettings,
    pub bloom: BloomSettings,
    pub cameras: CameraSettings,
    pub parallax: ParallaxSettings,
    pub animation: AnimationSettings,
    pub products: Vec<ProductPreset>,
    /// Model meshes that receive the glass material on load.
    pub glass_meshes: Vec<String>,
}

impl Default for ShowcaseSettings {
    fn default() -> Self {
        Self {
            assets: AssetSettings::default(),
            view: ViewSettings::default(),
            color: ColorSettings::default(),
            bloom: BloomSettings::default(),
            cameras: CameraSettings::default(),
            parallax: ParallaxSettings::default(),
            animation: AnimationSettings::default(),
            products: default_products(),
            glass_meshes: default_glass_meshes(),
        }
    }
}

impl ShowcaseSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<&ProductPreset> {
        self.products.iter().find(|p| p.id == id)
    }
}
