//! Rendering
//!
//! The showcase never talks to a GPU API directly. Each viewport owns one
//! [`RenderBackend`], the seam where an actual renderer (or the bundled
//! [`HeadlessBackend`](headless::HeadlessBackend)) plugs in. On top of it:
//!
//! - [`viewport`]: a backend, a camera and (hero only) the post-processing chain
//! - [`postprocess`]: render → bloom → output → SMAA
//! - [`pmrem`]: per-renderer prefiltering of the environment image
//! - [`environment`]: the asynchronously loaded environment pair

pub mod environment;
pub mod headless;
pub mod pmrem;
pub mod postprocess;
pub mod viewport;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::scene::{RenderCamera, Scene};
use crate::settings::ColorSettings;

/// Color attachment format of intermediate HDR targets.
pub const HDR_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Color format of the presented surface.
pub const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(pub u32);

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "renderer#{}", self.0)
    }
}

/// The two logical viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Hero,
    Detail,
}

impl ViewKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Detail => "detail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    None,
    Linear,
    Reinhard,
    #[default]
    AcesFilmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputColorSpace {
    #[default]
    Srgb,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadowMapType {
    Basic,
    Pcf,
    #[default]
    PcfSoft,
}

/// Color management of one renderer.
///
/// Environment maps are baked against this configuration, which is why a map
/// filtered for one renderer is never bound on the other.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPipeline {
    pub output: OutputColorSpace,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    /// Whether the surface keeps an alpha channel for page composition.
    pub alpha: bool,
    /// Whether the backend clears before each draw (the composer clears itself otherwise).
    pub auto_clear: bool,
    pub shadow_map: Option<ShadowMapType>,
}

impl ColorPipeline {
    /// Opaque surface, cleared by the post-processing composer.
    #[must_use]
    pub fn hero(color: &ColorSettings) -> Self {
        Self {
            output: OutputColorSpace::Srgb,
            tone_mapping: color.tone_mapping,
            exposure: color.exposure,
            alpha: false,
            auto_clear: false,
            shadow_map: Some(ShadowMapType::PcfSoft),
        }
    }

    /// Transparent surface, cleared on every draw.
    #[must_use]
    pub fn detail(color: &ColorSettings) -> Self {
        Self {
            alpha: true,
            auto_clear: true,
            ..Self::hero(color)
        }
    }
}

/// A render target the backend must keep allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl TargetDesc {
    #[must_use]
    pub fn new(label: impl Into<String>, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            format,
        }
    }

    #[must_use]
    pub fn byte_size(&self) -> u64 {
        let texel = self.format.block_copy_size(None).unwrap_or(4);
        u64::from(self.width) * u64::from(self.height) * u64::from(texel)
    }
}

/// Where a scene draw lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    /// Straight to the presented surface.
    Surface,
    /// Into the HDR scene target consumed by the post-processing chain.
    SceneColor,
}

/// A full-screen effect invocation, with the parameters it runs with.
#[derive(Debug, Clone, PartialEq)]
pub enum PassKind {
    Bloom {
        strength: f32,
        radius: f32,
        threshold: f32,
        mip_levels: u32,
    },
    Output {
        tone_mapping: ToneMapping,
        exposure: f32,
        color_space: OutputColorSpace,
    },
    Smaa {
        width: u32,
        height: u32,
    },
}

impl PassKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bloom { .. } => "bloom",
            Self::Output { .. } => "output",
            Self::Smaa { .. } => "smaa",
        }
    }
}

/// A renderer bound to one host surface.
///
/// Implementations own their framebuffers. All calls happen on the loop
/// thread, between or inside frames.
pub trait RenderBackend {
    fn id(&self) -> RendererId;

    fn color_pipeline(&self) -> &ColorPipeline;

    /// Reallocates the surface framebuffers. `width`/`height` are logical
    /// pixels and never zero.
    fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<()>;

    /// Allocates (or reallocates) an intermediate target of the chain.
    fn allocate_target(&mut self, desc: TargetDesc) -> Result<()>;

    /// Draws `scene` from `camera`.
    fn draw(&mut self, scene: &Scene, camera: &RenderCamera, target: DrawTarget) -> Result<()>;

    /// Runs one full-screen effect of the post-processing chain.
    fn run_pass(&mut self, pass: &PassKind) -> Result<()>;
}

pub use environment::{EnvironmentPair, EnvironmentStore, LoadProgress};
pub use headless::{BackendCall, HeadlessBackend};
pub use pmrem::PmremGenerator;
pub use postprocess::PostProcessChain;
pub use viewport::Viewport;
