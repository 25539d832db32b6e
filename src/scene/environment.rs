//! Environment - data only
//!
//! A prefiltered lighting environment, baked for exactly one renderer.

use glam::Vec3;

use crate::render::{ColorPipeline, RendererId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentId(pub(crate) u64);

/// One roughness level of the prefiltered chain.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentLevel {
    pub width: u32,
    pub height: u32,
    pub roughness: f32,
    pub texels: Vec<Vec3>,
}

/// Prefiltered (PMREM) environment map.
///
/// The map is tied to the renderer that baked it: `owner` and `pipeline`
/// record whose color management it was produced for.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub(crate) id: EnvironmentId,
    pub(crate) owner: RendererId,
    pub(crate) pipeline: ColorPipeline,
    pub(crate) source: String,
    pub(crate) levels: Vec<EnvironmentLevel>,
}

impl EnvironmentMap {
    #[inline]
    #[must_use]
    pub fn id(&self) -> EnvironmentId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn owner(&self) -> RendererId {
        self.owner
    }

    #[inline]
    #[must_use]
    pub fn pipeline(&self) -> &ColorPipeline {
        &self.pipeline
    }

    /// URI of the image this map was filtered from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn levels(&self) -> &[EnvironmentLevel] {
        &self.levels
    }

    /// Highest usable mip level (for roughness LOD).
    #[must_use]
    pub fn max_mip_level(&self) -> f32 {
        self.levels.len().saturating_sub(1) as f32
    }
}
