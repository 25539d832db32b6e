//! PMREM Generator
//!
//! Builds a prefiltered, mipmapped radiance environment from an
//! equirectangular image. Level 0 is the source itself (roughness 0); every
//! further level halves the resolution with a 2×2 box filter, which widens
//! the effective lobe and maps to increasing roughness.
//!
//! A generator is bound to one backend: the maps it produces carry that
//! backend's id and color pipeline. Generators are scoped: drop one as soon
//! as its maps are built to release the scratch memory.

use glam::Vec3;

use crate::assets::EquirectImage;
use crate::render::{ColorPipeline, RenderBackend, RendererId};
use crate::scene::{EnvironmentId, EnvironmentLevel, EnvironmentMap};

pub const DEFAULT_MAX_LEVELS: usize = 6;

pub struct PmremGenerator {
    owner: RendererId,
    pipeline: ColorPipeline,
    max_levels: usize,
    scratch: Vec<Vec3>,
}

impl PmremGenerator {
    #[must_use]
    pub fn new<B: RenderBackend + ?Sized>(backend: &B) -> Self {
        Self {
            owner: backend.id(),
            pipeline: backend.color_pipeline().clone(),
            max_levels: DEFAULT_MAX_LEVELS,
            scratch: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels.max(1);
        self
    }

    #[must_use]
    pub fn owner(&self) -> RendererId {
        self.owner
    }

    pub fn from_equirectangular(
        &mut self,
        id: EnvironmentId,
        uri: &str,
        source: &EquirectImage,
    ) -> EnvironmentMap {
        let mut levels = Vec::with_capacity(self.max_levels);
        levels.push(EnvironmentLevel {
            width: source.width,
            height: source.height,
            roughness: 0.0,
            texels: source.texels.clone(),
        });

        while levels.len() < self.max_levels {
            let prev = &levels[levels.len() - 1];
            if prev.width == 1 && prev.height == 1 {
                break;
            }
            let next = self.downsample(prev);
            levels.push(next);
        }

        let last = (levels.len() - 1).max(1) as f32;
        for (i, level) in levels.iter_mut().enumerate() {
            level.roughness = i as f32 / last;
        }

        log::debug!(
            "PMREM '{uri}' for {}: {} levels from {}x{}",
            self.owner,
            levels.len(),
            source.width,
            source.height
        );

        EnvironmentMap {
            id,
            owner: self.owner,
            pipeline: self.pipeline.clone(),
            source: uri.to_string(),
            levels,
        }
    }

    fn downsample(&mut self, prev: &EnvironmentLevel) -> EnvironmentLevel {
        let width = (prev.width / 2).max(1);
        let height = (prev.height / 2).max(1);
        let src_w = prev.width as usize;
        let at = |x: u32, y: u32| {
            let x = x.min(prev.width - 1) as usize;
            let y = y.min(prev.height - 1) as usize;
            prev.texels[y * src_w + x]
        };

        self.scratch.clear();
        self.scratch.reserve(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = (x * 2, y * 2);
                let sum = at(sx, sy) + at(sx + 1, sy) + at(sx, sy + 1) + at(sx + 1, sy + 1);
                self.scratch.push(sum * 0.25);
            }
        }

        EnvironmentLevel {
            width,
            height,
            roughness: 0.0,
            texels: self.scratch.clone(),
        }
    }
}

impl Drop for PmremGenerator {
    fn drop(&mut self) {
        log::debug!("Released PMREM generator for {}", self.owner);
    }
}
