//! Post-Processing Chain
//!
//! The hero composer: the scene is drawn into an HDR target by the base
//! render pass, then the effects run in a fixed order:
//!
//! ```text
//! RenderPass (HDR) → Bloom (threshold-gated) → Output (tone map + sRGB) → SMAA → surface
//! ```
//!
//! Bloom is tuned to catch only very bright highlights: with the default
//! `threshold` of 0.95 ordinary lit surfaces never bloom.

use smallvec::SmallVec;

use crate::errors::Result;
use crate::render::{
    ColorPipeline, DrawTarget, HDR_TEXTURE_FORMAT, OutputColorSpace, PassKind, RenderBackend,
    TargetDesc, ToneMapping,
};
use crate::scene::{NodeKey, RenderCamera, Scene};
use crate::settings::BloomSettings;

/// Label of the HDR target the base pass renders into.
pub const SCENE_COLOR_TARGET: &str = "scene.color";

/// Scales a logical size to physical pixels (never below one pixel).
#[must_use]
pub fn physical_size(width: u32, height: u32, pixel_ratio: f32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32) * pixel_ratio).round().max(1.0) as u32;
    (scale(width), scale(height))
}

/// Base pass. The camera is rebound by the compositor every frame.
#[derive(Debug, Clone, Default)]
pub struct RenderPass {
    pub camera: Option<NodeKey>,
}

#[derive(Debug, Clone)]
pub struct BloomPass {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
    mip_levels: u32,
    mips: Vec<(u32, u32)>,
}

impl BloomPass {
    #[must_use]
    pub fn new(settings: &BloomSettings) -> Self {
        Self {
            strength: settings.strength,
            radius: settings.radius,
            threshold: settings.threshold,
            mip_levels: settings.mip_levels.max(1),
            mips: Vec::new(),
        }
    }

    /// Half-resolution chain: mip `i` is `size >> (i + 1)`.
    fn targets(&mut self, width: u32, height: u32) -> Vec<TargetDesc> {
        self.mips = (0..self.mip_levels)
            .map(|i| ((width >> (i + 1)).max(1), (height >> (i + 1)).max(1)))
            .collect();
        self.mips
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| TargetDesc::new(format!("bloom.mip{i}"), w, h, HDR_TEXTURE_FORMAT))
            .collect()
    }

    #[must_use]
    pub fn mip_sizes(&self) -> &[(u32, u32)] {
        &self.mips
    }

    fn invocation(&self) -> PassKind {
        PassKind::Bloom {
            strength: self.strength,
            radius: self.radius,
            threshold: self.threshold,
            mip_levels: self.mip_levels,
        }
    }
}

/// Tone mapping and color space conversion.
#[derive(Debug, Clone)]
pub struct OutputPass {
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub color_space: OutputColorSpace,
}

#[derive(Debug, Clone, Default)]
pub struct SmaaPass {
    width: u32,
    height: u32,
}

impl SmaaPass {
    fn targets(&mut self, width: u32, height: u32) -> Vec<TargetDesc> {
        self.width = width;
        self.height = height;
        vec![
            TargetDesc::new("smaa.edges", width, height, wgpu::TextureFormat::Rg8Unorm),
            TargetDesc::new("smaa.weights", width, height, wgpu::TextureFormat::Rgba8Unorm),
        ]
    }
}

#[derive(Debug, Clone)]
pub enum Effect {
    Bloom(BloomPass),
    Output(OutputPass),
    Smaa(SmaaPass),
}

impl Effect {
    fn invocation(&self) -> PassKind {
        match self {
            Self::Bloom(bloom) => bloom.invocation(),
            Self::Output(output) => PassKind::Output {
                tone_mapping: output.tone_mapping,
                exposure: output.exposure,
                color_space: output.color_space,
            },
            Self::Smaa(smaa) => PassKind::Smaa {
                width: smaa.width,
                height: smaa.height,
            },
        }
    }

    fn targets(&mut self, width: u32, height: u32) -> Vec<TargetDesc> {
        match self {
            Self::Bloom(bloom) => bloom.targets(width, height),
            Self::Output(_) => Vec::new(),
            Self::Smaa(smaa) => smaa.targets(width, height),
        }
    }
}

pub struct PostProcessChain {
    pub render_pass: RenderPass,
    effects: SmallVec<[Effect; 4]>,
}

impl PostProcessChain {
    #[must_use]
    pub fn new(bloom: &BloomSettings, pipeline: &ColorPipeline) -> Self {
        let mut effects = SmallVec::new();
        effects.push(Effect::Bloom(BloomPass::new(bloom)));
        effects.push(Effect::Output(OutputPass {
            tone_mapping: pipeline.tone_mapping,
            exposure: pipeline.exposure,
            color_space: pipeline.output,
        }));
        effects.push(Effect::Smaa(SmaaPass::default()));
        Self {
            render_pass: RenderPass::default(),
            effects,
        }
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Names of the effects in execution order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.invocation().name()).collect()
    }

    /// Reallocates the scene target and every effect target at the new
    /// physical size. Zero sizes must be filtered out by the caller.
    pub fn set_size<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
        pixel_ratio: f32,
    ) -> Result<()> {
        let (w, h) = physical_size(width, height, pixel_ratio);
        backend.allocate_target(TargetDesc::new(SCENE_COLOR_TARGET, w, h, HDR_TEXTURE_FORMAT))?;
        for effect in &mut self.effects {
            for desc in effect.targets(w, h) {
                backend.allocate_target(desc)?;
            }
        }
        Ok(())
    }

    /// Draws the scene into the HDR target and runs every effect in order.
    pub fn render<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        scene: &Scene,
        camera: &RenderCamera,
    ) -> Result<()> {
        backend.draw(scene, camera, DrawTarget::SceneColor)?;
        for effect in &self.effects {
            backend.run_pass(&effect.invocation())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessBackend, RendererId};
    use crate::settings::ColorSettings;

    fn chain() -> PostProcessChain {
        PostProcessChain::new(&BloomSettings::default(), &ColorPipeline::hero(&ColorSettings::default()))
    }

    #[test]
    fn effects_run_in_fixed_order() {
        assert_eq!(chain().pass_names(), vec!["bloom", "output", "smaa"]);
    }

    #[test]
    fn set_size_allocates_physical_targets() {
        let mut backend =
            HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&ColorSettings::default()));
        let mut chain = chain();
        chain.set_size(&mut backend, 800, 600, 2.0).unwrap();

        let scene = backend.target(SCENE_COLOR_TARGET).unwrap();
        assert_eq!((scene.width, scene.height), (1600, 1200));
        assert_eq!(scene.format, HDR_TEXTURE_FORMAT);

        let edges = backend.target("smaa.edges").unwrap();
        assert_eq!((edges.width, edges.height), (1600, 1200));

        let Effect::Bloom(bloom) = &chain.effects()[0] else {
            panic!("bloom must run first");
        };
        assert_eq!(bloom.mip_sizes()[0], (800, 600));
        assert_eq!(bloom.mip_sizes().len(), 5);
        assert_eq!(bloom.threshold, 0.95);
    }

    #[test]
    fn physical_size_never_collapses_to_zero() {
        assert_eq!(physical_size(1, 1, 0.25), (1, 1));
        assert_eq!(physical_size(10, 20, 1.5), (15, 30));
    }
}
