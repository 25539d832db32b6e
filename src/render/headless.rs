//! Headless Backend
//!
//! A [`RenderBackend`] that keeps framebuffer descriptors instead of GPU
//! textures and records every call it receives. It is what the demos and the
//! test-suite drive, and it enforces the same contracts a GPU backend would:
//! size limits, context loss, and environment ownership.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::errors::{Result, VitrineError};
use crate::render::postprocess::{SCENE_COLOR_TARGET, physical_size};
use crate::render::{
    ColorPipeline, DEPTH_FORMAT, DrawTarget, PassKind, RenderBackend, RendererId, SURFACE_FORMAT,
    TargetDesc,
};
use crate::scene::{EnvironmentId, RenderCamera, Scene};

/// Default maximum texture dimension (matches `wgpu::Limits::default()`).
pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Logical size of a surface that has never been resized.
const DEFAULT_SURFACE_SIZE: (u32, u32) = (300, 150);

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Resize {
        width: u32,
        height: u32,
        pixel_ratio: f32,
    },
    Allocate(TargetDesc),
    Draw {
        target: DrawTarget,
        camera_position: Vec3,
        environment: Option<EnvironmentId>,
        background: u32,
    },
    Pass(PassKind),
}

pub struct HeadlessBackend {
    id: RendererId,
    pipeline: ColorPipeline,
    max_dimension: u32,

    surface: TargetDesc,
    depth: TargetDesc,
    targets: FxHashMap<String, TargetDesc>,

    calls: Vec<BackendCall>,
    context_lost: bool,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new(id: RendererId, pipeline: ColorPipeline) -> Self {
        let (w, h) = DEFAULT_SURFACE_SIZE;
        Self {
            id,
            pipeline,
            max_dimension: DEFAULT_MAX_DIMENSION,
            surface: TargetDesc::new("surface", w, h, SURFACE_FORMAT),
            depth: TargetDesc::new("depth", w, h, DEPTH_FORMAT),
            targets: FxHashMap::default(),
            calls: Vec::new(),
            context_lost: false,
        }
    }

    #[must_use]
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Simulates a lost (or restored) device.
    pub fn set_context_lost(&mut self, lost: bool) {
        self.context_lost = lost;
    }

    #[must_use]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Draw { .. }))
            .count()
    }

    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Pass(_)))
            .count()
    }

    /// Physical size of the presented surface.
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface.width, self.surface.height)
    }

    #[must_use]
    pub fn target(&self, label: &str) -> Option<&TargetDesc> {
        self.targets.get(label)
    }

    /// Total bytes held by the surface, depth buffer and intermediate targets.
    #[must_use]
    pub fn allocated_bytes(&self) -> u64 {
        self.surface.byte_size()
            + self.depth.byte_size()
            + self.targets.values().map(TargetDesc::byte_size).sum::<u64>()
    }

    fn check_limits(&self, label: &str, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 || width > self.max_dimension || height > self.max_dimension {
            return Err(VitrineError::FramebufferAllocation {
                label: label.to_string(),
                width,
                height,
                limit: self.max_dimension,
            });
        }
        Ok(())
    }

    fn check_context(&self) -> Result<()> {
        if self.context_lost {
            return Err(VitrineError::ContextLost(self.id));
        }
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn id(&self) -> RendererId {
        self.id
    }

    fn color_pipeline(&self) -> &ColorPipeline {
        &self.pipeline
    }

    fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<()> {
        let (physical_w, physical_h) = physical_size(width, height, pixel_ratio);
        self.check_limits("surface", physical_w, physical_h)?;

        self.surface = TargetDesc::new("surface", physical_w, physical_h, SURFACE_FORMAT);
        self.depth = TargetDesc::new("depth", physical_w, physical_h, DEPTH_FORMAT);
        self.calls.push(BackendCall::Resize {
            width,
            height,
            pixel_ratio,
        });
        Ok(())
    }

    fn allocate_target(&mut self, desc: TargetDesc) -> Result<()> {
        self.check_limits(&desc.label, desc.width, desc.height)?;
        self.calls.push(BackendCall::Allocate(desc.clone()));
        self.targets.insert(desc.label.clone(), desc);
        Ok(())
    }

    fn draw(&mut self, scene: &Scene, camera: &RenderCamera, target: DrawTarget) -> Result<()> {
        self.check_context()?;

        if target == DrawTarget::SceneColor && !self.targets.contains_key(SCENE_COLOR_TARGET) {
            return Err(VitrineError::RenderFailed(format!(
                "{}: scene color target is not allocated",
                self.id
            )));
        }
        if let Some(env) = &scene.environment
            && env.owner() != self.id
        {
            return Err(VitrineError::RenderFailed(format!(
                "{}: environment was baked for {}",
                self.id,
                env.owner()
            )));
        }

        self.calls.push(BackendCall::Draw {
            target,
            camera_position: camera.position,
            environment: scene.environment_id(),
            background: scene.background.to_hex(),
        });
        Ok(())
    }

    fn run_pass(&mut self, pass: &PassKind) -> Result<()> {
        self.check_context()?;
        self.calls.push(BackendCall::Pass(pass.clone()));
        Ok(())
    }
}
