//! Viewport
//!
//! One backend, one camera, and for the hero view the post-processing chain.
//! Both viewports are built by the same constructor and differ only in
//! whether a chain is present.

use crate::errors::{Result, VitrineError};
use crate::render::postprocess::PostProcessChain;
use crate::render::{DrawTarget, RenderBackend, ViewKind};
use crate::scene::{NodeKey, Scene};
use crate::settings::BloomSettings;

pub struct Viewport<B: RenderBackend> {
    kind: ViewKind,
    backend: B,
    camera: NodeKey,
    chain: Option<PostProcessChain>,

    /// Last logical size successfully applied.
    size: Option<(u32, u32)>,
    pixel_ratio: f32,
    max_pixel_ratio: f32,
}

impl<B: RenderBackend> Viewport<B> {
    fn new(
        kind: ViewKind,
        backend: B,
        camera: NodeKey,
        chain: Option<PostProcessChain>,
        max_pixel_ratio: f32,
    ) -> Self {
        Self {
            kind,
            backend,
            camera,
            chain,
            size: None,
            pixel_ratio: 1.0,
            max_pixel_ratio: max_pixel_ratio.max(f32::EPSILON),
        }
    }

    /// Composited viewport: render → bloom → output → SMAA.
    pub fn hero(backend: B, camera: NodeKey, bloom: &BloomSettings, max_pixel_ratio: f32) -> Self {
        let chain = PostProcessChain::new(bloom, backend.color_pipeline());
        Self::new(ViewKind::Hero, backend, camera, Some(chain), max_pixel_ratio)
    }

    /// Direct single-pass viewport.
    pub fn detail(backend: B, camera: NodeKey, max_pixel_ratio: f32) -> Self {
        Self::new(ViewKind::Detail, backend, camera, None, max_pixel_ratio)
    }

    #[inline]
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn camera(&self) -> NodeKey {
        self.camera
    }

    pub fn chain(&self) -> Option<&PostProcessChain> {
        self.chain.as_ref()
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Points the base render pass at `camera`. No effect without a chain.
    pub fn bind_camera(&mut self, camera: NodeKey) {
        if let Some(chain) = &mut self.chain {
            chain.render_pass.camera = Some(camera);
        }
    }

    /// Applies a new logical size.
    ///
    /// Zero-sized containers are skipped (they occur transiently during
    /// layout); the previous size stays in effect. Repeating the current size
    /// is a no-op. Failing to allocate framebuffers at a valid size is
    /// returned to the caller and leaves size, pixel ratio and camera aspect
    /// as they were.
    pub fn resize(&mut self, scene: &mut Scene, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            log::debug!("{} viewport: ignoring {width}x{height} resize", self.kind.label());
            return Ok(());
        }
        if self.size == Some((width, height)) {
            return Ok(());
        }
        self.apply(scene, width, height, self.pixel_ratio)
    }

    /// Sets the device pixel ratio (clamped) and reallocates at the current size.
    ///
    /// The ratio is only committed once the reallocation succeeded, so a
    /// failed change can be retried with the same value.
    pub fn set_pixel_ratio(&mut self, scene: &mut Scene, device_pixel_ratio: f32) -> Result<()> {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.max_pixel_ratio)
        } else {
            1.0
        };
        if (ratio - self.pixel_ratio).abs() <= f32::EPSILON {
            return Ok(());
        }
        match self.size {
            Some((w, h)) => self.apply(scene, w, h, ratio),
            None => {
                self.pixel_ratio = ratio;
                Ok(())
            }
        }
    }

    /// Allocates for `width`x`height` at `ratio`, then commits size, ratio and
    /// camera aspect together.
    fn apply(&mut self, scene: &mut Scene, width: u32, height: u32, ratio: f32) -> Result<()> {
        self.backend.set_size(width, height, ratio)?;
        let targets = match &mut self.chain {
            Some(chain) => chain.set_size(&mut self.backend, width, height, ratio),
            None => Ok(()),
        };
        if let Err(err) = targets {
            self.restore_surface();
            return Err(err);
        }

        if let Some(cam) = scene.camera_mut(self.camera) {
            cam.set_aspect(width as f32 / height as f32);
        }
        self.size = Some((width, height));
        self.pixel_ratio = ratio;
        log::debug!("{} viewport: {width}x{height} @{ratio}x", self.kind.label());
        Ok(())
    }

    /// Puts the surface back at the last committed size after a partial
    /// reallocation.
    fn restore_surface(&mut self) {
        let Some((w, h)) = self.size else {
            return;
        };
        if let Err(err) = self.backend.set_size(w, h, self.pixel_ratio) {
            log::warn!("{} viewport: could not restore {w}x{h}: {err}", self.kind.label());
        }
    }

    /// Issues this viewport's single draw.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let camera_key = self
            .chain
            .as_ref()
            .and_then(|c| c.render_pass.camera)
            .unwrap_or(self.camera);
        let camera = scene.render_camera(camera_key).ok_or_else(|| {
            VitrineError::RenderFailed(format!("{} viewport: camera is not in the scene", self.kind.label()))
        })?;

        match &self.chain {
            Some(chain) => chain.render(&mut self.backend, scene, &camera),
            None => self.backend.draw(scene, &camera, DrawTarget::Surface),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BackendCall, ColorPipeline, HeadlessBackend, RendererId};
    use crate::scene::{Camera, Node, NodeKind};
    use crate::settings::ColorSettings;

    fn setup() -> (Scene, NodeKey) {
        let mut scene = Scene::new();
        let cam = scene.add_node(Node::new(
            "cam",
            NodeKind::Camera(Camera::new_perspective(35.0, 1.0, 1.0, 100.0)),
        ));
        (scene, cam)
    }

    fn detail(cam: NodeKey) -> Viewport<HeadlessBackend> {
        let backend =
            HeadlessBackend::new(RendererId(2), ColorPipeline::detail(&ColorSettings::default()));
        Viewport::detail(backend, cam, 2.0)
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let (mut scene, cam) = setup();
        let mut vp = detail(cam);
        vp.resize(&mut scene, 800, 400).unwrap();
        vp.resize(&mut scene, 800, 400).unwrap();

        let resizes = vp
            .backend()
            .calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Resize { .. }))
            .count();
        assert_eq!(resizes, 1);
        assert_eq!(scene.camera(cam).unwrap().aspect, 2.0);
    }

    #[test]
    fn pixel_ratio_is_clamped_and_reapplied() {
        let (mut scene, cam) = setup();
        let mut vp = detail(cam);
        vp.resize(&mut scene, 100, 50).unwrap();
        vp.set_pixel_ratio(&mut scene, 3.0).unwrap();

        assert_eq!(vp.pixel_ratio(), 2.0);
        assert_eq!(vp.backend().surface_size(), (200, 100));
        assert_eq!(vp.size(), Some((100, 50)));
    }

    fn limited_hero(cam: NodeKey, max_dimension: u32) -> Viewport<HeadlessBackend> {
        let color = ColorSettings::default();
        let backend = HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&color))
            .with_max_dimension(max_dimension);
        Viewport::hero(backend, cam, &BloomSettings::default(), 2.0)
    }

    #[test]
    fn failed_resize_keeps_aspect_and_size() {
        let (mut scene, cam) = setup();
        let mut vp = limited_hero(cam, 1024);
        vp.resize(&mut scene, 800, 600).unwrap();

        assert!(vp.resize(&mut scene, 4096, 600).is_err());
        assert_eq!(vp.size(), Some((800, 600)));
        assert_eq!(vp.backend().surface_size(), (800, 600));
        assert_eq!(scene.camera(cam).unwrap().aspect, 800.0 / 600.0);
    }

    #[test]
    fn failed_pixel_ratio_change_can_be_retried() {
        let (mut scene, cam) = setup();
        let mut vp = limited_hero(cam, 1024);
        vp.resize(&mut scene, 800, 600).unwrap();

        assert!(vp.set_pixel_ratio(&mut scene, 2.0).is_err());
        assert_eq!(vp.size(), Some((800, 600)));
        assert_eq!(vp.pixel_ratio(), 1.0);
        assert_eq!(vp.backend().surface_size(), (800, 600));

        // Still too large; the retry reallocates and fails again.
        assert!(vp.set_pixel_ratio(&mut scene, 2.0).is_err());

        vp.set_pixel_ratio(&mut scene, 1.25).unwrap();
        assert_eq!(vp.pixel_ratio(), 1.25);
        assert_eq!(vp.backend().surface_size(), (1000, 750));
    }

    #[test]
    fn missing_camera_is_a_render_error() {
        let (mut scene, cam) = setup();
        let mut vp = detail(cam);
        scene.remove_node(cam);
        assert!(matches!(vp.render(&scene), Err(VitrineError::RenderFailed(_))));
    }
}
