//! Showcase
//!
//! Top-level wiring: builds the shared scene and both viewports, owns the
//! compositor, applies host events and exposes page signals.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine::{Showcase, ShowcaseSettings, HeadlessBackend, ColorPipeline, RendererId};
//! use vitrine::scheduler::FixedRateScheduler;
//!
//! let settings = ShowcaseSettings::default();
//! let hero = HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&settings.color));
//! let detail = HeadlessBackend::new(RendererId(2), ColorPipeline::detail(&settings.color));
//! let mut showcase = Showcase::new(settings, hero, detail);
//! showcase.begin_loading_from_disk(None);
//! showcase.run(&mut FixedRateScheduler::with_fps(60.0).with_frame_limit(600));
//! ```

use std::f32::consts::FRAC_PI_2;

use flume::Receiver;
use glam::Vec3;

use crate::assets::{EnvironmentSource, HdrFileSource, ModelSource, Spawner};
use crate::compositor::{FrameReport, SceneCompositor, SceneRig, Stage};
use crate::errors::Result;
use crate::platform::{PageSignal, PlatformEvent};
use crate::render::{RenderBackend, ViewKind, Viewport};
use crate::scene::{
    Camera, Color, Geometry, Light, Material, Mesh, Node, NodeKind, Scene, ShadowConfig, Transform,
};
use crate::scheduler::FrameScheduler;
use crate::settings::ShowcaseSettings;
use crate::utils::time::{Clock, SystemClock};
use crate::visibility::VisibilityGate;

pub const SUN_COLOR: u32 = 0xff7711;
pub const FILL_COLOR: u32 = 0xffeeb1;
/// Height of the shadow receiver, just under the model.
pub const SHADOW_PLANE_HEIGHT: f32 = 1.845;

fn sun_shadow() -> ShadowConfig {
    ShadowConfig {
        near: 0.1,
        far: 10.0,
        bias: -0.0005,
        normal_bias: 0.005,
        map_size: 2048,
    }
}

/// Builds the lights, shadow plane and cameras. The model is added later,
/// when its load completes.
#[must_use]
pub fn build_scene(settings: &ShowcaseSettings) -> (Scene, SceneRig) {
    let mut scene = Scene::new();
    scene.background = settings.view.background;

    let sun = Light::new_directional(Color::from_hex(SUN_COLOR), 4.0).with_shadows(sun_shadow());
    scene.add_node(
        Node::new("sun", NodeKind::Light(sun))
            .with_transform(Transform::from_position(Vec3::new(-2.0, 2.5, 2.0))),
    );

    let fill = Light::new_point(Color::from_hex(FILL_COLOR), 1.5, 2.5, 2.0);
    let fill_light = scene.add_node(
        Node::new("fill", NodeKind::Light(fill))
            .with_transform(Transform::from_position(Vec3::new(0.0, 3.0, 3.0))),
    );

    let mut plane = Mesh::new(
        Geometry::Plane {
            width: 10.0,
            height: 10.0,
        },
        Material::shadow_only(Color::BLACK, 0.3),
    );
    plane.receive_shadow = true;
    scene.add_node(
        Node::new("shadow_plane", NodeKind::Mesh(plane)).with_transform(
            Transform::from_position(Vec3::new(0.0, SHADOW_PLANE_HEIGHT, 0.0))
                .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        ),
    );

    let cams = &settings.cameras;
    let camera = || Camera::new_perspective(cams.fov_degrees, 1.0, cams.near, cams.far);

    let camera_rig = scene.add_node(Node::new("camera_rig", NodeKind::Group));
    let hero_camera = scene.add_to_parent(
        Node::new("hero_camera", NodeKind::Camera(camera()))
            .with_transform(Transform::from_position(cams.hero_position)),
        camera_rig,
    );
    let detail_camera = scene.add_node(
        Node::new("detail_camera", NodeKind::Camera(camera())).with_transform(
            Transform::from_position(cams.detail_position).with_rotation(cams.detail_rotation),
        ),
    );

    let rig = SceneRig {
        hero_camera,
        detail_camera,
        camera_rig,
        fill_light,
    };
    (scene, rig)
}

pub struct Showcase<B: RenderBackend> {
    settings: ShowcaseSettings,
    stage: Stage,
    compositor: SceneCompositor<B>,
    signals: Receiver<PageSignal>,
}

impl<B: RenderBackend> Showcase<B> {
    /// Wall clock, background-thread loads.
    ///
    /// Neither viewport has a size yet: hero frames are skipped until the
    /// host reports one, either through [`with_initial_sizes`](Self::with_initial_sizes)
    /// or a resize event.
    #[must_use]
    pub fn new(settings: ShowcaseSettings, hero: B, detail: B) -> Self {
        Self::with_parts(settings, hero, detail, Box::new(SystemClock::new()), Spawner::Thread)
    }

    #[must_use]
    pub fn with_parts(
        settings: ShowcaseSettings,
        hero: B,
        detail: B,
        clock: Box<dyn Clock>,
        spawner: Spawner,
    ) -> Self {
        let (scene, rig) = build_scene(&settings);
        let max_pixel_ratio = settings.view.max_pixel_ratio;

        let hero = Viewport::hero(hero, rig.hero_camera, &settings.bloom, max_pixel_ratio);
        let detail = Viewport::detail(detail, rig.detail_camera, max_pixel_ratio);

        let (tx, rx) = flume::unbounded();
        let compositor =
            SceneCompositor::new(&settings, hero, detail, rig, clock, spawner, tx);
        let stage = Stage::new(scene, VisibilityGate::new(settings.view.visibility_threshold));

        log::info!(
            "Showcase ready: {} products, {} nodes",
            settings.products.len(),
            stage.scene.node_count()
        );

        Self {
            settings,
            stage,
            compositor,
            signals: rx,
        }
    }

    /// Sizes both viewports from the host's initial container sizes.
    pub fn with_initial_sizes(mut self, hero: (u32, u32), detail: (u32, u32)) -> Result<Self> {
        self.resize(ViewKind::Hero, hero.0, hero.1)?;
        self.resize(ViewKind::Detail, detail.0, detail.1)?;
        Ok(self)
    }

    #[must_use]
    pub fn settings(&self) -> &ShowcaseSettings {
        &self.settings
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    #[must_use]
    pub fn compositor(&self) -> &SceneCompositor<B> {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut SceneCompositor<B> {
        &mut self.compositor
    }

    /// Receiving end of the page signal channel. Clones share one queue.
    #[must_use]
    pub fn signals(&self) -> Receiver<PageSignal> {
        self.signals.clone()
    }

    pub fn begin_loading(
        &mut self,
        environment: Box<dyn EnvironmentSource>,
        model: Option<Box<dyn ModelSource>>,
    ) {
        self.compositor.begin_loading(environment, model);
    }

    /// Loads the environment from the configured HDR path.
    pub fn begin_loading_from_disk(&mut self, model: Option<Box<dyn ModelSource>>) {
        let source = HdrFileSource::new(self.settings.assets.hdr_path());
        self.compositor.begin_loading(Box::new(source), model);
    }

    /// Applies one host event.
    ///
    /// Resize errors at a valid size and unknown product ids are returned;
    /// everything else is absorbed.
    pub fn handle_event(&mut self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::PointerMoved {
                x,
                y,
                viewport_w,
                viewport_h,
            } => self.stage.input.set_pointer(x, y, viewport_w, viewport_h),
            PlatformEvent::HeroResized { width, height } => {
                self.resize(ViewKind::Hero, width, height)?;
            }
            PlatformEvent::DetailResized { width, height } => {
                self.resize(ViewKind::Detail, width, height)?;
            }
            PlatformEvent::PixelRatioChanged { ratio } => {
                // Both viewports get the new ratio; the first failure is reported.
                let hero = self
                    .compositor
                    .viewport_mut(ViewKind::Hero)
                    .set_pixel_ratio(&mut self.stage.scene, ratio);
                let detail = self
                    .compositor
                    .viewport_mut(ViewKind::Detail)
                    .set_pixel_ratio(&mut self.stage.scene, ratio);
                hero.and(detail)?;
            }
            PlatformEvent::Intersection { ratio } => {
                self.stage.visibility.observe(ratio);
            }
            PlatformEvent::SelectProduct { id } => {
                self.compositor.select_product(&self.stage.scene, &id)?;
            }
        }
        Ok(())
    }

    pub fn resize(&mut self, view: ViewKind, width: u32, height: u32) -> Result<()> {
        self.compositor
            .viewport_mut(view)
            .resize(&mut self.stage.scene, width, height)
    }

    pub fn frame(&mut self, scheduler: &mut dyn FrameScheduler) -> FrameReport {
        self.compositor.frame(&mut self.stage, scheduler)
    }

    /// Renders frames for as long as the scheduler hands them out. Returns
    /// the number of frames run.
    ///
    /// Every frame requests the next one, so a scheduler that never stops
    /// (e.g. [`ManualScheduler`](crate::scheduler::ManualScheduler)) loops
    /// forever; drive those with [`frame`](Self::frame) instead.
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler) -> u64 {
        let mut frames = 0;
        scheduler.schedule_next();
        while scheduler.next_frame() {
            self.frame(scheduler);
            frames += 1;
        }
        log::info!(
            "Loop stopped after {frames} frames ({} skipped)",
            self.compositor.skipped_frames()
        );
        frames
    }
}
