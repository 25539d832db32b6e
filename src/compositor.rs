//! Scene Compositor
//!
//! The per-frame loop body. One call to [`SceneCompositor::frame`]:
//!
//! 1. samples elapsed and delta time,
//! 2. applies finished asset loads, advances the intro and detail camera
//!    tweens and collects due page cues,
//! 3. reads the visibility flag,
//! 4. resets the scene background,
//! 5. renders exactly one of the two viewports: the hero (its environment,
//!    parallax, camera binding, composited render) when the product section
//!    is hidden, the detail (its environment, direct render) otherwise,
//! 6. asks the scheduler for the next frame, whether or not the render
//!    succeeded.
//!
//! All scene mutation happens here, on the loop thread.

use flume::Sender;

use crate::animation::{DetailCameraAnimator, IntroAnimation};
use crate::assets::{
    AssetLoader, EnvironmentSource, LoadPoll, LoadingTracker, ModelAsset, ModelSource, Spawner,
    insert_model,
};
use crate::errors::Result;
use crate::input::InputState;
use crate::parallax::ParallaxDriver;
use crate::platform::PageSignal;
use crate::render::{EnvironmentPair, EnvironmentStore, LoadProgress, RenderBackend, ViewKind, Viewport};
use crate::scene::{Color, NodeKey, Scene};
use crate::scheduler::FrameScheduler;
use crate::settings::{AnimationSettings, ShowcaseSettings};
use crate::utils::time::{Clock, FrameTime, Timer};
use crate::visibility::VisibilityGate;

/// Loop-thread state written by event handlers and read once per frame.
pub struct Stage {
    pub scene: Scene,
    pub input: InputState,
    pub visibility: VisibilityGate,
}

impl Stage {
    #[must_use]
    pub fn new(scene: Scene, visibility: VisibilityGate) -> Self {
        Self {
            scene,
            input: InputState::new(),
            visibility,
        }
    }
}

/// Scene nodes the compositor drives.
#[derive(Debug, Clone, Copy)]
pub struct SceneRig {
    pub hero_camera: NodeKey,
    pub detail_camera: NodeKey,
    /// Group the hero camera hangs from; moved by the parallax.
    pub camera_rig: NodeKey,
    pub fill_light: NodeKey,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Rendered,
    /// The render failed; the frame was dropped.
    Skipped(String),
}

/// What one frame did.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub index: u64,
    pub time: FrameTime,
    pub view: ViewKind,
    pub outcome: FrameOutcome,
    pub environment: LoadProgress,
    /// Page signals emitted during this frame.
    pub signals: Vec<PageSignal>,
}

impl FrameReport {
    #[must_use]
    pub fn rendered(&self) -> bool {
        self.outcome == FrameOutcome::Rendered
    }
}

pub struct SceneCompositor<B: RenderBackend> {
    timer: Timer,
    hero: Viewport<B>,
    detail: Viewport<B>,
    rig: SceneRig,
    background: Color,

    environments: EnvironmentStore,
    model: AssetLoader<ModelAsset>,
    glass_meshes: Vec<String>,
    tracker: LoadingTracker,

    parallax: ParallaxDriver,
    detail_camera: DetailCameraAnimator,
    intro_settings: AnimationSettings,
    intro: Option<IntroAnimation>,

    signals: Sender<PageSignal>,
    frame_index: u64,
    skipped: u64,
}

impl<B: RenderBackend> SceneCompositor<B> {
    #[must_use]
    pub fn new(
        settings: &ShowcaseSettings,
        hero: Viewport<B>,
        detail: Viewport<B>,
        rig: SceneRig,
        clock: Box<dyn Clock>,
        spawner: Spawner,
        signals: Sender<PageSignal>,
    ) -> Self {
        Self {
            timer: Timer::new(clock),
            hero,
            detail,
            rig,
            background: settings.view.background,
            environments: EnvironmentStore::new(spawner),
            model: AssetLoader::new("model", spawner),
            glass_meshes: settings.glass_meshes.clone(),
            tracker: LoadingTracker::new(),
            parallax: ParallaxDriver::new(&settings.parallax),
            detail_camera: DetailCameraAnimator::new(
                &settings.products,
                settings.animation.detail_duration,
            ),
            intro_settings: settings.animation.clone(),
            intro: None,
            signals,
            frame_index: 0,
            skipped: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn hero(&self) -> &Viewport<B> {
        &self.hero
    }

    pub fn hero_mut(&mut self) -> &mut Viewport<B> {
        &mut self.hero
    }

    pub fn detail(&self) -> &Viewport<B> {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut Viewport<B> {
        &mut self.detail
    }

    pub fn viewport_mut(&mut self, view: ViewKind) -> &mut Viewport<B> {
        match view {
            ViewKind::Hero => &mut self.hero,
            ViewKind::Detail => &mut self.detail,
        }
    }

    pub fn rig(&self) -> &SceneRig {
        &self.rig
    }

    pub fn environments(&self) -> &EnvironmentStore {
        &self.environments
    }

    pub fn detail_camera(&self) -> &DetailCameraAnimator {
        &self.detail_camera
    }

    pub fn intro(&self) -> Option<&IntroAnimation> {
        self.intro.as_ref()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Frames whose render failed.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    pub fn is_loading_complete(&self) -> bool {
        self.tracker.is_complete()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Starts the environment load and, if given, the model load.
    pub fn begin_loading(
        &mut self,
        environment: Box<dyn EnvironmentSource>,
        model: Option<Box<dyn ModelSource>>,
    ) {
        log::info!("Loading environment '{}'", environment.uri());
        self.tracker.register();
        self.environments.begin_load(environment);

        if let Some(model) = model {
            log::info!("Loading model '{}'", model.uri());
            self.tracker.register();
            self.model.begin(move || model.load());
        }
    }

    /// See [`EnvironmentStore::on_loaded`].
    pub fn on_environment_loaded(&mut self, continuation: impl FnOnce(&EnvironmentPair) + 'static) {
        self.environments.on_loaded(continuation);
    }

    fn poll_loads(&mut self, scene: &mut Scene, signals: &mut Vec<PageSignal>) -> LoadProgress {
        let progress = self
            .environments
            .poll(self.hero.backend(), self.detail.backend());
        let mut all_settled = match progress {
            LoadProgress::Completed => self.tracker.settle(true),
            LoadProgress::Failed => self.tracker.settle(false),
            _ => false,
        };

        match self.model.poll() {
            LoadPoll::Loaded(asset) => {
                let meshes = asset.meshes.len();
                insert_model(scene, asset, &self.glass_meshes);
                log::info!("Model added to the scene ({meshes} meshes)");
                all_settled |= self.tracker.settle(true);
            }
            LoadPoll::Failed(_) => all_settled |= self.tracker.settle(false),
            LoadPoll::Idle | LoadPoll::Pending | LoadPoll::Settled => {}
        }

        if all_settled {
            log::info!(
                "Loading complete ({} failed)",
                self.tracker.failed()
            );
            signals.push(PageSignal::LoadingComplete);
            self.start_intro(scene);
        }
        progress
    }

    fn start_intro(&mut self, scene: &mut Scene) {
        let intro = IntroAnimation::new(&self.intro_settings);
        if let Some(camera) = scene.transform_mut(self.rig.hero_camera) {
            intro.begin(camera);
        }
        self.intro = Some(intro);
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Starts the detail camera transition to `id` and announces the product.
    pub fn select_product(&mut self, scene: &Scene, id: &str) -> Result<()> {
        let current = scene.transform(self.rig.detail_camera).cloned().unwrap_or_default();
        let preset = self.detail_camera.select(id, &current)?;
        let signal = PageSignal::ProductActivated {
            id: preset.id.clone(),
            content: preset.content.clone(),
        };
        self.emit(signal);
        Ok(())
    }

    fn advance_animations(&mut self, dt: f32, scene: &mut Scene, signals: &mut Vec<PageSignal>) {
        if let Some(intro) = &mut self.intro
            && let Some(camera) = scene.transform_mut(self.rig.hero_camera)
        {
            signals.extend(intro.update(dt, camera));
            if intro.is_finished() {
                log::debug!("Intro finished");
                self.intro = None;
            }
        }

        if let Some(camera) = scene.transform_mut(self.rig.detail_camera) {
            self.detail_camera.update(dt, camera);
        }
    }

    fn apply_parallax(&self, stage: &mut Stage, dt: f32) {
        let scene = &mut stage.scene;
        let (Some(mut light), Some(mut rig)) = (
            scene.transform(self.rig.fill_light).map(|t| t.position),
            scene.transform(self.rig.camera_rig).map(|t| t.position),
        ) else {
            return;
        };

        self.parallax.update(stage.input.cursor, dt, &mut light, &mut rig);

        if let Some(t) = scene.transform_mut(self.rig.fill_light) {
            t.position = light;
        }
        if let Some(t) = scene.transform_mut(self.rig.camera_rig) {
            t.position = rig;
        }
    }

    fn emit(&self, signal: PageSignal) {
        // No receiver means the host stopped listening.
        if self.signals.send(signal).is_err() {
            log::trace!("Page signal dropped: no receiver");
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Runs one frame and schedules the next.
    pub fn frame(&mut self, stage: &mut Stage, scheduler: &mut dyn FrameScheduler) -> FrameReport {
        let time = self.timer.tick();
        let mut signals = Vec::new();

        let environment = self.poll_loads(&mut stage.scene, &mut signals);
        self.advance_animations(time.delta, &mut stage.scene, &mut signals);

        let view = if stage.visibility.flag().is_active() {
            ViewKind::Detail
        } else {
            ViewKind::Hero
        };

        stage.scene.background = self.background;
        stage
            .scene
            .set_environment(self.environments.environment_for(view));

        let result = match view {
            ViewKind::Hero => {
                self.apply_parallax(stage, time.delta);
                self.hero.bind_camera(self.rig.hero_camera);
                self.hero.render(&stage.scene)
            }
            ViewKind::Detail => self.detail.render(&stage.scene),
        };

        let outcome = match result {
            Ok(()) => FrameOutcome::Rendered,
            Err(err) => {
                self.skipped += 1;
                log::warn!(
                    "Frame {} skipped ({} view): {err}",
                    self.frame_index,
                    view.label()
                );
                FrameOutcome::Skipped(err.to_string())
            }
        };

        for signal in &signals {
            self.emit(signal.clone());
        }

        scheduler.schedule_next();

        let report = FrameReport {
            index: self.frame_index,
            time,
            view,
            outcome,
            environment,
            signals,
        };
        self.frame_index += 1;
        report
    }
}
