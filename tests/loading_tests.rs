//! Loading Integration Tests
//!
//! Tests for:
//! - LoadingComplete: fired exactly once, also when a load fails
//! - Model insertion on load completion
//! - Intro flight and its page cues
//! - Environment sources: failures, HDR files on disk

use glam::Vec3;
use vitrine::assets::{
    HdrFileSource, MemoryEnvironmentSource, ModelMesh, StaticModelSource, model::MODEL_HEIGHT,
};
use vitrine::scene::{Material, Transform};
use vitrine::{
    ColorPipeline, EnvironmentSource, EquirectImage, HeadlessBackend, LoadProgress,
    ManualScheduler, ModelAsset, PageSignal, PlatformEvent, RendererId, Result, Showcase,
    ShowcaseSettings, Spawner, VirtualClock,
};

const DT: f32 = 1.0 / 60.0;

fn showcase() -> (Showcase<HeadlessBackend>, VirtualClock) {
    let settings = ShowcaseSettings::default();
    let hero = HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&settings.color));
    let detail = HeadlessBackend::new(RendererId(2), ColorPipeline::detail(&settings.color));
    let clock = VirtualClock::new();
    let mut showcase =
        Showcase::with_parts(settings, hero, detail, Box::new(clock.clone()), Spawner::Inline);
    showcase
        .handle_event(PlatformEvent::HeroResized { width: 640, height: 360 })
        .unwrap();
    (showcase, clock)
}

fn sky() -> Box<MemoryEnvironmentSource> {
    Box::new(MemoryEnvironmentSource::new(
        "sky.hdr",
        EquirectImage::from_fn(8, 4, |_, _| Vec3::ONE),
    ))
}

fn model() -> Box<StaticModelSource> {
    let mesh = |name: &str| ModelMesh {
        name: name.to_string(),
        material: Material::default(),
        transform: Transform::new(),
    };
    Box::new(StaticModelSource::new(
        "cosmetics.glb",
        ModelAsset {
            name: "cosmetics".into(),
            meshes: vec![mesh("Cylinder025"), mesh("Tube"), mesh("Cap")],
        },
    ))
}

struct MissingFile;

impl EnvironmentSource for MissingFile {
    fn uri(&self) -> String {
        "hdr/missing.hdr".into()
    }

    fn load(self: Box<Self>) -> Result<EquirectImage> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing.hdr").into())
    }
}

fn count(signals: &[PageSignal], wanted: &PageSignal) -> usize {
    signals.iter().filter(|s| *s == wanted).count()
}

// ============================================================================
// Loading Complete
// ============================================================================

#[test]
fn loading_complete_fires_once() {
    let (mut showcase, clock) = showcase();
    let rx = showcase.signals();
    let mut scheduler = ManualScheduler::new();
    showcase.begin_loading(sky(), Some(model()));

    let mut per_frame = Vec::new();
    for _ in 0..10 {
        clock.advance(DT);
        per_frame.push(showcase.frame(&mut scheduler).signals);
    }

    assert_eq!(count(&per_frame[0], &PageSignal::LoadingComplete), 1);
    assert!(per_frame[1..].iter().all(|s| count(s, &PageSignal::LoadingComplete) == 0));

    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(count(&received, &PageSignal::LoadingComplete), 1);
    assert!(showcase.compositor().is_loading_complete());
}

#[test]
fn loading_complete_fires_when_environment_fails() {
    let (mut showcase, clock) = showcase();
    let rx = showcase.signals();
    let mut scheduler = ManualScheduler::new();
    showcase.begin_loading(Box::new(MissingFile), Some(model()));

    clock.advance(DT);
    let report = showcase.frame(&mut scheduler);
    assert_eq!(report.environment, LoadProgress::Failed);
    assert!(report.rendered(), "scene renders without environment");
    assert!(showcase.scene().environment.is_none());

    for _ in 0..5 {
        clock.advance(DT);
        assert_eq!(showcase.frame(&mut scheduler).environment, LoadProgress::Settled);
    }

    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(count(&received, &PageSignal::LoadingComplete), 1);
    assert!(showcase.compositor().environments().pair().is_none());
}

#[test]
fn empty_environment_image_fails_without_breaking_the_frame() {
    let (mut showcase, clock) = showcase();
    let rx = showcase.signals();
    let mut scheduler = ManualScheduler::new();
    let empty = MemoryEnvironmentSource::new("empty.hdr", EquirectImage::from_fn(0, 4, |_, _| Vec3::ONE));
    showcase.begin_loading(Box::new(empty), None);

    clock.advance(DT);
    let report = showcase.frame(&mut scheduler);
    assert_eq!(report.environment, LoadProgress::Failed);
    assert!(report.rendered(), "{:?}", report.outcome);
    assert!(showcase.scene().environment.is_none());

    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(count(&received, &PageSignal::LoadingComplete), 1);
}

#[test]
fn model_is_prepared_and_added_on_load() {
    let (mut showcase, clock) = showcase();
    let mut scheduler = ManualScheduler::new();
    let before = showcase.scene().node_count();
    showcase.begin_loading(sky(), Some(model()));

    clock.advance(DT);
    showcase.frame(&mut scheduler);

    let scene = showcase.scene();
    assert_eq!(scene.node_count(), before + 4);

    let root = scene.find_by_name("cosmetics").unwrap();
    assert_eq!(scene.transform(root).unwrap().position.y, MODEL_HEIGHT);

    let glass = scene.find_by_name("Cylinder025").unwrap();
    let glass = scene.get_node(glass).unwrap().mesh().unwrap();
    assert_eq!(glass.material.transmission, 1.0);
    assert_eq!(glass.material.env_map_intensity, 1.5);

    let tube = scene.find_by_name("Tube").unwrap();
    let tube = scene.get_node(tube).unwrap().mesh().unwrap();
    assert_eq!(tube.material.transmission, 0.0);
    assert!(tube.cast_shadow && tube.receive_shadow);
}

// ============================================================================
// Intro
// ============================================================================

#[test]
fn intro_reaches_rest_pose_after_duration() {
    let (mut showcase, clock) = showcase();
    let rx = showcase.signals();
    let mut scheduler = ManualScheduler::new();
    let hero_camera = showcase.compositor().rig().hero_camera;
    showcase.begin_loading(sky(), None);

    clock.advance(DT);
    showcase.frame(&mut scheduler);
    let camera = showcase.scene().transform(hero_camera).unwrap();
    assert_eq!(camera.rotation, Vec3::new(-0.25, 0.0, 0.0));
    assert!((camera.position - Vec3::new(0.0, 3.5, 5.0)).length() < 0.01);

    // Mid-flight the camera is strictly between the two poses.
    for _ in 0..105 {
        clock.advance(DT);
        showcase.frame(&mut scheduler);
    }
    let mid = showcase.scene().transform(hero_camera).unwrap().position;
    assert!(mid.y < 3.5 && mid.y > 2.6);
    assert!(showcase.compositor().intro().is_some());

    for _ in 0..120 {
        clock.advance(DT);
        showcase.frame(&mut scheduler);
    }
    let camera = showcase.scene().transform(hero_camera).unwrap();
    assert!((camera.position - Vec3::new(0.0, 2.6, 2.25)).length() < 1e-4);
    assert_eq!(camera.rotation, Vec3::new(-0.25, 0.0, 0.0));
    assert!(showcase.compositor().intro().is_none());

    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        received,
        vec![PageSignal::LoadingComplete, PageSignal::RevealIntro, PageSignal::RevealHeader]
    );
}

#[test]
fn intro_waits_for_every_load() {
    let (mut showcase, clock) = showcase();
    let hero_camera = showcase.compositor().rig().hero_camera;
    let mut scheduler = ManualScheduler::new();

    clock.advance(DT);
    showcase.frame(&mut scheduler);
    assert!(showcase.compositor().intro().is_none());
    assert_eq!(
        showcase.scene().transform(hero_camera).unwrap().position,
        Vec3::new(20.0, 1.54, -0.1)
    );
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn hdr_file_source_reports_missing_file() {
    let source = Box::new(HdrFileSource::new("does/not/exist.hdr"));
    assert!(source.uri().ends_with("exist.hdr"));
    assert!(source.load().is_err());
}

#[test]
fn threaded_load_is_applied_on_a_later_frame() {
    let settings = ShowcaseSettings::default();
    let hero = HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&settings.color));
    let detail = HeadlessBackend::new(RendererId(2), ColorPipeline::detail(&settings.color));
    let clock = VirtualClock::new();
    let mut showcase =
        Showcase::with_parts(settings, hero, detail, Box::new(clock.clone()), Spawner::Thread);
    showcase
        .handle_event(PlatformEvent::HeroResized { width: 320, height: 200 })
        .unwrap();
    let mut scheduler = ManualScheduler::new();
    showcase.begin_loading(sky(), None);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        clock.advance(DT);
        let report = showcase.frame(&mut scheduler);
        if report.environment == LoadProgress::Completed {
            break;
        }
        assert_eq!(report.environment, LoadProgress::Pending);
        assert!(std::time::Instant::now() < deadline, "environment never arrived");
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    assert!(showcase.compositor().environments().is_ready());
}
