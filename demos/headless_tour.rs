//! Headless tour of the showcase.
//!
//! Loads the environment (an HDR file given on the command line, or a
//! generated sky), then scripts a visit: pointer sweep over the hero, scroll
//! into the product section, select two products in quick succession, scroll
//! back. Run with `RUST_LOG=debug` to watch the view switches.
//!
//! ```text
//! cargo run --example headless_tour -- [path/to/sky.hdr] [settings.json]
//! ```

use anyhow::Context;
use glam::Vec3;
use vitrine::assets::{HdrFileSource, MemoryEnvironmentSource};
use vitrine::{
    ColorPipeline, EnvironmentSource, EquirectImage, FixedRateScheduler, FrameScheduler,
    HeadlessBackend, PlatformEvent, RendererId, Showcase, ShowcaseSettings,
};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn generated_sky() -> EquirectImage {
    EquirectImage::from_fn(256, 128, |_, y| {
        let t = y as f32 / 127.0;
        Vec3::new(1.0, 0.55, 0.3).lerp(Vec3::new(0.4, 0.6, 0.9), t) * (4.0 - 3.0 * t)
    })
}

/// Scripted host events, keyed by frame index.
fn script(frame: u64) -> Vec<PlatformEvent> {
    let pointer = |fx: f32, fy: f32| PlatformEvent::PointerMoved {
        x: fx * WIDTH as f32,
        y: fy * HEIGHT as f32,
        viewport_w: WIDTH as f32,
        viewport_h: HEIGHT as f32,
    };
    match frame {
        0 => vec![
            PlatformEvent::HeroResized { width: WIDTH, height: HEIGHT },
            PlatformEvent::DetailResized { width: WIDTH / 2, height: HEIGHT },
            PlatformEvent::PixelRatioChanged { ratio: 2.5 },
        ],
        60..=179 => vec![pointer((frame - 60) as f32 / 120.0, 0.3)],
        480 => vec![PlatformEvent::Intersection { ratio: 0.4 }],
        500 => vec![PlatformEvent::SelectProduct { id: "product2".into() }],
        540 => vec![PlatformEvent::SelectProduct { id: "product3".into() }],
        720 => vec![PlatformEvent::Intersection { ratio: 0.0 }],
        _ => Vec::new(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let hdr = args.next();
    let settings = match args.next() {
        Some(path) => ShowcaseSettings::from_path(&path)
            .with_context(|| format!("reading settings from {path}"))?,
        None => ShowcaseSettings::default(),
    };

    let hero = HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&settings.color));
    let detail = HeadlessBackend::new(RendererId(2), ColorPipeline::detail(&settings.color));
    let mut showcase = Showcase::new(settings, hero, detail);
    let signals = showcase.signals();

    let environment: Box<dyn EnvironmentSource> = match hdr {
        Some(path) => Box::new(HdrFileSource::new(path)),
        None => Box::new(MemoryEnvironmentSource::new("generated-sky", generated_sky())),
    };
    showcase.begin_loading(environment, None);

    let mut scheduler = FixedRateScheduler::with_fps(120.0).with_frame_limit(900);
    scheduler.schedule_next();
    while scheduler.next_frame() {
        let index = showcase.compositor().frame_index();
        for event in script(index) {
            showcase
                .handle_event(event)
                .with_context(|| format!("frame {index}"))?;
        }
        let report = showcase.frame(&mut scheduler);
        if !report.rendered() {
            log::warn!("frame {} skipped: {:?}", report.index, report.outcome);
        }
        for signal in signals.try_iter() {
            println!("[frame {index:>4}] {signal:?}");
        }
    }

    let compositor = showcase.compositor();
    println!(
        "{} frames, {} skipped; hero {} draws, detail {} draws",
        compositor.frame_index(),
        compositor.skipped_frames(),
        compositor.hero().backend().draw_count(),
        compositor.detail().backend().draw_count(),
    );
    println!(
        "hero framebuffers: {:.1} MiB",
        compositor.hero().backend().allocated_bytes() as f64 / (1024.0 * 1024.0)
    );
    Ok(())
}
