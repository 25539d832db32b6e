//! Environment Store
//!
//! Loads the single environment image once and filters it twice, one PMREM
//! per renderer. Until the load completes every accessor returns `None` and
//! the scene renders without image-based lighting.
//!
//! A failed load is logged and then ignored: the continuation never runs and
//! the store stays empty for the rest of the session (there is no retry).

use std::rc::Rc;

use crate::assets::{AssetLoader, EnvironmentSource, EquirectImage, LoadPoll, Spawner};
use crate::render::pmrem::PmremGenerator;
use crate::render::{RenderBackend, ViewKind};
use crate::scene::{EnvironmentId, EnvironmentMap};

/// The two environments baked from one source image.
#[derive(Debug, Clone)]
pub struct EnvironmentPair {
    pub hero: Rc<EnvironmentMap>,
    pub detail: Rc<EnvironmentMap>,
}

impl EnvironmentPair {
    #[must_use]
    pub fn for_view(&self, view: ViewKind) -> &Rc<EnvironmentMap> {
        match view {
            ViewKind::Hero => &self.hero,
            ViewKind::Detail => &self.detail,
        }
    }
}

/// What one [`EnvironmentStore::poll`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    Idle,
    Pending,
    /// The pair became available during this poll.
    Completed,
    /// The load failed during this poll.
    Failed,
    /// Nothing new (already completed or failed earlier).
    Settled,
}

type Continuation = Box<dyn FnOnce(&EnvironmentPair)>;

pub struct EnvironmentStore {
    loader: AssetLoader<(String, EquirectImage)>,
    pair: Option<EnvironmentPair>,
    continuation: Option<Continuation>,
    next_id: u64,
}

impl EnvironmentStore {
    #[must_use]
    pub fn new(spawner: Spawner) -> Self {
        Self {
            loader: AssetLoader::new("environment", spawner),
            pair: None,
            continuation: None,
            next_id: 1,
        }
    }

    /// Starts decoding `source` in the background. Returns immediately.
    pub fn begin_load(&mut self, source: Box<dyn EnvironmentSource>) {
        self.loader.begin(move || {
            let uri = source.uri();
            source
                .load()
                .and_then(EquirectImage::validated)
                .map(|image| (uri, image))
        });
    }

    /// Registers the callback run once the pair exists.
    ///
    /// Registering after completion runs it on the next poll.
    pub fn on_loaded(&mut self, continuation: impl FnOnce(&EnvironmentPair) + 'static) {
        self.continuation = Some(Box::new(continuation));
    }

    /// Checks the loader and, once the image is decoded, filters it for both
    /// renderers. Must be called on the loop thread.
    pub fn poll<H, D>(&mut self, hero: &H, detail: &D) -> LoadProgress
    where
        H: RenderBackend + ?Sized,
        D: RenderBackend + ?Sized,
    {
        let progress = match self.loader.poll() {
            LoadPoll::Idle => LoadProgress::Idle,
            LoadPoll::Pending => LoadProgress::Pending,
            LoadPoll::Failed(_) => LoadProgress::Failed,
            LoadPoll::Settled => LoadProgress::Settled,
            LoadPoll::Loaded((uri, image)) => {
                let pair = self.build_pair(&uri, &image, hero, detail);
                log::info!(
                    "Environment '{uri}' ready ({} levels)",
                    pair.hero.levels().len()
                );
                self.pair = Some(pair);
                LoadProgress::Completed
            }
        };

        if let Some(pair) = &self.pair
            && let Some(continuation) = self.continuation.take()
        {
            continuation(pair);
        }

        progress
    }

    fn build_pair<H, D>(&mut self, uri: &str, image: &EquirectImage, hero: &H, detail: &D) -> EnvironmentPair
    where
        H: RenderBackend + ?Sized,
        D: RenderBackend + ?Sized,
    {
        let hero_id = self.allocate_id();
        let detail_id = self.allocate_id();

        // Generators live only for this scope.
        let hero_map = PmremGenerator::new(hero).from_equirectangular(hero_id, uri, image);
        let detail_map = PmremGenerator::new(detail).from_equirectangular(detail_id, uri, image);

        EnvironmentPair {
            hero: Rc::new(hero_map),
            detail: Rc::new(detail_map),
        }
    }

    fn allocate_id(&mut self) -> EnvironmentId {
        let id = EnvironmentId(self.next_id);
        self.next_id += 1;
        id
    }

    #[must_use]
    pub fn pair(&self) -> Option<&EnvironmentPair> {
        self.pair.as_ref()
    }

    /// The environment baked for `view`'s renderer, if loaded.
    #[must_use]
    pub fn environment_for(&self, view: ViewKind) -> Option<Rc<EnvironmentMap>> {
        self.pair.as_ref().map(|p| Rc::clone(p.for_view(view)))
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.pair.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::{Duration, Instant};

    use glam::Vec3;

    use super::*;
    use crate::assets::MemoryEnvironmentSource;
    use crate::errors::{Result, VitrineError};
    use crate::render::{ColorPipeline, HeadlessBackend, RendererId};
    use crate::settings::ColorSettings;

    fn backends() -> (HeadlessBackend, HeadlessBackend) {
        let color = ColorSettings::default();
        (
            HeadlessBackend::new(RendererId(1), ColorPipeline::hero(&color)),
            HeadlessBackend::new(RendererId(2), ColorPipeline::detail(&color)),
        )
    }

    fn sky() -> Box<MemoryEnvironmentSource> {
        Box::new(MemoryEnvironmentSource::new(
            "sky.hdr",
            EquirectImage::from_fn(8, 4, |_, _| Vec3::ONE),
        ))
    }

    struct BrokenSource;

    impl EnvironmentSource for BrokenSource {
        fn uri(&self) -> String {
            "missing.hdr".into()
        }

        fn load(self: Box<Self>) -> Result<EquirectImage> {
            Err(VitrineError::ImageDecodeError("truncated".into()))
        }
    }

    #[test]
    fn pair_is_baked_per_renderer() {
        let (hero, detail) = backends();
        let mut store = EnvironmentStore::new(Spawner::Inline);
        assert!(store.environment_for(ViewKind::Hero).is_none());

        store.begin_load(sky());
        assert_eq!(store.poll(&hero, &detail), LoadProgress::Completed);
        assert_eq!(store.poll(&hero, &detail), LoadProgress::Settled);

        let pair = store.pair().unwrap();
        assert_ne!(pair.hero.id(), pair.detail.id());
        assert_eq!(pair.hero.owner(), RendererId(1));
        assert_eq!(pair.detail.owner(), RendererId(2));
        assert!(!pair.hero.pipeline().alpha);
        assert!(pair.detail.pipeline().alpha);
        assert!(Rc::ptr_eq(&store.environment_for(ViewKind::Detail).unwrap(), &pair.detail));
    }

    #[test]
    fn continuation_runs_once_after_decode() {
        let (hero, detail) = backends();
        let (release_tx, release_rx) = flume::bounded::<()>(0);

        struct GatedSource(flume::Receiver<()>);
        impl EnvironmentSource for GatedSource {
            fn uri(&self) -> String {
                "gated.hdr".into()
            }
            fn load(self: Box<Self>) -> Result<EquirectImage> {
                self.0.recv().ok();
                Ok(EquirectImage::from_fn(4, 2, |_, _| Vec3::ONE))
            }
        }

        let calls = Rc::new(Cell::new(0));
        let ids = Rc::new(Cell::new(None));
        let mut store = EnvironmentStore::new(Spawner::Thread);
        {
            let calls = Rc::clone(&calls);
            let ids = Rc::clone(&ids);
            store.on_loaded(move |pair| {
                calls.set(calls.get() + 1);
                ids.set(Some((pair.hero.id(), pair.detail.id())));
            });
        }
        store.begin_load(Box::new(GatedSource(release_rx)));

        for _ in 0..3 {
            assert_eq!(store.poll(&hero, &detail), LoadProgress::Pending);
        }
        assert_eq!(calls.get(), 0);

        release_tx.send(()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while store.poll(&hero, &detail) != LoadProgress::Completed {
            assert!(Instant::now() < deadline, "environment never arrived");
            std::thread::sleep(Duration::from_millis(1));
        }
        for _ in 0..3 {
            store.poll(&hero, &detail);
        }

        assert_eq!(calls.get(), 1);
        let (hero_id, detail_id) = ids.get().unwrap();
        assert_ne!(hero_id, detail_id);
    }

    #[test]
    fn failed_load_never_runs_continuation() {
        let (hero, detail) = backends();
        let ran = Rc::new(Cell::new(false));
        let mut store = EnvironmentStore::new(Spawner::Inline);
        {
            let ran = Rc::clone(&ran);
            store.on_loaded(move |_| ran.set(true));
        }
        store.begin_load(Box::new(BrokenSource));

        assert_eq!(store.poll(&hero, &detail), LoadProgress::Failed);
        assert_eq!(store.poll(&hero, &detail), LoadProgress::Settled);
        assert!(!ran.get());
        assert!(!store.is_ready());
        assert!(store.environment_for(ViewKind::Hero).is_none());
    }

    #[test]
    fn malformed_image_fails_the_load() {
        struct RaggedSource;
        impl EnvironmentSource for RaggedSource {
            fn uri(&self) -> String {
                "ragged.hdr".into()
            }
            fn load(self: Box<Self>) -> Result<EquirectImage> {
                Ok(EquirectImage {
                    width: 4,
                    height: 4,
                    texels: vec![Vec3::ONE; 3],
                })
            }
        }

        let (hero, detail) = backends();
        let mut store = EnvironmentStore::new(Spawner::Inline);
        store.begin_load(Box::new(RaggedSource));

        assert_eq!(store.poll(&hero, &detail), LoadProgress::Failed);
        assert!(!store.is_ready());
    }
}
