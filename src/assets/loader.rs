//! Fire-and-forget asset loading.
//!
//! A load runs on a [`Spawner`] and hands its result back through a `flume`
//! channel. The loop thread observes it with [`AssetLoader::poll`], so every
//! completion is applied on that thread, between frames, and never before the
//! worker has finished decoding.

use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, TryRecvError};

use crate::errors::{Result, VitrineError};

/// Where load jobs execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spawner {
    /// A named background thread per job.
    #[default]
    Thread,
    /// Immediately on the calling thread (the result is still only observed by `poll`).
    Inline,
}

impl Spawner {
    pub fn spawn<F>(self, name: &str, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Self::Thread => {
                // On failure the job is dropped with its sender; the loader
                // then reports a disconnect.
                if let Err(err) = std::thread::Builder::new()
                    .name(format!("load:{name}"))
                    .spawn(job)
                {
                    log::error!("Failed to spawn loader thread for '{name}': {err}");
                }
            }
            Self::Inline => job(),
        }
    }
}

/// Outcome of one [`AssetLoader::poll`].
#[derive(Debug)]
pub enum LoadPoll<T> {
    /// Nothing was ever started.
    Idle,
    Pending,
    Loaded(T),
    Failed(VitrineError),
    /// The result was already handed out by an earlier poll.
    Settled,
}

enum State<T> {
    Idle,
    Pending(Receiver<Result<T>>),
    Settled,
}

pub struct AssetLoader<T> {
    label: String,
    spawner: Spawner,
    state: State<T>,
}

impl<T: Send + 'static> AssetLoader<T> {
    #[must_use]
    pub fn new(label: impl Into<String>, spawner: Spawner) -> Self {
        Self {
            label: label.into(),
            spawner,
            state: State::Idle,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Starts the load. A loader runs at most once; later calls are ignored.
    pub fn begin<F>(&mut self, load: F)
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        if !matches!(self.state, State::Idle) {
            log::warn!("Load '{}' already started, ignoring", self.label);
            return;
        }
        let (tx, rx) = flume::bounded(1);
        log::debug!("Begin load '{}'", self.label);
        self.spawner.spawn(&self.label, move || {
            // The receiver is gone only if the loader itself was dropped.
            let _ = tx.send(load());
        });
        self.state = State::Pending(rx);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.state, State::Settled)
    }

    /// Non-blocking check for a result.
    pub fn poll(&mut self) -> LoadPoll<T> {
        let received = match &self.state {
            State::Idle => return LoadPoll::Idle,
            State::Settled => return LoadPoll::Settled,
            State::Pending(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return LoadPoll::Pending,
                Err(TryRecvError::Disconnected) => {
                    Err(VitrineError::LoaderDisconnected(self.label.clone()))
                }
            },
        };
        self.settle(received)
    }

    /// Like [`poll`](Self::poll), but blocks up to `timeout` for the worker.
    pub fn wait_timeout(&mut self, timeout: Duration) -> LoadPoll<T> {
        let received = match &self.state {
            State::Idle => return LoadPoll::Idle,
            State::Settled => return LoadPoll::Settled,
            State::Pending(rx) => match rx.recv_timeout(timeout) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => return LoadPoll::Pending,
                Err(RecvTimeoutError::Disconnected) => {
                    Err(VitrineError::LoaderDisconnected(self.label.clone()))
                }
            },
        };
        self.settle(received)
    }

    fn settle(&mut self, received: Result<T>) -> LoadPoll<T> {
        self.state = State::Settled;
        match received {
            Ok(value) => {
                log::info!("Loaded '{}'", self.label);
                LoadPoll::Loaded(value)
            }
            Err(err) => {
                log::warn!("Load '{}' failed: {err}", self.label);
                LoadPoll::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_result_is_observed_once() {
        let mut loader = AssetLoader::new("answer", Spawner::Inline);
        assert!(matches!(loader.poll(), LoadPoll::Idle));

        loader.begin(|| Ok(42));
        assert!(matches!(loader.poll(), LoadPoll::Loaded(42)));
        assert!(matches!(loader.poll(), LoadPoll::Settled));
        assert!(loader.is_settled());
    }

    #[test]
    fn failure_settles_the_loader() {
        let mut loader: AssetLoader<u32> = AssetLoader::new("broken", Spawner::Inline);
        loader.begin(|| Err(VitrineError::ImageDecodeError("bad header".into())));
        assert!(matches!(loader.poll(), LoadPoll::Failed(VitrineError::ImageDecodeError(_))));
        assert!(matches!(loader.poll(), LoadPoll::Settled));
    }

    #[test]
    fn second_begin_is_ignored() {
        let mut loader = AssetLoader::new("once", Spawner::Inline);
        loader.begin(|| Ok(1));
        loader.begin(|| Ok(2));
        assert!(matches!(loader.poll(), LoadPoll::Loaded(1)));
    }

    #[test]
    fn thread_result_arrives_after_worker_finishes() {
        let (release_tx, release_rx) = flume::bounded::<()>(0);
        let mut loader = AssetLoader::new("gated", Spawner::Thread);
        loader.begin(move || {
            release_rx.recv().ok();
            Ok("decoded")
        });

        assert!(matches!(loader.poll(), LoadPoll::Pending));
        release_tx.send(()).unwrap();
        assert!(matches!(
            loader.wait_timeout(Duration::from_secs(5)),
            LoadPoll::Loaded("decoded")
        ));
    }
}
