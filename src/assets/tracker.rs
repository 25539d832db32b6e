/// Counts outstanding loads and reports the moment all of them have settled.
///
/// A failed load settles too, so the page is revealed even when an asset is
/// missing.
#[derive(Debug, Default)]
pub struct LoadingTracker {
    total: usize,
    settled: usize,
    failed: usize,
    fired: bool,
}

impl LoadingTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) {
        self.total += 1;
    }

    /// Marks one load finished. Returns `true` exactly once: on the call
    /// that settles the last registered load.
    pub fn settle(&mut self, succeeded: bool) -> bool {
        if self.settled < self.total {
            self.settled += 1;
            if !succeeded {
                self.failed += 1;
            }
        }
        if !self.fired && self.total > 0 && self.settled == self.total {
            self.fired = true;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fired
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }
}
