use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source, in seconds since the source was created.
pub trait Clock {
    fn elapsed(&self) -> f32;
}

/// Wall clock backed by [`Instant`].
pub struct SystemClock {
    start_time: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

/// Manually advanced clock for deterministic frame stepping.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the compositor.
#[derive(Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<f32>>,
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f32) {
        self.now.set(self.now.get() + seconds.max(0.0));
    }

    pub fn set(&self, seconds: f32) {
        self.now.set(seconds);
    }
}

impl Clock for VirtualClock {
    fn elapsed(&self) -> f32 {
        self.now.get()
    }
}

/// Elapsed and delta time of a single frame, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub delta: f32,
}

/// Turns a [`Clock`] into per-frame timing.
pub struct Timer {
    clock: Box<dyn Clock>,
    previous: f32,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Timer {
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        let previous = clock.elapsed();
        Self {
            clock,
            previous,
            frame_count: 0,
        }
    }

    /// Samples the clock once. Delta is never negative, even if the source
    /// steps backwards.
    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.clock.elapsed();
        let delta = (elapsed - self.previous).max(0.0);
        self.previous = elapsed;
        self.frame_count += 1;
        FrameTime { elapsed, delta }
    }
}
