//! Frame scheduling.
//!
//! The showcase renders one frame per scheduler callback and asks for the
//! next one at the end of every frame, including frames whose render failed.

use std::time::{Duration, Instant};

pub trait FrameScheduler {
    /// Requests another frame.
    fn schedule_next(&mut self);

    /// Blocks (if needed) until the next requested frame is due. Returns
    /// `false` when no frame has been requested or the scheduler is done.
    fn next_frame(&mut self) -> bool;
}

/// Hands out frames only when the caller asks. Deterministic; used by tests
/// and hosts that own their own loop.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    requested: bool,
    scheduled: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `schedule_next` calls so far.
    #[must_use]
    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Consumes the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) {
        self.requested = true;
        self.scheduled += 1;
    }

    fn next_frame(&mut self) -> bool {
        self.take()
    }
}

/// Paces frames at a fixed interval by sleeping the calling thread.
#[derive(Debug)]
pub struct FixedRateScheduler {
    interval: Duration,
    frame_limit: Option<u64>,
    frames: u64,
    requested: bool,
    next_due: Option<Instant>,
}

impl FixedRateScheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frame_limit: None,
            frames: 0,
            requested: true,
            next_due: None,
        }
    }

    /// Paces at `fps` frames per second. Non-positive rates fall back to 60.
    #[must_use]
    pub fn with_fps(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self::new(Duration::from_secs_f32(1.0 / fps))
    }

    /// Stops after `limit` frames.
    #[must_use]
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn schedule_next(&mut self) {
        self.requested = true;
    }

    fn next_frame(&mut self) -> bool {
        if !std::mem::take(&mut self.requested) {
            return false;
        }
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return false;
        }

        let now = Instant::now();
        if let Some(due) = self.next_due
            && due > now
        {
            std::thread::sleep(due - now);
        }
        self.next_due = Some(Instant::now() + self.interval);
        self.frames += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_frames_require_a_request() {
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.next_frame());
        scheduler.schedule_next();
        scheduler.schedule_next();
        assert!(scheduler.next_frame());
        assert!(!scheduler.next_frame());
        assert_eq!(scheduler.scheduled(), 2);
    }

    #[test]
    fn fixed_rate_honours_frame_limit() {
        let mut scheduler = FixedRateScheduler::new(Duration::ZERO).with_frame_limit(3);
        let mut frames = 0;
        while scheduler.next_frame() {
            frames += 1;
            scheduler.schedule_next();
        }
        assert_eq!(frames, 3);
        assert_eq!(scheduler.frames(), 3);
    }
}
