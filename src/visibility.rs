//! Scroll visibility of the product section.
//!
//! The host's intersection observer reports the ratio of the marker element
//! that is on screen. The gate turns it into the flag the compositor reads
//! once per frame. Last value wins; there is no debouncing or hysteresis.

/// Which view the next frame renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityFlag {
    /// Hero view.
    #[default]
    Inactive,
    /// Detail view.
    Active,
}

impl VisibilityFlag {
    #[inline]
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

pub const DEFAULT_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct VisibilityGate {
    threshold: f32,
    flag: VisibilityFlag,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl VisibilityGate {
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            flag: VisibilityFlag::Inactive,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Stores `ratio > threshold`. A non-finite ratio counts as not visible.
    pub fn observe(&mut self, ratio: f32) -> VisibilityFlag {
        let next = if ratio > self.threshold {
            VisibilityFlag::Active
        } else {
            VisibilityFlag::Inactive
        };
        if next != self.flag {
            log::debug!("Visibility {:?} -> {next:?} (ratio {ratio})", self.flag);
            self.flag = next;
        }
        next
    }

    #[inline]
    #[must_use]
    pub fn flag(&self) -> VisibilityFlag {
        self.flag
    }
}
