use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Quadratic ease-in-out.
    #[default]
    Power2InOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power2InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

pub trait Lerp: Copy {
    fn lerp(start: Self, end: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

/// A one-shot interpolation from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    #[must_use]
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`. A zero-length tween is always complete.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    #[must_use]
    pub fn value(&self) -> T {
        T::lerp(self.from, self.to, self.easing.apply(self.progress()))
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> T {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power2_in_out_is_symmetric() {
        let e = Easing::Power2InOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.5);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-6);
        assert!(e.apply(0.25) < 0.25);
    }

    #[test]
    fn tween_stops_at_target() {
        let mut tween = Tween::new(Vec3::ZERO, Vec3::X, 1.0, Easing::Linear);
        assert_eq!(tween.advance(0.5), Vec3::new(0.5, 0.0, 0.0));
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(10.0), Vec3::X);
        assert!(tween.is_finished());
    }

    #[test]
    fn zero_duration_jumps() {
        let tween = Tween::new(1.0_f32, 3.0, 0.0, Easing::Power2InOut);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 3.0);
    }
}
