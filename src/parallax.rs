//! Hero parallax
//!
//! The cursor pulls the fill light and the camera rig toward targets derived
//! from it. Each component follows its target with frame-rate independent
//! exponential smoothing:
//!
//! ```text
//! value += (target - value) * (1 - exp(-rate * dt))
//! ```
//!
//! The blend factor stays in `[0, 1)` for every `dt >= 0`, so a long stall
//! can never overshoot the target.

use glam::{Vec2, Vec3};

use crate::settings::ParallaxSettings;

/// Blend factor for one step of exponential smoothing.
#[inline]
#[must_use]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    if !(dt.is_finite() && dt > 0.0) || rate <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

#[inline]
fn approach(value: &mut f32, target: f32, factor: f32) {
    *value += (target - *value) * factor;
}

#[derive(Debug, Clone)]
pub struct ParallaxDriver {
    settings: ParallaxSettings,
}

impl ParallaxDriver {
    #[must_use]
    pub fn new(settings: &ParallaxSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    /// Where the fill light is heading for `cursor`.
    #[must_use]
    pub fn light_target(&self, cursor: Vec2) -> Vec3 {
        let s = &self.settings;
        Vec3::new(
            s.light_x_scale * cursor.x,
            s.light_base_height - s.light_y_scale * cursor.y,
            s.light_depth,
        )
    }

    /// Where the camera rig is heading for `cursor` (Y is left alone).
    #[must_use]
    pub fn rig_target(&self, cursor: Vec2) -> Vec2 {
        let s = &self.settings;
        Vec2::new(s.rig_scale * cursor.x, -s.rig_scale * cursor.y)
    }

    /// Advances both the fill light and the rig by `dt` seconds.
    pub fn update(&self, cursor: Vec2, dt: f32, light: &mut Vec3, rig: &mut Vec3) {
        let s = &self.settings;
        let light_target = self.light_target(cursor);
        let rig_target = self.rig_target(cursor);

        approach(&mut light.x, light_target.x, smoothing_factor(s.light_x_rate, dt));
        approach(&mut light.y, light_target.y, smoothing_factor(s.light_y_rate, dt));
        approach(&mut light.z, light_target.z, smoothing_factor(s.light_z_rate, dt));

        approach(&mut rig.x, rig_target.x, smoothing_factor(s.rig_x_rate, dt));
        approach(&mut rig.z, rig_target.y, smoothing_factor(s.rig_z_rate, dt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_is_bounded() {
        assert_eq!(smoothing_factor(2.0, 0.0), 0.0);
        assert_eq!(smoothing_factor(2.0, -1.0), 0.0);
        assert_eq!(smoothing_factor(2.0, f32::NAN), 0.0);
        let f = smoothing_factor(2.0, 1.0e6);
        assert!((0.0..=1.0).contains(&f));
    }

    #[test]
    fn centered_cursor_settles_at_rest_pose() {
        let driver = ParallaxDriver::new(&ParallaxSettings::default());
        let mut light = Vec3::new(0.0, 3.0, 3.0);
        let mut rig = Vec3::new(1.0, 0.0, -1.0);
        for _ in 0..2000 {
            driver.update(Vec2::ZERO, 1.0 / 60.0, &mut light, &mut rig);
        }
        assert!((light - Vec3::new(0.0, 2.0, 1.8)).length() < 1e-3);
        assert!(rig.x.abs() < 1e-3 && rig.z.abs() < 1e-3);
        assert_eq!(rig.y, 0.0);
    }

    #[test]
    fn targets_follow_cursor() {
        let driver = ParallaxDriver::new(&ParallaxSettings::default());
        let cursor = Vec2::new(0.5, -0.5);
        assert_eq!(driver.light_target(cursor), Vec3::new(4.0, 6.5, 1.8));
        let rig = driver.rig_target(cursor);
        assert!((rig - Vec2::new(1.0 / 6.0, 1.0 / 6.0)).length() < 1e-6);
    }
}
