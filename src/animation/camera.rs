//! Detail camera transitions.
//!
//! Selecting a product tweens the detail camera's position and rotation
//! toward that product's preset. A selection made mid-flight restarts both
//! tweens from wherever the camera currently is; the earlier target is
//! abandoned, never queued.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::animation::tween::{Easing, Tween};
use crate::errors::{Result, VitrineError};
use crate::scene::Transform;
use crate::settings::ProductPreset;

#[derive(Debug, Clone)]
struct Transition {
    product: String,
    position: Tween<Vec3>,
    rotation: Tween<Vec3>,
}

#[derive(Debug, Clone)]
pub struct DetailCameraAnimator {
    presets: FxHashMap<String, ProductPreset>,
    duration: f32,
    easing: Easing,
    transition: Option<Transition>,
    selected: Option<String>,
}

impl DetailCameraAnimator {
    #[must_use]
    pub fn new(presets: &[ProductPreset], duration: f32) -> Self {
        let presets = presets
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        Self {
            presets,
            duration,
            easing: Easing::Power2InOut,
            transition: None,
            selected: None,
        }
    }

    #[must_use]
    pub fn preset(&self, id: &str) -> Option<&ProductPreset> {
        self.presets.get(id)
    }

    /// Starts the transition to `id` from `current`.
    ///
    /// Replaces any running transition. Unknown ids leave the animator as it was.
    pub fn select(&mut self, id: &str, current: &Transform) -> Result<&ProductPreset> {
        let preset = self
            .presets
            .get(id)
            .ok_or_else(|| VitrineError::UnknownProduct(id.to_string()))?;

        if let Some(previous) = &self.transition {
            log::debug!("Detail camera: '{}' interrupted by '{id}'", previous.product);
        }
        self.transition = Some(Transition {
            product: id.to_string(),
            position: Tween::new(current.position, preset.position, self.duration, self.easing),
            rotation: Tween::new(current.rotation, preset.rotation, self.duration, self.easing),
        });
        self.selected = Some(id.to_string());
        Ok(preset)
    }

    /// Advances the running transition and writes the camera transform.
    /// Returns `true` while a transition is still in flight.
    pub fn update(&mut self, dt: f32, camera: &mut Transform) -> bool {
        let Some(transition) = &mut self.transition else {
            return false;
        };
        camera.position = transition.position.advance(dt);
        camera.rotation = transition.rotation.advance(dt);

        if transition.position.is_finished() && transition.rotation.is_finished() {
            log::debug!("Detail camera arrived at '{}'", transition.product);
            self.transition = None;
            return false;
        }
        true
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// The most recently selected product.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShowcaseSettings;

    fn animator() -> DetailCameraAnimator {
        let settings = ShowcaseSettings::default();
        DetailCameraAnimator::new(&settings.products, settings.animation.detail_duration)
    }

    #[test]
    fn reaches_preset_after_duration() {
        let mut anim = animator();
        let mut camera = Transform::from_position(Vec3::new(2.0, 2.0, 2.0));
        anim.select("product1", &camera).unwrap();

        let mut steps = 0;
        while anim.update(0.1, &mut camera) {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(camera.position, Vec3::new(-1.0, 2.0, 1.5));
        assert_eq!(camera.rotation, Vec3::new(0.0, -0.1, 0.0));
        assert_eq!(anim.selected(), Some("product1"));
    }

    #[test]
    fn unknown_product_keeps_running_transition() {
        let mut anim = animator();
        let camera = Transform::new();
        anim.select("product2", &camera).unwrap();
        let err = anim.select("product9", &camera).unwrap_err();
        assert!(matches!(err, VitrineError::UnknownProduct(id) if id == "product9"));
        assert_eq!(anim.selected(), Some("product2"));
        assert!(anim.is_animating());
    }
}
