//! Intro flight of the hero camera, played once when loading completes.

use glam::Vec3;
use smallvec::SmallVec;

use crate::animation::tween::{Easing, Tween};
use crate::platform::PageSignal;
use crate::scene::Transform;
use crate::settings::AnimationSettings;

#[derive(Debug, Clone)]
struct Cue {
    at: f32,
    signal: PageSignal,
    fired: bool,
}

#[derive(Debug, Clone)]
pub struct IntroAnimation {
    start_rotation: Vec3,
    position: Tween<Vec3>,
    cues: SmallVec<[Cue; 2]>,
    elapsed: f32,
}

impl IntroAnimation {
    #[must_use]
    pub fn new(settings: &AnimationSettings) -> Self {
        let cues = [
            (settings.reveal_intro_delay, PageSignal::RevealIntro),
            (settings.reveal_header_delay, PageSignal::RevealHeader),
        ]
        .into_iter()
        .map(|(at, signal)| Cue {
            at,
            signal,
            fired: false,
        })
        .collect();

        Self {
            start_rotation: settings.intro_start_rotation,
            position: Tween::new(
                settings.intro_start_position,
                settings.intro_end_position,
                settings.intro_duration,
                Easing::Power2InOut,
            ),
            cues,
            elapsed: 0.0,
        }
    }

    /// Puts the camera at the first pose of the flight.
    pub fn begin(&self, camera: &mut Transform) {
        camera.rotation = self.start_rotation;
        camera.position = self.position.value();
    }

    /// Moves the camera and returns the page cues that came due.
    pub fn update(&mut self, dt: f32, camera: &mut Transform) -> SmallVec<[PageSignal; 2]> {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        camera.position = self.position.advance(dt);

        let mut due = SmallVec::new();
        for cue in &mut self.cues {
            if !cue.fired && self.elapsed >= cue.at {
                cue.fired = true;
                due.push(cue.signal.clone());
            }
        }
        due
    }

    /// Flight landed and every cue fired.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position.is_finished() && self.cues.iter().all(|c| c.fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_fire_once_in_order() {
        let mut intro = IntroAnimation::new(&AnimationSettings::default());
        let mut camera = Transform::new();
        intro.begin(&mut camera);
        assert_eq!(camera.position, Vec3::new(0.0, 3.5, 5.0));
        assert_eq!(camera.rotation, Vec3::new(-0.25, 0.0, 0.0));

        assert!(intro.update(0.4, &mut camera).is_empty());
        assert_eq!(intro.update(0.2, &mut camera).as_slice(), &[PageSignal::RevealIntro]);
        assert_eq!(intro.update(0.5, &mut camera).as_slice(), &[PageSignal::RevealHeader]);
        assert!(intro.update(0.5, &mut camera).is_empty());
        assert!(!intro.is_finished());

        intro.update(5.0, &mut camera);
        assert!(intro.is_finished());
        assert_eq!(camera.position, Vec3::new(0.0, 2.6, 2.25));
    }
}
