//! Time-based camera animation: eased tweens, the detail camera transitions
//! and the intro flight of the hero camera.

pub mod camera;
pub mod intro;
pub mod tween;

pub use camera::DetailCameraAnimator;
pub use intro::IntroAnimation;
pub use tween::{Easing, Lerp, Tween};
