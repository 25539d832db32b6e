#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod compositor;
pub mod errors;
pub mod input;
pub mod parallax;
pub mod platform;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod settings;
pub mod showcase;
pub mod utils;
pub mod visibility;

pub use animation::{DetailCameraAnimator, Easing, IntroAnimation, Tween};
pub use assets::{EnvironmentSource, EquirectImage, ModelAsset, ModelSource, Spawner};
pub use compositor::{FrameOutcome, FrameReport, SceneCompositor, SceneRig, Stage};
pub use errors::{Result, VitrineError};
pub use input::InputState;
pub use parallax::ParallaxDriver;
pub use platform::{PageSignal, PlatformEvent};
pub use render::{
    ColorPipeline, EnvironmentStore, HeadlessBackend, LoadProgress, RenderBackend, RendererId,
    ViewKind, Viewport,
};
pub use scene::{Camera, Light, Node, Scene};
pub use scheduler::{FixedRateScheduler, FrameScheduler, ManualScheduler};
pub use settings::ShowcaseSettings;
pub use showcase::Showcase;
pub use utils::time::{Clock, SystemClock, VirtualClock};
pub use visibility::{VisibilityFlag, VisibilityGate};
