//! Asset loading: background loaders, image/model sources and load tracking.

pub mod loader;
pub mod model;
pub mod source;
pub mod tracker;

pub use loader::{AssetLoader, LoadPoll, Spawner};
pub use model::{ModelAsset, ModelMesh, ModelSource, StaticModelSource, insert_model};
pub use source::{EnvironmentSource, EquirectImage, HdrFileSource, MemoryEnvironmentSource};
pub use tracker::LoadingTracker;
