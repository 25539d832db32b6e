//! Scene graph: nodes, cameras, lights, meshes and the lighting environment.

pub mod background;
pub mod camera;
pub mod environment;
pub mod light;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
}

pub use background::Color;
pub use camera::{Camera, RenderCamera};
pub use environment::{EnvironmentId, EnvironmentLevel, EnvironmentMap};
pub use light::{Light, LightKind, ShadowConfig};
pub use mesh::{Geometry, Material, Mesh, Shading};
pub use node::{Node, NodeKind};
pub use scene::Scene;
pub use transform::Transform;
