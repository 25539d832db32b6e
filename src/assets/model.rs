//! Product model
//!
//! Decoding the compressed model file belongs to an external loader; it
//! delivers a [`ModelAsset`] (named meshes with their authored materials).
//! [`insert_model`] adapts that asset for the showcase and adds it to the scene.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::errors::Result;
use crate::scene::{Color, Geometry, Material, Mesh, Node, NodeKey, NodeKind, Scene, Transform};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    pub name: String,
    pub material: Material,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelAsset {
    pub name: String,
    pub meshes: Vec<ModelMesh>,
}

/// Something that yields the decoded model. `load` runs on a loader thread.
pub trait ModelSource: Send + 'static {
    fn uri(&self) -> String;

    fn load(self: Box<Self>) -> Result<ModelAsset>;
}

/// A model that is already in memory.
pub struct StaticModelSource {
    uri: String,
    asset: ModelAsset,
}

impl StaticModelSource {
    #[must_use]
    pub fn new(uri: impl Into<String>, asset: ModelAsset) -> Self {
        Self {
            uri: uri.into(),
            asset,
        }
    }
}

impl ModelSource for StaticModelSource {
    fn uri(&self) -> String {
        self.uri.clone()
    }

    fn load(self: Box<Self>) -> Result<ModelAsset> {
        Ok(self.asset)
    }
}

/// Height the model rests at (just above the shadow plane).
pub const MODEL_HEIGHT: f32 = 1.85;
pub const REFLECTION_BOOST: f32 = 1.5;

fn apply_glass(material: &mut Material) {
    material.transmission = 1.0;
    material.color = Color::from_hex(0xeeeeee);
    material.roughness = 0.05;
    material.ior = 1.52;
    material.transparent = true;
    material.thickness = 0.01;
}

/// Adds `asset` under a new group node and returns that node.
///
/// Every mesh casts and receives shadows and gets boosted reflections; meshes
/// named in `glass_meshes` become clear glass.
pub fn insert_model(scene: &mut Scene, asset: ModelAsset, glass_meshes: &[String]) -> NodeKey {
    let root_transform = Transform::from_position(Vec3::new(0.0, MODEL_HEIGHT, 0.0))
        .with_rotation(Vec3::new(0.0, -FRAC_PI_2, 0.0));
    let name = if asset.name.is_empty() {
        "model".to_string()
    } else {
        asset.name
    };
    let root = scene.add_node(Node::new(name, NodeKind::Group).with_transform(root_transform));

    for mesh in asset.meshes {
        let mut material = mesh.material;
        if glass_meshes.iter().any(|g| *g == mesh.name) {
            apply_glass(&mut material);
        }
        material.env_map_intensity = REFLECTION_BOOST;

        let mut m = Mesh::new(Geometry::Imported(mesh.name.clone()), material);
        m.cast_shadow = true;
        m.receive_shadow = true;

        scene.add_to_parent(
            Node::new(mesh.name, NodeKind::Mesh(m)).with_transform(mesh.transform),
            root,
        );
    }

    root
}
