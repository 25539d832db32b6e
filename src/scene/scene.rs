use std::rc::Rc;

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeKey;
use crate::scene::background::Color;
use crate::scene::camera::{Camera, RenderCamera};
use crate::scene::environment::{EnvironmentId, EnvironmentMap};
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::{Node, NodeKind};
use crate::scene::transform::Transform;

/// Scene graph
///
/// The single shared graph both viewports draw. It is pure data: loaders add
/// nodes when their assets arrive and the per-frame controllers move lights
/// and cameras between frames.
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    root_nodes: Vec<NodeKey>,

    pub background: Color,
    /// Lighting environment for the renderer about to draw. `None` until the
    /// environment load completes (and forever if it fails).
    pub environment: Option<Rc<EnvironmentMap>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            background: Color::BLACK,
            environment: None,
        }
    }

    /// Adds a node at the root of the graph.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.root_nodes.push(key);
        key
    }

    /// Adds a node under `parent`. A stale parent key places the node at the root.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeKey) -> NodeKey {
        if !self.nodes.contains_key(parent) {
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let key = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }
        key
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let parent = node.parent;

        for child in self.subtree(key) {
            self.nodes.remove(child);
        }

        if let Some(parent_key) = parent {
            if let Some(p) = self.nodes.get_mut(parent_key) {
                p.children.retain(|&c| c != key);
            }
        } else {
            self.root_nodes.retain(|&r| r != key);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn transform(&self, key: NodeKey) -> Option<&Transform> {
        self.nodes.get(key).map(|n| &n.transform)
    }

    pub fn transform_mut(&mut self, key: NodeKey) -> Option<&mut Transform> {
        self.nodes.get_mut(key).map(|n| &mut n.transform)
    }

    #[must_use]
    pub fn camera(&self, key: NodeKey) -> Option<&Camera> {
        self.nodes.get(key).and_then(Node::camera)
    }

    pub fn camera_mut(&mut self, key: NodeKey) -> Option<&mut Camera> {
        match self.nodes.get_mut(key).map(|n| &mut n.kind) {
            Some(NodeKind::Camera(cam)) => Some(cam),
            _ => None,
        }
    }

    #[must_use]
    pub fn light(&self, key: NodeKey) -> Option<&Light> {
        self.nodes.get(key).and_then(Node::light)
    }

    pub fn mesh_mut(&mut self, key: NodeKey) -> Option<&mut Mesh> {
        match self.nodes.get_mut(key).map(|n| &mut n.kind) {
            Some(NodeKind::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find_map(|(key, node)| (node.name == name).then_some(key))
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeKey] {
        &self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// `key` followed by all of its descendants, depth first.
    #[must_use]
    pub fn subtree(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn meshes(&self) -> impl Iterator<Item = (NodeKey, &Mesh)> {
        self.nodes
            .iter()
            .filter_map(|(key, node)| node.mesh().map(|m| (key, m)))
    }

    pub fn lights(&self) -> impl Iterator<Item = (NodeKey, &Light)> {
        self.nodes
            .iter()
            .filter_map(|(key, node)| node.light().map(|l| (key, l)))
    }

    /// Composes local matrices from the root down to `key`.
    #[must_use]
    pub fn world_matrix(&self, key: NodeKey) -> Option<Affine3A> {
        let mut node = self.nodes.get(key)?;
        let mut world = node.transform.local_matrix();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            world = parent.transform.local_matrix() * world;
            node = parent;
        }
        Some(world)
    }

    /// Extracts the camera stored at `key`, placed by its world transform.
    #[must_use]
    pub fn render_camera(&self, key: NodeKey) -> Option<RenderCamera> {
        let camera = self.camera(key)?;
        let world = self.world_matrix(key)?;
        Some(camera.extract_render_camera(&world))
    }

    pub fn set_environment(&mut self, environment: Option<Rc<EnvironmentMap>>) {
        self.environment = environment;
    }

    #[must_use]
    pub fn environment_id(&self) -> Option<EnvironmentId> {
        self.environment.as_ref().map(|env| env.id())
    }
}
