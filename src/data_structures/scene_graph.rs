//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] owns the shared resources (geometries, materials, lights) and
//! a tree of [`SceneNode`]s. Nodes reference geometry and material through
//! [`GeometryId`] / [`MaterialId`] handles, so any number of meshes can share
//! one shape or one surface without copying vertex data.

use std::fmt::Debug;

use crate::{
    color::Color,
    data_structures::{
        geometry::{Geometry, LineVertex, axes_lines},
        instance::Instance,
        light::Light,
        material::Material,
    },
};

/// Handle of a geometry stored in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(usize);

/// Handle of a material stored in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(usize);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// State every node carries: a name, its transforms and its children.
///
/// `local` is relative to the parent, `world` is resolved by
/// [`SceneNode::update_world_transforms`].
#[derive(Debug, Default)]
pub struct NodeBase {
    pub name: String,
    pub local: Instance,
    pub world: Instance,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl NodeBase {
    pub fn new(name: &str, local: Instance) -> Self {
        Self {
            name: name.to_string(),
            world: local.clone(),
            local,
            children: Vec::new(),
        }
    }
}

pub trait SceneNode {
    fn base(&self) -> &NodeBase;

    fn base_mut(&mut self) -> &mut NodeBase;

    fn as_mesh(&self) -> Option<&MeshNode> {
        None
    }

    fn as_axes(&self) -> Option<&AxesNode> {
        None
    }

    fn name(&self) -> &str {
        &self.base().name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.base().local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.base_mut().local = instance;
    }

    fn get_world_transform(&self) -> &Instance {
        &self.base().world
    }

    fn get_children(&self) -> &[Box<dyn SceneNode>] {
        &self.base().children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.base_mut().children.push(child);
    }

    /// Resolve this node's and all descendants' world transforms.
    fn update_world_transforms(&mut self, parents_world_transform: &Instance) {
        let base = self.base_mut();
        base.world = parents_world_transform * &base.local;
        let world = base.world.clone();
        for child in base.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    /// Push every mesh in this subtree onto `out`, parents before children.
    fn collect_meshes<'a>(&'a self, out: &mut Vec<&'a MeshNode>) {
        if let Some(mesh) = self.as_mesh() {
            out.push(mesh);
        }
        for child in self.get_children() {
            child.collect_meshes(out);
        }
    }
}

fn find_in<'a>(nodes: &'a [Box<dyn SceneNode>], name: &str) -> Option<&'a dyn SceneNode> {
    nodes.iter().find_map(|node| {
        if node.name() == name {
            Some(node.as_ref())
        } else {
            find_in(node.get_children(), name)
        }
    })
}

impl Debug for dyn SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name())
            .field("children", &self.get_children())
            .finish()
    }
}

/// Node without any drawable content, used to group and move children together.
#[derive(Debug)]
pub struct ContainerNode {
    base: NodeBase,
}

impl ContainerNode {
    pub fn new(name: &str) -> Self {
        Self {
            base: NodeBase::new(name, Instance::default()),
        }
    }
}

impl SceneNode for ContainerNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

/// One placed copy of a geometry rendered with a material.
#[derive(Debug)]
pub struct MeshNode {
    base: NodeBase,
    pub geometry: GeometryId,
    pub material: MaterialId,
}

impl MeshNode {
    pub fn new(name: &str, geometry: GeometryId, material: MaterialId, local: Instance) -> Self {
        Self {
            base: NodeBase::new(name, local),
            geometry,
            material,
        }
    }

    pub fn local(&self) -> &Instance {
        &self.base.local
    }

    pub fn world(&self) -> &Instance {
        &self.base.world
    }
}

impl SceneNode for MeshNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn as_mesh(&self) -> Option<&MeshNode> {
        Some(self)
    }
}

/// Debug helper drawing the x, y and z axes from the origin.
#[derive(Debug)]
pub struct AxesNode {
    base: NodeBase,
    pub size: f32,
}

impl AxesNode {
    pub fn new(size: f32) -> Self {
        Self {
            base: NodeBase::new("axes", Instance::default()),
            size,
        }
    }

    pub fn vertices(&self) -> Vec<LineVertex> {
        axes_lines(self.size)
    }
}

impl SceneNode for AxesNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn as_axes(&self) -> Option<&AxesNode> {
        Some(self)
    }
}

/// Root of the scene graph plus the resources its nodes refer to.
#[derive(Debug)]
pub struct Scene {
    pub background: Color,
    lights: Vec<Light>,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    children: Vec<Box<dyn SceneNode>>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            lights: Vec::new(),
            geometries: Vec::new(),
            materials: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, node: Box<dyn SceneNode>) {
        self.children.push(node);
    }

    pub fn add_light<L: Into<Light>>(&mut self, light: L) {
        self.lights.push(light.into());
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> {
        self.geometries
            .iter()
            .enumerate()
            .map(|(idx, geometry)| (GeometryId(idx), geometry))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(idx, material)| (MaterialId(idx), material))
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    pub fn find(&self, name: &str) -> Option<&dyn SceneNode> {
        find_in(&self.children, name)
    }

    /// All meshes in the scene in depth first order.
    pub fn meshes(&self) -> Vec<&MeshNode> {
        let mut meshes = Vec::new();
        for child in &self.children {
            child.collect_meshes(&mut meshes);
        }
        meshes
    }

    pub fn axes(&self) -> Option<&AxesNode> {
        self.children.iter().find_map(|node| node.as_axes())
    }

    /// Resolve world transforms below the root, which is fixed at identity.
    pub fn update_world_transforms(&mut self) {
        let root = Instance::default();
        for child in self.children.iter_mut() {
            child.update_world_transforms(&root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_group() -> (Scene, GeometryId, MaterialId) {
        let mut scene = Scene::new(Color::WHITE);
        let geometry = scene.add_geometry(Geometry::cuboid("box", 1.0, 1.0, 1.0));
        let material = scene.add_material(Material::standard("plain", Color::WHITE, false));
        let mut group = ContainerNode::new("group");
        group.set_local_transform(Instance::new().with_position((0.0, 2.0, 0.0)));
        group.add_child(Box::new(MeshNode::new(
            "child",
            geometry,
            material,
            Instance::new().with_position((1.0, 0.0, 0.0)),
        )));
        scene.add(Box::new(group));
        (scene, geometry, material)
    }

    #[test]
    fn handles_are_assigned_in_insertion_order() {
        let (mut scene, geometry, material) = scene_with_group();
        assert_eq!(geometry.index(), 0);
        assert_eq!(material.index(), 0);
        let second = scene.add_geometry(Geometry::cuboid("other", 1.0, 1.0, 1.0));
        assert_eq!(second.index(), 1);
        assert_eq!(scene.geometry(second).map(|g| g.name.as_str()), Some("other"));
        assert!(scene.geometry(GeometryId(7)).is_none());
    }

    #[test]
    fn world_transforms_compose_through_groups() {
        let (mut scene, _, _) = scene_with_group();
        scene.update_world_transforms();
        let meshes = scene.meshes();
        assert_eq!(meshes.len(), 1);
        assert_eq!(
            meshes[0].world().position,
            cgmath::Vector3::new(1.0, 2.0, 0.0)
        );
        assert_eq!(
            meshes[0].local().position,
            cgmath::Vector3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn find_searches_nested_nodes() {
        let (scene, _, _) = scene_with_group();
        assert!(scene.find("group").is_some());
        assert!(scene.find("child").and_then(|n| n.as_mesh()).is_some());
        assert!(scene.find("missing").is_none());
    }

    #[test]
    fn axes_node_is_found_at_the_root() {
        let mut scene = Scene::new(Color::WHITE);
        assert!(scene.axes().is_none());
        scene.add(Box::new(AxesNode::new(5.0)));
        assert_eq!(scene.axes().map(|a| a.size), Some(5.0));
        assert_eq!(scene.axes().unwrap().vertices().len(), 6);
    }
}
