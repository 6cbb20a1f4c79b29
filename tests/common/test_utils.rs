use std::collections::HashMap;

use toy_train::{
    data_structures::scene_graph::{MeshNode, SceneNode},
    host::{Container, DisplayHost},
    scene::{self, SceneState},
    settings::Settings,
};

/// Host with a fixed set of containers, standing in for the DOM.
#[derive(Default)]
pub struct StaticHost {
    containers: HashMap<String, Container>,
}

impl StaticHost {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, width: u32, height: u32) -> Self {
        self.containers.insert(
            id.to_string(),
            Container {
                client_width: width,
                client_height: height,
                pixel_ratio: 1.0,
            },
        );
        self
    }
}

impl DisplayHost for StaticHost {
    fn container(&self, id: &str) -> Option<Container> {
        self.containers.get(id).copied()
    }
}

/// Assemble the scene in a `width` x `height` default container.
pub fn assemble(width: u32, height: u32) -> SceneState {
    let host = StaticHost::empty().with(Settings::DEFAULT_CONTAINER_ID, width, height);
    scene::initialize(&host, &Settings::default()).expect("scene assembly failed")
}

pub fn mesh<'a>(state: &'a SceneState, name: &str) -> &'a MeshNode {
    state
        .scene
        .find(name)
        .and_then(|node| node.as_mesh())
        .unwrap_or_else(|| panic!("no mesh called {}", name))
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}

pub fn train_children(state: &SceneState) -> Vec<&str> {
    state
        .train()
        .expect("train group")
        .get_children()
        .iter()
        .map(|child| child.name())
        .collect()
}
