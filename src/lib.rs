//! toy-train
//!
//! A stylized toy train built from primitive shapes, lit by a hemisphere and
//! a directional light and viewed through an orbiting perspective camera.
//! The same code runs natively in a winit window and in the browser, where
//! the canvas is attached to the `#scene-container` element.
//!
//! High-level modules
//! - `settings`: tunables, defaults reproduce the scene as designed
//! - `color`: colour values and sRGB/linear conversion
//! - `host`: lookup of the display container (window or DOM element)
//! - `camera`: perspective camera and its uniform
//! - `controls`: orbit controls (rotate, zoom, pan)
//! - `data_structures`: geometry, materials, lights, instances, scene graph
//! - `scene`: assembly of the train scene and its per-frame update
//! - `animation`: the animation loop scheduling one callback per frame
//! - `resources`: GPU uploads of the scene's geometries and materials
//! - `pipelines`: render pipelines and WGSL shaders
//! - `render`: batching and the render pass
//! - `context`: central GPU and window context
//! - `flow`: event loop and the `run` entry point
//!

pub mod animation;
pub mod camera;
pub mod color;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod flow;
pub mod host;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod settings;

pub use flow::run;
pub use scene::{SceneState, initialize, update};
pub use settings::Settings;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point, runs as soon as the module is loaded.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run(Settings::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
