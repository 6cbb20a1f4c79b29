//! Scene data structures.
//!
//! - `instance` holds per-mesh transformation data and its GPU layout
//! - `geometry` generates primitive shapes and defines vertex layouts
//! - `material` describes how a surface reacts to light
//! - `light` contains the light sources a scene can hold
//! - `scene_graph` enables hierarchical scene organization
//! - `texture` wraps the depth and multisample render targets

pub mod geometry;
pub mod instance;
pub mod light;
pub mod material;
pub mod scene_graph;
pub mod texture;
