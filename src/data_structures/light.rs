//! Scene lights.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::color::Color;

/// Ambient light blending from a sky colour above to a ground colour below.
#[derive(Clone, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: Color,
    pub ground_color: Color,
    pub intensity: f32,
}

/// Light from infinitely far away, shining from `position` towards `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            // shines straight down unless moved
            position: Point3::new(0.0, 1.0, 0.0),
            target: Point3::origin(),
        }
    }

    /// Unit vector pointing from the lit surface towards the light.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        let dir = self.position - self.target;
        if dir.magnitude2() == 0.0 {
            Vector3::unit_y()
        } else {
            dir.normalize()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Hemisphere(HemisphereLight),
    Directional(DirectionalLight),
}

impl From<HemisphereLight> for Light {
    fn from(light: HemisphereLight) -> Self {
        Light::Hemisphere(light)
    }
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}
