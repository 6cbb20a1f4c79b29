//! Surface materials.

use crate::color::Color;

/// A physically based surface description shared by any number of meshes.
///
/// `color` is stored in linear space; construct it with
/// [`Material::standard_srgb`] when the colour was picked on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    /// Shade every triangle with its face normal instead of interpolated normals.
    pub flat_shading: bool,
}

impl Material {
    /// Fully rough, non-metallic material with a linear `color`.
    pub fn standard(name: &str, color: Color, flat_shading: bool) -> Self {
        Self {
            name: name.to_string(),
            color,
            roughness: 1.0,
            metalness: 0.0,
            flat_shading,
        }
    }

    /// Like [`Material::standard`] but converts an sRGB colour to linear first.
    pub fn standard_srgb(name: &str, srgb: Color, flat_shading: bool) -> Self {
        Self::standard(name, srgb.srgb_to_linear(), flat_shading)
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            color: self.color.to_vec4(1.0),
            roughness: self.roughness,
            metalness: self.metalness,
            flat_shading: u32::from(self.flat_shading),
            _padding: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    color: [f32; 4],
    roughness: f32,
    metalness: f32,
    flat_shading: u32,
    // Uniforms require 16 byte (4 float) spacing
    _padding: u32,
}
