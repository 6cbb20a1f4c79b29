//! Instance transformation data for GPU rendering.
//!
//! Every mesh carries a local and a world [`Instance`]. World transforms are
//! packed as [`InstanceRaw`] into per-batch instance buffers so meshes that
//! share geometry and material are drawn in one instanced call.

use std::ops::Mul;

use cgmath::{InnerSpace, Matrix, One, Rotation3, SquareMatrix};

use crate::data_structures::geometry;

/// Per-instance transformation: position, rotation (as quaternion), and scale.
///
/// The matrix form is `translation * rotation * scale`, so scale is applied
/// in the mesh's own frame before it is rotated and moved.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_position<V: Into<cgmath::Vector3<f32>>>(mut self, position: V) -> Self {
        self.position = position.into();
        self
    }

    /// Replace only the x coordinate of the position.
    pub fn with_x(mut self, x: f32) -> Self {
        self.position.x = x;
        self
    }

    pub fn with_scale<V: Into<cgmath::Vector3<f32>>>(mut self, scale: V) -> Self {
        self.scale = scale.into();
        self
    }

    /// Rotation about the z axis, like setting `rotation.z` on an euler triple.
    pub fn with_rotation_z<A: Into<cgmath::Rad<f32>>>(mut self, angle: A) -> Self {
        self.rotation = cgmath::Quaternion::from_angle_z(angle);
        self
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse transpose of the upper 3x3, so normals survive non-uniform scale.
    pub fn normal_matrix(&self) -> cgmath::Matrix3<f32> {
        let model = self.to_matrix();
        let linear = cgmath::Matrix3::from_cols(
            model.x.truncate(),
            model.y.truncate(),
            model.z.truncate(),
        );
        linear
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(|| cgmath::Matrix3::from(self.rotation.normalize()))
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: self.normal_matrix().into(),
        }
    }
}

/// Compose a parent (`self`) with a child transform expressed in the parent's frame.
impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = cgmath::Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_rhs_pos = cgmath::Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let new_position = self.position + (self.rotation * scaled_rhs_pos);

        Instance {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    pub fn model(&self) -> cgmath::Matrix4<f32> {
        self.model.into()
    }
}

/**
 * As we store vertex data directly in the GPU memory we need to tell what the bytes refer to:
 *
 * offset: zero as we want to use the full space.
 * stride: length of an instance
 *
 * Stride layout here: model matrix as four vec4 (locations 5-8) followed by
 * the normal matrix as three vec3 (locations 9-11).
 */
impl geometry::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // We need to switch from using a step mode of Vertex to Instance
            // This means that our shaders will only change to use the next
            // instance when the shader starts processing a new instance
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // A mat4 takes up 4 vertex slots as it is technically 4 vec4s.
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Vector3, Vector4};

    #[test]
    fn identity_parent_keeps_child() {
        let child = Instance::new()
            .with_position((1.5, -0.3, 0.0))
            .with_scale((2.0, 2.0, 1.25));
        let world = &Instance::new() * &child;
        assert_eq!(world, child);
    }

    #[test]
    fn parent_translation_and_scale_apply_to_child_position() {
        let parent = Instance::new()
            .with_position((1.0, 0.0, 0.0))
            .with_scale((2.0, 2.0, 2.0));
        let child = Instance::new().with_position((0.5, 1.0, 0.0));
        let world = parent * child;
        assert_eq!(world.position, Vector3::new(2.0, 2.0, 0.0));
        assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn quarter_turn_about_z_maps_y_to_minus_x() {
        let nose = Instance::new().with_rotation_z(Deg(90.0));
        let p = nose.to_matrix() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert!((p.x + 1.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn normal_matrix_counters_non_uniform_scale() {
        let squashed = Instance::new().with_scale((1.0, 4.0, 1.0));
        let normal = squashed.normal_matrix() * Vector3::new(0.0, 1.0, 0.0);
        assert!((normal.y - 0.25).abs() < 1e-6);
    }
}
