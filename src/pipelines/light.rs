use wgpu::util::DeviceExt;

use crate::data_structures::light::Light;

/// All scene lighting packed into one uniform.
///
/// The shader supports one hemisphere and one directional light. Colours are
/// multiplied by their intensity on the CPU, `shading` carries the light
/// scale (x) and the output gamma exponent (y).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    direct_color: [f32; 4],
    direct_direction: [f32; 4],
    shading: [f32; 4],
}

impl LightUniform {
    pub fn new(lights: &[Light], light_scale: f32, gamma_exponent: f32) -> Self {
        let mut uniform = Self {
            sky_color: [0.0; 4],
            ground_color: [0.0; 4],
            direct_color: [0.0; 4],
            direct_direction: [0.0, 1.0, 0.0, 0.0],
            shading: [light_scale, gamma_exponent, 0.0, 0.0],
        };
        let (mut hemispheres, mut directionals) = (0, 0);
        for light in lights {
            match light {
                Light::Hemisphere(hemi) => {
                    hemispheres += 1;
                    if hemispheres == 1 {
                        uniform.sky_color = premultiply(hemi.sky_color.to_array(), hemi.intensity);
                        uniform.ground_color =
                            premultiply(hemi.ground_color.to_array(), hemi.intensity);
                    }
                }
                Light::Directional(dir) => {
                    directionals += 1;
                    if directionals == 1 {
                        uniform.direct_color = premultiply(dir.color.to_array(), dir.intensity);
                        uniform.direct_direction = dir.direction_to_light().extend(0.0).into();
                    }
                }
            }
        }
        if hemispheres > 1 || directionals > 1 {
            log::warn!(
                "only the first hemisphere and directional light are rendered, got {} and {}",
                hemispheres,
                directionals
            );
        }
        uniform
    }

    pub fn light_scale(&self) -> f32 {
        self.shading[0]
    }

    pub fn gamma_exponent(&self) -> f32 {
        self.shading[1]
    }
}

fn premultiply(rgb: [f32; 3], intensity: f32) -> [f32; 4] {
    [rgb[0] * intensity, rgb[1] * intensity, rgb[2] * intensity, 1.0]
}

/// GPU side of the lights: uniform buffer and the bind group at slot 1.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
