//! Render pipelines and the shaders behind them.
//!
//! - `basic` builds the lit pipeline for standard materials and the shared
//!   `mk_render_pipeline` helper
//! - `lines` builds the unlit line pipeline used by the axes helper
//! - `light` packs the scene lights into a uniform

pub mod basic;
pub mod light;
pub mod lines;

/// Every pipeline the renderer draws with.
#[derive(Debug)]
pub struct Pipelines {
    pub standard: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        material_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            standard: basic::mk_standard_pipeline(
                device,
                color_format,
                sample_count,
                camera_bind_group_layout,
                light_bind_group_layout,
                material_bind_group_layout,
            ),
            lines: lines::mk_lines_pipeline(
                device,
                color_format,
                sample_count,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
        }
    }
}
