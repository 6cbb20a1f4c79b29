//! Render composition and pipeline batching.
//!
//! Meshes that share a geometry and a material are collected into one
//! [`Batch`] and drawn with a single instanced call. [`Render`] describes
//! what is drawn in a frame and [`render`] records and submits the pass.
//!
//! # Key types
//!
//! - [`Batch`] groups mesh world transforms by (geometry, material)
//! - [`Render<'a>`] is the enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering
//! - [`Lines<'a>`] contains data for unlit line lists

use std::iter;

use crate::{
    context::Context,
    data_structures::{
        instance::Instance,
        scene_graph::{GeometryId, MaterialId, Scene, SceneNode},
    },
    resources::{
        SceneResources,
        mesh::{GpuGeometry, GpuMaterial},
    },
    scene::SceneState,
};

/// World transforms of all meshes drawn with the same geometry and material.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub names: Vec<String>,
    pub instances: Vec<Instance>,
}

/// Group the scene's meshes by (geometry, material), in order of first appearance.
pub fn batch_meshes(scene: &Scene) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for mesh in scene.meshes() {
        let name = mesh.name().to_string();
        match batches
            .iter_mut()
            .find(|b| b.geometry == mesh.geometry && b.material == mesh.material)
        {
            Some(batch) => {
                batch.names.push(name);
                batch.instances.push(mesh.world().clone());
            }
            None => batches.push(Batch {
                geometry: mesh.geometry,
                material: mesh.material,
                names: vec![name],
                instances: vec![mesh.world().clone()],
            }),
        }
    }
    batches
}

/// Data for instanced object rendering: geometry, material and instance buffer.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub geometry: &'a GpuGeometry,
    pub material: &'a GpuMaterial,
    pub amount: usize,
}

/// Data for line rendering: a vertex buffer holding a line list.
pub struct Lines<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub amount: usize,
}

/// Specifies what is drawn and with which pipeline.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Defaults(Vec<Instanced>)` renders several lit instanced batches
/// - `Lines(Lines)` renders an unlit line list
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
pub enum Render<'a> {
    None,
    Defaults(Vec<Instanced<'a>>),
    Lines(Lines<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Sort the render tree into one list per pipeline.
    pub(crate) fn set_pipelines(self, basics: &mut Vec<Instanced<'a>>, lines: &mut Vec<Lines<'a>>) {
        match self {
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Lines(line) => lines.push(line),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, lines)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a SceneResources> for Render<'a> {
    fn from(resources: &'a SceneResources) -> Self {
        let axes = match &resources.axes {
            Some(axes) => Render::Lines(Lines {
                vertex: &axes.vertex_buffer,
                amount: axes.num_vertices as usize,
            }),
            None => Render::None,
        };
        let batches = resources
            .batches
            .iter()
            .filter_map(|batch| {
                Some(Instanced {
                    instance: &batch.instance_buffer,
                    geometry: resources.geometries.get(batch.geometry.index())?,
                    material: resources.materials.get(batch.material.index())?,
                    amount: batch.amount,
                })
            })
            .collect();
        Render::Composed(vec![axes, Render::Defaults(batches)])
    }
}

/// Draw one frame of the scene into the surface.
pub fn render(
    ctx: &mut Context,
    resources: &SceneResources,
    state: &SceneState,
) -> Result<(), wgpu::SurfaceError> {
    ctx.camera.write(&ctx.queue, &state.camera);

    let output = ctx.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
    {
        // with msaa the pass draws into the multisampled target and resolves into the surface
        let (target, resolve_target) = match &ctx.msaa_texture {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &ctx.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let mut basics: Vec<Instanced> = Vec::new();
        let mut lines: Vec<Lines> = Vec::new();
        Render::from(resources).set_pipelines(&mut basics, &mut lines);

        render_pass.set_pipeline(&ctx.pipelines.lines);
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
        for line in lines {
            render_pass.set_vertex_buffer(0, line.vertex.slice(..));
            render_pass.draw(0..line.amount as u32, 0..1);
        }

        render_pass.set_pipeline(&ctx.pipelines.standard);
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
        for instanced in basics {
            if instanced.amount == 0 || instanced.instance.size() == 0 {
                log::warn!("skipping {} without instances", instanced.geometry.name);
                continue;
            }
            render_pass.set_bind_group(2, &instanced.material.bind_group, &[]);
            render_pass.set_vertex_buffer(0, instanced.geometry.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
            render_pass.set_index_buffer(
                instanced.geometry.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(
                0..instanced.geometry.num_elements,
                0,
                0..instanced.amount as u32,
            );
        }
    }

    ctx.queue.submit(iter::once(encoder.finish()));
    output.present();
    Ok(())
}
