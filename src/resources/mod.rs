//! GPU copies of the scene's resources.
//!
//! Nothing is loaded from files: every geometry and material already lives in
//! the [`Scene`] and only has to be uploaded once after the device exists.

use crate::{
    data_structures::scene_graph::{GeometryId, MaterialId, Scene},
    render::batch_meshes,
};

pub mod mesh;

use mesh::{GpuGeometry, GpuLines, GpuMaterial, mk_instance_buffer};

/// Instance buffer of one (geometry, material) batch.
#[derive(Debug)]
pub struct GpuBatch {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub instance_buffer: wgpu::Buffer,
    pub amount: usize,
}

/// Everything drawn each frame, indexed like the scene's arenas.
#[derive(Debug)]
pub struct SceneResources {
    pub geometries: Vec<GpuGeometry>,
    pub materials: Vec<GpuMaterial>,
    pub batches: Vec<GpuBatch>,
    pub axes: Option<GpuLines>,
}

impl SceneResources {
    pub fn new(
        device: &wgpu::Device,
        material_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Self {
        let geometries: Vec<_> = scene
            .geometries()
            .map(|(_, geometry)| GpuGeometry::upload(device, geometry))
            .collect();
        let materials: Vec<_> = scene
            .materials()
            .map(|(_, material)| GpuMaterial::upload(device, material_layout, material))
            .collect();
        let batches: Vec<_> = batch_meshes(scene)
            .into_iter()
            .map(|batch| GpuBatch {
                geometry: batch.geometry,
                material: batch.material,
                instance_buffer: mk_instance_buffer(
                    device,
                    &format!("{} Instance Buffer", batch.names.join("+")),
                    &batch.instances,
                ),
                amount: batch.instances.len(),
            })
            .collect();
        let axes = scene
            .axes()
            .map(|axes| GpuLines::upload(device, "Axes Vertex Buffer", &axes.vertices()));
        log::debug!(
            "uploaded {} geometries, {} materials and {} batches",
            geometries.len(),
            materials.len(),
            batches.len()
        );
        Self {
            geometries,
            materials,
            batches,
            axes,
        }
    }
}
