use toy_train::{data_structures::scene_graph::SceneNode, render::batch_meshes};

use crate::common::test_utils::{assemble, mesh};
mod common;

#[test]
fn train_is_drawn_in_four_batches() {
    let state = assemble(800, 600);
    let batches = batch_meshes(&state.scene);
    let names: Vec<_> = batches.iter().map(|batch| batch.names.clone()).collect();
    assert_eq!(
        names,
        [
            vec!["nose"],
            vec!["cabin"],
            vec!["chimney"],
            vec![
                "small_wheel_rear",
                "small_wheel_center",
                "small_wheel_front",
                "big_wheel"
            ],
        ]
    );
}

#[test]
fn wheel_batch_carries_each_wheel_transform() {
    let state = assemble(800, 600);
    let batches = batch_meshes(&state.scene);
    let wheels = batches
        .iter()
        .find(|batch| batch.instances.len() == 4)
        .expect("wheel batch");
    assert_eq!(wheels.geometry, mesh(&state, "big_wheel").geometry);
    assert_eq!(wheels.material, mesh(&state, "big_wheel").material);

    let big_wheel = wheels.instances[3].to_raw().model();
    assert_eq!(big_wheel.x.x, 2.0);
    assert_eq!(big_wheel.y.y, 2.0);
    assert_eq!(big_wheel.z.z, 1.25);
    assert_eq!(big_wheel.w, cgmath::Vector4::new(1.5, -0.3, 0.0, 1.0));
}

#[test]
fn every_mesh_is_batched_exactly_once() {
    let state = assemble(800, 600);
    let mut batched: Vec<String> = batch_meshes(&state.scene)
        .into_iter()
        .flat_map(|batch| batch.names)
        .collect();
    batched.sort();
    let mut meshes: Vec<String> = state
        .scene
        .meshes()
        .iter()
        .map(|mesh| mesh.name().to_string())
        .collect();
    meshes.sort();
    assert_eq!(batched, meshes);
}
