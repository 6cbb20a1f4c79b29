use std::f32::consts::PI;

use cgmath::{Deg, Point3, Quaternion, Rad, Rotation3, Vector3};
use toy_train::{
    color::Color,
    data_structures::{instance::Instance, light::Light, scene_graph::SceneNode},
    scene,
    settings::Settings,
};

use crate::common::test_utils::{StaticHost, assemble, assert_close, mesh, train_children};
mod common;

const SMALL_WHEELS: [&str; 3] = ["small_wheel_rear", "small_wheel_center", "small_wheel_front"];

#[test]
fn train_group_holds_seven_meshes_in_order() {
    let state = assemble(800, 600);
    assert_eq!(
        train_children(&state),
        [
            "nose",
            "cabin",
            "chimney",
            "small_wheel_rear",
            "small_wheel_center",
            "small_wheel_front",
            "big_wheel",
        ]
    );
    let train = state.train().unwrap();
    assert!(train.get_children().iter().all(|child| child.as_mesh().is_some()));
    assert_eq!(train.get_local_transform(), &Instance::default());
}

#[test]
fn scene_contains_one_train_and_the_axes() {
    let state = assemble(800, 600);
    let trains = state
        .scene
        .children()
        .iter()
        .filter(|node| node.name() == scene::TRAIN)
        .count();
    assert_eq!(trains, 1);
    assert_eq!(state.scene.meshes().len(), 7);
    assert_eq!(state.scene.axes().map(|axes| axes.size), Some(200.0));
    assert_eq!(state.scene.background, Color::from_hex(0x87ceeb));
}

#[test]
fn two_materials_are_shared_between_body_and_details() {
    let state = assemble(800, 600);
    assert_eq!(state.scene.materials().count(), 2);

    let body = mesh(&state, "nose").material;
    let detail = mesh(&state, "chimney").material;
    assert_ne!(body, detail);
    assert_eq!(mesh(&state, "cabin").material, body);
    for name in SMALL_WHEELS.iter().chain(["big_wheel"].iter()) {
        assert_eq!(mesh(&state, name).material, detail, "{}", name);
    }

    let body = state.scene.material(body).unwrap();
    assert_eq!(body.color, Color::from_hex(0xff3333).srgb_to_linear());
    let detail = state.scene.material(detail).unwrap();
    assert_eq!(detail.color, Color::from_hex(0x333333).srgb_to_linear());
    for material in [body, detail] {
        assert!(material.flat_shading);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.metalness, 0.0);
    }
}

#[test]
fn four_geometries_and_every_wheel_uses_the_same_one() {
    let state = assemble(800, 600);
    assert_eq!(state.scene.geometries().count(), 4);

    let wheel = mesh(&state, "big_wheel").geometry;
    for name in SMALL_WHEELS {
        assert_eq!(mesh(&state, name).geometry, wheel);
    }
    let mut others = vec![
        mesh(&state, "nose").geometry,
        mesh(&state, "cabin").geometry,
        mesh(&state, "chimney").geometry,
        wheel,
    ];
    others.sort();
    others.dedup();
    assert_eq!(others.len(), 4);

    // the wheel lies on its side, its axis along z
    let (min, max) = state.scene.geometry(wheel).unwrap().bounds().unwrap();
    assert_close(max[2] - min[2], 1.75);
    assert_close(max[0] - min[0], 0.8);
}

#[test]
fn small_wheels_differ_only_in_x() {
    let state = assemble(800, 600);
    let wheels: Vec<_> = SMALL_WHEELS.iter().map(|name| mesh(&state, name)).collect();
    for (wheel, x) in wheels.iter().zip([0.0, -1.0, -2.0]) {
        assert_eq!(wheel.local().position, Vector3::new(x, -0.7, 0.0));
        assert_eq!(wheel.local().rotation, wheels[0].local().rotation);
        assert_eq!(wheel.local().scale, Vector3::new(1.0, 1.0, 1.0));
    }
}

#[test]
fn big_wheel_is_scaled_and_moved_back() {
    let state = assemble(800, 600);
    let big_wheel = mesh(&state, "big_wheel").local();
    assert_eq!(big_wheel.scale, Vector3::new(2.0, 2.0, 1.25));
    assert_eq!(big_wheel.position, Vector3::new(1.5, -0.3, 0.0));
}

#[test]
fn remaining_parts_are_placed() {
    let state = assemble(800, 600);
    let nose = mesh(&state, "nose").local();
    assert_eq!(nose.position, Vector3::new(-1.0, 0.0, 0.0));
    assert_eq!(nose.rotation, Quaternion::from_angle_z(Rad(PI / 2.0)));
    assert_eq!(
        mesh(&state, "cabin").local().position,
        Vector3::new(1.5, 0.1, 0.0)
    );
    assert_eq!(
        mesh(&state, "chimney").local().position,
        Vector3::new(-0.8, 1.0, 0.0)
    );
}

#[test]
fn world_transforms_match_local_under_the_identity_group() {
    let state = assemble(800, 600);
    for mesh in state.scene.meshes() {
        assert_eq!(mesh.world(), mesh.local(), "{}", mesh.name());
    }
}

#[test]
fn camera_looks_at_the_train_from_above() {
    let state = assemble(800, 600);
    let camera = &state.camera;
    assert_eq!(camera.fovy, Deg(35.0));
    assert_eq!(camera.znear, 0.1);
    assert_eq!(camera.zfar, 100.0);
    assert_eq!(camera.position, Point3::new(2.5, 5.0, 10.0));
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(camera.aspect, 800.0 / 600.0);
    assert_eq!(state.controls.target, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn hemisphere_and_directional_light_are_added() {
    let state = assemble(800, 600);
    let lights = state.scene.lights();
    assert_eq!(lights.len(), 2);
    match &lights[0] {
        Light::Hemisphere(light) => {
            assert_eq!(light.sky_color, Color::from_hex(0xddeeff));
            assert_eq!(light.ground_color, Color::from_hex(0x0f0e0d));
            assert_eq!(light.intensity, 5.0);
        }
        other => panic!("expected the hemisphere light first, got {:?}", other),
    }
    match &lights[1] {
        Light::Directional(light) => {
            assert_eq!(light.color, Color::WHITE);
            assert_eq!(light.intensity, 5.0);
            assert_eq!(light.position, Point3::new(10.0, 10.0, 10.0));
        }
        other => panic!("expected the directional light second, got {:?}", other),
    }
}

#[test]
fn missing_container_is_an_error() {
    let host = StaticHost::empty().with("somewhere-else", 800, 600);
    let err = scene::initialize(&host, &Settings::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "display container '#scene-container' not found"
    );
}

#[test]
fn container_id_comes_from_the_settings() {
    let host = StaticHost::empty().with("viewer", 1024, 512);
    let settings = Settings {
        container_id: "viewer".to_string(),
        ..Default::default()
    };
    let state = scene::initialize(&host, &settings).unwrap();
    assert_eq!(state.viewport.size(), (1024, 512));
    assert_eq!(state.camera.aspect, 2.0);
}
