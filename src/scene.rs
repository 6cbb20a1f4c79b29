//! The toy train scene.
//!
//! [`initialize`] looks up the display container and assembles everything
//! that does not need a GPU: the scene graph, the camera, the lights and the
//! orbit controls. The result is a [`SceneState`] that the renderer reads
//! every frame.

use std::f32::consts::PI;

use anyhow::Context as _;
use cgmath::{Deg, Rad};
use instant::Duration;

use crate::{
    camera::PerspectiveCamera,
    color::Color,
    controls::OrbitControls,
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        light::{DirectionalLight, HemisphereLight},
        material::Material,
        scene_graph::{
            AxesNode, ContainerNode, GeometryId, MaterialId, MeshNode, Scene, SceneNode,
        },
    },
    host::{DisplayHost, Viewport},
    settings::Settings,
};

pub const BACKGROUND: &str = "skyblue";
pub const AXES_SIZE: f32 = 200.0;
pub const TRAIN: &str = "train";

pub const CAMERA_FOV: f32 = 35.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

/// Everything the render loop needs besides the GPU.
#[derive(Debug)]
pub struct SceneState {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
}

impl SceneState {
    /// Follow a change of the container's size (logical pixels).
    ///
    /// Returns `false` and changes nothing if either side is zero.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {}x{}", width, height);
            return false;
        }
        self.camera.resize(width, height);
        self.viewport.width = width;
        self.viewport.height = height;
        true
    }

    /// Follow a change of the drawing surface's size (device pixels).
    ///
    /// The logical size is rounded from the physical one, the camera aspect
    /// keeps the exact physical ratio.
    pub fn on_physical_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("ignoring surface resize to {}x{}", width, height);
            return false;
        }
        let ratio = self.viewport.pixel_ratio.max(f64::EPSILON);
        let logical = |v: u32| ((f64::from(v) / ratio).round() as u32).max(1);
        self.on_resize(logical(width), logical(height));
        self.camera.aspect = width as f32 / height as f32;
        true
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.viewport.pixel_ratio = pixel_ratio;
    }

    /// The group holding all train parts.
    pub fn train(&self) -> Option<&dyn SceneNode> {
        self.scene.find(TRAIN)
    }
}

/// Handles of the two train materials.
#[derive(Clone, Copy, Debug)]
pub struct TrainMaterials {
    pub body: MaterialId,
    pub detail: MaterialId,
}

/// Handles of the four train shapes.
#[derive(Clone, Copy, Debug)]
pub struct TrainGeometries {
    pub nose: GeometryId,
    pub cabin: GeometryId,
    pub chimney: GeometryId,
    pub wheel: GeometryId,
}

/// Assemble the scene inside the container `settings.container_id`.
///
/// Fails before building anything if the host has no such container.
pub fn initialize(host: &dyn DisplayHost, settings: &Settings) -> anyhow::Result<SceneState> {
    let container = host
        .container(&settings.container_id)
        .with_context(|| format!("display container '#{}' not found", settings.container_id))?;
    let viewport = Viewport::from(container);
    log::info!(
        "building scene in '#{}' ({}x{} @ {})",
        settings.container_id,
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );

    let mut scene = create_scene()?;
    let mut camera = create_camera(&viewport);
    create_lights(&mut scene);
    let materials = create_materials(&mut scene);
    let geometries = create_geometries(&mut scene);
    create_meshes(&mut scene, &geometries, &materials);
    let controls = create_controls(&mut camera);

    log::debug!("scene ready with {} meshes", scene.meshes().len());
    Ok(SceneState {
        scene,
        camera,
        controls,
        viewport,
    })
}

/// Advance the scene by `dt`. Returns whether the camera moved.
///
/// Nothing in the train is animated; only the damped glide of the orbit
/// controls progresses between frames.
pub fn update(state: &mut SceneState, _dt: Duration) -> bool {
    if state.controls.enable_damping {
        state.controls.update(&mut state.camera)
    } else {
        false
    }
}

fn create_scene() -> anyhow::Result<Scene> {
    let background =
        Color::from_name(BACKGROUND).with_context(|| format!("unknown colour {}", BACKGROUND))?;
    let mut scene = Scene::new(background);
    scene.add(Box::new(AxesNode::new(AXES_SIZE)));
    Ok(scene)
}

fn create_camera(viewport: &Viewport) -> PerspectiveCamera {
    PerspectiveCamera::new(
        (2.5, 5.0, 10.0),
        Deg(CAMERA_FOV),
        viewport.aspect(),
        CAMERA_NEAR,
        CAMERA_FAR,
    )
}

fn create_lights(scene: &mut Scene) {
    scene.add_light(HemisphereLight {
        sky_color: Color::from_hex(0xddeeff),
        ground_color: Color::from_hex(0x0f0e0d),
        intensity: 5.0,
    });

    let mut main_light = DirectionalLight::new(Color::WHITE, 5.0);
    main_light.position = (10.0, 10.0, 10.0).into();
    scene.add_light(main_light);
}

fn create_materials(scene: &mut Scene) -> TrainMaterials {
    let body = scene.add_material(Material::standard_srgb(
        "body",
        Color::from_hex(0xff3333),
        true,
    ));
    let detail = scene.add_material(Material::standard_srgb(
        "detail",
        Color::from_hex(0x333333),
        true,
    ));
    TrainMaterials { body, detail }
}

fn create_geometries(scene: &mut Scene) -> TrainGeometries {
    let cabin = scene.add_geometry(Geometry::cuboid("cabin", 2.0, 2.25, 1.5));
    let nose = scene.add_geometry(Geometry::cylinder("nose", 0.75, 0.75, 3.0, 12));
    let mut wheel = Geometry::cylinder("wheel", 0.4, 0.4, 1.75, 16);
    wheel.rotate_x(Rad(PI / 2.0));
    let wheel = scene.add_geometry(wheel);
    let chimney = scene.add_geometry(Geometry::cylinder("chimney", 0.3, 0.1, 0.5, 8));
    TrainGeometries {
        nose,
        cabin,
        chimney,
        wheel,
    }
}

/// Create a mesh placed by `transform` relative to its future parent.
pub fn mk_mesh(
    name: &str,
    geometry: GeometryId,
    material: MaterialId,
    transform: Instance,
) -> MeshNode {
    MeshNode::new(name, geometry, material, transform)
}

fn create_meshes(scene: &mut Scene, geometries: &TrainGeometries, materials: &TrainMaterials) {
    let nose = mk_mesh(
        "nose",
        geometries.nose,
        materials.body,
        Instance::new()
            .with_rotation_z(Rad(PI / 2.0))
            .with_position((-1.0, 0.0, 0.0)),
    );
    let cabin = mk_mesh(
        "cabin",
        geometries.cabin,
        materials.body,
        Instance::new().with_position((1.5, 0.1, 0.0)),
    );
    let chimney = mk_mesh(
        "chimney",
        geometries.chimney,
        materials.detail,
        Instance::new().with_position((-0.8, 1.0, 0.0)),
    );

    let small_wheel = Instance::new().with_position((0.0, -0.7, 0.0));
    let small_wheel_rear = mk_mesh(
        "small_wheel_rear",
        geometries.wheel,
        materials.detail,
        small_wheel.clone(),
    );
    let small_wheel_center = mk_mesh(
        "small_wheel_center",
        geometries.wheel,
        materials.detail,
        small_wheel.clone().with_x(-1.0),
    );
    let small_wheel_front = mk_mesh(
        "small_wheel_front",
        geometries.wheel,
        materials.detail,
        small_wheel.with_x(-2.0),
    );
    let big_wheel = mk_mesh(
        "big_wheel",
        geometries.wheel,
        materials.detail,
        Instance::new()
            .with_scale((2.0, 2.0, 1.25))
            .with_position((1.5, -0.3, 0.0)),
    );

    let mut train = ContainerNode::new(TRAIN);
    for mesh in [
        nose,
        cabin,
        chimney,
        small_wheel_rear,
        small_wheel_center,
        small_wheel_front,
        big_wheel,
    ] {
        train.add_child(Box::new(mesh));
    }
    scene.add(Box::new(train));
    scene.update_world_transforms();
}

fn create_controls(camera: &mut PerspectiveCamera) -> OrbitControls {
    OrbitControls::new(camera)
}
