use crate::common::test_utils::assemble;
mod common;

#[test]
fn resize_updates_aspect_and_renderer_size() {
    let mut state = assemble(800, 600);
    for (width, height) in [(1920, 1080), (600, 800), (1, 1), (3000, 700)] {
        assert!(state.on_resize(width, height));
        assert_eq!(state.camera.aspect, width as f32 / height as f32);
        assert_eq!(state.viewport.size(), (width, height));
    }
}

#[test]
fn zero_sized_resize_is_ignored() {
    let mut state = assemble(800, 600);
    assert!(!state.on_resize(0, 600));
    assert!(!state.on_resize(800, 0));
    assert_eq!(state.camera.aspect, 800.0 / 600.0);
    assert_eq!(state.viewport.size(), (800, 600));
}

#[test]
fn physical_size_follows_the_pixel_ratio() {
    let mut state = assemble(800, 600);
    assert_eq!(state.viewport.physical_size(), (800, 600));
    state.set_pixel_ratio(2.0);
    state.on_resize(1920, 1080);
    assert_eq!(state.viewport.size(), (1920, 1080));
    assert_eq!(state.viewport.physical_size(), (3840, 2160));
    state.set_pixel_ratio(1.5);
    assert_eq!(state.viewport.physical_size(), (2880, 1620));
}

#[test]
fn resize_keeps_the_scene_untouched() {
    let mut state = assemble(800, 600);
    let position = state.camera.position;
    state.on_resize(1024, 768);
    assert_eq!(state.camera.position, position);
    assert_eq!(state.scene.meshes().len(), 7);
}

#[test]
fn surface_resize_keeps_the_exact_aspect_at_fractional_scale() {
    let mut state = assemble(800, 600);
    state.set_pixel_ratio(1.25);
    assert!(state.on_physical_resize(1001, 999));
    // the logical size is rounded, the aspect is not
    assert_eq!(state.viewport.size(), (801, 799));
    assert_eq!(state.camera.aspect, 1001.0 / 999.0);
    assert_ne!(state.camera.aspect, 801.0 / 799.0);
}

#[test]
fn zero_sized_surface_resize_is_ignored() {
    let mut state = assemble(800, 600);
    state.set_pixel_ratio(2.0);
    assert!(!state.on_physical_resize(0, 1200));
    assert_eq!(state.viewport.size(), (800, 600));
    assert_eq!(state.camera.aspect, 800.0 / 600.0);
}
