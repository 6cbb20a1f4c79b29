use instant::Duration;
use toy_train::{
    animation::AnimationLoop,
    scene::{self, SceneState},
};

use crate::common::test_utils::assemble;
mod common;

struct Recorded {
    state: SceneState,
    log: Vec<String>,
}

fn recorded_loop() -> AnimationLoop<Recorded, ()> {
    let mut animation = AnimationLoop::new();
    animation.play(Box::new(|recorded: &mut Recorded, dt: Duration| {
        let moved = scene::update(&mut recorded.state, dt);
        recorded.log.push(format!("update moved={}", moved));
        recorded.log.push(format!("render meshes={}", recorded.state.scene.meshes().len()));
        Ok(())
    }));
    animation
}

#[test]
fn each_frame_updates_before_rendering() {
    let mut animation = recorded_loop();
    let mut recorded = Recorded {
        state: assemble(800, 600),
        log: Vec::new(),
    };
    for _ in 0..3 {
        assert_eq!(animation.tick(&mut recorded), Some(Ok(())));
    }
    assert_eq!(animation.frames(), 3);
    assert_eq!(recorded.log.len(), 6);
    for frame in recorded.log.chunks(2) {
        assert_eq!(frame[0], "update moved=false");
        assert_eq!(frame[1], "render meshes=7");
    }
}

#[test]
fn damped_controls_keep_moving_across_frames() {
    let mut animation = recorded_loop();
    let mut recorded = Recorded {
        state: assemble(800, 600),
        log: Vec::new(),
    };
    recorded.state.controls.enable_damping = true;
    recorded.state.controls.rotate_left(1.0);
    let start = recorded.state.camera.position;

    animation.tick(&mut recorded);
    animation.tick(&mut recorded);
    assert_eq!(recorded.log[0], "update moved=true");
    assert_eq!(recorded.log[2], "update moved=true");
    assert_ne!(recorded.state.camera.position, start);
}

#[test]
fn stopping_the_loop_halts_frames() {
    let mut animation = recorded_loop();
    let mut recorded = Recorded {
        state: assemble(800, 600),
        log: Vec::new(),
    };
    animation.tick(&mut recorded);
    animation.stop();
    assert!(!animation.is_running());
    assert_eq!(animation.tick(&mut recorded), None);
    assert_eq!(animation.frames(), 1);
    assert_eq!(recorded.log.len(), 2);
}
