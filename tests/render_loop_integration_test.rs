#![cfg(feature = "integration-tests")]

use toy_train::Settings;

// Needs a display and a GPU adapter.
#[test]
fn renders_a_few_frames_and_exits() {
    let settings = Settings {
        max_frames: Some(5),
        ..Default::default()
    };
    toy_train::run(settings).expect("render loop failed");
}
