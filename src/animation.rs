//! Per-frame scheduling.
//!
//! [`AnimationLoop`] holds at most one frame callback. The host event loop
//! calls [`AnimationLoop::tick`] whenever the display is ready for a new
//! frame; while a callback is registered it runs once per tick with the time
//! elapsed since the previous tick.

use instant::{Duration, Instant};

pub type FrameCallback<S, E> = Box<dyn FnMut(&mut S, Duration) -> Result<(), E>>;

pub struct AnimationLoop<S, E> {
    callback: Option<FrameCallback<S, E>>,
    last_time: Instant,
    frames: u64,
}

impl<S, E> AnimationLoop<S, E> {
    pub fn new() -> Self {
        Self {
            callback: None,
            last_time: Instant::now(),
            frames: 0,
        }
    }

    /// Register `callback` to run on every tick, replacing any previous one.
    pub fn play(&mut self, callback: FrameCallback<S, E>) {
        self.last_time = Instant::now();
        self.callback = Some(callback);
    }

    /// Cancel the registered callback. Further ticks do nothing.
    pub fn stop(&mut self) {
        self.callback = None;
    }

    pub fn is_running(&self) -> bool {
        self.callback.is_some()
    }

    /// Number of frames run since the loop was created.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. `None` when no callback is registered.
    pub fn tick(&mut self, state: &mut S) -> Option<Result<(), E>> {
        let callback = self.callback.as_mut()?;
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        self.frames += 1;
        Some(callback(state, dt))
    }
}

impl<S, E> Default for AnimationLoop<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_without_callback_does_nothing() {
        let mut animation: AnimationLoop<Vec<&'static str>, ()> = AnimationLoop::new();
        let mut log = Vec::new();
        assert!(animation.tick(&mut log).is_none());
        assert!(log.is_empty());
        assert_eq!(animation.frames(), 0);
    }

    #[test]
    fn callback_runs_once_per_tick_until_stopped() {
        let mut animation: AnimationLoop<Vec<&'static str>, ()> = AnimationLoop::new();
        animation.play(Box::new(|log: &mut Vec<&'static str>, _: Duration| {
            log.push("update");
            log.push("render");
            Ok(())
        }));
        let mut log = Vec::new();
        assert!(matches!(animation.tick(&mut log), Some(Ok(()))));
        assert!(matches!(animation.tick(&mut log), Some(Ok(()))));
        assert_eq!(log, ["update", "render", "update", "render"]);

        animation.stop();
        assert!(!animation.is_running());
        assert!(animation.tick(&mut log).is_none());
        assert_eq!(log.len(), 4);
        assert_eq!(animation.frames(), 2);
    }

    #[test]
    fn errors_from_the_callback_are_returned() {
        let mut animation: AnimationLoop<(), &str> = AnimationLoop::new();
        animation.play(Box::new(|_: &mut (), _: Duration| Err::<(), _>("surface lost")));
        assert_eq!(animation.tick(&mut ()), Some(Err("surface lost")));
        assert!(animation.is_running());
    }
}
