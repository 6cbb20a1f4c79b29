//! Runtime configuration.
//!
//! Everything that can be tuned about the scene lives in [`Settings`]. The
//! defaults reproduce the toy train scene as designed, so most callers only
//! ever use `Settings::default()`.

/// Tunables for assembling and rendering the scene.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Id of the host element the renderer attaches to (without the `#`).
    pub container_id: String,
    /// Native window title.
    pub window_title: String,
    /// Multisample the colour target if the surface format allows it.
    pub antialias: bool,
    /// Use light intensities as-is instead of scaling them by pi.
    pub physically_correct_lights: bool,
    /// Encode the output into sRGB (gamma) space.
    pub output_srgb: bool,
    /// Gamma used when the encoding has to happen in the shader.
    pub gamma_factor: f32,
    /// Log level for the browser console. Natively `RUST_LOG` decides.
    pub log_level: log::Level,
    /// Exit the event loop after this many rendered frames.
    pub max_frames: Option<u64>,
}

impl Settings {
    pub const DEFAULT_CONTAINER_ID: &'static str = "scene-container";

    /// Exponent applied to the linear colour in the fragment shader.
    ///
    /// `1.0` means the surface (or nobody) takes care of the encoding.
    pub fn shader_gamma_exponent(&self, surface_is_srgb: bool) -> f32 {
        if self.output_srgb && !surface_is_srgb && self.gamma_factor > 0.0 {
            1.0 / self.gamma_factor
        } else {
            1.0
        }
    }

    /// Intensity scale for the lights in the shader.
    pub fn light_scale(&self) -> f32 {
        if self.physically_correct_lights {
            1.0
        } else {
            std::f32::consts::PI
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_id: Self::DEFAULT_CONTAINER_ID.to_string(),
            window_title: "Toy Train".to_string(),
            antialias: true,
            physically_correct_lights: true,
            output_srgb: true,
            gamma_factor: 2.2,
            log_level: log::Level::Info,
            max_frames: None,
        }
    }
}
