//! GPU context: everything that lives as long as the window.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::CameraResources,
    data_structures::texture,
    pipelines::{
        Pipelines,
        light::{LightResources, LightUniform},
    },
    resources::mesh::material_bind_group_layout,
    scene::SceneState,
    settings::Settings,
};

const MSAA_SAMPLES: u32 = 4;

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub(crate) msaa_texture: Option<texture::Texture>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub sample_count: u32,
    pub clear_colour: wgpu::Color,
    pub camera: CameraResources,
    pub light: LightResources,
    pub material_layout: wgpu::BindGroupLayout,
    pub pipelines: Pipelines,
}

impl Context {
    /// Create the renderer for `window`, sized after the scene's viewport.
    ///
    /// The colour management settings are applied here once: they pick the
    /// surface format and the gamma the shaders encode with.
    pub async fn new(
        window: Arc<Window>,
        state: &SceneState,
        settings: &Settings,
    ) -> anyhow::Result<Self> {
        let (width, height) = state.viewport.physical_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;
        log::debug!("using adapter {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("cannot open the GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb() == settings.output_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let surface_is_srgb = surface_format.is_srgb();
        if surface_is_srgb && !settings.output_srgb {
            log::warn!("only sRGB surfaces are available, output will be gamma encoded");
        }
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if settings.antialias
            && adapter
                .get_texture_format_features(surface_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            if settings.antialias {
                log::warn!("{:?} cannot be multisampled, antialiasing is off", surface_format);
            }
            1
        };
        log::info!(
            "surface {:?} at {}x{}, {}x msaa",
            surface_format,
            width,
            height,
            sample_count
        );

        let camera = CameraResources::new(&device, &state.camera);

        let light_uniform = LightUniform::new(
            state.scene.lights(),
            settings.light_scale(),
            settings.shader_gamma_exponent(surface_is_srgb),
        );
        let light = LightResources::new(&device, light_uniform);

        let material_layout = material_bind_group_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            surface_format,
            sample_count,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            &material_layout,
        );

        let background = if surface_is_srgb {
            state.scene.background.srgb_to_linear()
        } else {
            state.scene.background
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            sample_count,
            "depth_texture",
        );
        let msaa_texture = (sample_count > 1).then(|| {
            texture::Texture::create_msaa_texture(
                &device,
                [config.width, config.height],
                sample_count,
                surface_format,
            )
        });

        Ok(Self {
            window,
            depth_texture,
            msaa_texture,
            surface,
            device,
            queue,
            config,
            sample_count,
            clear_colour: background.into(),
            camera,
            light,
            material_layout,
            pipelines,
        })
    }

    /// Reconfigure the surface and render targets for a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [width, height],
            self.sample_count,
            "depth_texture",
        );
        if self.sample_count > 1 {
            self.msaa_texture = Some(texture::Texture::create_msaa_texture(
                &self.device,
                [width, height],
                self.sample_count,
                self.config.format,
            ));
        }
    }

    /// Configure the surface again at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }
}
