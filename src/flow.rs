//! Flow control and application event loop.
//!
//! [`run`] creates the winit event loop and drives the scene through it:
//!
//! 1. `resumed` assembles the scene, creates the window and starts the async
//!    GPU setup (blocked on natively, spawned on the web)
//! 2. once the [`AppState`] exists the [`AnimationLoop`] is started
//! 3. window events feed the orbit controls and resize handling
//! 4. every `RedrawRequested` ticks the loop, which updates and renders the
//!    scene and asks for the next redraw

use std::{fmt::Debug, sync::Arc};

use instant::Duration;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    animation::AnimationLoop,
    context::Context,
    render,
    resources::SceneResources,
    scene::{self, SceneState},
    settings::Settings,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Application state bundle: GPU context, uploaded resources and the scene.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    resources: SceneResources,
    scene: SceneState,
}

impl AppState {
    async fn new(window: Arc<Window>, scene: SceneState, settings: &Settings) -> anyhow::Result<Self> {
        let ctx = Context::new(window, &scene, settings).await?;
        let resources = SceneResources::new(&ctx.device, &ctx.material_layout, &scene.scene);
        Ok(Self {
            ctx,
            resources,
            scene,
        })
    }

    /// Follow a new physical window size.
    fn resize(&mut self, width: u32, height: u32) {
        self.scene.set_pixel_ratio(self.ctx.window.scale_factor());
        if self.scene.on_physical_resize(width, height) {
            self.ctx.resize(width, height);
        }
    }
}

/// Body of the animation loop: advance the scene, then draw it.
fn frame(app: &mut AppState, dt: Duration) -> Result<(), wgpu::SurfaceError> {
    scene::update(&mut app.scene, dt);
    render::render(&mut app.ctx, &app.resources, &app.scene)
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    #[allow(dead_code)]
    Failed(anyhow::Error),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    settings: Settings,
    state: Option<AppState>,
    animation: AnimationLoop<AppState, wgpu::SurfaceError>,
    initializing: bool,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, settings: Settings) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            settings,
            state: None,
            animation: AnimationLoop::new(),
            initializing: false,
            error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes =
            Window::default_attributes().with_title(self.settings.window_title.clone());

        // on the web the container has to exist before anything else is built
        #[cfg(target_arch = "wasm32")]
        let (host, scene) = {
            let host = crate::host::DocumentHost::new()?;
            let scene = scene::initialize(&host, &self.settings)?;
            (host, scene)
        };

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        #[cfg(target_arch = "wasm32")]
        attach_canvas(&host, &window, &self.settings.container_id)?;

        #[cfg(not(target_arch = "wasm32"))]
        let scene = scene::initialize(&crate::host::WindowHost::new(window.clone()), &self.settings)?;

        let settings = self.settings.clone();
        let init_future = async move { AppState::new(window, scene, &settings).await };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let app_state = self.async_runtime.block_on(init_future)?;
            self.start(app_state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok(app_state) => FlowEvent::Initialized(Box::new(app_state)),
                    Err(e) => FlowEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before the renderer was ready");
                }
            });
        }
        Ok(())
    }

    /// Register the frame callback and kick off the first redraw.
    fn start(&mut self, app_state: AppState) {
        log::info!("starting animation loop");
        self.animation.play(Box::new(frame));
        app_state.ctx.window.request_redraw();
        self.state = Some(app_state);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("initialization failed: {:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match self.animation.tick(state) {
            Some(Ok(())) => {}
            // Reconfigure the surface if it's lost or outdated
            Some(Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                state.ctx.reconfigure();
            }
            Some(Err(e)) => log::error!("Unable to render {}", e),
            None => return,
        }

        if let Some(max_frames) = self.settings.max_frames {
            if self.animation.frames() >= max_frames {
                log::info!("rendered {} frames, exiting", max_frames);
                self.animation.stop();
                event_loop.exit();
                return;
            }
        }
        if self.animation.is_running() {
            state.ctx.window.request_redraw();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn attach_canvas(
    host: &crate::host::DocumentHost,
    window: &Window,
    container_id: &str,
) -> anyhow::Result<()> {
    use winit::platform::web::WindowExtWebSys;

    let js_error = |e: JsValue| anyhow::anyhow!("{:?}", e);
    let container = host
        .element(container_id)
        .ok_or_else(|| anyhow::anyhow!("display container '#{}' not found", container_id))?;
    let canvas = window
        .canvas()
        .ok_or_else(|| anyhow::anyhow!("window has no canvas"))?;
    // the canvas fills the container so winit reports the container's size
    let style = canvas.style();
    style.set_property("width", "100%").map_err(js_error)?;
    style.set_property("height", "100%").map_err(js_error)?;
    style.set_property("display", "block").map_err(js_error)?;
    container.append_child(&canvas).map_err(js_error)?;
    Ok(())
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.initializing || self.state.is_some() {
            return;
        }
        self.initializing = true;
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(app_state) => {
                // This is the message from our wasm `spawn_local`
                let mut app_state = *app_state;
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                self.start(app_state);
            }
            FlowEvent::Failed(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
            return;
        }
        if let WindowEvent::RedrawRequested = event {
            self.redraw(event_loop);
            return;
        }
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        let scene = &mut state.scene;
        if scene
            .controls
            .handle_window_event(&event, &mut scene.camera, &scene.viewport)
        {
            state.ctx.window.request_redraw();
        }

        match event {
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.scene.set_pixel_ratio(scale_factor);
            }
            _ => {}
        }
    }
}

/// Initialise logging, open the window and run the scene until it is closed.
///
/// Errors during setup (missing container, no GPU) end the event loop and are
/// returned from here.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(settings.log_level)
            .map_err(|e| anyhow::anyhow!("could not initialize logger: {}", e))?;
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, settings)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
