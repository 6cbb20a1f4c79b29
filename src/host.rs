//! The host environment the renderer is embedded in.
//!
//! In the browser the host is the DOM document and the container is the
//! element the canvas is appended to. Natively the window plays both roles.
//! Scene assembly only talks to the [`DisplayHost`] trait, which keeps it
//! independent of winit and web-sys.

use std::sync::Arc;

use winit::window::Window;

/// Snapshot of the element the scene is displayed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    pub client_width: u32,
    pub client_height: u32,
    pub pixel_ratio: f64,
}

/// Something that can hand out display containers by id.
pub trait DisplayHost {
    /// Look up the container with the given id. `None` if it does not exist.
    fn container(&self, id: &str) -> Option<Container>;
}

/// Drawable size of the renderer in logical pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Logical size, the one layout and the camera aspect are based on.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the backing surface in device pixels, never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((f64::from(v) * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl From<Container> for Viewport {
    fn from(container: Container) -> Self {
        Viewport::new(
            container.client_width,
            container.client_height,
            container.pixel_ratio,
        )
    }
}

/// Native host: the window is the container, whatever id is asked for.
pub struct WindowHost {
    window: Arc<Window>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl DisplayHost for WindowHost {
    fn container(&self, id: &str) -> Option<Container> {
        let scale_factor = self.window.scale_factor();
        let size = self.window.inner_size().to_logical::<f64>(scale_factor);
        log::debug!("using the window as container '#{}'", id);
        Some(Container {
            client_width: size.width.round() as u32,
            client_height: size.height.round() as u32,
            pixel_ratio: scale_factor,
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::DocumentHost;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{Container, DisplayHost};

    /// Browser host backed by the global `document`.
    pub struct DocumentHost {
        window: web_sys::Window,
        document: web_sys::Document,
    }

    impl DocumentHost {
        pub fn new() -> anyhow::Result<Self> {
            let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no global window"))?;
            let document = window
                .document()
                .ok_or_else(|| anyhow::anyhow!("window has no document"))?;
            Ok(Self { window, document })
        }

        pub fn element(&self, id: &str) -> Option<web_sys::Element> {
            self.document.get_element_by_id(id)
        }
    }

    impl DisplayHost for DocumentHost {
        fn container(&self, id: &str) -> Option<Container> {
            let element = self.element(id)?;
            Some(Container {
                client_width: element.client_width().max(0) as u32,
                client_height: element.client_height().max(0) as u32,
                pixel_ratio: self.window.device_pixel_ratio(),
            })
        }
    }
}
