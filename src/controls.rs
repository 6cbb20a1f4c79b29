//! Orbit-style camera controls.
//!
//! The camera circles around a target point: dragging with the left mouse
//! button rotates, the right button pans and the wheel (or middle button)
//! dollies in and out. Movement is accumulated as deltas in spherical
//! coordinates and applied in [`OrbitControls::update`], optionally with
//! damping so the camera keeps gliding after the pointer is released.

use std::f32::consts::PI;

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::{camera::PerspectiveCamera, host::Viewport};

const EPS: f32 = 1e-6;
// winit reports pixel deltas for touchpads, roughly this many per wheel notch
const PIXELS_PER_LINE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    None,
    Rotate { last: (f64, f64) },
    Pan { last: (f64, f64) },
    Dolly { last: (f64, f64) },
}

/// Spherical coordinates around the target (`theta` around y, `phi` from +y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vector3<f32>,
    drag: Drag,
    cursor: (f64, f64),
}

impl OrbitControls {
    /// Bind controls to `camera`. The camera is turned to face the target.
    pub fn new(camera: &mut PerspectiveCamera) -> Self {
        let controls = Self {
            target: Point3::origin(),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vector3::zero(),
            drag: Drag::None,
            cursor: (0.0, 0.0),
        };
        camera.target = controls.target;
        controls
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != Drag::None
    }

    /// Rotate the camera around the target horizontally.
    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    /// Rotate the camera around the target vertically.
    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Move closer to the target by `factor` (`< 1` is closer).
    pub fn dolly(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn zoom_in(&mut self) {
        let zoom_scale = self.zoom_scale();
        self.dolly(zoom_scale);
    }

    pub fn zoom_out(&mut self) {
        let zoom_scale = self.zoom_scale();
        self.dolly(1.0 / zoom_scale);
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Pan by a screen space delta in logical pixels.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport: &Viewport) {
        let height = viewport.height.max(1) as f32;
        let offset = camera.position - self.target;
        // half of the visible height at the target's depth
        let target_distance =
            offset.magnitude() * (cgmath::Rad::from(camera.fovy).0 / 2.0).tan();
        let left = 2.0 * dx * target_distance / height * self.pan_speed;
        let up = 2.0 * dy * target_distance / height * self.pan_speed;
        self.pan_offset += camera.right() * -left;
        self.pan_offset += camera.camera_up() * up;
    }

    pub fn begin_rotate(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
        self.drag = Drag::Rotate { last: (x, y) };
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
        self.drag = Drag::Pan { last: (x, y) };
    }

    pub fn begin_dolly(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
        self.drag = Drag::Dolly { last: (x, y) };
    }

    pub fn end_drag(&mut self) {
        self.drag = Drag::None;
    }

    /// Continue the current drag to the cursor position `(x, y)`.
    ///
    /// Returns whether the camera moved.
    pub fn drag_to(
        &mut self,
        x: f64,
        y: f64,
        camera: &mut PerspectiveCamera,
        viewport: &Viewport,
    ) -> bool {
        self.cursor = (x, y);
        let height = viewport.height.max(1) as f32;
        match self.drag {
            Drag::None => return false,
            Drag::Rotate { last } => {
                let (dx, dy) = ((x - last.0) as f32, (y - last.1) as f32);
                self.rotate_left(2.0 * PI * dx / height * self.rotate_speed);
                self.rotate_up(2.0 * PI * dy / height * self.rotate_speed);
                self.drag = Drag::Rotate { last: (x, y) };
            }
            Drag::Pan { last } => {
                let (dx, dy) = ((x - last.0) as f32, (y - last.1) as f32);
                self.pan(dx, dy, camera, viewport);
                self.drag = Drag::Pan { last: (x, y) };
            }
            Drag::Dolly { last } => {
                let dy = y - last.1;
                if dy > 0.0 {
                    self.zoom_out();
                } else if dy < 0.0 {
                    self.zoom_in();
                }
                self.drag = Drag::Dolly { last: (x, y) };
            }
        }
        self.update(camera)
    }

    /// Feed a winit window event. Returns whether the camera moved.
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        camera: &mut PerspectiveCamera,
        viewport: &Viewport,
    ) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                // winit reports physical pixels, the controls work in logical ones
                let ratio = viewport.pixel_ratio.max(f64::EPSILON);
                self.drag_to(position.x / ratio, position.y / ratio, camera, viewport)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.cursor;
                match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => self.begin_rotate(x, y),
                    (MouseButton::Right, ElementState::Pressed) => self.begin_pan(x, y),
                    (MouseButton::Middle, ElementState::Pressed) => self.begin_dolly(x, y),
                    (_, ElementState::Released) => self.end_drag(),
                    _ => (),
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(*y),
                    MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
                };
                if dy > 0.0 {
                    self.zoom_in();
                } else if dy < 0.0 {
                    self.zoom_out();
                } else {
                    return false;
                }
                self.update(camera)
            }
            WindowEvent::CursorLeft { .. } => {
                self.end_drag();
                false
            }
            _ => false,
        }
    }

    /// Apply the pending rotation, dolly and pan to `camera`.
    ///
    /// With damping enabled only a fraction of the pending motion is applied
    /// and the rest decays over the following calls.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(offset);

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.spherical_delta.theta * factor;
        spherical.phi += self.spherical_delta.phi * factor;

        // inverted limits settle on the minimum
        spherical.phi = spherical
            .phi
            .min(self.max_polar_angle)
            .max(self.min_polar_angle)
            .min(PI - EPS)
            .max(EPS);

        spherical.radius = (spherical.radius * self.scale)
            .min(self.max_distance)
            .max(self.min_distance);

        self.target = self.target + self.pan_offset * factor;

        let old_position = camera.position;
        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;

        (camera.position - old_position).magnitude2() > EPS
    }
}
