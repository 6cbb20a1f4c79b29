//! CPU side geometry: primitive shape generators and vertex layouts.
//!
//! All shapes are centred on the origin, i.e. `(0, 0, 0)` sits in the middle
//! of their width, height and depth. Triangles wind counter-clockwise when
//! seen from outside.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix3, Rad, Vector3};

use crate::color::Color;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeometryVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for GeometryVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GeometryVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Coloured vertex for line primitives such as the axis indicator.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex for LineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Indexed triangle mesh data.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// A cylinder (or truncated cone) along the y axis with closed caps.
    pub fn cylinder(
        name: &str,
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Self {
        let radial_segments = radial_segments.max(3);
        let half_height = height / 2.0;
        let mut geometry = Self {
            name: name.to_string(),
            vertices: Vec::new(),
            indices: Vec::new(),
        };

        // torso, one ring per end
        let slope = (radius_bottom - radius_top) / height;
        let mut rings = [Vec::new(), Vec::new()];
        for (y, ring) in rings.iter_mut().enumerate() {
            let v = y as f32;
            let radius = v * (radius_bottom - radius_top) + radius_top;
            for x in 0..=radial_segments {
                let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
                let (sin, cos) = theta.sin_cos();
                let normal = Vector3::new(sin, slope, cos).normalize();
                ring.push(geometry.push_vertex(
                    [radius * sin, -v * height + half_height, radius * cos],
                    normal.into(),
                ));
            }
        }
        for x in 0..radial_segments as usize {
            let a = rings[0][x];
            let b = rings[1][x];
            let c = rings[1][x + 1];
            let d = rings[0][x + 1];
            geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            geometry.push_cap(true, radius_top, half_height, radial_segments);
        }
        if radius_bottom > 0.0 {
            geometry.push_cap(false, radius_bottom, half_height, radial_segments);
        }
        geometry
    }

    fn push_cap(&mut self, top: bool, radius: f32, half_height: f32, radial_segments: u32) {
        let sign = if top { 1.0 } else { -1.0 };
        let normal = [0.0, sign, 0.0];
        let centres: Vec<u32> = (0..radial_segments)
            .map(|_| self.push_vertex([0.0, half_height * sign, 0.0], normal))
            .collect();
        let rim: Vec<u32> = (0..=radial_segments)
            .map(|x| {
                let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
                let (sin, cos) = theta.sin_cos();
                self.push_vertex([radius * sin, half_height * sign, radius * cos], normal)
            })
            .collect();
        for x in 0..radial_segments as usize {
            let (centre, i) = (centres[x], rim[x]);
            if top {
                self.indices.extend_from_slice(&[i, rim[x + 1], centre]);
            } else {
                self.indices.extend_from_slice(&[rim[x + 1], i, centre]);
            }
        }
    }

    /// An axis aligned box.
    pub fn cuboid(name: &str, width: f32, height: f32, depth: f32) -> Self {
        let mut geometry = Self {
            name: name.to_string(),
            vertices: Vec::new(),
            indices: Vec::new(),
        };
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        let x = Vector3::unit_x();
        let y = Vector3::unit_y();
        let z = Vector3::unit_z();
        // (normal, u, v) with u x v == normal
        let faces = [
            (x, -z, y),
            (-x, z, y),
            (y, x, -z),
            (-y, x, z),
            (z, x, y),
            (-z, -x, y),
        ];
        for (normal, u, v) in faces {
            let centre = mul_each(normal, half);
            let u = mul_each(u, half);
            let v = mul_each(v, half);
            let corners = [centre - u - v, centre + u - v, centre + u + v, centre - u + v];
            let first = geometry.vertices.len() as u32;
            for corner in corners {
                geometry.push_vertex(corner.into(), normal.into());
            }
            geometry.indices.extend_from_slice(&[
                first,
                first + 1,
                first + 2,
                first,
                first + 2,
                first + 3,
            ]);
        }
        geometry
    }

    /// Rotate positions and normals about the x axis in place.
    pub fn rotate_x<A: Into<Rad<f32>>>(&mut self, angle: A) -> &mut Self {
        let rotation = Matrix3::from_angle_x(angle);
        for vertex in &mut self.vertices {
            vertex.position = (rotation * Vector3::from(vertex.position)).into();
            vertex.normal = (rotation * Vector3::from(vertex.normal)).into();
        }
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
            (min, max)
        }))
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.vertices.push(GeometryVertex { position, normal });
        self.vertices.len() as u32 - 1
    }
}

fn mul_each(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x * b.x, a.y * b.y, a.z * b.z)
}

/// Line list showing the three axes: x red, y green, z blue.
///
/// Each line fades towards a lighter tone at its far end.
pub fn axes_lines(size: f32) -> Vec<LineVertex> {
    let line = |to: [f32; 3], near: Color, far: Color| {
        [
            LineVertex {
                position: [0.0; 3],
                color: near.to_array(),
            },
            LineVertex {
                position: to,
                color: far.to_array(),
            },
        ]
    };
    [
        line([size, 0.0, 0.0], Color::new(1.0, 0.0, 0.0), Color::new(1.0, 0.6, 0.0)),
        line([0.0, size, 0.0], Color::new(0.0, 1.0, 0.0), Color::new(0.6, 1.0, 0.0)),
        line([0.0, 0.0, size], Color::new(0.0, 0.0, 1.0), Color::new(0.0, 0.6, 1.0)),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "expected {b}, got {a}");
    }

    #[test]
    fn cylinder_counts_follow_segments() {
        let nose = Geometry::cylinder("nose", 0.75, 0.75, 3.0, 12);
        // torso 2 * 13, each cap 12 centres + 13 rim vertices
        assert_eq!(nose.vertices.len(), 26 + 2 * 25);
        assert_eq!(nose.triangle_count(), 12 * 2 + 12 * 2);
    }

    #[test]
    fn cone_without_top_radius_has_one_cap() {
        let cone = Geometry::cylinder("cone", 0.0, 1.0, 1.0, 8);
        assert_eq!(cone.triangle_count(), 8 * 2 + 8);
    }

    #[test]
    fn cylinder_bounds_match_dimensions() {
        let chimney = Geometry::cylinder("chimney", 0.3, 0.1, 0.5, 8);
        let (min, max) = chimney.bounds().unwrap();
        assert_close(min[1], -0.25);
        assert_close(max[1], 0.25);
        assert_close(max[2], 0.3);
    }

    #[test]
    fn cuboid_has_24_vertices_and_12_triangles() {
        let cabin = Geometry::cuboid("cabin", 2.0, 2.25, 1.5);
        assert_eq!(cabin.vertices.len(), 24);
        assert_eq!(cabin.triangle_count(), 12);
        let (min, max) = cabin.bounds().unwrap();
        assert_eq!(min, [-1.0, -1.125, -0.75]);
        assert_eq!(max, [1.0, 1.125, 0.75]);
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for geometry in [
            Geometry::cuboid("box", 1.0, 2.0, 3.0),
            Geometry::cylinder("cyl", 0.4, 0.4, 1.75, 16),
        ] {
            for tri in geometry.indices.chunks(3) {
                let p = |i: u32| Vector3::from(geometry.vertices[i as usize].position);
                let face_normal = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
                let vertex_normal = Vector3::from(geometry.vertices[tri[0] as usize].normal);
                assert!(
                    face_normal.dot(vertex_normal) > 0.0,
                    "{} has an inward facing triangle {:?}",
                    geometry.name,
                    tri
                );
            }
        }
    }

    #[test]
    fn rotate_x_lays_the_wheel_on_its_side() {
        let mut wheel = Geometry::cylinder("wheel", 0.4, 0.4, 1.75, 16);
        wheel.rotate_x(Rad(PI / 2.0));
        let (min, max) = wheel.bounds().unwrap();
        // the axis now runs along z
        assert_close(max[2] - min[2], 1.75);
        assert_close(max[1] - min[1], 0.8);
        let rotation = Matrix3::from_angle_x(Rad(PI / 2.0));
        let up = rotation * Vector3::unit_y();
        assert_close(up.z, 1.0);
    }

    #[test]
    fn axes_lines_reach_the_requested_size() {
        let lines = axes_lines(200.0);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1].position, [200.0, 0.0, 0.0]);
        assert_eq!(lines[3].position, [0.0, 200.0, 0.0]);
        assert_eq!(lines[5].position, [0.0, 0.0, 200.0]);
    }
}
