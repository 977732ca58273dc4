//! Projection and camera uniforms.
//!
//! The demo has no view rotation: the camera looks down -Z and only its X
//! position follows the pan slider. Vertices are offset by the camera position
//! in the vertex shader and then projected.

use cgmath::{Matrix4, Rad, Vector3, perspective};
use wgpu::util::DeviceExt;

use crate::settings::{CAMERA_DEPTH, CAMERA_HEIGHT, FOVY_DEGREES, Z_FAR, Z_NEAR};

/// Converts cgmath's OpenGL clip space (z in [-1, 1]) into wgpu's (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::from_cols(
    cgmath::Vector4::new(1.0, 0.0, 0.0, 0.0),
    cgmath::Vector4::new(0.0, 1.0, 0.0, 0.0),
    cgmath::Vector4::new(0.0, 0.0, 0.5, 0.0),
    cgmath::Vector4::new(0.0, 0.0, 0.5, 1.0),
);

/// Perspective projection. Only the aspect ratio follows the window size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: cgmath::Deg(FOVY_DEGREES).into(),
            znear: Z_NEAR,
            zfar: Z_FAR,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

// A minimised window reports 0x0; keep the aspect finite.
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Camera position for a given pan offset. Pan only moves the camera along X.
pub fn camera_position(pan: f32) -> Vector3<f32> {
    Vector3::new(pan, CAMERA_HEIGHT, CAMERA_DEPTH)
}

/// Uniform block shared with `simple_vert.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
    // vec3 in WGSL is 16-byte aligned, so the fourth component is padding.
    pub camera_position: [f32; 4],
}

impl CameraUniform {
    pub fn new(projection: &Projection, pan: f32) -> Self {
        let position = camera_position(pan);
        Self {
            projection: projection.calc_matrix().into(),
            camera_position: [position.x, position.y, position.z, 0.0],
        }
    }
}

/// GPU side of the camera: the uniform buffer and its bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, uniform: CameraUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, uniform: CameraUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
