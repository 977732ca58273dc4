//! Render pipelines.
//!
//! Blending is fixed per pipeline in wgpu, so the scene uses two pipelines
//! built from the same program and layout: one opaque, one alpha blended.
//! The control panel has its own flat-colour and glyph pipelines.

pub mod basic;
pub mod gui;
pub mod text;
pub mod transparent;

use crate::resources::ShaderProgram;

/// Blend state of a single draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Fragments overwrite the framebuffer.
    Opaque,
    /// Source-alpha, one-minus-source-alpha blending.
    AlphaBlend,
}

/// Both scene pipelines, sharing one layout: texture at group 0, camera at group 1.
#[derive(Debug)]
pub struct ScenePipelines {
    pub opaque: wgpu::RenderPipeline,
    pub blended: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
        camera_layout: &wgpu::BindGroupLayout,
        program: &ShaderProgram,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[texture_layout, camera_layout],
            immediate_size: 0,
        });
        Self {
            opaque: basic::mk_basic_pipeline(device, color_format, &layout, program),
            blended: transparent::mk_transparent_pipeline(device, color_format, &layout, program),
        }
    }

    pub fn get(&self, blend: BlendMode) -> &wgpu::RenderPipeline {
        match blend {
            BlendMode::Opaque => &self.opaque,
            BlendMode::AlphaBlend => &self.blended,
        }
    }
}
