use crate::{
    data_structures::geometry::QuadVertex, pipelines::basic::mk_render_pipeline,
    resources::ShaderProgram,
};

/// `src * src.a + dst * (1 - src.a)` for colour and alpha alike.
pub const SOURCE_ALPHA_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
};

/// The alpha-blended scene pipeline used for the billboard.
///
/// Shares layout and program with the opaque pipeline; only the blend state
/// differs, so switching pipelines is how blending is enabled for one draw.
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    layout: &wgpu::PipelineLayout,
    program: &ShaderProgram,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        "Blended Scene Pipeline",
        layout,
        color_format,
        Some(SOURCE_ALPHA_BLENDING),
        &[QuadVertex::desc()],
        program,
    )
}
