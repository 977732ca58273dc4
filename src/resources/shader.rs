/// The vertex and fragment stages the scene is drawn with.
///
/// The stages come from separate WGSL sources; each module declares only the
/// bindings its own stage uses.
#[derive(Debug)]
pub struct ShaderProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

impl ShaderProgram {
    pub const VERTEX_ENTRY: &'static str = "vs_main";
    pub const FRAGMENT_ENTRY: &'static str = "fs_main";
}

/// Compile both stages of the scene program.
///
/// Invalid WGSL is reported by wgpu's uncaptured error handler, which aborts
/// the process during startup.
pub fn compile_program(
    device: &wgpu::Device,
    vertex_src: &str,
    fragment_src: &str,
) -> ShaderProgram {
    let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Scene Vertex Shader"),
        source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
    });
    let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Scene Fragment Shader"),
        source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
    });
    ShaderProgram { vertex, fragment }
}
