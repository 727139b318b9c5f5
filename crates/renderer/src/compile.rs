use std::borrow::Cow;

use earthmap::ShaderProgram;
use wgpu::naga::ShaderStage;

/// Vertex and fragment modules for a GLSL program.
pub(crate) struct CompiledProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// Hands both stages to naga's GLSL frontend.
pub(crate) fn compile_program(device: &wgpu::Device, program: &ShaderProgram) -> CompiledProgram {
    CompiledProgram {
        vertex: compile_stage(device, "earth map vertex", program.vertex, ShaderStage::Vertex),
        fragment: compile_stage(
            device,
            "earth map fragment",
            program.fragment,
            ShaderStage::Fragment,
        ),
    }
}

fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    stage: ShaderStage,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    })
}
