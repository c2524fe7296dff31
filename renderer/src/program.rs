//! Shader programs and their compilation into a render pipeline.

use std::borrow::Cow;

use anyhow::{Result, bail};
use log::debug;

use crate::tools::create_sprite_pipeline;

/// WGSL source for the sprite pipeline.
///
/// The program must read `position` (location 0), `uv` (1), `offset` (2) and optionally
/// `sprite_layer` (3), and the `projection_matrix` uniform at group 0, binding 0. Entry points are
/// `vs_main` and `fs_main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub label: Cow<'static, str>,
    pub wgsl: Cow<'static, str>,
}

impl ProgramSource {
    pub fn new(label: impl Into<Cow<'static, str>>, wgsl: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            wgsl: wgsl.into(),
        }
    }

    /// Samples the sprite from a texture array layer selected by `sprite_layer`.
    pub fn array_atlas() -> Self {
        Self::new(
            "Sprites Array Shader",
            include_str!("shaders/sprites_array.wgsl"),
        )
    }

    /// Samples a single sprite texture bound per draw call.
    pub fn texture_list() -> Self {
        Self::new("Sprites List Shader", include_str!("shaders/sprites_list.wgsl"))
    }
}

/// Compile `source` and link it into a pipeline with the sprite vertex layout.
///
/// Shader and pipeline validation errors are captured and returned instead of being raised by
/// the device's error handler.
pub async fn compile_program(
    device: &wgpu::Device,
    source: &ProgramSource,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(source.label.as_ref()),
        source: wgpu::ShaderSource::Wgsl(source.wgsl.clone()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Sprite Pipeline Layout"),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let pipeline =
        create_sprite_pipeline(&source.label, device, &shader, &pipeline_layout, format);

    if let Some(error) = device.pop_error_scope().await {
        bail!("Building the program `{}` failed: {error}", source.label);
    }

    debug!("Compiled program `{}`", source.label);
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::ProgramSource;

    #[test]
    fn builtin_programs_declare_the_sprite_interface() {
        for program in [ProgramSource::array_atlas(), ProgramSource::texture_list()] {
            let wgsl = &program.wgsl;
            for name in ["projection_matrix", "vs_main", "fs_main", "@location(2) offset"] {
                assert!(wgsl.contains(name), "`{}` lacks `{name}`", program.label);
            }
        }
        assert!(ProgramSource::array_atlas().wgsl.contains("texture_2d_array"));
        assert!(ProgramSource::array_atlas().wgsl.contains("@location(3) sprite_layer"));
    }
}
