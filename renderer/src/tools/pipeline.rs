use crate::pods::{InstanceLayer, InstanceOffset, QuadVertex};

const VERTEX_SHADER_ENTRY: &str = "vs_main";
const FRAGMENT_SHADER_ENTRY: &str = "fs_main";

/// Vertex buffer slots of the sprite pipeline.
pub const QUAD_SLOT: u32 = 0;
pub const OFFSET_SLOT: u32 = 1;
pub const LAYER_SLOT: u32 = 2;

/// The vertex buffer layouts, indexed by slot.
pub fn sprite_buffers() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        QuadVertex::layout(),
        InstanceOffset::layout(),
        InstanceLayer::layout(),
    ]
}

/// A pipeline drawing alpha blended sprite quads into `format`.
pub fn create_sprite_pipeline(
    label: &str,
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    pipeline_layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let buffers = sprite_buffers();
    let targets = [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(VERTEX_SHADER_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(FRAGMENT_SHADER_ENTRY),
            compilation_options: Default::default(),
            targets: &targets,
        }),
        primitive: wgpu::PrimitiveState {
            // The quad is counter-clockwise in pixel space, and the projection keeps y up.
            cull_mode: Some(wgpu::Face::Back),
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::{LAYER_SLOT, OFFSET_SLOT, QUAD_SLOT, sprite_buffers};

    #[test]
    fn only_the_quad_steps_per_vertex() {
        let buffers = sprite_buffers();
        assert_eq!(
            buffers[QUAD_SLOT as usize].step_mode,
            wgpu::VertexStepMode::Vertex
        );
        for slot in [OFFSET_SLOT, LAYER_SLOT] {
            assert_eq!(
                buffers[slot as usize].step_mode,
                wgpu::VertexStepMode::Instance
            );
        }
    }
}
