use crate::{
    SpriteCatalog, bind_group_entries,
    pods::InstanceLayer,
    program::ProgramSource,
    tools::{BindGroupLayoutBuilder, texture_sampler},
};

use super::{DrawCall, SpriteVisuals, runs_by_layer, sprite_texture, write_sprite};

/// One 2D texture per sprite, bound for every run of instances showing that sprite.
#[derive(Debug)]
pub struct TextureList {
    textures: Vec<wgpu::Texture>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl TextureList {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, catalog: &SpriteCatalog) -> Self {
        let sampler = texture_sampler::nearest_clamping(device);
        let bind_group_layout = BindGroupLayoutBuilder::fragment()
            .texture(wgpu::TextureViewDimension::D2)
            .sampler()
            .build("Sprite Texture Bind Group Layout", device);

        let (textures, bind_groups) = catalog
            .names()
            .iter()
            .zip(catalog.sprites())
            .map(|(name, sprite)| {
                let texture = sprite_texture(device, name, 1);
                write_sprite(queue, &texture, 0, sprite);
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(name.as_str()),
                    layout: &bind_group_layout,
                    entries: bind_group_entries!(0 => &view, 1 => &sampler),
                });
                (texture, bind_group)
            })
            .unzip();

        Self {
            textures,
            bind_group_layout,
            bind_groups,
        }
    }
}

impl SpriteVisuals for TextureList {
    fn name(&self) -> &'static str {
        "texture list"
    }

    fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    fn default_program(&self) -> ProgramSource {
        ProgramSource::texture_list()
    }

    fn plan(&self, layers: &[InstanceLayer]) -> Vec<DrawCall> {
        runs_by_layer(layers)
    }

    fn bind(&self, pass: &mut wgpu::RenderPass, group: u32, call: &DrawCall) {
        pass.set_bind_group(group, &self.bind_groups[call.visual], &[]);
    }
}

impl Drop for TextureList {
    fn drop(&mut self) {
        for texture in &self.textures {
            texture.destroy();
        }
    }
}
