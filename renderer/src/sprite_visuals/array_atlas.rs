use crate::{
    SpriteCatalog, bind_group_entries,
    pods::InstanceLayer,
    program::ProgramSource,
    tools::{BindGroupLayoutBuilder, texture_sampler},
};

use super::{DrawCall, SpriteVisuals, single_draw, sprite_texture, write_sprite};

/// All sprites in one texture array, the instance's layer attribute selects the sprite.
#[derive(Debug)]
pub struct ArrayAtlas {
    texture: wgpu::Texture,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ArrayAtlas {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, catalog: &SpriteCatalog) -> Self {
        let texture = sprite_texture(device, "Sprite Atlas", catalog.len() as u32);
        for (layer, sprite) in catalog.sprites().iter().enumerate() {
            write_sprite(queue, &texture, layer as u32, sprite);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Sprite Atlas View"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let sampler = texture_sampler::nearest_clamping(device);

        let bind_group_layout = BindGroupLayoutBuilder::fragment()
            .texture(wgpu::TextureViewDimension::D2Array)
            .sampler()
            .build("Sprite Atlas Bind Group Layout", device);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Atlas Bind Group"),
            layout: &bind_group_layout,
            entries: bind_group_entries!(0 => &view, 1 => &sampler),
        });

        Self {
            texture,
            bind_group_layout,
            bind_group,
        }
    }
}

impl SpriteVisuals for ArrayAtlas {
    fn name(&self) -> &'static str {
        "texture array"
    }

    fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    fn default_program(&self) -> ProgramSource {
        ProgramSource::array_atlas()
    }

    fn plan(&self, layers: &[InstanceLayer]) -> Vec<DrawCall> {
        single_draw(layers.len())
    }

    fn bind(&self, pass: &mut wgpu::RenderPass, group: u32, _call: &DrawCall) {
        pass.set_bind_group(group, &self.bind_group, &[]);
    }
}

impl Drop for ArrayAtlas {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}
