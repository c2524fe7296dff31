//! How sprite textures are bound: one texture array for all sprites, or one texture per sprite
//! when the device can't hold the catalog in an array.

use std::ops::Range;

use image::RgbaImage;
use log::{info, warn};
use serde::Deserialize;

use crate::{SpriteCatalog, pods::InstanceLayer, program::ProgramSource};

mod array_atlas;
mod texture_list;

pub use array_atlas::ArrayAtlas;
pub use texture_list::TextureList;

pub const SPRITE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureStrategy {
    /// A texture array if the device supports enough layers, a texture list otherwise.
    #[default]
    Auto,
    #[serde(alias = "array")]
    ArrayAtlas,
    #[serde(alias = "list")]
    TextureList,
}

impl TextureStrategy {
    /// Resolve to [`Self::ArrayAtlas`] or [`Self::TextureList`] for a catalog of `sprites`.
    pub fn resolve(self, sprites: usize, max_texture_array_layers: u32) -> Self {
        let fits = sprites <= max_texture_array_layers as usize;
        match self {
            Self::Auto if fits => Self::ArrayAtlas,
            Self::Auto => {
                warn!(
                    "{sprites} sprites exceed the device's {max_texture_array_layers} texture array layers, using a texture list"
                );
                Self::TextureList
            }
            Self::ArrayAtlas if !fits => {
                warn!(
                    "Texture array requested, but {sprites} sprites exceed the device's {max_texture_array_layers} layers, using a texture list"
                );
                Self::TextureList
            }
            resolved => resolved,
        }
    }
}

/// One instanced draw: the instance range and the visual (texture) it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub visual: usize,
    pub instances: Range<u32>,
}

/// The sprite textures on the GPU.
pub trait SpriteVisuals: Send {
    fn name(&self) -> &'static str;

    /// The layout of the bind group set by [`Self::bind`].
    fn bind_group_layout(&self) -> &wgpu::BindGroupLayout;

    /// The program used when the renderer is not given one.
    fn default_program(&self) -> ProgramSource;

    /// The draw calls needed to render instances with these layers.
    fn plan(&self, layers: &[InstanceLayer]) -> Vec<DrawCall>;

    fn bind(&self, pass: &mut wgpu::RenderPass, group: u32, call: &DrawCall);
}

pub fn create_visuals(
    strategy: TextureStrategy,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    catalog: &SpriteCatalog,
    max_texture_array_layers: u32,
) -> Box<dyn SpriteVisuals> {
    let strategy = strategy.resolve(catalog.len(), max_texture_array_layers);
    let visuals: Box<dyn SpriteVisuals> = match strategy {
        TextureStrategy::TextureList => Box::new(TextureList::new(device, queue, catalog)),
        _ => Box::new(ArrayAtlas::new(device, queue, catalog)),
    };
    info!(
        "Sprite visuals: {} ({} sprites)",
        visuals.name(),
        catalog.len()
    );
    visuals
}

/// All instances in one call.
fn single_draw(instances: usize) -> Vec<DrawCall> {
    if instances == 0 {
        return Vec::new();
    }
    vec![DrawCall {
        visual: 0,
        instances: 0..instances as u32,
    }]
}

/// One call per run of consecutive instances that show the same sprite.
fn runs_by_layer(layers: &[InstanceLayer]) -> Vec<DrawCall> {
    let mut calls: Vec<DrawCall> = Vec::new();
    for (i, layer) in layers.iter().enumerate() {
        let i = i as u32;
        match calls.last_mut() {
            Some(call) if call.visual == layer.index() => call.instances.end = i + 1,
            _ => calls.push(DrawCall {
                visual: layer.index(),
                instances: i..i + 1,
            }),
        }
    }
    calls
}

/// Upload `image` into `layer` of `texture`.
fn write_sprite(queue: &wgpu::Queue, texture: &wgpu::Texture, layer: u32, image: &RgbaImage) {
    let (width, height) = image.dimensions();
    assert_eq!(
        (width, height),
        crate::SPRITE_SIZE,
        "Sprite layer {layer} does not match the texture size"
    );
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

fn sprite_texture(device: &wgpu::Device, label: &str, layers: u32) -> wgpu::Texture {
    let (width, height) = crate::SPRITE_SIZE;
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: layers,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: SPRITE_TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

#[cfg(test)]
mod tests {
    use super::{DrawCall, TextureStrategy, runs_by_layer, single_draw};
    use crate::pods::InstanceLayer;

    fn layers(indices: &[usize]) -> Vec<InstanceLayer> {
        indices.iter().map(|&i| InstanceLayer(i as f32)).collect()
    }

    fn call(visual: usize, instances: std::ops::Range<u32>) -> DrawCall {
        DrawCall { visual, instances }
    }

    #[test]
    fn array_draws_everything_at_once() {
        assert_eq!(single_draw(800), [call(0, 0..800)]);
        assert!(single_draw(0).is_empty());
    }

    #[test]
    fn list_draws_one_call_per_run() {
        assert_eq!(
            runs_by_layer(&layers(&[1, 1, 0, 2, 2, 2, 1])),
            [call(1, 0..2), call(0, 2..3), call(2, 3..6), call(1, 6..7)]
        );
        assert!(runs_by_layer(&[]).is_empty());
    }

    #[test]
    fn list_runs_cover_all_instances() {
        let layers = layers(&[3, 0, 0, 1, 3, 3, 2, 0]);
        let calls = runs_by_layer(&layers);
        let covered: u32 = calls.iter().map(|c| c.instances.len() as u32).sum();
        assert_eq!(covered, layers.len() as u32);
        for call in calls {
            for i in call.instances {
                assert_eq!(layers[i as usize].index(), call.visual);
            }
        }
    }

    #[test]
    fn auto_prefers_the_array_if_it_fits() {
        assert_eq!(
            TextureStrategy::Auto.resolve(10, 256),
            TextureStrategy::ArrayAtlas
        );
        assert_eq!(
            TextureStrategy::Auto.resolve(300, 256),
            TextureStrategy::TextureList
        );
        assert_eq!(
            TextureStrategy::ArrayAtlas.resolve(300, 256),
            TextureStrategy::TextureList
        );
        assert_eq!(
            TextureStrategy::TextureList.resolve(10, 256),
            TextureStrategy::TextureList
        );
    }
}
