use std::{marker::PhantomData, mem::size_of};

use bytemuck::Pod;
use log::debug;

use isomap_terrain::DrawnSprite;

use crate::pods::{InstanceLayer, InstanceOffset};

/// The per instance attributes of one frame, in draw order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstanceData {
    pub offsets: Vec<InstanceOffset>,
    pub layers: Vec<InstanceLayer>,
}

impl InstanceData {
    /// Panics if a sprite index is outside of `0..catalog_len`.
    pub fn from_sprites(sprites: impl IntoIterator<Item = DrawnSprite>, catalog_len: usize) -> Self {
        let sprites = sprites.into_iter();
        let (lower, _) = sprites.size_hint();
        let mut data = Self {
            offsets: Vec::with_capacity(lower),
            layers: Vec::with_capacity(lower),
        };

        for sprite in sprites {
            assert!(
                sprite.sprite_index < catalog_len,
                "Sprite index {} is out of the catalog range 0..{catalog_len}",
                sprite.sprite_index
            );
            data.offsets.push(InstanceOffset([sprite.x, sprite.y]));
            data.layers.push(InstanceLayer(sprite.sprite_index as f32));
        }

        data
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// A vertex buffer holding exactly the instances of the current frame.
///
/// The GPU buffer is recreated whenever the byte size changes and released when there are no
/// instances.
#[derive(Debug)]
pub struct InstanceBuffer<T> {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    len: usize,
    _instance: PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            len: 0,
            _instance: PhantomData,
        }
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[T]) {
        let size = byte_size::<T>(instances.len());
        self.len = instances.len();

        match plan_allocation(self.allocated(), size) {
            Allocation::Release => {
                self.release();
                return;
            }
            Allocation::Reuse => {}
            Allocation::Allocate(size) => {
                self.release();
                debug!("Allocating `{}`: {size} bytes", self.label);
                self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(self.label),
                    size,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
            }
        }

        if let Some(buffer) = &self.buffer {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The size of the GPU buffer in bytes, 0 if none is allocated.
    pub fn size(&self) -> wgpu::BufferAddress {
        self.allocated().unwrap_or_default()
    }

    fn allocated(&self) -> Option<wgpu::BufferAddress> {
        self.buffer.as_ref().map(|b| b.size())
    }

    /// Binds the instances to `slot`. Returns `false` if there is nothing to bind.
    pub fn set(&self, pass: &mut wgpu::RenderPass, slot: u32) -> bool {
        match &self.buffer {
            Some(buffer) => {
                pass.set_vertex_buffer(slot, buffer.slice(..));
                true
            }
            None => false,
        }
    }
}

impl<T> InstanceBuffer<T> {
    fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
    }
}

impl<T> Drop for InstanceBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Allocation {
    /// The current buffer has the wanted size.
    Reuse,
    /// Replace the current buffer, if any, with one of this size.
    Allocate(wgpu::BufferAddress),
    /// Nothing to hold, drop the current buffer.
    Release,
}

fn plan_allocation(
    current: Option<wgpu::BufferAddress>,
    wanted: wgpu::BufferAddress,
) -> Allocation {
    match current {
        _ if wanted == 0 => Allocation::Release,
        Some(size) if size == wanted => Allocation::Reuse,
        _ => Allocation::Allocate(wanted),
    }
}

pub fn byte_size<T>(count: usize) -> wgpu::BufferAddress {
    (count * size_of::<T>()) as wgpu::BufferAddress
}

#[cfg(test)]
mod tests {
    use isomap_terrain::{DrawnSprite, TileGrid};

    use super::{Allocation, InstanceData, byte_size, plan_allocation};
    use crate::pods::{InstanceLayer, InstanceOffset};

    #[test]
    fn sprites_become_offsets_and_layers() {
        let data = InstanceData::from_sprites(
            [
                DrawnSprite {
                    sprite_index: 2,
                    x: 48.0,
                    y: 24.0,
                },
                DrawnSprite {
                    sprite_index: 0,
                    x: 96.0,
                    y: 0.0,
                },
            ],
            3,
        );

        assert_eq!(data.offsets, [InstanceOffset([48.0, 24.0]), InstanceOffset([96.0, 0.0])]);
        assert_eq!(data.layers, [InstanceLayer(2.0), InstanceLayer(0.0)]);
        assert_eq!(data.layers[0].index(), 2);
    }

    #[test]
    fn buffer_sizes_match_the_instance_count() {
        let grid = TileGrid::seeded(20, 40, 10, 3);
        let data = InstanceData::from_sprites(grid.drawn_sprites(), 10);

        assert_eq!(data.len(), 800);
        assert_eq!(byte_size::<InstanceOffset>(data.offsets.len()), 800 * 2 * 4);
        assert_eq!(byte_size::<InstanceLayer>(data.layers.len()), 800 * 4);
    }

    #[test]
    fn buffers_are_reused_reallocated_and_released() {
        let mut current = None;
        let mut steps = Vec::new();
        for count in [800, 800, 3, 0, 5] {
            let wanted = byte_size::<InstanceOffset>(count);
            let allocation = plan_allocation(current, wanted);
            current = match allocation {
                Allocation::Reuse => current,
                Allocation::Allocate(size) => Some(size),
                Allocation::Release => None,
            };
            assert_eq!(current.unwrap_or_default(), count as u64 * 2 * 4);
            steps.push(allocation);
        }

        assert_eq!(
            steps,
            [
                Allocation::Allocate(6400),
                Allocation::Reuse,
                Allocation::Allocate(24),
                Allocation::Release,
                Allocation::Allocate(40),
            ]
        );
    }

    #[test]
    fn nothing_is_allocated_for_no_instances() {
        assert_eq!(plan_allocation(None, 0), Allocation::Release);
        assert_eq!(plan_allocation(None, 4), Allocation::Allocate(4));
        assert_eq!(plan_allocation(Some(4), 4), Allocation::Reuse);
    }

    #[test]
    fn no_sprites_no_instances() {
        let data = InstanceData::from_sprites(Vec::<DrawnSprite>::new(), 4);
        assert!(data.is_empty());
        assert_eq!(byte_size::<InstanceOffset>(data.len()), 0);
    }

    #[test]
    #[should_panic(expected = "out of the catalog range")]
    fn index_outside_of_the_catalog_panics() {
        InstanceData::from_sprites(
            [DrawnSprite {
                sprite_index: 3,
                x: 0.0,
                y: 0.0,
            }],
            3,
        );
    }
}
