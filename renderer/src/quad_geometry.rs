use wgpu::util::DeviceExt;

use crate::{catalog::SPRITE_SIZE, pods::QuadVertex};

const W: f32 = SPRITE_SIZE.0 as f32;
const H: f32 = SPRITE_SIZE.1 as f32;

/// Two counter-clockwise triangles covering one sprite, anchored at the bottom left.
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex::new((0.0, 0.0), (0.0, 0.0)),
    QuadVertex::new((W, 0.0), (1.0, 0.0)),
    QuadVertex::new((W, H), (1.0, 1.0)),
    QuadVertex::new((0.0, 0.0), (0.0, 0.0)),
    QuadVertex::new((W, H), (1.0, 1.0)),
    QuadVertex::new((0.0, H), (0.0, 1.0)),
];

/// The quad every sprite instance is drawn with. Uploaded once.
#[derive(Debug)]
pub struct QuadGeometry {
    buffer: wgpu::Buffer,
}

impl QuadGeometry {
    pub const VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;

    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { buffer }
    }

    pub fn set(&self, pass: &mut wgpu::RenderPass, slot: u32) {
        pass.set_vertex_buffer(slot, self.buffer.slice(..));
    }
}

impl Drop for QuadGeometry {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::QUAD_VERTICES;

    fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
        ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])) / 2.0
    }

    #[test]
    fn quad_covers_the_sprite_with_two_front_facing_triangles() {
        let total: f32 = QUAD_VERTICES
            .chunks(3)
            .map(|t| {
                let area = signed_area(t[0].position, t[1].position, t[2].position);
                assert!(area > 0.0);
                area
            })
            .sum();
        assert_eq!(total, 96.0 * 48.0);
    }

    #[test]
    fn uv_follows_position() {
        for v in QUAD_VERTICES {
            assert_eq!(v.uv, [v.position[0] / 96.0, v.position[1] / 48.0]);
        }
    }
}
