use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexStepMode};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Matrix4(pub [[f32; 4]; 4]);

// WebGL uniform requirement
const_assert_eq!(size_of::<Matrix4>() % 16, 0);

/// A corner of the shared sprite quad, in pixels, with its texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const fn new(position: (f32, f32), uv: (f32, f32)) -> Self {
        Self {
            position: [position.0, position.1],
            uv: [uv.0, uv.1],
        }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

        VertexBufferLayout {
            array_stride: size_of::<QuadVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// Per instance: where the sprite's bottom left corner goes, in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceOffset(pub [f32; 2]);

impl InstanceOffset {
    pub const COMPONENTS: usize = 2;

    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

        VertexBufferLayout {
            array_stride: size_of::<InstanceOffset>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// Per instance: the sprite index, used as the texture array layer in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceLayer(pub f32);

impl InstanceLayer {
    pub const COMPONENTS: usize = 1;

    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32];

        VertexBufferLayout {
            array_stride: size_of::<InstanceLayer>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

const_assert_eq!(
    size_of::<InstanceOffset>(),
    InstanceOffset::COMPONENTS * size_of::<f32>()
);
const_assert_eq!(
    size_of::<InstanceLayer>(),
    InstanceLayer::COMPONENTS * size_of::<f32>()
);

pub trait ToPod {
    type Pod;
    fn to_pod(&self) -> Self::Pod;
}

impl ToPod for isomap_geometry::Matrix4 {
    type Pod = Matrix4;

    fn to_pod(&self) -> Self::Pod {
        Matrix4(self.as_mat4().to_cols_array_2d())
    }
}

pub trait AsBytes {
    fn as_bytes(&self) -> &[u8];
}

impl<T: Pod> AsBytes for T {
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
