use wgpu::util::DeviceExt;

use isomap_geometry::Matrix4;

use crate::{
    pods::{self, AsBytes, ToPod},
    tools::AsBindingResource,
};

/// The `projection_matrix` uniform.
#[derive(Debug)]
pub struct ProjectionBuffer(wgpu::Buffer);

impl ProjectionBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let identity = Matrix4::IDENTITY.to_pod();

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Projection Matrix Buffer"),
            contents: identity.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self(buffer)
    }

    pub fn write(&self, queue: &wgpu::Queue, matrix: &Matrix4) {
        let pod: pods::Matrix4 = matrix.to_pod();
        queue.write_buffer(&self.0, 0, pod.as_bytes());
    }
}

impl AsBindingResource for ProjectionBuffer {
    fn as_binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.0.as_entire_binding()
    }
}

impl Drop for ProjectionBuffer {
    fn drop(&mut self) {
        self.0.destroy();
    }
}
