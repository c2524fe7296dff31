use std::{result, time::Instant};

use anyhow::{Context, Result, bail};
use derive_more::Debug;
use log::{info, warn};
use wgpu::{PresentMode, StoreOp, SurfaceTexture};

use isomap_geometry::{Point, SizePx, Vector};
use isomap_terrain::DrawnSprite;

use crate::{
    RenderDevice, SpriteCatalog, bind_group_entries,
    config::RendererConfig,
    instance_buffer::{InstanceBuffer, InstanceData},
    map_view::MapView,
    pods::{InstanceLayer, InstanceOffset},
    program::compile_program,
    projection_buffer::ProjectionBuffer,
    quad_geometry::QuadGeometry,
    sprite_visuals::{SpriteVisuals, create_visuals},
    stats::{FrameStats, MeasureSeries},
    tools::{BindGroupLayoutBuilder, LAYER_SLOT, OFFSET_SLOT, QUAD_SLOT},
};

const DESIRED_MAXIMUM_FRAME_LATENCY: u32 = 1;

const PROJECTION_GROUP: u32 = 0;
const SPRITE_GROUP: u32 = 1;

/// Draws a list of sprites with one quad and per instance offsets and layers.
///
/// Fields are dropped in declaration order: the per frame buffers first, the device last.
#[derive(Debug)]
pub struct SpriteRenderer {
    offsets: InstanceBuffer<InstanceOffset>,
    layers: InstanceBuffer<InstanceLayer>,
    quad: QuadGeometry,
    #[debug(skip)]
    visuals: Box<dyn SpriteVisuals>,
    projection_buffer: ProjectionBuffer,
    projection_bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,

    surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub device: RenderDevice,

    view: MapView,
    catalog_len: usize,
    config: RendererConfig,
    pub measure_series: MeasureSeries,
}

impl SpriteRenderer {
    /// Configures the surface, uploads the catalog, and compiles the sprite program.
    ///
    /// Validation errors while creating the GPU resources are returned as errors.
    pub async fn new(
        device: RenderDevice,
        surface: wgpu::Surface<'static>,
        initial_size: (u32, u32),
        catalog: &SpriteCatalog,
        config: RendererConfig,
    ) -> Result<Self> {
        let surface_size = (initial_size.0.max(1), initial_size.1.max(1));
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: device.surface_format,
            width: surface_size.0,
            height: surface_size.1,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: device.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: DESIRED_MAXIMUM_FRAME_LATENCY,
        };

        let wgpu_device = &device.device;
        wgpu_device.push_error_scope(wgpu::ErrorFilter::Validation);

        surface.configure(wgpu_device, &surface_config);

        let visuals = create_visuals(
            config.texture_strategy,
            wgpu_device,
            &device.queue,
            catalog,
            device.capabilities.max_texture_array_layers,
        );

        let projection_layout = BindGroupLayoutBuilder::vertex()
            .uniform()
            .build("Projection Bind Group Layout", wgpu_device);
        let projection_buffer = ProjectionBuffer::new(wgpu_device);
        let projection_bind_group = wgpu_device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Projection Bind Group"),
            layout: &projection_layout,
            entries: bind_group_entries!(0 => &projection_buffer),
        });

        let quad = QuadGeometry::new(wgpu_device);

        if let Some(error) = wgpu_device.pop_error_scope().await {
            bail!("Creating the sprite resources failed: {error}");
        }

        let program = config
            .program
            .clone()
            .unwrap_or_else(|| visuals.default_program());
        let pipeline = compile_program(
            wgpu_device,
            &program,
            &[&projection_layout, visuals.bind_group_layout()],
            device.surface_format,
        )
        .await?;

        let capabilities = &device.capabilities;
        info!(
            "Sprite renderer ready: {} sprites, {}, program `{}` on {:?}{}{}",
            catalog.len(),
            visuals.name(),
            program.label,
            capabilities.backend,
            if capabilities.fallback_adapter { ", fallback adapter" } else { "" },
            if capabilities.downlevel_limits { ", downlevel limits" } else { "" },
        );

        let view = MapView::new(SizePx::new(surface_size.0, surface_size.1))
            .with_recenter_duration(config.recenter_duration);

        Ok(Self {
            offsets: InstanceBuffer::new("Sprite Offsets"),
            layers: InstanceBuffer::new("Sprite Layers"),
            quad,
            visuals,
            projection_buffer,
            projection_bind_group,
            pipeline,
            surface,
            surface_config,
            device,
            view,
            catalog_len: catalog.len(),
            config,
            measure_series: MeasureSeries::default(),
        })
    }

    /// This is `&mut self`, because it might call into [`Self::reconfigure_surface`] when the
    /// surface is lost.
    pub fn get_current_texture(&mut self) -> result::Result<SurfaceTexture, wgpu::SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(e) => {
                // Reconfigure and re-acquire once.
                warn!("Surface error: {e:?}, retrying...");
                self.reconfigure_surface();
                self.surface.get_current_texture()
            }
        }
    }

    /// Render the sprites in the given order and present the frame.
    ///
    /// Without sprites the frame is only cleared. Panics if a sprite index is outside of the
    /// catalog.
    #[tracing::instrument(skip_all)]
    pub fn render(
        &mut self,
        sprites: impl IntoIterator<Item = DrawnSprite>,
        now: Instant,
    ) -> Result<FrameStats> {
        self.view.tick(now);

        let instances = InstanceData::from_sprites(sprites, self.catalog_len);
        let draw_calls = self.visuals.plan(&instances.layers);

        let (device, queue) = (&self.device.device, &self.device.queue);
        self.offsets.upload(device, queue, &instances.offsets);
        self.layers.upload(device, queue, &instances.layers);
        self.projection_buffer
            .write(queue, &self.view.view_projection(now));

        let surface_texture = self
            .get_current_texture()
            .context("Acquiring the next surface texture")?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let render_start_time = Instant::now();
        let device = &self.device.device;

        let command_buffer = {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sprite Encoder"),
            });

            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Sprite Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &surface_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.config.clear_color),
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                if !draw_calls.is_empty() {
                    pass.set_pipeline(&self.pipeline);
                    pass.set_bind_group(PROJECTION_GROUP, &self.projection_bind_group, &[]);
                    self.quad.set(&mut pass, QUAD_SLOT);
                    self.offsets.set(&mut pass, OFFSET_SLOT);
                    self.layers.set(&mut pass, LAYER_SLOT);

                    for call in &draw_calls {
                        self.visuals.bind(&mut pass, SPRITE_GROUP, call);
                        pass.draw(0..QuadGeometry::VERTEX_COUNT, call.instances.clone());
                    }
                }
            }
            encoder.finish()
        };

        let submit_index = self.device.queue.submit([command_buffer]);

        let stats = FrameStats {
            instances: instances.len(),
            draw_calls: draw_calls.len(),
        };

        if self.config.measure {
            device
                .poll(wgpu::PollType::WaitForSubmissionIndex(submit_index))
                .context("Waiting for the frame")?;
            self.measure_series
                .add_sample(render_start_time.elapsed(), stats);
        }

        surface_texture.present();
        Ok(stats)
    }

    /// Resizes the surface and the view, if necessary.
    ///
    /// Keeps the minimum surface size at at least 1x1.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        let new_surface_size = (new_size.0.max(1), new_size.1.max(1));
        self.view
            .resize(SizePx::new(new_surface_size.0, new_surface_size.1));

        if new_surface_size == self.surface_size() {
            return;
        }
        let config = &mut self.surface_config;
        config.width = new_surface_size.0;
        config.height = new_surface_size.1;

        self.reconfigure_surface();
    }

    /// Returns the current surface size.
    ///
    /// It may not exactly match the window's size, for example if the window's size is 0,0, the
    /// surface's size will be 1x1.
    pub fn surface_size(&self) -> (u32, u32) {
        let config = &self.surface_config;
        (config.width, config.height)
    }

    pub fn reconfigure_surface(&mut self) {
        info!("Reconfiguring surface {:?}", self.surface_config);
        self.surface
            .configure(&self.device.device, &self.surface_config);
    }

    pub fn pan(&mut self, delta: Vector, now: Instant) {
        self.view.pan(delta, now);
    }

    pub fn recenter(&mut self, point: Point, animate: bool, now: Instant) {
        self.view.recenter(point, animate, now);
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn is_animating(&self) -> bool {
        self.view.is_animating()
    }
}

impl Drop for SpriteRenderer {
    fn drop(&mut self) {
        info!(
            "Releasing sprite renderer ({} instance bytes, {} sprites)",
            self.offsets.size() + self.layers.size(),
            self.catalog_len
        );
    }
}
