use anyhow::{Context, Result};
use log::{info, warn};

#[derive(Debug, Clone)]
pub struct RenderDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub alpha_mode: wgpu::CompositeAlphaMode,
    pub capabilities: DeviceCapabilities,
}

/// What the device ended up with after falling back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub backend: wgpu::Backend,
    pub max_texture_array_layers: u32,
    /// A software adapter was used because no hardware adapter could present the surface.
    pub fallback_adapter: bool,
    /// The adapter's own limits were refused and the device runs with downlevel limits.
    pub downlevel_limits: bool,
}

impl RenderDevice {
    pub async fn for_surface(
        instance: wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<Self> {
        let (adapter, fallback_adapter) = get_adapter_for_surface(&instance, surface).await?;

        let info = adapter.get_info();
        info!("GPU Adapter: {} ({:?})", info.name, info.backend);
        let surface_caps = surface.get_capabilities(&adapter);
        // Sprite colors are uploaded as they are, without sRGB conversion.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("Surface is not supported by the adapter")?;

        info!("- Surface format: {surface_format:?}");
        info!(
            "- Available present modes: {:?}",
            surface_caps.present_modes
        );
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        info!("- Selected alpha mode: {alpha_mode:?}");

        let (device, queue, downlevel_limits) = get_device_and_queue_from_adapter(&adapter).await?;

        let limits = device.limits();
        info!(
            "- Max texture dimension: {}, max texture array layers: {}",
            limits.max_texture_dimension_2d, limits.max_texture_array_layers
        );

        Ok(Self {
            device,
            queue,
            surface_format,
            alpha_mode,
            capabilities: DeviceCapabilities {
                backend: info.backend,
                max_texture_array_layers: limits.max_texture_array_layers,
                fallback_adapter,
                downlevel_limits,
            },
        })
    }
}

/// Tries the adapter's own limits first, then the downlevel WebGL2 limits.
async fn get_device_and_queue_from_adapter(
    adapter: &wgpu::Adapter,
) -> Result<(wgpu::Device, wgpu::Queue, bool)> {
    match request_device(adapter, adapter.limits()).await {
        Ok((device, queue)) => Ok((device, queue, false)),
        Err(e) => {
            warn!("Requesting a device with the adapter's limits failed: {e}, retrying with downlevel limits");
            let limits =
                wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
            let (device, queue) = request_device(adapter, limits)
                .await
                .context("Requesting device with downlevel limits")?;
            Ok((device, queue, true))
        }
    }
}

async fn request_device(
    adapter: &wgpu::Adapter,
    required_limits: wgpu::Limits,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Sprite Device"),
            required_features: wgpu::Features::empty(),
            required_limits,
            memory_hints: Default::default(),
            trace: Default::default(),
        })
        .await
        .context("Requesting device")
}

/// Returns the adapter and whether it is a fallback (software) adapter.
async fn get_adapter_for_surface(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'static>,
) -> Result<(wgpu::Adapter, bool)> {
    let request = |force_fallback_adapter| {
        instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::None,
            // Be sure the adapter can present the surface.
            compatible_surface: Some(surface),
            force_fallback_adapter,
        })
    };

    match request(false).await {
        Ok(adapter) => Ok((adapter, false)),
        Err(e) => {
            warn!("No hardware GPU adapter found ({e}), trying the fallback adapter");
            let adapter = request(true).await.context("GPU Adapter not found")?;
            Ok((adapter, true))
        }
    }
}
