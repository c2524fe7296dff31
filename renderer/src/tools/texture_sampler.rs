use wgpu::{AddressMode, Device, FilterMode, Sampler, SamplerDescriptor};

/// Creates a nearest neighbor, edge clamping sampler.
///
/// Sprites are drawn at their native size, texels map 1:1 to pixels.
pub fn nearest_clamping(device: &Device) -> Sampler {
    device.create_sampler(&SamplerDescriptor {
        label: Some("Nearest / Clamping Sprite Sampler"),
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        address_mode_w: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Nearest,
        min_filter: FilterMode::Nearest,
        ..Default::default()
    })
}
