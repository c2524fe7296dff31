//! Instanced sprite rendering for the tile map.
//!
//! Every sprite is the same quad, drawn once per instance with its own offset and sprite layer.
//! Sprite textures live in one texture array, or in a list of textures on devices with too few
//! array layers.

mod catalog;
mod config;
mod instance_buffer;
pub mod map_view;
mod pods;
mod program;
mod projection_buffer;
mod quad_geometry;
mod render_device;
mod renderer;
pub mod sprite_visuals;
mod stats;
pub mod tools;

pub use catalog::*;
pub use config::*;
pub use instance_buffer::{InstanceBuffer, InstanceData};
pub use map_view::MapView;
pub use pods::{InstanceLayer, InstanceOffset, QuadVertex};
pub use program::*;
pub use quad_geometry::{QUAD_VERTICES, QuadGeometry};
pub use render_device::*;
pub use renderer::SpriteRenderer;
pub use sprite_visuals::{DrawCall, SpriteVisuals, TextureStrategy};
pub use stats::{FrameStats, MeasureSeries};
