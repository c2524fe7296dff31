//! The renderer's configuration

use std::time::Duration;

use crate::{map_view::DEFAULT_RECENTER_DURATION, program::ProgramSource, sprite_visuals::TextureStrategy};

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub texture_strategy: TextureStrategy,
    /// Replaces the built-in program of the chosen texture strategy.
    pub program: Option<ProgramSource>,
    pub clear_color: wgpu::Color,
    pub recenter_duration: Duration,
    /// Wait for every frame to complete and collect frame times.
    pub measure: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_strategy: TextureStrategy::Auto,
            program: None,
            clear_color: wgpu::Color::BLACK,
            recenter_duration: DEFAULT_RECENTER_DURATION,
            measure: false,
        }
    }
}
