use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use futures::executor::block_on;
use log::{error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::ModifiersState,
    window::{Window, WindowAttributes, WindowId},
};

use isomap_geometry::Point;
use isomap_renderer::{RenderDevice, RendererConfig, SpriteCatalog, SpriteRenderer};
use isomap_terrain::TileGrid;

use crate::config::MapConfig;

/// Owns the window and the renderer and feeds them with winit events.
///
/// The renderer is created on `resumed` and dropped before the window.
pub struct MapApp {
    config: MapConfig,
    catalog: SpriteCatalog,
    grid: TileGrid,

    renderer: Option<SpriteRenderer>,
    window: Option<Arc<Window>>,

    /// Last known cursor position in physical pixels, top left origin.
    cursor: Option<Point>,
    modifiers: ModifiersState,
    error: Option<anyhow::Error>,
}

impl MapApp {
    pub fn new(config: MapConfig, catalog: SpriteCatalog, grid: TileGrid) -> Self {
        Self {
            config,
            catalog,
            grid,
            renderer: None,
            window: None,
            cursor: None,
            modifiers: ModifiersState::empty(),
            error: None,
        }
    }

    /// The fatal error that ended the event loop, if any.
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn create_window_and_renderer(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title("isomap")
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Creating the window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Creating the surface")?;

        let device = block_on(RenderDevice::for_surface(instance, &surface))?;

        let renderer_config = RendererConfig {
            texture_strategy: self.config.texture_strategy,
            recenter_duration: self.config.recenter_duration(),
            ..RendererConfig::default()
        };
        let size = window.inner_size();
        let mut renderer = block_on(SpriteRenderer::new(
            device,
            surface,
            (size.width, size.height),
            &self.catalog,
            renderer_config,
        ))?;

        let (width, height) = self.grid.extent();
        renderer.recenter(
            Point::new(width as f64 / 2.0, height as f64 / 2.0),
            false,
            Instant::now(),
        );

        window.request_redraw();
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        match renderer.render(self.grid.drawn_sprites(), Instant::now()) {
            Ok(stats) => trace!("{stats:?}"),
            Err(e) => {
                if matches!(
                    e.downcast_ref::<wgpu::SurfaceError>(),
                    Some(wgpu::SurfaceError::OutOfMemory)
                ) {
                    self.error = Some(e);
                    event_loop.exit();
                    return;
                }
                // Outdated and timeout errors are resolved by one of the next frames.
                error!("Skipping frame: {e:?}");
            }
        }

        if renderer.is_animating() {
            window.request_redraw();
        }
    }

    fn recenter_at_cursor(&mut self) {
        let (Some(renderer), Some(window), Some(cursor)) =
            (&mut self.renderer, &self.window, self.cursor)
        else {
            return;
        };

        let now = Instant::now();
        let target = renderer.view().screen_to_world(cursor, now);
        info!("Recentering at {target:?}");
        renderer.recenter(target, true, now);
        window.request_redraw();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize((size.width, size.height));
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for MapApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(e) = self.create_window_and_renderer(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize(size);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(Point::new(position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Right,
                ..
            } if self.modifiers.is_empty() => self.recenter_at_cursor(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
