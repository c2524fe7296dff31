//! The view onto the map: viewport size, the pan origin, and the resulting projection.

use std::time::{Duration, Instant};

use log::debug;

use isomap_animation::{Animated, Interpolation};
use isomap_geometry::{Matrix4, Point, Projection, Size, SizePx, ToVector3, Vector};

pub const DEFAULT_RECENTER_DURATION: Duration = Duration::from_millis(300);

/// Map pixels are shifted by the negated origin and then projected into the viewport.
///
/// The world point at `origin` is shown at the bottom left corner of the viewport.
#[derive(Debug, Clone)]
pub struct MapView {
    viewport: SizePx,
    projection: Projection,
    origin: Animated<Point>,
    recenter_duration: Duration,
    interpolation: Interpolation,
}

impl MapView {
    pub fn new(viewport: impl Into<SizePx>) -> Self {
        let viewport = clamp_viewport(viewport.into());
        Self {
            viewport,
            projection: Projection::for_viewport(viewport),
            origin: Animated::new(Point::ZERO),
            recenter_duration: DEFAULT_RECENTER_DURATION,
            interpolation: Interpolation::CubicInOut,
        }
    }

    pub fn with_recenter_duration(mut self, duration: Duration) -> Self {
        self.recenter_duration = duration;
        self
    }

    pub fn viewport(&self) -> SizePx {
        self.viewport
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Rebuilds the projection. Returns `false` if the size did not change.
    ///
    /// Dimensions are at least 1 pixel.
    pub fn resize(&mut self, viewport: impl Into<SizePx>) -> bool {
        let viewport = clamp_viewport(viewport.into());
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.projection = Projection::for_viewport(viewport);
        debug!("Map view resized to {}x{}", viewport.width, viewport.height);
        true
    }

    /// The pan origin at `now`.
    pub fn origin(&self, now: Instant) -> Point {
        self.origin.value(now)
    }

    /// Advance a running recenter animation. Returns the origin at `now`.
    pub fn tick(&mut self, now: Instant) -> Point {
        self.origin.tick(now)
    }

    pub fn is_animating(&self) -> bool {
        self.origin.is_animating()
    }

    /// Move the origin by `delta` pixels. A running recenter animation stops where it is.
    pub fn pan(&mut self, delta: Vector, now: Instant) {
        let origin = self.origin.value(now) + delta;
        self.origin.set_immediately(origin);
    }

    /// Move the origin so that `point` appears in the center of the viewport.
    pub fn recenter(&mut self, point: Point, animate: bool, now: Instant) {
        let target = point - Size::from(self.viewport).center();
        if animate {
            self.origin
                .animate(target, now, self.recenter_duration, self.interpolation);
        } else {
            self.origin.set_immediately(target);
        }
    }

    /// Map pixels to normalized device coordinates.
    pub fn view_projection(&self, now: Instant) -> Matrix4 {
        let origin = self.origin(now);
        self.projection.to_matrix4() * Matrix4::from_translation(-origin.to_vector3())
    }

    /// Where the map point ends up in normalized device coordinates.
    pub fn project(&self, point: Point, now: Instant) -> Point {
        self.projection.project(point - self.origin(now))
    }

    /// Convert a window position (origin top left, y down) into map pixels.
    pub fn screen_to_world(&self, screen: Point, now: Instant) -> Point {
        let flipped = Point::new(screen.x, self.viewport.height as f64 - screen.y);
        flipped + self.origin(now)
    }
}

fn clamp_viewport(viewport: SizePx) -> SizePx {
    SizePx::new(viewport.width.max(1), viewport.height.max(1))
}
