use crate::{Matrix4, Point, SizePx, Vector, Vector3};

/// An affine transform from pixel coordinates to normalized device coordinates.
///
/// `ndc = pixel * scale + translate`. Built for a viewport so that its bottom left pixel corner
/// lands on `(-1, -1)` and its top right corner on `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: Vector,
    pub translate: Vector,
}

impl Default for Projection {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Projection {
    pub const IDENTITY: Self = Self {
        scale: Vector::new(1.0, 1.0),
        translate: Vector::ZERO,
    };

    /// Create the projection for a viewport of the given pixel size.
    ///
    /// Zero sized dimensions are treated as 1 pixel.
    pub fn for_viewport(size: impl Into<SizePx>) -> Self {
        let size = size.into();
        let (width, height) = (size.width.max(1) as f64, size.height.max(1) as f64);
        Self {
            scale: Vector::new(2.0 / width, 2.0 / height),
            translate: Vector::new(-1.0, -1.0),
        }
    }

    pub fn project(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale.x + self.translate.x,
            point.y * self.scale.y + self.translate.y,
        )
    }

    /// Maps normalized device coordinates back to pixels.
    pub fn unproject(&self, ndc: Point) -> Point {
        Point::new(
            (ndc.x - self.translate.x) / self.scale.x,
            (ndc.y - self.translate.y) / self.scale.y,
        )
    }

    pub fn to_matrix4(&self) -> Matrix4 {
        Matrix4::from_translation(Vector3::new(self.translate.x, self.translate.y, 0.0))
            * Matrix4::from_scale(Vector3::new(self.scale.x, self.scale.y, 1.0))
    }
}
