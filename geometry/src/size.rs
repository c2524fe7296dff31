use crate::{Point, SizePx};

#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The vector from the bottom left corner to the center.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl From<SizePx> for Size {
    fn from(size: SizePx) -> Self {
        Size::new(size.width as f64, size.height as f64)
    }
}
