//! Geometry primitives for the map view: pixel space points, sizes, and the projection into
//! normalized device coordinates.

mod point;
mod projection;
mod size;

pub use point::*;
pub use projection::*;
pub use size::*;

pub type Matrix4 = glam::DMat4;
pub type Vector3 = glam::DVec3;
pub type Vector4 = glam::DVec4;

pub struct PixelUnit;
pub type SizePx = euclid::Size2D<u32, PixelUnit>;

pub trait ToVector3 {
    fn to_vector3(self) -> Vector3;
}

impl ToVector3 for Point {
    fn to_vector3(self) -> Vector3 {
        Vector3::new(self.x, self.y, 0.0)
    }
}
