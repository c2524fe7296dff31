//! The tile map: a grid of randomly assigned terrain sprites and its staggered layout in pixel
//! space.

mod grid;
mod index_source;
pub mod layout;

pub use grid::*;
pub use index_source::*;
