//! Staggered row layout.
//!
//! Rows are `ROW_STEP` pixels apart, odd rows are shifted right by `STAGGER` pixels. Positions
//! are the bottom left corner of a `TILE_WIDTH` x `TILE_HEIGHT` sprite box, y points up.

pub const TILE_WIDTH: u32 = 96;
pub const TILE_HEIGHT: u32 = 48;
pub const ROW_STEP: u32 = TILE_HEIGHT / 2;
pub const STAGGER: u32 = TILE_WIDTH / 2;

/// The pixel position of the tile at column `ix` and row `iy`.
pub fn tile_position(ix: usize, iy: usize) -> (f32, f32) {
    let stagger = if iy % 2 == 1 { STAGGER } else { 0 };
    let x = ix as f32 * TILE_WIDTH as f32 + stagger as f32;
    let y = iy as f32 * ROW_STEP as f32;
    (x, y)
}
