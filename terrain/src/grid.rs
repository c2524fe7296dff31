use std::iter::FusedIterator;

use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    IndexSource,
    layout::{self, ROW_STEP, STAGGER, TILE_HEIGHT, TILE_WIDTH},
};

/// One tile's sprite and where to draw it, in pixels with the origin at the bottom left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawnSprite {
    pub sprite_index: usize,
    pub x: f32,
    pub y: f32,
}

/// A fixed size grid of sprite indices.
///
/// Cells are stored column by column: the cell at `(ix, iy)` lives at `ix * height + iy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<usize>,
}

impl TileGrid {
    /// Fill a `width` x `height` grid with indices in `0..catalog_size` drawn from `source`.
    pub fn generate(
        width: usize,
        height: usize,
        catalog_size: usize,
        source: &mut (impl IndexSource + ?Sized),
    ) -> Self {
        let Some(len) = width.checked_mul(height) else {
            panic!("A {width}x{height} tile grid has more cells than fit into memory");
        };
        assert!(
            catalog_size > 0 || len == 0,
            "Can't fill a {width}x{height} grid from an empty sprite catalog"
        );

        let cells: Vec<usize> = (0..len).map(|_| source.next_index(catalog_size)).collect();
        debug!("Generated a {width}x{height} tile grid from {catalog_size} sprites");

        Self {
            width,
            height,
            cells,
        }
    }

    /// A reproducible grid for the given seed.
    pub fn seeded(width: usize, height: usize, catalog_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(width, height, catalog_size, &mut rng)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The sprite index at column `ix` and row `iy`.
    pub fn get(&self, ix: usize, iy: usize) -> Option<usize> {
        if ix >= self.width || iy >= self.height {
            return None;
        }
        Some(self.cells[ix * self.height + iy])
    }

    /// All tiles with their positions, column by column.
    ///
    /// This is recomputed from the grid on every call and can be called every frame.
    pub fn drawn_sprites(&self) -> DrawnSprites<'_> {
        DrawnSprites {
            grid: self,
            next: 0,
        }
    }

    pub fn render(&self) -> Vec<DrawnSprite> {
        self.drawn_sprites().collect()
    }

    /// The pixel size covered by all tiles.
    pub fn extent(&self) -> (f32, f32) {
        if self.is_empty() {
            return (0.0, 0.0);
        }
        let stagger = if self.height > 1 { STAGGER } else { 0 };
        let width = self.width as f32 * TILE_WIDTH as f32 + stagger as f32;
        let height = (self.height - 1) as f32 * ROW_STEP as f32 + TILE_HEIGHT as f32;
        (width, height)
    }
}

#[derive(Debug, Clone)]
pub struct DrawnSprites<'a> {
    grid: &'a TileGrid,
    next: usize,
}

impl Iterator for DrawnSprites<'_> {
    type Item = DrawnSprite;

    fn next(&mut self) -> Option<Self::Item> {
        let sprite_index = *self.grid.cells.get(self.next)?;
        let (ix, iy) = (self.next / self.grid.height, self.next % self.grid.height);
        self.next += 1;

        let (x, y) = layout::tile_position(ix, iy);
        Some(DrawnSprite { sprite_index, x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.cells.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DrawnSprites<'_> {}
impl FusedIterator for DrawnSprites<'_> {}

#[cfg(test)]
mod tests {
    use super::{DrawnSprite, TileGrid};
    use crate::SequenceSource;

    fn sprite(sprite_index: usize, x: f32, y: f32) -> DrawnSprite {
        DrawnSprite { sprite_index, x, y }
    }

    #[test]
    fn two_by_two_grid_from_a_fixed_sequence() {
        let grid = TileGrid::generate(2, 2, 3, &mut SequenceSource::new([1, 0, 2, 1]));

        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(0, 1), Some(0));
        assert_eq!(grid.get(1, 0), Some(2));
        assert_eq!(grid.get(1, 1), Some(1));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);

        assert_eq!(
            grid.render(),
            [
                sprite(1, 0.0, 0.0),
                sprite(0, 48.0, 24.0),
                sprite(2, 96.0, 0.0),
                sprite(1, 144.0, 24.0),
            ]
        );
    }

    #[test]
    fn every_cell_is_drawn_with_a_valid_index() {
        let grid = TileGrid::seeded(20, 40, 10, 42);
        let sprites = grid.render();

        assert_eq!(sprites.len(), 20 * 40);
        assert!(sprites.iter().all(|s| s.sprite_index < 10));
        assert_eq!(grid.drawn_sprites().len(), 800);
    }

    #[test]
    fn rendering_is_repeatable() {
        let grid = TileGrid::seeded(7, 9, 4, 1);
        assert_eq!(grid.render(), grid.render());

        let iter = grid.drawn_sprites();
        assert!(iter.clone().eq(iter));
    }

    #[test]
    fn same_seed_same_grid() {
        assert_eq!(TileGrid::seeded(20, 40, 10, 5), TileGrid::seeded(20, 40, 10, 5));
        assert_ne!(TileGrid::seeded(20, 40, 10, 5), TileGrid::seeded(20, 40, 10, 6));
    }

    #[test]
    fn empty_grid_needs_no_catalog() {
        let grid = TileGrid::generate(0, 5, 0, &mut SequenceSource::new([0]));
        assert!(grid.is_empty());
        assert_eq!(grid.drawn_sprites().count(), 0);
        assert_eq!(grid.extent(), (0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "empty sprite catalog")]
    fn empty_catalog_is_rejected() {
        TileGrid::seeded(2, 2, 0, 0);
    }

    #[test]
    fn extent_covers_the_staggered_rows() {
        assert_eq!(TileGrid::seeded(20, 40, 3, 0).extent(), (20.0 * 96.0 + 48.0, 39.0 * 24.0 + 48.0));
        assert_eq!(TileGrid::seeded(2, 1, 3, 0).extent(), (192.0, 48.0));
    }

    #[test]
    fn extent_of_a_wide_grid_does_not_wrap() {
        let width = u32::MAX as usize + 2;
        let grid = TileGrid {
            width,
            height: 1,
            cells: vec![0],
        };
        let (extent_width, extent_height) = grid.extent();
        assert_eq!(extent_width, width as f32 * 96.0);
        assert!(extent_width > u32::MAX as f32);
        assert_eq!(extent_height, 48.0);
    }

    #[test]
    #[should_panic(expected = "more cells than fit into memory")]
    fn overflowing_grid_size_is_rejected() {
        TileGrid::seeded(usize::MAX, 2, 3, 0);
    }
}
