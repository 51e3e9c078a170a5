mod atlas;
mod camera;
pub mod viewport;
mod zoom;

pub use atlas::{AtlasError, AtlasMetadata, PixelRect};
pub use camera::{Camera, ZoomMode};
pub use viewport::VisibleRange;
pub use zoom::Zoom;

use rand::Rng;
use std::collections::TryReserveError;

/// Width of the tile grid, in tiles.
pub const GRID_WIDTH: usize = 1000;
/// Height of the tile grid, in tiles.
pub const GRID_HEIGHT: usize = 1000;

/// Fixed-size field of atlas sprite indices, stored row-major in one
/// contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<u32>,
}
impl TileGrid {
    /// Returns a grid with every tile drawn uniformly from
    /// `0..max_exclusive`.
    ///
    /// # Panics
    ///
    /// This function panics if `max_exclusive` is zero.
    pub fn new_random(
        width: usize,
        height: usize,
        max_exclusive: u32,
        rng: &mut impl Rng,
    ) -> Result<Self, TryReserveError> {
        let mut tiles = Vec::new();
        tiles.try_reserve_exact(width * height)?;
        tiles.resize(width * height, 0);
        let mut grid = Self {
            width,
            height,
            tiles,
        };
        grid.fill(max_exclusive, rng);
        Ok(grid)
    }

    /// Overwrites every tile with a value drawn uniformly from
    /// `0..max_exclusive`.
    pub fn fill(&mut self, max_exclusive: u32, rng: &mut impl Rng) {
        assert!(max_exclusive > 0, "Cannot fill grid from an empty range");
        for tile in &mut self.tiles {
            *tile = rng.gen_range(0..max_exclusive);
        }
    }

    /// Returns the width and height of the grid, in tiles.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the sprite index at a position, or `None` if the position is
    /// outside the grid.
    pub fn get(&self, TilePos(x, y): TilePos) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.tiles[y * self.width + x])
        } else {
            None
        }
    }
}

/// Tile coordinates within the grid.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TilePos(pub usize, pub usize);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_fill_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = TileGrid::new_random(37, 23, 5, &mut rng).unwrap();
        assert_eq!(grid.dimensions(), (37, 23));

        let mut seen = [false; 5];
        for y in 0..23 {
            for x in 0..37 {
                let tile = grid.get(TilePos(x, y)).unwrap();
                assert!(tile < 5);
                seen[tile as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "not all values drawn: {:?}", seen);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        let grid = TileGrid::new_random(4, 3, 1, &mut rng).unwrap();
        assert_eq!(grid.get(TilePos(3, 2)), Some(0));
        assert_eq!(grid.get(TilePos(4, 0)), None);
        assert_eq!(grid.get(TilePos(0, 3)), None);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = TileGrid::new_random(50, 50, 64, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = TileGrid::new_random(50, 50, 64, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_size_grid() {
        let grid =
            TileGrid::new_random(GRID_WIDTH, GRID_HEIGHT, 256, &mut StdRng::seed_from_u64(1))
                .unwrap();
        assert_eq!(grid.get(TilePos(999, 999)).map(|t| t < 256), Some(true));
    }
}
