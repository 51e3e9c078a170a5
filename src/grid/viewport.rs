use cgmath::Point2;
use itertools::Itertools;

use super::{AtlasMetadata, Camera, TilePos, Zoom};

/// On-screen tile size, in pixels, below which tiles are sampled with a
/// stride instead of drawn individually.
pub const LOD_PIXEL_THRESHOLD: f64 = 8.0;

/// Rectangle of tile coordinates visible on screen, clamped to the grid,
/// together with the level-of-detail stride to draw it at.
///
/// All `max` bounds are exclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VisibleRange {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
    /// `min_x` rounded down to a multiple of `stride`.
    pub start_x: usize,
    /// `min_y` rounded down to a multiple of `stride`.
    pub start_y: usize,
    /// Distance in tiles between sampled tiles; always at least 1.
    pub stride: usize,
}

impl VisibleRange {
    /// Returns the sampled tile positions, row by row.
    ///
    /// Each position stands in for the `stride`×`stride` block of tiles whose
    /// top-left corner it is.
    pub fn tiles(&self) -> impl Iterator<Item = TilePos> {
        let xs = (self.start_x..self.max_x).step_by(self.stride);
        (self.start_y..self.max_y)
            .step_by(self.stride)
            .cartesian_product(xs)
            .map(|(y, x)| TilePos(x, y))
    }
}

/// Returns the level-of-detail stride for a zoom level: 1 while tiles are at
/// least `LOD_PIXEL_THRESHOLD` pixels wide on screen, and otherwise just
/// enough to bring a sampled block back over the threshold.
pub fn lod_stride(tile_width: u32, zoom: Zoom) -> usize {
    let on_screen = tile_width as f64 * zoom.factor();
    if on_screen < LOD_PIXEL_THRESHOLD {
        // `on_screen` is positive because both factors are.
        (LOD_PIXEL_THRESHOLD / on_screen).ceil() as usize
    } else {
        1
    }
}

/// Computes the range of tiles of a `grid_w`×`grid_h` grid that a camera
/// shows on a screen of the given size.
pub fn resolve(
    camera: Camera,
    (screen_w, screen_h): (u32, u32),
    atlas: &AtlasMetadata,
    (grid_w, grid_h): (usize, usize),
) -> VisibleRange {
    let zoom = camera.zoom().factor();
    let offset = camera.offset();
    let tile_w = atlas.tile_width() as f64;
    let tile_h = atlas.tile_height() as f64;

    let stride = lod_stride(atlas.tile_width(), camera.zoom());

    // Clamping happens in floating point so that cameras arbitrarily far
    // from the grid cannot overflow the integer conversion.
    let clamp_to = |limit: usize, v: f64| v.max(0.0).min(limit as f64) as usize;

    let min_x = clamp_to(grid_w, (-offset.x / tile_w).floor());
    let min_y = clamp_to(grid_h, (-offset.y / tile_h).floor());
    let max_x = clamp_to(grid_w, ((screen_w as f64 / zoom - offset.x) / tile_w).ceil());
    let max_y = clamp_to(grid_h, ((screen_h as f64 / zoom - offset.y) / tile_h).ceil());

    VisibleRange {
        min_x,
        min_y,
        max_x,
        max_y,
        start_x: min_x / stride * stride,
        start_y: min_y / stride * stride,
        stride,
    }
}

/// Returns the tile under a screen pixel, ignoring any level-of-detail
/// stride, or `None` if the pixel is outside the grid.
pub fn hovered_tile(
    camera: Camera,
    pixel: Point2<f64>,
    atlas: &AtlasMetadata,
    (grid_w, grid_h): (usize, usize),
) -> Option<TilePos> {
    let world = camera.screen_to_world(pixel);
    let x = (world.x / atlas.tile_width() as f64).floor();
    let y = (world.y / atlas.tile_height() as f64).floor();
    let in_grid = 0.0 <= x && x < grid_w as f64 && 0.0 <= y && y < grid_h as f64;
    if in_grid {
        Some(TilePos(x as usize, y as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector2;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const GRID: (usize, usize) = (1000, 1000);
    const SCREEN: (u32, u32) = (800, 600);

    fn atlas() -> AtlasMetadata {
        AtlasMetadata::new(32, 32, 256, 256).unwrap()
    }

    fn camera(ox: f64, oy: f64, zoom: f64) -> Camera {
        let mut cam = Camera::new();
        cam.set_offset(Vector2::new(ox, oy));
        cam.set_zoom(Zoom::from_factor(zoom));
        cam
    }

    #[test]
    fn test_centered_range() {
        let range = resolve(camera(-15_216.0, -11_216.0, 1.0), SCREEN, &atlas(), GRID);
        assert_eq!(
            range,
            VisibleRange {
                min_x: 475,
                min_y: 350,
                max_x: 501,
                max_y: 370,
                start_x: 475,
                start_y: 350,
                stride: 1,
            },
        );
        assert_eq!(range.tiles().count(), 26 * 20);
    }

    #[test]
    fn test_lod_stride() {
        assert_eq!(lod_stride(32, Zoom::ONE), 1);
        assert_eq!(lod_stride(32, Zoom::from_factor(0.25)), 1);
        assert_eq!(lod_stride(32, Zoom::from_factor(0.2)), 2);
        assert_eq!(lod_stride(32, Zoom::from_factor(0.1)), 3);
        assert_eq!(lod_stride(32, Zoom::from_factor(Zoom::MIN)), 250);
        assert_eq!(lod_stride(32, Zoom::from_factor(Zoom::MAX)), 1);
    }

    #[test]
    fn test_strided_iteration() {
        let range = resolve(camera(-100.0, -100.0, 0.1), SCREEN, &atlas(), GRID);
        assert_eq!(range.stride, 3);
        assert_eq!((range.min_x, range.min_y), (3, 3));
        assert_eq!((range.start_x, range.start_y), (3, 3));
        assert_eq!((range.max_x, range.max_y), (254, 191));
        let tiles: Vec<_> = range.tiles().collect();
        assert_eq!(tiles.first(), Some(&TilePos(3, 3)));
        assert!(tiles.iter().all(|t| t.0 % 3 == 0 && t.1 % 3 == 0));
        assert_eq!(tiles.len(), 84 * 63);
    }

    #[test]
    fn test_whole_grid_at_min_zoom() {
        let range = resolve(camera(0.0, 0.0, Zoom::MIN), SCREEN, &atlas(), GRID);
        assert_eq!((range.min_x, range.max_x), (0, 1000));
        assert_eq!((range.min_y, range.max_y), (0, 1000));
        assert_eq!(range.stride, 250);
        assert_eq!(range.tiles().count(), 16);
    }

    #[test]
    fn test_far_outside_grid() {
        for &(ox, oy) in &[(1e12, 1e12), (-1e12, -1e12), (1e12, -1e12), (-40_000.0, 0.0)] {
            let range = resolve(camera(ox, oy, 1.0), SCREEN, &atlas(), GRID);
            assert!(
                range.min_x == range.max_x || range.min_y == range.max_y,
                "{:?}",
                range,
            );
            assert!(range.min_x <= range.max_x && range.max_x <= GRID.0);
            assert!(range.min_y <= range.max_y && range.max_y <= GRID.1);
            assert_eq!(range.tiles().count(), 0);
        }
    }

    #[test]
    fn test_hovered_tile() {
        let atlas = atlas();
        let cam = camera(-15_216.0, -11_216.0, 1.0);
        // World (15616, 11516) is tile (488, 359).
        assert_eq!(
            hovered_tile(cam, Point2::new(400.0, 300.0), &atlas, GRID),
            Some(TilePos(488, 359)),
        );

        // Exact tile regardless of level of detail.
        let cam = camera(0.0, 0.0, 0.1);
        assert_eq!(
            hovered_tile(cam, Point2::new(7.0, 4.0), &atlas, GRID),
            Some(TilePos(2, 1)),
        );

        // Just left of the grid, which truncation toward zero would get wrong.
        let cam = camera(16.0, 0.0, 1.0);
        assert_eq!(hovered_tile(cam, Point2::new(4.0, 4.0), &atlas, GRID), None);
        assert_eq!(
            hovered_tile(cam, Point2::new(16.0, 4.0), &atlas, GRID),
            Some(TilePos(0, 0)),
        );

        let cam = camera(-32_000.0 + 10.0, 0.0, 1.0);
        assert_eq!(hovered_tile(cam, Point2::new(20.0, 0.0), &atlas, GRID), None);
    }

    proptest! {
        #[test]
        fn proptest_range_is_valid_and_aligned(
            ox in -1e7_f64..1e7,
            oy in -1e7_f64..1e7,
            zoom in Zoom::MIN..Zoom::MAX,
            screen_w in 1_u32..4000,
            screen_h in 1_u32..4000,
            tile in 1_u32..128,
        ) {
            let atlas = AtlasMetadata::new(tile, tile, tile * 4, tile * 4).unwrap();
            let range = resolve(camera(ox, oy, zoom), (screen_w, screen_h), &atlas, GRID);

            prop_assert!(range.stride >= 1);
            prop_assert!(range.min_x <= range.max_x && range.max_x <= GRID.0);
            prop_assert!(range.min_y <= range.max_y && range.max_y <= GRID.1);

            for &(start, min) in &[(range.start_x, range.min_x), (range.start_y, range.min_y)] {
                prop_assert_eq!(start % range.stride, 0);
                prop_assert!(start <= min);
                prop_assert!(start + range.stride > min);
            }
        }

        #[test]
        fn proptest_sampled_lattice_is_stable_while_panning(
            ox in -30_000.0_f64..0.0,
            dx in -500.0_f64..500.0,
            zoom in 0.01_f64..0.25,
        ) {
            let atlas = atlas();
            let a = resolve(camera(ox, 0.0, zoom), SCREEN, &atlas, GRID);
            let b = resolve(camera(ox + dx, 0.0, zoom), SCREEN, &atlas, GRID);
            prop_assert_eq!(a.stride, b.stride);

            let columns = |r: &VisibleRange| r.tiles().map(|t| t.0).collect::<BTreeSet<_>>();
            let (xs_a, xs_b) = (columns(&a), columns(&b));
            for x in a.min_x.max(b.min_x)..a.max_x.min(b.max_x) {
                prop_assert_eq!(xs_a.contains(&x), xs_b.contains(&x), "column {}", x);
            }
            prop_assert!(xs_a.iter().chain(&xs_b).all(|x| x % a.stride == 0));
        }
    }
}
