use thiserror::Error;

/// Reasons an atlas image cannot be cut into tiles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    #[error("tile size must be positive, got {0}x{1}")]
    ZeroTileSize(u32, u32),
    #[error("atlas image is empty ({0}x{1})")]
    EmptyImage(u32, u32),
    #[error("atlas image ({image_w}x{image_h}) is smaller than one {tile_w}x{tile_h} tile")]
    ImageSmallerThanTile {
        image_w: u32,
        image_h: u32,
        tile_w: u32,
        tile_h: u32,
    },
    #[error("atlas has {columns}x{rows} tiles, more than can be indexed")]
    TooManyTiles { columns: u32, rows: u32 },
}

/// Rectangle in atlas pixel space.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Geometry of a tile atlas: how a single image is split into equally sized
/// sprites, numbered left-to-right then top-to-bottom.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AtlasMetadata {
    tile_width: u32,
    tile_height: u32,
    image_width: u32,
    image_height: u32,
    columns: u32,
    rows: u32,
    /// `columns * rows`, checked not to overflow.
    tile_count: u32,
    /// `log2(columns)`, present only when `columns` is a power of two.
    column_shift: Option<u32>,
}

impl AtlasMetadata {
    /// Derives atlas geometry from the tile size and the decoded image size.
    ///
    /// Partial tiles along the right or bottom edge of the image are ignored.
    pub fn new(
        tile_width: u32,
        tile_height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self, AtlasError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(AtlasError::ZeroTileSize(tile_width, tile_height));
        }
        if image_width == 0 || image_height == 0 {
            return Err(AtlasError::EmptyImage(image_width, image_height));
        }
        let columns = image_width / tile_width;
        let rows = image_height / tile_height;
        if columns == 0 || rows == 0 {
            return Err(AtlasError::ImageSmallerThanTile {
                image_w: image_width,
                image_h: image_height,
                tile_w: tile_width,
                tile_h: tile_height,
            });
        }
        let tile_count = columns
            .checked_mul(rows)
            .ok_or(AtlasError::TooManyTiles { columns, rows })?;

        let column_shift = if columns.is_power_of_two() {
            Some(columns.trailing_zeros())
        } else {
            None
        };

        Ok(Self {
            tile_width,
            tile_height,
            image_width,
            image_height,
            columns,
            rows,
            tile_count,
            column_shift,
        })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }
    pub fn columns(&self) -> u32 {
        self.columns
    }
    pub fn rows(&self) -> u32 {
        self.rows
    }
    /// Returns the number of distinct sprites in the atlas.
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Returns `true` if the column count allows the shift/mask fast path.
    pub fn is_power_of_two_columns(&self) -> bool {
        self.column_shift.is_some()
    }

    /// Splits a sprite index into `(column, row)`.
    ///
    /// `tile_index` must be less than `tile_count()`.
    #[inline]
    pub fn decompose(&self, tile_index: u32) -> (u32, u32) {
        debug_assert!(tile_index < self.tile_count());
        match self.column_shift {
            Some(shift) => decompose_shift(tile_index, shift),
            None => decompose_div(tile_index, self.columns),
        }
    }

    /// Returns the pixel rectangle of a sprite within the atlas image.
    pub fn source_rect(&self, tile_index: u32) -> PixelRect {
        let (col, row) = self.decompose(tile_index);
        PixelRect {
            x: col * self.tile_width,
            y: row * self.tile_height,
            w: self.tile_width,
            h: self.tile_height,
        }
    }

    /// Returns the texture coordinates `[u0, v0, u1, v1]` of a sprite, with
    /// `v = 0` at the top row of the image.
    pub fn uv_rect(&self, tile_index: u32) -> [f32; 4] {
        let r = self.source_rect(tile_index);
        let iw = self.image_width as f32;
        let ih = self.image_height as f32;
        [
            r.x as f32 / iw,
            r.y as f32 / ih,
            (r.x + r.w) as f32 / iw,
            (r.y + r.h) as f32 / ih,
        ]
    }
}

#[inline]
fn decompose_div(tile_index: u32, columns: u32) -> (u32, u32) {
    (tile_index % columns, tile_index / columns)
}

#[inline]
fn decompose_shift(tile_index: u32, shift: u32) -> (u32, u32) {
    let mask = (1 << shift) - 1;
    (tile_index & mask, tile_index >> shift)
}
