use glium::index::{NoIndices, PrimitiveType};
use glium::{Display, Frame, Surface, VertexBuffer};
use image::RgbaImage;

mod shaders;
mod textures;

pub use textures::load_atlas_image;

use crate::error::AppError;
use crate::grid::{PixelRect, TilePos};

/// Number of tile instances uploaded per draw call.
const TILE_BATCH_SIZE: usize = 4096;

/// Width of the hover outline, in screen pixels.
pub const OUTLINE_PIXEL_WIDTH: f32 = 8.0;
/// Color of the hover outline.
const OUTLINE_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Axis-aligned rectangle in screen pixels, with `y` pointing down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}
impl ScreenRect {
    fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

/// Instruction to draw one atlas sprite somewhere on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileDraw {
    /// Grid position of the tile being drawn.
    pub tile: TilePos,
    /// Sprite rectangle in atlas pixels.
    pub source: PixelRect,
    /// Sprite rectangle in normalized texture coordinates.
    pub uv: [f32; 4],
    /// Where the sprite lands on screen. When a level-of-detail stride is in
    /// effect this covers the whole sampled block.
    pub dest: ScreenRect,
}

/// Instruction to mark the tile under the cursor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Highlight {
    pub tile: TilePos,
    pub dest: ScreenRect,
}
impl Highlight {
    /// Returns the top, bottom, left and right edges of an outline drawn just
    /// inside the highlighted tile.
    pub fn outline_edges(self, width: f32) -> [ScreenRect; 4] {
        let ScreenRect { x, y, w, h } = self.dest;
        let px = width.min(w / 2.0).min(h / 2.0);
        [
            ScreenRect { x, y, w, h: px },
            ScreenRect {
                x,
                y: y + h - px,
                w,
                h: px,
            },
            ScreenRect { x, y, w: px, h },
            ScreenRect {
                x: x + w - px,
                y,
                w: px,
                h,
            },
        ]
    }
}

/// Consumer of the draw commands produced for a frame.
pub trait Renderer {
    fn draw_tile(&mut self, draw: TileDraw);
    fn draw_highlight(&mut self, highlight: Highlight);
}

#[derive(Debug, Copy, Clone)]
struct Vertex2D {
    pos: [f32; 2],
}
glium::implement_vertex!(Vertex2D, pos);

#[derive(Debug, Copy, Clone, PartialEq)]
struct TileAttr {
    dest: [f32; 4],
    uv: [f32; 4],
}
glium::implement_vertex!(TileAttr, dest, uv);

#[derive(Debug, Copy, Clone, PartialEq)]
struct OutlineAttr {
    dest: [f32; 4],
}
glium::implement_vertex!(OutlineAttr, dest);

/// Renderer that collects a frame's draw commands as instance attributes
/// ready for upload.
#[derive(Debug, Default, Clone)]
pub struct TileBatch {
    tiles: Vec<TileAttr>,
    outline: Vec<OutlineAttr>,
}
impl TileBatch {
    pub fn new() -> Self {
        Self::default()
    }
    /// Empties the batch, keeping its allocations.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.outline.clear();
    }
}
impl Renderer for TileBatch {
    fn draw_tile(&mut self, draw: TileDraw) {
        self.tiles.push(TileAttr {
            dest: draw.dest.to_array(),
            uv: draw.uv,
        });
    }
    fn draw_highlight(&mut self, highlight: Highlight) {
        self.outline.extend(
            highlight
                .outline_edges(OUTLINE_PIXEL_WIDTH)
                .iter()
                .map(|edge| OutlineAttr {
                    dest: edge.to_array(),
                }),
        );
    }
}

/// Returns the orthographic projection that maps screen pixels (origin at
/// the top left, `y` pointing down) to clip space.
pub fn screen_projection((target_w, target_h): (u32, u32)) -> [[f32; 4]; 4] {
    cgmath::ortho(0.0, target_w as f32, target_h as f32, 0.0, -1.0, 1.0).into()
}

/// GPU objects needed to draw the grid. Everything is released when this is
/// dropped.
pub struct GpuResources {
    quad: VertexBuffer<Vertex2D>,
    tile_instances: VertexBuffer<TileAttr>,
    outline_instances: VertexBuffer<OutlineAttr>,
    shaders: shaders::Shaders,
    atlas: glium::texture::SrgbTexture2d,
}

impl GpuResources {
    pub fn new(display: &Display, atlas_image: RgbaImage) -> Result<Self, AppError> {
        let quad = VertexBuffer::immutable(
            display,
            &[
                Vertex2D { pos: [0.0, 0.0] },
                Vertex2D { pos: [1.0, 0.0] },
                Vertex2D { pos: [0.0, 1.0] },
                Vertex2D { pos: [1.0, 1.0] },
            ],
        )?;
        Ok(Self {
            quad,
            tile_instances: VertexBuffer::empty_dynamic(display, TILE_BATCH_SIZE)?,
            outline_instances: VertexBuffer::empty_dynamic(display, 4)?,
            shaders: shaders::Shaders::new(display)?,
            atlas: textures::upload_atlas(display, atlas_image)?,
        })
    }

    /// Draws a batch onto the frame, clearing it first.
    pub fn draw(&self, target: &mut Frame, batch: &TileBatch) -> Result<(), AppError> {
        target.clear_color(0.0, 0.0, 0.0, 1.0);
        let projection = screen_projection(target.get_dimensions());
        let strip = NoIndices(PrimitiveType::TriangleStrip);

        for chunk in batch.tiles.chunks(TILE_BATCH_SIZE) {
            let instances = self
                .tile_instances
                .slice(0..chunk.len())
                .expect("Tile chunk larger than instance buffer");
            instances.write(chunk);
            target.draw(
                (
                    &self.quad,
                    instances.per_instance().map_err(|_| AppError::Instancing)?,
                ),
                &strip,
                &self.shaders.tiles,
                &glium::uniform! {
                    projection: projection,
                    atlas: textures::atlas_sampler(&self.atlas),
                },
                &Default::default(),
            )?;
        }

        let outline_params = glium::DrawParameters {
            blend: glium::Blend::alpha_blending(),
            ..glium::DrawParameters::default()
        };
        for chunk in batch.outline.chunks(4) {
            let instances = self
                .outline_instances
                .slice(0..chunk.len())
                .expect("Outline chunk larger than instance buffer");
            instances.write(chunk);
            target.draw(
                (
                    &self.quad,
                    instances.per_instance().map_err(|_| AppError::Instancing)?,
                ),
                &strip,
                &self.shaders.outline,
                &glium::uniform! {
                    projection: projection,
                    color: OUTLINE_COLOR,
                },
                &outline_params,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, Vector4};

    fn highlight(x: f32, y: f32, w: f32, h: f32) -> Highlight {
        Highlight {
            tile: TilePos(0, 0),
            dest: ScreenRect { x, y, w, h },
        }
    }

    #[test]
    fn test_outline_edges() {
        let [top, bottom, left, right] = highlight(10.0, 20.0, 64.0, 32.0).outline_edges(8.0);
        assert_eq!(top, ScreenRect { x: 10.0, y: 20.0, w: 64.0, h: 8.0 });
        assert_eq!(bottom, ScreenRect { x: 10.0, y: 44.0, w: 64.0, h: 8.0 });
        assert_eq!(left, ScreenRect { x: 10.0, y: 20.0, w: 8.0, h: 32.0 });
        assert_eq!(right, ScreenRect { x: 66.0, y: 20.0, w: 8.0, h: 32.0 });
    }

    #[test]
    fn test_outline_on_small_tile() {
        let edges = highlight(0.0, 0.0, 6.0, 10.0).outline_edges(8.0);
        for edge in &edges {
            assert!(edge.w <= 6.0 && edge.h <= 10.0);
            assert!(edge.x >= 0.0 && edge.x + edge.w <= 6.0);
            assert!(edge.y >= 0.0 && edge.y + edge.h <= 10.0);
        }
    }

    #[test]
    fn test_batch_collects_commands() {
        let mut batch = TileBatch::new();
        batch.draw_tile(TileDraw {
            tile: TilePos(1, 2),
            source: PixelRect {
                x: 0,
                y: 0,
                w: 32,
                h: 32,
            },
            uv: [0.0, 0.0, 0.5, 0.5],
            dest: ScreenRect {
                x: 1.0,
                y: 2.0,
                w: 3.0,
                h: 4.0,
            },
        });
        batch.draw_highlight(highlight(0.0, 0.0, 32.0, 32.0));
        assert_eq!(batch.tiles.len(), 1);
        assert_eq!(batch.tiles[0].dest, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(batch.outline.len(), 4);

        batch.clear();
        assert!(batch.tiles.is_empty());
        assert!(batch.outline.is_empty());
    }

    #[test]
    fn test_screen_projection() {
        let m: Matrix4<f32> = screen_projection((800, 600)).into();
        let top_left = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = m * Vector4::new(800.0, 600.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-6 && (top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6 && (bottom_right.y + 1.0).abs() < 1e-6);
    }
}
