use cgmath::{Point2, Vector2};

use crate::grid::{viewport, AtlasMetadata, Camera, TileGrid, TilePos, VisibleRange, ZoomMode};
use crate::input::{Drag, InputEvent};
use crate::render::{Highlight, Renderer, ScreenRect, TileDraw};

/// What was drawn on one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    pub range: VisibleRange,
    pub tiles_drawn: usize,
    pub hovered: Option<TilePos>,
}

/// Everything one run of the viewer works on: the atlas geometry, the tile
/// grid and the camera looking at it, plus the input state driving the
/// camera.
#[derive(Debug, Clone)]
pub struct Session {
    atlas: AtlasMetadata,
    grid: TileGrid,
    camera: Camera,
    zoom_mode: ZoomMode,

    /// Width and height of the render target.
    screen_dimensions: (u32, u32),
    /// Position of the mouse cursor.
    cursor_pos: Option<Point2<f64>>,
    /// Mouse drag in progress.
    drag: Option<Drag>,
}

impl Session {
    /// Returns a new session with the camera centered on the grid.
    pub fn new(
        atlas: AtlasMetadata,
        grid: TileGrid,
        zoom_mode: ZoomMode,
        screen_dimensions: (u32, u32),
    ) -> Self {
        let (grid_w, grid_h) = grid.dimensions();
        let world_size = Vector2::new(
            grid_w as f64 * atlas.tile_width() as f64,
            grid_h as f64 * atlas.tile_height() as f64,
        );
        Self {
            atlas,
            grid,
            camera: Camera::centered_on(world_size, screen_dimensions),
            zoom_mode,

            screen_dimensions,
            cursor_pos: None,
            drag: None,
        }
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Applies one input event. Returns `false` once the session should end.
    pub fn handle_input(&mut self, ev: InputEvent) -> bool {
        match ev {
            InputEvent::Quit => return false,

            InputEvent::PointerDown => {
                if let Some(pos) = self.cursor_pos {
                    self.drag = Some(Drag::new(pos));
                }
            }
            InputEvent::PointerUp => self.drag = None,

            InputEvent::PointerMoved(pos) => {
                self.cursor_pos = Some(pos);
                if let Some(d) = &mut self.drag {
                    let delta = d.update_cursor(pos);
                    self.camera.pan_by_pixels(delta);
                }
            }
            InputEvent::PointerLeft => self.cursor_pos = None,

            InputEvent::Scroll(dy) => self.handle_scroll(dy),

            InputEvent::Resized(w, h) => {
                log::debug!("Screen resized to {}x{}", w, h);
                self.screen_dimensions = (w, h);
            }
        }
        true
    }

    fn handle_scroll(&mut self, dy: f64) {
        let (screen_w, screen_h) = self.screen_dimensions;
        let invariant_pixel = self
            .cursor_pos
            .unwrap_or_else(|| Point2::new(screen_w as f64 / 2.0, screen_h as f64 / 2.0));
        self.camera.scroll(self.zoom_mode, dy > 0.0, invariant_pixel);
        if self.camera.zoom().is_saturated() {
            log::trace!("Zoom limit reached at {}", self.camera.zoom());
        }
    }

    /// Returns the tiles currently on screen.
    pub fn visible_range(&self) -> VisibleRange {
        viewport::resolve(
            self.camera,
            self.screen_dimensions,
            &self.atlas,
            self.grid.dimensions(),
        )
    }

    /// Returns the tile under the cursor, if the cursor is over the grid.
    pub fn hovered_tile(&self) -> Option<TilePos> {
        let pixel = self.cursor_pos?;
        viewport::hovered_tile(self.camera, pixel, &self.atlas, self.grid.dimensions())
    }

    /// Emits draw commands for every sampled tile on screen, followed by the
    /// hover highlight.
    pub fn emit_frame(&self, renderer: &mut impl Renderer) -> FrameSummary {
        let range = self.visible_range();

        let mut tiles_drawn = 0;
        for pos in range.tiles() {
            if let Some(sprite) = self.grid.get(pos) {
                renderer.draw_tile(TileDraw {
                    tile: pos,
                    source: self.atlas.source_rect(sprite),
                    uv: self.atlas.uv_rect(sprite),
                    dest: self.tile_dest(pos, range.stride),
                });
                tiles_drawn += 1;
            }
        }

        let hovered = self.hovered_tile();
        if let Some(tile) = hovered {
            renderer.draw_highlight(Highlight {
                tile,
                dest: self.tile_dest(tile, 1),
            });
        }

        FrameSummary {
            range,
            tiles_drawn,
            hovered,
        }
    }

    /// Returns the screen rectangle covered by the `stride`×`stride` block of
    /// tiles starting at `pos`.
    fn tile_dest(&self, TilePos(x, y): TilePos, stride: usize) -> ScreenRect {
        let tile_w = self.atlas.tile_width() as f64;
        let tile_h = self.atlas.tile_height() as f64;
        let corner = self
            .camera
            .world_to_screen(Point2::new(x as f64 * tile_w, y as f64 * tile_h));
        let scale = self.camera.zoom().factor() * stride as f64;
        ScreenRect {
            x: corner.x as f32,
            y: corner.y as f32,
            w: (tile_w * scale) as f32,
            h: (tile_h * scale) as f32,
        }
    }
}
