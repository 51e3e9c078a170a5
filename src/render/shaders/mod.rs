use glium::program;
use glium::program::ProgramChooserCreationError;
use glium::{Display, Program};

/// Compiled shader programs.
pub struct Shaders {
    /// Draws instanced atlas sprites.
    pub tiles: Program,
    /// Draws instanced solid-color rectangles.
    pub outline: Program,
}

impl Shaders {
    pub fn new(display: &Display) -> Result<Self, ProgramChooserCreationError> {
        Ok(Self {
            tiles: program!(
                display,
                140 => {
                    vertex: include_str!("tile.vert"),
                    fragment: include_str!("tile.frag"),
                    outputs_srgb: false,
                },
            )?,
            outline: program!(
                display,
                140 => {
                    vertex: include_str!("outline.vert"),
                    fragment: include_str!("outline.frag"),
                    outputs_srgb: false,
                },
            )?,
        })
    }
}
