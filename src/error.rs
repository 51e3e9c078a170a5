use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

use crate::grid::AtlasError;

/// Failure that ends the viewer.
///
/// Everything except `Draw` and `SwapBuffers` can only happen during startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to initialize display: {0}")]
    Display(#[from] glium::backend::glutin::DisplayCreationError),
    #[error("failed to load atlas image {path:?}: {source}")]
    AtlasLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid atlas: {0}")]
    Atlas(#[from] AtlasError),
    #[error("failed to create atlas texture: {0}")]
    Texture(#[from] glium::texture::TextureCreationError),
    #[error("failed to compile shader: {0}")]
    Shader(#[from] glium::program::ProgramChooserCreationError),
    #[error("failed to create vertex buffer: {0}")]
    VertexBuffer(#[from] glium::vertex::BufferCreationError),
    #[error("instanced drawing is not supported by this OpenGL context")]
    Instancing,
    #[error("failed to allocate tile grid: {0}")]
    GridAllocation(#[from] TryReserveError),
    #[error("failed to draw frame: {0}")]
    Draw(#[from] glium::DrawError),
    #[error("failed to swap buffers: {0}")]
    SwapBuffers(#[from] glium::SwapBuffersError),
}
