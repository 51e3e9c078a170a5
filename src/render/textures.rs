use glium::texture::{MipmapsOption, RawImage2d, SrgbTexture2d, TextureCreationError};
use glium::uniforms::{MagnifySamplerFilter, MinifySamplerFilter, Sampler, SamplerWrapFunction};
use image::RgbaImage;
use std::path::Path;

use crate::error::AppError;

/// Decodes the atlas image at `path` into RGBA pixels.
pub fn load_atlas_image(path: &Path) -> Result<RgbaImage, AppError> {
    let image = image::open(path).map_err(|source| AppError::AtlasLoad {
        path: path.to_owned(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Uploads atlas pixels to the GPU.
///
/// Rows are uploaded top row first, so texture coordinate `v = 0` is the top
/// of the image.
pub fn upload_atlas(
    display: &glium::Display,
    image: RgbaImage,
) -> Result<SrgbTexture2d, TextureCreationError> {
    let dimensions = image.dimensions();
    let raw = RawImage2d::from_raw_rgba(image.into_raw(), dimensions);
    SrgbTexture2d::with_mipmaps(display, raw, MipmapsOption::NoMipmap)
}

/// Samples the atlas without filtering, so neighboring sprites never bleed
/// into each other.
pub fn atlas_sampler(atlas: &SrgbTexture2d) -> Sampler<'_, SrgbTexture2d> {
    atlas
        .sampled()
        .magnify_filter(MagnifySamplerFilter::Nearest)
        .minify_filter(MinifySamplerFilter::Nearest)
        .wrap_function(SamplerWrapFunction::Clamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_atlas_is_load_error() {
        let path = Path::new("definitely/not/a/tileset.png");
        match load_atlas_image(path) {
            Err(AppError::AtlasLoad { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected atlas load error, got {:?}", other.map(|i| i.dimensions())),
        }
    }
}
