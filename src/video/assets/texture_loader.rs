//! Decodes JPEG/PNG images into texture data with the `image` crate.
//!
//! Images are stored top row first, while OpenGL samples textures with the origin
//! at the bottom-left. The exercises flip every image vertically at load time.

use std::path::Path;

use image::DynamicImage;

use crate::errors::*;
use crate::math::Vector2;

use super::texture::{TextureData, TextureFormat, TextureParams};

/// Reads and decodes the image at `path`.
pub fn load<P: AsRef<Path>>(path: P, flip_vertically: bool) -> Result<(TextureParams, TextureData)> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|err| Error::Asset(format!("Failed to load texture {}: {}", path.display(), err)))?;

    let (params, data) = from_image(image, flip_vertically);
    info!(
        "[TextureLoader] loads {} ({}x{} - {:?}).",
        path.display(),
        params.dimensions.x,
        params.dimensions.y,
        params.format
    );

    Ok((params, data))
}

/// Decodes an in-memory encoded image.
pub fn decode(bytes: &[u8], flip_vertically: bool) -> Result<(TextureParams, TextureData)> {
    let image = image::load_from_memory(bytes)?;
    Ok(from_image(image, flip_vertically))
}

fn from_image(image: DynamicImage, flip_vertically: bool) -> (TextureParams, TextureData) {
    let image = if flip_vertically { image.flipv() } else { image };
    let format = TextureFormat::from_channels(image.color().channel_count());
    let dimensions = Vector2::new(image.width(), image.height());

    let bytes = match format {
        TextureFormat::RGB8 => image.into_rgb8().into_raw(),
        TextureFormat::RGBA8 => image.into_rgba8().into_raw(),
    };

    let params = TextureParams {
        format,
        dimensions,
        ..Default::default()
    };

    (params, TextureData { bytes })
}
