use std::path::Path;

use crate::errors::*;

use super::assets::prelude::*;
use super::assets::texture_loader;
use super::system::VideoSystem;
use super::MAX_TEXTURE_UNITS;

/// A 2D texture object, deleted on drop.
#[derive(Debug)]
pub struct Texture {
    video: VideoSystem,
    handle: TextureHandle,
    params: TextureParams,
}

impl Texture {
    pub fn new(video: &VideoSystem, params: TextureParams, data: TextureData) -> Result<Self> {
        let handle = video.create_texture(params, data)?;
        debug!(
            "[Texture] creates {} ({}x{} {:?}).",
            handle, params.dimensions.x, params.dimensions.y, params.format
        );

        Ok(Texture {
            video: video.clone(),
            handle,
            params,
        })
    }

    /// Decodes a JPEG or PNG file, flipped so that its first row is the bottom one.
    pub fn from_file<P: AsRef<Path>>(
        video: &VideoSystem,
        path: P,
        wrap: TextureWrap,
        filter: TextureFilter,
    ) -> Result<Self> {
        let (mut params, data) = texture_loader::load(path, true)?;
        params.wrap = wrap;
        params.filter = filter;
        Self::new(video, params, data)
    }

    #[inline]
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    #[inline]
    pub fn params(&self) -> &TextureParams {
        &self.params
    }

    /// Binds this texture to texture unit `unit`, the value a sampler uniform
    /// refers to.
    pub fn bind(&self, unit: usize) -> Result<()> {
        if unit >= MAX_TEXTURE_UNITS {
            return Err(Error::OutOfBounds(format!(
                "texture unit {} exceeds the {} available units.",
                unit, MAX_TEXTURE_UNITS
            )));
        }

        self.video.bind_texture(unit, self.handle)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Err(err) = self.video.delete_texture(self.handle) {
            warn!("[Texture] failed to delete {}: {}", self.handle, err);
        }
    }
}
