//! Immutable 2D texture. A texture is a container of one or more images. It can be
//! the source of a texture access from a shader.

use crate::errors::*;
use crate::math::Vector2;

impl_handle!(TextureHandle);

/// The parameters of a texture object.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureParams {
    /// Sets the wrap parameter for texture.
    pub wrap: TextureWrap,
    /// Specify how the texture is used whenever the pixel being sampled.
    pub filter: TextureFilter,
    /// Should we generates a complete set of mipmaps for a texture object.
    pub mipmap: bool,
    /// Sets the format of data.
    pub format: TextureFormat,
    /// Sets the dimensions of texture.
    pub dimensions: Vector2<u32>,
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            format: TextureFormat::RGBA8,
            wrap: TextureWrap::Repeat,
            filter: TextureFilter::Linear,
            mipmap: true,
            dimensions: Vector2::new(0, 0),
        }
    }
}

impl TextureParams {
    /// Number of bytes a tightly packed image with these parameters occupies.
    pub fn len(&self) -> usize {
        self.format.size() as usize * self.dimensions.x as usize * self.dimensions.y as usize
    }

    pub fn validate(&self, data: &TextureData) -> Result<()> {
        if self.dimensions.x == 0 || self.dimensions.y == 0 {
            return Err(Error::OutOfBounds(format!(
                "texture dimensions {}x{} are empty.",
                self.dimensions.x, self.dimensions.y
            )));
        }

        if data.bytes.len() != self.len() {
            return Err(Error::OutOfBounds(format!(
                "texture holds {} bytes, {}x{} {:?} needs {}.",
                data.bytes.len(),
                self.dimensions.x,
                self.dimensions.y,
                self.format,
                self.len()
            )));
        }

        Ok(())
    }
}

/// Decoded pixels, rows bottom-up, tightly packed.
#[derive(Debug, Clone, Default)]
pub struct TextureData {
    pub bytes: Vec<u8>,
}

/// Specify how the texture is used whenever the pixel being sampled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextureFilter {
    /// Returns the value of the texture element that is nearest (in Manhattan distance)
    /// to the center of the pixel being textured.
    Nearest,
    /// Returns the weighted average of the four texture elements that are closest to the
    /// center of the pixel being textured.
    Linear,
}

/// Sets the wrap parameter for texture.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextureWrap {
    /// Samples at coord x + 1 map to coord x.
    Repeat,
    /// Samples at coord x + 1 map to coord 1 - x.
    Mirror,
    /// Samples at coord x + 1 map to coord 1.
    Clamp,
}

/// Pixel formats of the decoded images.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextureFormat {
    RGB8,
    RGBA8,
}

impl TextureFormat {
    /// Picks the format for a decoded image with `channels` channels. Only three
    /// channel images stay RGB, everything else is expanded to RGBA.
    pub fn from_channels(channels: u8) -> Self {
        if channels == 3 {
            TextureFormat::RGB8
        } else {
            TextureFormat::RGBA8
        }
    }

    /// Bytes per pixel.
    pub fn size(self) -> u8 {
        match self {
            TextureFormat::RGB8 => 3,
            TextureFormat::RGBA8 => 4,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn channels() {
        assert_eq!(TextureFormat::from_channels(3), TextureFormat::RGB8);
        assert_eq!(TextureFormat::from_channels(4), TextureFormat::RGBA8);
        assert_eq!(TextureFormat::from_channels(1), TextureFormat::RGBA8);
        assert_eq!(TextureFormat::from_channels(2), TextureFormat::RGBA8);
    }

    #[test]
    fn validate() {
        let params = TextureParams {
            format: TextureFormat::RGB8,
            dimensions: Vector2::new(2, 2),
            ..Default::default()
        };

        assert!(params.validate(&TextureData { bytes: vec![0; 12] }).is_ok());
        assert!(params.validate(&TextureData { bytes: vec![0; 16] }).is_err());

        let empty = TextureParams::default();
        assert!(empty.validate(&TextureData::default()).is_err());
    }
}
