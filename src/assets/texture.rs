use std::borrow::Cow;

use image::imageops::FilterType;

use crate::error::LoadError;

/// Decoded RGBA8 texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode any supported image format (PNG, JPEG)
    pub fn decode(uri: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let image = image::load_from_memory(bytes).map_err(|source| LoadError::Image {
            uri: uri.to_string(),
            source,
        })?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
        })
    }

    /// Convert a glTF embedded image to RGBA8
    pub fn from_gltf_image(image: &gltf::image::Data) -> Self {
        use gltf::image::Format;

        let data = match image.format {
            Format::R8G8B8A8 => image.pixels.clone(),
            Format::R8G8B8 => image
                .pixels
                .chunks(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            Format::R8G8 => image
                .pixels
                .chunks(2)
                .flat_map(|rg| [rg[0], rg[1], 0, 255])
                .collect(),
            Format::R8 => image
                .pixels
                .iter()
                .flat_map(|&r| [r, r, r, 255])
                .collect(),
            other => {
                log::warn!("Unsupported glTF texture format {:?}, using white", other);
                vec![255; (image.width * image.height * 4) as usize]
            }
        };

        Self {
            width: image.width,
            height: image.height,
            data,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Copy scaled down so neither side exceeds `max_dimension`, aspect ratio kept.
    ///
    /// Borrows `self` when it already fits. `None` when the texture is empty or
    /// its pixel buffer does not match its size.
    pub fn fit_within(&self, max_dimension: u32) -> Option<Cow<'_, TextureData>> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 || max_dimension == 0 || self.data.len() != expected {
            return None;
        }
        let largest = self.width.max(self.height);
        if largest <= max_dimension {
            return Some(Cow::Borrowed(self));
        }

        let scale = |side: u32| ((side as u64 * max_dimension as u64) / largest as u64).max(1) as u32;
        let (width, height) = (scale(self.width), scale(self.height));
        let image = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())?;
        let resized = image::imageops::resize(&image, width, height, FilterType::Triangle);

        Some(Cow::Owned(Self {
            width,
            height,
            data: resized.into_raw(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_fills_every_pixel() {
        let tex = TextureData::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(tex.byte_len(), 3 * 2 * 4);
        assert!(tex.data.chunks(4).all(|px| px == [1, 2, 3, 4]));
    }

    #[test]
    fn test_decode_png() {
        let mut bytes = Vec::new();
        let image = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let tex = TextureData::decode("test.png", &bytes).unwrap();
        assert_eq!((tex.width, tex.height), (4, 2));
        assert_eq!(&tex.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_is_image_error() {
        let err = TextureData::decode("broken.jpg", b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Image { .. }));
        assert_eq!(err.uri(), "broken.jpg");
    }

    #[test]
    fn test_fit_within_borrows_small_textures() {
        let tex = TextureData::solid(64, 32, [0, 0, 0, 255]);
        assert!(matches!(tex.fit_within(8192), Some(Cow::Borrowed(_))));
    }

    #[test]
    fn test_fit_within_downscales_oversized_textures() {
        let tex = TextureData::solid(900, 500, [10, 20, 30, 255]);
        let fitted = tex.fit_within(300).unwrap();

        assert_eq!((fitted.width, fitted.height), (300, 166));
        assert_eq!(fitted.byte_len(), 300 * 166 * 4);
        assert_eq!(&fitted.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_fit_within_keeps_thin_sides_visible() {
        let tex = TextureData::solid(1000, 1, [255; 4]);
        let fitted = tex.fit_within(100).unwrap();
        assert_eq!((fitted.width, fitted.height), (100, 1));
    }

    #[test]
    fn test_fit_within_rejects_malformed_textures() {
        let mut tex = TextureData::solid(4, 4, [255; 4]);
        tex.data.truncate(10);
        assert!(tex.fit_within(8192).is_none());
        assert!(TextureData::solid(0, 4, [255; 4]).fit_within(8192).is_none());
    }
}
