//! Image data types shared across layer components.
//!
//! Icons and ground overlay images arrive as encoded bytes from the asset
//! collaborator, get decoded once into a [`LoadedImage`], and are resampled
//! per style when an icon scale other than 1.0 is requested.

use image::imageops::{self, FilterType};
use image::{ImageError, RgbaImage};

use crate::warning::warn_once;

/// Largest edge, in pixels, a resampled icon may have.
pub const MAX_SCALED_EDGE: u32 = 4096;

/// Decoded image data for an icon or ground overlay.
///
/// Contains the decoded RGBA pixel data and intrinsic dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Intrinsic width of the image in pixels.
    width: u32,
    /// Intrinsic height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba_data.len())
            .finish()
    }
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - Intrinsic width of the image in pixels
    /// * `height` - Intrinsic height of the image in pixels
    /// * `rgba_data` - Raw RGBA pixel data (must be `width * height * 4` bytes)
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Create a single-color image, mostly useful for tests and placeholders.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut rgba_data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            rgba_data.extend_from_slice(&rgba);
        }
        Self::new(width, height, rgba_data)
    }

    /// Decode encoded raster bytes (PNG, JPEG, GIF, BMP) via the `image` crate.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the bytes are not a supported image.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new(width, height, rgba.into_raw()))
    }

    /// Intrinsic width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Resample the image by `scale` (1.0 = original size).
    ///
    /// Target dimensions are the intrinsic dimensions multiplied by `scale`
    /// and truncated, never smaller than one pixel. Resampling is
    /// nearest-neighbour so icon pixels stay crisp; the whole image is always
    /// kept, never cropped. A non-finite or non-positive scale, or pixel data
    /// that does not match the dimensions, yields an unscaled copy. So does a
    /// scale that would make either edge longer than [`MAX_SCALED_EDGE`];
    /// that case is reported through the warning log.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scaled(&self, scale: f64) -> Self {
        if !scale.is_finite() || scale <= 0.0 || (scale - 1.0).abs() < f64::EPSILON {
            return self.clone();
        }

        let width = f64::from(self.width) * scale;
        let height = f64::from(self.height) * scale;
        let limit = f64::from(MAX_SCALED_EDGE);
        if width > limit || height > limit {
            warn_once(
                "image",
                &format!(
                    "icon scale {scale} exceeds the {MAX_SCALED_EDGE}px edge limit for a {}x{} image, kept at intrinsic size",
                    self.width, self.height
                ),
            );
            return self.clone();
        }

        let target_width = (width as u32).max(1);
        let target_height = (height as u32).max(1);

        let Some(source) = RgbaImage::from_raw(self.width, self.height, self.rgba_data.clone())
        else {
            return self.clone();
        };

        let resized = imageops::resize(&source, target_width, target_height, FilterType::Nearest);
        Self::new(target_width, target_height, resized.into_raw())
    }
}
