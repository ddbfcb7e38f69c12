//! In-memory encode/decode between [`PixelBuffer`] and image file bytes.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use rasterflow_core::{ImageFormat, PixelBuffer};

use crate::Result;

/// PNG compression level chosen from a 0–100 quality setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    /// Quality below 34.
    Fast,
    /// Quality 34–66.
    Default,
    /// Quality 67 and above.
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Maps export quality to a PNG compression level.
///
/// PNG is lossless, so quality only trades file size against encode time.
pub fn png_compression(quality: u8) -> PngCompression {
    match quality {
        0..=33 => PngCompression::Fast,
        34..=66 => PngCompression::Default,
        _ => PngCompression::Best,
    }
}

/// Decodes image bytes of any supported format into RGB8.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    from_dynamic(image)
}

/// Encodes `buffer` as `format`.
///
/// - PNG: `quality` selects the compression level via [`png_compression`].
/// - JPEG: `quality` is the encoder quality, clamped to 1–100.
pub fn encode(buffer: &PixelBuffer, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let (width, height) = buffer.dimensions();
    match format {
        ImageFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut bytes,
                png_compression(quality).into(),
                FilterType::Adaptive,
            );
            encoder.write_image(buffer.as_bytes(), width, height, ExtendedColorType::Rgb8)?;
        }
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
            encoder.write_image(buffer.as_bytes(), width, height, ExtendedColorType::Rgb8)?;
        }
    }
    Ok(bytes)
}

pub(crate) fn from_dynamic(image: DynamicImage) -> Result<PixelBuffer> {
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(PixelBuffer::from_raw(width, height, rgb.into_raw())?)
}
