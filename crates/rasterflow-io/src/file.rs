//! Image file reading and writing.

use std::fs;
use std::path::Path;

use image::ImageReader;
use rasterflow_core::{ImageFormat, PixelBuffer};

use crate::codec::{encode, from_dynamic};
use crate::{Error, Result};

/// Image file metadata read from the header only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Output format matching the file's extension, if supported for export.
    pub format: Option<ImageFormat>,
}

/// Loads an image file and converts it to RGB8.
///
/// The format is sniffed from the file contents, so a misnamed file still loads.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let buffer = from_dynamic(image)?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "image loaded"
    );
    Ok(buffer)
}

/// Encodes `buffer` as `format` and writes it to `path`.
///
/// See [`encode`](crate::encode) for how `quality` is interpreted.
pub fn save<P: AsRef<Path>>(
    path: P,
    buffer: &PixelBuffer,
    format: ImageFormat,
    quality: u8,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(buffer, format, quality)?;
    fs::write(path, &bytes)?;
    tracing::debug!(
        path = %path.display(),
        %format,
        quality,
        bytes = bytes.len(),
        "image saved"
    );
    Ok(())
}

/// Infers the export format from the path's extension.
pub fn format_from_path<P: AsRef<Path>>(path: P) -> Result<ImageFormat> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(format!("{} has no extension", path.display())))?;
    ImageFormat::from_extension(ext).ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
}

/// Reads image dimensions without decoding pixel data.
pub fn read_info<P: AsRef<Path>>(path: P) -> Result<ImageInfo> {
    let path = path.as_ref();
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(ImageInfo {
        width,
        height,
        format: format_from_path(path).ok(),
    })
}
