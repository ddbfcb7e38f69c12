//! Image I/O layer for rasterflow.
//!
//! This crate provides:
//!
//! - **File I/O**: [`load`] and [`save`] for reading and writing image files
//! - **In-memory codecs**: [`decode`] and [`encode`] for byte buffers
//! - **Format detection**: [`format_from_path`] and [`read_info`]
//!
//! Decoding accepts any format the `image` crate was built with and converts
//! to 8-bit RGB. Encoding writes PNG or JPEG; see [`encode`] for how the
//! 0–100 quality setting maps onto each codec.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rasterflow_core::{ImageFormat, ImageGraph, OperatorKind};
//!
//! let mut graph = ImageGraph::new();
//! let src = graph.add_node(OperatorKind::Source);
//! let sink = graph.add_node(OperatorKind::Sink);
//! graph.connect(src, 0, sink, 0)?;
//!
//! graph.load_image(src, rasterflow_io::load("input.png")?)?;
//! let out = graph.evaluate(sink)?;
//! rasterflow_io::save("output.jpg", &out, ImageFormat::Jpeg, 90)?;
//! ```

mod codec;
mod file;

pub use codec::{PngCompression, decode, encode, png_compression};
pub use file::{ImageInfo, format_from_path, load, read_info, save};

/// Error types for image I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Decoding or encoding failed inside the codec.
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// The file extension names no supported output format.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Decoded pixel data did not match the reported dimensions.
    #[error("Corrupt pixel data: {0}")]
    Buffer(#[from] rasterflow_core::BufferError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for image I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
