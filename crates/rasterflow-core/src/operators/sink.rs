//! Terminal operator holding the final image and its export settings.

use std::any::Any;
use std::str::FromStr;

use crate::buffer::PixelBuffer;
use crate::error::OperatorError;
use crate::graph::{PortSpec, PortValue};
use crate::operator::{Operator, image_input};
use crate::param_info::{ParamDescriptor, ParameterInfo};

const INPUTS: &[PortSpec] = &[PortSpec::image("Input").optional()];

const FORMAT_LABELS: &[&str] = &["PNG", "JPEG"];

/// Default export quality.
pub const DEFAULT_QUALITY: u8 = 95;

/// Encoded file format for exported images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// Lossy JPEG.
    Jpeg,
}

impl ImageFormat {
    /// Canonical file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Guesses the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn index(self) -> f32 {
        match self {
            Self::Png => 0.0,
            Self::Jpeg => 1.0,
        }
    }

    fn from_index(value: f32) -> Self {
        if value >= 0.5 { Self::Jpeg } else { Self::Png }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| format!("unknown image format '{s}'"))
    }
}

impl core::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(FORMAT_LABELS[self.index() as usize])
    }
}

/// Pulls the image from its single input and stores it as the final result.
///
/// The input is optional: an unconnected sink simply has no result, which
/// [`ImageGraph::evaluate`](crate::ImageGraph::evaluate) reports as
/// [`GraphError::EmptyResult`](crate::GraphError::EmptyResult).
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Format | PNG / JPEG | PNG |
/// | 1 | Quality | 0–100 | 95 |
#[derive(Debug, Clone)]
pub struct Sink {
    result: Option<PixelBuffer>,
    format: ImageFormat,
    quality: u8,
}

impl Default for Sink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink {
    /// Creates a sink with no result, PNG format, quality 95.
    pub fn new() -> Self {
        Self {
            result: None,
            format: ImageFormat::Png,
            quality: DEFAULT_QUALITY,
        }
    }

    /// Export format handed to the encoder.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Sets the export format.
    pub fn set_format(&mut self, format: ImageFormat) {
        self.format = format;
    }

    /// Export quality (0–100).
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Sets the export quality, clamped to 0–100.
    pub fn set_quality(&mut self, quality: u8) {
        self.quality = quality.min(100);
    }
}

impl ParameterInfo for Sink {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::choice("Format", "Format", FORMAT_LABELS, 0.0).with_id("format")),
            1 => Some(
                ParamDescriptor::integer("Quality", "Quality", 0.0, 100.0, f32::from(DEFAULT_QUALITY))
                    .with_id("quality"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.format.index(),
            1 => f32::from(self.quality),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if !value.is_finite() {
            return;
        }
        match index {
            0 => self.format = ImageFormat::from_index(value.round().clamp(0.0, 1.0)),
            1 => self.quality = value.round().clamp(0.0, 100.0) as u8,
            _ => {}
        }
    }
}

impl Operator for Sink {
    fn name(&self) -> &'static str {
        "Image Output"
    }

    fn inputs(&self) -> &'static [PortSpec] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortSpec] {
        &[]
    }

    fn process(
        &mut self,
        inputs: &[Option<&PortValue>],
        _outputs: &mut [Option<PortValue>],
    ) -> Result<(), OperatorError> {
        self.result = image_input(inputs, 0, "Input")?.cloned();
        Ok(())
    }

    fn result(&self) -> Option<&PixelBuffer> {
        self.result.as_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
