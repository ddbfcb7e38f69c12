//! Built-in operators and the [`OperatorKind`] registry.
//!
//! Every built-in operator can be created by kind, so controllers (the CLI,
//! tests) never need to name the concrete types.
//!
//! # Example
//!
//! ```rust
//! use rasterflow_core::OperatorKind;
//!
//! let kind: OperatorKind = "blur".parse().unwrap();
//! let op = kind.create();
//! assert_eq!(op.name(), "Blur");
//! assert_eq!(op.param_count(), 4);
//! ```

mod blur;
mod brightness_contrast;
mod sink;
mod source;

pub use blur::{Blur, BlurMode};
pub use brightness_contrast::{BRIGHTNESS_RANGE, BrightnessContrast, CONTRAST_RANGE};
pub use sink::{DEFAULT_QUALITY, ImageFormat, Sink};
pub use source::Source;

use std::str::FromStr;

use thiserror::Error;

use crate::operator::Operator;

/// The built-in operator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// [`Source`]: publishes a loaded image.
    Source,
    /// [`Sink`]: holds the final result.
    Sink,
    /// [`BrightnessContrast`]: affine point transform.
    BrightnessContrast,
    /// [`Blur`]: Gaussian or directional convolution.
    Blur,
}

/// Returned when parsing an unknown operator id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown operator '{0}' (expected one of: source, sink, brightness_contrast, blur)")]
pub struct UnknownOperator(pub String);

impl OperatorKind {
    /// Every built-in kind, in display order.
    pub fn all() -> &'static [OperatorKind] {
        &[
            Self::Source,
            Self::Sink,
            Self::BrightnessContrast,
            Self::Blur,
        ]
    }

    /// Stable snake_case identifier (used by chain specs).
    pub fn id(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Sink => "sink",
            Self::BrightnessContrast => "brightness_contrast",
            Self::Blur => "blur",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::Source => "Publishes a loaded image",
            Self::Sink => "Stores the final image and its export settings",
            Self::BrightnessContrast => "Per-channel in * contrast + brightness",
            Self::Blur => "Gaussian or directional blur with wet/dry amount",
        }
    }

    /// Creates a fresh operator of this kind with default parameters.
    pub fn create(self) -> Box<dyn Operator + Send> {
        match self {
            Self::Source => Box::new(Source::new()),
            Self::Sink => Box::new(Sink::new()),
            Self::BrightnessContrast => Box::new(BrightnessContrast::new()),
            Self::Blur => Box::new(Blur::new()),
        }
    }
}

impl FromStr for OperatorKind {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "source" | "input" => Ok(Self::Source),
            "sink" | "output" => Ok(Self::Sink),
            "brightness_contrast" | "bc" | "brightness" => Ok(Self::BrightnessContrast),
            "blur" => Ok(Self::Blur),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

impl core::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}
