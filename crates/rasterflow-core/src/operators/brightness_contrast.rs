//! Brightness/contrast point transform.
//!
//! Each channel of each pixel is mapped independently:
//!
//! ```text
//! out = clamp(in · contrast + brightness, 0, 255)
//! ```
//!
//! With brightness 0 and contrast 1 the map is the identity.

use std::any::Any;

use crate::error::OperatorError;
use crate::graph::{PortSpec, PortValue};
use crate::math::affine_u8;
use crate::operator::{Operator, image_input};
use crate::param_info::{ParamDescriptor, ParamUnit, ParameterInfo};

const INPUTS: &[PortSpec] = &[PortSpec::image("Input")];
const OUTPUTS: &[PortSpec] = &[PortSpec::image("Output")];

/// Brightness range (channel levels).
pub const BRIGHTNESS_RANGE: (i32, i32) = (-100, 100);

/// Contrast range (gain factor).
pub const CONTRAST_RANGE: (f32, f32) = (0.0, 3.0);

/// Per-pixel affine brightness/contrast adjustment.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Brightness | -100–100 (integer) | 0 |
/// | 1 | Contrast | 0.0–3.0 | 1.0 |
///
/// # Example
///
/// ```rust
/// use rasterflow_core::operators::BrightnessContrast;
///
/// let mut bc = BrightnessContrast::new();
/// bc.set_brightness(250);
/// assert_eq!(bc.brightness(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct BrightnessContrast {
    brightness: i32,
    contrast: f32,
}

impl Default for BrightnessContrast {
    fn default() -> Self {
        Self::new()
    }
}

impl BrightnessContrast {
    /// Creates an identity transform (brightness 0, contrast 1).
    pub fn new() -> Self {
        Self {
            brightness: 0,
            contrast: 1.0,
        }
    }

    /// Brightness offset in channel levels.
    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    /// Sets the brightness offset, clamped to [`BRIGHTNESS_RANGE`].
    pub fn set_brightness(&mut self, brightness: i32) {
        self.brightness = brightness.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1);
    }

    /// Contrast gain.
    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    /// Sets the contrast gain, clamped to [`CONTRAST_RANGE`]. Non-finite
    /// values are ignored.
    pub fn set_contrast(&mut self, contrast: f32) {
        if !contrast.is_finite() {
            return;
        }
        self.contrast = contrast.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1);
    }

    /// Returns true if the current settings leave pixels unchanged.
    pub fn is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 1.0
    }
}

impl ParameterInfo for BrightnessContrast {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::integer(
                    "Brightness",
                    "Bright",
                    BRIGHTNESS_RANGE.0 as f32,
                    BRIGHTNESS_RANGE.1 as f32,
                    0.0,
                )
                .with_unit(ParamUnit::Level)
                .with_id("brightness"),
            ),
            1 => Some(
                ParamDescriptor::custom("Contrast", "Contrast", CONTRAST_RANGE.0, CONTRAST_RANGE.1, 1.0)
                    .with_unit(ParamUnit::Ratio)
                    .with_id("contrast"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.brightness as f32,
            1 => self.contrast,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if !value.is_finite() {
            return;
        }
        match index {
            0 => self.set_brightness(
                value
                    .round()
                    .clamp(BRIGHTNESS_RANGE.0 as f32, BRIGHTNESS_RANGE.1 as f32) as i32,
            ),
            1 => self.set_contrast(value),
            _ => {}
        }
    }
}

impl Operator for BrightnessContrast {
    fn name(&self) -> &'static str {
        "Brightness/Contrast"
    }

    fn inputs(&self) -> &'static [PortSpec] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortSpec] {
        OUTPUTS
    }

    fn process(
        &mut self,
        inputs: &[Option<&PortValue>],
        outputs: &mut [Option<PortValue>],
    ) -> Result<(), OperatorError> {
        let Some(input) = image_input(inputs, 0, "Input")? else {
            outputs[0] = None;
            return Ok(());
        };

        let mut out = input.clone();
        if !self.is_identity() {
            let gain = self.contrast;
            let offset = self.brightness as f32;
            for c in out.as_bytes_mut() {
                *c = affine_u8(*c, gain, offset);
            }
        }
        outputs[0] = Some(PortValue::Image(out));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
