//! Blur operator: Gaussian or directional (motion) convolution with a wet/dry blend.

use std::any::Any;

use crate::buffer::PixelBuffer;
use crate::error::{BufferError, OperatorError};
use crate::graph::{PortSpec, PortValue};
use crate::kernel::{Kernel, MAX_RADIUS, MIN_RADIUS, convolve};
use crate::math::{saturate_u8, wet_dry_mix};
use crate::operator::{Operator, image_input};
use crate::param_info::{ParamDescriptor, ParamFlags, ParamUnit, ParameterInfo};

const INPUTS: &[PortSpec] = &[PortSpec::image("Input")];
const OUTPUTS: &[PortSpec] = &[PortSpec::image("Output")];

const MODE_LABELS: &[&str] = &["Uniform", "Directional"];

/// Kernel shape used by [`Blur`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurMode {
    /// Isotropic Gaussian.
    #[default]
    Uniform,
    /// Line kernel at the configured angle.
    Directional,
}

impl BlurMode {
    fn index(self) -> f32 {
        match self {
            Self::Uniform => 0.0,
            Self::Directional => 1.0,
        }
    }

    fn from_index(value: f32) -> Self {
        if value >= 0.5 {
            Self::Directional
        } else {
            Self::Uniform
        }
    }
}

/// Convolution blur blended with the unblurred input.
///
/// `out = amount · blurred + (1 − amount) · in`. The kernel is rebuilt on every
/// parameter change and kept for preview via [`kernel()`](Self::kernel).
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Radius | 1–20 px (integer) | 1 |
/// | 1 | Mode | Uniform / Directional | Uniform |
/// | 2 | Angle | 0–360° (wraps) | 0 |
/// | 3 | Amount | 0.0–1.0 | 1.0 |
///
/// # Example
///
/// ```rust
/// use rasterflow_core::operators::{Blur, BlurMode};
///
/// let mut blur = Blur::new();
/// blur.set_mode(BlurMode::Directional);
/// blur.set_angle(-90.0);
/// assert_eq!(blur.angle(), 270.0);
/// assert_eq!(blur.kernel().size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Blur {
    radius: u32,
    mode: BlurMode,
    angle: f32,
    amount: f32,
    kernel: Kernel,
}

impl Default for Blur {
    fn default() -> Self {
        Self::new()
    }
}

impl Blur {
    /// Creates a radius-1 uniform blur at full strength.
    pub fn new() -> Self {
        Self {
            radius: MIN_RADIUS,
            mode: BlurMode::Uniform,
            angle: 0.0,
            amount: 1.0,
            kernel: Kernel::uniform(MIN_RADIUS),
        }
    }

    /// Kernel radius in pixels.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Sets the radius, clamped to 1–20.
    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
        self.rebuild_kernel();
    }

    /// Kernel shape.
    pub fn mode(&self) -> BlurMode {
        self.mode
    }

    /// Sets the kernel shape.
    pub fn set_mode(&mut self, mode: BlurMode) {
        self.mode = mode;
        self.rebuild_kernel();
    }

    /// Line angle in degrees, in `[0, 360)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Sets the line angle; any finite value wraps into `[0, 360)`.
    /// Non-finite values are ignored.
    pub fn set_angle(&mut self, degrees: f32) {
        if !degrees.is_finite() {
            return;
        }
        self.angle = self.descriptor(2).map_or(0.0, |d| d.clamp(degrees));
        self.rebuild_kernel();
    }

    /// Blend between input (0) and blurred result (1).
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Sets the blend amount, clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn set_amount(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        self.amount = amount.clamp(0.0, 1.0);
    }

    /// The kernel the next `process` will apply.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Applies the kernel and blend to `input`.
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer, BufferError> {
        if self.amount == 0.0 {
            return Ok(input.clone());
        }
        let blurred = convolve(input, &self.kernel);
        if self.amount == 1.0 {
            return Ok(blurred);
        }
        blend(input, &blurred, self.amount)
    }

    fn rebuild_kernel(&mut self) {
        self.kernel = match self.mode {
            BlurMode::Uniform => Kernel::uniform(self.radius),
            BlurMode::Directional => Kernel::directional(self.radius, self.angle),
        };
    }

    fn descriptor(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }
}

/// Per-channel `amount · wet + (1 − amount) · dry`.
fn blend(dry: &PixelBuffer, wet: &PixelBuffer, amount: f32) -> Result<PixelBuffer, BufferError> {
    if !dry.same_size(wet) {
        return Err(BufferError::DimensionMismatch {
            expected: dry.dimensions(),
            actual: wet.dimensions(),
        });
    }
    let data = dry
        .as_bytes()
        .iter()
        .zip(wet.as_bytes())
        .map(|(&d, &w)| saturate_u8(wet_dry_mix(f32::from(d), f32::from(w), amount)))
        .collect();
    PixelBuffer::from_raw(dry.width(), dry.height(), data)
}

impl ParameterInfo for Blur {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::integer("Radius", "Radius", MIN_RADIUS as f32, MAX_RADIUS as f32, 1.0)
                    .with_unit(ParamUnit::Pixels)
                    .with_id("radius"),
            ),
            1 => Some(ParamDescriptor::choice("Mode", "Mode", MODE_LABELS, 0.0).with_id("mode")),
            2 => Some(
                ParamDescriptor::custom("Angle", "Angle", 0.0, 360.0, 0.0)
                    .with_unit(ParamUnit::Degrees)
                    .with_flags(ParamFlags::WRAPS)
                    .with_id("angle"),
            ),
            3 => Some(
                ParamDescriptor::custom("Amount", "Amount", 0.0, 1.0, 1.0)
                    .with_unit(ParamUnit::Fraction)
                    .with_id("amount"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.radius as f32,
            1 => self.mode.index(),
            2 => self.angle,
            3 => self.amount,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if !value.is_finite() {
            return;
        }
        match index {
            0 => self.set_radius(value.round().clamp(MIN_RADIUS as f32, MAX_RADIUS as f32) as u32),
            1 => self.set_mode(BlurMode::from_index(value.round().clamp(0.0, 1.0))),
            2 => self.set_angle(value),
            3 => self.set_amount(value),
            _ => {}
        }
    }
}

impl Operator for Blur {
    fn name(&self) -> &'static str {
        "Blur"
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
        outputs[0] = match image_input(inputs, 0, "Input")? {
            Some(input) => Some(PortValue::Image(self.apply(input)?)),
            None => None,
        };
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
