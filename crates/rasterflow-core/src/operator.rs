//! The [`Operator`] trait: the unit of computation the graph drives.
//!
//! An operator declares a fixed set of typed input and output ports and
//! computes its outputs from its inputs and parameters. It never sees the
//! graph: the engine gathers input values from upstream caches, calls
//! [`process`](Operator::process), and stores what the operator writes into
//! the node's output caches. Dirty tracking lives on the node, so `process`
//! is only called when the node is dirty and its ancestors are clean.
//!
//! ## Absent inputs
//!
//! An entry of `inputs` is `None` when the port is unconnected (only possible
//! for optional ports; required ones are rejected by the engine) or when the
//! upstream cache is empty. Operators answer an absent input by leaving the
//! matching output empty; the engine still marks the node clean.
//!
//! # Example
//!
//! ```rust
//! use std::any::Any;
//! use rasterflow_core::{
//!     Operator, OperatorError, ParameterInfo, ParamDescriptor, PortSpec, PortValue, image_input,
//! };
//!
//! struct Invert;
//!
//! const PORTS: &[PortSpec] = &[PortSpec::image("Image")];
//!
//! impl ParameterInfo for Invert {
//!     fn param_count(&self) -> usize { 0 }
//!     fn param_info(&self, _: usize) -> Option<ParamDescriptor> { None }
//!     fn get_param(&self, _: usize) -> f32 { 0.0 }
//!     fn set_param(&mut self, _: usize, _: f32) {}
//! }
//!
//! impl Operator for Invert {
//!     fn name(&self) -> &'static str { "Invert" }
//!     fn inputs(&self) -> &'static [PortSpec] { PORTS }
//!     fn outputs(&self) -> &'static [PortSpec] { PORTS }
//!
//!     fn process(
//!         &mut self,
//!         inputs: &[Option<&PortValue>],
//!         outputs: &mut [Option<PortValue>],
//!     ) -> Result<(), OperatorError> {
//!         outputs[0] = image_input(inputs, 0, "Image")?.map(|img| {
//!             let mut out = img.clone();
//!             out.as_bytes_mut().iter_mut().for_each(|c| *c = 255 - *c);
//!             PortValue::Image(out)
//!         });
//!         Ok(())
//!     }
//!
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//! ```

use std::any::Any;

use crate::buffer::PixelBuffer;
use crate::error::OperatorError;
use crate::graph::{PortSpec, PortValue};
use crate::param_info::ParameterInfo;

/// A polymorphic image-processing step.
///
/// The trait is object-safe; the graph stores `Box<dyn Operator + Send>` and
/// dispatches without knowing the concrete type. Typed access goes through
/// [`as_any`](Self::as_any) / [`as_any_mut`](Self::as_any_mut).
pub trait Operator: ParameterInfo {
    /// Display name (e.g., "Image Input").
    fn name(&self) -> &'static str;

    /// Input port specs, in index order. Must not change over the operator's life.
    fn inputs(&self) -> &'static [PortSpec];

    /// Output port specs, in index order. Must not change over the operator's life.
    fn outputs(&self) -> &'static [PortSpec];

    /// Recomputes outputs from inputs and current parameters.
    ///
    /// `inputs` has one entry per input port, `outputs` one per output port.
    /// Output slots hold the previous values on entry; operators overwrite them.
    fn process(
        &mut self,
        inputs: &[Option<&PortValue>],
        outputs: &mut [Option<PortValue>],
    ) -> Result<(), OperatorError>;

    /// The retrievable final result, for terminal operators such as
    /// [`Sink`](crate::operators::Sink). Defaults to `None`.
    fn result(&self) -> Option<&PixelBuffer> {
        None
    }

    /// Upcast for typed read access.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Reads an image input, treating absent values as `None`.
///
/// # Errors
///
/// Returns [`OperatorError::KindMismatch`] if the port carries a
/// [`PortValue::Parameter`].
pub fn image_input<'a>(
    inputs: &[Option<&'a PortValue>],
    index: usize,
    name: &'static str,
) -> Result<Option<&'a PixelBuffer>, OperatorError> {
    match inputs.get(index).copied().flatten() {
        None => Ok(None),
        Some(PortValue::Image(img)) => Ok(Some(img)),
        Some(PortValue::Parameter(_)) => Err(OperatorError::KindMismatch(name)),
    }
}

/// Reads a parameter input, treating absent values as `None`.
///
/// # Errors
///
/// Returns [`OperatorError::KindMismatch`] if the port carries an image.
pub fn parameter_input(
    inputs: &[Option<&PortValue>],
    index: usize,
    name: &'static str,
) -> Result<Option<f32>, OperatorError> {
    match inputs.get(index).copied().flatten() {
        None => Ok(None),
        Some(PortValue::Parameter(v)) => Ok(Some(*v)),
        Some(PortValue::Image(_)) => Err(OperatorError::KindMismatch(name)),
    }
}
