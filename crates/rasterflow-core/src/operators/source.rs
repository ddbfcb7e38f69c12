//! Image source operator.

use std::any::Any;

use crate::buffer::PixelBuffer;
use crate::error::OperatorError;
use crate::graph::{PortSpec, PortValue};
use crate::operator::Operator;
use crate::param_info::{ParamDescriptor, ParameterInfo};

const OUTPUTS: &[PortSpec] = &[PortSpec::image("Output")];

/// Publishes a loaded image to its single output port.
///
/// The source holds the decoded pixels; loading from disk is the caller's
/// job (see `rasterflow_io::load`). Until an image is set, processing leaves
/// the output empty.
///
/// No parameters.
///
/// # Example
///
/// ```rust
/// use rasterflow_core::{ImageGraph, OperatorKind, PixelBuffer};
///
/// let mut graph = ImageGraph::new();
/// let src = graph.add_node(OperatorKind::Source);
/// graph.load_image(src, PixelBuffer::filled(2, 2, [1, 2, 3])).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Source {
    image: Option<PixelBuffer>,
}

impl Source {
    /// Creates a source with no image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `image`.
    pub fn with_image(image: PixelBuffer) -> Self {
        Self { image: Some(image) }
    }

    /// Replaces the held image.
    pub fn set_image(&mut self, image: PixelBuffer) {
        self.image = Some(image);
    }

    /// Returns the held image.
    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }
}

impl ParameterInfo for Source {
    fn param_count(&self) -> usize {
        0
    }

    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }

    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }

    fn set_param(&mut self, _index: usize, _value: f32) {}
}

impl Operator for Source {
    fn name(&self) -> &'static str {
        "Image Input"
    }

    fn inputs(&self) -> &'static [PortSpec] {
        &[]
    }

    fn outputs(&self) -> &'static [PortSpec] {
        OUTPUTS
    }

    fn process(
        &mut self,
        _inputs: &[Option<&PortValue>],
        outputs: &mut [Option<PortValue>],
    ) -> Result<(), OperatorError> {
        outputs[0] = self.image.clone().map(PortValue::Image);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
