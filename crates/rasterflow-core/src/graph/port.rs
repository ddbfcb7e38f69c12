//! Port and connection value types.
//!
//! Operators declare their sockets as static [`PortSpec`] lists. The graph
//! turns each spec into a port record on the node: input ports remember the
//! output port feeding them, output ports remember every input port they feed
//! plus the cached value last written by the operator.

use crate::buffer::PixelBuffer;

use super::node::NodeId;

/// Which side of an operator a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Consumes a value produced upstream.
    Input,
    /// Publishes a value to downstream consumers.
    Output,
}

impl core::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// The kind of data a port carries. Connected ports must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// A [`PixelBuffer`].
    Image,
    /// A scalar control value.
    Parameter,
}

impl core::fmt::Display for DataKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Parameter => f.write_str("parameter"),
        }
    }
}

/// Static description of one operator socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    /// Display name (e.g., "Input", "Output").
    pub name: &'static str,
    /// Data kind carried by the port.
    pub kind: DataKind,
    /// For inputs: whether the operator refuses to run while unconnected.
    pub required: bool,
}

impl PortSpec {
    /// A required image port.
    pub const fn image(name: &'static str) -> Self {
        Self {
            name,
            kind: DataKind::Image,
            required: true,
        }
    }

    /// A required parameter port.
    pub const fn parameter(name: &'static str) -> Self {
        Self {
            name,
            kind: DataKind::Parameter,
            required: true,
        }
    }

    /// Marks an input port as optional.
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A value cached on an output port.
#[derive(Debug, Clone, PartialEq)]
pub enum PortValue {
    /// Image data.
    Image(PixelBuffer),
    /// Scalar control data.
    Parameter(f32),
}

impl PortValue {
    /// The data kind of this value.
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Image(_) => DataKind::Image,
            Self::Parameter(_) => DataKind::Parameter,
        }
    }

    /// Returns the image, if this is an image value.
    pub fn as_image(&self) -> Option<&PixelBuffer> {
        match self {
            Self::Image(img) => Some(img),
            Self::Parameter(_) => None,
        }
    }

    /// Returns the scalar, if this is a parameter value.
    pub fn as_parameter(&self) -> Option<f32> {
        match self {
            Self::Parameter(v) => Some(*v),
            Self::Image(_) => None,
        }
    }
}

/// Addresses one port on one node. Which list the index refers to depends on
/// the context the reference is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    /// Owning node.
    pub node: NodeId,
    /// Port index within that node's input or output list.
    pub port: usize,
}

/// Input side of a node: its spec plus the output port feeding it.
#[derive(Debug)]
pub(crate) struct InputPort {
    pub spec: PortSpec,
    /// Output port on the upstream node (`None` = unconnected).
    pub source: Option<PortRef>,
}

/// Output side of a node: its spec, every input port it feeds, and its cache.
#[derive(Debug)]
pub(crate) struct OutputPort {
    pub spec: PortSpec,
    /// Input ports on downstream nodes.
    pub targets: Vec<PortRef>,
    /// Last value written by the operator (`None` = nothing produced).
    pub cache: Option<PortValue>,
}

impl InputPort {
    pub fn new(spec: PortSpec) -> Self {
        Self { spec, source: None }
    }
}

impl OutputPort {
    pub fn new(spec: PortSpec) -> Self {
        Self {
            spec,
            targets: Vec::new(),
            cache: None,
        }
    }
}
