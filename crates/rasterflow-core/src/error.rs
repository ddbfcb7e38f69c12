//! Error types for graph mutation, parameter access, and evaluation.
//!
//! Structural errors ([`GraphError::UnknownNode`], [`GraphError::PortOutOfRange`],
//! [`GraphError::IncompatibleConnection`], [`GraphError::CycleDetected`]) are
//! returned before any mutation happens. Evaluation errors
//! ([`GraphError::MissingInput`], [`GraphError::EmptyResult`],
//! [`GraphError::Operator`]) abort the current pass.

use thiserror::Error;

use crate::graph::{NodeId, PortDirection};

/// Errors raised by [`ImageGraph`](crate::ImageGraph) operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The node id does not exist in this graph.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A port index is outside the operator's port list.
    #[error("{direction} port {index} out of range on {node} ({count} ports)")]
    PortOutOfRange {
        /// Node whose port list was indexed.
        node: NodeId,
        /// Which port list was indexed.
        direction: PortDirection,
        /// Requested index.
        index: usize,
        /// Number of ports in that list.
        count: usize,
    },

    /// Direction, data kind, or occupancy rules forbid this connection.
    #[error("incompatible connection: {0}")]
    IncompatibleConnection(String),

    /// `to` can already reach `from`, so the edge would close a cycle.
    #[error("connecting {from} to {to} would create a cycle")]
    CycleDetected {
        /// Source node of the rejected edge.
        from: NodeId,
        /// Destination node of the rejected edge.
        to: NodeId,
    },

    /// The input port has no connection to remove.
    #[error("input port {port} on {node} is not connected")]
    NotConnected {
        /// Node owning the input port.
        node: NodeId,
        /// Input port index.
        port: usize,
    },

    /// The node holds a different operator type than the call requires.
    #[error("{node} is not an {expected} node")]
    WrongOperator {
        /// Node that was addressed.
        node: NodeId,
        /// Display name of the required operator.
        expected: &'static str,
    },

    /// A required input port had no connection when the node was processed.
    #[error("{node} cannot run: required input '{port}' is not connected")]
    MissingInput {
        /// Node that could not be processed.
        node: NodeId,
        /// Name of the unconnected port.
        port: &'static str,
    },

    /// The evaluated node has no result to hand back.
    #[error("{0} has no result")]
    EmptyResult(NodeId),

    /// An operator failed while processing.
    #[error("{node} failed: {source}")]
    Operator {
        /// Node whose operator failed.
        node: NodeId,
        /// Underlying operator error.
        #[source]
        source: OperatorError,
    },
}

/// Errors raised by parameter access.
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    /// The node id does not exist in this graph.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The operator has no parameter with that name.
    #[error("{node} has no parameter named '{name}'")]
    UnknownParameter {
        /// Node that was addressed.
        node: NodeId,
        /// Requested parameter name.
        name: String,
    },

    /// NaN or infinite values cannot be clamped meaningfully.
    #[error("parameter '{name}' cannot be set to a non-finite value")]
    NonFinite {
        /// Requested parameter name.
        name: String,
    },
}

/// Errors raised inside [`Operator::process`](crate::Operator::process).
#[derive(Debug, Error, PartialEq)]
pub enum OperatorError {
    /// The operator needs an input that is not connected.
    #[error("required input '{0}' is not connected")]
    MissingInput(&'static str),

    /// An input carried a value of the wrong data kind.
    #[error("input '{0}' carried the wrong data kind")]
    KindMismatch(&'static str),

    /// Two buffers that must agree in size do not.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors raised when constructing or combining pixel buffers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Raw byte length does not match `width * height * 3`.
    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Required byte count.
        expected: usize,
        /// Supplied byte count.
        actual: usize,
    },

    /// Two images have different dimensions.
    #[error("image size mismatch: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        /// Dimensions of the reference image.
        expected: (u32, u32),
        /// Dimensions of the other image.
        actual: (u32, u32),
    },
}

impl GraphError {
    /// Wraps an operator failure for `node`, lifting missing inputs to
    /// [`GraphError::MissingInput`].
    pub(crate) fn from_operator(node: NodeId, source: OperatorError) -> Self {
        match source {
            OperatorError::MissingInput(port) => Self::MissingInput { node, port },
            source => Self::Operator { node, source },
        }
    }

    /// Returns true for errors detected before any graph mutation.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnknownNode(_)
                | Self::PortOutOfRange { .. }
                | Self::IncompatibleConnection(_)
                | Self::CycleDetected { .. }
                | Self::NotConnected { .. }
                | Self::WrongOperator { .. }
        )
    }
}
