//! Rasterflow Core - incremental dataflow graph for image processing
//!
//! This crate provides the graph engine and the built-in operators. It performs
//! no file I/O; decoding and encoding live in `rasterflow-io`.
//!
//! # Core Abstractions
//!
//! ## Graph
//!
//! - [`ImageGraph`] - Arena of operators, connection validation, dirty tracking
//! - [`NodeId`] - Stable node handle, never reused within a graph
//! - [`PortSpec`] / [`PortValue`] / [`PortRef`] - Typed sockets and their values
//! - [`EvalReport`] - What the last evaluation pass processed
//!
//! ## Operators
//!
//! - [`Operator`] - Object-safe trait every node wraps
//! - [`OperatorKind`] - Registry of built-in operators
//! - [`operators::Source`], [`operators::Sink`],
//!   [`operators::BrightnessContrast`], [`operators::Blur`]
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] - Introspection: count, descriptors, get/set by index
//! - [`ParamDescriptor`] - Range, default, unit, flags, step labels
//!
//! ## Pixels
//!
//! - [`PixelBuffer`] - Owned 8-bit RGB image
//! - [`Kernel`] / [`convolve`] - Blur kernels and border-reflecting convolution
//!
//! # Example
//!
//! ```rust
//! use rasterflow_core::{ImageGraph, OperatorKind, PixelBuffer};
//!
//! let mut graph = ImageGraph::new();
//! let src = graph.add_node(OperatorKind::Source);
//! let blur = graph.add_node(OperatorKind::Blur);
//! let sink = graph.add_node(OperatorKind::Sink);
//! graph.connect(src, 0, blur, 0)?;
//! graph.connect(blur, 0, sink, 0)?;
//!
//! graph.load_image(src, PixelBuffer::filled(4, 4, [200, 100, 50]))?;
//! let out = graph.evaluate(sink)?;
//! assert_eq!(out.dimensions(), (4, 4));
//!
//! // Nothing changed, so the second call runs nothing.
//! graph.evaluate(sink)?;
//! assert_eq!(graph.process_count(blur), 1);
//! # Ok::<(), rasterflow_core::GraphError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `tracing` - Emit `tracing::debug!` events for graph edits and passes

pub mod buffer;
pub mod error;
pub mod graph;
pub mod kernel;
pub mod math;
pub mod operator;
pub mod operators;
pub mod param_info;

// Re-export main types at crate root
pub use buffer::{CHANNELS, MAX_VALUE, PixelBuffer};
pub use error::{BufferError, GraphError, OperatorError, ParameterError};
pub use graph::{
    DataKind, EvalReport, ImageGraph, NodeId, PortDirection, PortRef, PortSpec, PortValue,
};
pub use kernel::{Kernel, MAX_RADIUS, MIN_RADIUS, convolve};
pub use math::{affine_u8, saturate_u8, wet_dry_mix};
pub use operator::{Operator, image_input, parameter_input};
pub use operators::{BlurMode, ImageFormat, OperatorKind, UnknownOperator};
pub use param_info::{ParamDescriptor, ParamFlags, ParamUnit, ParameterInfo};
