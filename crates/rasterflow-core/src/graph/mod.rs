//! Dataflow graph engine.
//!
//! [`ImageGraph`] holds operators as nodes and connections between their typed
//! ports. Edits mark the touched node and everything downstream of it dirty;
//! evaluation recomputes only dirty nodes.
//!
//! # Architecture
//!
//! - **Arena storage.** Nodes live in `Vec<Option<NodeData>>` indexed by
//!   [`NodeId`]. Ids are never reused; a removed node leaves a `None` slot.
//! - **Symmetric connections.** Each connection is recorded on the input port
//!   (its single source [`PortRef`]) and on the output port (its list of
//!   targets). Both halves are created and removed together.
//! - **Downstream lists.** Each node keeps the distinct nodes consuming its
//!   outputs. Cycle checks and dirty cascades walk these lists.
//!
//! # Evaluation
//!
//! - [`evaluate()`](ImageGraph::evaluate) pulls: it walks input connections
//!   depth-first, processes dirty ancestors in post-order, and memoizes visits
//!   per pass so shared ancestors run once.
//! - [`propagate_from()`](ImageGraph::propagate_from) pushes: it processes a
//!   node and then walks its downstream links breadth-first.
//!
//! # Invariants
//!
//! After every mutation: connections run output → input between ports of the
//! same [`DataKind`], the downstream relation is acyclic, and dirtiness is
//! downward-closed. After a successful pass every visited node is clean.

mod evaluation;
mod node;
mod port;
mod processing;

pub use evaluation::EvalReport;
pub use node::NodeId;
pub use port::{DataKind, PortDirection, PortRef, PortSpec, PortValue};
pub use processing::ImageGraph;
