//! Graph node types.
//!
//! Each node owns one boxed [`Operator`] plus the engine's bookkeeping for it:
//! port records, the downstream adjacency list, the dirty flag, and the
//! visited-this-pass marker used to memoize evaluation.

use crate::operator::Operator;

use super::port::{InputPort, OutputPort};

/// Unique identifier for a node in an [`ImageGraph`](crate::ImageGraph).
///
/// Node IDs are assigned sequentially and never reused within a graph instance,
/// so a removed node's id stays invalid for the graph's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Internal bookkeeping for a node in the graph.
pub(crate) struct NodeData {
    pub id: NodeId,
    pub op: Box<dyn Operator + Send>,
    pub inputs: Vec<InputPort>,
    pub outputs: Vec<OutputPort>,
    /// Distinct consumers of any output port, in connection order.
    pub downstream: Vec<NodeId>,
    pub dirty: bool,
    /// Pass number in which this node was last visited (0 = never).
    pub visited_pass: u64,
    /// How many times `process` has run on this node.
    pub process_count: u64,
}

impl NodeData {
    /// Creates a dirty, unconnected node around `op`.
    pub fn new(id: NodeId, op: Box<dyn Operator + Send>) -> Self {
        let inputs = op.inputs().iter().copied().map(InputPort::new).collect();
        let outputs = op.outputs().iter().copied().map(OutputPort::new).collect();
        Self {
            id,
            op,
            inputs,
            outputs,
            downstream: Vec::new(),
            dirty: true,
            visited_pass: 0,
            process_count: 0,
        }
    }

    /// Every distinct node feeding one of this node's inputs.
    pub fn upstream(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.inputs.len());
        for src in self.inputs.iter().filter_map(|p| p.source) {
            if !ids.contains(&src.node) {
                ids.push(src.node);
            }
        }
        ids
    }

    /// Returns true if any output port still feeds `node`.
    pub fn feeds(&self, node: NodeId) -> bool {
        self.outputs
            .iter()
            .any(|p| p.targets.iter().any(|t| t.node == node))
    }
}

impl core::fmt::Debug for NodeData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeData")
            .field("id", &self.id)
            .field("op", &self.op.name())
            .field("downstream", &self.downstream)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
