//! Image graph: mutation API, connection validation, and dirty propagation.
//!
//! [`ImageGraph`] owns every operator in an arena indexed by [`NodeId`]. All
//! cross-references (connections, downstream lists) are ids, never references,
//! so peers can be removed without lifetime tangles. Evaluation lives in the
//! sibling `evaluation` module.

use std::collections::VecDeque;

use crate::buffer::PixelBuffer;
use crate::error::{GraphError, ParameterError};
use crate::operator::Operator;
use crate::operators::{OperatorKind, Source};

use super::evaluation::EvalReport;
use super::node::{NodeData, NodeId};
use super::port::{PortDirection, PortRef, PortValue};

/// Directed acyclic graph of image operators with incremental re-evaluation.
///
/// Nodes are born dirty. Connecting, disconnecting, and parameter changes mark
/// the affected node and everything downstream of it dirty; evaluation then
/// recomputes only dirty nodes, each at most once per pass.
///
/// # Usage
///
/// 1. Create a graph with [`new()`](Self::new)
/// 2. Add nodes: [`add_node()`](Self::add_node), [`add_node_with()`](Self::add_node_with),
///    [`add_operator()`](Self::add_operator)
/// 3. Connect ports: [`connect()`](Self::connect)
/// 4. Feed the sources: [`load_image()`](Self::load_image)
/// 5. Pull a result: [`evaluate()`](Self::evaluate)
///
/// # Example
///
/// ```rust
/// use rasterflow_core::{ImageGraph, OperatorKind, PixelBuffer};
///
/// let mut graph = ImageGraph::new();
/// let src = graph.add_node(OperatorKind::Source);
/// let bc = graph
///     .add_node_with(OperatorKind::BrightnessContrast, &[("brightness", 50.0)])
///     .unwrap();
/// let sink = graph.add_node(OperatorKind::Sink);
/// graph.connect(src, 0, bc, 0).unwrap();
/// graph.connect(bc, 0, sink, 0).unwrap();
///
/// graph.load_image(src, PixelBuffer::filled(2, 2, [128, 128, 128])).unwrap();
/// let out = graph.evaluate(sink).unwrap();
/// assert_eq!(out.pixel(1, 1), Some([178, 178, 178]));
/// ```
#[derive(Debug, Default)]
pub struct ImageGraph {
    pub(super) nodes: Vec<Option<NodeData>>,
    next_node_slot: u32,
    /// Monotonic pass counter; 0 means no pass has run.
    pub(super) pass: u64,
    pub(super) last_report: Option<EvalReport>,
}

impl ImageGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node mutations ---

    /// Adds a built-in operator with default parameters. Returns the new node's ID.
    pub fn add_node(&mut self, kind: OperatorKind) -> NodeId {
        self.add_operator(kind.create())
    }

    /// Adds a built-in operator and applies `params` (name, value) before insertion.
    ///
    /// Nothing is inserted if any parameter is rejected.
    ///
    /// # Errors
    ///
    /// [`ParameterError::UnknownParameter`] or [`ParameterError::NonFinite`].
    pub fn add_node_with(
        &mut self,
        kind: OperatorKind,
        params: &[(&str, f32)],
    ) -> Result<NodeId, ParameterError> {
        let pending = NodeId(self.next_node_slot);
        let mut op = kind.create();
        for &(name, value) in params {
            apply_parameter(op.as_mut(), pending, name, value)?;
        }
        Ok(self.add_operator(op))
    }

    /// Adds any operator. The node starts dirty and unconnected.
    pub fn add_operator(&mut self, op: Box<dyn Operator + Send>) -> NodeId {
        let id = NodeId(self.next_node_slot);
        self.next_node_slot += 1;

        let idx = id.0 as usize;
        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || None);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: {} node {id}", op.name());
        self.nodes[idx] = Some(NodeData::new(id, op));
        id
    }

    /// Removes a node and both halves of every connection touching it.
    ///
    /// Former consumers lose their input and are marked dirty.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if the node doesn't exist.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(GraphError::UnknownNode(id))?;

        for (port, input) in node.inputs.iter().enumerate() {
            let Some(src) = input.source else { continue };
            if let Some(up) = self.slot_mut(src.node) {
                if let Some(out) = up.outputs.get_mut(src.port) {
                    out.targets.retain(|t| *t != PortRef { node: id, port });
                }
                up.downstream.retain(|&d| d != id);
            }
        }

        let mut orphaned: Vec<NodeId> = Vec::new();
        for target in node.outputs.iter().flat_map(|o| o.targets.iter()) {
            if let Some(input) = self
                .slot_mut(target.node)
                .and_then(|down| down.inputs.get_mut(target.port))
            {
                input.source = None;
            }
            if !orphaned.contains(&target.node) {
                orphaned.push(target.node);
            }
        }
        for down in orphaned {
            self.mark_dirty(down);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: node {id}");
        Ok(())
    }

    /// Connects output port `src_port` of `src` to input port `dst_port` of `dst`.
    ///
    /// All checks run before any mutation, so a failed call leaves the graph
    /// exactly as it was. On success `dst` and everything downstream of it is
    /// marked dirty.
    ///
    /// # Errors
    ///
    /// In check order:
    /// - [`GraphError::UnknownNode`] if either node doesn't exist
    /// - [`GraphError::CycleDetected`] if `dst` can already reach `src`
    ///   (including `src == dst`)
    /// - [`GraphError::IncompatibleConnection`] if an index names a port of the
    ///   wrong direction
    /// - [`GraphError::PortOutOfRange`] if an index names no port at all
    /// - [`GraphError::IncompatibleConnection`] if the data kinds differ or the
    ///   input port is already connected
    pub fn connect(
        &mut self,
        src: NodeId,
        src_port: usize,
        dst: NodeId,
        dst_port: usize,
    ) -> Result<(), GraphError> {
        let src_node = self.get_node(src)?;
        let dst_node = self.get_node(dst)?;

        // Adding src -> dst closes a cycle iff dst already reaches src.
        if self.can_reach(dst, src) {
            return Err(GraphError::CycleDetected { from: src, to: dst });
        }

        let out_spec = match src_node.outputs.get(src_port) {
            Some(port) => port.spec,
            None if src_port < src_node.inputs.len() => {
                return Err(GraphError::IncompatibleConnection(format!(
                    "port {src_port} on {src} is an input, not an output"
                )));
            }
            None => {
                return Err(GraphError::PortOutOfRange {
                    node: src,
                    direction: PortDirection::Output,
                    index: src_port,
                    count: src_node.outputs.len(),
                });
            }
        };
        let in_port = match dst_node.inputs.get(dst_port) {
            Some(port) => port,
            None if dst_port < dst_node.outputs.len() => {
                return Err(GraphError::IncompatibleConnection(format!(
                    "port {dst_port} on {dst} is an output, not an input"
                )));
            }
            None => {
                return Err(GraphError::PortOutOfRange {
                    node: dst,
                    direction: PortDirection::Input,
                    index: dst_port,
                    count: dst_node.inputs.len(),
                });
            }
        };

        if out_spec.kind != in_port.spec.kind {
            return Err(GraphError::IncompatibleConnection(format!(
                "{} output '{}' cannot feed {} input '{}'",
                out_spec.kind, out_spec.name, in_port.spec.kind, in_port.spec.name
            )));
        }
        if let Some(existing) = in_port.source {
            return Err(GraphError::IncompatibleConnection(format!(
                "input '{}' on {dst} is already fed by {}",
                in_port.spec.name, existing.node
            )));
        }

        // All checks passed; both lookups below cannot miss.
        if let Some(up) = self.slot_mut(src) {
            up.outputs[src_port].targets.push(PortRef {
                node: dst,
                port: dst_port,
            });
            if !up.downstream.contains(&dst) {
                up.downstream.push(dst);
            }
        }
        if let Some(down) = self.slot_mut(dst) {
            down.inputs[dst_port].source = Some(PortRef {
                node: src,
                port: src_port,
            });
        }
        self.mark_dirty(dst);

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {src}:{src_port} → {dst}:{dst_port}");
        Ok(())
    }

    /// Removes the connection feeding input port `dst_port` of `dst`.
    ///
    /// Returns the output port that fed it. `dst` and its downstream are
    /// marked dirty.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`], [`GraphError::PortOutOfRange`], or
    /// [`GraphError::NotConnected`] if the port has no connection.
    pub fn disconnect(&mut self, dst: NodeId, dst_port: usize) -> Result<PortRef, GraphError> {
        let dst_node = self.get_node(dst)?;
        let input = dst_node
            .inputs
            .get(dst_port)
            .ok_or(GraphError::PortOutOfRange {
                node: dst,
                direction: PortDirection::Input,
                index: dst_port,
                count: dst_node.inputs.len(),
            })?;
        let src = input.source.ok_or(GraphError::NotConnected {
            node: dst,
            port: dst_port,
        })?;

        if let Some(down) = self.slot_mut(dst) {
            down.inputs[dst_port].source = None;
        }
        if let Some(up) = self.slot_mut(src.node) {
            if let Some(out) = up.outputs.get_mut(src.port) {
                out.targets.retain(|t| {
                    *t != PortRef {
                        node: dst,
                        port: dst_port,
                    }
                });
            }
            if !up.feeds(dst) {
                up.downstream.retain(|&d| d != dst);
            }
        }
        self.mark_dirty(dst);

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: {}:{} ✕ {dst}:{dst_port}", src.node, src.port);
        Ok(src)
    }

    // --- Operator state ---

    /// Sets a parameter by name (display name, short name, or string id,
    /// case-insensitive). The operator clamps the value to its range; the node
    /// and its downstream are marked dirty.
    ///
    /// # Errors
    ///
    /// [`ParameterError::UnknownNode`], [`ParameterError::UnknownParameter`], or
    /// [`ParameterError::NonFinite`] for NaN and infinities.
    pub fn set_parameter(&mut self, id: NodeId, name: &str, value: f32) -> Result<(), ParameterError> {
        let node = self.slot_mut(id).ok_or(ParameterError::UnknownNode(id))?;
        let _index = apply_parameter(node.op.as_mut(), id, name, value)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_param: {id} {name}[{_index}] = {}",
            node.op.get_param(_index)
        );
        self.mark_dirty(id);
        Ok(())
    }

    /// Reads a parameter by name.
    ///
    /// # Errors
    ///
    /// [`ParameterError::UnknownNode`] or [`ParameterError::UnknownParameter`].
    pub fn get_parameter(&self, id: NodeId, name: &str) -> Result<f32, ParameterError> {
        let node = self.slot(id).ok_or(ParameterError::UnknownNode(id))?;
        let index = node
            .op
            .find_param_by_name(name)
            .ok_or_else(|| ParameterError::UnknownParameter {
                node: id,
                name: name.to_string(),
            })?;
        Ok(node.op.get_param(index))
    }

    /// Replaces the image held by a [`Source`] node and marks it dirty.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`], or [`GraphError::WrongOperator`] if the
    /// node is not a source.
    pub fn load_image(&mut self, id: NodeId, image: PixelBuffer) -> Result<(), GraphError> {
        let expected = self.get_node(id).map(|_| "Image Input")?;
        self.update(id, |src: &mut Source| src.set_image(image))
            .ok_or(GraphError::WrongOperator { node: id, expected })
    }

    /// Runs `f` on the node's operator if it is a `T`, then marks the node
    /// dirty. Returns `None` (and marks nothing) if the node doesn't exist or
    /// holds a different type.
    pub fn update<T, R>(&mut self, id: NodeId, f: impl FnOnce(&mut T) -> R) -> Option<R>
    where
        T: Operator + 'static,
    {
        let op = self.slot_mut(id)?.op.as_any_mut().downcast_mut::<T>()?;
        let out = f(op);
        self.mark_dirty(id);
        Some(out)
    }

    /// Typed read access to a node's operator.
    pub fn operator<T>(&self, id: NodeId) -> Option<&T>
    where
        T: Operator + 'static,
    {
        self.slot(id)?.op.as_any().downcast_ref::<T>()
    }

    // --- Queries ---

    /// Returns the number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns the number of connections (connected input ports).
    pub fn connection_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .flat_map(|n| n.inputs.iter())
            .filter(|p| p.source.is_some())
            .count()
    }

    /// Returns true if `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Iterates live node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().flatten().map(|n| n.id)
    }

    /// Display name of the node's operator.
    pub fn name(&self, id: NodeId) -> Option<&'static str> {
        self.slot(id).map(|n| n.op.name())
    }

    /// Returns whether the node needs recomputation. False for unknown ids.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|n| n.dirty)
    }

    /// Distinct consumers of the node's outputs, in connection order.
    pub fn downstream(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|n| n.downstream.as_slice())
            .unwrap_or_default()
    }

    /// Distinct producers feeding the node's inputs, in port order.
    pub fn upstream(&self, id: NodeId) -> Vec<NodeId> {
        self.slot(id).map(NodeData::upstream).unwrap_or_default()
    }

    /// The output port feeding input `port` of `id`, if connected.
    pub fn input_source(&self, id: NodeId, port: usize) -> Option<PortRef> {
        self.slot(id)?.inputs.get(port)?.source
    }

    /// Every input port fed by output `port` of `id`.
    pub fn output_targets(&self, id: NodeId, port: usize) -> &[PortRef] {
        self.slot(id)
            .and_then(|n| n.outputs.get(port))
            .map(|p| p.targets.as_slice())
            .unwrap_or_default()
    }

    /// The value cached on output `port` of `id`, if any.
    pub fn output_value(&self, id: NodeId, port: usize) -> Option<&PortValue> {
        self.slot(id)?.outputs.get(port)?.cache.as_ref()
    }

    /// How many times the engine has run the node's `process`.
    pub fn process_count(&self, id: NodeId) -> u64 {
        self.slot(id).map_or(0, |n| n.process_count)
    }

    /// DFS reachability check: can `from` reach `to` via downstream links?
    ///
    /// Every node reaches itself.
    pub fn can_reach(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            let idx = current.0 as usize;
            if idx >= visited.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;

            if let Some(Some(node)) = self.nodes.get(idx) {
                stack.extend(node.downstream.iter().copied());
            }
        }
        false
    }

    // --- Internal helpers ---

    pub(super) fn slot(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize).and_then(|n| n.as_ref())
    }

    pub(super) fn slot_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize).and_then(|n| n.as_mut())
    }

    pub(super) fn get_node(&self, id: NodeId) -> Result<&NodeData, GraphError> {
        self.slot(id).ok_or(GraphError::UnknownNode(id))
    }

    /// Marks `id` dirty and cascades breadth-first over downstream links.
    ///
    /// The walk stops at nodes that are already dirty: dirtiness is
    /// downward-closed, so their descendants are dirty too.
    pub(super) fn mark_dirty(&mut self, id: NodeId) {
        let mut queue = VecDeque::from([id]);
        let mut first = true;
        let mut _marked = 0usize;

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.slot_mut(current) else {
                continue;
            };
            if node.dirty && !first {
                continue;
            }
            first = false;
            if !node.dirty {
                node.dirty = true;
                _marked += 1;
            }
            queue.extend(node.downstream.iter().copied());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_dirty: {id} (+{_marked} newly dirty)");
    }
}

/// Resolves `name` on `op` and sets it. Returns the parameter index.
fn apply_parameter(
    op: &mut (dyn Operator + Send),
    node: NodeId,
    name: &str,
    value: f32,
) -> Result<usize, ParameterError> {
    let index = op
        .find_param_by_name(name)
        .ok_or_else(|| ParameterError::UnknownParameter {
            node,
            name: name.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ParameterError::NonFinite {
            name: name.to_string(),
        });
    }
    op.set_param(index, value);
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Blur, BrightnessContrast, Sink};

    fn chain() -> (ImageGraph, NodeId, NodeId, NodeId) {
        let mut g = ImageGraph::new();
        let src = g.add_node(OperatorKind::Source);
        let bc = g.add_node(OperatorKind::BrightnessContrast);
        let sink = g.add_node(OperatorKind::Sink);
        g.connect(src, 0, bc, 0).unwrap();
        g.connect(bc, 0, sink, 0).unwrap();
        (g, src, bc, sink)
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut g = ImageGraph::new();
        let a = g.add_node(OperatorKind::Source);
        let b = g.add_node(OperatorKind::Sink);
        assert_eq!((a.index(), b.index()), (0, 1));
        g.remove_node(a).unwrap();
        let c = g.add_node(OperatorKind::Blur);
        assert_eq!(c.index(), 2);
        assert!(!g.contains(a));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn connect_records_both_halves() {
        let (g, src, bc, sink) = chain();
        assert_eq!(g.connection_count(), 2);
        assert_eq!(g.input_source(bc, 0), Some(PortRef { node: src, port: 0 }));
        assert_eq!(g.output_targets(src, 0), &[PortRef { node: bc, port: 0 }]);
        assert_eq!(g.downstream(src), &[bc]);
        assert_eq!(g.upstream(sink), vec![bc]);
        assert!(g.can_reach(src, sink));
        assert!(!g.can_reach(sink, src));
    }

    #[test]
    fn fan_out_lists_consumer_once_per_node() {
        let mut g = ImageGraph::new();
        let src = g.add_node(OperatorKind::Source);
        let a = g.add_node(OperatorKind::Blur);
        let b = g.add_node(OperatorKind::Sink);
        g.connect(src, 0, a, 0).unwrap();
        g.connect(src, 0, b, 0).unwrap();
        assert_eq!(g.downstream(src), &[a, b]);
        assert_eq!(g.output_targets(src, 0).len(), 2);
    }

    #[test]
    fn unknown_node_rejected() {
        let (mut g, src, ..) = chain();
        let ghost = NodeId(99);
        assert!(matches!(
            g.connect(src, 0, ghost, 0),
            Err(GraphError::UnknownNode(id)) if id == ghost
        ));
        assert!(matches!(g.remove_node(ghost), Err(GraphError::UnknownNode(_))));
    }

    #[test]
    fn port_out_of_range() {
        let mut g = ImageGraph::new();
        let src = g.add_node(OperatorKind::Source);
        let blur = g.add_node(OperatorKind::Blur);
        assert!(matches!(
            g.connect(src, 3, blur, 0),
            Err(GraphError::PortOutOfRange {
                direction: PortDirection::Output,
                index: 3,
                count: 1,
                ..
            })
        ));
        assert!(matches!(
            g.connect(src, 0, blur, 2),
            Err(GraphError::PortOutOfRange {
                direction: PortDirection::Input,
                ..
            })
        ));
        assert_eq!(g.connection_count(), 0);
    }

    #[test]
    fn wrong_direction_is_incompatible() {
        let mut g = ImageGraph::new();
        let blur = g.add_node(OperatorKind::Blur);
        let src = g.add_node(OperatorKind::Source);
        let sink = g.add_node(OperatorKind::Sink);
        // Sink's port 0 is an input; Source's port 0 is an output.
        assert!(matches!(
            g.connect(sink, 0, blur, 0),
            Err(GraphError::IncompatibleConnection(_))
        ));
        assert!(matches!(
            g.connect(blur, 0, src, 0),
            Err(GraphError::IncompatibleConnection(_))
        ));
        assert_eq!(g.connection_count(), 0);
    }

    #[test]
    fn occupied_input_is_incompatible() {
        let (mut g, _, bc, _) = chain();
        let other = g.add_node(OperatorKind::Source);
        let err = g.connect(other, 0, bc, 0).unwrap_err();
        assert!(matches!(err, GraphError::IncompatibleConnection(_)));
        assert!(g.downstream(other).is_empty());
    }

    #[test]
    fn cycle_and_self_loop_rejected() {
        let mut g = ImageGraph::new();
        let a = g.add_node(OperatorKind::Blur);
        let b = g.add_node(OperatorKind::Blur);
        g.connect(a, 0, b, 0).unwrap();
        assert!(matches!(
            g.connect(b, 0, a, 0),
            Err(GraphError::CycleDetected { from, to }) if from == b && to == a
        ));
        assert!(matches!(
            g.connect(b, 0, b, 0),
            Err(GraphError::CycleDetected { .. })
        ));
        assert_eq!(g.connection_count(), 1);
        assert_eq!(g.input_source(a, 0), None);
    }

    #[test]
    fn disconnect_removes_both_halves() {
        let (mut g, src, bc, sink) = chain();
        assert!(g.operator::<Sink>(sink).is_some());
        for id in [src, bc, sink] {
            g.slot_mut(id).unwrap().dirty = false;
        }

        let removed = g.disconnect(bc, 0).unwrap();
        assert_eq!(removed, PortRef { node: src, port: 0 });
        assert_eq!(g.input_source(bc, 0), None);
        assert!(g.output_targets(src, 0).is_empty());
        assert!(g.downstream(src).is_empty());
        assert!(!g.is_dirty(src));
        assert!(g.is_dirty(bc));
        assert!(g.is_dirty(sink));

        assert!(matches!(
            g.disconnect(bc, 0),
            Err(GraphError::NotConnected { port: 0, .. })
        ));
    }

    #[test]
    fn remove_node_detaches_peers() {
        let (mut g, src, bc, sink) = chain();
        g.remove_node(bc).unwrap();
        assert_eq!(g.connection_count(), 0);
        assert!(g.downstream(src).is_empty());
        assert_eq!(g.input_source(sink, 0), None);
        assert!(g.is_dirty(sink));
        assert!(matches!(g.remove_node(bc), Err(GraphError::UnknownNode(_))));
    }

    #[test]
    fn dirty_cascade_scoped_to_downstream() {
        let mut g = ImageGraph::new();
        let src = g.add_node(OperatorKind::Source);
        let a = g.add_node(OperatorKind::BrightnessContrast);
        let b = g.add_node(OperatorKind::Blur);
        let side = g.add_node(OperatorKind::Sink);
        let sink = g.add_node(OperatorKind::Sink);
        g.connect(src, 0, a, 0).unwrap();
        g.connect(a, 0, b, 0).unwrap();
        g.connect(b, 0, sink, 0).unwrap();
        g.connect(src, 0, side, 0).unwrap();
        for id in [src, a, b, side, sink] {
            g.slot_mut(id).unwrap().dirty = false;
        }

        g.set_parameter(b, "radius", 3.0).unwrap();
        assert!(!g.is_dirty(src));
        assert!(!g.is_dirty(a));
        assert!(!g.is_dirty(side));
        assert!(g.is_dirty(b));
        assert!(g.is_dirty(sink));
    }

    #[test]
    fn parameters_by_name() {
        let (mut g, _, bc, _) = chain();
        g.set_parameter(bc, "Brightness", 20.0).unwrap();
        g.set_parameter(bc, "contrast", 9.0).unwrap();
        assert_eq!(g.get_parameter(bc, "brightness"), Ok(20.0));
        assert_eq!(g.get_parameter(bc, "contrast"), Ok(3.0));
        assert_eq!(g.operator::<BrightnessContrast>(bc).unwrap().brightness(), 20);

        assert!(matches!(
            g.set_parameter(bc, "gamma", 1.0),
            Err(ParameterError::UnknownParameter { .. })
        ));
        assert!(matches!(
            g.set_parameter(bc, "contrast", f32::NAN),
            Err(ParameterError::NonFinite { .. })
        ));
        assert_eq!(
            g.set_parameter(NodeId(42), "contrast", 1.0),
            Err(ParameterError::UnknownNode(NodeId(42)))
        );
    }

    #[test]
    fn add_node_with_is_all_or_nothing() {
        let mut g = ImageGraph::new();
        let blur = g
            .add_node_with(OperatorKind::Blur, &[("radius", 4.0), ("mode", 1.0)])
            .unwrap();
        assert_eq!(g.operator::<Blur>(blur).unwrap().radius(), 4);

        let before = g.node_count();
        assert!(
            g.add_node_with(OperatorKind::Blur, &[("radius", 2.0), ("bogus", 1.0)])
                .is_err()
        );
        assert_eq!(g.node_count(), before);
    }

    #[test]
    fn typed_access() {
        let (mut g, src, bc, _) = chain();
        assert!(g.operator::<Blur>(bc).is_none());
        assert_eq!(g.name(bc), Some("Brightness/Contrast"));
        assert!(g.update(bc, |op: &mut Blur| op.set_radius(2)).is_none());

        g.load_image(src, PixelBuffer::new(1, 1)).unwrap();
        assert!(g.operator::<Source>(src).unwrap().image().is_some());
        assert!(matches!(
            g.load_image(bc, PixelBuffer::new(1, 1)),
            Err(GraphError::WrongOperator { .. })
        ));
    }

    #[test]
    fn graph_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ImageGraph>();
    }
}
