//! Evaluation engine: pull-based targeted evaluation and push-based propagation.
//!
//! Both entry points open a numbered pass. A node is expanded at most once per
//! pass (its `visited_pass` marker), and only dirty nodes are processed, so
//! shared ancestors in a diamond run once. A node is processed only after every
//! node feeding it is clean, which keeps stale inputs out of `process`.
//!
//! On error the pass stops: nodes already processed stay clean, the failing
//! node and everything not yet reached stay dirty, and a later pass resumes
//! where this one stopped.

use std::collections::VecDeque;

use crate::buffer::PixelBuffer;
use crate::error::GraphError;

use super::node::{NodeData, NodeId};
use super::port::PortValue;
use super::processing::ImageGraph;

/// What one evaluation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalReport {
    /// Pass number (starts at 1).
    pub pass: u64,
    /// Nodes whose `process` completed, in execution order.
    pub processed: Vec<NodeId>,
}

impl ImageGraph {
    /// Pull-based targeted evaluation.
    ///
    /// If `target` is clean its cached result is returned without running
    /// anything. Otherwise every dirty ancestor is processed first (each at most
    /// once), then `target` itself.
    ///
    /// The result is the operator's own [`result()`](crate::Operator::result)
    /// when it has one (e.g. a sink), else the image on its first output port.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownNode`] if `target` doesn't exist
    /// - [`GraphError::MissingInput`] if a node on the way has an unconnected
    ///   required input
    /// - [`GraphError::Operator`] if an operator fails
    /// - [`GraphError::EmptyResult`] if `target` produced no image
    pub fn evaluate(&mut self, target: NodeId) -> Result<PixelBuffer, GraphError> {
        self.get_node(target)?;
        let mut report = self.begin_pass();
        let outcome = self.pull(target, &mut report);
        self.finish_pass(report);
        outcome?;
        self.result_of(target)
    }

    /// Push-based propagation from `origin`.
    ///
    /// Processes `origin` if dirty, then walks its downstream links
    /// breadth-first, processing each dirty node once and passing over clean
    /// ones. Any dirty ancestor of a node on the walk is pulled first, so the
    /// walk never feeds a node stale inputs even if `origin`'s own upstream was
    /// not up to date.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`], [`GraphError::MissingInput`], or
    /// [`GraphError::Operator`].
    pub fn propagate_from(&mut self, origin: NodeId) -> Result<(), GraphError> {
        self.get_node(origin)?;
        let mut report = self.begin_pass();
        let outcome = self.push_walk(origin, &mut report);
        self.finish_pass(report);
        outcome
    }

    /// The report of the most recent pass, if any pass has run.
    pub fn last_report(&self) -> Option<&EvalReport> {
        self.last_report.as_ref()
    }

    fn begin_pass(&mut self) -> EvalReport {
        self.pass += 1;
        EvalReport {
            pass: self.pass,
            processed: Vec::new(),
        }
    }

    fn finish_pass(&mut self, report: EvalReport) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_pass: #{} processed {} node(s) {:?}",
            report.pass,
            report.processed.len(),
            report.processed
        );
        self.last_report = Some(report);
    }

    fn push_walk(&mut self, origin: NodeId, report: &mut EvalReport) -> Result<(), GraphError> {
        let mut queue = VecDeque::from([origin]);
        let mut enqueued = vec![origin];

        while let Some(current) = queue.pop_front() {
            self.pull(current, report)?;
            for &next in self.downstream(current) {
                if !enqueued.contains(&next) {
                    enqueued.push(next);
                    queue.push_back(next);
                }
            }
        }
        Ok(())
    }

    /// Iterative post-order DFS over input connections, processing dirty nodes.
    fn pull(&mut self, target: NodeId, report: &mut EvalReport) -> Result<(), GraphError> {
        let pass = report.pass;
        let mut stack = vec![(target, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                self.process_node(id, report)?;
                continue;
            }
            let node = self.slot_mut(id).ok_or(GraphError::UnknownNode(id))?;
            if !node.dirty || node.visited_pass == pass {
                continue;
            }
            node.visited_pass = pass;
            stack.push((id, true));
            // Reversed so the first input's ancestry runs first.
            stack.extend(node.upstream().into_iter().rev().map(|up| (up, false)));
        }
        Ok(())
    }

    /// Runs one node's operator against its upstream caches.
    ///
    /// The node is lifted out of its slot for the call so its operator can be
    /// borrowed mutably while upstream caches are borrowed shared.
    fn process_node(&mut self, id: NodeId, report: &mut EvalReport) -> Result<(), GraphError> {
        let idx = id.0 as usize;
        let mut node = self
            .nodes
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or(GraphError::UnknownNode(id))?;
        let outcome = self.run_operator(&mut node);
        if outcome.is_ok() {
            node.dirty = false;
            report.processed.push(id);
        }
        self.nodes[idx] = Some(node);
        outcome
    }

    fn run_operator(&self, node: &mut NodeData) -> Result<(), GraphError> {
        if let Some(port) = node
            .inputs
            .iter()
            .find(|p| p.spec.required && p.source.is_none())
        {
            return Err(GraphError::MissingInput {
                node: node.id,
                port: port.spec.name,
            });
        }

        let inputs: Vec<Option<&PortValue>> = node
            .inputs
            .iter()
            .map(|p| p.source.and_then(|src| self.output_value(src.node, src.port)))
            .collect();
        let mut outputs: Vec<Option<PortValue>> =
            node.outputs.iter_mut().map(|p| p.cache.take()).collect();

        node.process_count += 1;
        let outcome = node.op.process(&inputs, &mut outputs);
        for (port, value) in node.outputs.iter_mut().zip(outputs) {
            port.cache = value;
        }
        outcome.map_err(|e| GraphError::from_operator(node.id, e))
    }

    fn result_of(&self, id: NodeId) -> Result<PixelBuffer, GraphError> {
        let node = self.get_node(id)?;
        node.op
            .result()
            .or_else(|| {
                node.outputs
                    .iter()
                    .find_map(|p| p.cache.as_ref().and_then(PortValue::as_image))
            })
            .cloned()
            .ok_or(GraphError::EmptyResult(id))
    }
}
