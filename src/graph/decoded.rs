//! The decoded scene graph
//!
//! Immutable once construction returns. Hosts traverse it through ids;
//! only the asset resolver rewrites a copy of it.

use crate::assets::AssetReference;
use crate::instantiate::{Component, Field};

use super::node::{Node, NodeId};
use super::report::ResolutionReport;

/// Node arena plus roots and the resolution report.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    report: ResolutionReport,
}

impl DecodedGraph {
    pub(crate) fn new(nodes: Vec<Node>, roots: Vec<NodeId>, report: ResolutionReport) -> Self {
        Self {
            nodes,
            roots,
            report,
        }
    }

    /// Root nodes in document order. More than one root is a forest.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child ids in display order; empty for an unknown id
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent()
    }

    /// Components in declared order; empty for an unknown id
    pub fn components(&self, id: NodeId) -> &[Component] {
        self.node(id).map(Node::components).unwrap_or_default()
    }

    pub fn fields<'g>(&self, component: &'g Component) -> &'g [Field] {
        component.fields()
    }

    pub fn asset_references<'g>(
        &self,
        component: &'g Component,
    ) -> impl Iterator<Item = &'g AssetReference> {
        component.asset_references()
    }

    pub fn report(&self) -> &ResolutionReport {
        &self.report
    }

    /// Nodes in depth-first pre-order from each root, paired with depth
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> = self.roots.iter().rev().map(|id| (0, *id)).collect();
        while let Some((depth, id)) = stack.pop() {
            if let Some(node) = self.node(id) {
                out.push((depth, node));
                stack.extend(node.children().iter().rev().map(|child| (depth + 1, *child)));
            }
        }
        out
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn report_mut(&mut self) -> &mut ResolutionReport {
        &mut self.report
    }
}
