//! Node graph builder
//!
//! Reconstruction runs in three passes:
//!
//! 1. Materialize every node record in document order, with its attributes
//!    and components
//! 2. Link children: child lists are authoritative, a declared parent is
//!    the fallback for nodes no child list claims
//! 3. Walk from the roots; every node must be reached exactly once
//!
//! Structural violations abort with a fatal `DecodeError`. Schema anomalies
//! are recorded in the report.

use std::collections::BTreeMap;

use tracing::debug;

use crate::decode::{DecodeError, DecodeErrorCode, DecodeResult, IndexTable, UnknownTypePolicy};
use crate::document::PackedDocument;
use crate::instantiate::{Component, Instantiator};
use crate::observability::{log_event, Event};
use crate::registry::{ClassRegistry, NODE_CLASS};

use super::decoded::DecodedGraph;
use super::node::{Node, NodeId};
use super::report::ResolutionReport;

/// Builds a `DecodedGraph` from a packed document.
pub struct GraphBuilder<'a> {
    document: &'a PackedDocument,
    registry: &'a ClassRegistry,
    unknown_types: UnknownTypePolicy,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(document: &'a PackedDocument, registry: &'a ClassRegistry) -> Self {
        Self {
            document,
            registry,
            unknown_types: UnknownTypePolicy::default(),
        }
    }

    pub fn with_unknown_types(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_types = policy;
        self
    }

    /// Builds the graph.
    ///
    /// Asset references are left pending; see `assets::resolve_assets`.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` for any index outside its table
    /// - `CyclicReference` from the value pool
    /// - `MultipleParents` for a node or component with two owners
    /// - `GraphCycle` for self-links, repeated children, or nodes no root
    ///   reaches
    /// - `UnknownType` under `UnknownTypePolicy::Fail`
    pub fn build(&self) -> DecodeResult<DecodedGraph> {
        let mut report = ResolutionReport::new();
        let mut nodes = self.materialize(&mut report)?;

        let parents = self.link_children(&mut nodes)?;
        let roots = self.collect_roots(&mut nodes, &parents);
        self.check_reachable(&nodes, &roots)?;

        debug!(
            nodes = nodes.len(),
            roots = roots.len(),
            issues = report.issues.len(),
            "graph built"
        );
        Ok(DecodedGraph::new(nodes, roots, report))
    }

    /// Pass 1: one node per record, components attached in declared order
    fn materialize(&self, report: &mut ResolutionReport) -> DecodeResult<Vec<Node>> {
        let doc = self.document;
        let mut instantiator = Instantiator::new(doc, self.registry);
        let mut component_owner: Vec<Option<usize>> = vec![None; doc.components.len()];
        let mut nodes = Vec::with_capacity(doc.node_count());

        for (index, record) in doc.node_records.iter().enumerate() {
            let attributes = match record.type_index {
                Some(type_index) => instantiator.instantiate(type_index, &record.fields),
                None => instantiator.instantiate_named(NODE_CLASS, &record.fields),
            }
            .map_err(|e| e.with_node(index))?;
            self.record_issues(&attributes, index, report)?;

            let mut components = Vec::with_capacity(record.components.len());
            for &component_index in &record.components {
                let component_record = doc.components.get(component_index).ok_or_else(|| {
                    DecodeError::index_out_of_range(
                        IndexTable::Components,
                        component_index,
                        doc.components.len(),
                    )
                    .with_node(index)
                })?;

                if let Some(first) = component_owner[component_index] {
                    return Err(DecodeError::shared_component(component_index, first, index)
                        .with_node(index));
                }
                component_owner[component_index] = Some(index);

                let component = instantiator
                    .instantiate(component_record.type_index, &component_record.fields)
                    .map_err(|e| e.with_component(component_index).with_node(index))?
                    .with_record(component_index);
                self.record_issues(&component, index, report)?;
                components.push(component);
            }

            nodes.push(Node::new(NodeId::new(index), attributes, components));
        }

        debug!(
            pool_entries = instantiator.resolver().len(),
            materialized = instantiator.resolver().resolved_count(),
            "pool resolved"
        );
        Ok(nodes)
    }

    fn record_issues(
        &self,
        record: &Component,
        node: usize,
        report: &mut ResolutionReport,
    ) -> DecodeResult<()> {
        for issue in record.issues() {
            let issue = issue.with_node(node);
            if issue.code() == DecodeErrorCode::UnknownType {
                if self.unknown_types == UnknownTypePolicy::Fail {
                    return Err(issue);
                }
                log_event!(Event::UnknownType, node = node, type_name = record.type_name());
            }
            report.record(issue);
        }
        Ok(())
    }

    /// Pass 2: claim children, then fall back to declared parents.
    ///
    /// Returns the parent of every claimed node.
    fn link_children(&self, nodes: &mut [Node]) -> DecodeResult<BTreeMap<usize, usize>> {
        let records = &self.document.node_records;
        let count = records.len();
        let mut parents: BTreeMap<usize, usize> = BTreeMap::new();

        // Claims are checked against each other before their range, so two
        // parents listing the same missing child report the double claim.
        for (parent, record) in records.iter().enumerate() {
            for &child in &record.children {
                if child == parent {
                    return Err(DecodeError::graph_cycle(child).with_node(parent));
                }
                match parents.get(&child) {
                    Some(&owner) if owner == parent => {
                        return Err(DecodeError::graph_cycle(child).with_node(parent));
                    }
                    Some(&owner) => {
                        return Err(DecodeError::multiple_parents(child, owner, parent)
                            .with_node(parent));
                    }
                    None => {
                        parents.insert(child, parent);
                    }
                }
            }
        }

        for (&child, &parent) in &parents {
            if child >= count {
                return Err(
                    DecodeError::index_out_of_range(IndexTable::Nodes, child, count)
                        .with_node(parent),
                );
            }
        }

        for (parent, record) in records.iter().enumerate() {
            nodes[parent].children = record.children.iter().map(|&c| NodeId::new(c)).collect();
        }

        for (index, record) in records.iter().enumerate() {
            let declared = match record.parent {
                Some(declared) => declared,
                None => continue,
            };
            if declared >= count {
                return Err(
                    DecodeError::index_out_of_range(IndexTable::Nodes, declared, count)
                        .with_node(index),
                );
            }
            match parents.get(&index) {
                Some(&owner) if owner != declared => {
                    return Err(DecodeError::multiple_parents(index, owner, declared)
                        .with_node(index));
                }
                Some(_) => {}
                None => {
                    if declared == index {
                        return Err(DecodeError::graph_cycle(index).with_node(index));
                    }
                    debug!(node = index, parent = declared, "linked by declared parent");
                    parents.insert(index, declared);
                    nodes[declared].children.push(NodeId::new(index));
                }
            }
        }

        Ok(parents)
    }

    /// Sets parent links and returns nodes without a parent, in document order
    fn collect_roots(&self, nodes: &mut [Node], parents: &BTreeMap<usize, usize>) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for node in nodes.iter_mut() {
            let index = node.id().index();
            node.parent = parents.get(&index).map(|&p| NodeId::new(p));
            if node.parent.is_none() {
                roots.push(node.id());
            }
        }
        roots
    }

    /// Pass 3: every node is reached exactly once from the roots
    fn check_reachable(&self, nodes: &[Node], roots: &[NodeId]) -> DecodeResult<()> {
        let mut visited = vec![false; nodes.len()];
        let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let index = id.index();
            if visited[index] {
                return Err(DecodeError::graph_cycle(index));
            }
            visited[index] = true;
            stack.extend(nodes[index].children().iter().rev().copied());
        }

        match visited.iter().position(|seen| !seen) {
            Some(unreached) => Err(DecodeError::graph_cycle(unreached).with_node(unreached)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ComponentRecord, NodeRecord, PoolEntry};

    fn build(doc: &PackedDocument) -> DecodeResult<DecodedGraph> {
        let registry = ClassRegistry::builtin();
        GraphBuilder::new(doc, &registry).build()
    }

    fn nodes(records: Vec<NodeRecord>) -> PackedDocument {
        PackedDocument {
            node_records: records,
            ..PackedDocument::default()
        }
    }

    #[test]
    fn test_single_empty_node() {
        let doc = nodes(vec![NodeRecord::empty()]);
        let graph = build(&doc).unwrap();
        assert_eq!(graph.roots(), &[NodeId::new(0)]);
        assert!(graph.report().is_clean());
    }

    #[test]
    fn test_children_in_declared_order() {
        let doc = nodes(vec![
            NodeRecord::empty().with_children(vec![2, 1]),
            NodeRecord::empty(),
            NodeRecord::empty(),
        ]);
        let graph = build(&doc).unwrap();
        assert_eq!(graph.children(NodeId::new(0)), &[NodeId::new(2), NodeId::new(1)]);
        assert_eq!(graph.parent(NodeId::new(1)), Some(NodeId::new(0)));
        assert_eq!(graph.roots().len(), 1);
    }

    #[test]
    fn test_forest() {
        let doc = nodes(vec![NodeRecord::empty(), NodeRecord::empty()]);
        let graph = build(&doc).unwrap();
        assert_eq!(graph.roots(), &[NodeId::new(0), NodeId::new(1)]);
    }

    #[test]
    fn test_declared_parent_fallback() {
        let doc = nodes(vec![NodeRecord::empty(), NodeRecord::empty().with_parent(0)]);
        let graph = build(&doc).unwrap();
        assert_eq!(graph.children(NodeId::new(0)), &[NodeId::new(1)]);
        assert_eq!(graph.roots(), &[NodeId::new(0)]);
    }

    #[test]
    fn test_consistent_declared_parent() {
        let doc = nodes(vec![
            NodeRecord::empty().with_children(vec![1]),
            NodeRecord::empty().with_parent(0),
        ]);
        let graph = build(&doc).unwrap();
        assert_eq!(graph.children(NodeId::new(0)), &[NodeId::new(1)]);
    }

    #[test]
    fn test_conflicting_declared_parent() {
        let doc = nodes(vec![
            NodeRecord::empty().with_children(vec![2]),
            NodeRecord::empty(),
            NodeRecord::empty().with_parent(1),
        ]);
        let err = build(&doc).unwrap_err();
        assert_eq!(err.code(), DecodeErrorCode::MultipleParents);
    }

    #[test]
    fn test_two_parents_claim_missing_child() {
        let doc = nodes(vec![
            NodeRecord::empty().with_children(vec![5]),
            NodeRecord::empty().with_children(vec![5]),
        ]);
        let err = build(&doc).unwrap_err();
        assert_eq!(err.code(), DecodeErrorCode::MultipleParents);
        assert_eq!(err.node(), Some(1));
    }

    #[test]
    fn test_child_out_of_range() {
        let doc = nodes(vec![NodeRecord::empty().with_children(vec![3])]);
        let err = build(&doc).unwrap_err();
        assert_eq!(err.code(), DecodeErrorCode::IndexOutOfRange);
    }

    #[test]
    fn test_self_child_is_cycle() {
        let doc = nodes(vec![NodeRecord::empty().with_children(vec![0])]);
        assert_eq!(build(&doc).unwrap_err().code(), DecodeErrorCode::GraphCycle);
    }

    #[test]
    fn test_repeated_child_is_cycle() {
        let doc = nodes(vec![
            NodeRecord::empty().with_children(vec![1, 1]),
            NodeRecord::empty(),
        ]);
        assert_eq!(build(&doc).unwrap_err().code(), DecodeErrorCode::GraphCycle);
    }

    #[test]
    fn test_rootless_cycle() {
        let doc = nodes(vec![
            NodeRecord::empty().with_children(vec![1]),
            NodeRecord::empty().with_children(vec![0]),
        ]);
        assert_eq!(build(&doc).unwrap_err().code(), DecodeErrorCode::GraphCycle);
    }

    #[test]
    fn test_component_attached_twice() {
        let doc = PackedDocument {
            class_types: vec!["cc.Camera".into()],
            components: vec![ComponentRecord::new(0, vec![])],
            node_records: vec![
                NodeRecord::empty().with_components(vec![0]),
                NodeRecord::empty().with_components(vec![0]),
            ],
            ..PackedDocument::default()
        };
        let err = build(&doc).unwrap_err();
        assert_eq!(err.code(), DecodeErrorCode::MultipleParents);
        assert_eq!(err.component(), Some(0));
    }

    #[test]
    fn test_component_out_of_range() {
        let doc = nodes(vec![NodeRecord::empty().with_components(vec![4])]);
        assert_eq!(build(&doc).unwrap_err().code(), DecodeErrorCode::IndexOutOfRange);
    }

    #[test]
    fn test_unknown_component_reported_with_context() {
        let doc = PackedDocument {
            pool: vec![PoolEntry::Number(1.0)],
            class_types: vec!["game.Mystery".into(), "cc.Camera".into()],
            components: vec![ComponentRecord::new(0, vec![0]), ComponentRecord::new(1, vec![0])],
            node_records: vec![NodeRecord::empty().with_components(vec![0, 1])],
            ..PackedDocument::default()
        };
        let graph = build(&doc).unwrap();
        let report = graph.report();
        assert_eq!(report.unknown_type_count, 1);
        assert_eq!(report.issues[0].node(), Some(0));
        assert_eq!(report.issues[0].component(), Some(0));

        let components = graph.components(NodeId::new(0));
        assert_eq!(components.len(), 2);
        assert!(components[1].is_known());
    }

    #[test]
    fn test_unknown_type_fail_policy() {
        let doc = PackedDocument {
            class_types: vec!["game.Mystery".into()],
            components: vec![ComponentRecord::new(0, vec![])],
            node_records: vec![NodeRecord::empty().with_components(vec![0])],
            ..PackedDocument::default()
        };
        let registry = ClassRegistry::builtin();
        let err = GraphBuilder::new(&doc, &registry)
            .with_unknown_types(UnknownTypePolicy::Fail)
            .build()
            .unwrap_err();
        assert_eq!(err.code(), DecodeErrorCode::UnknownType);
    }

    #[test]
    fn test_typed_node_record() {
        let doc = PackedDocument {
            pool: vec![PoolEntry::String("Main".into())],
            class_types: vec!["cc.Scene".into()],
            node_records: vec![NodeRecord::empty().with_type(0).with_fields(vec![0])],
            ..PackedDocument::default()
        };
        let graph = build(&doc).unwrap();
        let scene = graph.node(NodeId::new(0)).unwrap();
        assert_eq!(scene.class_name(), "cc.Scene");
        assert_eq!(scene.name(), Some("Main"));
    }
}
