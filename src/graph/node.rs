//! Graph nodes

use std::fmt;

use serde::Serialize;

use crate::instantiate::Component;

/// Identity of a node: its record index in the packed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// A node of the decoded scene graph.
///
/// Owns its components. Children and parent are ids into the graph arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    /// The node's own record, decoded against its class
    attributes: Component,
    pub(crate) children: Vec<NodeId>,
    pub(crate) components: Vec<Component>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, attributes: Component, components: Vec<Component>) -> Self {
        Self {
            id,
            attributes,
            children: Vec::new(),
            components,
            parent: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn class_name(&self) -> &str {
        self.attributes.type_name()
    }

    /// The `_name` attribute, when present
    pub fn name(&self) -> Option<&str> {
        self.attributes.string_field("_name")
    }

    pub fn attributes(&self) -> &Component {
        &self.attributes
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Components in declared order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Attributes followed by components
    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        std::iter::once(&mut self.attributes).chain(self.components.iter_mut())
    }

    /// Attributes followed by components
    pub fn records(&self) -> impl Iterator<Item = &Component> {
        std::iter::once(&self.attributes).chain(self.components.iter())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} \"{}\" [{}]", self.id, name, self.class_name()),
            None => write!(f, "{} [{}]", self.id, self.class_name()),
        }
    }
}
