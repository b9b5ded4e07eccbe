//! The immutable node arena and its navigation API.

use crate::node::{Node, NodeId, NodeKind};
use crate::types::PrimitiveType;
use std::collections::HashMap;

/// A frozen IDL tree.
///
/// Built once by [`AstBuilder`](crate::AstBuilder) and never modified
/// afterwards. Every [`NodeId`] handed out by the builder is valid for the
/// tree it produced.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    primitives: HashMap<PrimitiveType, NodeId>,
}

impl Ast {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        root: NodeId,
        primitives: HashMap<PrimitiveType, NodeId>,
    ) -> Self {
        Self {
            nodes,
            root,
            primitives,
        }
    }

    /// Returns the root (file) scope.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns a node.
    ///
    /// # Panics
    /// Panics if `id` was not produced for this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the IDL name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Returns the scope a node is defined in.
    #[must_use]
    pub fn defined_in(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).scope
    }

    /// Returns the declarations of a scope in source order.
    #[must_use]
    pub fn decls(&self, scope: NodeId) -> &[NodeId] {
        &self.node(scope).decls
    }

    /// Returns the anonymous types defined in a scope in creation order.
    #[must_use]
    pub fn anonymous(&self, scope: NodeId) -> &[NodeId] {
        &self.node(scope).anonymous
    }

    /// Returns the node registered for a primitive type, if one was created.
    #[must_use]
    pub fn primitive(&self, prim: PrimitiveType) -> Option<NodeId> {
        self.primitives.get(&prim).copied()
    }

    /// Iterates over the strict ancestors of a node, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.defined_in(id), move |&s| self.defined_in(s))
    }

    /// Returns the nearest strictly enclosing module or interface, or the
    /// root.
    #[must_use]
    pub fn enclosing_unit(&self, id: NodeId) -> NodeId {
        self.ancestors(id)
            .find(|&s| self.kind(s).is_unit())
            .unwrap_or(self.root)
    }

    /// Returns the unit whose Ada package declares this node.
    ///
    /// Modules and interfaces are their own package; everything else lives
    /// in its enclosing unit.
    #[must_use]
    pub fn package_of(&self, id: NodeId) -> NodeId {
        if id == self.root || self.kind(id).is_unit() {
            id
        } else {
            self.enclosing_unit(id)
        }
    }

    /// Returns the IDL scoped name components, outermost first, excluding
    /// the root.
    #[must_use]
    pub fn scoped_name(&self, id: NodeId) -> Vec<&str> {
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .filter(|&s| s != self.root)
            .map(|s| self.name(s))
            .collect();
        parts.reverse();
        if id != self.root {
            parts.push(self.name(id));
        }
        parts
    }

    /// Follows typedef chains down to the aliased type.
    #[must_use]
    pub fn unalias(&self, mut id: NodeId) -> NodeId {
        // Typedef chains are acyclic by construction: a typedef can only
        // name a type that already exists.
        while let NodeKind::Typedef(t) = self.kind(id) {
            id = t.base;
        }
        id
    }

    /// Iterates over all node identifiers in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }
}
