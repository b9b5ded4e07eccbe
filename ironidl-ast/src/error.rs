//! Error types for AST construction and navigation.

use crate::node::NodeId;
use thiserror::Error;

/// Error type for AST builder and lookup operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AstError {
    /// Node identifier does not belong to this tree.
    #[error("unknown node {node}")]
    UnknownNode {
        /// Offending identifier.
        node: NodeId,
    },

    /// A declaration was added to a node that cannot contain declarations.
    #[error("node {node} ({kind}) is not a scope")]
    NotAScope {
        /// Node used as a scope.
        node: NodeId,
        /// Kind of that node.
        kind: &'static str,
    },

    /// A named declaration was given an empty name.
    #[error("empty name for {kind} declared in {scope}")]
    EmptyName {
        /// Kind of declaration being added.
        kind: &'static str,
        /// Enclosing scope.
        scope: NodeId,
    },

    /// A declaration kind was added to a scope that cannot hold it.
    #[error("{kind} cannot be declared inside {scope_kind} {scope}")]
    MisplacedDeclaration {
        /// Kind of declaration being added.
        kind: &'static str,
        /// Enclosing scope.
        scope: NodeId,
        /// Kind of the enclosing scope.
        scope_kind: &'static str,
    },
}

impl AstError {
    /// Creates a misplaced declaration error.
    pub fn misplaced(kind: &'static str, scope: NodeId, scope_kind: &'static str) -> Self {
        Self::MisplacedDeclaration {
            kind,
            scope,
            scope_kind,
        }
    }
}
