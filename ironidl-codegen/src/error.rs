//! Error types for code generation.
//!
//! Every failure here is internal: the front end has already rejected
//! invalid IDL, so an error means the tree does not match what the emitter
//! expects. Internal variants carry the generator source location that
//! raised them.

use ironidl_ast::{AstError, ExprKind, NodeId};
use std::panic::Location;
use thiserror::Error;

/// Process exit status for generator-internal failures.
pub const EXIT_INTERNAL: i32 = 3;

/// Process exit status for failures while building the tree.
pub const EXIT_AST: i32 = 2;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Tree construction or lookup error.
    #[error("AST error: {0}")]
    Ast(#[from] AstError),

    /// A constant expression had a kind outside the accepted set.
    #[error("unexpected type {kind} in {context} of node {node} (raised at {location})")]
    UnexpectedExpression {
        /// Node owning the expression.
        node: NodeId,
        /// Kind that was found.
        kind: ExprKind,
        /// What the expression was used for.
        context: &'static str,
        /// Generator source location.
        location: &'static Location<'static>,
    },

    /// A reference did not point at the expected category of node.
    #[error("node {node} is a {actual}, expected {expected} (raised at {location})")]
    Narrow {
        /// Referenced node.
        node: NodeId,
        /// Expected category.
        expected: &'static str,
        /// Kind that was found.
        actual: &'static str,
        /// Generator source location.
        location: &'static Location<'static>,
    },

    /// An anonymous type has no declaration it could be named after.
    #[error("anonymous {kind} {node} has no owning declaration (raised at {location})")]
    UnownedAnonymousType {
        /// Anonymous node.
        node: NodeId,
        /// Its kind.
        kind: &'static str,
        /// Generator source location.
        location: &'static Location<'static>,
    },

    /// A bound reduced to a negative value.
    #[error("negative {context} {value} on node {node} (raised at {location})")]
    NegativeBound {
        /// Node owning the bound.
        node: NodeId,
        /// Reduced value.
        value: i64,
        /// What the bound was used for.
        context: &'static str,
        /// Generator source location.
        location: &'static Location<'static>,
    },

    /// The product of array extents does not fit the size type.
    #[error("element count of array {node} overflows (raised at {location})")]
    ElementCountOverflow {
        /// Array node.
        node: NodeId,
        /// Generator source location.
        location: &'static Location<'static>,
    },
}

impl CodegenError {
    /// Creates an unexpected expression error at the caller's location.
    #[track_caller]
    pub fn unexpected_expression(node: NodeId, kind: ExprKind, context: &'static str) -> Self {
        Self::UnexpectedExpression {
            node,
            kind,
            context,
            location: Location::caller(),
        }
    }

    /// Creates a narrowing error at the caller's location.
    #[track_caller]
    pub fn narrow(node: NodeId, expected: &'static str, actual: &'static str) -> Self {
        Self::Narrow {
            node,
            expected,
            actual,
            location: Location::caller(),
        }
    }

    /// Creates an unowned anonymous type error at the caller's location.
    #[track_caller]
    pub fn unowned(node: NodeId, kind: &'static str) -> Self {
        Self::UnownedAnonymousType {
            node,
            kind,
            location: Location::caller(),
        }
    }

    /// Creates a negative bound error at the caller's location.
    #[track_caller]
    pub fn negative_bound(node: NodeId, value: i64, context: &'static str) -> Self {
        Self::NegativeBound {
            node,
            value,
            context,
            location: Location::caller(),
        }
    }

    /// Creates an element count overflow error at the caller's location.
    #[track_caller]
    pub fn overflow(node: NodeId) -> Self {
        Self::ElementCountOverflow {
            node,
            location: Location::caller(),
        }
    }

    /// Returns the generator source location, for internal errors.
    #[must_use]
    pub fn location(&self) -> Option<&'static Location<'static>> {
        match self {
            Self::Ast(_) => None,
            Self::UnexpectedExpression { location, .. }
            | Self::Narrow { location, .. }
            | Self::UnownedAnonymousType { location, .. }
            | Self::NegativeBound { location, .. }
            | Self::ElementCountOverflow { location, .. } => Some(location),
        }
    }

    /// Returns the process exit status a driver should terminate with.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Ast(_) => EXIT_AST,
            _ => EXIT_INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_points_at_caller() {
        let err = CodegenError::narrow(NodeId::new(3), "type", "module");
        let location = err.location().expect("internal errors carry a location");
        assert!(location.file().ends_with("error.rs"));
        assert!(err.to_string().contains("node #3 is a module, expected type"));
    }

    #[test]
    fn test_exit_codes() {
        let internal = CodegenError::overflow(NodeId::new(1));
        assert_eq!(internal.exit_code(), EXIT_INTERNAL);

        let ast: CodegenError = AstError::UnknownNode {
            node: NodeId::new(9),
        }
        .into();
        assert_eq!(ast.exit_code(), EXIT_AST);
        assert!(ast.location().is_none());
        assert_ne!(EXIT_AST, EXIT_INTERNAL);
    }

    #[test]
    fn test_unexpected_expression_message() {
        let err = CodegenError::unexpected_expression(NodeId::new(2), ExprKind::Double, "array bound");
        assert!(err
            .to_string()
            .starts_with("unexpected type double in array bound of node #2"));
    }
}
