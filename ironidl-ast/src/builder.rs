//! Tree construction.
//!
//! The builder is the hand-off point from a front end: it appends nodes to
//! the arena, wires scope back-references, and freezes the result into an
//! [`Ast`]. It checks structural placement only; semantic validation of the
//! IDL is the front end's job.

use crate::ast::Ast;
use crate::error::AstError;
use crate::expr::ExprValue;
use crate::node::{
    ArgumentDef, ArrayDef, AttributeDef, BranchDef, ConstantDef, FieldDef, FixedDef,
    InterfaceDef, Node, NodeId, NodeKind, OperationDef, SequenceDef, StringDef, TypedefDef,
    UnionDef, UnionLabel,
};
use crate::types::{ParamDirection, PrimitiveType};
use std::collections::HashMap;

/// Incremental builder for an [`Ast`].
#[derive(Debug, Clone)]
pub struct AstBuilder {
    nodes: Vec<Node>,
    primitives: HashMap<PrimitiveType, NodeId>,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    /// Creates a builder holding only the root file scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("", None, NodeKind::Module)],
            primitives: HashMap::new(),
        }
    }

    /// Returns the root file scope.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Freezes the tree.
    #[must_use]
    pub fn finish(self) -> Ast {
        let root = self.root();
        Ast::from_parts(self.nodes, root, self.primitives)
    }

    /// Returns the node for a primitive type, creating it on first use.
    pub fn primitive(&mut self, prim: PrimitiveType) -> NodeId {
        if let Some(&id) = self.primitives.get(&prim) {
            return id;
        }
        let id = self.push(Node::new(
            prim.idl_name(),
            Some(self.root()),
            NodeKind::Primitive(prim),
        ));
        self.primitives.insert(prim, id);
        id
    }

    /// Declares a module.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a module or the name is empty.
    pub fn module(&mut self, scope: NodeId, name: &str) -> Result<NodeId, AstError> {
        self.declare(scope, name, NodeKind::Module, |k| {
            matches!(k, NodeKind::Module)
        })
    }

    /// Declares an interface inheriting from `bases`.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a module or the name is empty.
    pub fn interface(
        &mut self,
        scope: NodeId,
        name: &str,
        bases: Vec<NodeId>,
    ) -> Result<NodeId, AstError> {
        self.declare(
            scope,
            name,
            NodeKind::Interface(InterfaceDef { bases }),
            |k| matches!(k, NodeKind::Module),
        )
    }

    /// Declares a struct.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` cannot hold type declarations.
    pub fn structure(&mut self, scope: NodeId, name: &str) -> Result<NodeId, AstError> {
        self.declare(scope, name, NodeKind::Struct, holds_types)
    }

    /// Declares an exception.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a module or interface.
    pub fn exception(&mut self, scope: NodeId, name: &str) -> Result<NodeId, AstError> {
        self.declare(scope, name, NodeKind::Exception, |k| k.is_unit())
    }

    /// Declares a union switching on `discriminant`.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` cannot hold type declarations.
    pub fn union(
        &mut self,
        scope: NodeId,
        name: &str,
        discriminant: NodeId,
    ) -> Result<NodeId, AstError> {
        self.declare(
            scope,
            name,
            NodeKind::Union(UnionDef { discriminant }),
            holds_types,
        )
    }

    /// Adds a branch to a union.
    ///
    /// # Errors
    /// Returns `AstError` if `union` is not a union.
    pub fn branch(
        &mut self,
        union: NodeId,
        name: &str,
        labels: Vec<UnionLabel>,
        field_type: NodeId,
    ) -> Result<NodeId, AstError> {
        self.declare(
            union,
            name,
            NodeKind::Branch(BranchDef { labels, field_type }),
            |k| matches!(k, NodeKind::Union(_)),
        )
    }

    /// Declares an enum with the given enumerators.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` cannot hold type declarations or any
    /// name is empty.
    pub fn enumeration(
        &mut self,
        scope: NodeId,
        name: &str,
        enumerators: &[&str],
    ) -> Result<NodeId, AstError> {
        let id = self.declare(scope, name, NodeKind::Enum, holds_types)?;
        for enumerator in enumerators {
            self.declare(id, enumerator, NodeKind::Enumerator, |k| {
                matches!(k, NodeKind::Enum)
            })?;
        }
        Ok(id)
    }

    /// Declares a typedef.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` cannot hold type declarations.
    pub fn typedef(&mut self, scope: NodeId, name: &str, base: NodeId) -> Result<NodeId, AstError> {
        self.declare(
            scope,
            name,
            NodeKind::Typedef(TypedefDef { base }),
            holds_types,
        )
    }

    /// Declares a constant.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a module or interface.
    pub fn constant(
        &mut self,
        scope: NodeId,
        name: &str,
        const_type: NodeId,
        value: ExprValue,
    ) -> Result<NodeId, AstError> {
        self.declare(
            scope,
            name,
            NodeKind::Constant(ConstantDef { const_type, value }),
            |k| k.is_unit(),
        )
    }

    /// Adds a member to a struct or exception.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a struct or exception.
    pub fn field(&mut self, scope: NodeId, name: &str, field_type: NodeId) -> Result<NodeId, AstError> {
        self.declare(
            scope,
            name,
            NodeKind::Field(FieldDef { field_type }),
            |k| matches!(k, NodeKind::Struct | NodeKind::Exception),
        )
    }

    /// Declares an attribute.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not an interface.
    pub fn attribute(
        &mut self,
        scope: NodeId,
        name: &str,
        field_type: NodeId,
        readonly: bool,
    ) -> Result<NodeId, AstError> {
        self.declare(
            scope,
            name,
            NodeKind::Attribute(AttributeDef {
                readonly,
                field_type,
            }),
            |k| matches!(k, NodeKind::Interface(_)),
        )
    }

    /// Declares an operation.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not an interface.
    pub fn operation(
        &mut self,
        scope: NodeId,
        name: &str,
        def: OperationDef,
    ) -> Result<NodeId, AstError> {
        self.declare(scope, name, NodeKind::Operation(def), |k| {
            matches!(k, NodeKind::Interface(_))
        })
    }

    /// Adds a parameter to an operation.
    ///
    /// # Errors
    /// Returns `AstError` if `operation` is not an operation.
    pub fn argument(
        &mut self,
        operation: NodeId,
        name: &str,
        direction: ParamDirection,
        field_type: NodeId,
    ) -> Result<NodeId, AstError> {
        self.declare(
            operation,
            name,
            NodeKind::Argument(ArgumentDef {
                direction,
                field_type,
            }),
            |k| matches!(k, NodeKind::Operation(_)),
        )
    }

    /// Creates an anonymous array type in `scope`.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a scope.
    pub fn array(
        &mut self,
        scope: NodeId,
        dims: Vec<ExprValue>,
        element: NodeId,
    ) -> Result<NodeId, AstError> {
        self.anonymous(scope, NodeKind::Array(ArrayDef { dims, element }))
    }

    /// Creates an anonymous sequence type in `scope`.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a scope.
    pub fn sequence(
        &mut self,
        scope: NodeId,
        element: NodeId,
        bound: Option<ExprValue>,
    ) -> Result<NodeId, AstError> {
        self.anonymous(scope, NodeKind::Sequence(SequenceDef { element, bound }))
    }

    /// Creates an anonymous string type in `scope`.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a scope.
    pub fn string(
        &mut self,
        scope: NodeId,
        bound: Option<ExprValue>,
        wide: bool,
    ) -> Result<NodeId, AstError> {
        self.anonymous(scope, NodeKind::String(StringDef { bound, wide }))
    }

    /// Creates an anonymous fixed-point type in `scope`.
    ///
    /// # Errors
    /// Returns `AstError` if `scope` is not a scope.
    pub fn fixed(&mut self, scope: NodeId, digits: u16, scale: u16) -> Result<NodeId, AstError> {
        self.anonymous(scope, NodeKind::Fixed(FixedDef { digits, scale }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn scope_kind(&self, scope: NodeId) -> Result<&NodeKind, AstError> {
        self.nodes
            .get(scope.index())
            .map(|n| &n.kind)
            .ok_or(AstError::UnknownNode { node: scope })
    }

    fn declare(
        &mut self,
        scope: NodeId,
        name: &str,
        kind: NodeKind,
        allowed: fn(&NodeKind) -> bool,
    ) -> Result<NodeId, AstError> {
        let scope_kind = self.scope_kind(scope)?;
        if !scope_kind.is_scope() {
            return Err(AstError::NotAScope {
                node: scope,
                kind: scope_kind.name(),
            });
        }
        if !allowed(scope_kind) {
            return Err(AstError::misplaced(kind.name(), scope, scope_kind.name()));
        }
        if name.is_empty() {
            return Err(AstError::EmptyName {
                kind: kind.name(),
                scope,
            });
        }
        let id = self.push(Node::new(name, Some(scope), kind));
        self.nodes[scope.index()].decls.push(id);
        Ok(id)
    }

    fn anonymous(&mut self, scope: NodeId, kind: NodeKind) -> Result<NodeId, AstError> {
        let scope_kind = self.scope_kind(scope)?;
        if !scope_kind.is_scope() {
            return Err(AstError::NotAScope {
                node: scope,
                kind: scope_kind.name(),
            });
        }
        let id = self.push(Node::new("", Some(scope), kind));
        self.nodes[scope.index()].anonymous.push(id);
        Ok(id)
    }
}

fn holds_types(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Module
            | NodeKind::Interface(_)
            | NodeKind::Struct
            | NodeKind::Exception
            | NodeKind::Union(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_is_cached() {
        let mut b = AstBuilder::new();
        let a = b.primitive(PrimitiveType::Long);
        let c = b.primitive(PrimitiveType::Long);
        let d = b.primitive(PrimitiveType::Short);
        assert_eq!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_declarations_keep_source_order() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let s = b.structure(root, "Point").unwrap();
        let x = b.field(s, "x", long).unwrap();
        let y = b.field(s, "y", long).unwrap();
        let ast = b.finish();
        assert_eq!(ast.decls(s), &[x, y]);
        assert_eq!(ast.decls(root), &[s]);
    }

    #[test]
    fn test_enumerators_are_children() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let e = b.enumeration(root, "Color", &["Red", "Green"]).unwrap();
        let ast = b.finish();
        let names: Vec<_> = ast.decls(e).iter().map(|&id| ast.name(id)).collect();
        assert_eq!(names, vec!["Red", "Green"]);
        assert!(matches!(ast.kind(ast.decls(e)[0]), NodeKind::Enumerator));
    }

    #[test]
    fn test_field_outside_struct_is_rejected() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let err = b.field(root, "x", long).unwrap_err();
        assert!(matches!(err, AstError::MisplacedDeclaration { .. }));
    }

    #[test]
    fn test_declaring_into_non_scope_is_rejected() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let t = b.typedef(root, "T", long).unwrap();
        let err = b.structure(t, "S").unwrap_err();
        assert_eq!(
            err,
            AstError::NotAScope {
                node: t,
                kind: "typedef"
            }
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let err = b.module(root, "").unwrap_err();
        assert!(matches!(err, AstError::EmptyName { kind: "module", .. }));
    }

    #[test]
    fn test_unknown_scope_is_rejected() {
        let mut b = AstBuilder::new();
        let err = b.module(NodeId::new(99), "M").unwrap_err();
        assert_eq!(
            err,
            AstError::UnknownNode {
                node: NodeId::new(99)
            }
        );
    }

    #[test]
    fn test_operation_and_arguments() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "M").unwrap();
        let i = b.interface(m, "Calc", Vec::new()).unwrap();
        let long = b.primitive(PrimitiveType::Long);
        let op = b
            .operation(
                i,
                "add",
                OperationDef {
                    return_type: Some(long),
                    ..OperationDef::default()
                },
            )
            .unwrap();
        let a = b.argument(op, "a", ParamDirection::In, long).unwrap();
        let ast = b.finish();
        assert_eq!(ast.decls(op), &[a]);
        assert_eq!(ast.kind(op).type_ref(), Some(long));
    }
}
