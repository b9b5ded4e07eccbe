//! Declaration nodes.
//!
//! Nodes live in the [`Ast`](crate::Ast) arena and refer to each other by
//! [`NodeId`]. A reference is never ownership: a field's type may be
//! declared before, after, or in another scope than the field itself.

use crate::expr::ExprValue;
use crate::types::{ParamDirection, PrimitiveType};
use std::fmt;

/// Stable identifier of a node within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an identifier from a raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declaration in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Name as written in IDL; empty for anonymous types.
    pub name: String,
    /// Defining scope; `None` only for the root.
    pub scope: Option<NodeId>,
    /// Kind-specific data.
    pub kind: NodeKind,
    /// Declarations contained in this scope, in source order.
    pub decls: Vec<NodeId>,
    /// Anonymous types defined in this scope, in creation order.
    pub anonymous: Vec<NodeId>,
}

impl Node {
    /// Creates a node with no children.
    #[must_use]
    pub fn new(name: impl Into<String>, scope: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            scope,
            kind,
            decls: Vec::new(),
            anonymous: Vec::new(),
        }
    }

    /// Returns true if the node has no IDL-level name.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

/// Node kind with its kind-specific children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `module` (and the root file scope).
    Module,
    /// `interface`.
    Interface(InterfaceDef),
    /// `struct`.
    Struct,
    /// `exception`.
    Exception,
    /// `union`.
    Union(UnionDef),
    /// One `case` of a union.
    Branch(BranchDef),
    /// `enum`.
    Enum,
    /// Member of an `enum`.
    Enumerator,
    /// `sequence<T>` or `sequence<T, N>`.
    Sequence(SequenceDef),
    /// `string`, `string<N>`, `wstring`, `wstring<N>`.
    String(StringDef),
    /// `fixed<D, S>`.
    Fixed(FixedDef),
    /// Array declarator.
    Array(ArrayDef),
    /// `typedef`.
    Typedef(TypedefDef),
    /// `const`.
    Constant(ConstantDef),
    /// `attribute` / `readonly attribute`.
    Attribute(AttributeDef),
    /// Operation of an interface.
    Operation(OperationDef),
    /// Operation parameter.
    Argument(ArgumentDef),
    /// Member of a struct or exception.
    Field(FieldDef),
    /// Predefined type.
    Primitive(PrimitiveType),
}

impl NodeKind {
    /// Returns a short lowercase name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Interface(_) => "interface",
            Self::Struct => "struct",
            Self::Exception => "exception",
            Self::Union(_) => "union",
            Self::Branch(_) => "union branch",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::Sequence(_) => "sequence",
            Self::String(_) => "string",
            Self::Fixed(_) => "fixed",
            Self::Array(_) => "array",
            Self::Typedef(_) => "typedef",
            Self::Constant(_) => "constant",
            Self::Attribute(_) => "attribute",
            Self::Operation(_) => "operation",
            Self::Argument(_) => "argument",
            Self::Field(_) => "field",
            Self::Primitive(_) => "primitive",
        }
    }

    /// Returns true if nodes of this kind hold declarations.
    #[must_use]
    pub const fn is_scope(&self) -> bool {
        matches!(
            self,
            Self::Module
                | Self::Interface(_)
                | Self::Struct
                | Self::Exception
                | Self::Union(_)
                | Self::Enum
                | Self::Operation(_)
        )
    }

    /// Returns true if this kind maps to its own Ada package.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Module | Self::Interface(_))
    }

    /// Returns true if a type reference may point at this kind.
    #[must_use]
    pub const fn is_type(&self) -> bool {
        matches!(
            self,
            Self::Interface(_)
                | Self::Struct
                | Self::Exception
                | Self::Union(_)
                | Self::Enum
                | Self::Sequence(_)
                | Self::String(_)
                | Self::Fixed(_)
                | Self::Array(_)
                | Self::Typedef(_)
                | Self::Primitive(_)
        )
    }

    /// Returns the type this declaration is typed by, if any.
    ///
    /// This is the reference an anonymous type is owned through: a field's
    /// type, an argument's type, a branch's type, an attribute's type, an
    /// operation's return type, or a typedef's base type.
    #[must_use]
    pub fn type_ref(&self) -> Option<NodeId> {
        match self {
            Self::Field(f) => Some(f.field_type),
            Self::Argument(a) => Some(a.field_type),
            Self::Branch(b) => Some(b.field_type),
            Self::Attribute(a) => Some(a.field_type),
            Self::Operation(o) => o.return_type,
            Self::Typedef(t) => Some(t.base),
            _ => None,
        }
    }

    /// Returns the element type of a constructed template type.
    #[must_use]
    pub fn element_type(&self) -> Option<NodeId> {
        match self {
            Self::Array(a) => Some(a.element),
            Self::Sequence(s) => Some(s.element),
            _ => None,
        }
    }
}

/// Interface data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceDef {
    /// Inherited interfaces, in declaration order.
    pub bases: Vec<NodeId>,
}

/// Union data.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDef {
    /// Discriminant type.
    pub discriminant: NodeId,
}

/// Label of a union branch.
#[derive(Debug, Clone, PartialEq)]
pub enum UnionLabel {
    /// `case <value>:`.
    Value(ExprValue),
    /// `default:`.
    Default,
}

/// Union branch data.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchDef {
    /// Case labels selecting this branch.
    pub labels: Vec<UnionLabel>,
    /// Type of the branch member.
    pub field_type: NodeId,
}

impl BranchDef {
    /// Returns true if this branch carries the `default` label.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.labels.iter().any(|l| matches!(l, UnionLabel::Default))
    }
}

/// Sequence data.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDef {
    /// Element type.
    pub element: NodeId,
    /// Maximum length for bounded sequences.
    pub bound: Option<ExprValue>,
}

/// String data.
#[derive(Debug, Clone, PartialEq)]
pub struct StringDef {
    /// Maximum length for bounded strings.
    pub bound: Option<ExprValue>,
    /// `wstring` rather than `string`.
    pub wide: bool,
}

/// Fixed-point data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDef {
    /// Total number of decimal digits.
    pub digits: u16,
    /// Digits after the decimal point.
    pub scale: u16,
}

/// Array data.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDef {
    /// Bound of each dimension, outermost first.
    pub dims: Vec<ExprValue>,
    /// Element type.
    pub element: NodeId,
}

/// Typedef data.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDef {
    /// Aliased type.
    pub base: NodeId,
}

/// Constant data.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDef {
    /// Declared type.
    pub const_type: NodeId,
    /// Folded value.
    pub value: ExprValue,
}

/// Attribute data.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    /// `readonly attribute`.
    pub readonly: bool,
    /// Attribute type.
    pub field_type: NodeId,
}

/// Operation data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationDef {
    /// Return type; `None` for `void`.
    pub return_type: Option<NodeId>,
    /// `oneway` operation.
    pub oneway: bool,
    /// Exceptions listed in the `raises` clause.
    pub raises: Vec<NodeId>,
}

/// Operation parameter data.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDef {
    /// Parameter mode.
    pub direction: ParamDirection,
    /// Parameter type.
    pub field_type: NodeId,
}

/// Struct or exception member data.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Member type.
    pub field_type: NodeId,
}
