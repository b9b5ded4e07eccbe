//! # IronIDL AST
//!
//! Arena-backed IDL syntax tree consumed by the IronIDL code generator.
//!
//! This crate provides:
//! - Declaration nodes addressed by stable [`NodeId`]s
//! - Non-owning type references between nodes
//! - Folded constant expressions
//! - A builder a front end drives to produce an immutable [`Ast`]

pub mod ast;
pub mod builder;
pub mod error;
pub mod expr;
pub mod node;
pub mod types;

pub use ast::Ast;
pub use builder::AstBuilder;
pub use error::AstError;
pub use expr::{ExprKind, ExprValue};
pub use node::{
    ArgumentDef, ArrayDef, AttributeDef, BranchDef, ConstantDef, FieldDef, FixedDef,
    InterfaceDef, Node, NodeId, NodeKind, OperationDef, SequenceDef, StringDef, TypedefDef,
    UnionDef, UnionLabel,
};
pub use types::{ParamDirection, PrimitiveType};
