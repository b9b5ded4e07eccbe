//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.
//!
//! ```
//! use ironidl::prelude::*;
//! ```

// Tree types
pub use ironidl_ast::{
    Ast, AstBuilder, AstError, ExprValue, NodeId, NodeKind, OperationDef, ParamDirection,
    PrimitiveType, UnionLabel,
};

// Generation types
pub use ironidl_codegen::{
    Artifact, ArtifactKind, CodegenError, GeneratedCode, Generator, GeneratorConfig,
    RuntimeNames, UnitOutput,
};
