//! # IronIDL
//!
//! IDL to Ada back-end code generation.
//!
//! IronIDL turns an IDL syntax tree into the Ada compilation units a
//! CORBA-style object request broker needs: one package per module and
//! interface, marshalling packages, call descriptors, client stubs,
//! servant stubs and server skeletons.
//!
//! ## Features
//!
//! - **Arena syntax tree** - Declarations addressed by stable ids, built
//!   by a front end through a checked builder
//! - **Dependency-ordered output** - Referenced types are declared before
//!   use, each exactly once
//! - **Precise imports** - Every artifact carries exactly the `with`
//!   clauses it needs
//! - **Fixed-size fast paths** - Arrays of fixed-size elements size in
//!   closed form
//!
//! ## Quick Start
//!
//! ```
//! use ironidl::prelude::*;
//!
//! let mut b = AstBuilder::new();
//! let root = b.root();
//! let bank = b.module(root, "Bank").unwrap();
//! let long = b.primitive(PrimitiveType::Long);
//! let posting = b.structure(bank, "Posting").unwrap();
//! b.field(posting, "amount", long).unwrap();
//! let ast = b.finish();
//!
//! let code = ironidl::generate(&ast, &GeneratorConfig::new()).unwrap();
//! let spec = code.unit("Bank").unwrap().artifact(ArtifactKind::Spec).unwrap();
//! assert_eq!(spec.file_name(), "bank.ads");
//! assert!(spec.text().contains("type Posting is record"));
//! ```
//!
//! ## Crate Organization
//!
//! - [`ast`] - Syntax tree, builder and constant expressions
//! - [`codegen`] - Ada emission engine and generation driver

pub mod prelude;

/// Syntax tree types and builder.
pub mod ast {
    pub use ironidl_ast::*;
}

/// Ada code generation.
pub mod codegen {
    pub use ironidl_codegen::*;
}

// Re-export commonly used items at the crate root
pub use ironidl_ast::{Ast, AstBuilder, AstError, NodeId, NodeKind};
pub use ironidl_codegen::{
    Artifact, ArtifactKind, CodegenError, GeneratedCode, Generator, GeneratorConfig, generate,
};
