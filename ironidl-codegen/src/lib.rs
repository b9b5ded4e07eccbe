//! # IronIDL Codegen
//!
//! Ada code generation from IDL syntax trees.
//!
//! This crate provides:
//! - Ada package, body and marshalling unit generation
//! - Client stubs, call descriptors, servant stubs and skeletons for
//!   interfaces
//! - Name resolution with reserved-word escaping and anonymous type naming
//! - Per-artifact dependency tracking driving `with` clauses

pub mod ada;
pub mod config;
pub mod deps;
pub mod error;
pub mod expr;
pub mod generator;
pub mod names;
pub mod state;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use ada::Emitter;
pub use config::{GeneratorConfig, RuntimeNames};
pub use deps::DepList;
pub use error::CodegenError;
pub use generator::{Artifact, ArtifactKind, GeneratedCode, Generator, UnitOutput};

use ironidl_ast::Ast;

/// Generates every Ada artifact for a syntax tree.
///
/// # Arguments
/// * `ast` - Tree produced by the front end
/// * `config` - Generation settings
///
/// # Returns
/// The generated units, in pre-order.
///
/// # Errors
/// Returns `CodegenError` if any declaration cannot be emitted.
pub fn generate(ast: &Ast, config: &GeneratorConfig) -> Result<GeneratedCode, CodegenError> {
    Generator::new(ast, config).generate()
}
