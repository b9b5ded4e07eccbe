//! Ada code emission.
//!
//! [`Emitter`] dispatches on the node kind and produces, per declaration:
//! - the type or interface declaration
//! - the marshalling declarations and bodies (`Marshall`, `UnMarshall`,
//!   `Align_Size`)
//! - client, proxy, implementation and skeleton subprograms for
//!   attributes and operations
//!
//! Referenced types go through [`Emitter::dump_name`] and
//! [`Emitter::marshal_name`], which either name an imported entity or
//! hoist the missing declaration into the caller's `previous` segment.

mod arrays;
mod constants;
mod enums;
mod interfaces;
mod operations;
mod records;
mod sequences;
mod typedefs;

pub use arrays::{Loop, MarshalPlan, Traversal};
pub use operations::{Param, Subprogram};

use crate::config::{GeneratorConfig, RuntimeNames};
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::names::NameTable;
use crate::state::EmissionTable;
use crate::writer::CodeWriter;
use ironidl_ast::{Ast, ExprValue, NodeId, NodeKind};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Type emitter for the Ada target.
#[derive(Debug)]
pub struct Emitter<'a> {
    ast: &'a Ast,
    config: &'a GeneratorConfig,
    names: NameTable<'a>,
    state: EmissionTable,
    fixed: HashMap<NodeId, bool>,
    sizing: HashSet<NodeId>,
    declared: Vec<NodeId>,
}

impl<'a> Emitter<'a> {
    /// Creates an emitter for one generation pass over `ast`.
    #[must_use]
    pub fn new(ast: &'a Ast, config: &'a GeneratorConfig) -> Self {
        Self {
            ast,
            config,
            names: NameTable::new(ast, config),
            state: EmissionTable::new(),
            fixed: HashMap::new(),
            sizing: HashSet::new(),
            declared: Vec::new(),
        }
    }

    /// Returns the tree being emitted.
    #[must_use]
    pub const fn ast(&self) -> &'a Ast {
        self.ast
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    /// Returns the emission state.
    #[must_use]
    pub const fn state(&self) -> &EmissionTable {
        &self.state
    }

    /// Returns the types declared since the last call, in declaration
    /// order.
    pub fn take_declared(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.declared)
    }

    /// Returns a writer positioned inside a package.
    #[must_use]
    pub fn writer(&self) -> CodeWriter {
        CodeWriter::at_depth(self.config.indent(), 1)
    }

    /// Returns the node's local Ada name.
    ///
    /// # Errors
    /// Returns `CodegenError` if the name cannot be resolved.
    pub fn local_name(&mut self, node: NodeId) -> Result<String, CodegenError> {
        self.names.local_name(node)
    }

    /// Returns the node's package-qualified Ada name.
    ///
    /// # Errors
    /// Returns `CodegenError` if the name cannot be resolved.
    pub fn full_name(&mut self, node: NodeId) -> Result<String, CodegenError> {
        self.names.full_name(node)
    }

    /// Names a type for use in the artifact `deps` describes.
    ///
    /// An imported type is named in full and nothing is emitted. Otherwise
    /// the type's declaration is produced into `previous` unless it
    /// already exists, and the local name is returned.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is not a type or its declaration
    /// fails.
    pub fn dump_name(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        previous: &mut String,
    ) -> Result<String, CodegenError> {
        self.expect_type(node)?;
        if self.is_external(node, deps) {
            self.state.mark_imported(node);
            return self.type_name(node, true);
        }
        if !self.state.is_defined(node) && !self.state.in_progress(node) {
            trace!(node = %node, "hoisting declaration");
            let mut tmp = self.writer();
            self.produce_declaration(node, deps, &mut tmp, previous)?;
            previous.push_str(&tmp.finish());
        }
        self.type_name(node, false)
    }

    /// Names a type for use in marshalling code.
    ///
    /// Same protocol as [`dump_name`](Self::dump_name), tracking
    /// marshalling bodies instead of declarations.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is not a type or its marshalling
    /// body fails.
    pub fn marshal_name(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        previous: &mut String,
    ) -> Result<String, CodegenError> {
        self.expect_type(node)?;
        if self.is_marshal_external(node, deps) {
            self.state.mark_marshal_imported(node);
            return self.type_name(node, true);
        }
        if !self.state.is_marshal_defined(node) && !self.state.in_progress(node) {
            trace!(node = %node, "hoisting marshalling body");
            let mut tmp = self.writer();
            self.produce_marshal_body(node, deps, &mut tmp, previous)?;
            previous.push_str(&tmp.finish());
        }
        self.type_name(node, false)
    }

    /// Produces the declaration of `node` into `w`.
    ///
    /// A node is declared at most once per pass; later calls emit nothing.
    ///
    /// # Errors
    /// Returns `CodegenError` if the node cannot be declared.
    pub fn produce_declaration(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        if self.state.is_defined(node) || !self.state.begin(node) {
            return Ok(());
        }
        let result = self.dispatch_declaration(node, deps, w, previous);
        self.state.end(node);
        result?;
        self.state.mark_defined(node);
        let kind = self.ast.kind(node);
        if kind.is_type() && !matches!(kind, NodeKind::Primitive(_)) {
            self.declared.push(node);
        }
        Ok(())
    }

    fn dispatch_declaration(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let ast = self.ast;
        let kind = ast.kind(node);
        debug!(node = %node, kind = kind.name(), name = ast.name(node), "producing declaration");
        match kind {
            NodeKind::Array(def) => self.declare_array(node, def, deps, w, previous),
            NodeKind::Struct => self.declare_struct(node, deps, w, previous),
            NodeKind::Exception => self.declare_exception(node, deps, w, previous),
            NodeKind::Union(def) => self.declare_union(node, def, deps, w, previous),
            NodeKind::Enum => self.declare_enum(node, deps, w),
            NodeKind::Sequence(def) => self.declare_sequence(node, def, deps, w, previous),
            NodeKind::String(def) => self.declare_string(node, def, deps, w),
            NodeKind::Fixed(def) => self.declare_fixed(node, *def, deps, w),
            NodeKind::Typedef(def) => self.declare_typedef(node, def, deps, w, previous),
            NodeKind::Constant(def) => self.declare_constant(node, def, deps, w, previous),
            NodeKind::Interface(def) => self.declare_interface(node, def, deps, w, previous),
            NodeKind::Attribute(_) | NodeKind::Operation(_) => {
                self.declare_client(node, deps, w, previous)
            }
            NodeKind::Module | NodeKind::Primitive(_) => Ok(()),
            NodeKind::Branch(_)
            | NodeKind::Enumerator
            | NodeKind::Argument(_)
            | NodeKind::Field(_) => Err(CodegenError::narrow(node, "declaration", kind.name())),
        }
    }

    /// Produces the marshalling declarations of a type into `w`.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is a member rather than a
    /// declaration.
    pub fn produce_marshal_decl(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let kind = self.ast.kind(node);
        match kind {
            NodeKind::Array(_)
            | NodeKind::Struct
            | NodeKind::Exception
            | NodeKind::Union(_)
            | NodeKind::Enum
            | NodeKind::Sequence(_)
            | NodeKind::String(_)
            | NodeKind::Fixed(_)
            | NodeKind::Typedef(_)
            | NodeKind::Interface(_) => {
                let ty = self.type_name(node, false)?;
                self.stream_runtime(deps);
                for profile in self.marshal_profiles(&ty) {
                    w.line(format!("{profile} ;"));
                }
                w.blank();
                Ok(())
            }
            NodeKind::Module
            | NodeKind::Constant(_)
            | NodeKind::Attribute(_)
            | NodeKind::Operation(_)
            | NodeKind::Primitive(_) => Ok(()),
            NodeKind::Branch(_)
            | NodeKind::Enumerator
            | NodeKind::Argument(_)
            | NodeKind::Field(_) => Err(CodegenError::narrow(node, "declaration", kind.name())),
        }
    }

    /// Produces the marshalling bodies of a type into `w`.
    ///
    /// # Errors
    /// Returns `CodegenError` if the bodies cannot be produced.
    pub fn produce_marshal_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        if self.state.is_marshal_defined(node) || !self.state.begin(node) {
            return Ok(());
        }
        let result = self.dispatch_marshal_body(node, deps, w, previous);
        self.state.end(node);
        result?;
        self.state.mark_marshal_defined(node);
        Ok(())
    }

    fn dispatch_marshal_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let ast = self.ast;
        let kind = ast.kind(node);
        debug!(node = %node, kind = kind.name(), "producing marshalling body");
        match kind {
            NodeKind::Array(def) => self.marshal_array(node, def, deps, w, previous),
            NodeKind::Struct | NodeKind::Exception => self.marshal_record(node, deps, w, previous),
            NodeKind::Union(def) => self.marshal_union(node, def, deps, w, previous),
            NodeKind::Enum => self.marshal_enum(node, deps, w),
            NodeKind::Sequence(def) => self.marshal_sequence(node, def, deps, w, previous),
            NodeKind::String(def) => self.marshal_string(node, def, deps, w),
            NodeKind::Fixed(_) => self.marshal_fixed(node, deps, w),
            NodeKind::Typedef(def) => self.marshal_typedef(node, def, deps, w, previous),
            NodeKind::Interface(_) => self.marshal_interface(node, deps, w),
            NodeKind::Module
            | NodeKind::Constant(_)
            | NodeKind::Attribute(_)
            | NodeKind::Operation(_)
            | NodeKind::Primitive(_) => Ok(()),
            NodeKind::Branch(_)
            | NodeKind::Enumerator
            | NodeKind::Argument(_)
            | NodeKind::Field(_) => Err(CodegenError::narrow(node, "declaration", kind.name())),
        }
    }

    /// Produces the package body part of a declaration into `w`.
    ///
    /// # Errors
    /// Returns `CodegenError` if the body cannot be produced.
    pub fn produce_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let kind = self.ast.kind(node);
        match kind {
            NodeKind::Exception => self.exception_body(node, deps, w),
            NodeKind::Interface(_) => self.interface_body(node, deps, w),
            NodeKind::Attribute(_) | NodeKind::Operation(_) => {
                self.client_body(node, deps, w, previous)
            }
            NodeKind::Module
            | NodeKind::Struct
            | NodeKind::Union(_)
            | NodeKind::Enum
            | NodeKind::Sequence(_)
            | NodeKind::String(_)
            | NodeKind::Fixed(_)
            | NodeKind::Array(_)
            | NodeKind::Typedef(_)
            | NodeKind::Constant(_)
            | NodeKind::Primitive(_) => Ok(()),
            NodeKind::Branch(_)
            | NodeKind::Enumerator
            | NodeKind::Argument(_)
            | NodeKind::Field(_) => Err(CodegenError::narrow(node, "declaration", kind.name())),
        }
    }

    /// Returns true if values of the type always marshal to the same size.
    ///
    /// Computed recursively through arrays, typedefs and records, and
    /// cached. Unions are never fixed.
    ///
    /// # Errors
    /// Returns `CodegenError::Narrow` if `node` is not a type.
    pub fn has_fixed_size(&mut self, node: NodeId) -> Result<bool, CodegenError> {
        if let Some(&fixed) = self.fixed.get(&node) {
            return Ok(fixed);
        }
        if !self.sizing.insert(node) {
            // A type reached through itself cannot have a static size.
            return Ok(false);
        }
        let result = self.compute_fixed_size(node);
        self.sizing.remove(&node);
        let fixed = result?;
        self.fixed.insert(node, fixed);
        Ok(fixed)
    }

    fn compute_fixed_size(&mut self, node: NodeId) -> Result<bool, CodegenError> {
        let ast = self.ast;
        let kind = ast.kind(node);
        match kind {
            NodeKind::Primitive(prim) => Ok(prim.is_fixed_size()),
            NodeKind::Enum | NodeKind::Fixed(_) => Ok(true),
            // The active branch decides a union's size.
            NodeKind::Sequence(_)
            | NodeKind::String(_)
            | NodeKind::Interface(_)
            | NodeKind::Union(_) => Ok(false),
            NodeKind::Array(def) => self.has_fixed_size(def.element),
            NodeKind::Typedef(def) => self.has_fixed_size(def.base),
            NodeKind::Struct | NodeKind::Exception => {
                for &decl in ast.decls(node) {
                    if let NodeKind::Field(field) = ast.kind(decl) {
                        if !self.has_fixed_size(field.field_type)? {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }
            NodeKind::Module
            | NodeKind::Constant(_)
            | NodeKind::Attribute(_)
            | NodeKind::Operation(_)
            | NodeKind::Argument(_)
            | NodeKind::Field(_)
            | NodeKind::Branch(_)
            | NodeKind::Enumerator => Err(CodegenError::narrow(node, "type", kind.name())),
        }
    }

    /// Fails unless `node` is a type.
    #[track_caller]
    pub(crate) fn expect_type(&self, node: NodeId) -> Result<(), CodegenError> {
        let kind = self.ast.kind(node);
        if kind.is_type() {
            Ok(())
        } else {
            Err(CodegenError::narrow(node, "type", kind.name()))
        }
    }

    /// Decides whether a referenced declaration comes from elsewhere,
    /// recording the package that provides it.
    fn is_external(&mut self, node: NodeId, deps: &mut DepList) -> bool {
        let ast = self.ast;
        match ast.kind(node) {
            NodeKind::Primitive(prim) => {
                deps.require_runtime(RuntimeNames::package_of(prim.ada_type()));
                return true;
            }
            NodeKind::String(def) if def.bound.is_none() => {
                deps.require_runtime("Corba");
                return true;
            }
            _ => {}
        }
        if deps.is_imported(ast, node) {
            return true;
        }
        let package = ast.package_of(node);
        if package != deps.unit() {
            if deps.record(package) {
                trace!(node = %node, package = %package, "recorded import");
            }
            return true;
        }
        false
    }

    /// Decides whether a type's marshalling comes from elsewhere.
    fn is_marshal_external(&mut self, node: NodeId, deps: &mut DepList) -> bool {
        let ast = self.ast;
        match ast.kind(node) {
            NodeKind::Primitive(prim) => {
                deps.require_runtime(RuntimeNames::package_of(prim.ada_type()));
                self.stream_runtime(deps);
                return true;
            }
            NodeKind::String(def) if def.bound.is_none() => {
                deps.require_runtime("Corba");
                self.stream_runtime(deps);
                return true;
            }
            _ => {}
        }
        if deps.is_marshal_imported(ast, node) {
            return true;
        }
        let package = ast.package_of(node);
        if package != deps.unit() {
            deps.record(package);
            if deps.record_marshal(package) {
                trace!(node = %node, package = %package, "recorded marshalling import");
            }
            return true;
        }
        false
    }

    /// Returns the Ada type name a declaration is used through.
    fn type_name(&mut self, node: NodeId, qualified: bool) -> Result<String, CodegenError> {
        let name = if qualified {
            self.names.full_name(node)?
        } else {
            self.names.local_name(node)?
        };
        Ok(match self.ast.kind(node) {
            NodeKind::Interface(_) if qualified => format!("{name}.Ref"),
            NodeKind::Interface(_) => "Ref".to_string(),
            NodeKind::Exception => format!("{name}_Members"),
            _ => name,
        })
    }

    /// Requires the stream package and the size type's package.
    fn stream_runtime(&self, deps: &mut DepList) {
        let names = self.config.names();
        deps.use_runtime(names.stream_package.clone());
        deps.require_runtime(RuntimeNames::package_of(&names.size_type));
    }

    /// Returns the `Marshall`, `UnMarshall` and `Align_Size` profiles for
    /// type `ty`.
    pub(crate) fn marshal_profiles(&self, ty: &str) -> [String; 3] {
        let names = self.config.names();
        let stream = names.stream_class();
        let size = &names.size_type;
        [
            format!("procedure Marshall (A : in {ty} ; S : in out {stream})"),
            format!("procedure UnMarshall (A : out {ty} ; S : in out {stream})"),
            format!(
                "function Align_Size (A : in {ty} ; Initial_Offset : in {size} ; N : in {size} := 1) return {size}"
            ),
        ]
    }

    /// Renders a constant value as an Ada expression.
    pub(crate) fn literal(
        &mut self,
        value: &ExprValue,
        deps: &mut DepList,
    ) -> Result<String, CodegenError> {
        Ok(match value {
            ExprValue::Short(v) => v.to_string(),
            ExprValue::UnsignedShort(v) => v.to_string(),
            ExprValue::Long(v) => v.to_string(),
            ExprValue::UnsignedLong(v) => v.to_string(),
            ExprValue::LongLong(v) => v.to_string(),
            ExprValue::UnsignedLongLong(v) => v.to_string(),
            ExprValue::Octet(v) => v.to_string(),
            ExprValue::Float(v) => real_literal(f64::from(*v)),
            ExprValue::Double(v) => real_literal(*v),
            ExprValue::Boolean(v) => if *v { "True" } else { "False" }.to_string(),
            ExprValue::Char(c) => char_literal(*c, "Character"),
            ExprValue::WChar(c) => char_literal(*c, "Wide_Character"),
            ExprValue::String(s) => {
                deps.require_runtime("Corba");
                format!("Corba.To_Corba_String ({})", string_literal(s))
            }
            ExprValue::WString(s) => {
                deps.require_runtime("Corba");
                format!("Corba.To_Corba_Wide_String ({})", string_literal(s))
            }
            ExprValue::Enumerator(id) => {
                if self.is_external(*id, deps) {
                    self.names.full_name(*id)?
                } else {
                    self.names.local_name(*id)?
                }
            }
        })
    }
}

/// Writes `type N_Ptr` and its deallocation procedure.
pub(crate) fn access_type(deps: &mut DepList, w: &mut CodeWriter, name: &str) {
    deps.require_runtime("Ada.Unchecked_Deallocation");
    w.line(format!("type {name}_Ptr is access {name} ;"));
    w.line(format!(
        "procedure Free is new Ada.Unchecked_Deallocation ({name}, {name}_Ptr) ;"
    ));
}

/// Writes a subprogram body with its declarative part.
pub(crate) fn subprogram(
    w: &mut CodeWriter,
    profile: &str,
    name: &str,
    decls: &[String],
    body: impl FnOnce(&mut CodeWriter),
) {
    w.line(format!("{profile} is"));
    w.nest(|w| {
        for decl in decls {
            w.line(decl);
        }
    });
    w.line("begin");
    w.nest(body);
    w.line(format!("end {name} ;"));
    w.blank();
}

fn real_literal(value: f64) -> String {
    let text = format!("{value:?}");
    if text.contains('.') {
        return text;
    }
    match text.find('e') {
        Some(at) => format!("{}.0{}", &text[..at], &text[at..]),
        None => format!("{text}.0"),
    }
}

fn char_literal(c: char, type_name: &str) -> String {
    if c.is_ascii_graphic() || c == ' ' {
        format!("'{c}'")
    } else {
        format!("{type_name}'Val ({})", u32::from(c))
    }
}

fn string_literal(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
