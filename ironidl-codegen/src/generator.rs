//! Emission driver.
//!
//! Walks the compilation units of a tree in pre-order and assembles, per
//! unit, the Ada artifacts: package specification and body, marshalling
//! package, and for interfaces the proxies, implementation and skeleton
//! units.

use crate::ada::Emitter;
use crate::config::{GeneratorConfig, RuntimeNames};
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::{Ast, AstError, NodeId, NodeKind};
use tracing::{debug, info};

/// Kind of a generated Ada compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Package specification.
    Spec,
    /// Package body.
    Body,
    /// Marshalling package specification.
    MarshalSpec,
    /// Marshalling package body.
    MarshalBody,
    /// Call descriptor package specification.
    ProxiesSpec,
    /// Call descriptor package body.
    ProxiesBody,
    /// Servant package specification.
    ImplSpec,
    /// Servant package body.
    ImplBody,
    /// Server dispatch procedure.
    Skeleton,
}

impl ArtifactKind {
    /// Returns the child unit suffix, if the artifact is a child unit.
    #[must_use]
    pub const fn child(&self) -> Option<&'static str> {
        match self {
            Self::Spec | Self::Body => None,
            Self::MarshalSpec | Self::MarshalBody => Some("Marshal"),
            Self::ProxiesSpec | Self::ProxiesBody => Some("Proxies"),
            Self::ImplSpec | Self::ImplBody => Some("Impl"),
            Self::Skeleton => Some("Skeleton"),
        }
    }

    /// Returns true if the artifact is a body file.
    #[must_use]
    pub const fn is_body(&self) -> bool {
        matches!(
            self,
            Self::Body | Self::MarshalBody | Self::ProxiesBody | Self::ImplBody | Self::Skeleton
        )
    }

    /// Returns the Ada unit name of this artifact for package `unit`.
    #[must_use]
    pub fn unit_name(&self, unit: &str) -> String {
        match self.child() {
            Some(child) => format!("{unit}.{child}"),
            None => unit.to_string(),
        }
    }

    /// Returns the GNAT file name of this artifact for package `unit`.
    ///
    /// # Example
    /// ```
    /// use ironidl_codegen::ArtifactKind;
    ///
    /// assert_eq!(ArtifactKind::MarshalBody.file_name("Bank.Account"), "bank-account-marshal.adb");
    /// ```
    #[must_use]
    pub fn file_name(&self, unit: &str) -> String {
        let stem = self.unit_name(unit).to_ascii_lowercase().replace('.', "-");
        let extension = if self.is_body() { "adb" } else { "ads" };
        format!("{stem}.{extension}")
    }
}

/// One generated Ada source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    kind: ArtifactKind,
    unit_name: String,
    file_name: String,
    text: String,
}

impl Artifact {
    fn new(kind: ArtifactKind, unit: &str, text: String) -> Self {
        Self {
            kind,
            unit_name: kind.unit_name(unit),
            file_name: kind.file_name(unit),
            text,
        }
    }

    /// Returns the artifact kind.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Returns the Ada unit name.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    /// Returns the file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The artifacts generated for one module, interface, or the root package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutput {
    node: NodeId,
    name: String,
    artifacts: Vec<Artifact>,
}

impl UnitOutput {
    /// Returns the unit's node.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the unit's full Ada name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the artifacts, in generation order.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns the artifact of the given kind, if it was generated.
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

/// Result of a generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode {
    units: Vec<UnitOutput>,
}

impl GeneratedCode {
    /// Returns the units, in pre-order.
    #[must_use]
    pub fn units(&self) -> &[UnitOutput] {
        &self.units
    }

    /// Returns the unit with the given full name.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&UnitOutput> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Iterates over every artifact of every unit.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.units.iter().flat_map(|u| u.artifacts.iter())
    }
}

/// Emission driver for one pass over a tree.
pub struct Generator<'a> {
    ast: &'a Ast,
    config: &'a GeneratorConfig,
    emitter: Emitter<'a>,
}

impl<'a> Generator<'a> {
    /// Creates a generator for `ast`.
    #[must_use]
    pub fn new(ast: &'a Ast, config: &'a GeneratorConfig) -> Self {
        Self {
            ast,
            config,
            emitter: Emitter::new(ast, config),
        }
    }

    /// Generates every artifact of every unit.
    ///
    /// # Errors
    /// Returns `CodegenError::Ast` if a configured import is not a node of
    /// the tree, otherwise the first `CodegenError` raised; no partial
    /// output is returned.
    pub fn generate(mut self) -> Result<GeneratedCode, CodegenError> {
        if let Some(&node) = self
            .config
            .imports()
            .iter()
            .find(|&&node| self.ast.get(node).is_none())
        {
            return Err(AstError::UnknownNode { node }.into());
        }
        let units = self.units();
        info!(units = units.len(), "generating Ada units");
        let mut code = GeneratedCode::default();
        for unit in units {
            let output = self.generate_unit(unit)?;
            if !output.artifacts.is_empty() {
                code.units.push(output);
            }
        }
        info!(
            units = code.units.len(),
            artifacts = code.artifacts().count(),
            "generation complete"
        );
        Ok(code)
    }

    /// Returns the root followed by every module and interface, in
    /// pre-order.
    fn units(&self) -> Vec<NodeId> {
        fn walk(ast: &Ast, scope: NodeId, out: &mut Vec<NodeId>) {
            out.push(scope);
            for &decl in ast.decls(scope) {
                if ast.kind(decl).is_unit() {
                    walk(ast, decl, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.ast, self.ast.root(), &mut out);
        out
    }

    /// Creates a dependency list for an artifact of `unit`, with the
    /// configured imports already recorded.
    fn deps(&self, unit: NodeId) -> DepList {
        let mut deps = DepList::new(unit);
        for &node in self.config.imports() {
            deps.record(node);
            deps.record_marshal(node);
        }
        deps
    }

    /// Returns the non-unit declarations of a unit that are not imported.
    fn members(&self, unit: NodeId, deps: &DepList) -> Vec<NodeId> {
        self.ast
            .decls(unit)
            .iter()
            .copied()
            .filter(|&d| !self.ast.kind(d).is_unit() && !deps.is_imported(self.ast, d))
            .collect()
    }

    fn generate_unit(&mut self, unit: NodeId) -> Result<UnitOutput, CodegenError> {
        let ast = self.ast;
        let name = self.emitter.full_name(unit)?;
        let is_interface = matches!(ast.kind(unit), NodeKind::Interface(_));
        debug!(unit = %name, kind = ast.kind(unit).name(), "generating unit");

        let mut artifacts = Vec::new();

        let mut deps = self.deps(unit);
        let mut text = String::new();
        if is_interface {
            self.declare(unit, &mut deps, &mut text)?;
        }
        for decl in self.members(unit, &deps) {
            self.declare(decl, &mut deps, &mut text)?;
        }
        let declared = self.emitter.take_declared();
        if unit != ast.root() || !text.is_empty() {
            artifacts.push(self.package(ArtifactKind::Spec, &name, &deps, &text, None)?);
        }

        let mut deps = self.deps(unit);
        let mut text = String::new();
        let mut bodies: Vec<NodeId> = Vec::new();
        if is_interface {
            bodies.push(unit);
        }
        bodies.extend(self.members(unit, &deps));
        for node in bodies {
            let mut previous = String::new();
            let mut w = self.emitter.writer();
            self.emitter
                .produce_body(node, &mut deps, &mut w, &mut previous)?;
            text.push_str(&previous);
            text.push_str(&w.finish());
        }
        if !text.is_empty() {
            artifacts.push(self.package(ArtifactKind::Body, &name, &deps, &text, None)?);
        }

        let mut deps = self.deps(unit);
        let mut w = self.emitter.writer();
        for &node in &declared {
            self.emitter.produce_marshal_decl(node, &mut deps, &mut w)?;
        }
        let text = w.finish();
        if !text.is_empty() {
            artifacts.push(self.package(ArtifactKind::MarshalSpec, &name, &deps, &text, None)?);
        }

        let mut deps = self.deps(unit);
        let mut text = String::new();
        for &node in &declared {
            let mut previous = String::new();
            let mut w = self.emitter.writer();
            self.emitter
                .produce_marshal_body(node, &mut deps, &mut w, &mut previous)?;
            text.push_str(&previous);
            text.push_str(&w.finish());
        }
        if !text.is_empty() {
            artifacts.push(self.package(ArtifactKind::MarshalBody, &name, &deps, &text, None)?);
        }

        if is_interface {
            self.interface_artifacts(unit, &name, &mut artifacts)?;
        }

        debug!(unit = %name, artifacts = artifacts.len(), "unit generated");
        Ok(UnitOutput {
            node: unit,
            name,
            artifacts,
        })
    }

    /// Declares a unit member, its nested types first, flushing hoisted
    /// prerequisites directly before it.
    fn declare(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        out: &mut String,
    ) -> Result<(), CodegenError> {
        let ast = self.ast;
        if matches!(
            ast.kind(node),
            NodeKind::Struct | NodeKind::Exception | NodeKind::Union(_)
        ) {
            for &nested in ast.decls(node) {
                if ast.kind(nested).is_type() {
                    self.declare(nested, deps, out)?;
                }
            }
        }
        let mut previous = String::new();
        let mut w = self.emitter.writer();
        self.emitter
            .produce_declaration(node, deps, &mut w, &mut previous)?;
        out.push_str(&previous);
        out.push_str(&w.finish());
        Ok(())
    }

    /// Generates the proxies, implementation and skeleton units of an
    /// interface.
    fn interface_artifacts(
        &mut self,
        unit: NodeId,
        name: &str,
        artifacts: &mut Vec<Artifact>,
    ) -> Result<(), CodegenError> {
        let ast = self.ast;
        let operations: Vec<NodeId> = ast
            .decls(unit)
            .iter()
            .copied()
            .filter(|&d| matches!(ast.kind(d), NodeKind::Attribute(_) | NodeKind::Operation(_)))
            .collect();

        if !operations.is_empty() {
            let mut deps = self.deps(unit);
            let mut previous = String::new();
            let mut w = self.emitter.writer();
            let mut private_part = self.emitter.writer();
            for &op in &operations {
                self.emitter.produce_proxy_decl(
                    op,
                    &mut deps,
                    &mut w,
                    &mut private_part,
                    &mut previous,
                )?;
            }
            let text = format!("{previous}{}", w.finish());
            let private_part = private_part.finish();
            artifacts.push(self.package(
                ArtifactKind::ProxiesSpec,
                name,
                &deps,
                &text,
                Some(&private_part),
            )?);

            let mut deps = self.deps(unit);
            let mut previous = String::new();
            let mut w = self.emitter.writer();
            for &op in &operations {
                self.emitter
                    .produce_proxy_body(op, &mut deps, &mut w, &mut previous)?;
            }
            let text = format!("{previous}{}", w.finish());
            artifacts.push(self.package(ArtifactKind::ProxiesBody, name, &deps, &text, None)?);
        }

        if self.config.implementation_enabled() {
            let mut deps = self.deps(unit);
            let parent = self.emitter.implementation_parent(unit, &mut deps)?;
            let mut previous = String::new();
            let mut w = self.emitter.writer();
            w.line(format!("type Object is new {parent} with private ;"));
            w.blank();
            for &op in &operations {
                self.emitter
                    .produce_impl_decl(op, &mut deps, &mut w, &mut previous)?;
            }
            let text = format!("{previous}{}", w.finish());
            let mut private_part = self.emitter.writer();
            private_part.line(format!("type Object is new {parent} with null record ;"));
            private_part.blank();
            let private_part = private_part.finish();
            artifacts.push(self.package(
                ArtifactKind::ImplSpec,
                name,
                &deps,
                &text,
                Some(&private_part),
            )?);

            if !operations.is_empty() {
                let mut deps = self.deps(unit);
                let mut previous = String::new();
                let mut w = self.emitter.writer();
                for &op in &operations {
                    self.emitter
                        .produce_impl_body(op, &mut deps, &mut w, &mut previous)?;
                }
                let text = format!("{previous}{}", w.finish());
                artifacts.push(self.package(ArtifactKind::ImplBody, name, &deps, &text, None)?);
            }
        }

        if self.config.skeletons_enabled() {
            artifacts.push(self.skeleton(name, &operations)?);
        }
        Ok(())
    }

    /// Builds the skeleton procedure of an interface.
    fn skeleton(&mut self, name: &str, operations: &[NodeId]) -> Result<Artifact, CodegenError> {
        let kind = ArtifactKind::Skeleton;
        let unit_name = kind.unit_name(name);
        let names = self.config.names();
        let mut w = CodeWriter::new(self.config.indent());
        w.line(format!("with {} ;", RuntimeNames::package_of(&names.giop_server)));
        w.line("with Corba ;");
        w.blank();
        w.line(format!(
            "procedure {unit_name} (Orl_Op : in Standard.String ; Orls : in out {} ; Orl_Response_Expected : in Corba.Boolean ; Returns : out Corba.Boolean) is",
            names.giop_server
        ));
        w.line("begin");
        w.nest(|w| -> Result<(), CodegenError> {
            for &op in operations {
                self.emitter.produce_skeleton_entry(op, w)?;
            }
            w.line("Returns := False ;");
            Ok(())
        })?;
        w.line(format!("end {unit_name} ;"));
        Ok(Artifact::new(kind, name, w.finish()))
    }

    /// Wraps declarations in a package or package body with its `with`
    /// clauses.
    fn package(
        &mut self,
        kind: ArtifactKind,
        unit: &str,
        deps: &DepList,
        text: &str,
        private_part: Option<&str>,
    ) -> Result<Artifact, CodegenError> {
        let unit_name = kind.unit_name(unit);
        let mut out = self.with_clauses(deps, unit, &unit_name)?;
        if !out.is_empty() {
            out.push('\n');
        }
        let keyword = if kind.is_body() { "package body" } else { "package" };
        out.push_str(&format!("{keyword} {unit_name} is\n\n"));
        out.push_str(text);
        if let Some(private_part) = private_part.filter(|p| !p.is_empty()) {
            out.push_str("private\n\n");
            out.push_str(private_part);
        }
        out.push_str(&format!("end {unit_name} ;\n"));
        Ok(Artifact::new(kind, unit, out))
    }

    /// Renders the `with` clauses an artifact's dependency list calls for.
    fn with_clauses(
        &mut self,
        deps: &DepList,
        unit: &str,
        unit_name: &str,
    ) -> Result<String, CodegenError> {
        let ast = self.ast;
        let mut seen: Vec<String> = vec![unit.to_string(), unit_name.to_string()];
        let mut out = String::new();

        for runtime in deps.runtime() {
            if seen.contains(&runtime.package) {
                continue;
            }
            seen.push(runtime.package.clone());
            if runtime.use_clause {
                out.push_str(&format!("with {0} ; use {0} ;\n", runtime.package));
            } else {
                out.push_str(&format!("with {} ;\n", runtime.package));
            }
        }
        for &node in deps.imports() {
            let package = self.emitter.full_name(ast.package_of(node))?;
            if seen.contains(&package) {
                continue;
            }
            out.push_str(&format!("with {package} ;\n"));
            seen.push(package);
        }
        for &node in deps.marshal_imports() {
            let owner = self.emitter.full_name(ast.package_of(node))?;
            let package = format!("{owner}.Marshal");
            if owner == unit || seen.contains(&package) {
                continue;
            }
            out.push_str(&format!("with {0} ; use {0} ;\n", package));
            seen.push(package);
        }
        Ok(out)
    }
}
