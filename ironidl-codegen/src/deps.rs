//! Dependency tracking for one generated artifact.

use ironidl_ast::{Ast, NodeId};

/// Declarations and packages an artifact references externally.
///
/// Every list keeps first-recorded order and ignores repeats, so the
/// `with` clauses it drives are deterministic.
#[derive(Debug, Clone)]
pub struct DepList {
    unit: NodeId,
    imported: Vec<NodeId>,
    marshal: Vec<NodeId>,
    runtime: Vec<RuntimeImport>,
}

/// A runtime package an artifact depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeImport {
    /// Package name.
    pub package: String,
    /// Whether the package is also made directly visible.
    pub use_clause: bool,
}

impl DepList {
    /// Creates an empty list for an artifact of `unit`.
    #[must_use]
    pub fn new(unit: NodeId) -> Self {
        Self {
            unit,
            imported: Vec::new(),
            marshal: Vec::new(),
            runtime: Vec::new(),
        }
    }

    /// Returns the unit the artifact belongs to.
    #[must_use]
    pub const fn unit(&self) -> NodeId {
        self.unit
    }

    /// Records a declaration as available externally.
    ///
    /// Returns true if it was not recorded before.
    pub fn record(&mut self, node: NodeId) -> bool {
        push_unique(&mut self.imported, node)
    }

    /// Records a declaration's marshalling as available externally.
    ///
    /// Returns true if it was not recorded before.
    pub fn record_marshal(&mut self, node: NodeId) -> bool {
        push_unique(&mut self.marshal, node)
    }

    /// Requires a runtime package.
    pub fn require_runtime(&mut self, package: impl Into<String>) {
        self.add_runtime(package.into(), false);
    }

    /// Requires a runtime package and makes its declarations visible.
    pub fn use_runtime(&mut self, package: impl Into<String>) {
        self.add_runtime(package.into(), true);
    }

    fn add_runtime(&mut self, package: String, use_clause: bool) {
        match self.runtime.iter_mut().find(|r| r.package == package) {
            Some(existing) => existing.use_clause |= use_clause,
            None => self.runtime.push(RuntimeImport {
                package,
                use_clause,
            }),
        }
    }

    /// Returns true if the node's declaration is reachable through a
    /// recorded import.
    ///
    /// A node is imported if it, one of its enclosing scopes outside this
    /// artifact's own unit, or its declaring package has been recorded.
    #[must_use]
    pub fn is_imported(&self, ast: &Ast, node: NodeId) -> bool {
        self.reaches(ast, node, &self.imported)
    }

    /// Returns true if the node's marshalling is reachable through a
    /// recorded import.
    #[must_use]
    pub fn is_marshal_imported(&self, ast: &Ast, node: NodeId) -> bool {
        self.reaches(ast, node, &self.marshal)
    }

    fn reaches(&self, ast: &Ast, node: NodeId, list: &[NodeId]) -> bool {
        if list.is_empty() {
            return false;
        }
        let package = ast.package_of(node);
        if package != self.unit && list.contains(&package) {
            return true;
        }
        let own: Vec<NodeId> = std::iter::once(self.unit)
            .chain(ast.ancestors(self.unit))
            .collect();
        std::iter::once(node)
            .chain(ast.ancestors(node))
            .take_while(|scope| !own.contains(scope))
            .any(|scope| list.contains(&scope))
    }

    /// Returns the recorded declarations, in order.
    #[must_use]
    pub fn imports(&self) -> &[NodeId] {
        &self.imported
    }

    /// Returns the recorded marshalling imports, in order.
    #[must_use]
    pub fn marshal_imports(&self) -> &[NodeId] {
        &self.marshal
    }

    /// Returns the required runtime packages, in order.
    #[must_use]
    pub fn runtime(&self) -> &[RuntimeImport] {
        &self.runtime
    }
}

fn push_unique(list: &mut Vec<NodeId>, node: NodeId) -> bool {
    if list.contains(&node) {
        false
    } else {
        list.push(node);
        true
    }
}
