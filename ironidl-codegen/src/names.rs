//! Name resolution.
//!
//! Every declaration gets a local Ada identifier, unique within its Ada
//! namespace, and a full name qualified by the package that declares it.
//! Names are pure functions of a node's position: a namespace is assigned
//! in one go the first time any of its members is asked for, then cached.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use ironidl_ast::{Ast, NodeId, NodeKind};
use std::collections::{HashMap, HashSet};
use tracing::{trace, warn};

/// Ada 2005 reserved words.
const RESERVED: &[&str] = &[
    "abort",
    "abs",
    "abstract",
    "accept",
    "access",
    "aliased",
    "all",
    "and",
    "array",
    "at",
    "begin",
    "body",
    "case",
    "constant",
    "declare",
    "delay",
    "delta",
    "digits",
    "do",
    "else",
    "elsif",
    "end",
    "entry",
    "exception",
    "exit",
    "for",
    "function",
    "generic",
    "goto",
    "if",
    "in",
    "interface",
    "is",
    "limited",
    "loop",
    "mod",
    "new",
    "not",
    "null",
    "of",
    "or",
    "others",
    "out",
    "overriding",
    "package",
    "pragma",
    "private",
    "procedure",
    "protected",
    "raise",
    "range",
    "record",
    "rem",
    "renames",
    "requeue",
    "return",
    "reverse",
    "select",
    "separate",
    "subtype",
    "synchronized",
    "tagged",
    "task",
    "terminate",
    "then",
    "type",
    "until",
    "use",
    "when",
    "while",
    "with",
    "xor",
];

/// Returns true if `word` is an Ada reserved word, ignoring case.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    RESERVED.binary_search(&lower.as_str()).is_ok()
}

/// Maps an IDL identifier to a legal Ada identifier.
///
/// # Example
/// ```
/// use ironidl_codegen::names::ada_identifier;
///
/// assert_eq!(ada_identifier("_type"), "type_IDL");
/// assert_eq!(ada_identifier("a__b_"), "a_b_U");
/// ```
#[must_use]
pub fn ada_identifier(idl: &str) -> String {
    let stripped = idl.strip_prefix('_').unwrap_or(idl);
    let mut out = String::with_capacity(stripped.len() + 4);
    for c in stripped.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    if out.ends_with('_') {
        out.push('U');
    }
    if is_reserved(&out) {
        out.push_str("_IDL");
    }
    out
}

/// Suffix appended to an owner's name for an anonymous type.
fn anonymous_suffix(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Array(_) => "_Array",
        NodeKind::Sequence(_) => "_Seq",
        NodeKind::String(_) => "_String",
        NodeKind::Fixed(_) => "_Fixed",
        _ => "_Type",
    }
}

/// Names pre-declared in the namespace `owner` opens.
fn seeds(kind: &NodeKind) -> &'static [&'static str] {
    match kind {
        NodeKind::Interface(_) => &["Ref", "Nil_Ref", "To_Ref", "Repository_Id"],
        NodeKind::Union(_) => &["Switch"],
        NodeKind::Operation(_) => &["Self", "Returns", "Result"],
        _ => &[],
    }
}

/// Returns the node whose Ada namespace holds `node`'s local name.
///
/// Record components live in their record, parameters in their
/// operation, everything else in the enclosing package.
#[must_use]
pub fn namespace_of(ast: &Ast, node: NodeId) -> NodeId {
    match ast.kind(node) {
        NodeKind::Field(_) | NodeKind::Branch(_) | NodeKind::Argument(_) => {
            ast.defined_in(node).unwrap_or_else(|| ast.root())
        }
        _ => ast.enclosing_unit(node),
    }
}

/// Returns true if the node is an unbounded string, which maps to a
/// runtime type instead of a generated one.
fn is_runtime_string(kind: &NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::String(def) if def.bound.is_none() => Some(if def.wide {
            "Corba.Wide_String"
        } else {
            "Corba.String"
        }),
        _ => None,
    }
}

/// Claims `base` in `used`, appending `_1`, `_2`, ... on collision.
fn claim(used: &mut HashSet<String>, base: &str) -> String {
    if used.insert(base.to_ascii_lowercase()) {
        return base.to_string();
    }
    (1u32..)
        .map(|i| format!("{base}_{i}"))
        .find(|candidate| used.insert(candidate.to_ascii_lowercase()))
        .unwrap_or_else(|| base.to_string())
}

/// Memoized local and full Ada names.
#[derive(Debug)]
pub struct NameTable<'a> {
    ast: &'a Ast,
    root_package: String,
    placeholder: Option<String>,
    local: HashMap<NodeId, String>,
    full: HashMap<NodeId, String>,
    built: HashSet<NodeId>,
    unowned: HashSet<NodeId>,
}

impl<'a> NameTable<'a> {
    /// Creates an empty table for `ast`.
    #[must_use]
    pub fn new(ast: &'a Ast, config: &GeneratorConfig) -> Self {
        Self {
            ast,
            root_package: config.root().to_string(),
            placeholder: config.placeholder().map(str::to_string),
            local: HashMap::new(),
            full: HashMap::new(),
            built: HashSet::new(),
            unowned: HashSet::new(),
        }
    }

    /// Returns the node's identifier within its namespace.
    ///
    /// # Errors
    /// Returns `CodegenError::UnownedAnonymousType` for an anonymous type
    /// no declaration owns when no placeholder is configured.
    pub fn local_name(&mut self, node: NodeId) -> Result<String, CodegenError> {
        if let Some(name) = self.local.get(&node) {
            return Ok(name.clone());
        }
        let ast = self.ast;
        let kind = ast.kind(node);
        let fixed = match kind {
            NodeKind::Primitive(prim) => Some(prim.ada_type().to_string()),
            _ if node == ast.root() => Some(self.root_package.clone()),
            _ => is_runtime_string(kind).map(str::to_string),
        };
        if let Some(name) = fixed {
            self.local.insert(node, name.clone());
            return Ok(name);
        }

        let owner = namespace_of(ast, node);
        if !self.built.contains(&owner) {
            self.build(owner)?;
        }
        match self.local.get(&node) {
            Some(name) => Ok(name.clone()),
            None if self.unowned.contains(&node) => Err(CodegenError::unowned(node, kind.name())),
            None => Err(CodegenError::narrow(node, "named declaration", kind.name())),
        }
    }

    /// Returns the node's name qualified by its declaring package.
    ///
    /// # Errors
    /// Returns `CodegenError` if the local name cannot be resolved.
    pub fn full_name(&mut self, node: NodeId) -> Result<String, CodegenError> {
        if let Some(name) = self.full.get(&node) {
            return Ok(name.clone());
        }
        let ast = self.ast;
        let local = self.local_name(node)?;
        let full = match ast.kind(node) {
            _ if node == ast.root() => local,
            NodeKind::Primitive(_) => local,
            NodeKind::String(def) if def.bound.is_none() => local,
            NodeKind::Field(_) | NodeKind::Branch(_) | NodeKind::Argument(_) => local,
            NodeKind::Module | NodeKind::Interface(_) => {
                let parent = ast.enclosing_unit(node);
                if parent == ast.root() {
                    local
                } else {
                    format!("{}.{}", self.full_name(parent)?, local)
                }
            }
            _ => format!("{}.{}", self.full_name(ast.package_of(node))?, local),
        };
        self.full.insert(node, full.clone());
        Ok(full)
    }

    /// Assigns names to every member of the namespace opened by `owner`.
    fn build(&mut self, owner: NodeId) -> Result<(), CodegenError> {
        self.built.insert(owner);
        let ast = self.ast;
        let mut used: HashSet<String> = seeds(ast.kind(owner))
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();

        let mut named = Vec::new();
        let mut anonymous = Vec::new();
        if owner == ast.root() || ast.kind(owner).is_unit() {
            collect(ast, owner, owner, &mut named, &mut anonymous);
        } else {
            named.extend(
                ast.decls(owner)
                    .iter()
                    .copied()
                    .filter(|&d| namespace_of(ast, d) == owner),
            );
        }

        for node in named {
            let name = claim(&mut used, &ada_identifier(ast.name(node)));
            self.local.insert(node, name);
        }
        for node in anonymous {
            self.name_anonymous(node, &mut used)?;
        }
        trace!(namespace = %owner, names = used.len(), "namespace assigned");
        Ok(())
    }

    /// Names an anonymous type after the declaration that owns it.
    fn name_anonymous(
        &mut self,
        node: NodeId,
        used: &mut HashSet<String>,
    ) -> Result<(), CodegenError> {
        if self.local.contains_key(&node) || self.unowned.contains(&node) {
            return Ok(());
        }
        let ast = self.ast;
        let kind = ast.kind(node);
        if is_runtime_string(kind).is_some() {
            return Ok(());
        }
        let Some(scope) = ast.defined_in(node) else {
            self.unowned.insert(node);
            return Ok(());
        };

        let owner = ast
            .decls(scope)
            .iter()
            .copied()
            .find(|&d| ast.kind(d).type_ref() == Some(node));
        let base = if let Some(owner) = owner {
            Some(self.local_name(owner)?)
        } else if let Some(outer) = ast
            .anonymous(scope)
            .iter()
            .copied()
            .find(|&o| o != node && ast.kind(o).element_type() == Some(node))
        {
            // Containers are created after their elements, so this
            // recursion always moves to a later node and terminates.
            if outer > node {
                self.name_anonymous(outer, used)?;
            }
            self.local.get(&outer).cloned()
        } else {
            None
        };

        let name = match (base, &self.placeholder) {
            (Some(base), _) => claim(used, &format!("{base}{}", anonymous_suffix(kind))),
            (None, Some(placeholder)) => {
                warn!(node = %node, kind = kind.name(), placeholder = %placeholder, "naming unowned anonymous type with placeholder");
                claim(used, placeholder)
            }
            (None, None) => {
                self.unowned.insert(node);
                return Ok(());
            }
        };
        self.local.insert(node, name);
        Ok(())
    }
}

/// Collects, in scope order, the named members and anonymous types that
/// live in the package namespace `owner`.
fn collect(
    ast: &Ast,
    scope: NodeId,
    owner: NodeId,
    named: &mut Vec<NodeId>,
    anonymous: &mut Vec<NodeId>,
) {
    for &decl in ast.decls(scope) {
        if namespace_of(ast, decl) == owner {
            named.push(decl);
        }
        let kind = ast.kind(decl);
        if kind.is_scope() && !kind.is_unit() {
            collect(ast, decl, owner, named, anonymous);
        }
    }
    if scope == owner {
        anonymous.extend_from_slice(ast.anonymous(scope));
        for &decl in ast.decls(scope) {
            collect_anonymous(ast, decl, anonymous);
        }
    }
}

/// Collects anonymous types of non-unit scopes nested under `scope`.
fn collect_anonymous(ast: &Ast, scope: NodeId, anonymous: &mut Vec<NodeId>) {
    let kind = ast.kind(scope);
    if !kind.is_scope() || kind.is_unit() {
        return;
    }
    anonymous.extend_from_slice(ast.anonymous(scope));
    for &decl in ast.decls(scope) {
        collect_anonymous(ast, decl, anonymous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironidl_ast::{AstBuilder, ExprValue, OperationDef, ParamDirection, PrimitiveType};

    fn table(ast: &Ast) -> NameTable<'_> {
        NameTable::new(ast, &GeneratorConfig::default())
    }

    #[test]
    fn test_reserved_words_sorted() {
        let mut sorted = RESERVED.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED);
        assert!(is_reserved("Record"));
        assert!(!is_reserved("account"));
    }

    #[test]
    fn test_ada_identifier() {
        assert_eq!(ada_identifier("balance"), "balance");
        assert_eq!(ada_identifier("_balance"), "balance");
        assert_eq!(ada_identifier("a___b"), "a_b");
        assert_eq!(ada_identifier("last_"), "last_U");
        assert_eq!(ada_identifier("range"), "range_IDL");
        assert_eq!(ada_identifier("_Access"), "Access_IDL");
    }

    #[test]
    fn test_case_insensitive_collisions() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "Bank").unwrap();
        let t1 = b.typedef(m, "Amount", long).unwrap();
        let t2 = b.typedef(m, "amount", long).unwrap();
        let t3 = b.typedef(m, "AMOUNT", long).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(t1).unwrap(), "Amount");
        assert_eq!(names.local_name(t2).unwrap(), "amount_1");
        assert_eq!(names.local_name(t3).unwrap(), "AMOUNT_2");
        assert_eq!(names.full_name(t2).unwrap(), "Bank.amount_1");
    }

    #[test]
    fn test_interface_seeds() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "Bank").unwrap();
        let i = b.interface(m, "Account", Vec::new()).unwrap();
        let t = b.typedef(i, "Ref", long).unwrap();
        let op = b.operation(i, "transfer", OperationDef::default()).unwrap();
        let arg = b.argument(op, "result", ParamDirection::In, long).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(t).unwrap(), "Ref_1");
        assert_eq!(names.local_name(arg).unwrap(), "result_1");
        assert_eq!(names.full_name(i).unwrap(), "Bank.Account");
        assert_eq!(names.full_name(t).unwrap(), "Bank.Account.Ref_1");
        assert_eq!(names.full_name(arg).unwrap(), "result_1");
    }

    #[test]
    fn test_fields_live_in_their_record() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let s = b.structure(m, "Point").unwrap();
        let x = b.field(s, "Point", long).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(s).unwrap(), "Point");
        assert_eq!(names.local_name(x).unwrap(), "Point");
    }

    #[test]
    fn test_root_scope_entities() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let t = b.typedef(root, "Count", long).unwrap();
        let m = b.module(root, "Outer").unwrap();
        let n = b.module(m, "Inner").unwrap();
        let ast = b.finish();

        let mut names = NameTable::new(&ast, &GeneratorConfig::new().root_package("Bank_IDL_File"));
        assert_eq!(names.full_name(root).unwrap(), "Bank_IDL_File");
        assert_eq!(names.full_name(t).unwrap(), "Bank_IDL_File.Count");
        assert_eq!(names.full_name(m).unwrap(), "Outer");
        assert_eq!(names.full_name(n).unwrap(), "Outer.Inner");
        assert_eq!(names.full_name(long).unwrap(), "Corba.Long");
    }

    #[test]
    fn test_anonymous_owned_by_typedef() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let arr = b.array(m, vec![ExprValue::Long(4)], long).unwrap();
        let foo = b.typedef(m, "Foo", arr).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(arr).unwrap(), "Foo_Array");
        assert_eq!(names.full_name(arr).unwrap(), "M.Foo_Array");
        assert_eq!(names.local_name(foo).unwrap(), "Foo");
    }

    #[test]
    fn test_anonymous_owned_by_field() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let s = b.structure(m, "Foo").unwrap();
        let arr = b.array(s, vec![ExprValue::Long(4)], long).unwrap();
        b.field(s, "values", arr).unwrap();
        let t = b.structure(m, "Bar").unwrap();
        let arr2 = b.array(t, vec![ExprValue::Long(2)], long).unwrap();
        b.field(t, "values", arr2).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(arr).unwrap(), "values_Array");
        assert_eq!(names.local_name(arr2).unwrap(), "values_Array_1");
    }

    #[test]
    fn test_anonymous_widened_to_container() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let s = b.structure(m, "Matrix").unwrap();
        let inner = b.sequence(s, long, None).unwrap();
        let outer = b.sequence(s, inner, None).unwrap();
        b.field(s, "m", outer).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(inner).unwrap(), "m_Seq_Seq");
        assert_eq!(names.local_name(outer).unwrap(), "m_Seq");
    }

    #[test]
    fn test_unowned_anonymous_is_an_error() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let orphan = b.array(m, vec![ExprValue::Long(2)], long).unwrap();
        let t = b.typedef(m, "Named", long).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        let err = names.local_name(orphan).unwrap_err();
        assert!(matches!(err, CodegenError::UnownedAnonymousType { node, .. } if node == orphan));
        assert_eq!(names.local_name(t).unwrap(), "Named");
    }

    #[test]
    fn test_unowned_anonymous_with_placeholder() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let a = b.array(m, vec![ExprValue::Long(2)], long).unwrap();
        let c = b.array(m, vec![ExprValue::Long(3)], long).unwrap();
        let ast = b.finish();

        let config = GeneratorConfig::new().anonymous_placeholder("local_type");
        let mut names = NameTable::new(&ast, &config);
        assert_eq!(names.local_name(a).unwrap(), "local_type");
        assert_eq!(names.local_name(c).unwrap(), "local_type_1");
    }

    #[test]
    fn test_runtime_strings() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "M").unwrap();
        let s = b.string(m, None, false).unwrap();
        let w = b.string(m, None, true).unwrap();
        let ast = b.finish();

        let mut names = table(&ast);
        assert_eq!(names.local_name(s).unwrap(), "Corba.String");
        assert_eq!(names.full_name(w).unwrap(), "Corba.Wide_String");
    }

    #[test]
    fn test_names_are_stable() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "M").unwrap();
        let e = b.enumeration(m, "Color", &["Red", "Green"]).unwrap();
        let ast = b.finish();
        let red = ast.decls(e)[0];

        let mut names = table(&ast);
        let first = names.full_name(red).unwrap();
        assert_eq!(first, "M.Red");
        assert_eq!(names.full_name(red).unwrap(), first);
        assert_eq!(names.local_name(e).unwrap(), "Color");
    }
}
