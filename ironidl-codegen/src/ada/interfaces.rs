//! Interfaces.
//!
//! An interface is a package whose `Ref` type derives from the reference
//! type of its first base interface, or from the root object reference.

use super::{Emitter, access_type, subprogram};
use crate::config::RuntimeNames;
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::{InterfaceDef, NodeId, NodeKind};
use tracing::trace;

impl Emitter<'_> {
    /// Returns the repository identifier of an interface, e.g.
    /// `IDL:Bank/Account:1.0`.
    #[must_use]
    pub fn repository_id(&self, node: NodeId) -> String {
        format!("IDL:{}:1.0", self.ast.scoped_name(node).join("/"))
    }

    /// Returns the package the interface's `Ref` derives from.
    fn parent_package(
        &mut self,
        def: &InterfaceDef,
        deps: &mut DepList,
    ) -> Result<String, CodegenError> {
        match def.bases.first() {
            Some(&base) => {
                if deps.record(base) {
                    trace!(base = %base, "recorded base interface");
                }
                self.full_name(base)
            }
            None => {
                let object = RuntimeNames::package_of(&self.config.names().object_ref).to_string();
                deps.require_runtime(object.clone());
                Ok(object)
            }
        }
    }

    /// Returns the servant type the interface's implementation extends.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is not an interface.
    pub fn implementation_parent(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
    ) -> Result<String, CodegenError> {
        let ast = self.ast;
        let NodeKind::Interface(def) = ast.kind(node) else {
            return Err(CodegenError::narrow(node, "interface", ast.kind(node).name()));
        };
        match def.bases.first() {
            Some(&base) => {
                let base = self.full_name(base)?;
                let package = format!("{base}.Impl");
                deps.require_runtime(package.clone());
                Ok(format!("{package}.Object"))
            }
            None => {
                let base = self.config.names().implementation_base.clone();
                deps.require_runtime(RuntimeNames::package_of(&base));
                Ok(base)
            }
        }
    }

    pub(super) fn declare_interface(
        &mut self,
        node: NodeId,
        def: &InterfaceDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        _previous: &mut String,
    ) -> Result<(), CodegenError> {
        let parent = self.parent_package(def, deps)?;
        let object_ref = self.config.names().object_ref.clone();
        deps.require_runtime("Corba");
        w.line(format!("type Ref is new {parent}.Ref with null record ;"));
        access_type(deps, w, "Ref");
        w.blank();
        w.line(format!(
            "Nil_Ref : constant Ref := ({parent}.Nil_Ref with null record) ;"
        ));
        w.line(format!(
            "function To_Ref (The_Ref : in {object_ref}'Class) return Ref ;"
        ));
        w.line(format!(
            "Repository_Id : constant Corba.String := Corba.To_Corba_String (\"{}\") ;",
            self.repository_id(node)
        ));
        w.blank();
        Ok(())
    }

    pub(super) fn interface_body(
        &mut self,
        _node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let object_ref = self.config.names().object_ref.clone();
        let object = RuntimeNames::package_of(&object_ref).to_string();
        deps.require_runtime(object.clone());
        subprogram(
            w,
            &format!("function To_Ref (The_Ref : in {object_ref}'Class) return Ref"),
            "To_Ref",
            &["Result : Ref ;".to_string()],
            |w| {
                w.block(
                    format!("if {object}.Is_A (The_Ref, Repository_Id) then"),
                    "end if ;",
                    |w| {
                        w.line(format!("{object}.Internal_Copy (The_Ref, Result) ;"));
                        w.line("return Result ;");
                    },
                );
                w.line("raise Constraint_Error ;");
            },
        );
        Ok(())
    }

    /// References travel as root object references.
    pub(super) fn marshal_interface(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let ty = self.type_name(node, false)?;
        let object_ref = self.config.names().object_ref.clone();
        let object = RuntimeNames::package_of(&object_ref).to_string();
        deps.require_runtime(object.clone());
        self.stream_runtime(deps);
        let [marshal, unmarshal, size] = self.marshal_profiles(&ty);
        subprogram(w, &marshal, "Marshall", &[], |w| {
            w.line(format!("{object}.Marshall ({object_ref} (A), S) ;"));
        });
        subprogram(
            w,
            &unmarshal,
            "UnMarshall",
            &[format!("Tmp : {object_ref} ;")],
            |w| {
                w.line(format!("{object}.UnMarshall (Tmp, S) ;"));
                w.line("A := To_Ref (Tmp) ;");
            },
        );
        subprogram(w, &size, "Align_Size", &[], |w| {
            w.line(format!(
                "return {object}.Align_Size ({object_ref} (A), Initial_Offset, N) ;"
            ));
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_support::{bank, section};
    use ironidl_ast::AstBuilder;

    fn declaration_of(ast: &ironidl_ast::Ast, node: NodeId) -> (String, DepList) {
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(ast, &config);
        let mut deps = DepList::new(node);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_declaration(node, &mut deps, &mut w, &mut previous)
            .unwrap();
        (w.finish(), deps)
    }

    #[test]
    fn test_root_interface() {
        let f = bank();
        let (text, deps) = declaration_of(&f.ast, f.account);
        assert!(text.starts_with("   type Ref is new Corba.Object.Ref with null record ;\n"));
        assert!(text.contains("type Ref_Ptr is access Ref ;"));
        assert!(text.contains("Nil_Ref : constant Ref := (Corba.Object.Nil_Ref with null record) ;"));
        assert!(text.contains("function To_Ref (The_Ref : in Corba.Object.Ref'Class) return Ref ;"));
        assert!(text.contains("Corba.To_Corba_String (\"IDL:Bank/Account:1.0\") ;"));
        assert!(deps.runtime().iter().any(|r| r.package == "Corba.Object"));
        assert!(deps.imports().is_empty());
    }

    #[test]
    fn test_derived_interface() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "Bank").unwrap();
        let account = b.interface(m, "Account", Vec::new()).unwrap();
        let savings = b.interface(m, "Savings", vec![account]).unwrap();
        let ast = b.finish();

        let (text, deps) = declaration_of(&ast, savings);
        assert!(text.contains("type Ref is new Bank.Account.Ref with null record ;"));
        assert!(text.contains("(Bank.Account.Nil_Ref with null record)"));
        assert_eq!(deps.imports(), &[account]);

        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&ast, &config);
        let mut deps = DepList::new(savings);
        assert_eq!(
            emitter.implementation_parent(savings, &mut deps).unwrap(),
            "Bank.Account.Impl.Object"
        );
        assert_eq!(
            emitter.implementation_parent(account, &mut deps).unwrap(),
            "Omniobject.Implemented_Object"
        );
        assert!(emitter.implementation_parent(m, &mut deps).is_err());
    }

    #[test]
    fn test_to_ref_and_marshalling() {
        let f = bank();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&f.ast, &config);
        let mut deps = DepList::new(f.account);
        let mut previous = String::new();

        let mut w = emitter.writer();
        emitter
            .produce_body(f.account, &mut deps, &mut w, &mut previous)
            .unwrap();
        let body = w.finish();
        let to_ref = section(&body, "function To_Ref", "end To_Ref ;");
        assert!(to_ref.contains("if Corba.Object.Is_A (The_Ref, Repository_Id) then"));
        assert!(to_ref.contains("raise Constraint_Error ;"));

        let mut w = emitter.writer();
        emitter
            .produce_marshal_body(f.account, &mut deps, &mut w, &mut previous)
            .unwrap();
        let marshal = w.finish();
        assert!(marshal.contains("procedure Marshall (A : in Ref ;"));
        assert!(marshal.contains("Corba.Object.Marshall (Corba.Object.Ref (A), S) ;"));
        assert!(marshal.contains("A := To_Ref (Tmp) ;"));
    }
}
