//! Enumerations.

use super::{Emitter, access_type, subprogram};
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::NodeId;

impl Emitter<'_> {
    pub(super) fn declare_enum(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let mut literals = Vec::new();
        for &enumerator in self.ast.decls(node) {
            literals.push(self.local_name(enumerator)?);
        }
        w.line(format!("type {name} is ({}) ;", literals.join(", ")));
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    /// Enumerations travel as their position, an unsigned long.
    pub(super) fn marshal_enum(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        self.stream_runtime(deps);
        deps.require_runtime("Corba");
        let [marshal, unmarshal, size] = self.marshal_profiles(&name);
        subprogram(w, &marshal, "Marshall", &[], |w| {
            w.line(format!("Marshall (Corba.Unsigned_Long ({name}'Pos (A)), S) ;"));
        });
        subprogram(
            w,
            &unmarshal,
            "UnMarshall",
            &["Tmp : Corba.Unsigned_Long ;".to_string()],
            |w| {
                w.line("UnMarshall (Tmp, S) ;");
                w.line(format!("A := {name}'Val (Tmp) ;"));
            },
        );
        subprogram(w, &size, "Align_Size", &[], |w| {
            w.line("return Align_Size (Corba.Unsigned_Long (0), Initial_Offset, N) ;");
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_support::{bank, section};

    #[test]
    fn test_enum_declaration_and_marshalling() {
        let f = bank();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&f.ast, &config);
        let mut deps = DepList::new(f.module);
        let mut previous = String::new();

        let mut w = emitter.writer();
        emitter
            .produce_declaration(f.kind, &mut deps, &mut w, &mut previous)
            .unwrap();
        let declaration = w.finish();
        assert!(declaration.starts_with("   type Kind is (Credit, Debit) ;\n"));
        assert!(declaration.contains("type Kind_Ptr is access Kind ;"));

        let mut w = emitter.writer();
        emitter
            .produce_marshal_body(f.kind, &mut deps, &mut w, &mut previous)
            .unwrap();
        let body = w.finish();
        assert!(body.contains("Marshall (Corba.Unsigned_Long (Kind'Pos (A)), S) ;"));
        let unmarshal = section(&body, "procedure UnMarshall", "end UnMarshall ;");
        assert!(unmarshal.contains("A := Kind'Val (Tmp) ;"));
        assert!(deps.runtime().iter().any(|r| r.package == "Netbufferedstream" && r.use_clause));
    }

    #[test]
    fn test_reserved_enumerator() {
        let mut b = ironidl_ast::AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "M").unwrap();
        let e = b.enumeration(m, "Mode", &["begin", "end_"]).unwrap();
        let ast = b.finish();

        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&ast, &config);
        let mut deps = DepList::new(m);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_declaration(e, &mut deps, &mut w, &mut previous)
            .unwrap();
        assert!(w.finish().contains("type Mode is (begin_IDL, end_U) ;"));
    }
}
