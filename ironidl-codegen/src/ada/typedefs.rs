//! Typedefs.
//!
//! A typedef is a derived type. Its marshalling converts to the base type
//! and delegates.

use super::{Emitter, access_type, subprogram};
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::{NodeId, TypedefDef};

impl Emitter<'_> {
    pub(super) fn declare_typedef(
        &mut self,
        node: NodeId,
        def: &TypedefDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let base = self.dump_name(def.base, deps, previous)?;
        let name = self.local_name(node)?;
        w.line(format!("type {name} is new {base} ;"));
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    pub(super) fn marshal_typedef(
        &mut self,
        node: NodeId,
        def: &TypedefDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let base = self.marshal_name(def.base, deps, previous)?;
        let name = self.local_name(node)?;
        self.stream_runtime(deps);
        let [marshal, unmarshal, size] = self.marshal_profiles(&name);
        subprogram(w, &marshal, "Marshall", &[], |w| {
            w.line(format!("Marshall ({base} (A), S) ;"));
        });
        subprogram(w, &unmarshal, "UnMarshall", &[format!("Tmp : {base} ;")], |w| {
            w.line("UnMarshall (Tmp, S) ;");
            w.line(format!("A := {name} (Tmp) ;"));
        });
        subprogram(w, &size, "Align_Size", &[], |w| {
            w.line(format!("return Align_Size ({base} (A), Initial_Offset, N) ;"));
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_support::section;
    use ironidl_ast::{AstBuilder, ExprValue, PrimitiveType};

    #[test]
    fn test_typedef_chain_hoists_bases_in_order() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let arr = b.array(m, vec![ExprValue::Long(3)], long).unwrap();
        let grid = b.typedef(m, "Grid", arr).unwrap();
        let board = b.typedef(m, "Board", grid).unwrap();
        let ast = b.finish();

        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&ast, &config);
        let mut deps = DepList::new(m);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_declaration(board, &mut deps, &mut w, &mut previous)
            .unwrap();
        let text = format!("{previous}{}", w.finish());
        let array_at = text.find("type Grid_Array is array (0 .. 2) of Corba.Long ;").unwrap();
        let grid_at = text.find("type Grid is new Grid_Array ;").unwrap();
        let board_at = text.find("type Board is new Grid ;").unwrap();
        assert!(array_at < grid_at && grid_at < board_at);
        assert_eq!(emitter.take_declared(), vec![arr, grid, board]);
    }

    #[test]
    fn test_typedef_marshalling_converts() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let t = b.typedef(m, "Count", long).unwrap();
        let ast = b.finish();

        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&ast, &config);
        let mut deps = DepList::new(m);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_marshal_body(t, &mut deps, &mut w, &mut previous)
            .unwrap();
        let body = w.finish();
        assert!(previous.is_empty());
        assert!(body.contains("Marshall (Corba.Long (A), S) ;"));
        let unmarshal = section(&body, "procedure UnMarshall", "end UnMarshall ;");
        assert!(unmarshal.contains("Tmp : Corba.Long ;"));
        assert!(unmarshal.contains("A := Count (Tmp) ;"));
        assert!(body.contains("return Align_Size (Corba.Long (A), Initial_Offset, N) ;"));
    }
}
