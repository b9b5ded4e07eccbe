//! Constants.

use super::Emitter;
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::{ConstantDef, NodeId};

impl Emitter<'_> {
    pub(super) fn declare_constant(
        &mut self,
        node: NodeId,
        def: &ConstantDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let ty = self.dump_name(def.const_type, deps, previous)?;
        let value = self.literal(&def.value, deps)?;
        let name = self.local_name(node)?;
        w.line(format!("{name} : constant {ty} := {value} ;"));
        w.blank();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_support::bank;
    use ironidl_ast::{AstBuilder, ExprValue, PrimitiveType};

    fn declare(ast: &ironidl_ast::Ast, unit: NodeId, node: NodeId) -> String {
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(ast, &config);
        let mut deps = DepList::new(unit);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_declaration(node, &mut deps, &mut w, &mut previous)
            .unwrap();
        assert!(emitter.take_declared().is_empty());
        format!("{previous}{}", w.finish())
    }

    #[test]
    fn test_scalar_constants() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let double = b.primitive(PrimitiveType::Double);
        let boolean = b.primitive(PrimitiveType::Boolean);
        let text = b.string(root, None, false).unwrap();
        let m = b.module(root, "M").unwrap();
        let limit = b.constant(m, "Limit", long, ExprValue::Long(-5)).unwrap();
        let rate = b.constant(m, "Rate", double, ExprValue::Double(0.25)).unwrap();
        let flag = b.constant(m, "Enabled", boolean, ExprValue::Boolean(true)).unwrap();
        let greeting = b
            .constant(m, "Greeting", text, ExprValue::String("hi".to_string()))
            .unwrap();
        let ast = b.finish();

        assert_eq!(declare(&ast, m, limit), "   Limit : constant Corba.Long := -5 ;\n\n");
        assert!(declare(&ast, m, rate).contains("Rate : constant Corba.Double := 0.25 ;"));
        assert!(declare(&ast, m, flag).contains(":= True ;"));
        assert!(declare(&ast, m, greeting).contains(
            "Greeting : constant Corba.String := Corba.To_Corba_String (\"hi\") ;"
        ));
    }

    #[test]
    fn test_enum_constant_hoists_enum() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "M").unwrap();
        let color = b.enumeration(m, "Color", &["Red", "Green"]).unwrap();
        let partial = b.clone().finish();
        let green = partial.decls(color)[1];
        let fallback = b
            .constant(m, "Fallback", color, ExprValue::Enumerator(green))
            .unwrap();
        let ast = b.finish();

        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&ast, &config);
        let mut deps = DepList::new(m);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_declaration(fallback, &mut deps, &mut w, &mut previous)
            .unwrap();
        assert!(previous.contains("type Color is (Red, Green) ;"));
        assert_eq!(w.finish(), "   Fallback : constant Color := Green ;\n\n");
        assert_eq!(emitter.take_declared(), vec![color]);
    }

    #[test]
    fn test_constant_of_bank_enum_from_interface() {
        let f = bank();
        let credit = f.ast.decls(f.kind)[0];
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&f.ast, &config);
        let mut deps = DepList::new(f.account);
        assert_eq!(
            emitter
                .literal(&ExprValue::Enumerator(credit), &mut deps)
                .unwrap(),
            "Bank.Credit"
        );
        assert_eq!(deps.imports(), &[f.module]);
    }
}
