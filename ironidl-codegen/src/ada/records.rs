//! Structs, exceptions and unions.

use super::{Emitter, access_type, subprogram};
use crate::config::RuntimeNames;
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::{NodeId, NodeKind, UnionDef, UnionLabel};

/// A record component with its resolved type name.
struct Component {
    name: String,
    type_name: String,
}

/// A variant of a union with its rendered choice list.
struct Variant {
    choices: String,
    component: Component,
}

impl Emitter<'_> {
    /// Resolves the fields of a struct or exception in order.
    fn components(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        previous: &mut String,
        marshal: bool,
    ) -> Result<Vec<Component>, CodegenError> {
        let ast = self.ast;
        let mut components = Vec::new();
        for &decl in ast.decls(node) {
            if let NodeKind::Field(field) = ast.kind(decl) {
                let type_name = if marshal {
                    self.marshal_name(field.field_type, deps, previous)?
                } else {
                    self.dump_name(field.field_type, deps, previous)?
                };
                components.push(Component {
                    name: self.local_name(decl)?,
                    type_name,
                });
            }
        }
        Ok(components)
    }

    /// Resolves the branches of a union in order.
    fn variants(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        previous: &mut String,
        marshal: bool,
    ) -> Result<Vec<Variant>, CodegenError> {
        let ast = self.ast;
        let mut variants = Vec::new();
        for &decl in ast.decls(node) {
            let NodeKind::Branch(branch) = ast.kind(decl) else {
                continue;
            };
            let type_name = if marshal {
                self.marshal_name(branch.field_type, deps, previous)?
            } else {
                self.dump_name(branch.field_type, deps, previous)?
            };
            let choices = if branch.is_default() {
                "others".to_string()
            } else {
                let mut labels = Vec::with_capacity(branch.labels.len());
                for label in &branch.labels {
                    if let UnionLabel::Value(value) = label {
                        labels.push(self.literal(value, deps)?);
                    }
                }
                labels.join(" | ")
            };
            variants.push(Variant {
                choices,
                component: Component {
                    name: self.local_name(decl)?,
                    type_name,
                },
            });
        }
        Ok(variants)
    }

    pub(super) fn declare_struct(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let components = self.components(node, deps, previous, false)?;
        write_record(w, &format!("type {name} is"), &components);
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    pub(super) fn declare_exception(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let components = self.components(node, deps, previous, false)?;
        let base = self.config.names().exception_members.clone();
        deps.require_runtime(RuntimeNames::package_of(&base));
        deps.require_runtime("Ada.Exceptions");
        w.line(format!("{name} : exception ;"));
        write_record(
            w,
            &format!("type {name}_Members is new {base} with"),
            &components,
        );
        w.line(format!(
            "procedure Get_Members (From : in Ada.Exceptions.Exception_Occurrence ; To : out {name}_Members) ;"
        ));
        w.blank();
        Ok(())
    }

    pub(super) fn exception_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        deps.require_runtime("Ada.Exceptions");
        deps.require_runtime("Corba.Exceptions");
        subprogram(
            w,
            &format!(
                "procedure Get_Members (From : in Ada.Exceptions.Exception_Occurrence ; To : out {name}_Members)"
            ),
            "Get_Members",
            &[],
            |w| {
                w.line("Corba.Exceptions.Get_Members (From, To) ;");
            },
        );
        Ok(())
    }

    pub(super) fn declare_union(
        &mut self,
        node: NodeId,
        def: &UnionDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let switch = self.dump_name(def.discriminant, deps, previous)?;
        let variants = self.variants(node, deps, previous, false)?;
        let has_default = variants.iter().any(|v| v.choices == "others");
        w.block(
            format!("type {name} (Switch : {switch} := {switch}'First) is record"),
            "end record ;",
            |w| {
                w.block("case Switch is", "end case ;", |w| {
                    for variant in &variants {
                        w.line(format!("when {} =>", variant.choices));
                        w.nest(|w| {
                            w.line(format!(
                                "{} : {} ;",
                                variant.component.name, variant.component.type_name
                            ));
                        });
                    }
                    if !has_default {
                        w.line("when others =>");
                        w.nest(|w| {
                            w.line("null ;");
                        });
                    }
                });
            },
        );
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    pub(super) fn marshal_record(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let ty = self.type_name(node, false)?;
        let components = self.components(node, deps, previous, true)?;
        self.stream_runtime(deps);
        let [marshal, unmarshal, size] = self.marshal_profiles(&ty);
        let size_type = self.config.names().size_type.clone();

        subprogram(w, &marshal, "Marshall", &[], |w| {
            if components.is_empty() {
                w.line("null ;");
            }
            for c in &components {
                w.line(format!("Marshall (A.{}, S) ;", c.name));
            }
        });
        subprogram(w, &unmarshal, "UnMarshall", &[], |w| {
            if components.is_empty() {
                w.line("null ;");
            }
            for c in &components {
                w.line(format!("UnMarshall (A.{}, S) ;", c.name));
            }
        });
        subprogram(
            w,
            &size,
            "Align_Size",
            &[format!("Tmp : {size_type} := Initial_Offset ;")],
            |w| {
                if !components.is_empty() {
                    w.block("for J in 1 .. N loop", "end loop ;", |w| {
                        for c in &components {
                            w.line(format!("Tmp := Align_Size (A.{}, Tmp) ;", c.name));
                        }
                    });
                }
                w.line("return Tmp ;");
            },
        );
        Ok(())
    }

    pub(super) fn marshal_union(
        &mut self,
        node: NodeId,
        def: &UnionDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let ty = self.local_name(node)?;
        let switch = self.marshal_name(def.discriminant, deps, previous)?;
        let variants = self.variants(node, deps, previous, true)?;
        self.stream_runtime(deps);
        let [marshal, unmarshal, size] = self.marshal_profiles(&ty);
        let size_type = self.config.names().size_type.clone();
        let has_default = variants.iter().any(|v| v.choices == "others");

        let cases = |w: &mut CodeWriter, selector: &str, call: &dyn Fn(&str) -> String| {
            w.block(format!("case {selector} is"), "end case ;", |w| {
                for variant in &variants {
                    w.line(format!("when {} =>", variant.choices));
                    w.nest(|w| {
                        w.line(call(&variant.component.name));
                    });
                }
                if !has_default {
                    w.line("when others =>");
                    w.nest(|w| {
                        w.line("null ;");
                    });
                }
            });
        };

        subprogram(w, &marshal, "Marshall", &[], |w| {
            w.line("Marshall (A.Switch, S) ;");
            cases(w, "A.Switch", &|c| format!("Marshall (A.{c}, S) ;"));
        });
        subprogram(
            w,
            &unmarshal,
            "UnMarshall",
            &[format!("Switch : {switch} ;")],
            |w| {
                w.line("UnMarshall (Switch, S) ;");
                w.line("declare");
                w.nest(|w| {
                    w.line(format!("Tmp : {ty} (Switch) ;"));
                });
                w.line("begin");
                w.nest(|w| {
                    cases(w, "Switch", &|c| format!("UnMarshall (Tmp.{c}, S) ;"));
                    w.line("A := Tmp ;");
                });
                w.line("end ;");
            },
        );
        subprogram(
            w,
            &size,
            "Align_Size",
            &[format!("Tmp : {size_type} := Initial_Offset ;")],
            |w| {
                w.block("for J in 1 .. N loop", "end loop ;", |w| {
                    w.line("Tmp := Align_Size (A.Switch, Tmp) ;");
                    cases(w, "A.Switch", &|c| format!("Tmp := Align_Size (A.{c}, Tmp) ;"));
                });
                w.line("return Tmp ;");
            },
        );
        Ok(())
    }
}

/// Writes a record type, or a null record when there are no components.
fn write_record(w: &mut CodeWriter, head: &str, components: &[Component]) {
    if components.is_empty() {
        w.line(format!("{head} null record ;"));
        return;
    }
    w.block(format!("{head} record"), "end record ;", |w| {
        for c in components {
            w.line(format!("{} : {} ;", c.name, c.type_name));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_support::{bank, section};
    use ironidl_ast::{AstBuilder, ExprValue, PrimitiveType};

    fn declare(ast: &ironidl_ast::Ast, unit: NodeId, node: NodeId) -> (String, String) {
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(ast, &config);
        let mut deps = DepList::new(unit);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_declaration(node, &mut deps, &mut w, &mut previous)
            .unwrap();
        let declaration = format!("{previous}{}", w.finish());
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_marshal_body(node, &mut deps, &mut w, &mut previous)
            .unwrap();
        (declaration, format!("{previous}{}", w.finish()))
    }

    #[test]
    fn test_struct_declaration() {
        let f = bank();
        let (declaration, body) = declare(&f.ast, f.module, f.entry);
        assert!(declaration.contains("   type Posting is record\n      amount : Corba.Long ;\n"));
        assert!(declaration.contains("      side : Kind ;\n   end record ;\n"));
        assert!(declaration.contains("type Kind is (Credit, Debit) ;"));
        assert!(declaration.find("type Kind is").unwrap() < declaration.find("type Posting is").unwrap());

        let marshal = section(&body, "procedure Marshall (A : in Posting", "end Marshall ;");
        assert!(marshal.contains("Marshall (A.amount, S) ;"));
        assert!(marshal.find("A.amount").unwrap() < marshal.find("A.side").unwrap());
    }

    #[test]
    fn test_empty_struct() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let m = b.module(root, "M").unwrap();
        let s = b.structure(m, "Nothing").unwrap();
        let ast = b.finish();

        let (declaration, body) = declare(&ast, m, s);
        assert!(declaration.contains("type Nothing is null record ;"));
        assert!(body.contains("null ;"));
    }

    #[test]
    fn test_exception_members() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "Bank").unwrap();
        let e = b.exception(m, "Overdrawn").unwrap();
        b.field(e, "deficit", long).unwrap();
        let ast = b.finish();

        let (declaration, body) = declare(&ast, m, e);
        assert!(declaration.contains("Overdrawn : exception ;"));
        assert!(declaration.contains(
            "type Overdrawn_Members is new Corba.Idl_Exception_Members with record"
        ));
        assert!(declaration.contains("deficit : Corba.Long ;"));
        assert!(body.contains("procedure Marshall (A : in Overdrawn_Members ;"));
    }

    #[test]
    fn test_exception_get_members_body() {
        let f = bank();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&f.ast, &config);
        let mut deps = DepList::new(f.module);
        let mut previous = String::new();
        let mut w = emitter.writer();
        emitter
            .produce_body(f.overdrawn, &mut deps, &mut w, &mut previous)
            .unwrap();
        let body = w.finish();
        let get_members = section(&body, "procedure Get_Members", "end Get_Members ;");
        assert!(get_members.contains("To : out Overdrawn_Members) is"));
        assert!(get_members.contains("Corba.Exceptions.Get_Members (From, To) ;"));
        assert!(deps.runtime().iter().any(|r| r.package == "Corba.Exceptions"));
        assert!(previous.is_empty());
    }

    #[test]
    fn test_union_without_default() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let short = b.primitive(PrimitiveType::Short);
        let m = b.module(root, "M").unwrap();
        let u = b.union(m, "Choice", long).unwrap();
        b.branch(
            u,
            "a",
            vec![UnionLabel::Value(ExprValue::Long(1)), UnionLabel::Value(ExprValue::Long(2))],
            short,
        )
        .unwrap();
        b.branch(u, "b", vec![UnionLabel::Value(ExprValue::Long(3))], long)
            .unwrap();
        let ast = b.finish();

        let (declaration, body) = declare(&ast, m, u);
        assert!(declaration.contains(
            "type Choice (Switch : Corba.Long := Corba.Long'First) is record"
        ));
        assert!(declaration.contains("when 1 | 2 =>\n            a : Corba.Short ;"));
        assert!(declaration.contains("when others =>\n            null ;"));

        let unmarshal = section(&body, "procedure UnMarshall", "end UnMarshall ;");
        assert!(unmarshal.contains("Switch : Corba.Long ;"));
        assert!(unmarshal.contains("Tmp : Choice (Switch) ;"));
        assert!(unmarshal.contains("UnMarshall (Tmp.b, S) ;"));
        assert!(unmarshal.contains("A := Tmp ;"));
    }

    #[test]
    fn test_union_with_default() {
        let mut b = AstBuilder::new();
        let root = b.root();
        let long = b.primitive(PrimitiveType::Long);
        let m = b.module(root, "M").unwrap();
        let u = b.union(m, "Choice", long).unwrap();
        b.branch(u, "a", vec![UnionLabel::Value(ExprValue::Long(1))], long)
            .unwrap();
        b.branch(u, "rest", vec![UnionLabel::Default], long).unwrap();
        let ast = b.finish();

        let (declaration, _) = declare(&ast, m, u);
        assert_eq!(declaration.matches("when others =>").count(), 1);
        assert!(declaration.contains("when others =>\n            rest : Corba.Long ;"));
    }
}
