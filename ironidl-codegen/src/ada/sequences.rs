//! Sequences, bounded strings and fixed-point types.
//!
//! Sequences and bounded strings instantiate a generic runtime package
//! named after the type with a `_Pkg` suffix. Fixed-point types get a
//! `_Marshal` instance of the stream's generic fixed-point codec.

use super::{Emitter, access_type, subprogram};
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::expr;
use crate::writer::CodeWriter;
use ironidl_ast::{FixedDef, NodeId, SequenceDef, StringDef};

/// Runtime spellings of a bounded string flavor.
struct StringFlavor {
    generic: &'static str,
    subtype: &'static str,
    unbounded: &'static str,
    to_unbounded: &'static str,
    to_bounded: &'static str,
}

const NARROW: StringFlavor = StringFlavor {
    generic: "Corba.Bounded_Strings",
    subtype: "Bounded_String",
    unbounded: "Corba.String",
    to_unbounded: "To_Corba_String",
    to_bounded: "To_Bounded_String",
};

const WIDE: StringFlavor = StringFlavor {
    generic: "Corba.Bounded_Wide_Strings",
    subtype: "Bounded_Wide_String",
    unbounded: "Corba.Wide_String",
    to_unbounded: "To_Corba_Wide_String",
    to_bounded: "To_Bounded_Wide_String",
};

const fn flavor(def: &StringDef) -> &'static StringFlavor {
    if def.wide { &WIDE } else { &NARROW }
}

impl Emitter<'_> {
    pub(super) fn declare_sequence(
        &mut self,
        node: NodeId,
        def: &SequenceDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let element = self.dump_name(def.element, deps, previous)?;
        deps.require_runtime("Corba.Sequences");
        let instance = match &def.bound {
            Some(bound) => {
                let max = expr::extent(bound, node, "sequence bound")?;
                format!("Corba.Sequences.Bounded ({element}, {max})")
            }
            None => format!("Corba.Sequences.Unbounded ({element})"),
        };
        w.line(format!("package {name}_Pkg is new {instance} ;"));
        w.line(format!("subtype {name} is {name}_Pkg.Sequence ;"));
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    /// A sequence travels as its length followed by its elements.
    pub(super) fn marshal_sequence(
        &mut self,
        node: NodeId,
        def: &SequenceDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let element = self.marshal_name(def.element, deps, previous)?;
        self.stream_runtime(deps);
        deps.require_runtime("Corba");
        let [marshal, unmarshal, size] = self.marshal_profiles(&name);
        let size_type = self.config.names().size_type.clone();
        let pkg = format!("{name}_Pkg");

        subprogram(
            w,
            &marshal,
            "Marshall",
            &[format!("Len : constant Natural := {pkg}.Length (A) ;")],
            |w| {
                w.line("Marshall (Corba.Unsigned_Long (Len), S) ;");
                w.block("for I in 1 .. Len loop", "end loop ;", |w| {
                    w.line(format!("Marshall ({pkg}.Element_Of (A, I), S) ;"));
                });
            },
        );
        subprogram(
            w,
            &unmarshal,
            "UnMarshall",
            &[
                "Len : Corba.Unsigned_Long ;".to_string(),
                format!("Elem : {element} ;"),
            ],
            |w| {
                w.line("UnMarshall (Len, S) ;");
                w.line(format!("A := {pkg}.Null_Sequence ;"));
                w.block("for I in 1 .. Len loop", "end loop ;", |w| {
                    w.line("UnMarshall (Elem, S) ;");
                    w.line(format!("{pkg}.Append (A, Elem) ;"));
                });
            },
        );
        subprogram(
            w,
            &size,
            "Align_Size",
            &[format!("Tmp : {size_type} := Initial_Offset ;")],
            |w| {
                w.block("for J in 1 .. N loop", "end loop ;", |w| {
                    w.line("Tmp := Align_Size (Corba.Unsigned_Long (0), Tmp) ;");
                    w.block(
                        format!("for I in 1 .. {pkg}.Length (A) loop"),
                        "end loop ;",
                        |w| {
                            w.line(format!("Tmp := Align_Size ({pkg}.Element_Of (A, I), Tmp) ;"));
                        },
                    );
                });
                w.line("return Tmp ;");
            },
        );
        Ok(())
    }

    /// Unbounded strings are runtime types and never reach this point.
    pub(super) fn declare_string(
        &mut self,
        node: NodeId,
        def: &StringDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let Some(bound) = &def.bound else {
            return Ok(());
        };
        let name = self.local_name(node)?;
        let max = expr::extent(bound, node, "string bound")?;
        let flavor = flavor(def);
        deps.require_runtime(flavor.generic);
        w.line(format!("package {name}_Pkg is new {} ({max}) ;", flavor.generic));
        w.line(format!("subtype {name} is {name}_Pkg.{} ;", flavor.subtype));
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    /// A bounded string travels as the equivalent unbounded string.
    pub(super) fn marshal_string(
        &mut self,
        node: NodeId,
        def: &StringDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        if def.bound.is_none() {
            return Ok(());
        }
        let name = self.local_name(node)?;
        let flavor = flavor(def);
        self.stream_runtime(deps);
        deps.require_runtime("Corba");
        let [marshal, unmarshal, size] = self.marshal_profiles(&name);
        let size_type = self.config.names().size_type.clone();
        let pkg = format!("{name}_Pkg");

        subprogram(w, &marshal, "Marshall", &[], |w| {
            w.line(format!("Marshall ({pkg}.{} (A), S) ;", flavor.to_unbounded));
        });
        subprogram(
            w,
            &unmarshal,
            "UnMarshall",
            &[format!("Tmp : {} ;", flavor.unbounded)],
            |w| {
                w.line("UnMarshall (Tmp, S) ;");
                w.line(format!("A := {pkg}.{} (Tmp) ;", flavor.to_bounded));
            },
        );
        subprogram(
            w,
            &size,
            "Align_Size",
            &[format!("Tmp : {size_type} := Initial_Offset ;")],
            |w| {
                w.block("for J in 1 .. N loop", "end loop ;", |w| {
                    w.line(format!(
                        "Tmp := Align_Size ({pkg}.{} (A), Tmp) ;",
                        flavor.to_unbounded
                    ));
                });
                w.line("return Tmp ;");
            },
        );
        Ok(())
    }

    pub(super) fn declare_fixed(
        &mut self,
        node: NodeId,
        def: FixedDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        w.line(format!(
            "type {name} is delta 10.0 ** (-{}) digits {} ;",
            def.scale, def.digits
        ));
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    /// The stream package provides a generic codec for decimal types; the
    /// three subprograms are completed by renaming its instance.
    pub(super) fn marshal_fixed(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        self.stream_runtime(deps);
        let stream = self.config.names().stream_package.clone();
        w.line(format!(
            "package {name}_Marshal is new {stream}.Fixed_Point ({name}) ;"
        ));
        let profiles = self.marshal_profiles(&name);
        for (profile, op) in profiles.iter().zip(["Marshall", "UnMarshall", "Align_Size"]) {
            w.line(format!("{profile} renames {name}_Marshal.{op} ;"));
        }
        w.blank();
        Ok(())
    }
}
