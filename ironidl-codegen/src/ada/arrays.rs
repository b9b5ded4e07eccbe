//! Array types.
//!
//! Marshalling, unmarshalling and sizing of an array are rendered from one
//! [`MarshalPlan`], so the three subprograms visit elements in the same
//! order by construction.

use super::{Emitter, access_type, subprogram};
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::expr;
use crate::writer::CodeWriter;
use ironidl_ast::{ArrayDef, NodeId, NodeKind};

/// One loop of a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    /// Index variable.
    pub index: String,
    /// Array dimension iterated, starting at 1.
    pub dimension: usize,
}

/// Element visit order over every dimension, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    loops: Vec<Loop>,
}

impl Traversal {
    /// Creates the traversal of an array of `rank` dimensions.
    #[must_use]
    pub fn new(rank: usize) -> Self {
        Self {
            loops: (1..=rank)
                .map(|dimension| Loop {
                    index: format!("I{dimension}"),
                    dimension,
                })
                .collect(),
        }
    }

    /// Returns the loops, outermost first.
    #[must_use]
    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    /// Returns the element the innermost loop visits, e.g. `A (I1, I2)`.
    #[must_use]
    pub fn element(&self, array: &str) -> String {
        if self.loops.is_empty() {
            return array.to_string();
        }
        let indices: Vec<&str> = self.loops.iter().map(|l| l.index.as_str()).collect();
        format!("{array} ({})", indices.join(", "))
    }

    /// Returns the first element of the array.
    #[must_use]
    pub fn first_element(&self, array: &str) -> String {
        if self.loops.is_empty() {
            return array.to_string();
        }
        let firsts: Vec<String> = self
            .loops
            .iter()
            .map(|l| format!("{array}'First ({})", l.dimension))
            .collect();
        format!("{array} ({})", firsts.join(", "))
    }

    /// Writes the loop nest, calling `visit` once inside the innermost loop
    /// with the indexed element.
    pub fn render(&self, w: &mut CodeWriter, array: &str, visit: &dyn Fn(&mut CodeWriter, &str)) {
        self.render_from(0, w, array, visit);
    }

    fn render_from(
        &self,
        level: usize,
        w: &mut CodeWriter,
        array: &str,
        visit: &dyn Fn(&mut CodeWriter, &str),
    ) {
        match self.loops.get(level) {
            None => visit(w, &self.element(array)),
            Some(l) => w.block(
                format!("for {} in {array}'Range ({}) loop", l.index, l.dimension),
                "end loop ;",
                |w| self.render_from(level + 1, w, array, visit),
            ),
        }
    }
}

/// How an array is marshalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalPlan {
    /// Visit order shared by all three subprograms.
    pub traversal: Traversal,
    /// Total number of elements.
    pub count: u32,
    /// Whether the element type has a static wire size.
    pub element_fixed: bool,
}

impl MarshalPlan {
    /// Writes the `Marshall` body.
    pub fn render_marshal(&self, w: &mut CodeWriter, profile: &str) {
        subprogram(w, profile, "Marshall", &[], |w| {
            self.traversal.render(w, "A", &|w, element| {
                w.line(format!("Marshall ({element}, S) ;"));
            });
        });
    }

    /// Writes the `UnMarshall` body.
    pub fn render_unmarshal(&self, w: &mut CodeWriter, profile: &str) {
        subprogram(w, profile, "UnMarshall", &[], |w| {
            self.traversal.render(w, "A", &|w, element| {
                w.line(format!("UnMarshall ({element}, S) ;"));
            });
        });
    }

    /// Writes the `Align_Size` body.
    ///
    /// A fixed-size element gives one closed-form call scaled by the
    /// element count; otherwise every element is sized in turn, `N` times.
    pub fn render_size(&self, w: &mut CodeWriter, profile: &str, size_type: &str) {
        let decls = [format!("Tmp : {size_type} := Initial_Offset ;")];
        subprogram(w, profile, "Align_Size", &decls, |w| {
            if self.element_fixed {
                if self.count > 0 {
                    w.line(format!(
                        "Tmp := Align_Size ({}, Initial_Offset, N * {}) ;",
                        self.traversal.first_element("A"),
                        self.count
                    ));
                }
            } else {
                w.block("for J in 1 .. N loop", "end loop ;", |w| {
                    self.traversal.render(w, "A", &|w, element| {
                        w.line(format!("Tmp := Align_Size ({element}, Tmp) ;"));
                    });
                });
            }
            w.line("return Tmp ;");
        });
    }
}

impl Emitter<'_> {
    /// Computes the marshalling plan of an array.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is not an array, a bound does not
    /// reduce, or the element count overflows.
    pub fn marshal_plan(&mut self, node: NodeId) -> Result<MarshalPlan, CodegenError> {
        let ast = self.ast;
        let NodeKind::Array(def) = ast.kind(node) else {
            return Err(CodegenError::narrow(node, "array", ast.kind(node).name()));
        };
        Ok(MarshalPlan {
            traversal: Traversal::new(def.dims.len()),
            count: expr::element_count(&def.dims, node)?,
            element_fixed: self.has_fixed_size(def.element)?,
        })
    }

    pub(super) fn declare_array(
        &mut self,
        node: NodeId,
        def: &ArrayDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        let ranges: Vec<String> = expr::extents(&def.dims, node)?
            .into_iter()
            .map(expr::index_range)
            .collect();
        let element = self.dump_name(def.element, deps, previous)?;
        w.line(format!(
            "type {name} is array ({}) of {element} ;",
            ranges.join(", ")
        ));
        access_type(deps, w, &name);
        w.blank();
        Ok(())
    }

    pub(super) fn marshal_array(
        &mut self,
        node: NodeId,
        def: &ArrayDef,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let name = self.local_name(node)?;
        self.marshal_name(def.element, deps, previous)?;
        let plan = self.marshal_plan(node)?;
        self.stream_runtime(deps);
        let [marshal, unmarshal, size] = self.marshal_profiles(&name);
        plan.render_marshal(w, &marshal);
        plan.render_unmarshal(w, &unmarshal);
        plan.render_size(w, &size, &self.config.names().size_type);
        Ok(())
    }
}
