//! Attributes and operations.
//!
//! Every attribute and operation becomes one or two [`Subprogram`]s. The
//! same subprogram is rendered as a client stub, a call descriptor in the
//! proxies package, a servant stub in the implementation package, and a
//! dispatch entry in the skeleton.

use super::{Emitter, subprogram};
use crate::config::RuntimeNames;
use crate::deps::DepList;
use crate::error::CodegenError;
use crate::writer::CodeWriter;
use ironidl_ast::{NodeId, NodeKind, ParamDirection};

/// One parameter of a generated subprogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Ada parameter name.
    pub name: String,
    /// Parameter mode.
    pub mode: ParamDirection,
    /// Ada type name as seen from the artifact it was resolved for.
    pub type_name: String,
    /// Referenced type.
    pub ty: NodeId,
}

/// A generated subprogram derived from an attribute or operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subprogram {
    /// Ada subprogram name.
    pub name: String,
    /// Operation name on the wire.
    pub wire_name: String,
    /// Parameters in declaration order, without `Self`.
    pub params: Vec<Param>,
    /// Returned value, named `Result`.
    pub result: Option<Param>,
    /// No reply is expected.
    pub oneway: bool,
}

impl Subprogram {
    /// Returns true if the subprogram is an Ada function.
    ///
    /// Ada functions cannot have `out` parameters, so an operation that
    /// returns a value and also has returned parameters becomes a
    /// procedure with a trailing `Returns` parameter.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.result.is_some() && !self.params.iter().any(|p| p.mode.is_returned())
    }

    /// Returns the profile with `this` as the first parameter.
    #[must_use]
    pub fn profile(&self, this: &str) -> String {
        let mut parts = vec![this.to_string()];
        parts.extend(
            self.params
                .iter()
                .map(|p| format!("{} : {} {}", p.name, p.mode.ada_mode(), p.type_name)),
        );
        match &self.result {
            Some(result) if self.is_function() => format!(
                "function {} ({}) return {}",
                self.name,
                parts.join(" ; "),
                result.type_name
            ),
            Some(result) => {
                parts.push(format!("Returns : out {}", result.type_name));
                format!("procedure {} ({})", self.name, parts.join(" ; "))
            }
            None => format!("procedure {} ({})", self.name, parts.join(" ; ")),
        }
    }

    /// Returns the client stub profile.
    #[must_use]
    pub fn client_profile(&self) -> String {
        self.profile("Self : in Ref")
    }

    /// Returns the servant profile.
    #[must_use]
    pub fn impl_profile(&self) -> String {
        self.profile("Self : access Object")
    }

    /// Returns the name of the call descriptor type.
    #[must_use]
    pub fn proxy_type(&self) -> String {
        format!("{}_Proxy", self.name)
    }

    /// Parameters the client sends.
    pub fn sent(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.mode.is_sent())
    }

    /// Values the server sends back, the result first.
    pub fn returned(&self) -> impl Iterator<Item = &Param> {
        self.result
            .iter()
            .chain(self.params.iter().filter(|p| p.mode.is_returned()))
    }
}

/// Profiles of a call descriptor's primitive operations.
struct ProxyProfiles {
    create: String,
    free: String,
    aligned_size: String,
    marshal_arguments: String,
    unmarshal_returned: String,
    getters: Vec<(String, String)>,
}

impl ProxyProfiles {
    fn new(sp: &Subprogram, names: &RuntimeNames) -> Self {
        let proxy = sp.proxy_type();
        let size = &names.size_type;
        let giop = &names.giop_client;
        let args: Vec<String> = sp
            .sent()
            .map(|p| format!("{} : in {}", p.name, p.type_name))
            .collect();
        let create = if args.is_empty() {
            format!("function Create return {proxy}")
        } else {
            format!("function Create ({}) return {proxy}", args.join(" ; "))
        };
        let getters = sp
            .returned()
            .map(|p| {
                (
                    p.name.clone(),
                    format!("function Get_{} (Self : in {proxy}) return {}", p.name, p.type_name),
                )
            })
            .collect();
        Self {
            create,
            free: format!("procedure Free (Self : in out {proxy})"),
            aligned_size: format!(
                "function Aligned_Size (Self : in {proxy} ; Size_In : in {size}) return {size}"
            ),
            marshal_arguments: format!(
                "procedure Marshal_Arguments (Self : in {proxy} ; Giop_Client : in out {giop})"
            ),
            unmarshal_returned: format!(
                "procedure Unmarshal_Returned_Values (Self : in out {proxy} ; Giop_Client : in {giop})"
            ),
            getters,
        }
    }
}

/// Qualifies `entity` with the package prefix of `type_name`, if any.
fn sibling(type_name: &str, entity: &str) -> String {
    match type_name.rsplit_once('.') {
        Some((package, _)) => format!("{package}.{entity}"),
        None => entity.to_string(),
    }
}

impl Emitter<'_> {
    /// Returns the subprograms an attribute or operation maps to, with
    /// types resolved for the artifact `deps` describes.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is neither an attribute nor an
    /// operation, or a type cannot be named.
    pub fn subprograms(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        previous: &mut String,
    ) -> Result<Vec<Subprogram>, CodegenError> {
        let ast = self.ast;
        let idl = ast.name(node);
        match ast.kind(node) {
            NodeKind::Attribute(def) => {
                let local = self.local_name(node)?;
                let type_name = self.dump_name(def.field_type, deps, previous)?;
                let mut subprograms = vec![Subprogram {
                    name: format!("get_{local}"),
                    wire_name: format!("get_{idl}"),
                    params: Vec::new(),
                    result: Some(Param {
                        name: "Result".to_string(),
                        mode: ParamDirection::Out,
                        type_name: type_name.clone(),
                        ty: def.field_type,
                    }),
                    oneway: false,
                }];
                if !def.readonly {
                    subprograms.push(Subprogram {
                        name: format!("set_{local}"),
                        wire_name: format!("set_{idl}"),
                        params: vec![Param {
                            name: "To".to_string(),
                            mode: ParamDirection::In,
                            type_name,
                            ty: def.field_type,
                        }],
                        result: None,
                        oneway: false,
                    });
                }
                Ok(subprograms)
            }
            NodeKind::Operation(def) => {
                let mut params = Vec::new();
                for &decl in ast.decls(node) {
                    if let NodeKind::Argument(arg) = ast.kind(decl) {
                        params.push(Param {
                            name: self.local_name(decl)?,
                            mode: arg.direction,
                            type_name: self.dump_name(arg.field_type, deps, previous)?,
                            ty: arg.field_type,
                        });
                    }
                }
                let result = match def.return_type {
                    Some(ty) => Some(Param {
                        name: "Result".to_string(),
                        mode: ParamDirection::Out,
                        type_name: self.dump_name(ty, deps, previous)?,
                        ty,
                    }),
                    None => None,
                };
                Ok(vec![Subprogram {
                    name: self.local_name(node)?,
                    wire_name: idl.to_string(),
                    params,
                    result,
                    oneway: def.oneway,
                }])
            }
            other => Err(CodegenError::narrow(node, "attribute or operation", other.name())),
        }
    }

    /// Returns the operation names a skeleton dispatches on.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is neither an attribute nor an
    /// operation.
    pub fn wire_names(&self, node: NodeId) -> Result<Vec<String>, CodegenError> {
        let ast = self.ast;
        let idl = ast.name(node);
        match ast.kind(node) {
            NodeKind::Attribute(def) if def.readonly => Ok(vec![format!("get_{idl}")]),
            NodeKind::Attribute(_) => Ok(vec![format!("get_{idl}"), format!("set_{idl}")]),
            NodeKind::Operation(_) => Ok(vec![idl.to_string()]),
            other => Err(CodegenError::narrow(node, "attribute or operation", other.name())),
        }
    }

    pub(super) fn declare_client(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        for sp in self.subprograms(node, deps, previous)? {
            w.line(format!("{} ;", sp.client_profile()));
        }
        w.blank();
        Ok(())
    }

    /// Client stubs build a call descriptor, invoke it and read the
    /// returned values back.
    pub(super) fn client_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let unit = self.full_name(self.ast.enclosing_unit(node))?;
        let proxies = format!("{unit}.Proxies");
        let wrapper = self.config.names().call_wrapper.clone();
        deps.require_runtime(proxies.clone());
        deps.require_runtime(wrapper.clone());

        for sp in self.subprograms(node, deps, previous)? {
            let mut decls = vec![format!("Opcd : {proxies}.{} ;", sp.proxy_type())];
            if sp.is_function() {
                if let Some(result) = &sp.result {
                    decls.push(format!("Result : {} ;", result.type_name));
                }
            }
            let args: Vec<&str> = sp.sent().map(|p| p.name.as_str()).collect();
            subprogram(w, &sp.client_profile(), &sp.name, &decls, |w| {
                if args.is_empty() {
                    w.line(format!("Opcd := {proxies}.Create ;"));
                } else {
                    w.line(format!("Opcd := {proxies}.Create ({}) ;", args.join(", ")));
                }
                w.line(format!("{wrapper}.Invoke (Self, Opcd) ;"));
                for p in sp.params.iter().filter(|p| p.mode.is_returned()) {
                    w.line(format!("{0} := {proxies}.Get_{0} (Opcd) ;", p.name));
                }
                if sp.result.is_some() {
                    let target = if sp.is_function() { "Result" } else { "Returns" };
                    w.line(format!("{target} := {proxies}.Get_Result (Opcd) ;"));
                }
                w.line(format!("{proxies}.Free (Opcd) ;"));
                if sp.is_function() {
                    w.line("return Result ;");
                }
            });
        }
        Ok(())
    }

    /// Produces the call descriptor declarations of an attribute or
    /// operation. The descriptor records go to `private_part`.
    ///
    /// # Errors
    /// Returns `CodegenError` if a type cannot be named.
    pub fn produce_proxy_decl(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        private_part: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let names = self.config.names().clone();
        deps.require_runtime(RuntimeNames::package_of(&names.proxy_base));
        deps.require_runtime(RuntimeNames::package_of(&names.giop_client));
        deps.require_runtime(RuntimeNames::package_of(&names.size_type));

        for sp in self.subprograms(node, deps, previous)? {
            let proxy = sp.proxy_type();
            let profiles = ProxyProfiles::new(&sp, &names);
            w.line(format!(
                "type {proxy} is new {} with private ;",
                names.proxy_base
            ));
            for profile in [
                &profiles.create,
                &profiles.free,
                &profiles.aligned_size,
                &profiles.marshal_arguments,
                &profiles.unmarshal_returned,
            ] {
                w.line(format!("{profile} ;"));
            }
            for (_, getter) in &profiles.getters {
                w.line(format!("{getter} ;"));
            }
            w.blank();

            let fields: Vec<&Param> = sp.params.iter().chain(sp.result.iter()).collect();
            let head = format!("type {proxy} is new {} with", names.proxy_base);
            if fields.is_empty() {
                private_part.line(format!("{head} null record ;"));
            } else {
                private_part.block(format!("{head} record"), "end record ;", |w| {
                    for p in &fields {
                        w.line(format!("{} : {}_Ptr := null ;", p.name, p.type_name));
                    }
                });
            }
            private_part.blank();
        }
        Ok(())
    }

    /// Produces the call descriptor bodies of an attribute or operation.
    ///
    /// # Errors
    /// Returns `CodegenError` if a type or its marshalling cannot be named.
    pub fn produce_proxy_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        let names = self.config.names().clone();
        let unit = self.full_name(self.ast.enclosing_unit(node))?;
        deps.use_runtime(format!("{unit}.Marshal"));
        self.stream_runtime(deps);

        for sp in self.subprograms(node, deps, previous)? {
            for p in sp.params.iter().chain(sp.result.iter()) {
                self.marshal_name(p.ty, deps, previous)?;
            }
            let proxy = sp.proxy_type();
            let profiles = ProxyProfiles::new(&sp, &names);
            let fields: Vec<&Param> = sp.params.iter().chain(sp.result.iter()).collect();

            subprogram(
                w,
                &profiles.create,
                "Create",
                &[format!("Result : {proxy} ;")],
                |w| {
                    for p in sp.sent() {
                        w.line(format!(
                            "Result.{0} := new {1}'({0}) ;",
                            p.name, p.type_name
                        ));
                    }
                    w.line("return Result ;");
                },
            );
            subprogram(w, &profiles.free, "Free", &[], |w| {
                if fields.is_empty() {
                    w.line("null ;");
                }
                for p in &fields {
                    w.line(format!("{} (Self.{}) ;", sibling(&p.type_name, "Free"), p.name));
                }
            });
            subprogram(
                w,
                &profiles.aligned_size,
                "Aligned_Size",
                &[format!("Msg_Size : {} := Size_In ;", names.size_type)],
                |w| {
                    for p in sp.sent() {
                        w.line(format!("Msg_Size := Align_Size (Self.{}.all, Msg_Size) ;", p.name));
                    }
                    w.line("return Msg_Size ;");
                },
            );
            subprogram(w, &profiles.marshal_arguments, "Marshal_Arguments", &[], |w| {
                let mut sent = sp.sent().peekable();
                if sent.peek().is_none() {
                    w.line("null ;");
                }
                for p in sent {
                    w.line(format!("Marshall (Self.{}.all, Giop_Client) ;", p.name));
                }
            });
            let temporaries: Vec<String> = sp
                .returned()
                .map(|p| format!("Tmp_{} : {} ;", p.name, p.type_name))
                .collect();
            subprogram(
                w,
                &profiles.unmarshal_returned,
                "Unmarshal_Returned_Values",
                &temporaries,
                |w| {
                    let mut returned = sp.returned().peekable();
                    if returned.peek().is_none() {
                        w.line("null ;");
                    }
                    for p in returned {
                        w.line(format!("UnMarshall (Tmp_{}, Giop_Client) ;", p.name));
                        w.line(format!(
                            "Self.{0} := new {1}'(Tmp_{0}) ;",
                            p.name, p.type_name
                        ));
                    }
                },
            );
            for (field, getter) in &profiles.getters {
                subprogram(w, getter, &format!("Get_{field}"), &[], |w| {
                    w.line(format!("return Self.{field}.all ;"));
                });
            }
        }
        Ok(())
    }

    /// Produces the servant declarations of an attribute or operation.
    ///
    /// # Errors
    /// Returns `CodegenError` if a type cannot be named.
    pub fn produce_impl_decl(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        for sp in self.subprograms(node, deps, previous)? {
            w.line(format!("{} ;", sp.impl_profile()));
        }
        w.blank();
        Ok(())
    }

    /// Produces servant stubs: functions return a default result and
    /// procedures do nothing.
    ///
    /// # Errors
    /// Returns `CodegenError` if a type cannot be named.
    pub fn produce_impl_body(
        &mut self,
        node: NodeId,
        deps: &mut DepList,
        w: &mut CodeWriter,
        previous: &mut String,
    ) -> Result<(), CodegenError> {
        for sp in self.subprograms(node, deps, previous)? {
            match (&sp.result, sp.is_function()) {
                (Some(result), true) => subprogram(
                    w,
                    &sp.impl_profile(),
                    &sp.name,
                    &[format!("Result : {} ;", result.type_name)],
                    |w| {
                        w.line("return Result ;");
                    },
                ),
                _ => subprogram(w, &sp.impl_profile(), &sp.name, &[], |w| {
                    w.line("null ;");
                }),
            }
        }
        Ok(())
    }

    /// Produces the skeleton dispatch entries of an attribute or
    /// operation.
    ///
    /// # Errors
    /// Returns `CodegenError` if `node` is neither an attribute nor an
    /// operation.
    pub fn produce_skeleton_entry(
        &self,
        node: NodeId,
        w: &mut CodeWriter,
    ) -> Result<(), CodegenError> {
        for wire in self.wire_names(node)? {
            w.block(format!("if Orl_Op = \"{wire}\" then"), "end if ;", |w| {
                w.line("Returns := True ;");
                w.line("return ;");
            });
        }
        Ok(())
    }
}
