//! Generator configuration.

use ironidl_ast::NodeId;

/// Names of the Ada runtime entities generated code refers to.
///
/// The runtime itself is not part of this crate; these are only spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeNames {
    /// Package of the buffered byte stream.
    pub stream_package: String,
    /// Unsigned 32-bit type used for every size and offset.
    pub size_type: String,
    /// Base type of remote call descriptors.
    pub proxy_base: String,
    /// Client-side GIOP message type.
    pub giop_client: String,
    /// Server-side GIOP message type.
    pub giop_server: String,
    /// Package performing a remote invocation through a call descriptor.
    pub call_wrapper: String,
    /// Root object reference type.
    pub object_ref: String,
    /// Root servant type.
    pub implementation_base: String,
    /// Base record of exception members.
    pub exception_members: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            stream_package: "Netbufferedstream".to_string(),
            size_type: "Corba.Unsigned_Long".to_string(),
            proxy_base: "OmniProxyCallDesc.Object".to_string(),
            giop_client: "Giop_C.Object".to_string(),
            giop_server: "Giop_S.Object".to_string(),
            call_wrapper: "OmniProxyCallWrapper".to_string(),
            object_ref: "Corba.Object.Ref".to_string(),
            implementation_base: "Omniobject.Implemented_Object".to_string(),
            exception_members: "Corba.Idl_Exception_Members".to_string(),
        }
    }
}

impl RuntimeNames {
    /// Returns the class-wide stream parameter type.
    #[must_use]
    pub fn stream_class(&self) -> String {
        format!("{}.Object'Class", self.stream_package)
    }

    /// Returns the package prefix of a dotted entity name.
    #[must_use]
    pub fn package_of(entity: &str) -> &str {
        entity.rsplit_once('.').map_or(entity, |(pkg, _)| pkg)
    }
}

/// Configuration for a generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    indent_width: usize,
    root_package: String,
    runtime: RuntimeNames,
    anonymous_placeholder: Option<String>,
    emit_implementation: bool,
    emit_skeletons: bool,
    imports: Vec<NodeId>,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent_width: 3,
            root_package: "IDL_File".to_string(),
            runtime: RuntimeNames::default(),
            anonymous_placeholder: None,
            emit_implementation: true,
            emit_skeletons: true,
            imports: Vec::new(),
        }
    }

    /// Sets the number of spaces per nesting level.
    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Sets the package holding declarations made outside any module.
    #[must_use]
    pub fn root_package(mut self, name: impl Into<String>) -> Self {
        self.root_package = name.into();
        self
    }

    /// Sets the runtime entity names.
    #[must_use]
    pub fn runtime(mut self, runtime: RuntimeNames) -> Self {
        self.runtime = runtime;
        self
    }

    /// Names anonymous types that no declaration owns with `name` instead
    /// of failing.
    #[must_use]
    pub fn anonymous_placeholder(mut self, name: impl Into<String>) -> Self {
        self.anonymous_placeholder = Some(name.into());
        self
    }

    /// Enables or disables servant implementation units.
    #[must_use]
    pub fn emit_implementation(mut self, enabled: bool) -> Self {
        self.emit_implementation = enabled;
        self
    }

    /// Enables or disables skeleton units.
    #[must_use]
    pub fn emit_skeletons(mut self, enabled: bool) -> Self {
        self.emit_skeletons = enabled;
        self
    }

    /// Treats `node` as declared elsewhere: every artifact refers to it
    /// by full name and never emits it.
    #[must_use]
    pub fn import(mut self, node: NodeId) -> Self {
        if !self.imports.contains(&node) {
            self.imports.push(node);
        }
        self
    }

    /// Returns the number of spaces per nesting level.
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent_width
    }

    /// Returns the root package name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root_package
    }

    /// Returns the runtime entity names.
    #[must_use]
    pub const fn names(&self) -> &RuntimeNames {
        &self.runtime
    }

    /// Returns the placeholder for unowned anonymous types, if configured.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.anonymous_placeholder.as_deref()
    }

    /// Returns true if implementation units are generated.
    #[must_use]
    pub const fn implementation_enabled(&self) -> bool {
        self.emit_implementation
    }

    /// Returns true if skeleton units are generated.
    #[must_use]
    pub const fn skeletons_enabled(&self) -> bool {
        self.emit_skeletons
    }

    /// Returns the nodes pre-recorded as external.
    #[must_use]
    pub fn imports(&self) -> &[NodeId] {
        &self.imports
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.indent(), 3);
        assert_eq!(config.root(), "IDL_File");
        assert_eq!(config.placeholder(), None);
        assert!(config.implementation_enabled());
        assert!(config.skeletons_enabled());
        assert_eq!(
            config.names().stream_class(),
            "Netbufferedstream.Object'Class"
        );
    }

    #[test]
    fn test_builder_chain() {
        let config = GeneratorConfig::new()
            .indent_width(4)
            .root_package("Bank_IDL_File")
            .anonymous_placeholder("local_type")
            .emit_skeletons(false);
        assert_eq!(config.indent(), 4);
        assert_eq!(config.root(), "Bank_IDL_File");
        assert_eq!(config.placeholder(), Some("local_type"));
        assert!(!config.skeletons_enabled());
        assert!(config.implementation_enabled());
        assert!(config.imports().is_empty());
    }

    #[test]
    fn test_imports_deduplicate() {
        let config = GeneratorConfig::new()
            .import(NodeId::new(4))
            .import(NodeId::new(2))
            .import(NodeId::new(4));
        assert_eq!(config.imports(), &[NodeId::new(4), NodeId::new(2)]);
    }

    #[test]
    fn test_package_of() {
        assert_eq!(RuntimeNames::package_of("Corba.Object.Ref"), "Corba.Object");
        assert_eq!(RuntimeNames::package_of("Giop_C.Object"), "Giop_C");
        assert_eq!(RuntimeNames::package_of("Standalone"), "Standalone");
    }
}
