//! Per-node emission state.

use ironidl_ast::NodeId;
use std::collections::{HashMap, HashSet};

/// What has been emitted for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmissionFlags {
    /// The type declaration has been produced.
    pub defined: bool,
    /// The declaration was resolved through an import at least once.
    pub imported: bool,
    /// The marshalling body has been produced.
    pub marshal_defined: bool,
    /// The marshalling was resolved through an import at least once.
    pub marshal_imported: bool,
}

/// Side table of emission flags.
///
/// Flags only ever go from false to true. The in-progress set breaks
/// cycles: a node reached again while its own declaration is being
/// produced is referred to by name only.
#[derive(Debug, Default)]
pub struct EmissionTable {
    flags: HashMap<NodeId, EmissionFlags>,
    in_progress: HashSet<NodeId>,
}

impl EmissionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, node: NodeId) -> EmissionFlags {
        self.flags.get(&node).copied().unwrap_or_default()
    }

    /// Returns true if the node's declaration has been produced.
    #[must_use]
    pub fn is_defined(&self, node: NodeId) -> bool {
        self.flags(node).defined
    }

    /// Returns true if the node's marshalling body has been produced.
    #[must_use]
    pub fn is_marshal_defined(&self, node: NodeId) -> bool {
        self.flags(node).marshal_defined
    }

    /// Marks the declaration as produced.
    pub fn mark_defined(&mut self, node: NodeId) {
        self.flags.entry(node).or_default().defined = true;
    }

    /// Marks the declaration as resolved through an import.
    pub fn mark_imported(&mut self, node: NodeId) {
        self.flags.entry(node).or_default().imported = true;
    }

    /// Marks the marshalling body as produced.
    pub fn mark_marshal_defined(&mut self, node: NodeId) {
        self.flags.entry(node).or_default().marshal_defined = true;
    }

    /// Marks the marshalling as resolved through an import.
    pub fn mark_marshal_imported(&mut self, node: NodeId) {
        self.flags.entry(node).or_default().marshal_imported = true;
    }

    /// Enters a node. Returns false if it is already being produced.
    pub fn begin(&mut self, node: NodeId) -> bool {
        self.in_progress.insert(node)
    }

    /// Leaves a node entered with [`begin`](Self::begin).
    pub fn end(&mut self, node: NodeId) {
        self.in_progress.remove(&node);
    }

    /// Returns true if the node is being produced.
    #[must_use]
    pub fn in_progress(&self, node: NodeId) -> bool {
        self.in_progress.contains(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_monotonic() {
        let mut table = EmissionTable::new();
        let node = NodeId::new(1);
        assert_eq!(table.flags(node), EmissionFlags::default());

        table.mark_defined(node);
        table.mark_defined(node);
        table.mark_marshal_imported(node);
        let flags = table.flags(node);
        assert!(flags.defined);
        assert!(flags.marshal_imported);
        assert!(!flags.imported);
        assert!(!flags.marshal_defined);

        table.mark_marshal_defined(node);
        table.mark_imported(node);
        assert!(table.is_defined(node));
        assert!(table.is_marshal_defined(node));
        assert!(table.flags(node).imported);
    }

    #[test]
    fn test_in_progress_guard() {
        let mut table = EmissionTable::new();
        let node = NodeId::new(2);
        assert!(table.begin(node));
        assert!(table.in_progress(node));
        assert!(!table.begin(node));
        table.end(node);
        assert!(!table.in_progress(node));
        assert!(table.begin(node));
    }
}
