//! Per-pass node registry

use std::collections::BTreeMap;

use theme::ScopeKind;

/// Assembled nodes of one generation pass, keyed by scope.
///
/// Keys are unique; assembling a scope again replaces the earlier node.
/// Iteration follows scope order so generated documents are stable.
#[derive(Debug, Clone)]
pub struct Registry<N> {
    /// Nodes with a fixed scope name
    pub static_nodes: BTreeMap<String, N>,
    /// Nodes with an auto-generated `sublimelinter.<name>.style_<nnn>` scope
    pub dynamic_nodes: BTreeMap<String, N>,
}

impl<N> Registry<N> {
    pub fn new() -> Self {
        Self {
            static_nodes: BTreeMap::new(),
            dynamic_nodes: BTreeMap::new(),
        }
    }

    /// File a node under its scope kind
    pub fn insert(&mut self, scope: &str, node: N) -> ScopeKind {
        let kind = ScopeKind::of(scope);
        let nodes = match kind {
            ScopeKind::Dynamic => &mut self.dynamic_nodes,
            ScopeKind::Static => &mut self.static_nodes,
        };
        nodes.insert(scope.to_string(), node);
        kind
    }

    pub fn static_scopes(&self) -> impl Iterator<Item = &str> {
        self.static_nodes.keys().map(String::as_str)
    }

    pub fn dynamic(&self) -> impl Iterator<Item = &N> {
        self.dynamic_nodes.values()
    }

    pub fn len(&self) -> usize {
        self.static_nodes.len() + self.dynamic_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}
