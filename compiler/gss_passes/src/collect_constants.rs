//! Constant collection.
//!
//! One traversal records every `Definition` into a [`ConstantDefinitions`]
//! table. Collection runs before conditional elimination, so a `@def`
//! nested in a not-yet-eliminated branch is seen too; the rule is simply
//! that the most recent definition for a name wins.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use gss_ir::{CssTree, CssTreeVisitor, MutationContext, NodeId, NodeKind, VisitController};

use crate::Pass;

/// Insertion-ordered constant name → definition node map.
///
/// One live binding per name: a later definition for the same name
/// overwrites the earlier one without changing its position in the
/// iteration order.
#[derive(Default)]
pub struct ConstantDefinitions {
    order: Vec<Arc<str>>,
    bindings: FxHashMap<Arc<str>, NodeId>,
}

impl ConstantDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `definition`, overwriting any earlier binding.
    pub fn add(&mut self, name: Arc<str>, definition: NodeId) {
        if self.bindings.insert(Arc::clone(&name), definition).is_none() {
            self.order.push(name);
        }
    }

    /// The current binding for `name`.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.bindings.get(name).copied()
    }

    /// Number of distinct bound names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bindings in first-definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, NodeId)> {
        self.order
            .iter()
            .map(|name| (name, self.bindings[name]))
    }
}

/// Records every `Definition` node into a [`ConstantDefinitions`] table.
#[derive(Default)]
pub struct CollectConstantDefinitions {
    definitions: ConstantDefinitions,
}

impl CollectConstantDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected table, consuming the pass.
    pub fn into_definitions(self) -> ConstantDefinitions {
        self.definitions
    }
}

impl CssTreeVisitor for CollectConstantDefinitions {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, _mutation: &mut MutationContext) -> bool {
        if let NodeKind::Definition { name, .. } = tree.kind(node) {
            self.definitions.add(Arc::clone(name), node);
            return false; // value nodes hold nothing collectable
        }
        true
    }
}

impl Pass for CollectConstantDefinitions {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(constants = self.definitions.len(), "collected constants");
    }
}
