//! Mixin collection.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use gss_diagnostic::{ErrorManager, GssError};
use gss_ir::{CssTree, CssTreeVisitor, MutationContext, NodeId, NodeKind, VisitController};

use crate::Pass;

/// Mixin name → `MixinDefinition` node.
///
/// Unlike constants, mixin names may not be redefined: the first
/// definition stands and duplicates are semantic errors.
pub type MixinDefinitions = FxHashMap<Arc<str>, NodeId>;

/// Records every `MixinDefinition`; duplicates are reported and ignored.
pub struct CollectMixinDefinitions<'a> {
    definitions: MixinDefinitions,
    errors: &'a mut dyn ErrorManager,
}

impl<'a> CollectMixinDefinitions<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager) -> Self {
        CollectMixinDefinitions {
            definitions: MixinDefinitions::default(),
            errors,
        }
    }

    /// The collected table, consuming the pass.
    pub fn into_definitions(self) -> MixinDefinitions {
        self.definitions
    }
}

impl CssTreeVisitor for CollectMixinDefinitions<'_> {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, _mutation: &mut MutationContext) -> bool {
        let NodeKind::MixinDefinition { name, .. } = tree.kind(node) else {
            return true;
        };
        if self.definitions.contains_key(name) {
            self.errors.report(GssError::semantic(
                format!("duplicate @defmixin name \"{name}\""),
                tree.location(node).clone(),
            ));
        } else {
            self.definitions.insert(Arc::clone(name), node);
        }
        false
    }
}

impl Pass for CollectMixinDefinitions<'_> {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(mixins = self.definitions.len(), "collected mixin definitions");
    }
}
