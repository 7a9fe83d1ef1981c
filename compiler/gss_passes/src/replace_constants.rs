//! Constant-reference substitution.
//!
//! Each `ConstantReference` is replaced by a fully expanded deep copy of
//! the bound value: constants may reference other constants, so copies
//! are expanded recursively, with an expansion stack catching cycles.
//! `Definition` nodes are consumed in the same traversal — once every
//! reference is resolved the definitions have no further use.

use std::sync::Arc;

use tracing::{debug, trace};

use gss_diagnostic::{ErrorManager, GssError};
use gss_ir::{
    CssTree, CssTreeVisitor, MutationContext, NodeId, NodeKind, SourceCodeLocation,
    VisitController,
};

use crate::collect_constants::ConstantDefinitions;
use crate::Pass;

/// What to do with one constant reference.
enum Expansion {
    /// Splice these fully expanded nodes in place of the reference.
    Replace(Vec<NodeId>),
    /// Leave the reference untouched (undefined + allow mode).
    Keep,
    /// Drop the reference (undefined, or part of a cycle).
    Drop,
}

/// Replaces constant references with their bound values and consumes the
/// `Definition` nodes.
pub struct ReplaceConstantReferences<'a> {
    definitions: ConstantDefinitions,
    allow_undefined: bool,
    errors: &'a mut dyn ErrorManager,
    /// Names currently being expanded, for cycle detection.
    expansion_stack: Vec<Arc<str>>,
    replaced: usize,
}

impl<'a> ReplaceConstantReferences<'a> {
    pub fn new(
        definitions: ConstantDefinitions,
        allow_undefined: bool,
        errors: &'a mut dyn ErrorManager,
    ) -> Self {
        ReplaceConstantReferences {
            definitions,
            allow_undefined,
            errors,
            expansion_stack: Vec::new(),
            replaced: 0,
        }
    }

    fn expand_reference(
        &mut self,
        tree: &mut CssTree,
        name: &Arc<str>,
        location: &SourceCodeLocation,
    ) -> Expansion {
        let Some(definition) = self.definitions.get(name) else {
            if self.allow_undefined {
                return Expansion::Keep;
            }
            self.errors.report(GssError::semantic(
                format!("{name} is not defined"),
                location.clone(),
            ));
            return Expansion::Drop;
        };
        if self.expansion_stack.iter().any(|n| n == name) {
            self.errors.report(GssError::semantic(
                format!(
                    "cyclic constant definition: {} -> {name}",
                    self.expansion_stack
                        .iter()
                        .map(|n| &**n)
                        .collect::<Vec<_>>()
                        .join(" -> ")
                ),
                location.clone(),
            ));
            return Expansion::Drop;
        }

        self.expansion_stack.push(Arc::clone(name));
        let values: Vec<NodeId> = tree.children(definition).to_vec();
        let mut expanded = Vec::with_capacity(values.len());
        for value in values {
            let copy = tree.deep_copy(value);
            if let NodeKind::ConstantReference { name: nested } = tree.kind(copy) {
                let nested = Arc::clone(nested);
                let nested_location = tree.location(copy).clone();
                match self.expand_reference(tree, &nested, &nested_location) {
                    Expansion::Replace(nodes) => expanded.extend(nodes),
                    Expansion::Keep => expanded.push(copy),
                    Expansion::Drop => {}
                }
            } else {
                self.expand_within(tree, copy);
                expanded.push(copy);
            }
        }
        self.expansion_stack.pop();
        Expansion::Replace(expanded)
    }

    /// Expand every reference in the (detached) subtree under `parent`.
    fn expand_within(&mut self, tree: &mut CssTree, parent: NodeId) {
        let mut index = 0;
        while index < tree.children(parent).len() {
            let child = tree.children(parent)[index];
            if let NodeKind::ConstantReference { name } = tree.kind(child) {
                let name = Arc::clone(name);
                let location = tree.location(child).clone();
                match self.expand_reference(tree, &name, &location) {
                    Expansion::Replace(nodes) => {
                        let spliced = nodes.len();
                        tree.replace_child_at(parent, index, &nodes);
                        index += spliced;
                    }
                    Expansion::Keep => index += 1,
                    Expansion::Drop => {
                        tree.remove_child_at(parent, index);
                    }
                }
            } else {
                self.expand_within(tree, child);
                index += 1;
            }
        }
    }
}

impl CssTreeVisitor for ReplaceConstantReferences<'_> {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, mutation: &mut MutationContext) -> bool {
        match tree.kind(node) {
            NodeKind::Definition { name, .. } => {
                trace!(name = &**name, "consuming definition");
                mutation.remove_current_node();
                false
            }
            NodeKind::ConstantReference { name } => {
                let name = Arc::clone(name);
                let location = tree.location(node).clone();
                match self.expand_reference(tree, &name, &location) {
                    Expansion::Replace(nodes) => {
                        self.replaced += 1;
                        // Replacements are fully expanded already.
                        mutation.replace_current_node(nodes, false);
                    }
                    Expansion::Keep => {}
                    Expansion::Drop => mutation.remove_current_node(),
                }
                false
            }
            _ => true,
        }
    }
}

impl Pass for ReplaceConstantReferences<'_> {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(replaced = self.replaced, "replaced constant references");
    }
}
