//! Mixin expansion.
//!
//! A `@mixin name(arg, ...)` inside a declaration block is replaced by a
//! deep copy of the named `@defmixin`'s declarations, with each
//! parameter reference substituted by the corresponding argument value
//! nodes. `@defmixin` nodes are consumed in the same traversal.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use gss_diagnostic::{ErrorManager, GssError};
use gss_ir::{CssTree, CssTreeVisitor, MutationContext, NodeId, NodeKind, VisitController};

use crate::collect_mixins::MixinDefinitions;
use crate::Pass;

/// Expands `@mixin` uses and consumes `@defmixin` nodes.
pub struct ReplaceMixins<'a> {
    definitions: MixinDefinitions,
    errors: &'a mut dyn ErrorManager,
    expanded: usize,
}

impl<'a> ReplaceMixins<'a> {
    pub fn new(definitions: MixinDefinitions, errors: &'a mut dyn ErrorManager) -> Self {
        ReplaceMixins {
            definitions,
            errors,
            expanded: 0,
        }
    }

    /// Split a `FunctionArguments` child list on separators into one
    /// value-node list per argument.
    fn split_arguments(tree: &CssTree, arguments: NodeId) -> Vec<Vec<NodeId>> {
        let mut split = Vec::new();
        let mut current = Vec::new();
        for &child in tree.children(arguments) {
            if matches!(tree.kind(child), NodeKind::ArgumentSeparator) {
                split.push(std::mem::take(&mut current));
            } else {
                current.push(child);
            }
        }
        if !current.is_empty() || !split.is_empty() {
            split.push(current);
        }
        split
    }

    /// Build the expansion of one `@mixin` use, or `None` on error.
    fn expand(&mut self, tree: &mut CssTree, mixin: NodeId) -> Option<Vec<NodeId>> {
        let NodeKind::Mixin { name, children } = tree.kind(mixin) else {
            return None;
        };
        let name = Arc::clone(name);
        let arguments = children.first().copied();
        let Some(&definition) = self.definitions.get(&name) else {
            self.errors.report(GssError::semantic(
                format!("undefined mixin \"{name}\""),
                tree.location(mixin).clone(),
            ));
            return None;
        };
        let NodeKind::MixinDefinition {
            params, children, ..
        } = tree.kind(definition)
        else {
            return None;
        };
        let params = params.clone();
        let block = children.first().copied();

        let args = match arguments {
            Some(arguments) => Self::split_arguments(tree, arguments),
            None => Vec::new(),
        };
        if args.len() != params.len() {
            self.errors.report(GssError::semantic(
                format!(
                    "mixin \"{name}\" expects {} argument(s), got {}",
                    params.len(),
                    args.len()
                ),
                tree.location(mixin).clone(),
            ));
            return None;
        }

        // Copy the argument values once; substitution deep-copies again
        // per parameter occurrence.
        let bindings: FxHashMap<Arc<str>, Vec<NodeId>> =
            params.iter().cloned().zip(args).collect();

        let declarations: Vec<NodeId> = match block {
            Some(block) => tree.children(block).to_vec(),
            None => Vec::new(),
        };
        let mut expansion = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            let copy = tree.deep_copy(declaration);
            Self::substitute_params(tree, copy, &bindings);
            expansion.push(copy);
        }
        trace!(mixin = &*name, nodes = expansion.len(), "expanded mixin");
        Some(expansion)
    }

    /// Replace parameter references in a detached copy with deep copies
    /// of the bound argument nodes.
    fn substitute_params(
        tree: &mut CssTree,
        parent: NodeId,
        bindings: &FxHashMap<Arc<str>, Vec<NodeId>>,
    ) {
        let mut index = 0;
        while index < tree.children(parent).len() {
            let child = tree.children(parent)[index];
            let binding = match tree.kind(child) {
                NodeKind::ConstantReference { name } => bindings.get(name).cloned(),
                _ => None,
            };
            if let Some(values) = binding {
                let copies: Vec<NodeId> =
                    values.iter().map(|&value| tree.deep_copy(value)).collect();
                tree.replace_child_at(parent, index, &copies);
                index += copies.len();
            } else {
                Self::substitute_params(tree, child, bindings);
                index += 1;
            }
        }
    }
}

impl CssTreeVisitor for ReplaceMixins<'_> {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, mutation: &mut MutationContext) -> bool {
        match tree.kind(node) {
            NodeKind::MixinDefinition { name, .. } => {
                trace!(name = &**name, "consuming mixin definition");
                mutation.remove_current_node();
                false
            }
            NodeKind::Mixin { .. } => {
                match self.expand(tree, node) {
                    Some(expansion) => {
                        self.expanded += 1;
                        mutation.replace_current_node(expansion, false);
                    }
                    None => mutation.remove_current_node(),
                }
                false
            }
            _ => true,
        }
    }
}

impl Pass for ReplaceMixins<'_> {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(expanded = self.expanded, "expanded mixin uses");
    }
}
