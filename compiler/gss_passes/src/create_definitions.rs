//! Rewrites `@def` at-rules into `Definition` nodes.
//!
//! The parser emits every unrecognized at-rule as `UnknownAtRule`; this
//! pass picks out the `@def` ones, validates their shape, and replaces
//! each with a structured `Definition` carrying the constant name and
//! its value nodes. Malformed definitions are reported and dropped.

use std::sync::Arc;

use tracing::debug;

use gss_diagnostic::{ErrorManager, GssError};
use gss_ir::{
    CssTree, CssTreeVisitor, MutationContext, NodeFlags, NodeId, NodeKind, VisitController,
};

use crate::Pass;

/// Turns `@def NAME value...;` into `Definition` nodes.
pub struct CreateDefinitionNodes<'a> {
    errors: &'a mut dyn ErrorManager,
    created: usize,
}

impl<'a> CreateDefinitionNodes<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager) -> Self {
        CreateDefinitionNodes { errors, created: 0 }
    }

    /// Constant names are SCREAMING_SNAKE_CASE: `[A-Z][A-Z0-9_]*`.
    fn is_valid_constant_name(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        first.is_ascii_uppercase()
            && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    }

    /// Extract the constant name from the at-rule's first parameter,
    /// or report why it cannot be one.
    fn definition_name(&mut self, tree: &CssTree, node: NodeId) -> Option<Arc<str>> {
        let children = tree.children(node);
        let first = children.first().copied();
        let name = match first.map(|id| tree.kind(id)) {
            Some(NodeKind::Literal { value }) if Self::is_valid_constant_name(value) => {
                Arc::clone(value)
            }
            Some(NodeKind::Literal { value }) => {
                self.errors.report(GssError::semantic(
                    format!("invalid constant name \"{value}\": @def names must be uppercase"),
                    tree.location(node).clone(),
                ));
                return None;
            }
            _ => {
                self.errors.report(GssError::semantic(
                    "@def requires a constant name",
                    tree.location(node).clone(),
                ));
                return None;
            }
        };
        if children.len() < 2 {
            self.errors.report(GssError::semantic(
                format!("@def {name} has no value"),
                tree.location(node).clone(),
            ));
            return None;
        }
        Some(name)
    }
}

impl CssTreeVisitor for CreateDefinitionNodes<'_> {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, mutation: &mut MutationContext) -> bool {
        let NodeKind::UnknownAtRule { name, .. } = tree.kind(node) else {
            return true;
        };
        if &**name != "def" {
            return true;
        }

        let Some(constant_name) = self.definition_name(tree, node) else {
            mutation.remove_current_node();
            return false;
        };

        let location = tree.location(node).clone();
        let mut values = tree.take_children(node);
        values.remove(0); // the name literal

        // A trailing `default` keyword marks an overridable definition.
        let is_default = matches!(
            values.last().map(|&id| tree.kind(id)),
            Some(NodeKind::Literal { value }) if &**value == "default"
        );
        if is_default {
            values.pop();
        }

        let definition = tree.alloc_at(
            NodeKind::Definition {
                name: constant_name,
                children: vec![],
            },
            location,
        );
        if is_default {
            tree.flags_mut(definition).insert(NodeFlags::IS_DEFAULT);
        }
        for value in values {
            tree.append_child(definition, value);
        }

        self.created += 1;
        mutation.replace_current_node(vec![definition], false);
        false
    }
}

impl Pass for CreateDefinitionNodes<'_> {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(created = self.created, "created definition nodes");
    }
}
