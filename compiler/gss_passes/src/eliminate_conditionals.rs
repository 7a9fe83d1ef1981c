//! Conditional elimination.
//!
//! Given a `@if C1 {…} @elseif C2 {…} @else {…}` chain and a truth
//! assignment, the first branch whose condition evaluates true replaces
//! the whole conditional: its block's children are spliced into the
//! conditional's position and visited in place, so nested conditionals
//! resolve in the same traversal. With no true branch and no `@else`,
//! the conditional is simply removed.

use tracing::{debug, trace};

use gss_ir::{
    ConditionalKind, CssTree, CssTreeVisitor, MutationContext, NodeId, NodeKind, NodeTag,
    VisitController,
};

use crate::bool_expr::{evaluate, TruthAssignment, TruthValue};
use crate::Pass;

/// Outcome of scanning one conditional chain.
enum BranchSelection {
    /// Splice this branch block's children.
    Take(NodeId),
    /// No branch applies; remove the chain.
    None,
    /// A condition is unresolved under an open assignment; keep the
    /// chain in place.
    Unresolved,
}

/// Resolves `@if`/`@elseif`/`@else` chains against a truth assignment.
pub struct EliminateConditionals {
    assignment: TruthAssignment,
    eliminated: usize,
}

impl EliminateConditionals {
    pub fn new(assignment: TruthAssignment) -> Self {
        EliminateConditionals {
            assignment,
            eliminated: 0,
        }
    }

    /// Scan the chain's rules for the first applicable branch.
    fn select_branch(&self, tree: &CssTree, conditional: NodeId) -> BranchSelection {
        for &rule in tree.children(conditional) {
            let NodeKind::ConditionalRule { kind, children } = tree.kind(rule) else {
                panic!(
                    "structural violation: expected ConditionalRule, found {}",
                    tree.tag(rule)
                );
            };
            let block = children.last().copied();
            if *kind == ConditionalKind::Else {
                return match block {
                    Some(block) => BranchSelection::Take(block),
                    None => BranchSelection::None,
                };
            }
            let condition = children[0];
            match evaluate(tree, condition, &self.assignment) {
                TruthValue::True => {
                    return match block {
                        Some(block) if block != condition => BranchSelection::Take(block),
                        _ => BranchSelection::None,
                    };
                }
                TruthValue::False => {}
                TruthValue::Unknown => return BranchSelection::Unresolved,
            }
        }
        BranchSelection::None
    }
}

impl CssTreeVisitor for EliminateConditionals {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, mutation: &mut MutationContext) -> bool {
        if tree.tag(node) != NodeTag::ConditionalBlock {
            return true;
        }
        match self.select_branch(tree, node) {
            BranchSelection::Take(block) => {
                debug_assert!(matches!(
                    tree.tag(block),
                    NodeTag::Body | NodeTag::DeclarationBlock
                ));
                let replacements = tree.take_children(block);
                trace!(spliced = replacements.len(), "splicing conditional branch");
                self.eliminated += 1;
                // Spliced children may hold nested conditionals; visit
                // them in place.
                mutation.replace_current_node(replacements, true);
                false
            }
            BranchSelection::None => {
                self.eliminated += 1;
                mutation.remove_current_node();
                false
            }
            // Unresolved condition: keep the chain, but still resolve
            // conditionals nested inside its branches.
            BranchSelection::Unresolved => true,
        }
    }
}

impl Pass for EliminateConditionals {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(eliminated = self.eliminated, "eliminated conditionals");
    }
}
