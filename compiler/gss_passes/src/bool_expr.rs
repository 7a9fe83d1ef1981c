//! Ternary boolean logic for `@if` conditions.
//!
//! Conditions are evaluated against a [`TruthAssignment`]: a set of
//! names known true and, optionally, a set known false. A closed
//! assignment treats every absent name as false, which is what the
//! compiler uses for final conditional elimination; an open assignment
//! leaves absent names unresolved, which is what algebraic
//! simplification works over.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use gss_ir::{BooleanOp, CssTree, NodeId, NodeKind};

/// The value of a condition under a truth assignment.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TruthValue {
    True,
    False,
    /// The condition mentions a name the assignment does not resolve.
    Unknown,
}

/// Which condition names are known true and which known false.
#[derive(Clone, Debug, Default)]
pub struct TruthAssignment {
    true_names: FxHashSet<Arc<str>>,
    /// `None` means the assignment is closed: every name not in
    /// `true_names` is false.
    false_names: Option<FxHashSet<Arc<str>>>,
}

impl TruthAssignment {
    /// A closed assignment: listed names are true, all others false.
    pub fn closed(true_names: FxHashSet<Arc<str>>) -> Self {
        TruthAssignment {
            true_names,
            false_names: None,
        }
    }

    /// An open assignment: names in neither set are unresolved.
    pub fn open(true_names: FxHashSet<Arc<str>>, false_names: FxHashSet<Arc<str>>) -> Self {
        TruthAssignment {
            true_names,
            false_names: Some(false_names),
        }
    }

    /// The truth value of one condition name.
    pub fn value_of(&self, name: &str) -> TruthValue {
        if self.true_names.contains(name) {
            return TruthValue::True;
        }
        match &self.false_names {
            None => TruthValue::False,
            Some(false_names) if false_names.contains(name) => TruthValue::False,
            Some(_) => TruthValue::Unknown,
        }
    }
}

/// Evaluate a `BooleanExpression` subtree under an assignment.
///
/// # Panics
/// Panics if `node` is not a `BooleanExpression` or the expression is
/// malformed (wrong operand count); expression shape is guaranteed by
/// the parser.
pub fn evaluate(tree: &CssTree, node: NodeId, assignment: &TruthAssignment) -> TruthValue {
    let NodeKind::BooleanExpression { op, children } = tree.kind(node) else {
        panic!(
            "structural violation: expected BooleanExpression, found {}",
            tree.tag(node)
        );
    };
    match op {
        BooleanOp::True => TruthValue::True,
        BooleanOp::False => TruthValue::False,
        BooleanOp::Constant(name) => assignment.value_of(name),
        BooleanOp::Not => {
            assert!(children.len() == 1, "structural violation: NOT arity");
            match evaluate(tree, children[0], assignment) {
                TruthValue::True => TruthValue::False,
                TruthValue::False => TruthValue::True,
                TruthValue::Unknown => TruthValue::Unknown,
            }
        }
        BooleanOp::And => {
            assert!(children.len() == 2, "structural violation: AND arity");
            let lhs = evaluate(tree, children[0], assignment);
            let rhs = evaluate(tree, children[1], assignment);
            match (lhs, rhs) {
                (TruthValue::False, _) | (_, TruthValue::False) => TruthValue::False,
                (TruthValue::True, TruthValue::True) => TruthValue::True,
                _ => TruthValue::Unknown,
            }
        }
        BooleanOp::Or => {
            assert!(children.len() == 2, "structural violation: OR arity");
            let lhs = evaluate(tree, children[0], assignment);
            let rhs = evaluate(tree, children[1], assignment);
            match (lhs, rhs) {
                (TruthValue::True, _) | (_, TruthValue::True) => TruthValue::True,
                (TruthValue::False, TruthValue::False) => TruthValue::False,
                _ => TruthValue::Unknown,
            }
        }
    }
}

/// Algebraically simplify an expression into a fresh subtree.
///
/// Resolved operands drop out (`OR(FALSE, X)` becomes `X`,
/// `AND(TRUE, X)` becomes `X`, dominant operands collapse the whole
/// node); an expression that is unresolved on both sides stays a node
/// of the same operator. The input subtree is left untouched.
pub fn simplify(tree: &mut CssTree, node: NodeId, assignment: &TruthAssignment) -> NodeId {
    let NodeKind::BooleanExpression { op, children } = tree.kind(node) else {
        panic!(
            "structural violation: expected BooleanExpression, found {}",
            tree.tag(node)
        );
    };
    let op = op.clone();
    let children = children.clone();
    match op {
        BooleanOp::True | BooleanOp::False => leaf(tree, op),
        BooleanOp::Constant(name) => match assignment.value_of(&name) {
            TruthValue::True => leaf(tree, BooleanOp::True),
            TruthValue::False => leaf(tree, BooleanOp::False),
            TruthValue::Unknown => leaf(tree, BooleanOp::Constant(name)),
        },
        BooleanOp::Not => {
            let operand = simplify(tree, children[0], assignment);
            match resolved(tree, operand) {
                Some(TruthValue::True) => leaf(tree, BooleanOp::False),
                Some(TruthValue::False) => leaf(tree, BooleanOp::True),
                _ => {
                    let not = tree.alloc(NodeKind::BooleanExpression {
                        op: BooleanOp::Not,
                        children: vec![],
                    });
                    tree.append_child(not, operand);
                    not
                }
            }
        }
        BooleanOp::And => binary(tree, assignment, &children, BooleanOp::And, TruthValue::False),
        BooleanOp::Or => binary(tree, assignment, &children, BooleanOp::Or, TruthValue::True),
    }
}

fn leaf(tree: &mut CssTree, op: BooleanOp) -> NodeId {
    tree.alloc(NodeKind::BooleanExpression {
        op,
        children: vec![],
    })
}

/// Structural equality of two boolean expression subtrees.
fn expr_eq(tree: &CssTree, a: NodeId, b: NodeId) -> bool {
    match (tree.kind(a), tree.kind(b)) {
        (
            NodeKind::BooleanExpression {
                op: a_op,
                children: a_children,
            },
            NodeKind::BooleanExpression {
                op: b_op,
                children: b_children,
            },
        ) => {
            a_op == b_op
                && a_children.len() == b_children.len()
                && a_children
                    .iter()
                    .zip(b_children)
                    .all(|(&x, &y)| expr_eq(tree, x, y))
        }
        _ => false,
    }
}

/// The truth value of an already-simplified node, if resolved.
fn resolved(tree: &CssTree, node: NodeId) -> Option<TruthValue> {
    match tree.kind(node) {
        NodeKind::BooleanExpression {
            op: BooleanOp::True,
            ..
        } => Some(TruthValue::True),
        NodeKind::BooleanExpression {
            op: BooleanOp::False,
            ..
        } => Some(TruthValue::False),
        _ => None,
    }
}

/// Shared OR/AND reduction: `dominant` collapses the node, its dual
/// drops out.
fn binary(
    tree: &mut CssTree,
    assignment: &TruthAssignment,
    children: &[NodeId],
    op: BooleanOp,
    dominant: TruthValue,
) -> NodeId {
    let lhs = simplify(tree, children[0], assignment);
    let rhs = simplify(tree, children[1], assignment);
    let lhs_value = resolved(tree, lhs);
    let rhs_value = resolved(tree, rhs);

    if lhs_value == Some(dominant) || rhs_value == Some(dominant) {
        return leaf(
            tree,
            if dominant == TruthValue::True {
                BooleanOp::True
            } else {
                BooleanOp::False
            },
        );
    }
    match (lhs_value, rhs_value) {
        // Both resolved to the non-dominant value.
        (Some(_), Some(_)) => leaf(
            tree,
            if dominant == TruthValue::True {
                BooleanOp::False
            } else {
                BooleanOp::True
            },
        ),
        // One side resolved non-dominant: the other side is the result.
        (Some(_), None) => rhs,
        (None, Some(_)) => lhs,
        // Both unresolved: the combined node survives only when the
        // operands are distinct; X OR X is X.
        (None, None) => {
            if expr_eq(tree, lhs, rhs) {
                return lhs;
            }
            let combined = tree.alloc(NodeKind::BooleanExpression {
                op,
                children: vec![],
            });
            tree.append_child(combined, lhs);
            tree.append_child(combined, rhs);
            combined
        }
    }
}
